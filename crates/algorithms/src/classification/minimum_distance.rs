//! Iterative minimum-distance unsupervised classification
//!
//! Assigns every pixel of a multi-band image to the nearest of K class
//! means (Euclidean distance in band space), then recomputes the means from
//! the assignment, repeating until the largest centroid movement falls at
//! or below a tolerance or an iteration cap is hit. Equivalent to k-means
//! with deterministic range-based seeding: starting means are evenly
//! distributed along each band's valid brightness range.

use crate::classification::state::ClassifierState;
use crate::classification::LabelRaster;
use log::debug;
use multispec_core::{Algorithm, Error, PixelStack, Result};
use ndarray::Array2;

/// How masked (invalid) cells take part in the update statistics.
///
/// Masked cells always take part in distance computation and receive a
/// label; the original algorithm only ever excluded them from the
/// initialization range. `IncludeMasked` reproduces that behavior exactly,
/// which means sensor fill values can pull cluster means. `ExcludeMasked`
/// additionally drops masked cells from the per-cluster mean/max/min.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskPolicy {
    /// Masked cell values feed the cluster statistics (source-faithful)
    #[default]
    IncludeMasked,
    /// Masked cells are left out of the cluster statistics
    ExcludeMasked,
}

/// Parameters for minimum-distance classification
#[derive(Debug, Clone)]
pub struct ClassifyParams {
    /// Number of clusters K (must be at least 1)
    pub num_clusters: usize,
    /// Convergence tolerance on the largest centroid movement, in the
    /// band's physical units
    pub tolerance: f64,
    /// Iteration cap; the loop always terminates by this bound
    pub max_iterations: usize,
    /// Treatment of masked cells in the update statistics
    pub mask_policy: MaskPolicy,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            num_clusters: 5,
            tolerance: 0.01,
            max_iterations: 100,
            mask_policy: MaskPolicy::IncludeMasked,
        }
    }
}

/// Why the convergence loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Largest centroid movement fell at or below the tolerance
    Converged,
    /// Iteration cap reached before the means settled
    MaxIterationsReached,
}

/// Per-iteration diagnostic passed to the observer callback
#[derive(Debug, Clone, Copy)]
pub struct IterationUpdate {
    /// Completed iterations so far (1-based)
    pub iteration: usize,
    /// Largest centroid movement produced by this iteration's update
    pub max_mean_delta: f64,
}

/// Result of a classification run
#[derive(Debug, Clone)]
pub struct Classification {
    /// Cluster index per pixel, in `[0, K)`, consistent with `means`
    pub labels: LabelRaster,
    /// Final class means (B×K)
    pub means: Array2<f64>,
    /// Largest value per (band, cluster) from the last update (B×K)
    pub cluster_max: Array2<f64>,
    /// Smallest value per (band, cluster) from the last update (B×K)
    pub cluster_min: Array2<f64>,
    /// Number of iterations run
    pub iterations: usize,
    /// Why the loop stopped
    pub termination: Termination,
}

/// Minimum-distance classification algorithm
#[derive(Debug, Clone, Default)]
pub struct MinimumDistance;

impl Algorithm for MinimumDistance {
    type Input = PixelStack;
    type Output = Classification;
    type Params = ClassifyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "MinimumDistance"
    }

    fn description(&self) -> &'static str {
        "Iterative minimum-distance (k-means style) unsupervised classification"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        classify(&input, params)
    }
}

/// Classify a pixel stack into `params.num_clusters` spectral classes.
///
/// Each iteration assigns every pixel to the nearest class mean, then
/// recomputes the means from the assignment. The loop stops once the
/// largest centroid movement is at or below `params.tolerance`
/// (`Termination::Converged`) or after `params.max_iterations` iterations
/// (`Termination::MaxIterationsReached`). The returned labels are
/// recomputed from the final means, so they are always consistent with the
/// means that triggered termination.
///
/// The algorithm is deterministic: repeated runs on the same input produce
/// bit-identical labels and means.
///
/// # Arguments
/// * `stack` - Aligned bands in physical units with validity masks
/// * `params` - Cluster count, tolerance, iteration cap, mask policy
///
/// # Errors
/// * [`Error::InvalidClusterCount`] when `params.num_clusters` is 0
/// * [`Error::InsufficientData`] when a band has no valid pixels
///
/// # Example
/// ```ignore
/// let stack = PixelStack::new(vec![band2, band7, band22])?;
/// let params = ClassifyParams { num_clusters: 8, ..Default::default() };
/// let result = classify(&stack, params)?;
/// assert!(result.labels.iter().all(|&l| l < 8));
/// ```
pub fn classify(stack: &PixelStack, params: ClassifyParams) -> Result<Classification> {
    classify_with_observer(stack, params, |_| {})
}

/// Classify with a per-iteration observer.
///
/// The observer is invoked once after each iteration's update step with the
/// iteration count and the largest centroid movement, replacing the console
/// progress printing of script-based workflows. It has no effect on the
/// result.
pub fn classify_with_observer<F>(
    stack: &PixelStack,
    params: ClassifyParams,
    mut observer: F,
) -> Result<Classification>
where
    F: FnMut(IterationUpdate),
{
    if params.num_clusters < 1 {
        return Err(Error::InvalidClusterCount {
            given: params.num_clusters,
        });
    }

    let mut state = ClassifierState::initialize(stack, params.num_clusters)?;

    let termination = loop {
        let labels = state.assign(stack)?;
        state.update(stack, &labels, params.mask_policy);
        state.iterations += 1;

        debug!(
            "iteration {}: max mean delta {}",
            state.iterations, state.max_mean_delta
        );
        observer(IterationUpdate {
            iteration: state.iterations,
            max_mean_delta: state.max_mean_delta,
        });

        if state.max_mean_delta <= params.tolerance {
            break Termination::Converged;
        }
        if state.iterations >= params.max_iterations {
            break Termination::MaxIterationsReached;
        }
    };

    // One last assignment so the output labels match the final means.
    let labels = state.assign(stack)?;

    Ok(Classification {
        labels,
        means: state.means,
        cluster_max: state.cluster_max,
        cluster_min: state.cluster_min,
        iterations: state.iterations,
        termination,
    })
}
