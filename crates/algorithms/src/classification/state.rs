//! Classifier state carried across iterations
//!
//! One `ClassifierState` owns the class means and the per-cluster summary
//! statistics for a single classification run. The three steps of the
//! algorithm (initialize, assign, update) are methods on it so each can be
//! exercised in isolation.

use crate::classification::minimum_distance::MaskPolicy;
use crate::classification::LabelRaster;
use crate::maybe_rayon::*;
use multispec_core::{Error, PixelStack, Result};
use ndarray::Array2;

/// Mutable state of one classification run.
///
/// `means`, `cluster_max` and `cluster_min` are B×K matrices (band-major,
/// matching the printed summary orientation of the per-cluster report).
#[derive(Debug, Clone)]
pub(crate) struct ClassifierState {
    /// Current per-band, per-cluster centroid values (B×K)
    pub(crate) means: Array2<f64>,
    /// Largest value observed in each (band, cluster) cell so far (B×K)
    pub(crate) cluster_max: Array2<f64>,
    /// Smallest value observed in each (band, cluster) cell so far (B×K)
    pub(crate) cluster_min: Array2<f64>,
    /// Largest centroid movement produced by the most recent update
    pub(crate) max_mean_delta: f64,
    /// Completed iterations (assignment + update pairs)
    pub(crate) iterations: usize,
}

impl ClassifierState {
    /// Seed the class means from the per-band brightness range.
    ///
    /// For each band, K means are evenly spaced from the band's valid
    /// minimum to its valid maximum (endpoints included; K=1 collapses to
    /// the minimum). Masked cells are excluded from the range. A band with
    /// no valid cells at all cannot be seeded and fails with
    /// [`Error::InsufficientData`].
    ///
    /// The max/min matrices start out equal to the initial means so that a
    /// cluster that never receives a pixel still reports a defined value.
    pub(crate) fn initialize(stack: &PixelStack, num_clusters: usize) -> Result<Self> {
        let num_bands = stack.num_bands();
        let mut means = Array2::zeros((num_bands, num_clusters));

        for (b, band) in stack.bands().iter().enumerate() {
            let (min, max) = band
                .valid_min_max()
                .ok_or(Error::InsufficientData { band: b })?;

            for k in 0..num_clusters {
                let t = if num_clusters > 1 {
                    k as f64 / (num_clusters - 1) as f64
                } else {
                    0.0
                };
                means[(b, k)] = min + (max - min) * t;
            }
        }

        Ok(Self {
            cluster_max: means.clone(),
            cluster_min: means.clone(),
            means,
            max_mean_delta: f64::INFINITY,
            iterations: 0,
        })
    }

    /// Assign every pixel to its nearest class mean.
    ///
    /// Distance is Euclidean in B-dimensional band space. Masked cell
    /// values participate numerically regardless of mask policy: every
    /// pixel must receive a label, and the source algorithm never excluded
    /// them here. Ties break to the lowest cluster index (strict `<`
    /// during an ascending scan).
    pub(crate) fn assign(&self, stack: &PixelStack) -> Result<LabelRaster> {
        let (rows, cols) = stack.shape();
        let num_clusters = self.means.ncols();
        let bands: Vec<&Array2<f64>> = stack.bands().iter().map(|b| b.values()).collect();
        let means = &self.means;

        let labels: Vec<usize> = (0..rows)
            .into_par_iter()
            .flat_map(|row| {
                let mut row_labels = vec![0usize; cols];
                for col in 0..cols {
                    let mut best_dist = f64::INFINITY;
                    let mut best_cluster = 0;

                    for k in 0..num_clusters {
                        let mut sum_sq = 0.0;
                        for (b, band) in bands.iter().enumerate() {
                            let diff = band[(row, col)] - means[(b, k)];
                            sum_sq += diff * diff;
                        }
                        let dist = sum_sq.sqrt();
                        if dist < best_dist {
                            best_dist = dist;
                            best_cluster = k;
                        }
                    }

                    row_labels[col] = best_cluster;
                }
                row_labels
            })
            .collect();

        Array2::from_shape_vec((rows, cols), labels).map_err(|e| Error::Other(e.to_string()))
    }

    /// Recompute the class means from the current labels.
    ///
    /// For each (band, cluster) cell: arithmetic mean, max and min of the
    /// band values at pixels carrying that label. A cluster with no pixels
    /// keeps its previous mean, max and min and contributes zero to the
    /// convergence delta. Under [`MaskPolicy::ExcludeMasked`], cells masked
    /// in a given band are left out of that band's statistics.
    ///
    /// Accumulation runs in a single row-major pass, so floating-point
    /// summation order is fixed and results are reproducible.
    pub(crate) fn update(&mut self, stack: &PixelStack, labels: &LabelRaster, policy: MaskPolicy) {
        let num_bands = stack.num_bands();
        let num_clusters = self.means.ncols();

        let mut sums = Array2::<f64>::zeros((num_bands, num_clusters));
        let mut counts = Array2::<usize>::zeros((num_bands, num_clusters));
        let mut maxs = Array2::from_elem((num_bands, num_clusters), f64::NEG_INFINITY);
        let mut mins = Array2::from_elem((num_bands, num_clusters), f64::INFINITY);

        for ((row, col), &k) in labels.indexed_iter() {
            for (b, band) in stack.bands().iter().enumerate() {
                if policy == MaskPolicy::ExcludeMasked && band.is_masked_unchecked(row, col) {
                    continue;
                }
                let v = band.values()[(row, col)];
                sums[(b, k)] += v;
                counts[(b, k)] += 1;
                if v > maxs[(b, k)] {
                    maxs[(b, k)] = v;
                }
                if v < mins[(b, k)] {
                    mins[(b, k)] = v;
                }
            }
        }

        let mut max_delta = 0.0_f64;
        for b in 0..num_bands {
            for k in 0..num_clusters {
                let count = counts[(b, k)];
                if count == 0 {
                    // Empty cluster: the mean does not move and the prior
                    // max/min stand.
                    continue;
                }
                let mean = sums[(b, k)] / count as f64;
                let delta = (mean - self.means[(b, k)]).abs();
                if delta > max_delta {
                    max_delta = delta;
                }
                self.means[(b, k)] = mean;
                self.cluster_max[(b, k)] = maxs[(b, k)];
                self.cluster_min[(b, k)] = mins[(b, k)];
            }
        }

        self.max_mean_delta = max_delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multispec_core::Band;
    use ndarray::arr2;

    fn single_band_stack(values: Array2<f64>) -> PixelStack {
        PixelStack::new(vec![Band::new(values)]).unwrap()
    }

    #[test]
    fn test_initialize_even_spacing() {
        let stack = single_band_stack(arr2(&[[0.0, 10.0], [5.0, 2.5]]));
        let state = ClassifierState::initialize(&stack, 5).unwrap();

        for (k, expected) in [0.0, 2.5, 5.0, 7.5, 10.0].iter().enumerate() {
            assert!(
                (state.means[(0, k)] - expected).abs() < 1e-12,
                "mean {} should be {}, got {}",
                k,
                expected,
                state.means[(0, k)]
            );
        }
    }

    #[test]
    fn test_initialize_single_cluster() {
        let stack = single_band_stack(arr2(&[[3.0, 9.0]]));
        let state = ClassifierState::initialize(&stack, 1).unwrap();
        // K=1 collapses to the band minimum.
        assert_eq!(state.means[(0, 0)], 3.0);
        assert_eq!(state.iterations, 0);
        assert!(state.max_mean_delta.is_infinite());
    }

    #[test]
    fn test_initialize_excludes_masked_from_range() {
        let values = arr2(&[[0.0, 10.0], [5.0, 1000.0]]);
        let mask = arr2(&[[false, false], [false, true]]);
        let stack = PixelStack::new(vec![Band::with_mask(values, mask).unwrap()]).unwrap();

        let state = ClassifierState::initialize(&stack, 2).unwrap();
        // Range comes from valid cells only: 0..10, not 0..1000.
        assert_eq!(state.means[(0, 0)], 0.0);
        assert_eq!(state.means[(0, 1)], 10.0);
    }

    #[test]
    fn test_initialize_all_masked_band_fails() {
        let values = arr2(&[[1.0, 2.0]]);
        let mask = arr2(&[[true, true]]);
        let stack = PixelStack::new(vec![Band::with_mask(values, mask).unwrap()]).unwrap();

        let result = ClassifierState::initialize(&stack, 2);
        assert!(matches!(result, Err(Error::InsufficientData { band: 0 })));
    }

    #[test]
    fn test_assign_nearest_mean() {
        let stack = single_band_stack(arr2(&[[0.0, 1.0, 9.0, 10.0]]));
        let state = ClassifierState::initialize(&stack, 2).unwrap();

        let labels = state.assign(&stack).unwrap();
        assert_eq!(labels[(0, 0)], 0);
        assert_eq!(labels[(0, 1)], 0);
        assert_eq!(labels[(0, 2)], 1);
        assert_eq!(labels[(0, 3)], 1);
    }

    #[test]
    fn test_assign_tie_breaks_to_lowest_index() {
        // Uniform band: all K initial means coincide, every distance ties.
        let stack = single_band_stack(arr2(&[[4.0, 4.0], [4.0, 4.0]]));
        let state = ClassifierState::initialize(&stack, 3).unwrap();

        let labels = state.assign(&stack).unwrap();
        for &label in labels.iter() {
            assert_eq!(label, 0, "ties must resolve to the lowest cluster index");
        }
    }

    #[test]
    fn test_assign_includes_masked_values() {
        // The masked cell's value (1000) is far from both means; it still
        // gets a label from its raw value, matching the source algorithm.
        let values = arr2(&[[0.0, 10.0, 1000.0]]);
        let mask = arr2(&[[false, false, true]]);
        let stack = PixelStack::new(vec![Band::with_mask(values, mask).unwrap()]).unwrap();

        let state = ClassifierState::initialize(&stack, 2).unwrap();
        let labels = state.assign(&stack).unwrap();
        assert_eq!(labels[(0, 2)], 1, "masked cell assigned by raw value");
    }

    #[test]
    fn test_update_moves_means_and_tracks_extremes() {
        let stack = single_band_stack(arr2(&[[0.0, 2.0, 8.0, 10.0]]));
        let mut state = ClassifierState::initialize(&stack, 2).unwrap();

        let labels = state.assign(&stack).unwrap();
        state.update(&stack, &labels, MaskPolicy::IncludeMasked);

        assert!((state.means[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((state.means[(0, 1)] - 9.0).abs() < 1e-12);
        assert!((state.max_mean_delta - 1.0).abs() < 1e-12);
        assert_eq!(state.cluster_min[(0, 0)], 0.0);
        assert_eq!(state.cluster_max[(0, 0)], 2.0);
        assert_eq!(state.cluster_min[(0, 1)], 8.0);
        assert_eq!(state.cluster_max[(0, 1)], 10.0);
    }

    #[test]
    fn test_update_empty_cluster_keeps_prior_values() {
        let stack = single_band_stack(arr2(&[[0.0, 0.5], [1.0, 0.2]]));
        let mut state = ClassifierState::initialize(&stack, 2).unwrap();

        // Force every pixel into cluster 0.
        let labels = Array2::zeros((2, 2));
        let prior_mean = state.means[(0, 1)];
        let prior_max = state.cluster_max[(0, 1)];
        let prior_min = state.cluster_min[(0, 1)];

        state.update(&stack, &labels, MaskPolicy::IncludeMasked);

        assert_eq!(state.means[(0, 1)], prior_mean, "empty cluster must not move");
        assert_eq!(state.cluster_max[(0, 1)], prior_max);
        assert_eq!(state.cluster_min[(0, 1)], prior_min);
        assert!(state.cluster_max[(0, 1)].is_finite());
    }

    #[test]
    fn test_update_exclude_masked_policy() {
        let values = arr2(&[[0.0, 2.0, 1000.0]]);
        let mask = arr2(&[[false, false, true]]);
        let stack = PixelStack::new(vec![Band::with_mask(values, mask).unwrap()]).unwrap();
        let mut state = ClassifierState::initialize(&stack, 1).unwrap();

        let labels = state.assign(&stack).unwrap();

        let mut included = state.clone();
        included.update(&stack, &labels, MaskPolicy::IncludeMasked);
        assert!((included.means[(0, 0)] - 334.0).abs() < 1e-9);
        assert_eq!(included.cluster_max[(0, 0)], 1000.0);

        state.update(&stack, &labels, MaskPolicy::ExcludeMasked);
        assert!((state.means[(0, 0)] - 1.0).abs() < 1e-12);
        assert_eq!(state.cluster_max[(0, 0)], 2.0);
    }
}
