//! Unsupervised classification
//!
//! Iterative minimum-distance clustering of multi-band imagery:
//! - Range-seeded class means, one set per band
//! - Nearest-mean pixel assignment in B-dimensional band space
//! - Mean/max/min recomputation per cluster with empty-cluster stability

mod minimum_distance;
mod state;

pub use minimum_distance::{
    classify, classify_with_observer, Classification, ClassifyParams, IterationUpdate,
    MaskPolicy, MinimumDistance, Termination,
};

/// Cluster index per pixel, shape H×W, values in `[0, K)`
pub type LabelRaster = ndarray::Array2<usize>;
