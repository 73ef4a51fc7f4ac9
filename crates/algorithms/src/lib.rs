//! # Multispec Algorithms
//!
//! Classification algorithms for multispectral satellite imagery.
//!
//! ## Available Algorithm Categories
//!
//! - **classification**: Iterative minimum-distance (k-means style)
//!   unsupervised classification of a multi-band pixel stack

pub mod classification;
pub mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classification::{
        classify, classify_with_observer, Classification, ClassifyParams, IterationUpdate,
        LabelRaster, MaskPolicy, MinimumDistance, Termination,
    };
    pub use multispec_core::prelude::*;
}
