//! # Multispec Core
//!
//! Core types for the multispec image-classification library.
//!
//! This crate provides:
//! - `Band`: one spectral channel with physical-unit values and a validity mask
//! - `PixelStack`: an aligned, non-empty collection of bands
//! - The error taxonomy shared by all algorithms
//! - The `Algorithm` trait for consistent API

pub mod band;
pub mod error;
pub mod stack;

pub use band::Band;
pub use error::{Error, Result};
pub use stack::PixelStack;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::band::Band;
    pub use crate::error::{Error, Result};
    pub use crate::stack::PixelStack;
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in multispec.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
