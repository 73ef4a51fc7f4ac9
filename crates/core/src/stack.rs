//! Pixel stack: an ordered collection of aligned bands

use crate::band::Band;
use crate::error::{Error, Result};

/// An ordered collection of spectral bands sharing one image shape.
///
/// Invariants, enforced at construction: at least one band, and every band
/// has the same (rows, cols). Algorithms can therefore index all bands with
/// one pixel coordinate without re-checking shapes.
#[derive(Debug, Clone)]
pub struct PixelStack {
    bands: Vec<Band>,
}

impl PixelStack {
    /// Create a pixel stack from a non-empty vector of aligned bands
    pub fn new(bands: Vec<Band>) -> Result<Self> {
        let first = bands.first().ok_or(Error::EmptyStack)?;
        let (rows, cols) = first.shape();

        for band in &bands[1..] {
            let (ar, ac) = band.shape();
            if (ar, ac) != (rows, cols) {
                return Err(Error::ShapeMismatch {
                    er: rows,
                    ec: cols,
                    ar,
                    ac,
                });
            }
        }

        Ok(Self { bands })
    }

    /// Append a band, which must match the stack's shape
    pub fn push(&mut self, band: Band) -> Result<()> {
        let (rows, cols) = self.shape();
        let (ar, ac) = band.shape();
        if (ar, ac) != (rows, cols) {
            return Err(Error::ShapeMismatch {
                er: rows,
                ec: cols,
                ar,
                ac,
            });
        }
        self.bands.push(band);
        Ok(())
    }

    /// All bands, in order
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Band at index `i`
    pub fn band(&self, i: usize) -> Option<&Band> {
        self.bands.get(i)
    }

    /// Number of bands (B)
    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Image shape shared by all bands, as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.bands[0].shape()
    }
}
