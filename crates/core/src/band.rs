//! Spectral band type
//!
//! A band is one spectral channel of multi-spectral sensor imagery, stored
//! as a 2D grid of physical-unit values (reflectance or radiance) with an
//! optional validity mask. Masked cells are sensor fill values: they are
//! excluded from band statistics but the calibrated value is still stored.

use crate::error::{Error, Result};
use ndarray::Array2;

/// One spectral channel of a multi-spectral image.
///
/// Values are in physical units (reflectance/radiance), already calibrated
/// from raw digital counts. The mask marks invalid cells (`true` = masked).
/// A band is immutable once constructed.
///
/// # Example
///
/// ```ignore
/// use multispec_core::Band;
///
/// // Calibrate raw counts and mask everything above the valid range.
/// let band = Band::from_counts(&counts, 0.01, 316.97, 32767.0);
/// let (min, max) = band.valid_min_max().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Band {
    /// Physical-unit values in row-major order (row, col)
    values: Array2<f64>,
    /// Validity mask, `true` = invalid. `None` means every cell is valid.
    mask: Option<Array2<bool>>,
}

impl Band {
    /// Create a band from calibrated values with no masked cells
    pub fn new(values: Array2<f64>) -> Self {
        Self { values, mask: None }
    }

    /// Create a band from calibrated values and a validity mask
    ///
    /// The mask must have the same shape as the values.
    pub fn with_mask(values: Array2<f64>, mask: Array2<bool>) -> Result<Self> {
        if values.dim() != mask.dim() {
            let (er, ec) = values.dim();
            let (ar, ac) = mask.dim();
            return Err(Error::ShapeMismatch { er, ec, ar, ac });
        }
        Ok(Self {
            values,
            mask: Some(mask),
        })
    }

    /// Create an unmasked band from a flat vector
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        let values = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self::new(values))
    }

    /// Calibrate raw digital counts into a physical-unit band.
    ///
    /// Applies `scale * (count - offset)` to every cell and masks cells
    /// whose raw count exceeds `valid_max` (the sensor's declared
    /// valid-range upper bound). The calibrated value is kept even for
    /// masked cells.
    pub fn from_counts(counts: &Array2<f64>, scale: f64, offset: f64, valid_max: f64) -> Self {
        let values = counts.mapv(|c| scale * (c - offset));
        let mask = counts.mapv(|c| c > valid_max);
        Self {
            values,
            mask: Some(mask),
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    // Data access

    /// Get the value at (row, col)
    pub fn value(&self, row: usize, col: usize) -> Result<f64> {
        self.values
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Whether the cell at (row, col) is masked (invalid)
    pub fn is_masked(&self, row: usize, col: usize) -> Result<bool> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.is_masked_unchecked(row, col))
    }

    /// Whether the cell at (row, col) is masked, without bounds checking.
    ///
    /// Out-of-range indices on a masked band panic via `ndarray` indexing.
    pub fn is_masked_unchecked(&self, row: usize, col: usize) -> bool {
        match &self.mask {
            Some(mask) => mask[(row, col)],
            None => false,
        }
    }

    /// Get a reference to the underlying value array
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Get the validity mask, if any
    pub fn mask(&self) -> Option<&Array2<bool>> {
        self.mask.as_ref()
    }

    // Statistics

    /// Count of valid (unmasked) cells
    pub fn valid_count(&self) -> usize {
        match &self.mask {
            Some(mask) => mask.iter().filter(|&&m| !m).count(),
            None => self.values.len(),
        }
    }

    /// Minimum and maximum over valid cells only.
    ///
    /// Masked cells and NaN values are skipped. Returns `None` when the
    /// band has no valid cells at all.
    pub fn valid_min_max(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut found = false;

        for ((row, col), &v) in self.values.indexed_iter() {
            if self.is_masked_unchecked(row, col) || v.is_nan() {
                continue;
            }
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
            found = true;
        }

        if found {
            Some((min, max))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_band_creation() {
        let band = Band::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        assert_eq!(band.rows(), 2);
        assert_eq!(band.cols(), 3);
        assert_eq!(band.shape(), (2, 3));
        assert_eq!(band.value(1, 2).unwrap(), 6.0);
        assert!(!band.is_masked(1, 2).unwrap());
    }

    #[test]
    fn test_band_from_vec_wrong_length() {
        let result = Band::from_vec(vec![1.0, 2.0, 3.0], 2, 2);
        assert!(result.is_err());
    }

    #[test]
    fn test_band_mask_shape_mismatch() {
        let values = Array2::zeros((3, 3));
        let mask = Array2::from_elem((2, 3), false);
        assert!(Band::with_mask(values, mask).is_err());
    }

    #[test]
    fn test_from_counts_calibration() {
        let counts = arr2(&[[100.0, 200.0], [300.0, 40000.0]]);
        let band = Band::from_counts(&counts, 0.5, 100.0, 32767.0);

        // 0.5 * (100 - 100) = 0, 0.5 * (200 - 100) = 50
        assert_eq!(band.value(0, 0).unwrap(), 0.0);
        assert_eq!(band.value(0, 1).unwrap(), 50.0);

        // Count 40000 exceeds the valid range, so the cell is masked but
        // the calibrated value is still stored.
        assert!(band.is_masked(1, 1).unwrap());
        assert_eq!(band.value(1, 1).unwrap(), 0.5 * (40000.0 - 100.0));
        assert!(!band.is_masked(1, 0).unwrap());
    }

    #[test]
    fn test_valid_min_max_skips_masked() {
        let values = arr2(&[[1.0, 2.0], [3.0, 999.0]]);
        let mask = arr2(&[[false, false], [false, true]]);
        let band = Band::with_mask(values, mask).unwrap();

        let (min, max) = band.valid_min_max().unwrap();
        assert_eq!(min, 1.0);
        assert_eq!(max, 3.0);
        assert_eq!(band.valid_count(), 3);
    }

    #[test]
    fn test_valid_min_max_all_masked() {
        let values = arr2(&[[1.0, 2.0]]);
        let mask = arr2(&[[true, true]]);
        let band = Band::with_mask(values, mask).unwrap();
        assert!(band.valid_min_max().is_none());
        assert_eq!(band.valid_count(), 0);
    }

    #[test]
    fn test_valid_min_max_skips_nan() {
        let band = Band::new(arr2(&[[f64::NAN, 5.0], [2.0, 7.0]]));
        let (min, max) = band.valid_min_max().unwrap();
        assert_eq!(min, 2.0);
        assert_eq!(max, 7.0);
    }
}
