//! Cell rasters for gridded environment data (fuel numbers, moisture)

use crate::core_types::position::WorldPoint;
use crate::error::EnvironmentError;
use serde::{Deserialize, Serialize};

/// Row-major grid of values anchored at world (0, 0)
///
/// Cell `(col, row)` covers `[col × cell_size, (col + 1) × cell_size)` east
/// and the same north; row 0 is the southern edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raster<T> {
    cols: usize,
    rows: usize,
    cell_size: f64,
    values: Vec<T>,
}

impl<T: Copy> Raster<T> {
    /// Raster with every cell set to `value`
    pub fn filled(cols: usize, rows: usize, cell_size: f64, value: T) -> Self {
        Self {
            cols,
            rows,
            cell_size,
            values: vec![value; cols * rows],
        }
    }

    /// Raster from row-major values
    ///
    /// # Errors
    /// [`EnvironmentError::Malformed`] if `values` does not hold `cols × rows`
    /// entries or the cell size is not positive.
    pub fn from_values(
        cols: usize,
        rows: usize,
        cell_size: f64,
        values: Vec<T>,
    ) -> Result<Self, EnvironmentError> {
        if values.len() != cols * rows {
            return Err(EnvironmentError::Malformed(format!(
                "raster size mismatch: expected {cols}x{rows} = {} values, got {}",
                cols * rows,
                values.len()
            )));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(EnvironmentError::Malformed(format!(
                "raster cell size must be positive, got {cell_size}"
            )));
        }
        Ok(Self {
            cols,
            rows,
            cell_size,
            values,
        })
    }

    /// Value of the cell containing `point`
    ///
    /// # Errors
    /// [`EnvironmentError::OutOfBounds`] outside the raster.
    pub fn sample(&self, point: WorldPoint) -> Result<T, EnvironmentError> {
        self.index_of(point)
            .map(|index| self.values[index])
            .ok_or(EnvironmentError::OutOfBounds {
                east: point.x,
                north: point.y,
            })
    }

    /// Overwrite one cell; out-of-range indices are ignored
    pub fn set(&mut self, col: usize, row: usize, value: T) {
        if col < self.cols && row < self.rows {
            self.values[row * self.cols + col] = value;
        }
    }

    fn index_of(&self, point: WorldPoint) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let col = (point.x / self.cell_size).floor() as usize;
        let row = (point.y / self.cell_size).floor() as usize;
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}
