//! Matrix reader interface
//!
//! This module defines the abstract interface to a dense `f32` matrix whose
//! axes are described by a [`MatrixHeader`]. Storage, layout and I/O belong
//! entirely to the implementor.

use crate::axis::AxisDescriptor;
use crate::error::Result;
use crate::header::MatrixHeader;
use crate::types::MatrixAxis;

/// Trait for dense matrix files with typed axis headers
///
/// Row and column accessors copy into caller-owned buffers whose length must
/// equal the number of columns (for a row) or rows (for a column).
pub trait MatrixReader {
    /// Get the number of rows
    fn number_of_rows(&self) -> usize;

    /// Get the number of columns
    fn number_of_columns(&self) -> usize;

    /// Copy a row into `buf`
    fn get_row(&self, buf: &mut [f32], index: usize) -> Result<()>;

    /// Copy a column into `buf`
    fn get_column(&self, buf: &mut [f32], index: usize) -> Result<()>;

    /// Overwrite a row from `buf`
    fn set_row(&mut self, buf: &[f32], index: usize) -> Result<()>;

    /// Overwrite a column from `buf`
    fn set_column(&mut self, buf: &[f32], index: usize) -> Result<()>;

    /// Get the parsed header
    fn header(&self) -> &MatrixHeader;

    /// Get the parsed header for editing palettes, labels and map names
    fn header_mut(&mut self) -> &mut MatrixHeader;

    /// Get the mapping descriptor for an axis
    fn axis_descriptor(&self, axis: MatrixAxis) -> &AxisDescriptor {
        self.header().axis(axis)
    }

    /// Get the minimum and maximum over all data, if the reader can
    ///
    /// Best effort; the default reports nothing.
    fn data_range_from_all_maps(&self) -> Option<(f32, f32)> {
        None
    }
}
