//! Owned in-memory matrix

use brainmap_core::{BrainmapError, MatrixHeader, MatrixReader, Result};
use rayon::prelude::*;

use super::{check_index, check_length, finite_range};

/// Dense row-major matrix held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryMatrix {
    header: MatrixHeader,
    rows: usize,
    columns: usize,
    data: Vec<f32>,
}

impl InMemoryMatrix {
    /// Create a matrix whose dimensions follow the header's axis lengths
    pub fn new(header: MatrixHeader, data: Vec<f32>) -> Result<Self> {
        let (rows, columns) = header.dimensions();
        Self::with_dimensions(header, rows, columns, data)
    }

    /// Create a matrix with explicit dimensions
    ///
    /// The header is not checked against the dimensions here; opening the
    /// matrix as a brainordinate file does that.
    pub fn with_dimensions(
        header: MatrixHeader,
        rows: usize,
        columns: usize,
        data: Vec<f32>,
    ) -> Result<Self> {
        if rows.checked_mul(columns) != Some(data.len()) {
            return Err(BrainmapError::BufferLengthMismatch);
        }
        Ok(Self {
            header,
            rows,
            columns,
            data,
        })
    }

    /// Parse a container image
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (prefix, header) = super::container::decode_header(bytes)?;
        let offset = prefix.data_offset()?;
        let len = prefix.data_len()?;

        let mut data = vec![0.0f32; len / 4];
        super::read_le_f32(&bytes[offset..offset + len], &mut data);
        tracing::debug!(rows = prefix.rows, columns = prefix.columns, "parsed in-memory matrix");
        Self::with_dimensions(header, prefix.rows as usize, prefix.columns as usize, data)
    }

    /// Serialize to a container image
    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        super::container::encode(&self.header, self.rows, self.columns, &self.data)
    }

    /// Get the row-major data
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_parts(self) -> (MatrixHeader, Vec<f32>) {
        (self.header, self.data)
    }
}

impl MatrixReader for InMemoryMatrix {
    fn number_of_rows(&self) -> usize {
        self.rows
    }

    fn number_of_columns(&self) -> usize {
        self.columns
    }

    fn get_row(&self, buf: &mut [f32], index: usize) -> Result<()> {
        check_index(index, self.rows)?;
        check_length(buf.len(), self.columns)?;
        let start = index * self.columns;
        buf.copy_from_slice(&self.data[start..start + self.columns]);
        Ok(())
    }

    fn get_column(&self, buf: &mut [f32], index: usize) -> Result<()> {
        check_index(index, self.columns)?;
        check_length(buf.len(), self.rows)?;
        for (row, value) in buf.iter_mut().enumerate() {
            *value = self.data[row * self.columns + index];
        }
        Ok(())
    }

    fn set_row(&mut self, buf: &[f32], index: usize) -> Result<()> {
        check_index(index, self.rows)?;
        check_length(buf.len(), self.columns)?;
        let start = index * self.columns;
        self.data[start..start + self.columns].copy_from_slice(buf);
        Ok(())
    }

    fn set_column(&mut self, buf: &[f32], index: usize) -> Result<()> {
        check_index(index, self.columns)?;
        check_length(buf.len(), self.rows)?;
        for (row, &value) in buf.iter().enumerate() {
            self.data[row * self.columns + index] = value;
        }
        Ok(())
    }

    fn header(&self) -> &MatrixHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut MatrixHeader {
        &mut self.header
    }

    fn data_range_from_all_maps(&self) -> Option<(f32, f32)> {
        finite_range(self.data.par_iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainmap_core::{BrainModelsDescriptor, SeriesDescriptor, Structure};

    fn matrix() -> InMemoryMatrix {
        let header = MatrixHeader::new(
            BrainModelsDescriptor::new().with_full_surface(Structure::CortexLeft, 3),
            SeriesDescriptor::unitless(2),
        );
        InMemoryMatrix::new(header, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn test_rows_and_columns() {
        let mut matrix = matrix();
        let mut row = [0.0; 2];
        matrix.get_row(&mut row, 1).unwrap();
        assert_eq!(row, [3.0, 4.0]);

        let mut column = [0.0; 3];
        matrix.get_column(&mut column, 1).unwrap();
        assert_eq!(column, [2.0, 4.0, 6.0]);

        matrix.set_column(&[-1.0, -2.0, -3.0], 0).unwrap();
        assert_eq!(matrix.data(), &[-1.0, 2.0, -2.0, 4.0, -3.0, 6.0]);
        assert_eq!(matrix.data_range_from_all_maps(), Some((-3.0, 6.0)));
    }

    #[test]
    fn test_bounds_and_lengths() {
        let mut matrix = matrix();
        let mut row = [0.0; 2];
        assert_eq!(matrix.get_row(&mut row, 3), Err(BrainmapError::IndexOutOfBounds));
        assert_eq!(
            matrix.set_row(&[0.0; 3], 0),
            Err(BrainmapError::BufferLengthMismatch)
        );
        assert!(InMemoryMatrix::new(matrix.header().clone(), vec![0.0; 5]).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_byte_image() {
        let matrix = matrix();
        let parsed = InMemoryMatrix::from_bytes(&matrix.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, matrix);
    }
}
