//! Memory-mapped matrix file
//!
//! The whole container file is mapped; rows and columns are decoded straight
//! from the mapping. Header edits made through `header_mut` are kept in
//! memory only, while data writes go to the mapping and reach the file on
//! [`MappedMatrixFile::flush`] or drop.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use brainmap_core::{BrainmapError, MatrixHeader, MatrixReader, Result};
use memmap2::{Mmap, MmapMut, MmapOptions};
use rayon::prelude::*;
use tracing::{debug, error};

use super::container::{self, ContainerPrefix};
use super::{check_index, check_length, finite_range, read_le_f32, write_le_f32};

#[derive(Debug)]
enum Mapping {
    ReadOnly(Mmap),
    Writable(MmapMut),
}

impl Mapping {
    fn bytes(&self) -> &[u8] {
        match self {
            Mapping::ReadOnly(map) => map,
            Mapping::Writable(map) => map,
        }
    }
}

/// Dense matrix read through a memory-mapped container file
#[derive(Debug)]
pub struct MappedMatrixFile {
    path: PathBuf,
    header: MatrixHeader,
    rows: usize,
    columns: usize,
    data_offset: usize,
    mapping: Mapping,
}

impl MappedMatrixFile {
    /// Open a container file read-only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to open matrix file");
            BrainmapError::Io
        })?;
        // SAFETY: the mapping is read-only and owned by the returned value
        let map = unsafe { MmapOptions::new().map(&file) }.map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to map matrix file");
            BrainmapError::Io
        })?;
        Self::from_mapping(path, Mapping::ReadOnly(map))
    }

    /// Open a container file for reading and writing
    pub fn open_writable<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                error!(path = %path.display(), error = %e, "failed to open matrix file");
                BrainmapError::Io
            })?;
        // SAFETY: the mapping is owned by the returned value; concurrent
        // modification of the file by other processes is not supported
        let map = unsafe { MmapOptions::new().map_mut(&file) }.map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to map matrix file");
            BrainmapError::Io
        })?;
        Self::from_mapping(path, Mapping::Writable(map))
    }

    /// Write a new container file and open it for writing
    pub fn create<P: AsRef<Path>>(
        path: P,
        header: &MatrixHeader,
        rows: usize,
        columns: usize,
        data: &[f32],
    ) -> Result<Self> {
        let path = path.as_ref();
        let bytes = container::encode(header, rows, columns, data)?;
        std::fs::write(path, bytes).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to write matrix file");
            BrainmapError::Io
        })?;
        Self::open_writable(path)
    }

    fn from_mapping(path: &Path, mapping: Mapping) -> Result<Self> {
        let (prefix, header): (ContainerPrefix, MatrixHeader) =
            container::decode_header(mapping.bytes())?;
        let data_offset = prefix.data_offset()?;
        debug!(
            path = %path.display(),
            rows = prefix.rows,
            columns = prefix.columns,
            writable = matches!(mapping, Mapping::Writable(_)),
            "mapped matrix file"
        );
        Ok(Self {
            path: path.to_path_buf(),
            header,
            rows: prefix.rows as usize,
            columns: prefix.columns as usize,
            data_offset,
            mapping,
        })
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether data writes are allowed
    pub fn is_writable(&self) -> bool {
        matches!(self.mapping, Mapping::Writable(_))
    }

    /// Flush written data to the file
    pub fn flush(&self) -> Result<()> {
        match &self.mapping {
            Mapping::Writable(map) => map.flush().map_err(|e| {
                error!(path = %self.path.display(), error = %e, "failed to flush matrix file");
                BrainmapError::Io
            }),
            Mapping::ReadOnly(_) => Ok(()),
        }
    }

    fn data_bytes(&self) -> &[u8] {
        let len = self.rows * self.columns * 4;
        &self.mapping.bytes()[self.data_offset..self.data_offset + len]
    }

    fn data_bytes_mut(&mut self) -> Result<&mut [u8]> {
        let len = self.rows * self.columns * 4;
        let offset = self.data_offset;
        match &mut self.mapping {
            Mapping::Writable(map) => Ok(&mut map[offset..offset + len]),
            Mapping::ReadOnly(_) => Err(BrainmapError::ReadOnly),
        }
    }
}

impl MatrixReader for MappedMatrixFile {
    fn number_of_rows(&self) -> usize {
        self.rows
    }

    fn number_of_columns(&self) -> usize {
        self.columns
    }

    fn get_row(&self, buf: &mut [f32], index: usize) -> Result<()> {
        check_index(index, self.rows)?;
        check_length(buf.len(), self.columns)?;
        let start = index * self.columns * 4;
        read_le_f32(&self.data_bytes()[start..start + self.columns * 4], buf);
        Ok(())
    }

    fn get_column(&self, buf: &mut [f32], index: usize) -> Result<()> {
        check_index(index, self.columns)?;
        check_length(buf.len(), self.rows)?;
        let bytes = self.data_bytes();
        for (row, value) in buf.iter_mut().enumerate() {
            let at = (row * self.columns + index) * 4;
            read_le_f32(&bytes[at..at + 4], std::slice::from_mut(value));
        }
        Ok(())
    }

    fn set_row(&mut self, buf: &[f32], index: usize) -> Result<()> {
        check_index(index, self.rows)?;
        check_length(buf.len(), self.columns)?;
        let columns = self.columns;
        let bytes = self.data_bytes_mut()?;
        let start = index * columns * 4;
        write_le_f32(buf, &mut bytes[start..start + columns * 4]);
        Ok(())
    }

    fn set_column(&mut self, buf: &[f32], index: usize) -> Result<()> {
        check_index(index, self.columns)?;
        check_length(buf.len(), self.rows)?;
        let columns = self.columns;
        let bytes = self.data_bytes_mut()?;
        for (row, value) in buf.iter().enumerate() {
            let at = (row * columns + index) * 4;
            bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
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
        finite_range(
            self.data_bytes()
                .par_chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainmap_core::{BrainModelsDescriptor, SeriesDescriptor, Structure};

    fn header() -> MatrixHeader {
        MatrixHeader::new(
            BrainModelsDescriptor::new().with_full_surface(Structure::CortexRight, 2),
            SeriesDescriptor::unitless(3),
        )
    }

    #[test]
    fn test_create_write_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.bmat");
        let data = [0.5, 1.5, 2.5, -0.5, -1.5, -2.5];

        let mut file = MappedMatrixFile::create(&path, &header(), 2, 3, &data).unwrap();
        assert!(file.is_writable());
        file.set_column(&[10.0, 20.0], 2).unwrap();
        file.flush().unwrap();
        drop(file);

        let file = MappedMatrixFile::open(&path).unwrap();
        let mut row = [0.0; 3];
        file.get_row(&mut row, 1).unwrap();
        assert_eq!(row, [-0.5, -1.5, 20.0]);
        assert_eq!(file.header(), &header());
        assert_eq!(file.data_range_from_all_maps(), Some((-1.5, 20.0)));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ro.bmat");
        drop(MappedMatrixFile::create(&path, &header(), 2, 3, &[0.0; 6]).unwrap());

        let mut file = MappedMatrixFile::open(&path).unwrap();
        assert_eq!(file.set_row(&[1.0; 3], 0), Err(BrainmapError::ReadOnly));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MappedMatrixFile::open(dir.path().join("missing.bmat"));
        assert_eq!(result.unwrap_err(), BrainmapError::Io);
    }
}
