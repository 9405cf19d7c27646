//! Matrix container layout
//!
//! ```text
//! offset  size  field
//! 0       4     magic "BMAT"
//! 4       1     version
//! 5       3     padding
//! 8       8     number of rows (u64 LE)
//! 16      8     number of columns (u64 LE)
//! 24      8     header JSON length in bytes (u64 LE)
//! 32      n     header JSON, zero padded to a multiple of 8
//! ...           rows * columns f32 LE, row-major
//! ```

use brainmap_core::{BrainmapError, MatrixHeader, Result};
use tracing::warn;

use super::write_le_f32;

/// Magic bytes of a container image
pub const MAGIC: [u8; 4] = *b"BMAT";

/// Current container version
pub const VERSION: u8 = 1;

/// Size of the fixed prefix
pub const PREFIX_SIZE: usize = 32;

/// Alignment of the header and data regions
pub const ALIGNMENT: usize = 8;

/// Fixed-size prefix of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerPrefix {
    pub version: u8,
    pub rows: u64,
    pub columns: u64,
    pub header_len: u64,
}

impl ContainerPrefix {
    /// Parse the prefix from the start of an image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PREFIX_SIZE {
            return Err(BrainmapError::InvalidHeader);
        }
        if bytes[0..4] != MAGIC {
            return Err(BrainmapError::InvalidHeader);
        }
        let version = bytes[4];
        if version > VERSION {
            warn!(version, "unsupported container version");
            return Err(BrainmapError::InvalidHeader);
        }

        let read_u64 = |at: usize| {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[at..at + 8]);
            u64::from_le_bytes(word)
        };
        Ok(Self {
            version,
            rows: read_u64(8),
            columns: read_u64(16),
            header_len: read_u64(24),
        })
    }

    /// Serialize the prefix
    pub fn to_bytes(&self) -> [u8; PREFIX_SIZE] {
        let mut bytes = [0u8; PREFIX_SIZE];
        bytes[0..4].copy_from_slice(&MAGIC);
        bytes[4] = self.version;
        bytes[8..16].copy_from_slice(&self.rows.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.columns.to_le_bytes());
        bytes[24..32].copy_from_slice(&self.header_len.to_le_bytes());
        bytes
    }

    /// Byte offset of the matrix data
    pub fn data_offset(&self) -> Result<usize> {
        let header_len = usize::try_from(self.header_len).map_err(|_| BrainmapError::InvalidHeader)?;
        PREFIX_SIZE
            .checked_add(header_len.next_multiple_of(ALIGNMENT))
            .ok_or(BrainmapError::InvalidHeader)
    }

    /// Number of data bytes
    pub fn data_len(&self) -> Result<usize> {
        let rows = usize::try_from(self.rows).map_err(|_| BrainmapError::InvalidHeader)?;
        let columns = usize::try_from(self.columns).map_err(|_| BrainmapError::InvalidHeader)?;
        rows.checked_mul(columns)
            .and_then(|n| n.checked_mul(4))
            .ok_or(BrainmapError::InvalidHeader)
    }
}

/// Parse the prefix and header of an image and check the data fits
pub fn decode_header(bytes: &[u8]) -> Result<(ContainerPrefix, MatrixHeader)> {
    let prefix = ContainerPrefix::from_bytes(bytes)?;
    let header_end = PREFIX_SIZE
        .checked_add(prefix.header_len as usize)
        .ok_or(BrainmapError::InvalidHeader)?;
    let json = bytes
        .get(PREFIX_SIZE..header_end)
        .ok_or(BrainmapError::InvalidHeader)?;
    let header: MatrixHeader = serde_json::from_slice(json).map_err(|e| {
        warn!(error = %e, "matrix header is not valid JSON");
        BrainmapError::InvalidHeader
    })?;

    let data_end = prefix
        .data_offset()?
        .checked_add(prefix.data_len()?)
        .ok_or(BrainmapError::InvalidHeader)?;
    if bytes.len() < data_end {
        return Err(BrainmapError::BufferLengthMismatch);
    }
    Ok((prefix, header))
}

/// Build a complete image from a header and row-major data
pub fn encode(header: &MatrixHeader, rows: usize, columns: usize, data: &[f32]) -> Result<Vec<u8>> {
    if rows.checked_mul(columns) != Some(data.len()) {
        return Err(BrainmapError::BufferLengthMismatch);
    }
    let json = serde_json::to_vec(header).map_err(|_| BrainmapError::InvalidHeader)?;
    let prefix = ContainerPrefix {
        version: VERSION,
        rows: rows as u64,
        columns: columns as u64,
        header_len: json.len() as u64,
    };
    let data_offset = prefix.data_offset()?;

    let mut bytes = vec![0u8; data_offset + data.len() * 4];
    bytes[..PREFIX_SIZE].copy_from_slice(&prefix.to_bytes());
    bytes[PREFIX_SIZE..PREFIX_SIZE + json.len()].copy_from_slice(&json);
    write_le_f32(data, &mut bytes[data_offset..]);
    Ok(bytes)
}
