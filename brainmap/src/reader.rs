//! Reference matrix readers
//!
//! This module provides two [`MatrixReader`] implementations: an owned
//! in-memory buffer and a memory-mapped file. Both store the same container
//! image (see [`container`]): a fixed prefix, a JSON header and row-major
//! little-endian `f32` data.
//!
//! [`MatrixReader`]: brainmap_core::MatrixReader

#[cfg(feature = "serde")]
pub mod container;
pub mod in_memory;
#[cfg(all(feature = "mmap", feature = "serde"))]
pub mod mapped;

pub use in_memory::InMemoryMatrix;
#[cfg(all(feature = "mmap", feature = "serde"))]
pub use mapped::MappedMatrixFile;

use brainmap_core::{BrainmapError, Result};
use rayon::prelude::*;

/// Check a row or column index against its bound
#[inline]
pub(crate) fn check_index(index: usize, bound: usize) -> Result<()> {
    if index < bound {
        Ok(())
    } else {
        Err(BrainmapError::IndexOutOfBounds)
    }
}

/// Check a caller buffer length
#[inline]
pub(crate) fn check_length(actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(BrainmapError::BufferLengthMismatch)
    }
}

/// Minimum and maximum of the finite values, scanned in parallel
pub(crate) fn finite_range<I>(values: I) -> Option<(f32, f32)>
where
    I: ParallelIterator<Item = f32>,
{
    values
        .filter(|v| v.is_finite())
        .fold(
            || None,
            |acc: Option<(f32, f32)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            },
        )
        .reduce(
            || None,
            |a, b| match (a, b) {
                (Some((alo, ahi)), Some((blo, bhi))) => Some((alo.min(blo), ahi.max(bhi))),
                (range, None) | (None, range) => range,
            },
        )
}

/// Decode little-endian `f32` values into `out`
pub(crate) fn read_le_f32(bytes: &[u8], out: &mut [f32]) {
    #[cfg(target_endian = "little")]
    {
        if let Ok(values) = bytemuck::try_cast_slice::<u8, f32>(bytes) {
            out.copy_from_slice(values);
            return;
        }
    }
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

/// Encode `values` as little-endian `f32` into `out`
pub(crate) fn write_le_f32(values: &[f32], out: &mut [u8]) {
    #[cfg(target_endian = "little")]
    {
        if let Ok(slots) = bytemuck::try_cast_slice_mut::<u8, f32>(out) {
            slots.copy_from_slice(values);
            return;
        }
    }
    for (value, chunk) in values.iter().zip(out.chunks_exact_mut(4)) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
}
