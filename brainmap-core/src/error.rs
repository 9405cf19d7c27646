//! Error types for matrix reader operations

/// Errors reported by matrix readers and header validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrainmapError {
    /// Malformed or unsupported header
    InvalidHeader,
    /// Row or column index out of bounds
    IndexOutOfBounds,
    /// Caller buffer does not match the row or column length
    BufferLengthMismatch,
    /// Reader was opened without write access
    ReadOnly,
    /// Underlying storage failed
    Io,
    /// Operation not supported by this reader
    UnsupportedOperation,
}

impl core::fmt::Display for BrainmapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            BrainmapError::InvalidHeader => "Invalid matrix header",
            BrainmapError::IndexOutOfBounds => "Index out of bounds",
            BrainmapError::BufferLengthMismatch => "Buffer length does not match matrix dimension",
            BrainmapError::ReadOnly => "Matrix is read-only",
            BrainmapError::Io => "Matrix storage I/O failure",
            BrainmapError::UnsupportedOperation => "Operation not supported by reader",
        };
        write!(f, "{msg}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BrainmapError {}

/// Result type for reader operations
pub type Result<T> = core::result::Result<T, BrainmapError>;
