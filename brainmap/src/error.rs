//! Error types for opening and querying brainordinate matrix files

use brainmap_core::{BrainmapError, MappingType, Structure};

/// Result type for per-query operations
pub type Result<T> = std::result::Result<T, MatrixFileError>;

/// Failure to open a file; the file is left unopened
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// Axis pair is not one of the supported combinations
    #[error("unsupported axis combination: rows are {row}, columns are {column}")]
    InvalidAxisCombination { row: MappingType, column: MappingType },

    /// Descriptor length disagrees with the matrix dimension
    #[error("{axis} axis describes {described} indices but the matrix has {actual}")]
    AxisLengthMismatch {
        axis: &'static str,
        described: usize,
        actual: usize,
    },

    /// Matrix-type file declares more than one implicit map
    #[error("matrix file declares {0} implicit maps, expected exactly one")]
    MultipleImplicitMaps(usize),

    /// Volume data is missing its space, lies outside it, or the affine is singular
    #[error("invalid volume mapping: {0}")]
    InvalidVolume(String),

    /// Brain model or parcel references a node outside its surface
    #[error("invalid surface mapping for {structure}: {reason}")]
    InvalidSurface {
        structure: Structure,
        reason: String,
    },

    /// Reader failure while opening
    #[error("reader error: {0}")]
    Reader(#[from] BrainmapError),
}

/// Per-query failure; the file stays valid
#[derive(Debug, thiserror::Error)]
pub enum MatrixFileError {
    /// Map index beyond the number of maps
    #[error("map index {index} out of range ({count} maps)")]
    MapIndexOutOfRange { index: usize, count: usize },

    /// Structure and node count pair not present in this file
    #[error("{structure} with {surface_node_count} nodes is not mapped by this file")]
    NotMapped {
        structure: Structure,
        surface_node_count: usize,
    },

    /// Caller surface has a different node count than the file
    #[error("{structure} has {expected} nodes in this file, caller passed {actual}")]
    NodeCountMismatch {
        structure: Structure,
        expected: usize,
        actual: usize,
    },

    /// Coordinate outside the volume or not a mapped voxel
    #[error("coordinate {xyz:?} is outside the mapped volume")]
    OutOfBounds { xyz: [f32; 3] },

    /// Write refused for this file mode
    #[error("write rejected: {0}")]
    WriteRejected(&'static str),

    /// Map names and metadata cannot be edited for this file
    #[error("file has no map attributes")]
    MapAttributesUnavailable,

    /// Supplied data has the wrong length
    #[error("data length {actual} does not match expected {expected}")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Matrix-type map requested before a row was loaded
    #[error("no matrix row is loaded")]
    NoMatrixRowLoaded,

    /// Operation needs every element of a dense connectivity matrix, or
    /// an output larger than memory can address
    #[error("too many elements for this operation")]
    MatrixTooLarge,

    /// Operation does not apply to this file mode
    #[error("operation not supported for {0} files")]
    UnsupportedMode(&'static str),

    /// Index into the brainordinate or map axis is invalid
    #[error("index {index} out of range for axis of length {length}")]
    AxisIndexOutOfRange { index: usize, length: usize },

    /// Reader failure
    #[error("reader error: {0}")]
    Reader(#[from] BrainmapError),
}

impl MatrixFileError {
    /// Whether the error only means "nothing to show here"
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            MatrixFileError::NotMapped { .. } | MatrixFileError::OutOfBounds { .. }
        )
    }
}
