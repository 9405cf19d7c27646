//! Query results returned by the matrix file

use std::collections::BTreeSet;

use brainmap_core::VoxelIjk;

/// Data range reported for dense connectivity files
///
/// Rows of a dense matrix are loaded on demand, so the full range is never
/// scanned; correlation data is assumed.
pub const DENSE_DATA_RANGE: (f32, f32) = (-1.0, 1.0);

/// Minimum and maximum over all maps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRange {
    pub minimum: f32,
    pub maximum: f32,
    /// `false` when the range is a placeholder
    pub valid: bool,
}

impl DataRange {
    /// Placeholder covering every finite `f32`
    pub const UNKNOWN: Self = Self {
        minimum: -f32::MAX,
        maximum: f32::MAX,
        valid: false,
    };

    pub const fn new(minimum: f32, maximum: f32) -> Self {
        Self {
            minimum,
            maximum,
            valid: true,
        }
    }
}

/// Value of a map at one brainordinate
#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
    /// Data value, `None` for parcel names
    pub numeric: Option<f32>,
    /// Label name, parcel name or formatted value
    pub text: String,
}

/// Value of a map at the voxel enclosing a coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelValue {
    pub ijk: VoxelIjk,
    pub value: MapValue,
}

/// Label keys that disagree between a map's data and its label table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelValidation {
    /// Keys present in the data with no label
    pub missing_labels: BTreeSet<i32>,
    /// Labels never used by the data, the unassigned label excluded
    pub unused_labels: BTreeSet<i32>,
}

impl LabelValidation {
    /// Whether data and table agree
    pub fn is_consistent(&self) -> bool {
        self.missing_labels.is_empty() && self.unused_labels.is_empty()
    }
}
