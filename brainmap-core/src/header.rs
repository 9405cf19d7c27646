//! Matrix file header
//!
//! The header describes both matrix axes and the file-level palette used by
//! files whose maps have no palette of their own.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::axis::AxisDescriptor;
use crate::palette::PaletteColorMapping;
use crate::types::MatrixAxis;

/// Number of implicit maps a well-formed matrix-type file declares
pub const IMPLICIT_MAP_COUNT: usize = 1;

#[cfg(feature = "serde")]
fn default_implicit_map_count() -> usize {
    IMPLICIT_MAP_COUNT
}

/// Typed header of a brainordinate matrix file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixHeader {
    /// Describes row indices
    pub row_axis: AxisDescriptor,
    /// Describes column indices
    pub column_axis: AxisDescriptor,
    /// Palette for series and matrix-type files
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_palette: PaletteColorMapping,
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_metadata: BTreeMap<String, String>,
    /// Maps declared by a matrix-type file (both axes brainordinates)
    #[cfg_attr(feature = "serde", serde(default = "default_implicit_map_count"))]
    pub implicit_map_count: usize,
}

impl MatrixHeader {
    /// Create a header from row and column descriptors
    pub fn new(row_axis: impl Into<AxisDescriptor>, column_axis: impl Into<AxisDescriptor>) -> Self {
        Self {
            row_axis: row_axis.into(),
            column_axis: column_axis.into(),
            file_palette: PaletteColorMapping::new(),
            file_metadata: BTreeMap::new(),
            implicit_map_count: IMPLICIT_MAP_COUNT,
        }
    }

    /// Set the file palette
    pub fn with_file_palette(mut self, palette: PaletteColorMapping) -> Self {
        self.file_palette = palette;
        self
    }

    /// Get the descriptor for an axis
    pub fn axis(&self, axis: MatrixAxis) -> &AxisDescriptor {
        match axis {
            MatrixAxis::Row => &self.row_axis,
            MatrixAxis::Column => &self.column_axis,
        }
    }

    /// Get the mutable descriptor for an axis
    pub fn axis_mut(&mut self, axis: MatrixAxis) -> &mut AxisDescriptor {
        match axis {
            MatrixAxis::Row => &mut self.row_axis,
            MatrixAxis::Column => &mut self.column_axis,
        }
    }

    /// Expected `(rows, columns)` derived from the axis lengths
    pub fn dimensions(&self) -> (usize, usize) {
        (self.row_axis.len(), self.column_axis.len())
    }
}
