//! File kinds, modes and data access directions
//!
//! The pair of axis mapping types decides everything here, once, at open.

use std::fmt;

use brainmap_core::{MappingType, MatrixAxis};

/// Whether a file holds many maps or one implicit map per loaded row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Both axes are brainordinates; the single map is the loaded row
    Matrix,
    /// One axis is brainordinates, the other enumerates maps
    MultiMap,
}

/// Which reader accessor retrieves one map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAccess {
    Rows,
    Columns,
}

/// Concrete file kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    DenseLabel,
    DenseScalar,
    DenseSeries,
    ParcelLabel,
    ParcelScalar,
    ParcelSeries,
    /// Brain models by brain models connectivity
    Dense,
    /// Parcels by parcels connectivity
    Parcel,
    /// Brain model rows, parcel columns
    DenseParcel,
    /// Parcel rows, brain model columns
    ParcelDense,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::DenseLabel => "dense label",
            FileKind::DenseScalar => "dense scalar",
            FileKind::DenseSeries => "dense series",
            FileKind::ParcelLabel => "parcel label",
            FileKind::ParcelScalar => "parcel scalar",
            FileKind::ParcelSeries => "parcel series",
            FileKind::Dense => "dense connectivity",
            FileKind::Parcel => "parcel connectivity",
            FileKind::DenseParcel => "dense-parcel connectivity",
            FileKind::ParcelDense => "parcel-dense connectivity",
        };
        f.write_str(name)
    }
}

impl FileKind {
    /// Whether identification reads all maps at once from one brainordinate
    ///
    /// Dense multi-map kinds do; parcel and connectivity kinds identify
    /// each map on its own.
    pub const fn identifies_from_series(self) -> bool {
        matches!(
            self,
            FileKind::DenseLabel | FileKind::DenseScalar | FileKind::DenseSeries
        )
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileMode::Matrix => f.write_str("matrix"),
            FileMode::MultiMap => f.write_str("multi-map"),
        }
    }
}

/// Resolved layout of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLayout {
    pub mode: FileMode,
    pub kind: FileKind,
    pub access: DataAccess,
    /// Axis whose indices are brainordinates for map data
    pub brainordinate_axis: MatrixAxis,
}

impl FileLayout {
    /// Resolve the layout for a row and column mapping type pair
    ///
    /// Returns `None` when neither axis is a brainordinate axis.
    pub fn classify(row: MappingType, column: MappingType) -> Option<Self> {
        use MappingType::*;

        let layout = match (row, column) {
            (BrainModels, BrainModels) => Self::matrix(FileKind::Dense),
            (Parcels, Parcels) => Self::matrix(FileKind::Parcel),
            (BrainModels, Parcels) => Self::matrix(FileKind::DenseParcel),
            (Parcels, BrainModels) => Self::matrix(FileKind::ParcelDense),
            (brainordinates, maps) if brainordinates.is_brainordinate() => Self {
                mode: FileMode::MultiMap,
                kind: Self::multi_map_kind(brainordinates, maps)?,
                access: DataAccess::Columns,
                brainordinate_axis: MatrixAxis::Row,
            },
            (maps, brainordinates) if brainordinates.is_brainordinate() => Self {
                mode: FileMode::MultiMap,
                kind: Self::multi_map_kind(brainordinates, maps)?,
                access: DataAccess::Rows,
                brainordinate_axis: MatrixAxis::Column,
            },
            _ => return None,
        };
        Some(layout)
    }

    fn matrix(kind: FileKind) -> Self {
        Self {
            mode: FileMode::Matrix,
            kind,
            access: DataAccess::Rows,
            brainordinate_axis: MatrixAxis::Column,
        }
    }

    fn multi_map_kind(brainordinates: MappingType, maps: MappingType) -> Option<FileKind> {
        let parcels = brainordinates == MappingType::Parcels;
        Some(match (parcels, maps) {
            (false, MappingType::Labels) => FileKind::DenseLabel,
            (false, MappingType::Scalars) => FileKind::DenseScalar,
            (false, MappingType::Series) => FileKind::DenseSeries,
            (true, MappingType::Labels) => FileKind::ParcelLabel,
            (true, MappingType::Scalars) => FileKind::ParcelScalar,
            (true, MappingType::Series) => FileKind::ParcelSeries,
            _ => return None,
        })
    }

    /// Axis that enumerates maps, `None` in matrix mode
    pub fn map_axis(&self) -> Option<MatrixAxis> {
        match (self.mode, self.brainordinate_axis) {
            (FileMode::Matrix, _) => None,
            (FileMode::MultiMap, MatrixAxis::Row) => Some(MatrixAxis::Column),
            (FileMode::MultiMap, MatrixAxis::Column) => Some(MatrixAxis::Row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_along_columns() {
        let layout = FileLayout::classify(MappingType::BrainModels, MappingType::Series).unwrap();
        assert_eq!(layout.mode, FileMode::MultiMap);
        assert_eq!(layout.kind, FileKind::DenseSeries);
        assert_eq!(layout.access, DataAccess::Columns);
        assert_eq!(layout.map_axis(), Some(MatrixAxis::Column));
    }

    #[test]
    fn test_maps_along_rows() {
        let layout = FileLayout::classify(MappingType::Labels, MappingType::Parcels).unwrap();
        assert_eq!(layout.kind, FileKind::ParcelLabel);
        assert_eq!(layout.access, DataAccess::Rows);
        assert_eq!(layout.brainordinate_axis, MatrixAxis::Column);
    }

    #[test]
    fn test_matrix_kinds() {
        let layout = FileLayout::classify(MappingType::Parcels, MappingType::BrainModels).unwrap();
        assert_eq!(layout.mode, FileMode::Matrix);
        assert_eq!(layout.kind, FileKind::ParcelDense);
        assert_eq!(layout.map_axis(), None);
    }

    #[test]
    fn test_series_identification_kinds() {
        assert!(FileKind::DenseLabel.identifies_from_series());
        assert!(FileKind::DenseSeries.identifies_from_series());
        assert!(!FileKind::ParcelScalar.identifies_from_series());
        assert!(!FileKind::Dense.identifies_from_series());
    }

    #[test]
    fn test_two_map_axes_rejected() {
        assert_eq!(FileLayout::classify(MappingType::Scalars, MappingType::Series), None);
        assert_eq!(FileLayout::classify(MappingType::Labels, MappingType::Labels), None);
    }
}
