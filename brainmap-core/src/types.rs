//! Shared enumerations for brainordinate mapping
//!
//! This module defines the small value types used throughout the header
//! model: anatomical structures, mapping types, matrix axes, slice planes,
//! series units and display groups.

/// Voxel index triple `(i, j, k)`
pub type VoxelIjk = [i64; 3];

/// Anatomical structure tag partitioning brainordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Structure {
    CortexLeft = 0,
    CortexRight = 1,
    Cerebellum = 2,
    AccumbensLeft = 3,
    AccumbensRight = 4,
    AmygdalaLeft = 5,
    AmygdalaRight = 6,
    BrainStem = 7,
    CaudateLeft = 8,
    CaudateRight = 9,
    CerebellumLeft = 10,
    CerebellumRight = 11,
    DiencephalonVentralLeft = 12,
    DiencephalonVentralRight = 13,
    HippocampusLeft = 14,
    HippocampusRight = 15,
    PallidumLeft = 16,
    PallidumRight = 17,
    PutamenLeft = 18,
    PutamenRight = 19,
    ThalamusLeft = 20,
    ThalamusRight = 21,
    Other = 22,
    Invalid = 255,
}

impl Structure {
    /// All valid structures, in tag order
    pub const ALL: [Structure; 23] = [
        Structure::CortexLeft,
        Structure::CortexRight,
        Structure::Cerebellum,
        Structure::AccumbensLeft,
        Structure::AccumbensRight,
        Structure::AmygdalaLeft,
        Structure::AmygdalaRight,
        Structure::BrainStem,
        Structure::CaudateLeft,
        Structure::CaudateRight,
        Structure::CerebellumLeft,
        Structure::CerebellumRight,
        Structure::DiencephalonVentralLeft,
        Structure::DiencephalonVentralRight,
        Structure::HippocampusLeft,
        Structure::HippocampusRight,
        Structure::PallidumLeft,
        Structure::PallidumRight,
        Structure::PutamenLeft,
        Structure::PutamenRight,
        Structure::ThalamusLeft,
        Structure::ThalamusRight,
        Structure::Other,
    ];

    /// Get the canonical upper-case name, e.g. `CORTEX_LEFT`
    pub const fn name(&self) -> &'static str {
        match self {
            Structure::CortexLeft => "CORTEX_LEFT",
            Structure::CortexRight => "CORTEX_RIGHT",
            Structure::Cerebellum => "CEREBELLUM",
            Structure::AccumbensLeft => "ACCUMBENS_LEFT",
            Structure::AccumbensRight => "ACCUMBENS_RIGHT",
            Structure::AmygdalaLeft => "AMYGDALA_LEFT",
            Structure::AmygdalaRight => "AMYGDALA_RIGHT",
            Structure::BrainStem => "BRAIN_STEM",
            Structure::CaudateLeft => "CAUDATE_LEFT",
            Structure::CaudateRight => "CAUDATE_RIGHT",
            Structure::CerebellumLeft => "CEREBELLUM_LEFT",
            Structure::CerebellumRight => "CEREBELLUM_RIGHT",
            Structure::DiencephalonVentralLeft => "DIENCEPHALON_VENTRAL_LEFT",
            Structure::DiencephalonVentralRight => "DIENCEPHALON_VENTRAL_RIGHT",
            Structure::HippocampusLeft => "HIPPOCAMPUS_LEFT",
            Structure::HippocampusRight => "HIPPOCAMPUS_RIGHT",
            Structure::PallidumLeft => "PALLIDUM_LEFT",
            Structure::PallidumRight => "PALLIDUM_RIGHT",
            Structure::PutamenLeft => "PUTAMEN_LEFT",
            Structure::PutamenRight => "PUTAMEN_RIGHT",
            Structure::ThalamusLeft => "THALAMUS_LEFT",
            Structure::ThalamusRight => "THALAMUS_RIGHT",
            Structure::Other => "OTHER",
            Structure::Invalid => "INVALID",
        }
    }

    /// Look up a structure by its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl From<u8> for Structure {
    fn from(value: u8) -> Self {
        Self::ALL
            .get(value as usize)
            .copied()
            .unwrap_or(Structure::Invalid)
    }
}

impl core::fmt::Display for Structure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mapping type governing one matrix axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MappingType {
    /// Surface nodes and voxels, one offset each
    BrainModels = 0,
    /// Named aggregates of brainordinates
    Parcels = 1,
    /// Maps colored with a label table
    Labels = 2,
    /// Maps colored with a palette
    Scalars = 3,
    /// Maps sampled at regular intervals
    Series = 4,
}

impl MappingType {
    /// Whether this axis addresses brainordinates (as opposed to maps)
    pub const fn is_brainordinate(&self) -> bool {
        matches!(self, MappingType::BrainModels | MappingType::Parcels)
    }
}

impl From<u8> for MappingType {
    fn from(value: u8) -> Self {
        match value {
            0 => MappingType::BrainModels,
            1 => MappingType::Parcels,
            2 => MappingType::Labels,
            3 => MappingType::Scalars,
            4 => MappingType::Series,
            _ => MappingType::Scalars, // Default fallback
        }
    }
}

impl core::fmt::Display for MappingType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MappingType::BrainModels => write!(f, "BRAIN_MODELS"),
            MappingType::Parcels => write!(f, "PARCELS"),
            MappingType::Labels => write!(f, "LABELS"),
            MappingType::Scalars => write!(f, "SCALARS"),
            MappingType::Series => write!(f, "SERIES"),
        }
    }
}

/// One of the two matrix dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixAxis {
    /// Row indices (length = number of rows)
    Row,
    /// Column indices (length = number of columns)
    Column,
}

impl core::fmt::Display for MatrixAxis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixAxis::Row => write!(f, "row"),
            MatrixAxis::Column => write!(f, "column"),
        }
    }
}

/// Volume slice plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Constant K, spans I and J
    Axial,
    /// Constant J, spans I and K
    Coronal,
    /// Constant I, spans J and K
    Parasagittal,
}

/// Units of a series axis interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeriesUnit {
    #[default]
    Unknown,
    Seconds,
    Milliseconds,
    Microseconds,
    Hertz,
    PartsPerMillion,
}

impl core::fmt::Display for SeriesUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SeriesUnit::Unknown => write!(f, "unknown"),
            SeriesUnit::Seconds => write!(f, "seconds"),
            SeriesUnit::Milliseconds => write!(f, "milliseconds"),
            SeriesUnit::Microseconds => write!(f, "microseconds"),
            SeriesUnit::Hertz => write!(f, "hertz"),
            SeriesUnit::PartsPerMillion => write!(f, "parts per million"),
        }
    }
}

/// Display group used when asking whether a label is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayGroup {
    /// Selection belongs to the browser tab itself
    #[default]
    Tab,
    A,
    B,
    C,
    D,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_names_round_trip() {
        for structure in Structure::ALL {
            assert_eq!(Structure::from_name(structure.name()), Some(structure));
        }
        assert_eq!(Structure::from_name("NOT_A_STRUCTURE"), None);
    }

    #[test]
    fn test_structure_from_u8_fallback() {
        assert_eq!(Structure::from(1), Structure::CortexRight);
        assert_eq!(Structure::from(200), Structure::Invalid);
    }

    #[test]
    fn test_mapping_type_brainordinate() {
        assert!(MappingType::BrainModels.is_brainordinate());
        assert!(MappingType::Parcels.is_brainordinate());
        assert!(!MappingType::Series.is_brainordinate());
        assert_eq!(MappingType::from(2), MappingType::Labels);
    }
}
