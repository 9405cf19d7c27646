//! Map axis descriptors: labels, scalars and series

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::label::LabelTable;
use crate::palette::PaletteColorMapping;
use crate::types::SeriesUnit;

/// Name and free-form metadata of one map
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapAttributes {
    pub name: String,
    pub metadata: BTreeMap<String, String>,
}

impl MapAttributes {
    /// Create attributes with a name and no metadata
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A label map: attributes plus its label table
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelMap {
    pub attributes: MapAttributes,
    pub label_table: LabelTable,
}

/// Labels axis; one label map per index
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelsDescriptor {
    pub maps: Vec<LabelMap>,
}

impl LabelsDescriptor {
    /// Create an empty descriptor
    pub const fn new() -> Self {
        Self { maps: Vec::new() }
    }

    /// Append a map
    pub fn with_map(mut self, attributes: MapAttributes, label_table: LabelTable) -> Self {
        self.maps.push(LabelMap {
            attributes,
            label_table,
        });
        self
    }
}

/// A scalar map: attributes plus its palette settings
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarMap {
    pub attributes: MapAttributes,
    pub palette: PaletteColorMapping,
}

/// Scalars axis; one scalar map per index
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarsDescriptor {
    pub maps: Vec<ScalarMap>,
}

impl ScalarsDescriptor {
    /// Create an empty descriptor
    pub const fn new() -> Self {
        Self { maps: Vec::new() }
    }

    /// Append a map
    pub fn with_map(mut self, attributes: MapAttributes, palette: PaletteColorMapping) -> Self {
        self.maps.push(ScalarMap {
            attributes,
            palette,
        });
        self
    }
}

/// Series axis; maps sampled at `start + index * step`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesDescriptor {
    pub length: usize,
    pub start: f32,
    pub step: f32,
    pub unit: SeriesUnit,
}

impl SeriesDescriptor {
    /// Create a series with explicit interval
    pub const fn new(length: usize, start: f32, step: f32, unit: SeriesUnit) -> Self {
        Self {
            length,
            start,
            step,
            unit,
        }
    }

    /// Create a series with no declared interval
    pub const fn unitless(length: usize) -> Self {
        Self::new(length, 1.0, 1.0, SeriesUnit::Unknown)
    }
}
