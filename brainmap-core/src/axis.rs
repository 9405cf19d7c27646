//! Axis descriptors
//!
//! This module defines how each of the two matrix axes is described in a
//! file header. Exactly one descriptor variant applies per axis.

pub mod brain_models;
pub mod maps;
pub mod parcels;

pub use brain_models::*;
pub use maps::*;
pub use parcels::*;

use crate::types::{MappingType, VoxelIjk};

/// Volume geometry shared by the voxels of an axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeSpace {
    /// Volume dimensions `(I, J, K)`
    pub dimensions: [i64; 3],
    /// Index-to-space affine, the first three rows of a 4x4 matrix
    pub sform: [[f32; 4]; 3],
}

impl VolumeSpace {
    /// Create a volume space from dimensions and affine rows
    pub const fn new(dimensions: [i64; 3], sform: [[f32; 4]; 3]) -> Self {
        Self { dimensions, sform }
    }

    /// Create a volume space with an identity affine
    pub const fn identity(dimensions: [i64; 3]) -> Self {
        Self {
            dimensions,
            sform: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    /// Whether a voxel index lies inside the dimensions
    pub fn contains(&self, ijk: VoxelIjk) -> bool {
        (0..3).all(|a| ijk[a] >= 0 && ijk[a] < self.dimensions[a])
    }

    /// Number of voxels in the bounding box, `None` if it overflows
    pub fn voxel_capacity(&self) -> Option<u64> {
        self.dimensions
            .iter()
            .try_fold(1u64, |n, &d| n.checked_mul(d.max(0) as u64))
    }
}

/// Header description of one matrix axis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisDescriptor {
    BrainModels(BrainModelsDescriptor),
    Parcels(ParcelsDescriptor),
    Labels(LabelsDescriptor),
    Scalars(ScalarsDescriptor),
    Series(SeriesDescriptor),
}

impl AxisDescriptor {
    /// Get the mapping type of this descriptor
    pub fn mapping_type(&self) -> MappingType {
        match self {
            AxisDescriptor::BrainModels(_) => MappingType::BrainModels,
            AxisDescriptor::Parcels(_) => MappingType::Parcels,
            AxisDescriptor::Labels(_) => MappingType::Labels,
            AxisDescriptor::Scalars(_) => MappingType::Scalars,
            AxisDescriptor::Series(_) => MappingType::Series,
        }
    }

    /// Number of matrix indices this axis describes
    pub fn len(&self) -> usize {
        match self {
            AxisDescriptor::BrainModels(d) => d.len(),
            AxisDescriptor::Parcels(d) => d.parcels.len(),
            AxisDescriptor::Labels(d) => d.maps.len(),
            AxisDescriptor::Scalars(d) => d.maps.len(),
            AxisDescriptor::Series(d) => d.length,
        }
    }

    /// Whether the axis describes no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the volume space, if this axis carries voxels
    pub fn volume_space(&self) -> Option<&VolumeSpace> {
        match self {
            AxisDescriptor::BrainModels(d) => d.volume_space.as_ref(),
            AxisDescriptor::Parcels(d) => d.volume_space.as_ref(),
            _ => None,
        }
    }
}

impl From<BrainModelsDescriptor> for AxisDescriptor {
    fn from(value: BrainModelsDescriptor) -> Self {
        AxisDescriptor::BrainModels(value)
    }
}

impl From<ParcelsDescriptor> for AxisDescriptor {
    fn from(value: ParcelsDescriptor) -> Self {
        AxisDescriptor::Parcels(value)
    }
}

impl From<LabelsDescriptor> for AxisDescriptor {
    fn from(value: LabelsDescriptor) -> Self {
        AxisDescriptor::Labels(value)
    }
}

impl From<ScalarsDescriptor> for AxisDescriptor {
    fn from(value: ScalarsDescriptor) -> Self {
        AxisDescriptor::Scalars(value)
    }
}

impl From<SeriesDescriptor> for AxisDescriptor {
    fn from(value: SeriesDescriptor) -> Self {
        AxisDescriptor::Series(value)
    }
}
