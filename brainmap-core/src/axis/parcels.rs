//! Parcels axis descriptor

use alloc::string::String;
use alloc::vec::Vec;

use super::VolumeSpace;
use crate::types::{Structure, VoxelIjk};

/// A surface that parcels may draw nodes from
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParcelSurface {
    pub structure: Structure,
    pub number_of_nodes: usize,
}

/// A named aggregate of brainordinates
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parcel {
    pub name: String,
    /// Member nodes per structure
    pub surface_nodes: Vec<(Structure, Vec<usize>)>,
    /// Member voxels
    pub voxels: Vec<VoxelIjk>,
}

impl Parcel {
    /// Create an empty parcel
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surface_nodes: Vec::new(),
            voxels: Vec::new(),
        }
    }

    /// Add member nodes of a structure
    pub fn with_nodes(mut self, structure: Structure, nodes: Vec<usize>) -> Self {
        self.surface_nodes.push((structure, nodes));
        self
    }

    /// Add member voxels
    pub fn with_voxels(mut self, voxels: Vec<VoxelIjk>) -> Self {
        self.voxels.extend(voxels);
        self
    }
}

/// Parcels axis; one matrix index per parcel
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParcelsDescriptor {
    pub surfaces: Vec<ParcelSurface>,
    pub parcels: Vec<Parcel>,
    pub volume_space: Option<VolumeSpace>,
}

impl ParcelsDescriptor {
    /// Create an empty descriptor
    pub const fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            parcels: Vec::new(),
            volume_space: None,
        }
    }

    /// Declare a surface and its node count
    pub fn with_surface(mut self, structure: Structure, number_of_nodes: usize) -> Self {
        self.surfaces.push(ParcelSurface {
            structure,
            number_of_nodes,
        });
        self
    }

    /// Append a parcel
    pub fn with_parcel(mut self, parcel: Parcel) -> Self {
        self.parcels.push(parcel);
        self
    }

    /// Set the volume space for parcel voxels
    pub fn with_volume_space(mut self, space: VolumeSpace) -> Self {
        self.volume_space = Some(space);
        self
    }
}
