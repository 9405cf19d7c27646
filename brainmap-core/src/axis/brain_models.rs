//! Brain models axis descriptor
//!
//! A brain models axis assigns one matrix index to every mapped surface node
//! and voxel. Models occupy contiguous, disjoint index ranges in the order
//! they were added.

use alloc::vec::Vec;

use super::VolumeSpace;
use crate::types::{Structure, VoxelIjk};

/// Geometry of a single brain model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BrainModelKind {
    /// Surface vertices of a structure
    Surface {
        /// Node count of the full surface
        number_of_nodes: usize,
        /// Mapped node indices, in index order
        node_indices: Vec<usize>,
    },
    /// Voxels of a structure, in index order
    Volume { voxels: Vec<VoxelIjk> },
}

/// One structure's contribution to a brain models axis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrainModel {
    pub structure: Structure,
    pub kind: BrainModelKind,
}

impl BrainModel {
    /// Number of matrix indices used by this model
    pub fn index_count(&self) -> usize {
        match &self.kind {
            BrainModelKind::Surface { node_indices, .. } => node_indices.len(),
            BrainModelKind::Volume { voxels } => voxels.len(),
        }
    }

    /// Whether this model maps surface nodes
    pub fn is_surface(&self) -> bool {
        matches!(self.kind, BrainModelKind::Surface { .. })
    }
}

/// Brain models axis
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrainModelsDescriptor {
    pub models: Vec<BrainModel>,
    pub volume_space: Option<VolumeSpace>,
}

impl BrainModelsDescriptor {
    /// Create an empty descriptor
    pub const fn new() -> Self {
        Self {
            models: Vec::new(),
            volume_space: None,
        }
    }

    /// Add a surface mapping a subset of its nodes
    pub fn with_surface(
        mut self,
        structure: Structure,
        number_of_nodes: usize,
        node_indices: Vec<usize>,
    ) -> Self {
        self.models.push(BrainModel {
            structure,
            kind: BrainModelKind::Surface {
                number_of_nodes,
                node_indices,
            },
        });
        self
    }

    /// Add a surface mapping every node in order
    pub fn with_full_surface(self, structure: Structure, number_of_nodes: usize) -> Self {
        self.with_surface(structure, number_of_nodes, (0..number_of_nodes).collect())
    }

    /// Add a volume structure
    pub fn with_volume(mut self, structure: Structure, voxels: Vec<VoxelIjk>) -> Self {
        self.models.push(BrainModel {
            structure,
            kind: BrainModelKind::Volume { voxels },
        });
        self
    }

    /// Set the volume space used by volume models
    pub fn with_volume_space(mut self, space: VolumeSpace) -> Self {
        self.volume_space = Some(space);
        self
    }

    /// Total number of matrix indices
    pub fn len(&self) -> usize {
        self.models.iter().map(BrainModel::index_count).sum()
    }

    /// Whether no indices are mapped
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate models with the first matrix index each one occupies
    pub fn models_with_offsets(&self) -> impl Iterator<Item = (usize, &BrainModel)> {
        self.models.iter().scan(0usize, |next, model| {
            let start = *next;
            *next += model.index_count();
            Some((start, model))
        })
    }
}
