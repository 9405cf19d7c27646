//! Mapping axes
//!
//! A [`MappingAxis`] is the lookup-ready form of one header
//! [`AxisDescriptor`]. Brainordinate axes (brain models and parcels) resolve
//! surface nodes and voxels to matrix indices; map axes (labels, scalars and
//! series) describe the maps. Axes are rebuilt in full on every open.

use brainmap_core::{
    AxisDescriptor, BrainModelKind, BrainModelsDescriptor, MappingType, ParcelsDescriptor,
    SeriesDescriptor, SeriesUnit, Structure, VolumeSpace, VoxelIjk,
};
use hashbrown::HashSet;
use tracing::warn;

use crate::error::{MatrixFileError, OpenError};
use crate::voxel_translator::VoxelIndexTranslator;

/// A resolved brainordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brainordinate {
    Surface { structure: Structure, node: usize },
    Voxel { structure: Structure, ijk: VoxelIjk },
}

/// Dense node-to-index table for one surface
#[derive(Debug, Clone)]
struct SurfaceLookup {
    structure: Structure,
    number_of_nodes: usize,
    node_to_index: Vec<Option<usize>>,
}

/// Lookups for a brain models axis
#[derive(Debug, Clone)]
pub struct BrainModelsAxis {
    surfaces: Vec<SurfaceLookup>,
    /// Brainordinate at each matrix index
    by_index: Vec<Brainordinate>,
    volume: Option<VoxelIndexTranslator>,
}

/// Lookups for a parcels axis; lookups yield parcel indices
#[derive(Debug, Clone)]
pub struct ParcelsAxis {
    names: Vec<String>,
    surfaces: Vec<SurfaceLookup>,
    volume: Option<VoxelIndexTranslator>,
}

/// Series interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesAxis {
    length: usize,
    start: f32,
    step: f32,
    unit: SeriesUnit,
}

/// Lookup-ready mapping of one matrix axis
#[derive(Debug, Clone)]
pub enum MappingAxis {
    BrainModels(BrainModelsAxis),
    Parcels(ParcelsAxis),
    Labels { length: usize },
    Scalars { length: usize },
    Series(SeriesAxis),
}

impl MappingAxis {
    /// Build an axis from its header descriptor
    pub fn from_descriptor(descriptor: &AxisDescriptor) -> Result<Self, OpenError> {
        Ok(match descriptor {
            AxisDescriptor::BrainModels(d) => MappingAxis::BrainModels(BrainModelsAxis::build(d)?),
            AxisDescriptor::Parcels(d) => MappingAxis::Parcels(ParcelsAxis::build(d)?),
            AxisDescriptor::Labels(d) => MappingAxis::Labels {
                length: d.maps.len(),
            },
            AxisDescriptor::Scalars(d) => MappingAxis::Scalars {
                length: d.maps.len(),
            },
            AxisDescriptor::Series(d) => MappingAxis::Series(SeriesAxis::build(d)),
        })
    }

    /// Get the mapping type
    pub fn mapping_type(&self) -> MappingType {
        match self {
            MappingAxis::BrainModels(_) => MappingType::BrainModels,
            MappingAxis::Parcels(_) => MappingType::Parcels,
            MappingAxis::Labels { .. } => MappingType::Labels,
            MappingAxis::Scalars { .. } => MappingType::Scalars,
            MappingAxis::Series(_) => MappingType::Series,
        }
    }

    /// Number of matrix indices along this axis
    pub fn len(&self) -> usize {
        match self {
            MappingAxis::BrainModels(a) => a.by_index.len(),
            MappingAxis::Parcels(a) => a.names.len(),
            MappingAxis::Labels { length } | MappingAxis::Scalars { length } => *length,
            MappingAxis::Series(s) => s.length,
        }
    }

    /// Whether the axis has no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn surfaces(&self) -> &[SurfaceLookup] {
        match self {
            MappingAxis::BrainModels(a) => &a.surfaces,
            MappingAxis::Parcels(a) => &a.surfaces,
            _ => &[],
        }
    }

    fn surface(&self, structure: Structure) -> Option<&SurfaceLookup> {
        self.surfaces().iter().find(|s| s.structure == structure)
    }

    /// Node count of a structure's surface, `None` if the structure is absent
    pub fn surface_number_of_nodes(&self, structure: Structure) -> Option<usize> {
        self.surface(structure).map(|s| s.number_of_nodes)
    }

    /// Structures with surface data, in axis order
    pub fn structures(&self) -> Vec<Structure> {
        self.surfaces().iter().map(|s| s.structure).collect()
    }

    /// Whether any surface nodes are mapped
    pub fn has_surface_data(&self) -> bool {
        !self.surfaces().is_empty()
    }

    /// Whether any voxels are mapped
    pub fn has_volume_data(&self) -> bool {
        self.voxel_translator().is_some_and(|t| t.has_volume())
    }

    /// Get the voxel translator of a brainordinate axis with volume data
    pub fn voxel_translator(&self) -> Option<&VoxelIndexTranslator> {
        match self {
            MappingAxis::BrainModels(a) => a.volume.as_ref(),
            MappingAxis::Parcels(a) => a.volume.as_ref(),
            _ => None,
        }
    }

    /// Matrix index for a surface node
    ///
    /// For a parcels axis this is the index of the parcel containing the node.
    pub fn index_for_node(&self, structure: Structure, node: usize) -> Option<usize> {
        self.surface(structure)?
            .node_to_index
            .get(node)
            .copied()
            .flatten()
    }

    /// Matrix index for a voxel
    ///
    /// For a parcels axis this is the index of the parcel containing the voxel.
    pub fn index_for_voxel(&self, ijk: VoxelIjk) -> Option<usize> {
        self.voxel_translator()?
            .offset_for_indices(ijk[0], ijk[1], ijk[2])
    }

    /// Matrix index of every node of a caller's surface
    ///
    /// The result has exactly `surface_node_count` entries. A surface whose
    /// node count differs from the file's is rejected rather than truncated.
    pub fn data_indices_for_all_nodes(
        &self,
        structure: Structure,
        surface_node_count: usize,
    ) -> Result<Vec<Option<usize>>, MatrixFileError> {
        let surface = self.surface(structure).ok_or(MatrixFileError::NotMapped {
            structure,
            surface_node_count,
        })?;
        if surface.number_of_nodes != surface_node_count {
            return Err(MatrixFileError::NodeCountMismatch {
                structure,
                expected: surface.number_of_nodes,
                actual: surface_node_count,
            });
        }
        Ok(surface.node_to_index.clone())
    }

    /// Brainordinate at a matrix index of a brain models axis
    pub fn brainordinate_for_index(&self, index: usize) -> Option<Brainordinate> {
        match self {
            MappingAxis::BrainModels(a) => a.by_index.get(index).copied(),
            _ => None,
        }
    }

    /// Name of a parcel
    pub fn parcel_name(&self, index: usize) -> Option<&str> {
        match self {
            MappingAxis::Parcels(a) => a.names.get(index).map(String::as_str),
            _ => None,
        }
    }

    /// Get the series interval, if this is a series axis
    pub fn series(&self) -> Option<&SeriesAxis> {
        match self {
            MappingAxis::Series(s) => Some(s),
            _ => None,
        }
    }
}

impl BrainModelsAxis {
    fn build(descriptor: &BrainModelsDescriptor) -> Result<Self, OpenError> {
        let mut surfaces: Vec<SurfaceLookup> = Vec::new();
        let mut by_index = Vec::with_capacity(descriptor.len());
        let mut voxels = Vec::new();

        for (start, model) in descriptor.models_with_offsets() {
            let structure = model.structure;
            match &model.kind {
                BrainModelKind::Surface {
                    number_of_nodes,
                    node_indices,
                } => {
                    if surfaces.iter().any(|s| s.structure == structure) {
                        return Err(OpenError::InvalidSurface {
                            structure,
                            reason: String::from("structure has more than one surface model"),
                        });
                    }
                    let mut node_to_index = vec![None; *number_of_nodes];
                    for (i, &node) in node_indices.iter().enumerate() {
                        let slot = node_to_index.get_mut(node).ok_or_else(|| {
                            OpenError::InvalidSurface {
                                structure,
                                reason: format!("node {node} >= node count {number_of_nodes}"),
                            }
                        })?;
                        if slot.is_some() {
                            return Err(OpenError::InvalidSurface {
                                structure,
                                reason: format!("node {node} is mapped twice"),
                            });
                        }
                        *slot = Some(start + i);
                        by_index.push(Brainordinate::Surface { structure, node });
                    }
                    surfaces.push(SurfaceLookup {
                        structure,
                        number_of_nodes: *number_of_nodes,
                        node_to_index,
                    });
                }
                BrainModelKind::Volume { voxels: model_voxels } => {
                    for (i, &ijk) in model_voxels.iter().enumerate() {
                        voxels.push((ijk, start + i));
                        by_index.push(Brainordinate::Voxel { structure, ijk });
                    }
                }
            }
        }

        let volume = build_translator(descriptor.volume_space.as_ref(), voxels)?;
        Ok(Self {
            surfaces,
            by_index,
            volume,
        })
    }
}

impl ParcelsAxis {
    fn build(descriptor: &ParcelsDescriptor) -> Result<Self, OpenError> {
        let mut surfaces: Vec<SurfaceLookup> = descriptor
            .surfaces
            .iter()
            .map(|s| SurfaceLookup {
                structure: s.structure,
                number_of_nodes: s.number_of_nodes,
                node_to_index: vec![None; s.number_of_nodes],
            })
            .collect();
        let mut voxels = Vec::new();

        for (parcel_index, parcel) in descriptor.parcels.iter().enumerate() {
            for (structure, nodes) in &parcel.surface_nodes {
                let structure = *structure;
                let surface = surfaces
                    .iter_mut()
                    .find(|s| s.structure == structure)
                    .ok_or_else(|| OpenError::InvalidSurface {
                        structure,
                        reason: format!("parcel '{}' uses an undeclared surface", parcel.name),
                    })?;
                let count = surface.number_of_nodes;
                for &node in nodes {
                    let slot = surface.node_to_index.get_mut(node).ok_or_else(|| {
                        OpenError::InvalidSurface {
                            structure,
                            reason: format!("node {node} >= node count {count}"),
                        }
                    })?;
                    if let Some(other) = slot.replace(parcel_index) {
                        return Err(OpenError::InvalidSurface {
                            structure,
                            reason: format!(
                                "node {node} is in parcel '{}' and parcel '{}'",
                                descriptor.parcels[other].name, parcel.name
                            ),
                        });
                    }
                }
            }
            voxels.extend(parcel.voxels.iter().map(|&ijk| (ijk, parcel_index)));
        }

        let volume = build_translator(descriptor.volume_space.as_ref(), voxels)?;
        Ok(Self {
            names: descriptor.parcels.iter().map(|p| p.name.clone()).collect(),
            surfaces,
            volume,
        })
    }
}

fn build_translator(
    space: Option<&VolumeSpace>,
    voxels: Vec<(VoxelIjk, usize)>,
) -> Result<Option<VoxelIndexTranslator>, OpenError> {
    let mut seen = HashSet::with_capacity(voxels.len());
    if let Some((ijk, _)) = voxels.iter().find(|(ijk, _)| !seen.insert(*ijk)) {
        return Err(OpenError::InvalidVolume(format!("voxel {ijk:?} is mapped twice")));
    }
    match space {
        Some(space) => VoxelIndexTranslator::new(*space, voxels)
            .map(Some)
            .map_err(OpenError::InvalidVolume),
        None if voxels.is_empty() => Ok(None),
        None => Err(OpenError::InvalidVolume(String::from(
            "voxels are mapped but the axis has no volume space",
        ))),
    }
}

impl SeriesAxis {
    fn build(descriptor: &SeriesDescriptor) -> Self {
        match descriptor.unit {
            SeriesUnit::Seconds | SeriesUnit::Unknown => {}
            other => warn!(
                unit = %other,
                "series unit is not supported, map names will not use interval values"
            ),
        }
        Self {
            length: descriptor.length,
            start: descriptor.start,
            step: descriptor.step,
            unit: descriptor.unit,
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn unit(&self) -> SeriesUnit {
        self.unit
    }

    /// Interval value of a map, `start + index * step`
    pub fn value(&self, index: usize) -> f32 {
        self.start + index as f32 * self.step
    }

    /// Synthesized name of a map
    ///
    /// Seconds give `"<value> seconds"`; every other unit is treated as
    /// unit-less and gives `"Map Index: <index + 1>"`.
    pub fn map_name(&self, index: usize) -> String {
        match self.unit {
            SeriesUnit::Seconds => format!("{} seconds", format_general(self.value(index))),
            _ => format!("Map Index: {}", index + 1),
        }
    }
}

/// Format like C `%g`
///
/// Six significant digits with trailing zeros removed. Exponent form is used
/// when the rounded exponent is below -4 or at least 6, written with a sign
/// and two or more digits (`1.23457e+06`).
pub(crate) fn format_general(value: f32) -> String {
    const PRECISION: i32 = 6;
    if value == 0.0 {
        return String::from("0");
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let v = f64::from(value);
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, v);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..PRECISION).contains(&exponent) {
        let decimals = (PRECISION - 1 - exponent) as usize;
        return trim_fraction(&format!("{v:.decimals$}")).to_string();
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
