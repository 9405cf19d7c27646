//! Brainordinate matrix files
//!
//! [`BrainordinateMatrixFile`] connects a [`MatrixReader`] to brainordinate
//! space. At open it builds a [`MappingAxis`] for each matrix axis, resolves
//! the file kind, mode and data access direction, and creates one
//! [`MapEntry`] per map. Queries then read map data through the reader and
//! fill the entries' statistics and coloring caches on demand.
//!
//! In multi-map mode one axis holds brainordinates and the other enumerates
//! maps. In matrix mode both axes hold brainordinates; the file has a single
//! implicit map whose data is the currently loaded row, and the column axis
//! supplies the brainordinates of that row.

pub mod kind;
pub mod values;

pub use kind::{DataAccess, FileKind, FileLayout, FileMode};
pub use values::{DataRange, LabelValidation, MapValue, VoxelValue, DENSE_DATA_RANGE};

use std::collections::{BTreeMap, BTreeSet};

use brainmap_core::{
    AxisDescriptor, BrainmapError, DisplayGroup, LabelTable, MapAttributes, MappingType,
    MatrixAxis, MatrixReader, PaletteColorMapping, PaletteResolver, Plane, Structure,
    VisibilityOracle, VoxelIjk, IMPLICIT_MAP_COUNT, UNASSIGNED_LABEL_KEY,
};
use tracing::{debug, info, warn};

use crate::coloring;
use crate::config::EngineConfig;
use crate::error::{MatrixFileError, OpenError, Result};
use crate::map_entry::{ColoringSource, MapColoring, MapEntry};
use crate::mapping_axis::{format_general, Brainordinate, MappingAxis};
use crate::statistics::{FastStatistics, RangeFilter, Statistics, StatisticsKind};

/// Row currently loaded from a matrix-mode file
#[derive(Debug, Clone)]
struct LoadedRow {
    index: usize,
    data: Vec<f32>,
}

/// A matrix reader mapped to brainordinates
#[derive(Debug)]
pub struct BrainordinateMatrixFile<R: MatrixReader> {
    reader: R,
    config: EngineConfig,
    row_axis: MappingAxis,
    column_axis: MappingAxis,
    layout: FileLayout,
    maps: Vec<MapEntry>,
    loaded_row: Option<LoadedRow>,
}

impl<R: MatrixReader> BrainordinateMatrixFile<R> {
    /// Open a reader with the default configuration
    pub fn open(reader: R) -> std::result::Result<Self, OpenError> {
        Self::open_with_config(reader, EngineConfig::default())
    }

    /// Open a reader
    ///
    /// Fails when the axis pair is unsupported, an axis length disagrees
    /// with the matrix, a matrix-mode file does not declare exactly one
    /// implicit map, or an axis mapping is malformed.
    pub fn open_with_config(
        reader: R,
        config: EngineConfig,
    ) -> std::result::Result<Self, OpenError> {
        let header = reader.header();
        let row_type = header.row_axis.mapping_type();
        let column_type = header.column_axis.mapping_type();
        let layout = FileLayout::classify(row_type, column_type).ok_or(
            OpenError::InvalidAxisCombination {
                row: row_type,
                column: column_type,
            },
        )?;

        let row_axis = MappingAxis::from_descriptor(&header.row_axis)?;
        let column_axis = MappingAxis::from_descriptor(&header.column_axis)?;
        for (axis, described, actual) in [
            ("row", row_axis.len(), reader.number_of_rows()),
            ("column", column_axis.len(), reader.number_of_columns()),
        ] {
            if described != actual {
                return Err(OpenError::AxisLengthMismatch {
                    axis,
                    described,
                    actual,
                });
            }
        }

        if layout.mode == FileMode::Matrix && header.implicit_map_count != IMPLICIT_MAP_COUNT {
            return Err(OpenError::MultipleImplicitMaps(header.implicit_map_count));
        }

        let brainordinate_count = match layout.brainordinate_axis {
            MatrixAxis::Row => reader.number_of_rows(),
            MatrixAxis::Column => reader.number_of_columns(),
        };
        let map_descriptor = layout
            .map_axis()
            .map(|axis| (axis, header.axis(axis)));
        let maps = Self::create_map_entries(&layout, map_descriptor, brainordinate_count);

        info!(
            kind = %layout.kind,
            mode = %layout.mode,
            rows = reader.number_of_rows(),
            columns = reader.number_of_columns(),
            maps = maps.len(),
            "opened brainordinate matrix file"
        );

        let file = Self {
            reader,
            config,
            row_axis,
            column_axis,
            layout,
            maps,
            loaded_row: None,
        };

        if file.config.log_map_names_on_open {
            for index in 0..file.maps.len() {
                info!(index, name = %file.map_name(index).unwrap_or_default(), "map");
            }
        }
        if file.config.validate_label_tables_on_open {
            for index in 0..file.maps.len() {
                if file.maps[index].coloring_source().is_label_table() {
                    if let Err(MatrixFileError::Reader(e)) = file.validate_keys_and_labels(index) {
                        return Err(OpenError::Reader(e));
                    }
                }
            }
        }
        Ok(file)
    }

    fn create_map_entries(
        layout: &FileLayout,
        map_descriptor: Option<(MatrixAxis, &AxisDescriptor)>,
        brainordinate_count: usize,
    ) -> Vec<MapEntry> {
        let entry = |attributes: &MapAttributes, source| {
            MapEntry::new(
                attributes.name.clone(),
                attributes.metadata.clone(),
                source,
                brainordinate_count,
            )
        };
        match map_descriptor {
            None => vec![MapEntry::new(
                String::new(),
                BTreeMap::new(),
                ColoringSource::FilePalette,
                brainordinate_count,
            )],
            Some((axis, AxisDescriptor::Labels(d))) => d
                .maps
                .iter()
                .enumerate()
                .map(|(index, m)| {
                    entry(&m.attributes, ColoringSource::MapLabelTable { axis, index })
                })
                .collect(),
            Some((axis, AxisDescriptor::Scalars(d))) => d
                .maps
                .iter()
                .enumerate()
                .map(|(index, m)| entry(&m.attributes, ColoringSource::MapPalette { axis, index }))
                .collect(),
            Some((_, descriptor)) => {
                debug!(kind = %layout.kind, "maps share the file palette");
                (0..descriptor.len())
                    .map(|_| {
                        MapEntry::new(
                            String::new(),
                            BTreeMap::new(),
                            ColoringSource::FilePalette,
                            brainordinate_count,
                        )
                    })
                    .collect()
            }
        }
    }

    pub fn mode(&self) -> FileMode {
        self.layout.mode
    }

    pub fn kind(&self) -> FileKind {
        self.layout.kind
    }

    pub fn data_access(&self) -> DataAccess {
        self.layout.access
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the mapping of a matrix axis
    pub fn axis(&self, axis: MatrixAxis) -> &MappingAxis {
        match axis {
            MatrixAxis::Row => &self.row_axis,
            MatrixAxis::Column => &self.column_axis,
        }
    }

    /// Get the axis whose indices are brainordinates of map data
    pub fn brainordinate_axis(&self) -> &MappingAxis {
        self.axis(self.layout.brainordinate_axis)
    }

    /// Get the axis enumerating maps, `None` in matrix mode
    pub fn map_axis(&self) -> Option<&MappingAxis> {
        self.layout.map_axis().map(|axis| self.axis(axis))
    }

    /// Number of values in one map
    pub fn brainordinate_count(&self) -> usize {
        self.brainordinate_axis().len()
    }

    /// Brainordinate at a data index of a map
    pub fn brainordinate_for_data_index(&self, index: usize) -> Option<Brainordinate> {
        self.brainordinate_axis().brainordinate_for_index(index)
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Close the file and return the reader
    pub fn into_reader(self) -> R {
        self.reader
    }

    pub fn number_of_maps(&self) -> usize {
        self.maps.len()
    }

    /// Whether maps carry editable names and metadata
    pub fn has_map_attributes(&self) -> bool {
        matches!(
            self.map_axis().map(MappingAxis::mapping_type),
            Some(MappingType::Labels | MappingType::Scalars)
        )
    }

    /// Get the state of one map
    pub fn map(&self, index: usize) -> Result<&MapEntry> {
        self.maps.get(index).ok_or(MatrixFileError::MapIndexOutOfRange {
            index,
            count: self.maps.len(),
        })
    }

    fn check_map_index(&self, index: usize) -> Result<()> {
        self.map(index).map(|_| ())
    }

    /// Name of a map
    ///
    /// Series maps are named from their interval and matrix maps after the
    /// loaded row.
    pub fn map_name(&self, index: usize) -> Result<String> {
        let entry = self.map(index)?;
        if let Some(series) = self.map_axis().and_then(MappingAxis::series) {
            return Ok(series.map_name(index));
        }
        if self.layout.mode == FileMode::Matrix {
            return Ok(self
                .loaded_row
                .as_ref()
                .map(|row| format!("Row: {}", row.index))
                .unwrap_or_default());
        }
        Ok(entry.name().to_string())
    }

    /// Rename a map
    pub fn set_map_name(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let attributes = self.map_attributes_mut(index)?;
        let name = name.into();
        attributes.name = name.clone();
        self.maps[index].set_name(name);
        Ok(())
    }

    /// Metadata of a map; empty for maps without attributes
    pub fn map_metadata(&self, index: usize) -> Result<&BTreeMap<String, String>> {
        Ok(self.map(index)?.metadata())
    }

    /// Set one metadata value of a map
    pub fn set_map_metadata_value(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let attributes = self.map_attributes_mut(index)?;
        let (key, value) = (key.into(), value.into());
        attributes.metadata.insert(key.clone(), value.clone());
        self.maps[index].set_metadata_value(key, value);
        Ok(())
    }

    fn map_attributes_mut(&mut self, index: usize) -> Result<&mut MapAttributes> {
        self.check_map_index(index)?;
        let axis = self
            .layout
            .map_axis()
            .ok_or(MatrixFileError::MapAttributesUnavailable)?;
        match self.reader.header_mut().axis_mut(axis) {
            AxisDescriptor::Labels(d) => d.maps.get_mut(index).map(|m| &mut m.attributes),
            AxisDescriptor::Scalars(d) => d.maps.get_mut(index).map(|m| &mut m.attributes),
            _ => None,
        }
        .ok_or(MatrixFileError::MapAttributesUnavailable)
    }

    /// Whether any map name or metadata was edited
    pub fn is_modified(&self) -> bool {
        self.maps.iter().any(MapEntry::is_modified)
    }

    pub fn clear_modified(&self) {
        self.maps.iter().for_each(MapEntry::clear_modified);
    }

    /// Data of one map, one value per brainordinate
    ///
    /// In matrix mode this is the loaded row, empty until a row is loaded.
    pub fn map_data(&self, index: usize) -> Result<Vec<f32>> {
        self.check_map_index(index)?;
        if self.layout.mode == FileMode::Matrix {
            return Ok(self
                .loaded_row
                .as_ref()
                .map(|row| row.data.clone())
                .unwrap_or_default());
        }

        let mut data = vec![0.0; self.brainordinate_count()];
        match self.layout.access {
            DataAccess::Columns => self.reader.get_column(&mut data, index)?,
            DataAccess::Rows => self.reader.get_row(&mut data, index)?,
        }
        Ok(data)
    }

    /// Replace the data of one map
    ///
    /// Invalidates the map's coloring and statistics. In matrix mode the
    /// loaded row is written; dense connectivity files refuse writes unless
    /// the configuration allows them.
    pub fn set_map_data(&mut self, index: usize, data: &[f32]) -> Result<()> {
        self.check_map_index(index)?;
        let expected = self.brainordinate_count();
        if data.len() != expected {
            return Err(MatrixFileError::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        match self.layout.mode {
            FileMode::Matrix => {
                if self.layout.kind == FileKind::Dense && self.config.reject_dense_matrix_writes {
                    warn!("write to dense connectivity matrix rejected");
                    return Err(MatrixFileError::WriteRejected(
                        "dense connectivity matrices are read-only",
                    ));
                }
                let row = self
                    .loaded_row
                    .as_mut()
                    .ok_or(MatrixFileError::NoMatrixRowLoaded)?;
                self.reader.set_row(data, row.index)?;
                row.data.copy_from_slice(data);
            }
            FileMode::MultiMap => match self.layout.access {
                DataAccess::Columns => self.reader.set_column(data, index)?,
                DataAccess::Rows => self.reader.set_row(data, index)?,
            },
        }

        self.maps[index].data_changed();
        debug!(map = index, "map data replaced");
        Ok(())
    }

    /// Write the values of one surface into a map
    ///
    /// `values` holds one value per surface node. Nodes without a data index
    /// are skipped; on a parcel axis the last node of a parcel wins.
    pub fn set_map_data_for_surface(
        &mut self,
        index: usize,
        structure: Structure,
        values: &[f32],
    ) -> Result<()> {
        let indices = self
            .brainordinate_axis()
            .data_indices_for_all_nodes(structure, values.len())?;
        let mut data = self.map_data(index)?;
        if data.is_empty() {
            return Err(MatrixFileError::NoMatrixRowLoaded);
        }
        for (value, slot) in values.iter().zip(indices) {
            if let Some(offset) = slot {
                data[offset] = *value;
            }
        }
        self.set_map_data(index, &data)
    }

    /// Values of every map at a surface node
    pub fn series_data_for_surface_node(&self, structure: Structure, node: usize) -> Result<Vec<f32>> {
        let offset = self
            .brainordinate_axis()
            .index_for_node(structure, node)
            .ok_or(MatrixFileError::NotMapped {
                structure,
                surface_node_count: self
                    .brainordinate_axis()
                    .surface_number_of_nodes(structure)
                    .unwrap_or(0),
            })?;
        self.series_data_for_offset(offset)
    }

    /// Values of every map at the voxel enclosing a coordinate
    pub fn series_data_for_voxel(&self, xyz: [f32; 3]) -> Result<Vec<f32>> {
        let (_, offset) = self.voxel_offset(xyz)?;
        self.series_data_for_offset(offset)
    }

    fn series_data_for_offset(&self, offset: usize) -> Result<Vec<f32>> {
        if self.layout.mode == FileMode::Matrix {
            return Err(MatrixFileError::UnsupportedMode("matrix"));
        }
        let mut series = vec![0.0; self.maps.len()];
        match self.layout.access {
            DataAccess::Columns => self.reader.get_row(&mut series, offset)?,
            DataAccess::Rows => self.reader.get_column(&mut series, offset)?,
        }
        Ok(series)
    }

    fn voxel_offset(&self, xyz: [f32; 3]) -> Result<([i64; 3], usize)> {
        let translator = self.brainordinate_axis().voxel_translator();
        translator
            .and_then(|t| t.enclosing_voxel(xyz))
            .and_then(|ijk| {
                translator
                    .and_then(|t| t.offset_for_indices(ijk[0], ijk[1], ijk[2]))
                    .map(|offset| (ijk, offset))
            })
            .ok_or(MatrixFileError::OutOfBounds { xyz })
    }

    /// Index of the loaded row of a matrix-mode file
    pub fn loaded_matrix_row(&self) -> Option<usize> {
        self.loaded_row.as_ref().map(|row| row.index)
    }

    /// Load a row as the implicit map of a matrix-mode file
    pub fn load_matrix_row(&mut self, row: usize) -> Result<()> {
        if self.layout.mode != FileMode::Matrix {
            return Err(MatrixFileError::UnsupportedMode("multi-map"));
        }
        let rows = self.reader.number_of_rows();
        if row >= rows {
            return Err(MatrixFileError::AxisIndexOutOfRange {
                index: row,
                length: rows,
            });
        }
        let mut data = vec![0.0; self.reader.number_of_columns()];
        self.reader.get_row(&mut data, row)?;
        self.loaded_row = Some(LoadedRow { index: row, data });
        self.maps[0].data_changed();
        debug!(row, "matrix row loaded");
        Ok(())
    }

    /// Load the row of a surface node; returns the row index
    pub fn load_matrix_row_for_surface_node(
        &mut self,
        structure: Structure,
        node: usize,
    ) -> Result<usize> {
        let row = self.row_axis.index_for_node(structure, node).ok_or(
            MatrixFileError::NotMapped {
                structure,
                surface_node_count: self.row_axis.surface_number_of_nodes(structure).unwrap_or(0),
            },
        )?;
        self.load_matrix_row(row)?;
        Ok(row)
    }

    /// Load the row of the voxel enclosing a coordinate; returns the row index
    pub fn load_matrix_row_for_voxel(&mut self, xyz: [f32; 3]) -> Result<usize> {
        let row = self
            .row_axis
            .voxel_translator()
            .and_then(|t| t.enclosing_voxel(xyz))
            .and_then(|ijk| self.row_axis.index_for_voxel(ijk))
            .ok_or(MatrixFileError::OutOfBounds { xyz })?;
        self.load_matrix_row(row)?;
        Ok(row)
    }

    fn coloring_for(&self, index: usize) -> Result<MapColoring<'_>> {
        self.map(index)?
            .coloring_source()
            .resolve(self.reader.header())
            .ok_or(MatrixFileError::Reader(BrainmapError::InvalidHeader))
    }

    /// Palette settings of a map; `None` for label maps
    pub fn palette_color_mapping(&self, index: usize) -> Result<Option<&PaletteColorMapping>> {
        Ok(match self.coloring_for(index)? {
            MapColoring::Palette(mapping) => Some(mapping),
            MapColoring::Labels(_) => None,
        })
    }

    /// Edit the palette settings of a map
    ///
    /// Editing the file palette invalidates every map that uses it.
    pub fn update_palette_color_mapping(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut PaletteColorMapping),
    ) -> Result<()> {
        let source = self.map(index)?.coloring_source();
        let header = self.reader.header_mut();
        let mapping = match source {
            ColoringSource::FilePalette => Some(&mut header.file_palette),
            ColoringSource::MapPalette { axis, index: slot } => match header.axis_mut(axis) {
                AxisDescriptor::Scalars(d) => d.maps.get_mut(slot).map(|m| &mut m.palette),
                _ => None,
            },
            ColoringSource::MapLabelTable { .. } => {
                return Err(MatrixFileError::WriteRejected(
                    "map is colored with a label table",
                ))
            }
        }
        .ok_or(MatrixFileError::Reader(BrainmapError::InvalidHeader))?;
        edit(mapping);

        for entry in self.maps.iter().filter(|e| e.coloring_source() == source) {
            entry.invalidate_coloring();
        }
        Ok(())
    }

    /// Label table of a map; `None` for palette maps
    pub fn label_table(&self, index: usize) -> Result<Option<&LabelTable>> {
        Ok(match self.coloring_for(index)? {
            MapColoring::Labels(table) => Some(table),
            MapColoring::Palette(_) => None,
        })
    }

    /// Edit the label table of a map
    pub fn update_label_table(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut LabelTable),
    ) -> Result<()> {
        let ColoringSource::MapLabelTable { axis, index: slot } = self.map(index)?.coloring_source()
        else {
            return Err(MatrixFileError::WriteRejected("map is colored with a palette"));
        };
        let table = match self.reader.header_mut().axis_mut(axis) {
            AxisDescriptor::Labels(d) => d.maps.get_mut(slot).map(|m| &mut m.label_table),
            _ => None,
        }
        .ok_or(MatrixFileError::Reader(BrainmapError::InvalidHeader))?;
        edit(table);
        self.maps[index].invalidate_coloring();
        Ok(())
    }

    pub fn is_coloring_valid(&self, index: usize) -> Result<bool> {
        Ok(self.map(index)?.is_coloring_valid())
    }

    /// Mark every map's coloring stale
    pub fn invalidate_coloring(&self) {
        self.maps.iter().for_each(MapEntry::invalidate_coloring);
    }

    /// Recompute a map's coloring if it is stale
    pub fn update_coloring<P: PaletteResolver + ?Sized>(
        &self,
        index: usize,
        resolver: &P,
    ) -> Result<()> {
        let entry = self.map(index)?;
        if entry.is_coloring_valid() {
            return Ok(());
        }
        let data = self.map_data(index)?;
        let coloring = self.coloring_for(index)?;
        entry.update_coloring(&data, coloring, resolver, &self.config);
        Ok(())
    }

    /// Copy of a map's cached coloring, four floats per brainordinate
    pub fn map_rgba(&self, index: usize) -> Result<Vec<f32>> {
        Ok(self.map(index)?.rgba())
    }

    /// Cached coloring of a map as bytes
    pub fn map_rgba_bytes(&self, index: usize) -> Result<Vec<u8>> {
        Ok(self.map(index)?.rgba_bytes())
    }

    /// Color the whole matrix with the file palette
    ///
    /// Returns four bytes per element, row-major. Dense connectivity
    /// matrices are refused.
    pub fn matrix_rgba<P: PaletteResolver + ?Sized>(&self, resolver: &P) -> Result<Vec<u8>> {
        if self.layout.kind == FileKind::Dense {
            return Err(MatrixFileError::MatrixTooLarge);
        }
        let (rows, columns) = (self.reader.number_of_rows(), self.reader.number_of_columns());
        let mut data = vec![0.0f32; rows * columns];
        for (row, chunk) in data.chunks_exact_mut(columns.max(1)).enumerate().take(rows) {
            self.reader.get_row(chunk, row)?;
        }

        let mapping = &self.reader.header().file_palette;
        let Some(palette) = resolver.resolve_palette(&mapping.palette_name) else {
            warn!(palette = %mapping.palette_name, "palette not found, matrix is left uncolored");
            return Ok(vec![0; data.len() * 4]);
        };
        let stats = FastStatistics::from_data(&data, self.config.percentile_bucket_limit);
        let rgba = coloring::color_scalars_with_palette(&stats, mapping, palette, &data);
        Ok(coloring::rgba_to_bytes(&rgba))
    }

    /// Voxel colors of one volume slice
    ///
    /// Returns four bytes per voxel of the slice plane. Colors come from the
    /// map's cached coloring; voxels whose label the oracle reports as
    /// deselected for `group` and `tab_index` get zero alpha. An empty
    /// vector means the slice is outside the volume or there is no volume.
    pub fn voxel_colors_for_slice<O: VisibilityOracle + ?Sized>(
        &self,
        index: usize,
        plane: Plane,
        slice: i64,
        group: DisplayGroup,
        tab_index: usize,
        oracle: &O,
    ) -> Result<Vec<u8>> {
        let entry = self.map(index)?;
        let Some(translator) = self.brainordinate_axis().voxel_translator() else {
            return Ok(Vec::new());
        };
        let [dim_i, dim_j, dim_k] = translator.dimensions().map(|d| d as usize);
        let (slice_axis, width, height) = match plane {
            Plane::Axial => (2, dim_i, dim_j),
            Plane::Coronal => (1, dim_i, dim_k),
            Plane::Parasagittal => (0, dim_j, dim_k),
        };
        let depth = [dim_i, dim_j, dim_k][slice_axis];
        if slice < 0 || slice as usize >= depth {
            return Ok(Vec::new());
        }

        let labels = match self.coloring_for(index)? {
            MapColoring::Labels(table) => Some((table, self.map_data(index)?)),
            MapColoring::Palette(_) => None,
        };

        let pixels = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(MatrixFileError::MatrixTooLarge)?;
        let rgba = entry.rgba();
        let mut colors = vec![0u8; pixels];
        for &(ijk, offset) in translator.voxels() {
            if ijk[slice_axis] != slice {
                continue;
            }
            let [i, j, k] = ijk.map(|v| v as usize);
            let pixel = match plane {
                Plane::Axial => j * dim_i + i,
                Plane::Coronal => k * dim_i + i,
                Plane::Parasagittal => k * dim_j + j,
            } * 4;
            let Some(source) = rgba.get(offset * 4..offset * 4 + 4) else {
                continue;
            };
            let out = &mut colors[pixel..pixel + 4];
            for (byte, &channel) in out.iter_mut().zip(source) {
                *byte = coloring::channel_to_byte(channel);
            }

            if let Some((table, data)) = &labels {
                let key = data.get(offset).map_or(UNASSIGNED_LABEL_KEY, |&v| v as i32);
                if let Some(label) = table.label(key) {
                    if !oracle.is_selected(label, group, tab_index) {
                        out[3] = 0;
                    }
                }
            }
        }
        Ok(colors)
    }

    fn value_text(&self, index: usize, value: f32) -> Result<String> {
        Ok(match self.coloring_for(index)? {
            MapColoring::Labels(table) => {
                let key = value as i32;
                match table.label_name(key) {
                    Some(name) => name.to_string(),
                    None => format!("InvalidLabelKey={key}"),
                }
            }
            MapColoring::Palette(_) => format_general(value),
        })
    }

    fn value_at_offset(&self, index: usize, offset: usize) -> Result<MapValue> {
        let axis = self.brainordinate_axis();
        if axis.mapping_type() == MappingType::Parcels {
            let name = axis
                .parcel_name(offset)
                .ok_or(MatrixFileError::AxisIndexOutOfRange {
                    index: offset,
                    length: axis.len(),
                })?;
            return Ok(MapValue {
                numeric: None,
                text: name.to_string(),
            });
        }

        let data = self.map_data(index)?;
        if data.is_empty() {
            return Err(MatrixFileError::NoMatrixRowLoaded);
        }
        let value = *data.get(offset).ok_or(MatrixFileError::AxisIndexOutOfRange {
            index: offset,
            length: data.len(),
        })?;
        Ok(MapValue {
            numeric: Some(value),
            text: self.value_text(index, value)?,
        })
    }

    /// Value of a map at a surface node
    ///
    /// `surface_node_count` must match the file's node count for the
    /// structure. Parcel files report the parcel name without a number.
    pub fn surface_node_value(
        &self,
        index: usize,
        structure: Structure,
        node: usize,
        surface_node_count: usize,
    ) -> Result<MapValue> {
        self.check_map_index(index)?;
        let not_mapped = || MatrixFileError::NotMapped {
            structure,
            surface_node_count,
        };
        let axis = self.brainordinate_axis();
        if axis.surface_number_of_nodes(structure) != Some(surface_node_count) {
            return Err(not_mapped());
        }
        let offset = axis.index_for_node(structure, node).ok_or_else(not_mapped)?;
        self.value_at_offset(index, offset)
    }

    /// Value of a map at the voxel enclosing a coordinate
    pub fn volume_voxel_value(&self, index: usize, xyz: [f32; 3]) -> Result<VoxelValue> {
        self.check_map_index(index)?;
        let (ijk, offset) = self.voxel_offset(xyz)?;
        Ok(VoxelValue {
            ijk,
            value: self.value_at_offset(index, offset)?,
        })
    }

    /// Identification text of several maps at a surface node
    ///
    /// Texts of the maps that have a value at the node are joined with a
    /// space. Dense multi-map files read all values with one series read;
    /// other kinds look up each map. Fails with a no-data error when no
    /// requested map has a value.
    pub fn surface_node_identification(
        &self,
        map_indices: &[usize],
        structure: Structure,
        node: usize,
        surface_node_count: usize,
    ) -> Result<String> {
        if !self.layout.kind.identifies_from_series() {
            return self.identification_per_map(map_indices, |index| {
                self.surface_node_value(index, structure, node, surface_node_count)
                    .map(|value| value.text)
            });
        }
        if self.brainordinate_axis().surface_number_of_nodes(structure) != Some(surface_node_count) {
            return Err(MatrixFileError::NotMapped {
                structure,
                surface_node_count,
            });
        }
        let series = self.series_data_for_surface_node(structure, node)?;
        self.identification_from_series(map_indices, &series)
    }

    /// Identification text of several maps at the voxel enclosing a coordinate
    ///
    /// Behaves like [`Self::surface_node_identification`] and also returns
    /// the voxel indices.
    pub fn volume_voxel_identification(
        &self,
        map_indices: &[usize],
        xyz: [f32; 3],
    ) -> Result<(VoxelIjk, String)> {
        let (ijk, offset) = self.voxel_offset(xyz)?;
        let text = if self.layout.kind.identifies_from_series() {
            let series = self.series_data_for_offset(offset)?;
            self.identification_from_series(map_indices, &series)?
        } else {
            self.identification_per_map(map_indices, |index| {
                self.check_map_index(index)?;
                self.value_at_offset(index, offset).map(|value| value.text)
            })?
        };
        Ok((ijk, text))
    }

    fn identification_from_series(&self, map_indices: &[usize], series: &[f32]) -> Result<String> {
        let mut texts = Vec::with_capacity(map_indices.len());
        for &index in map_indices {
            let value = *series.get(index).ok_or(MatrixFileError::MapIndexOutOfRange {
                index,
                count: series.len(),
            })?;
            texts.push(self.value_text(index, value)?);
        }
        Ok(texts.join(" "))
    }

    fn identification_per_map(
        &self,
        map_indices: &[usize],
        text_for: impl Fn(usize) -> Result<String>,
    ) -> Result<String> {
        let mut texts = Vec::with_capacity(map_indices.len());
        let mut missing = None;
        for &index in map_indices {
            match text_for(index) {
                Ok(text) => texts.push(text),
                Err(err)
                    if err.is_no_data() || matches!(err, MatrixFileError::NoMatrixRowLoaded) =>
                {
                    missing = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        match missing {
            Some(err) if texts.is_empty() => Err(err),
            _ => Ok(texts.join(" ")),
        }
    }

    /// Statistics of a map, optionally restricted to value bands
    pub fn map_statistics(
        &self,
        index: usize,
        kind: StatisticsKind,
        filter: Option<&RangeFilter>,
    ) -> Result<Statistics> {
        let entry = self.map(index)?;
        let data = self.map_data(index)?;
        Ok(entry.statistics(kind, &data, filter, &self.config))
    }

    /// Distinct label keys in a map's data; empty for palette maps
    pub fn unique_label_keys_used_in_map(&self, index: usize) -> Result<BTreeSet<i32>> {
        if !self.map(index)?.coloring_source().is_label_table() {
            return Ok(BTreeSet::new());
        }
        Ok(self.map_data(index)?.iter().map(|&v| v as i32).collect())
    }

    /// Compare a label map's data keys with its label table
    ///
    /// Inconsistencies are logged, never raised.
    pub fn validate_keys_and_labels(&self, index: usize) -> Result<LabelValidation> {
        let Some(table) = self.label_table(index)? else {
            return Ok(LabelValidation::default());
        };
        let used = self.unique_label_keys_used_in_map(index)?;
        let defined: BTreeSet<i32> = table.keys().into_iter().collect();

        let validation = LabelValidation {
            missing_labels: used.difference(&defined).copied().collect(),
            unused_labels: defined
                .difference(&used)
                .copied()
                .filter(|&key| key != UNASSIGNED_LABEL_KEY)
                .collect(),
        };
        if !validation.missing_labels.is_empty() {
            warn!(
                map = index,
                keys = ?validation.missing_labels,
                "label keys in map data are missing from the label table"
            );
        }
        if !validation.unused_labels.is_empty() {
            warn!(
                map = index,
                keys = ?validation.unused_labels,
                "labels in the label table are not used by the map"
            );
        }
        Ok(validation)
    }

    /// Minimum and maximum over all maps
    ///
    /// Dense connectivity files report [`DENSE_DATA_RANGE`]. When the reader
    /// cannot scan its data the range is [`DataRange::UNKNOWN`].
    pub fn data_range_from_all_maps(&self) -> DataRange {
        if self.layout.kind == FileKind::Dense {
            return DataRange::new(DENSE_DATA_RANGE.0, DENSE_DATA_RANGE.1);
        }
        match self.reader.data_range_from_all_maps() {
            Some((minimum, maximum)) => DataRange::new(minimum, maximum),
            None => DataRange::UNKNOWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::InMemoryMatrix;
    use brainmap_core::{
        AllSelected, BrainModelsDescriptor, Label, LabelsDescriptor, MatrixHeader,
        ParcelsDescriptor, Parcel, SeriesDescriptor, SeriesUnit,
    };

    fn labels_header() -> MatrixHeader {
        let table = LabelTable::new()
            .with_label(Label::new(0, "???", [0.0, 0.0, 0.0, 0.0]))
            .with_label(Label::new(1, "V1", [1.0, 0.0, 0.0, 1.0]))
            .with_label(Label::new(2, "V2", [0.0, 1.0, 0.0, 1.0]));
        MatrixHeader::new(
            LabelsDescriptor::new().with_map(MapAttributes::named("areas"), table),
            BrainModelsDescriptor::new().with_full_surface(Structure::CortexLeft, 4),
        )
    }

    #[test]
    fn test_label_file_layout_and_values() {
        let reader = InMemoryMatrix::new(labels_header(), vec![1.0, 2.0, 2.0, 7.0]).unwrap();
        let file = BrainordinateMatrixFile::open(reader).unwrap();
        assert_eq!(file.kind(), FileKind::DenseLabel);
        assert_eq!(file.data_access(), DataAccess::Rows);
        assert_eq!(file.number_of_maps(), 1);
        assert_eq!(file.map_name(0).unwrap(), "areas");

        let value = file
            .surface_node_value(0, Structure::CortexLeft, 1, 4)
            .unwrap();
        assert_eq!(value.text, "V2");
        let value = file
            .surface_node_value(0, Structure::CortexLeft, 3, 4)
            .unwrap();
        assert_eq!(value.text, "InvalidLabelKey=7");

        let validation = file.validate_keys_and_labels(0).unwrap();
        assert_eq!(validation.missing_labels.into_iter().collect::<Vec<_>>(), vec![7]);
        assert!(validation.unused_labels.is_empty());
    }

    #[test]
    fn test_identification_reports_unknown_label_keys() {
        let reader = InMemoryMatrix::new(labels_header(), vec![1.0, 2.0, 2.0, 7.0]).unwrap();
        let file = BrainordinateMatrixFile::open(reader).unwrap();
        let text = file
            .surface_node_identification(&[0], Structure::CortexLeft, 3, 4)
            .unwrap();
        assert_eq!(text, "InvalidLabelKey=7");
        let text = file
            .surface_node_identification(&[0, 0], Structure::CortexLeft, 0, 4)
            .unwrap();
        assert_eq!(text, "V1 V1");
    }

    #[test]
    fn test_wrong_node_count_is_not_mapped() {
        let reader = InMemoryMatrix::new(labels_header(), vec![0.0; 4]).unwrap();
        let file = BrainordinateMatrixFile::open(reader).unwrap();
        let err = file
            .surface_node_value(0, Structure::CortexLeft, 1, 32492)
            .unwrap_err();
        assert!(err.is_no_data());
        assert!(matches!(
            file.surface_node_value(3, Structure::CortexLeft, 1, 4),
            Err(MatrixFileError::MapIndexOutOfRange { index: 3, count: 1 })
        ));
    }

    #[test]
    fn test_rename_updates_header() {
        let reader = InMemoryMatrix::new(labels_header(), vec![0.0; 4]).unwrap();
        let mut file = BrainordinateMatrixFile::open(reader).unwrap();
        file.set_map_name(0, "regions").unwrap();
        file.set_map_metadata_value(0, "source", "atlas").unwrap();
        assert!(file.is_modified());
        assert_eq!(file.map_name(0).unwrap(), "regions");

        let header = file.reader().header();
        let AxisDescriptor::Labels(labels) = &header.row_axis else {
            panic!("row axis should hold labels");
        };
        assert_eq!(labels.maps[0].attributes.name, "regions");
        assert_eq!(labels.maps[0].attributes.metadata["source"], "atlas");

        file.clear_modified();
        assert!(!file.is_modified());
    }

    #[test]
    fn test_series_has_no_map_attributes() {
        let header = MatrixHeader::new(
            BrainModelsDescriptor::new().with_full_surface(Structure::CortexRight, 2),
            SeriesDescriptor::new(3, 1.0, 0.5, SeriesUnit::Seconds),
        );
        let reader = InMemoryMatrix::new(header, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let mut file = BrainordinateMatrixFile::open(reader).unwrap();

        assert_eq!(file.kind(), FileKind::DenseSeries);
        assert!(!file.has_map_attributes());
        assert_eq!(file.map_name(1).unwrap(), "1.5 seconds");
        assert!(matches!(
            file.set_map_name(0, "x"),
            Err(MatrixFileError::MapAttributesUnavailable)
        ));
        assert_eq!(file.map_data(2).unwrap(), vec![2.0, 5.0]);
        assert_eq!(
            file.series_data_for_surface_node(Structure::CortexRight, 1)
                .unwrap(),
            vec![3.0, 4.0, 5.0]
        );
    }

    #[test]
    fn test_parcel_value_is_parcel_name() {
        let header = MatrixHeader::new(
            ParcelsDescriptor::new()
                .with_surface(Structure::CortexLeft, 4)
                .with_parcel(Parcel::new("V1").with_nodes(Structure::CortexLeft, vec![0, 1]))
                .with_parcel(Parcel::new("MT").with_nodes(Structure::CortexLeft, vec![3])),
            SeriesDescriptor::unitless(1),
        );
        let reader = InMemoryMatrix::new(header, vec![0.25, 0.75]).unwrap();
        let file = BrainordinateMatrixFile::open(reader).unwrap();

        let value = file
            .surface_node_value(0, Structure::CortexLeft, 3, 4)
            .unwrap();
        assert_eq!(value.numeric, None);
        assert_eq!(value.text, "MT");
        assert!(file
            .surface_node_value(0, Structure::CortexLeft, 2, 4)
            .unwrap_err()
            .is_no_data());
    }

    #[test]
    fn test_matrix_row_loading() {
        let models = BrainModelsDescriptor::new().with_full_surface(Structure::CortexLeft, 3);
        let header = MatrixHeader::new(models.clone(), models);
        let data = (0..9).map(|v| v as f32 / 10.0).collect();
        let reader = InMemoryMatrix::new(header, data).unwrap();
        let mut file = BrainordinateMatrixFile::open(reader).unwrap();

        assert_eq!(file.mode(), FileMode::Matrix);
        assert_eq!(file.number_of_maps(), 1);
        assert!(file.map_data(0).unwrap().is_empty());
        assert!(matches!(
            file.surface_node_value(0, Structure::CortexLeft, 0, 3),
            Err(MatrixFileError::NoMatrixRowLoaded)
        ));
        assert_eq!(file.map_name(0).unwrap(), "");

        let row = file
            .load_matrix_row_for_surface_node(Structure::CortexLeft, 2)
            .unwrap();
        assert_eq!(row, 2);
        assert_eq!(file.loaded_matrix_row(), Some(2));
        assert_eq!(file.map_data(0).unwrap(), vec![0.6, 0.7, 0.8]);
        assert_eq!(file.map_name(0).unwrap(), "Row: 2");
        assert_eq!(file.data_range_from_all_maps(), DataRange::new(-1.0, 1.0));
        assert!(matches!(
            file.series_data_for_surface_node(Structure::CortexLeft, 0),
            Err(MatrixFileError::UnsupportedMode(_))
        ));
    }

    #[test]
    fn test_slice_out_of_range_is_empty() {
        let header = MatrixHeader::new(
            BrainModelsDescriptor::new()
                .with_volume(Structure::ThalamusLeft, vec![[0, 0, 0]])
                .with_volume_space(brainmap_core::VolumeSpace::identity([2, 2, 2])),
            SeriesDescriptor::unitless(1),
        );
        let reader = InMemoryMatrix::new(header, vec![1.0]).unwrap();
        let file = BrainordinateMatrixFile::open(reader).unwrap();
        let colors = file
            .voxel_colors_for_slice(0, Plane::Axial, 5, DisplayGroup::Tab, 0, &AllSelected)
            .unwrap();
        assert!(colors.is_empty());
        let colors = file
            .voxel_colors_for_slice(0, Plane::Axial, 0, DisplayGroup::Tab, 0, &AllSelected)
            .unwrap();
        assert_eq!(colors.len(), 2 * 2 * 4);
    }

    #[test]
    fn test_length_mismatch_rejected_at_open() {
        let reader = InMemoryMatrix::with_dimensions(labels_header(), 1, 5, vec![0.0; 5]).unwrap();
        assert!(matches!(
            BrainordinateMatrixFile::open(reader),
            Err(OpenError::AxisLengthMismatch { axis: "column", described: 4, actual: 5 })
        ));
    }
}
