use std::cell::Cell;

use approx::assert_relative_eq;
use brainmap::{
    BrainModelsDescriptor, BrainmapError, BrainordinateMatrixFile, DataRange, DisplayGroup,
    EngineConfig, FileKind, InMemoryMatrix, Label, LabelTable, LabelsDescriptor, MapAttributes,
    MatrixFileError, MatrixHeader, MatrixReader, OpenError, Palette, PaletteColorMapping,
    PalettePoint, PaletteResolver, Plane, RangeFilter, ScaleMode, ScalarsDescriptor,
    SeriesDescriptor, SeriesUnit, StatisticsKind, Structure, VisibilityOracle, VolumeSpace,
    VoxelIndexTranslator,
};

struct CountingResolver {
    palette: Palette,
    lookups: Cell<usize>,
}

impl CountingResolver {
    fn new() -> Self {
        Self {
            palette: Palette::new(
                "gray",
                vec![
                    PalettePoint::new(1.0, [1.0, 1.0, 1.0]),
                    PalettePoint::new(-1.0, [0.0, 0.0, 0.0]),
                ],
            ),
            lookups: Cell::new(0),
        }
    }
}

impl PaletteResolver for CountingResolver {
    fn resolve_palette(&self, name: &str) -> Option<&Palette> {
        self.lookups.set(self.lookups.get() + 1);
        (name == self.palette.name()).then_some(&self.palette)
    }
}

/// Hides labels by name
struct HiddenLabels(&'static [&'static str]);

impl VisibilityOracle for HiddenLabels {
    fn is_selected(&self, label: &Label, _group: DisplayGroup, _tab_index: usize) -> bool {
        !self.0.contains(&label.name.as_str())
    }
}

fn gray() -> PaletteColorMapping {
    PaletteColorMapping::new()
        .with_palette_name("gray")
        .with_scale_mode(ScaleMode::AutoScale)
}

fn cortex() -> BrainModelsDescriptor {
    BrainModelsDescriptor::new()
        .with_full_surface(Structure::CortexLeft, 10)
        .with_full_surface(Structure::CortexRight, 10)
}

fn cortex_scalars(maps: usize) -> InMemoryMatrix {
    let mut scalars = ScalarsDescriptor::new();
    for map in 0..maps {
        scalars = scalars.with_map(MapAttributes::named(format!("map {map}")), gray());
    }
    let data = (0..maps * 20).map(|v| v as f32).collect();
    InMemoryMatrix::new(MatrixHeader::new(scalars, cortex()), data).unwrap()
}

fn dense_connectivity() -> InMemoryMatrix {
    let models = BrainModelsDescriptor::new().with_full_surface(Structure::CortexLeft, 4);
    let data = (0..16).map(|v| v as f32 / 16.0).collect();
    InMemoryMatrix::new(MatrixHeader::new(models.clone(), models), data).unwrap()
}

fn label_volume() -> InMemoryMatrix {
    let table = LabelTable::new()
        .with_label(Label::new(0, "???", [0.0, 0.0, 0.0, 0.0]))
        .with_label(Label::new(1, "thalamus", [0.0, 0.0, 1.0, 1.0]))
        .with_label(Label::new(2, "putamen", [1.0, 0.0, 1.0, 1.0]));
    let models = BrainModelsDescriptor::new()
        .with_volume(
            Structure::ThalamusLeft,
            vec![[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 0]],
        )
        .with_volume_space(VolumeSpace::new(
            [2, 2, 2],
            [
                [2.0, 0.0, 0.0, -2.0],
                [0.0, 2.0, 0.0, -2.0],
                [0.0, 0.0, 2.0, -2.0],
            ],
        ));
    let header = MatrixHeader::new(
        LabelsDescriptor::new().with_map(MapAttributes::named("subcortex"), table),
        models,
    );
    InMemoryMatrix::new(header, vec![1.0, 2.0, 1.0, 2.0]).unwrap()
}

#[test]
fn test_cortex_scenario_through_file() {
    let mut file = BrainordinateMatrixFile::open(cortex_scalars(2)).unwrap();
    assert_eq!(file.kind(), FileKind::DenseScalar);
    assert_eq!(file.number_of_maps(), 2);
    assert_eq!(file.brainordinate_axis().index_for_node(Structure::CortexRight, 3), Some(13));

    let value = file
        .surface_node_value(1, Structure::CortexRight, 3, 10)
        .unwrap();
    assert_eq!(value.numeric, Some(33.0));
    assert_eq!(value.text, "33");

    let err = file
        .set_map_data_for_surface(0, Structure::CortexLeft, &[0.0; 12])
        .unwrap_err();
    assert!(matches!(
        err,
        MatrixFileError::NodeCountMismatch {
            expected: 10,
            actual: 12,
            ..
        }
    ));

    file.set_map_data_for_surface(0, Structure::CortexLeft, &[-1.0; 10])
        .unwrap();
    let data = file.map_data(0).unwrap();
    assert!(data[..10].iter().all(|&v| v == -1.0));
    assert_eq!(data[10], 10.0);
}

#[test]
fn test_node_offsets_round_trip() {
    let models = BrainModelsDescriptor::new()
        .with_surface(Structure::CortexLeft, 12, vec![1, 3, 4, 9, 11])
        .with_surface(Structure::CortexRight, 5, vec![0, 2]);
    let header = MatrixHeader::new(models, SeriesDescriptor::unitless(1));
    let reader = InMemoryMatrix::new(header, vec![0.0; 7]).unwrap();
    let file = BrainordinateMatrixFile::open(reader).unwrap();

    let mut mapped = 0;
    for structure in [Structure::CortexLeft, Structure::CortexRight] {
        let count = file
            .brainordinate_axis()
            .surface_number_of_nodes(structure)
            .unwrap();
        for node in 0..count {
            if let Some(offset) = file.brainordinate_axis().index_for_node(structure, node) {
                mapped += 1;
                assert_eq!(
                    file.brainordinate_for_data_index(offset),
                    Some(brainmap::Brainordinate::Surface { structure, node })
                );
            }
        }
    }
    assert_eq!(mapped, 7);
}

#[test]
fn test_update_coloring_resolves_palette_once() {
    let file = BrainordinateMatrixFile::open(cortex_scalars(1)).unwrap();
    let resolver = CountingResolver::new();

    file.update_coloring(0, &resolver).unwrap();
    file.update_coloring(0, &resolver).unwrap();
    assert_eq!(resolver.lookups.get(), 1);
    assert!(file.is_coloring_valid(0).unwrap());

    let rgba = file.map_rgba(0).unwrap();
    assert_eq!(rgba.len(), 80);
    assert_relative_eq!(rgba[19 * 4], 1.0);
}

#[test]
fn test_held_coloring_survives_recolor() {
    let mut file = BrainordinateMatrixFile::open(cortex_scalars(1)).unwrap();
    let resolver = CountingResolver::new();
    file.update_coloring(0, &resolver).unwrap();
    let held = file.map_rgba(0).unwrap();

    file.invalidate_coloring();
    file.update_coloring(0, &resolver).unwrap();
    assert_eq!(file.map_rgba(0).unwrap(), held);

    let reversed: Vec<f32> = (0..20).rev().map(|v| v as f32).collect();
    file.set_map_data(0, &reversed).unwrap();
    file.update_coloring(0, &resolver).unwrap();
    let recolored = file.map_rgba(0).unwrap();
    assert_relative_eq!(held[19 * 4], 1.0);
    assert_relative_eq!(recolored[0], 1.0);
    assert_eq!(&held[..4], &recolored[19 * 4..]);
}

#[test]
fn test_set_map_data_invalidates_coloring() {
    let mut file = BrainordinateMatrixFile::open(cortex_scalars(2)).unwrap();
    let resolver = CountingResolver::new();
    file.update_coloring(1, &resolver).unwrap();
    let before = file.map_statistics(1, StatisticsKind::Fast, None).unwrap();

    let new_data: Vec<f32> = (0..20).map(|v| -(v as f32)).collect();
    file.set_map_data(1, &new_data).unwrap();
    assert!(!file.is_coloring_valid(1).unwrap());
    assert_eq!(file.map_data(1).unwrap(), new_data);

    let after = file.map_statistics(1, StatisticsKind::Fast, None).unwrap();
    assert_ne!(before, after);
    assert_eq!(after.as_fast().unwrap().most_negative(), -19.0);

    file.update_coloring(1, &resolver).unwrap();
    assert_eq!(resolver.lookups.get(), 2);

    assert!(matches!(
        file.set_map_data(1, &[0.0; 3]),
        Err(MatrixFileError::DataLengthMismatch {
            expected: 20,
            actual: 3
        })
    ));
}

#[test]
fn test_negative_label_alpha_clamped_in_file_coloring() {
    let table = LabelTable::new().with_label(Label::new(5, "ghost", [0.2, 0.4, 0.6, -1.0]));
    let header = MatrixHeader::new(
        LabelsDescriptor::new().with_map(MapAttributes::named("ghosts"), table),
        BrainModelsDescriptor::new().with_full_surface(Structure::Cerebellum, 2),
    );
    let reader = InMemoryMatrix::new(header, vec![5.0, 5.0]).unwrap();
    let file = BrainordinateMatrixFile::open(reader).unwrap();

    file.update_coloring(0, &CountingResolver::new()).unwrap();
    assert!(file.map_rgba(0).unwrap().iter().all(|&c| c >= 0.0));
    let bytes = file.map_rgba_bytes(0).unwrap();
    assert_eq!(bytes[3], 0);
    assert_eq!(bytes[7], 0);
}

#[test]
fn test_sparse_voxel_lookup() {
    let voxels = vec![([1, 0, 0], 0), ([1, 2, 0], 1), ([0, 1, 2], 2)];
    let translator =
        VoxelIndexTranslator::new(VolumeSpace::identity([2, 3, 3]), voxels.clone()).unwrap();

    for (ijk, offset) in voxels {
        assert_eq!(translator.offset_for_indices(ijk[0], ijk[1], ijk[2]), Some(offset));
    }
    assert_eq!(translator.offset_for_indices(0, 0, 0), None);
    assert_eq!(translator.offset_for_indices(2, 0, 0), None);
}

#[test]
fn test_dense_matrix_write_rejected() {
    let mut file = BrainordinateMatrixFile::open(dense_connectivity()).unwrap();
    assert_eq!(file.kind(), FileKind::Dense);
    assert!(!file.has_map_attributes());
    file.load_matrix_row(1).unwrap();
    let before = file.map_data(0).unwrap();

    let err = file.set_map_data(0, &[9.0; 4]).unwrap_err();
    assert!(matches!(err, MatrixFileError::WriteRejected(_)));
    assert_eq!(file.map_data(0).unwrap(), before);
    assert_eq!(file.reader().data()[4..8], before[..]);

    assert!(matches!(
        file.set_map_name(0, "row"),
        Err(MatrixFileError::MapAttributesUnavailable)
    ));
    assert!(matches!(
        file.matrix_rgba(&CountingResolver::new()),
        Err(MatrixFileError::MatrixTooLarge)
    ));
}

#[test]
fn test_dense_matrix_write_allowed_by_config() {
    let config = EngineConfig::new().with_reject_dense_matrix_writes(false);
    let mut file = BrainordinateMatrixFile::open_with_config(dense_connectivity(), config).unwrap();
    assert!(matches!(
        file.set_map_data(0, &[9.0; 4]),
        Err(MatrixFileError::NoMatrixRowLoaded)
    ));

    file.load_matrix_row(2).unwrap();
    file.set_map_data(0, &[9.0; 4]).unwrap();
    assert_eq!(file.map_data(0).unwrap(), vec![9.0; 4]);
    assert_eq!(file.reader().data()[8..12], [9.0; 4]);
}

#[test]
fn test_series_map_name_in_seconds() {
    let header = MatrixHeader::new(
        cortex(),
        SeriesDescriptor::new(8, 0.0, 0.72, SeriesUnit::Seconds),
    );
    let reader = InMemoryMatrix::new(header, vec![0.0; 160]).unwrap();
    let file = BrainordinateMatrixFile::open(reader).unwrap();
    assert_eq!(file.kind(), FileKind::DenseSeries);
    assert_eq!(file.map_name(5).unwrap(), "3.6 seconds");
}

#[test]
fn test_voxel_value_and_out_of_bounds() {
    let file = BrainordinateMatrixFile::open(label_volume()).unwrap();

    let value = file.volume_voxel_value(0, [0.1, -0.2, 0.0]).unwrap();
    assert_eq!(value.ijk, [1, 1, 1]);
    assert_eq!(value.value.numeric, Some(1.0));
    assert_eq!(value.value.text, "thalamus");

    let unmapped = file.volume_voxel_value(0, [-2.0, -2.0, -2.0]).unwrap_err();
    assert!(unmapped.is_no_data());
    let outside = file.volume_voxel_value(0, [40.0, 0.0, 0.0]).unwrap_err();
    assert!(matches!(outside, MatrixFileError::OutOfBounds { .. }));
}

#[test]
fn test_surface_identification_across_maps() {
    let file = BrainordinateMatrixFile::open(cortex_scalars(3)).unwrap();
    let text = file
        .surface_node_identification(&[0, 2], Structure::CortexRight, 3, 10)
        .unwrap();
    assert_eq!(text, "13 53");
    assert_eq!(
        file.surface_node_identification(&[], Structure::CortexRight, 3, 10)
            .unwrap(),
        ""
    );

    let err = file
        .surface_node_identification(&[0], Structure::CortexRight, 3, 32492)
        .unwrap_err();
    assert!(err.is_no_data());
    assert!(matches!(
        file.surface_node_identification(&[1, 5], Structure::CortexLeft, 0, 10),
        Err(MatrixFileError::MapIndexOutOfRange { index: 5, count: 3 })
    ));
}

#[test]
fn test_parcel_identification_names_each_map() {
    let parcels = brainmap::ParcelsDescriptor::new()
        .with_surface(Structure::CortexLeft, 3)
        .with_parcel(brainmap::Parcel::new("a").with_nodes(Structure::CortexLeft, vec![0]))
        .with_parcel(brainmap::Parcel::new("b").with_nodes(Structure::CortexLeft, vec![1, 2]));
    let scalars = ScalarsDescriptor::new()
        .with_map(MapAttributes::named("first"), gray())
        .with_map(MapAttributes::named("second"), gray());
    let reader = InMemoryMatrix::new(MatrixHeader::new(scalars, parcels), vec![0.0; 4]).unwrap();
    let file = BrainordinateMatrixFile::open(reader).unwrap();
    assert_eq!(file.kind(), FileKind::ParcelScalar);

    let text = file
        .surface_node_identification(&[0, 1], Structure::CortexLeft, 2, 3)
        .unwrap();
    assert_eq!(text, "b b");
    assert!(file
        .surface_node_identification(&[0, 1], Structure::CortexLeft, 7, 3)
        .unwrap_err()
        .is_no_data());
}

#[test]
fn test_matrix_identification_needs_loaded_row() {
    let mut file = BrainordinateMatrixFile::open(dense_connectivity()).unwrap();
    assert!(matches!(
        file.surface_node_identification(&[0], Structure::CortexLeft, 1, 4),
        Err(MatrixFileError::NoMatrixRowLoaded)
    ));

    file.load_matrix_row(2).unwrap();
    let text = file
        .surface_node_identification(&[0], Structure::CortexLeft, 1, 4)
        .unwrap();
    assert_eq!(text, "0.5625");
}

#[test]
fn test_voxel_identification_reads_labels() {
    let file = BrainordinateMatrixFile::open(label_volume()).unwrap();
    let (ijk, text) = file
        .volume_voxel_identification(&[0, 0], [0.1, -0.2, 0.0])
        .unwrap();
    assert_eq!(ijk, [1, 1, 1]);
    assert_eq!(text, "thalamus thalamus");

    let outside = file
        .volume_voxel_identification(&[0], [40.0, 0.0, 0.0])
        .unwrap_err();
    assert!(matches!(outside, MatrixFileError::OutOfBounds { .. }));
}

#[test]
fn test_slice_colors_mask_deselected_labels() {
    let file = BrainordinateMatrixFile::open(label_volume()).unwrap();
    file.update_coloring(0, &CountingResolver::new()).unwrap();

    let all = file
        .voxel_colors_for_slice(0, Plane::Axial, 1, DisplayGroup::Tab, 0, &HiddenLabels(&[]))
        .unwrap();
    assert_eq!(all.len(), 2 * 2 * 4);
    // (i, j) = (0, 0) thalamus, (1, 0) putamen, (1, 1) thalamus, (0, 1) unmapped
    assert_eq!(&all[0..4], &[0, 0, 255, 255]);
    assert_eq!(&all[4..8], &[255, 0, 255, 255]);
    assert_eq!(&all[8..12], &[0, 0, 0, 0]);
    assert_eq!(&all[12..16], &[0, 0, 255, 255]);

    let masked = file
        .voxel_colors_for_slice(
            0,
            Plane::Axial,
            1,
            DisplayGroup::A,
            0,
            &HiddenLabels(&["putamen"]),
        )
        .unwrap();
    assert_eq!(masked[7], 0);
    assert_eq!(masked[3], 255);

    let coronal = file
        .voxel_colors_for_slice(0, Plane::Coronal, 1, DisplayGroup::Tab, 0, &HiddenLabels(&[]))
        .unwrap();
    // j = 1 holds (1, 1, 1) thalamus and (0, 1, 0) putamen
    assert_eq!(&coronal[(2 + 1) * 4..(2 + 1) * 4 + 4], &[0, 0, 255, 255]);
    assert_eq!(&coronal[0..4], &[255, 0, 255, 255]);

    assert!(file
        .voxel_colors_for_slice(0, Plane::Parasagittal, 2, DisplayGroup::Tab, 0, &HiddenLabels(&[]))
        .unwrap()
        .is_empty());
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_oversized_slice_is_refused() {
    let side = 1i64 << 31;
    let models = BrainModelsDescriptor::new()
        .with_volume(Structure::BrainStem, vec![[0, 0, 0]])
        .with_volume_space(VolumeSpace::identity([side, side, 1]));
    let scalars = ScalarsDescriptor::new().with_map(MapAttributes::named("wide"), gray());
    let reader = InMemoryMatrix::new(MatrixHeader::new(scalars, models), vec![0.5]).unwrap();
    let file = BrainordinateMatrixFile::open(reader).unwrap();

    assert!(matches!(
        file.voxel_colors_for_slice(0, Plane::Axial, 0, DisplayGroup::Tab, 0, &HiddenLabels(&[])),
        Err(MatrixFileError::MatrixTooLarge)
    ));
}

#[test]
fn test_unique_label_keys_and_validation() {
    let mut file = BrainordinateMatrixFile::open(label_volume()).unwrap();
    let keys: Vec<i32> = file
        .unique_label_keys_used_in_map(0)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(keys, vec![1, 2]);
    assert!(file.validate_keys_and_labels(0).unwrap().is_consistent());

    file.update_coloring(0, &CountingResolver::new()).unwrap();
    file.update_label_table(0, |table| {
        table.insert(Label::new(3, "caudate", [1.0, 1.0, 0.0, 1.0]));
    })
    .unwrap();
    assert!(!file.is_coloring_valid(0).unwrap());

    let validation = file.validate_keys_and_labels(0).unwrap();
    assert_eq!(validation.unused_labels.into_iter().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_data_range_fallbacks() {
    let file = BrainordinateMatrixFile::open(cortex_scalars(2)).unwrap();
    assert_eq!(file.data_range_from_all_maps(), DataRange::new(0.0, 39.0));

    let dense = BrainordinateMatrixFile::open(dense_connectivity()).unwrap();
    assert_eq!(dense.data_range_from_all_maps(), DataRange::new(-1.0, 1.0));

    let opaque = BrainordinateMatrixFile::open(Unscannable(cortex_scalars(1))).unwrap();
    let range = opaque.data_range_from_all_maps();
    assert!(!range.valid);
    assert_eq!(range.minimum, -f32::MAX);
    assert_eq!(range.maximum, f32::MAX);
}

/// Reader that cannot report a data range
struct Unscannable(InMemoryMatrix);

impl MatrixReader for Unscannable {
    fn number_of_rows(&self) -> usize {
        self.0.number_of_rows()
    }

    fn number_of_columns(&self) -> usize {
        self.0.number_of_columns()
    }

    fn get_row(&self, buf: &mut [f32], index: usize) -> Result<(), BrainmapError> {
        self.0.get_row(buf, index)
    }

    fn get_column(&self, buf: &mut [f32], index: usize) -> Result<(), BrainmapError> {
        self.0.get_column(buf, index)
    }

    fn set_row(&mut self, buf: &[f32], index: usize) -> Result<(), BrainmapError> {
        self.0.set_row(buf, index)
    }

    fn set_column(&mut self, buf: &[f32], index: usize) -> Result<(), BrainmapError> {
        self.0.set_column(buf, index)
    }

    fn header(&self) -> &MatrixHeader {
        self.0.header()
    }

    fn header_mut(&mut self) -> &mut MatrixHeader {
        self.0.header_mut()
    }

    fn data_range_from_all_maps(&self) -> Option<(f32, f32)> {
        None
    }
}

#[test]
fn test_open_rejects_malformed_files() {
    let header = MatrixHeader::new(SeriesDescriptor::unitless(2), SeriesDescriptor::unitless(2));
    let reader = InMemoryMatrix::new(header, vec![0.0; 4]).unwrap();
    assert!(matches!(
        BrainordinateMatrixFile::open(reader),
        Err(OpenError::InvalidAxisCombination { .. })
    ));

    let mut reader = dense_connectivity();
    reader.header_mut().implicit_map_count = 2;
    assert!(matches!(
        BrainordinateMatrixFile::open(reader),
        Err(OpenError::MultipleImplicitMaps(2))
    ));
}

#[test]
fn test_file_palette_edit_invalidates_all_series_maps() {
    let header = MatrixHeader::new(cortex(), SeriesDescriptor::unitless(3)).with_file_palette(gray());
    let data = (0..60).map(|v| v as f32).collect();
    let mut file = BrainordinateMatrixFile::open(InMemoryMatrix::new(header, data).unwrap()).unwrap();
    let resolver = CountingResolver::new();
    for map in 0..3 {
        file.update_coloring(map, &resolver).unwrap();
    }

    file.update_palette_color_mapping(2, |mapping| {
        mapping.display_positive = false;
    })
    .unwrap();
    assert!((0..3).all(|map| !file.is_coloring_valid(map).unwrap()));
    assert!(!file.palette_color_mapping(0).unwrap().unwrap().display_positive);
}

#[test]
fn test_filtered_statistics_through_file() {
    let file = BrainordinateMatrixFile::open(cortex_scalars(1)).unwrap();
    let filter = RangeFilter::new(f32::MAX, 10.0, 0.0, 0.0, false);
    let stats = file
        .map_statistics(0, StatisticsKind::Descriptive, Some(&filter))
        .unwrap();
    assert_eq!(stats.as_descriptive().unwrap().count(), 10);

    let unfiltered = file
        .map_statistics(0, StatisticsKind::Descriptive, None)
        .unwrap();
    assert_eq!(unfiltered.as_descriptive().unwrap().count(), 20);
}

#[test]
fn test_parcel_matrix_colors_whole_matrix() {
    let parcels = brainmap::ParcelsDescriptor::new()
        .with_surface(Structure::CortexLeft, 3)
        .with_parcel(brainmap::Parcel::new("a").with_nodes(Structure::CortexLeft, vec![0]))
        .with_parcel(brainmap::Parcel::new("b").with_nodes(Structure::CortexLeft, vec![1, 2]));
    let header = MatrixHeader::new(parcels.clone(), parcels).with_file_palette(gray());
    let reader = InMemoryMatrix::new(header, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let file = BrainordinateMatrixFile::open(reader).unwrap();
    assert_eq!(file.kind(), FileKind::Parcel);

    let rgba = file.matrix_rgba(&CountingResolver::new()).unwrap();
    assert_eq!(rgba.len(), 16);
    assert_eq!(&rgba[12..16], &[255, 255, 255, 255]);
}

#[test]
fn test_reader_errors_surface_as_results() {
    let file = BrainordinateMatrixFile::open(cortex_scalars(1)).unwrap();
    assert!(matches!(
        file.map_data(1),
        Err(MatrixFileError::MapIndexOutOfRange { index: 1, count: 1 })
    ));
    let err: MatrixFileError = BrainmapError::Io.into();
    assert!(!err.is_no_data());
}

#[cfg(all(feature = "mmap", feature = "serde"))]
#[test]
fn test_mapped_file_end_to_end() {
    use brainmap::MappedMatrixFile;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thickness.bmat");
    let source = cortex_scalars(2);
    let (header, data) = source.into_parts();
    drop(MappedMatrixFile::create(&path, &header, 2, 20, &data).unwrap());

    let reader = MappedMatrixFile::open_writable(&path).unwrap();
    let mut file = BrainordinateMatrixFile::open(reader).unwrap();
    assert_eq!(file.map_name(1).unwrap(), "map 1");
    file.set_map_data(0, &[2.5; 20]).unwrap();
    file.reader().flush().unwrap();
    drop(file);

    let file = BrainordinateMatrixFile::open(MappedMatrixFile::open(&path).unwrap()).unwrap();
    assert_eq!(file.map_data(0).unwrap(), vec![2.5; 20]);
    assert_eq!(file.map_data(1).unwrap()[19], 39.0);
}
