//! Brainmap - Brainordinate-Mapped Matrix Engine
//!
//! This library maps the rows and columns of a two-dimensional float matrix
//! to brainordinates (surface vertices and volume voxels) or to named maps,
//! and derives cached statistics and RGBA colorings from the map data.
//!
//! ## Architecture
//!
//! - **brainmap-core**: header data model, palettes, label tables and the
//!   reader, resolver and visibility traits (no I/O)
//! - **brainmap**: axis mappings, per-map caches, the file orchestrator and
//!   reference readers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brainmap::{BrainordinateMatrixFile, MappedMatrixFile, PaletteCatalog, Structure};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let reader = MappedMatrixFile::open("thickness.bmat")?;
//!     let file = BrainordinateMatrixFile::open(reader)?;
//!
//!     let value = file.surface_node_value(0, Structure::CortexLeft, 100, 32492)?;
//!     println!("node 100: {}", value.text);
//!
//!     file.update_coloring(0, &PaletteCatalog::new())?;
//!     let rgba = file.map_rgba_bytes(0)?;
//!     println!("{} colored vertices", rgba.len() / 4);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap**: memory-mapped container reader
//! - **serde**: JSON header container and configuration files

// Re-export the core data model and collaborator traits
pub use brainmap_core::{
    // Header model
    AxisDescriptor, BrainModelKind, BrainModelsDescriptor, LabelMap, LabelsDescriptor,
    MapAttributes, MatrixHeader, Parcel, ParcelsDescriptor, ScalarMap, ScalarsDescriptor,
    SeriesDescriptor, VolumeSpace, IMPLICIT_MAP_COUNT,
    // Enumerations
    DisplayGroup, MappingType, MatrixAxis, Plane, SeriesUnit, Structure, VoxelIjk,
    // Coloring
    Label, LabelTable, Palette, PaletteColorMapping, PalettePoint, ScaleMode, Threshold,
    ThresholdTest, UNASSIGNED_LABEL_KEY,
    // Collaborators
    AllSelected, MatrixReader, PaletteCatalog, PaletteResolver, VisibilityOracle,
    // Reader errors
    BrainmapError,
};

pub mod coloring;
pub mod config;
pub mod error;
pub mod map_entry;
pub mod mapping_axis;
pub mod matrix_file;
pub mod reader;
pub mod statistics;
pub mod voxel_translator;

pub use config::EngineConfig;
pub use error::{MatrixFileError, OpenError, Result};
pub use map_entry::{ColoringSource, MapColoring, MapEntry};
pub use mapping_axis::{Brainordinate, MappingAxis, SeriesAxis};
pub use matrix_file::{
    BrainordinateMatrixFile, DataAccess, DataRange, FileKind, FileLayout, FileMode,
    LabelValidation, MapValue, VoxelValue,
};
pub use reader::InMemoryMatrix;
pub use statistics::{
    DescriptiveStatistics, FastStatistics, Histogram, RangeFilter, Statistics, StatisticsKind,
};
pub use voxel_translator::VoxelIndexTranslator;

#[cfg(all(feature = "mmap", feature = "serde"))]
pub use reader::MappedMatrixFile;
