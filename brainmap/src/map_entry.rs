//! Per-map state
//!
//! A [`MapEntry`] holds a map's name, metadata and coloring source plus the
//! caches derived from its data: fast statistics, descriptive statistics, a
//! histogram and the RGBA coloring. Caches fill lazily through `&self` and
//! are invalidated explicitly. Statistics are invalidated only when data is
//! written; coloring is also invalidated when the palette or label table
//! changes.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use brainmap_core::{
    AxisDescriptor, LabelTable, MatrixAxis, MatrixHeader, PaletteColorMapping, PaletteResolver,
};
use tracing::{debug, warn};

use crate::coloring;
use crate::config::EngineConfig;
use crate::statistics::{
    DescriptiveStatistics, FastStatistics, Histogram, RangeFilter, Statistics, StatisticsKind,
};

/// Where a map's coloring comes from, resolved against the header on use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColoringSource {
    /// Palette of one scalar map on the given axis
    MapPalette { axis: MatrixAxis, index: usize },
    /// File-level palette shared by series and matrix maps
    FilePalette,
    /// Label table of one label map on the given axis
    MapLabelTable { axis: MatrixAxis, index: usize },
}

/// A resolved coloring source
#[derive(Debug, Clone, Copy)]
pub enum MapColoring<'a> {
    Palette(&'a PaletteColorMapping),
    Labels(&'a LabelTable),
}

impl ColoringSource {
    /// Resolve this source in a header
    pub fn resolve<'h>(&self, header: &'h MatrixHeader) -> Option<MapColoring<'h>> {
        match *self {
            ColoringSource::FilePalette => Some(MapColoring::Palette(&header.file_palette)),
            ColoringSource::MapPalette { axis, index } => match header.axis(axis) {
                AxisDescriptor::Scalars(d) => {
                    d.maps.get(index).map(|m| MapColoring::Palette(&m.palette))
                }
                _ => None,
            },
            ColoringSource::MapLabelTable { axis, index } => match header.axis(axis) {
                AxisDescriptor::Labels(d) => {
                    d.maps.get(index).map(|m| MapColoring::Labels(&m.label_table))
                }
                _ => None,
            },
        }
    }

    /// Whether the source is a label table
    pub fn is_label_table(&self) -> bool {
        matches!(self, ColoringSource::MapLabelTable { .. })
    }
}

/// State and caches of one map
#[derive(Debug)]
pub struct MapEntry {
    name: String,
    metadata: BTreeMap<String, String>,
    coloring_source: ColoringSource,
    /// Brainordinates per map; the RGBA buffer holds four floats each
    data_count: usize,
    rgba: RefCell<Vec<f32>>,
    rgba_valid: Cell<bool>,
    fast: RefCell<Option<FastStatistics>>,
    descriptive: RefCell<Option<DescriptiveStatistics>>,
    histogram: RefCell<Option<Histogram>>,
    modified: Cell<bool>,
}

impl MapEntry {
    /// Create an entry with an all-zero coloring buffer
    pub fn new(
        name: impl Into<String>,
        metadata: BTreeMap<String, String>,
        coloring_source: ColoringSource,
        data_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            metadata,
            coloring_source,
            data_count,
            rgba: RefCell::new(vec![0.0; data_count * 4]),
            rgba_valid: Cell::new(false),
            fast: RefCell::new(None),
            descriptive: RefCell::new(None),
            histogram: RefCell::new(None),
            modified: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.modified.set(true);
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Set one metadata value
    pub fn set_metadata_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
        self.modified.set(true);
    }

    pub fn coloring_source(&self) -> ColoringSource {
        self.coloring_source
    }

    /// Number of brainordinates covered by the map
    pub fn data_count(&self) -> usize {
        self.data_count
    }

    /// Whether the name or metadata changed since the last clear
    pub fn is_modified(&self) -> bool {
        self.modified.get()
    }

    pub fn clear_modified(&self) {
        self.modified.set(false);
    }

    pub fn is_coloring_valid(&self) -> bool {
        self.rgba_valid.get()
    }

    /// Mark the coloring stale
    pub fn invalidate_coloring(&self) {
        self.rgba_valid.set(false);
    }

    /// Drop all cached statistics
    pub fn invalidate_statistics(&self) {
        self.fast.replace(None);
        self.descriptive.replace(None);
        self.histogram.replace(None);
    }

    /// Invalidate everything derived from the data
    pub fn data_changed(&self) {
        self.invalidate_coloring();
        self.invalidate_statistics();
    }

    /// Recompute the coloring if it is stale
    ///
    /// Does nothing when the coloring is valid or `data` is empty. The new
    /// buffer is built separately and swapped in once complete.
    pub fn update_coloring<P: PaletteResolver + ?Sized>(
        &self,
        data: &[f32],
        coloring: MapColoring<'_>,
        resolver: &P,
        config: &EngineConfig,
    ) {
        if self.rgba_valid.get() || data.is_empty() {
            return;
        }

        let rgba = match coloring {
            MapColoring::Labels(table) => {
                let (rgba, unknown) = coloring::color_labels(table, resolver, data);
                if unknown > 0 {
                    warn!(
                        map = %self.name,
                        unknown,
                        "label keys in map data have no label in the table"
                    );
                }
                rgba
            }
            MapColoring::Palette(mapping) => match resolver.resolve_palette(&mapping.palette_name) {
                Some(palette) => self.with_fast_statistics(data, config, |fast| {
                    coloring::color_scalars_with_palette(fast, mapping, palette, data)
                }),
                None => {
                    warn!(
                        map = %self.name,
                        palette = %mapping.palette_name,
                        "palette not found, map is left uncolored"
                    );
                    vec![0.0; data.len() * 4]
                }
            },
        };

        debug!(map = %self.name, values = data.len(), "coloring updated");
        self.rgba.replace(rgba);
        self.rgba_valid.set(true);
    }

    /// Get a copy of the cached coloring, four floats per brainordinate
    ///
    /// The copy stays valid across later recolorings of this map.
    pub fn rgba(&self) -> Vec<f32> {
        self.rgba.borrow().clone()
    }

    /// Get the cached coloring as bytes, negative alpha clamped to zero
    pub fn rgba_bytes(&self) -> Vec<u8> {
        coloring::rgba_to_bytes(&self.rgba.borrow())
    }

    /// Run `f` on the fast statistics of `data`, cached until the data is written
    pub fn with_fast_statistics<R>(
        &self,
        data: &[f32],
        config: &EngineConfig,
        f: impl FnOnce(&FastStatistics) -> R,
    ) -> R {
        let mut cache = self.fast.borrow_mut();
        let stats = cache.get_or_insert_with(|| {
            FastStatistics::from_data(data, config.percentile_bucket_limit)
        });
        f(stats)
    }

    /// Statistics of `data`
    ///
    /// Unfiltered results are cached per kind; filtered results are
    /// recomputed on every call.
    pub fn statistics(
        &self,
        kind: StatisticsKind,
        data: &[f32],
        filter: Option<&RangeFilter>,
        config: &EngineConfig,
    ) -> Statistics {
        if filter.is_some() {
            return Statistics::compute(kind, data, filter, config);
        }
        match kind {
            StatisticsKind::Fast => {
                Statistics::Fast(self.with_fast_statistics(data, config, FastStatistics::clone))
            }
            StatisticsKind::Descriptive => {
                let stats = self
                    .descriptive
                    .borrow_mut()
                    .get_or_insert_with(|| DescriptiveStatistics::from_data(data))
                    .clone();
                Statistics::Descriptive(stats)
            }
            StatisticsKind::Histogram => {
                let histogram = self
                    .histogram
                    .borrow_mut()
                    .get_or_insert_with(|| {
                        Histogram::from_data(data, config.histogram_bucket_count)
                    })
                    .clone();
                Statistics::Histogram(histogram)
            }
        }
    }
}
