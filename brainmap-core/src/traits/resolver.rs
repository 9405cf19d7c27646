//! Palette, label and selection collaborators

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::label::{Label, LabelTable};
use crate::palette::Palette;
use crate::types::DisplayGroup;

/// Trait for turning palette names and label keys into colors
pub trait PaletteResolver {
    /// Find a palette by name
    fn resolve_palette(&self, name: &str) -> Option<&Palette>;

    /// Find the label for a key in a table
    fn resolve_label<'t>(&self, table: &'t LabelTable, key: i32) -> Option<&'t Label> {
        table.label(key)
    }
}

/// Trait for display selection state
pub trait VisibilityOracle {
    /// Whether a label is selected for drawing in a display group and tab
    fn is_selected(&self, label: &Label, group: DisplayGroup, tab_index: usize) -> bool;
}

/// Oracle that reports every label as selected
#[derive(Debug, Clone, Copy, Default)]
pub struct AllSelected;

impl VisibilityOracle for AllSelected {
    fn is_selected(&self, _label: &Label, _group: DisplayGroup, _tab_index: usize) -> bool {
        true
    }
}

/// Named collection of palettes
#[derive(Debug, Clone, Default)]
pub struct PaletteCatalog {
    palettes: BTreeMap<String, Palette>,
}

impl PaletteCatalog {
    /// Create an empty catalog
    pub const fn new() -> Self {
        Self {
            palettes: BTreeMap::new(),
        }
    }

    /// Add a palette, builder style
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.insert(palette);
        self
    }

    /// Insert or replace a palette with the same name
    pub fn insert(&mut self, palette: Palette) {
        self.palettes.insert(String::from(palette.name()), palette);
    }

    /// Number of palettes
    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }
}

impl PaletteResolver for PaletteCatalog {
    fn resolve_palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }
}
