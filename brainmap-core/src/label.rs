//! Label tables for categorical map data
//!
//! A label table maps integer keys found in map data to a name and an RGBA
//! color. Alpha may carry a negative "do not draw" sentinel written by
//! upstream tools; consumers must clamp it before converting to bytes.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Key conventionally used for the unassigned label
pub const UNASSIGNED_LABEL_KEY: i32 = 0;

/// One entry of a label table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    /// Integer key stored in map data
    pub key: i32,
    /// Display name
    pub name: String,
    /// Color, components nominally in `[0, 1]`
    pub rgba: [f32; 4],
}

impl Label {
    /// Create a new label
    pub fn new(key: i32, name: impl Into<String>, rgba: [f32; 4]) -> Self {
        Self {
            key,
            name: name.into(),
            rgba,
        }
    }
}

/// Key-ordered label table
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelTable {
    labels: BTreeMap<i32, Label>,
}

impl LabelTable {
    /// Create an empty label table
    pub const fn new() -> Self {
        Self {
            labels: BTreeMap::new(),
        }
    }

    /// Add a label, builder style
    pub fn with_label(mut self, label: Label) -> Self {
        self.insert(label);
        self
    }

    /// Insert or replace the label with the same key
    pub fn insert(&mut self, label: Label) -> Option<Label> {
        self.labels.insert(label.key, label)
    }

    /// Remove a label by key
    pub fn remove(&mut self, key: i32) -> Option<Label> {
        self.labels.remove(&key)
    }

    /// Get the label for a key
    pub fn label(&self, key: i32) -> Option<&Label> {
        self.labels.get(&key)
    }

    /// Get the name for a key
    pub fn label_name(&self, key: i32) -> Option<&str> {
        self.labels.get(&key).map(|l| l.name.as_str())
    }

    /// Get all keys in ascending order
    pub fn keys(&self) -> Vec<i32> {
        self.labels.keys().copied().collect()
    }

    /// Iterate labels in key order
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table has no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
