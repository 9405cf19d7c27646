//! Palettes and palette color mapping settings
//!
//! A [`Palette`] is a color ramp over the normalized range `[-1, 1]`. A
//! [`PaletteColorMapping`] holds the per-map settings that decide how raw
//! data is normalized into that range (scale mode), which signs are shown,
//! and how values are thresholded.

use alloc::string::String;
use alloc::vec::Vec;

/// Name of the palette selected by a default color mapping
pub const DEFAULT_PALETTE_NAME: &str = "ROY-BIG-BL";

/// Magnitude below which a value is treated as zero when deciding its sign
pub const SMALL_POSITIVE: f32 = 0.00001;

/// Negative counterpart of [`SMALL_POSITIVE`]
pub const SMALL_NEGATIVE: f32 = -0.00001;

/// Palettes with more control points than this use binary search
const BINARY_SEARCH_THRESHOLD: usize = 50;

/// One control point of a palette
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PalettePoint {
    /// Normalized position in `[-1, 1]`
    pub scalar: f32,
    /// RGB color, or `None` for the transparent "none" color
    pub rgb: Option<[f32; 3]>,
}

impl PalettePoint {
    /// Create a colored control point
    pub const fn new(scalar: f32, rgb: [f32; 3]) -> Self {
        Self {
            scalar,
            rgb: Some(rgb),
        }
    }

    /// Create a control point that draws nothing
    pub const fn none(scalar: f32) -> Self {
        Self { scalar, rgb: None }
    }
}

/// Continuous color ramp over `[-1, 1]`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    name: String,
    /// Control points in descending scalar order
    points: Vec<PalettePoint>,
}

impl Palette {
    /// Create a palette; control points are sorted into descending order
    pub fn new(name: impl Into<String>, mut points: Vec<PalettePoint>) -> Self {
        points.sort_by(|a, b| b.scalar.total_cmp(&a.scalar));
        Self {
            name: name.into(),
            points,
        }
    }

    /// Get the palette name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the control points in descending scalar order
    pub fn points(&self) -> &[PalettePoint] {
        &self.points
    }

    /// Get the color for a normalized value
    ///
    /// The value is clamped to `[-1, 1]`. The control point at or below the
    /// value supplies the color; with `interpolate` set the color is blended
    /// with the next point down. A two-point palette always interpolates.
    /// Landing on a "none" point yields alpha zero.
    pub fn color(&self, normalized: f32, interpolate: bool) -> [f32; 4] {
        let mut rgba = [0.0, 0.0, 0.0, 1.0];
        let count = self.points.len();
        if count == 0 {
            return rgba;
        }

        let scalar = normalized.clamp(-1.0, 1.0);
        let mut interpolate = interpolate;
        let index = if count == 1 {
            interpolate = false;
            0
        } else if scalar >= self.points[0].scalar {
            interpolate = false;
            0
        } else if scalar <= self.points[count - 1].scalar {
            interpolate = false;
            count - 1
        } else if count == 2 {
            interpolate = true;
            0
        } else if count > BINARY_SEARCH_THRESHOLD {
            // First point strictly below the scalar, then step back one.
            let below = self.points.partition_point(|p| p.scalar >= scalar);
            below.saturating_sub(1)
        } else {
            self.points
                .iter()
                .skip(1)
                .position(|p| scalar > p.scalar)
                .unwrap_or(count - 2)
        };

        let point = self.points[index];
        let Some(above) = point.rgb else {
            rgba[3] = 0.0;
            return rgba;
        };
        rgba[..3].copy_from_slice(&above);

        if interpolate && index + 1 < count {
            let next = self.points[index + 1];
            let total = point.scalar - next.scalar;
            if let (Some(below), true) = (next.rgb, total != 0.0) {
                let fraction_above = (scalar - next.scalar) / total;
                let fraction_below = 1.0 - fraction_above;
                for c in 0..3 {
                    rgba[c] = fraction_above * above[c] + fraction_below * below[c];
                }
            }
        }
        rgba
    }
}

/// How data values are mapped onto the normalized palette range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleMode {
    /// Full non-zero data range
    AutoScale,
    /// Percentiles of the absolute values
    AutoScaleAbsolutePercentage { minimum: f32, maximum: f32 },
    /// Percentiles of the positive and negative values separately
    AutoScalePercentage {
        negative_maximum: f32,
        negative_minimum: f32,
        positive_minimum: f32,
        positive_maximum: f32,
    },
    /// Explicit data values
    UserScale {
        negative_maximum: f32,
        negative_minimum: f32,
        positive_minimum: f32,
        positive_maximum: f32,
    },
}

impl Default for ScaleMode {
    fn default() -> Self {
        ScaleMode::AutoScalePercentage {
            negative_maximum: 98.0,
            negative_minimum: 2.0,
            positive_minimum: 2.0,
            positive_maximum: 98.0,
        }
    }
}

/// Which side of the threshold range is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdTest {
    #[default]
    ShowOutside,
    ShowInside,
}

/// Threshold applied after palette coloring
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Threshold {
    pub test: ThresholdTest,
    pub minimum: f32,
    pub maximum: f32,
}

impl Threshold {
    /// Whether a value passes this threshold
    pub fn passes(&self, value: f32) -> bool {
        match self.test {
            ThresholdTest::ShowOutside => value > self.maximum || value < self.minimum,
            ThresholdTest::ShowInside => value >= self.minimum && value <= self.maximum,
        }
    }
}

/// Per-map palette settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaletteColorMapping {
    /// Name of the palette resolved at coloring time
    pub palette_name: String,
    pub scale_mode: ScaleMode,
    pub interpolate: bool,
    pub display_positive: bool,
    pub display_negative: bool,
    pub display_zero: bool,
    /// Thresholding, `None` when off
    pub threshold: Option<Threshold>,
}

impl Default for PaletteColorMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteColorMapping {
    /// Create a mapping with default settings
    pub fn new() -> Self {
        Self {
            palette_name: String::from(DEFAULT_PALETTE_NAME),
            scale_mode: ScaleMode::default(),
            interpolate: true,
            display_positive: true,
            display_negative: true,
            display_zero: false,
            threshold: None,
        }
    }

    /// Select a palette by name
    pub fn with_palette_name(mut self, name: impl Into<String>) -> Self {
        self.palette_name = name.into();
        self
    }

    /// Set the scale mode
    pub fn with_scale_mode(mut self, mode: ScaleMode) -> Self {
        self.scale_mode = mode;
        self
    }

    /// Set the displayed signs
    pub fn with_display(mut self, positive: bool, negative: bool, zero: bool) -> Self {
        self.display_positive = positive;
        self.display_negative = negative;
        self.display_zero = zero;
        self
    }

    /// Enable thresholding
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = Some(threshold);
        self
    }
}
