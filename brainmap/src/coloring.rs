//! Palette and label coloring
//!
//! This module turns map data into RGBA buffers (four `f32` channels per
//! value). Scalar data is first normalized into `[-1, 1]` from the palette
//! scale mode and the map's [`FastStatistics`], then looked up in a
//! [`Palette`]. Label data is colored straight from its label table.

use brainmap_core::{
    LabelTable, Palette, PaletteColorMapping, PaletteResolver, ScaleMode, SMALL_NEGATIVE,
    SMALL_POSITIVE,
};

use crate::statistics::FastStatistics;

/// Gap kept between zero and the smallest normalized magnitude
pub const NORMALIZATION_ZONE: f32 = 0.00001;

/// Data values bounding the palette, as
/// `(most_negative, least_negative, least_positive, most_positive)`
pub fn scale_bounds(mapping: &PaletteColorMapping, stats: &FastStatistics) -> (f32, f32, f32, f32) {
    match mapping.scale_mode {
        ScaleMode::AutoScale => stats.nonzero_ranges(),
        ScaleMode::AutoScaleAbsolutePercentage { minimum, maximum } => {
            let most = stats.approx_absolute_percentile(maximum);
            let least = stats.approx_absolute_percentile(minimum);
            (-most, -least, least, most)
        }
        ScaleMode::AutoScalePercentage {
            negative_maximum,
            negative_minimum,
            positive_minimum,
            positive_maximum,
        } => (
            stats.approx_negative_percentile(negative_maximum),
            stats.approx_negative_percentile(negative_minimum),
            stats.approx_positive_percentile(positive_minimum),
            stats.approx_positive_percentile(positive_maximum),
        ),
        ScaleMode::UserScale {
            negative_maximum,
            negative_minimum,
            positive_minimum,
            positive_maximum,
        } => (
            negative_maximum,
            negative_minimum,
            positive_minimum,
            positive_maximum,
        ),
    }
}

/// Map data values onto the normalized palette range `[-1, 1]`
///
/// Positive values land in `[ZONE, 1]` and negative values in
/// `[-1, -ZONE]`. A sign whose bounds collapse to a single value maps every
/// value of that sign to the extreme.
pub fn normalize(mapping: &PaletteColorMapping, stats: &FastStatistics, data: &[f32]) -> Vec<f32> {
    let (most_negative, least_negative, least_positive, most_positive) =
        scale_bounds(mapping, stats);

    let positive_denominator = (most_positive - least_positive) / (1.0 - NORMALIZATION_ZONE);
    let negative_denominator = (most_negative - least_negative) / (-1.0 + NORMALIZATION_ZONE);
    let positive_valid = positive_denominator != 0.0;
    let negative_valid = negative_denominator != 0.0;

    data.iter()
        .map(|&v| {
            if v > 0.0 {
                if positive_valid {
                    ((v - least_positive) / positive_denominator + NORMALIZATION_ZONE)
                        .clamp(NORMALIZATION_ZONE, 1.0)
                } else {
                    1.0
                }
            } else if v < 0.0 {
                if negative_valid {
                    ((v - least_negative) / negative_denominator - NORMALIZATION_ZONE)
                        .clamp(-1.0, -NORMALIZATION_ZONE)
                } else {
                    -1.0
                }
            } else {
                0.0
            }
        })
        .collect()
}

/// Color scalar data with a palette
///
/// Values hidden by the sign display flags, NaN values and values failing
/// the threshold stay fully transparent black.
pub fn color_scalars_with_palette(
    stats: &FastStatistics,
    mapping: &PaletteColorMapping,
    palette: &Palette,
    data: &[f32],
) -> Vec<f32> {
    let mut rgba = vec![0.0f32; data.len() * 4];
    if data.is_empty() {
        return rgba;
    }

    let normalized = normalize(mapping, stats, data);
    let interpolate = mapping.interpolate;
    let positive_one = palette.color(1.0, interpolate);
    let negative_one = palette.color(-1.0, interpolate);

    for ((&value, &normal), out) in data
        .iter()
        .zip(normalized.iter())
        .zip(rgba.chunks_exact_mut(4))
    {
        if value > SMALL_POSITIVE {
            if !mapping.display_positive {
                continue;
            }
        } else if value < SMALL_NEGATIVE {
            if !mapping.display_negative {
                continue;
            }
        } else if value.is_nan() || !mapping.display_zero {
            continue;
        }

        let color = if normal >= 1.0 {
            positive_one
        } else if normal <= -1.0 {
            negative_one
        } else {
            palette.color(normal, interpolate)
        };
        if color[3] > 0.0 {
            out.copy_from_slice(&color);
        }

        if let Some(threshold) = &mapping.threshold {
            if !threshold.passes(value) {
                out.fill(0.0);
            }
        }
    }
    rgba
}

/// Color label data from its label table
///
/// Each value is truncated to an `i32` key. Returns the RGBA buffer and the
/// number of values whose key has no label; those stay zero.
pub fn color_labels<P: PaletteResolver + ?Sized>(
    table: &LabelTable,
    resolver: &P,
    data: &[f32],
) -> (Vec<f32>, usize) {
    let mut rgba = vec![0.0f32; data.len() * 4];
    let mut unknown = 0;
    for (&value, out) in data.iter().zip(rgba.chunks_exact_mut(4)) {
        match resolver.resolve_label(table, value as i32) {
            Some(label) => {
                out.copy_from_slice(&label.rgba);
                if out[3] < 0.0 {
                    out[3] = 0.0;
                }
            }
            None => unknown += 1,
        }
    }
    (rgba, unknown)
}

/// Convert one float channel to a byte
#[inline]
pub fn channel_to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0) as u8
}

/// Convert float RGBA to bytes; negative alpha becomes zero
pub fn rgba_to_bytes(rgba: &[f32]) -> Vec<u8> {
    rgba.iter().copied().map(channel_to_byte).collect()
}
