//! Map statistics
//!
//! Three kinds of statistics are derived from map data: [`FastStatistics`]
//! (counts, ranges and approximate percentiles, used for palette scaling),
//! [`DescriptiveStatistics`] (exact sorted-order statistics) and
//! [`Histogram`]. Any of them can be restricted with a [`RangeFilter`].

pub mod descriptive;
pub mod fast;
pub mod histogram;

pub use descriptive::DescriptiveStatistics;
pub use fast::FastStatistics;
pub use histogram::Histogram;

use crate::config::EngineConfig;

/// Which statistics to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticsKind {
    Fast,
    Descriptive,
    Histogram,
}

/// Value bands kept when computing filtered statistics
///
/// Positive values are kept inside `[least_positive, most_positive]`,
/// negative values inside `[most_negative, least_negative]`, and exact zeros
/// only when `include_zero` is set. NaN never passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub most_positive: f32,
    pub least_positive: f32,
    pub least_negative: f32,
    pub most_negative: f32,
    pub include_zero: bool,
}

impl RangeFilter {
    /// Create a filter from its four band limits
    pub const fn new(
        most_positive: f32,
        least_positive: f32,
        least_negative: f32,
        most_negative: f32,
        include_zero: bool,
    ) -> Self {
        Self {
            most_positive,
            least_positive,
            least_negative,
            most_negative,
            include_zero,
        }
    }

    /// Whether a value passes the filter
    pub fn accepts(&self, value: f32) -> bool {
        if value > 0.0 {
            value >= self.least_positive && value <= self.most_positive
        } else if value < 0.0 {
            value >= self.most_negative && value <= self.least_negative
        } else if value == 0.0 {
            self.include_zero
        } else {
            false
        }
    }

    /// Copy the values that pass the filter
    pub fn apply(&self, data: &[f32]) -> Vec<f32> {
        data.iter().copied().filter(|&v| self.accepts(v)).collect()
    }
}

/// Statistics of one kind
#[derive(Debug, Clone, PartialEq)]
pub enum Statistics {
    Fast(FastStatistics),
    Descriptive(DescriptiveStatistics),
    Histogram(Histogram),
}

impl Statistics {
    /// Compute statistics of a kind over `data`, optionally filtered
    pub fn compute(
        kind: StatisticsKind,
        data: &[f32],
        filter: Option<&RangeFilter>,
        config: &EngineConfig,
    ) -> Self {
        let filtered;
        let values = match filter {
            Some(filter) => {
                filtered = filter.apply(data);
                filtered.as_slice()
            }
            None => data,
        };
        match kind {
            StatisticsKind::Fast => Statistics::Fast(FastStatistics::from_data(
                values,
                config.percentile_bucket_limit,
            )),
            StatisticsKind::Descriptive => {
                Statistics::Descriptive(DescriptiveStatistics::from_data(values))
            }
            StatisticsKind::Histogram => Statistics::Histogram(Histogram::from_data(
                values,
                config.histogram_bucket_count,
            )),
        }
    }

    /// Get the kind of these statistics
    pub fn kind(&self) -> StatisticsKind {
        match self {
            Statistics::Fast(_) => StatisticsKind::Fast,
            Statistics::Descriptive(_) => StatisticsKind::Descriptive,
            Statistics::Histogram(_) => StatisticsKind::Histogram,
        }
    }

    /// Get fast statistics, if that is the kind
    pub fn as_fast(&self) -> Option<&FastStatistics> {
        match self {
            Statistics::Fast(s) => Some(s),
            _ => None,
        }
    }

    /// Get descriptive statistics, if that is the kind
    pub fn as_descriptive(&self) -> Option<&DescriptiveStatistics> {
        match self {
            Statistics::Descriptive(s) => Some(s),
            _ => None,
        }
    }

    /// Get the histogram, if that is the kind
    pub fn as_histogram(&self) -> Option<&Histogram> {
        match self {
            Statistics::Histogram(h) => Some(h),
            _ => None,
        }
    }
}
