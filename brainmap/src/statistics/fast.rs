//! Single-pass statistics used for palette scaling
//!
//! NaN and infinite values are counted but otherwise ignored. Percentiles
//! are approximated from per-sign histograms so they stay cheap on maps
//! with millions of values.

use super::histogram::Histogram;

/// Counts, ranges and approximate percentiles of one map's data
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FastStatistics {
    positive_count: usize,
    zero_count: usize,
    negative_count: usize,
    infinity_count: usize,
    negative_infinity_count: usize,
    nan_count: usize,
    mean: f32,
    population_std_dev: f32,
    sample_std_dev: f32,
    most_positive: f32,
    least_positive: f32,
    least_negative: f32,
    most_negative: f32,
    most_absolute: f32,
    least_absolute: f32,
    minimum: f32,
    maximum: f32,
    positive_histogram: Histogram,
    negative_histogram: Histogram,
    absolute_histogram: Histogram,
}

impl FastStatistics {
    /// Compute statistics over `data`
    ///
    /// `bucket_limit` caps the histogram resolution used for percentiles.
    pub fn from_data(data: &[f32], bucket_limit: usize) -> Self {
        let mut stats = Self {
            least_positive: f32::MAX,
            least_negative: f32::MIN,
            least_absolute: f32::MAX,
            ..Self::default()
        };

        let mut positives = Vec::new();
        let mut negatives = Vec::new();
        let mut absolutes = Vec::new();
        let mut sum = 0.0f64;
        let mut first = true;

        for &v in data {
            if v.is_nan() {
                stats.nan_count += 1;
                continue;
            }
            if v.is_infinite() {
                if v > 0.0 {
                    stats.infinity_count += 1;
                } else {
                    stats.negative_infinity_count += 1;
                }
                continue;
            }
            if v == 0.0 {
                stats.zero_count += 1;
            } else if v < 0.0 {
                negatives.push(v);
                stats.least_negative = stats.least_negative.max(v);
                stats.most_negative = stats.most_negative.min(v);
                absolutes.push(-v);
            } else {
                positives.push(v);
                stats.most_positive = stats.most_positive.max(v);
                stats.least_positive = stats.least_positive.min(v);
                absolutes.push(v);
            }
            if first || v > stats.maximum {
                stats.maximum = v;
            }
            if first || v < stats.minimum {
                stats.minimum = v;
            }
            sum += v as f64;
            first = false;
        }

        stats.positive_count = positives.len();
        stats.negative_count = negatives.len();
        for &a in &absolutes {
            stats.most_absolute = stats.most_absolute.max(a);
            stats.least_absolute = stats.least_absolute.min(a);
        }

        let good = stats.positive_count + stats.zero_count + stats.negative_count;
        if good > 0 {
            let mean = sum / good as f64;
            let sum_squares: f64 = data
                .iter()
                .filter(|v| v.is_finite())
                .map(|&v| {
                    let d = v as f64 - mean;
                    d * d
                })
                .sum();
            stats.mean = mean as f32;
            stats.population_std_dev = (sum_squares / good as f64).sqrt() as f32;
            if good > 1 {
                stats.sample_std_dev = (sum_squares / (good - 1) as f64).sqrt() as f32;
            }
        }

        let buckets = bucket_limit.min(data.len()).max(1);
        stats.positive_histogram = Histogram::from_data(&positives, buckets);
        stats.negative_histogram = Histogram::from_data(&negatives, buckets);
        stats.absolute_histogram = Histogram::from_data(&absolutes, buckets);

        if stats.negative_count == 0 {
            stats.least_negative = 0.0;
            stats.most_negative = 0.0;
        }
        if stats.positive_count == 0 {
            stats.least_positive = 0.0;
            stats.most_positive = 0.0;
        }
        if absolutes.is_empty() {
            stats.least_absolute = 0.0;
            stats.most_absolute = 0.0;
        }
        stats
    }

    /// Get `(most_negative, least_negative, least_positive, most_positive)`
    pub fn nonzero_ranges(&self) -> (f32, f32, f32, f32) {
        (
            self.most_negative,
            self.least_negative,
            self.least_positive,
            self.most_positive,
        )
    }

    /// Approximate percentile of the positive values
    pub fn approx_positive_percentile(&self, percent: f32) -> f32 {
        let count = self.positive_count as f32;
        let rank = percent / 100.0 * count;
        if rank <= 0.0 {
            return self.least_positive;
        }
        if rank >= count {
            return self.most_positive;
        }
        self.positive_histogram
            .value_at_rank(rank)
            .unwrap_or(self.most_positive)
    }

    /// Approximate percentile of the negative values, measured from zero
    ///
    /// 98 percent is close to the most negative value, 2 percent close to
    /// the least negative.
    pub fn approx_negative_percentile(&self, percent: f32) -> f32 {
        let count = self.negative_count as f32;
        let rank = count - percent / 100.0 * count;
        if rank <= 0.0 {
            return self.most_negative;
        }
        if rank >= count {
            return self.least_negative;
        }
        self.negative_histogram
            .value_at_rank(rank)
            .unwrap_or(self.most_negative)
    }

    /// Approximate percentile of the absolute values
    pub fn approx_absolute_percentile(&self, percent: f32) -> f32 {
        let count = self.absolute_histogram.total_count() as f32;
        let rank = percent / 100.0 * count;
        if rank <= 0.0 {
            return self.least_absolute;
        }
        if rank >= count {
            return self.most_absolute;
        }
        self.absolute_histogram
            .value_at_rank(rank)
            .unwrap_or(self.most_absolute)
    }

    pub fn positive_count(&self) -> usize {
        self.positive_count
    }

    pub fn zero_count(&self) -> usize {
        self.zero_count
    }

    pub fn negative_count(&self) -> usize {
        self.negative_count
    }

    pub fn infinity_count(&self) -> usize {
        self.infinity_count
    }

    pub fn negative_infinity_count(&self) -> usize {
        self.negative_infinity_count
    }

    pub fn nan_count(&self) -> usize {
        self.nan_count
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn population_std_dev(&self) -> f32 {
        self.population_std_dev
    }

    pub fn sample_std_dev(&self) -> f32 {
        self.sample_std_dev
    }

    pub fn most_positive(&self) -> f32 {
        self.most_positive
    }

    pub fn least_positive(&self) -> f32 {
        self.least_positive
    }

    pub fn least_negative(&self) -> f32 {
        self.least_negative
    }

    pub fn most_negative(&self) -> f32 {
        self.most_negative
    }

    pub fn most_absolute(&self) -> f32 {
        self.most_absolute
    }

    pub fn least_absolute(&self) -> f32 {
        self.least_absolute
    }

    /// Smallest finite value, zero when there is none
    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    /// Largest finite value, zero when there is none
    pub fn maximum(&self) -> f32 {
        self.maximum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_counts_and_ranges() {
        let data = [
            -4.0,
            -1.0,
            0.0,
            2.0,
            6.0,
            f32::NAN,
            f32::INFINITY,
            f32::NEG_INFINITY,
        ];
        let stats = FastStatistics::from_data(&data, 10_000);

        assert_eq!(stats.negative_count(), 2);
        assert_eq!(stats.zero_count(), 1);
        assert_eq!(stats.positive_count(), 2);
        assert_eq!(stats.nan_count(), 1);
        assert_eq!(stats.infinity_count(), 1);
        assert_eq!(stats.negative_infinity_count(), 1);
        assert_eq!(stats.nonzero_ranges(), (-4.0, -1.0, 2.0, 6.0));
        assert_eq!(stats.minimum(), -4.0);
        assert_eq!(stats.maximum(), 6.0);
        assert_eq!(stats.most_absolute(), 6.0);
        assert_eq!(stats.least_absolute(), 1.0);
        assert_relative_eq!(stats.mean(), 0.6, epsilon = 1e-6);
    }

    #[test]
    fn test_no_negatives_reports_zero_range() {
        let stats = FastStatistics::from_data(&[1.0, 2.0, 3.0], 100);
        assert_eq!(stats.most_negative(), 0.0);
        assert_eq!(stats.least_negative(), 0.0);
        assert_relative_eq!(stats.sample_std_dev(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_data() {
        let stats = FastStatistics::from_data(&[], 100);
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.nonzero_ranges(), (0.0, 0.0, 0.0, 0.0));
        assert_eq!(stats.approx_positive_percentile(50.0), 0.0);
    }

    #[test]
    fn test_percentile_extremes() {
        let data: Vec<f32> = (1..=100).map(|v| v as f32).collect();
        let stats = FastStatistics::from_data(&data, 10_000);
        assert_eq!(stats.approx_positive_percentile(0.0), 1.0);
        assert_eq!(stats.approx_positive_percentile(100.0), 100.0);

        let negated: Vec<f32> = data.iter().map(|v| -v).collect();
        let stats = FastStatistics::from_data(&negated, 10_000);
        assert_eq!(stats.approx_negative_percentile(100.0), -100.0);
        assert_eq!(stats.approx_negative_percentile(0.0), -1.0);
    }

    #[test]
    fn test_uniform_percentiles_are_close() {
        let mut rng = StdRng::seed_from_u64(7);
        let data: Vec<f32> = (0..50_000).map(|_| rng.gen_range(0.0..1000.0)).collect();
        let stats = FastStatistics::from_data(&data, 10_000);

        let p98 = stats.approx_positive_percentile(98.0);
        let p2 = stats.approx_absolute_percentile(2.0);
        assert!((p98 - 980.0).abs() < 10.0, "p98 = {p98}");
        assert!((p2 - 20.0).abs() < 10.0, "p2 = {p2}");
    }
}
