//! Fixed-bucket histogram over finite values

/// Histogram of finite values over `[minimum, maximum]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    minimum: f32,
    maximum: f32,
    counts: Vec<u64>,
    cumulative: Vec<u64>,
}

impl Histogram {
    /// Build a histogram with `bucket_count` buckets; non-finite values are skipped
    pub fn from_data(data: &[f32], bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        let mut minimum = f32::INFINITY;
        let mut maximum = f32::NEG_INFINITY;
        for &v in data.iter().filter(|v| v.is_finite()) {
            minimum = minimum.min(v);
            maximum = maximum.max(v);
        }
        if minimum > maximum {
            return Self {
                minimum: 0.0,
                maximum: 0.0,
                counts: vec![0; bucket_count],
                cumulative: vec![0; bucket_count],
            };
        }

        let mut counts = vec![0u64; bucket_count];
        let width = maximum - minimum;
        for &v in data.iter().filter(|v| v.is_finite()) {
            let bucket = if width > 0.0 {
                let scaled = ((v - minimum) / width * bucket_count as f32).floor();
                (scaled.max(0.0) as usize).min(bucket_count - 1)
            } else {
                0
            };
            counts[bucket] += 1;
        }

        let cumulative = counts
            .iter()
            .scan(0u64, |sum, &c| {
                *sum += c;
                Some(*sum)
            })
            .collect();

        Self {
            minimum,
            maximum,
            counts,
            cumulative,
        }
    }

    /// Get the `(minimum, maximum)` covered by the buckets
    pub fn range(&self) -> (f32, f32) {
        (self.minimum, self.maximum)
    }

    /// Get the per-bucket counts
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Get the running totals of the bucket counts
    pub fn cumulative_counts(&self) -> &[u64] {
        &self.cumulative
    }

    /// Get the number of buckets
    pub fn bucket_count(&self) -> usize {
        self.counts.len()
    }

    /// Get the width of one bucket
    pub fn bucket_width(&self) -> f32 {
        if self.counts.is_empty() {
            return 0.0;
        }
        (self.maximum - self.minimum) / self.counts.len() as f32
    }

    /// Get the number of values counted
    pub fn total_count(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Approximate the value at a fractional rank by interpolating inside the bucket
    ///
    /// `rank` is in `[0, total_count]`; returns `None` when the histogram
    /// cannot place the rank.
    pub(crate) fn value_at_rank(&self, rank: f32) -> Option<f32> {
        let n = self.cumulative.len() as isize;
        let (mut low, mut high) = (-1isize, n);
        while high - low > 1 {
            let guess = (low + high) / 2;
            if self.cumulative[guess as usize] as f32 <= rank {
                low = guess;
            } else {
                high = guess;
            }
        }
        if high == n {
            return None;
        }

        let width = self.bucket_width();
        let lower_count = if low > -1 {
            self.cumulative[low as usize]
        } else {
            0
        };
        let upper_count = self.cumulative[high as usize];
        let low_value = self.minimum + (low + 1) as f32 * width;
        let high_value = self.minimum + (high + 1) as f32 * width;
        let span = (upper_count - lower_count) as f32;
        Some(low_value + (high_value - low_value) * (rank - lower_count as f32) / span)
    }
}
