//! Exact statistics from sorted data

/// Exact order statistics of the finite values of a map
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescriptiveStatistics {
    sorted: Vec<f32>,
    mean: f32,
    population_std_dev: f32,
    sample_std_dev: f32,
}

impl DescriptiveStatistics {
    /// Compute statistics over the finite values of `data`
    pub fn from_data(data: &[f32]) -> Self {
        let mut sorted: Vec<f32> = data.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f32::total_cmp);

        let n = sorted.len();
        if n == 0 {
            return Self::default();
        }
        let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
        let sum_squares: f64 = sorted
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum();
        let sample = if n > 1 {
            (sum_squares / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Self {
            sorted,
            mean: mean as f32,
            population_std_dev: (sum_squares / n as f64).sqrt() as f32,
            sample_std_dev: sample as f32,
        }
    }

    /// Value at a percentile in `[0, 100]`, linearly interpolated
    pub fn percentile(&self, percent: f32) -> f32 {
        let n = self.sorted.len();
        if n == 0 {
            return 0.0;
        }
        let position = (percent.clamp(0.0, 100.0) / 100.0) * (n - 1) as f32;
        let below = position.floor() as usize;
        let above = position.ceil() as usize;
        let fraction = position - below as f32;
        self.sorted[below] + (self.sorted[above] - self.sorted[below]) * fraction
    }

    pub fn median(&self) -> f32 {
        self.percentile(50.0)
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

    pub fn minimum(&self) -> f32 {
        self.sorted.first().copied().unwrap_or(0.0)
    }

    pub fn maximum(&self) -> f32 {
        self.sorted.last().copied().unwrap_or(0.0)
    }

    /// Number of finite values
    pub fn count(&self) -> usize {
        self.sorted.len()
    }

    pub fn positive_count(&self) -> usize {
        self.sorted.len() - self.sorted.partition_point(|&v| v <= 0.0)
    }

    pub fn negative_count(&self) -> usize {
        self.sorted.partition_point(|&v| v < 0.0)
    }
}
