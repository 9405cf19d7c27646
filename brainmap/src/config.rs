//! Engine configuration

/// Default number of buckets in a map histogram
pub const DEFAULT_HISTOGRAM_BUCKETS: usize = 100;

/// Upper bound on buckets used for approximate percentiles
pub const DEFAULT_PERCENTILE_BUCKET_LIMIT: usize = 10_000;

/// Tunables for opening and querying brainordinate matrix files
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Number of buckets in histogram statistics
    pub histogram_bucket_count: usize,
    /// Maximum buckets used when approximating percentiles
    pub percentile_bucket_limit: usize,
    /// Treat dense connectivity matrices as oversized and refuse writes
    pub reject_dense_matrix_writes: bool,
    /// Log label keys missing from, or unused by, each label map at open
    pub validate_label_tables_on_open: bool,
    /// Log every map name at open
    pub log_map_names_on_open: bool,
}

impl EngineConfig {
    /// Create the default configuration
    pub const fn new() -> Self {
        Self {
            histogram_bucket_count: DEFAULT_HISTOGRAM_BUCKETS,
            percentile_bucket_limit: DEFAULT_PERCENTILE_BUCKET_LIMIT,
            reject_dense_matrix_writes: true,
            validate_label_tables_on_open: true,
            log_map_names_on_open: false,
        }
    }

    /// Set the histogram bucket count (at least one)
    pub fn with_histogram_bucket_count(mut self, buckets: usize) -> Self {
        self.histogram_bucket_count = buckets.max(1);
        self
    }

    /// Set the percentile bucket limit (at least one)
    pub fn with_percentile_bucket_limit(mut self, buckets: usize) -> Self {
        self.percentile_bucket_limit = buckets.max(1);
        self
    }

    /// Allow or refuse writes to dense connectivity matrices
    pub fn with_reject_dense_matrix_writes(mut self, reject: bool) -> Self {
        self.reject_dense_matrix_writes = reject;
        self
    }

    /// Enable or disable label table validation at open
    pub fn with_label_validation(mut self, validate: bool) -> Self {
        self.validate_label_tables_on_open = validate;
        self
    }

    /// Enable or disable logging of map names at open
    pub fn with_map_name_logging(mut self, log: bool) -> Self {
        self.log_map_names_on_open = log;
        self
    }

    /// Parse a configuration from JSON; missing fields take defaults
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize this configuration to JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
