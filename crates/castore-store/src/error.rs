/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No base path was configured.
    #[error("base path cannot be empty")]
    NoBasePath,

    /// A configuration value is out of range or could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input stream is longer than the configured ceiling. Nothing was stored.
    #[error("object exceeds the maximum size of {limit} bytes")]
    SizeExceeded { limit: u64 },

    /// The key is too short for the configured path mapper.
    #[error("key {key:?} is too short for this layout: need at least {required} characters")]
    KeyTooShort { key: String, required: usize },

    /// The key cannot name a file under the base path.
    #[error("invalid object key: {0:?}")]
    InvalidKey(String),

    /// The path mapper produced a segment that is not a single directory name.
    #[error("path mapper returned invalid segment {segment:?} for key {key:?}")]
    InvalidSegment { key: String, segment: String },

    /// I/O error from the filesystem or the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for errors raised while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::NoBasePath | Self::InvalidConfig(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
