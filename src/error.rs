//! Error types for validation, storage and record decoding

use thiserror::Error;

/// User input rejected before any mutation happened
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("muscle group name cannot be empty")]
    EmptyName,

    #[error("muscle group `{0}` already exists")]
    AlreadyExists(String),

    #[error("unknown muscle group `{0}`")]
    UnknownMuscle(String),

    #[error("number of sets must be positive, got {0}")]
    NonPositiveSets(i64),

    #[error("`{0}` is not a number of sets")]
    NotANumber(String),
}

/// Key-value store read/write/remove failure
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persisted value could not be encoded or decoded
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("malformed record under `{key}`: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("schema version `{0}` is not a number")]
    BadVersion(String),
}

/// Umbrella error returned by the tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl TrackerError {
    /// True when the in-memory state changed but could not be saved
    pub fn is_persistence(&self) -> bool {
        matches!(self, TrackerError::Storage(_) | TrackerError::Codec(_))
    }
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;

/// Parse a user-entered set count
pub fn parse_set_count(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    if value <= 0 {
        return Err(ValidationError::NonPositiveSets(value));
    }
    u32::try_from(value).map_err(|_| ValidationError::NotANumber(trimmed.to_string()))
}
