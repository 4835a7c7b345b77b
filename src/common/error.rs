//! Error handling primitives shared across the core.
//!
//! Startup failures (dataset, training, configuration) are `HccError`s and are
//! fatal. Per-request rejections are not errors; see `validation::Rejection`.

use thiserror::Error;

/// Stable error codes that cross the FFI boundary.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// Dataset file unreadable or incompatible with the schema.
    DatasetFormat = 1,
    /// Labels or encoded features unusable for training.
    TrainingData = 2,
    /// A case was rejected by the validator.
    Rejected = 3,
    /// Input failed structural checks (bad JSON, wrong field count).
    InvalidInput = 4,
    /// Catch-all for bugs, IO and configuration problems.
    Internal = 5,
}

/// Problems with a schema definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate field name `{0}`")]
    DuplicateField(String),
    #[error("field `{0}` declares a range whose minimum exceeds its maximum")]
    InvertedRange(String),
    #[error("field `{0}` declares an empty option set")]
    EmptyOptions(String),
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Canonical error type for the core.
#[derive(Debug, Error)]
pub enum HccError {
    #[error("dataset format error: {0}")]
    DatasetFormat(String),

    #[error("training data error: {0}")]
    TrainingData(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias used throughout the crate.
pub type HccResult<T> = Result<T, HccError>;

impl HccError {
    pub fn dataset_format(msg: impl Into<String>) -> Self {
        Self::DatasetFormat(msg.into())
    }

    pub fn training_data(msg: impl Into<String>) -> Self {
        Self::TrainingData(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Machine parsable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            HccError::DatasetFormat(_) => ErrorCode::DatasetFormat,
            HccError::TrainingData(_) => ErrorCode::TrainingData,
            HccError::InvalidInput(_) => ErrorCode::InvalidInput,
            HccError::Schema(_) | HccError::Config(_) => ErrorCode::Internal,
        }
    }
}

impl From<csv::Error> for HccError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => HccError::dataset_format(format!("unreadable dataset: {err}")),
            _ => HccError::dataset_format(err.to_string()),
        }
    }
}
