//! Error Types
//!
//! Generator errors are fatal to the single call. Record errors are isolated
//! per row and only logged. Aggregation aborts on an empty batch.

use std::path::PathBuf;

use thiserror::Error;

use crate::core_types::Key;

/// Invalid workload parameters. Never silently corrected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("size must be positive")]
    ZeroSize,

    #[error("size {0} is not a power of two")]
    NonPowerOfTwoSize(usize),

    #[error("hotspot ratio {0} is outside [0, 1]")]
    RatioOutOfRange(f64),

    #[error("hotspot count {count} exceeds size {size}")]
    TooManyHotspots { count: usize, size: usize },

    #[error("cannot sample {requested} distinct keys from a range of {available}")]
    SampleExceedsRange { requested: usize, available: u64 },

    #[error("key range [{start}, {end}) is empty or contains 0")]
    InvalidKeyRange { start: Key, end: Key },

    #[error("unsupported sequence type: {0}")]
    UnsupportedType(String),
}

impl ConfigurationError {
    /// Stable code attached to error log lines
    pub fn code(&self) -> &'static str {
        match self {
            ConfigurationError::ZeroSize => "ZERO_SIZE",
            ConfigurationError::NonPowerOfTwoSize(_) => "NON_POWER_OF_TWO_SIZE",
            ConfigurationError::RatioOutOfRange(_) => "RATIO_OUT_OF_RANGE",
            ConfigurationError::TooManyHotspots { .. } => "TOO_MANY_HOTSPOTS",
            ConfigurationError::SampleExceedsRange { .. } => "SAMPLE_EXCEEDS_RANGE",
            ConfigurationError::InvalidKeyRange { .. } => "INVALID_KEY_RANGE",
            ConfigurationError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
        }
    }
}

/// Failure reading or writing the sequence file format
#[derive(Error, Debug)]
pub enum SequenceFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid key {token:?} at position {position}")]
    InvalidToken { position: usize, token: String },

    #[error("key at position {position} is 0; keys are 1-based")]
    NonPositiveKey { position: usize },
}

impl SequenceFileError {
    pub fn code(&self) -> &'static str {
        match self {
            SequenceFileError::Io { .. } => "SEQUENCE_IO",
            SequenceFileError::InvalidToken { .. } => "INVALID_TOKEN",
            SequenceFileError::NonPositiveKey { .. } => "NON_POSITIVE_KEY",
        }
    }
}

/// Why a single result row was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordFault {
    #[error("missing column {0}")]
    MissingColumn(&'static str),

    #[error("column {column} has invalid value {value:?}")]
    InvalidNumber { column: &'static str, value: String },

    #[error("column {column} is negative: {value}")]
    NegativeValue { column: &'static str, value: String },

    #[error("lower bound must be positive")]
    ZeroBound,

    #[error("header matches neither the algorithm nor the lower-bound schema")]
    UnrecognizedShape,

    #[error("row has {found} fields, header has {expected}")]
    FieldCount { expected: usize, found: usize },
}

impl RecordFault {
    pub fn code(&self) -> &'static str {
        match self {
            RecordFault::MissingColumn(_) => "MISSING_COLUMN",
            RecordFault::InvalidNumber { .. } => "INVALID_NUMBER",
            RecordFault::NegativeValue { .. } => "NEGATIVE_VALUE",
            RecordFault::ZeroBound => "ZERO_BOUND",
            RecordFault::UnrecognizedShape => "UNRECOGNIZED_SHAPE",
            RecordFault::FieldCount { .. } => "FIELD_COUNT",
        }
    }
}

/// A result row that matched no recognised schema. Recoverable: the row is
/// skipped and processing continues.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{file}:{line}: {fault}")]
pub struct MalformedRecordError {
    pub file: String,
    /// 1-based, header is line 1
    pub line: usize,
    pub fault: RecordFault,
}

impl MalformedRecordError {
    pub fn code(&self) -> &'static str {
        self.fault.code()
    }
}

/// Fatal aggregation errors
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("no usable algorithm results found")]
    EmptyResult,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AggregateError {
    pub fn code(&self) -> &'static str {
        match self {
            AggregateError::EmptyResult => "EMPTY_RESULT",
            AggregateError::Io { .. } => "RESULTS_IO",
        }
    }
}

/// Command-line usage errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CliError {
    #[error("missing required flag {0}")]
    MissingFlag(&'static str),

    #[error("flag {0} expects a value")]
    MissingValue(String),

    #[error("invalid value {value:?} for {flag}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("unknown flag {0}")]
    UnknownFlag(String),

    #[error("unknown command {0:?} (expected `generate` or `report`)")]
    UnknownCommand(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Configuration(e) => e.code(),
            _ => "USAGE",
        }
    }
}

/// Code of the first typed error in an `anyhow` chain, `INTERNAL` if none.
pub fn failure_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ConfigurationError>() {
            return e.code();
        }
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return e.code();
        }
        if let Some(e) = cause.downcast_ref::<AggregateError>() {
            return e.code();
        }
        if let Some(e) = cause.downcast_ref::<SequenceFileError>() {
            return e.code();
        }
    }
    "INTERNAL"
}
