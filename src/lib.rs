//! BST Workbench - workloads and reports for self-adjusting BST experiments
//!
//! Generates adversarial access sequences for external tree implementations
//! and ranks their measured costs against a reference lower bound.
//!
//! # Modules
//!
//! - [`core_types`] - Key and sequence aliases
//! - [`error`] - Error taxonomy
//! - [`workload`] - Sequence generation and the sequence file format
//! - [`report`] - Result loading, aggregation, and rendering
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup
//! - [`cli`] - Command-line parsing and command execution

// Core types - must be first!
pub mod core_types;
pub mod error;

pub mod cli;
pub mod config;
pub mod logging;
pub mod report;
pub mod workload;

// Convenient re-exports at crate root
pub use core_types::{Count, Key, Sequence};
pub use error::{AggregateError, CliError, ConfigurationError, MalformedRecordError, SequenceFileError};
pub use report::{ComparisonRow, LowerBound, PatternMatrix, ResultBatch, RunResult, aggregate};
pub use workload::{PatternConfig, PatternType, SequenceGenerator};
