//! Workload Generation
//!
//! Produces the integer access sequences fed to the external tree drivers.
//!
//! # Components
//!
//! - [`pattern`] - Pattern tags and validated configuration
//! - [`generator`] - Deterministic and RNG-driven sequence builders
//! - [`sequence_file`] - Whitespace-separated sequence file format

pub mod generator;
pub mod pattern;
pub mod sequence_file;

pub use generator::{SequenceGenerator, bit_reversal, is_power_of_two, monotonic, zigzag};
pub use pattern::{PatternConfig, PatternType};
pub use sequence_file::{read_sequence, write_sequence};
