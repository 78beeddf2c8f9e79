//! Result Aggregation and Reporting
//!
//! # Components
//!
//! - [`records`] - Schema-checked parsing of the drivers' result CSV files
//! - [`aggregate`] - Derived ratios and comparison ranking
//! - [`render`] - Text table and JSON report
//! - [`matrix`] - Per-algorithm view across workload patterns

pub mod aggregate;
pub mod matrix;
pub mod records;
pub mod render;

pub use aggregate::{ComparisonRow, aggregate};
pub use matrix::PatternMatrix;
pub use records::{LowerBound, ResultBatch, RunResult, load_results_dir};
pub use render::{Report, render_table, write_json};
