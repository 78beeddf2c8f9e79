//! Core types used throughout the workbench
//!
//! Type aliases shared by the workload generator and the report side.

/// Key accessed by a workload.
///
/// # Constraints:
/// - **Positive**: keys live in `[1, size]`, never 0
/// - **1-based**: the sequence file and the external drivers both assume it
pub type Key = u64;

/// Ordered access workload, consumed front to back by a benchmark driver.
pub type Sequence = Vec<Key>;

/// Operation counter reported by an external tree implementation.
pub type Count = u64;
