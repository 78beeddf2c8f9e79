//! Result Aggregation - derived ratios and ranking
//!
//! Rows are recomputed from [`RunResult`] + [`LowerBound`] on every call and
//! never persisted as ground truth.

use serde::Serialize;

use crate::core_types::Count;
use crate::error::AggregateError;
use crate::report::records::{LowerBound, ResultBatch, RunResult};

/// One ranked line of the comparison report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub algorithm: String,
    pub comparisons: Count,
    pub rotations: Count,
    pub execution_time_ms: f64,
    /// NaN when the batch had no lower bound (serialized as `null`)
    pub comparisons_over_bound: f64,
    /// 0 when `comparisons == 0`
    pub rotations_over_comparisons_pct: f64,
}

impl ComparisonRow {
    pub fn derive(run: &RunResult, lower_bound: Option<&LowerBound>) -> Self {
        let comparisons_over_bound = match lower_bound {
            Some(bound) => run.comparisons as f64 / bound.value as f64,
            None => f64::NAN,
        };
        let rotations_over_comparisons_pct = if run.comparisons > 0 {
            run.rotations as f64 / run.comparisons as f64 * 100.0
        } else {
            0.0
        };
        Self {
            algorithm: run.algorithm.clone(),
            comparisons: run.comparisons,
            rotations: run.rotations,
            execution_time_ms: run.execution_time_ms,
            comparisons_over_bound,
            rotations_over_comparisons_pct,
        }
    }
}

/// Rank runs by comparisons, descending.
///
/// The sort is stable: equal comparison counts keep input order and count
/// as tied. Fails on an empty input instead of producing an empty report.
pub fn aggregate(
    runs: &[RunResult],
    lower_bound: Option<&LowerBound>,
) -> Result<Vec<ComparisonRow>, AggregateError> {
    if runs.is_empty() {
        return Err(AggregateError::EmptyResult);
    }
    let mut rows: Vec<ComparisonRow> = runs
        .iter()
        .map(|run| ComparisonRow::derive(run, lower_bound))
        .collect();
    rows.sort_by(|a, b| b.comparisons.cmp(&a.comparisons));
    Ok(rows)
}

impl ResultBatch {
    pub fn aggregate(&self) -> Result<Vec<ComparisonRow>, AggregateError> {
        aggregate(&self.runs, self.lower_bound.as_ref())
    }
}
