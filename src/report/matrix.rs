//! Pattern Matrix - one algorithm across every workload pattern
//!
//! Expects a root directory with one subdirectory per pattern, each holding
//! a batch of `results_*.csv` files:
//!
//! ```text
//! runs/
//! ├── random/        results_SplayTree.csv  results_wilber.csv ...
//! ├── bit_reversal/  ...
//! └── zigzag/        ...
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::core_types::Count;
use crate::error::AggregateError;
use crate::report::records::{ResultBatch, load_results_dir};
use crate::report::render::group_thousands;
use crate::workload::PatternType;

/// One algorithm's numbers on one pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixCell {
    pub pattern: String,
    pub comparisons: Count,
    pub rotations: Count,
    pub execution_time_ms: f64,
    pub lower_bound: Option<Count>,
    pub comparisons_over_bound: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatternMatrix {
    /// Pattern names in the order batches were added
    pub patterns: Vec<String>,
    pub algorithms: BTreeMap<String, Vec<MatrixCell>>,
}

/// Known patterns first in their canonical order, then the rest by name
fn pattern_order(name: &str) -> (bool, Option<PatternType>, String) {
    let parsed = name.parse::<PatternType>().ok();
    (parsed.is_none(), parsed, name.to_string())
}

impl PatternMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one pattern's batch. An empty batch leaves the matrix unchanged.
    pub fn add_batch(&mut self, pattern: &str, batch: &ResultBatch) -> Result<(), AggregateError> {
        let rows = batch.aggregate()?;
        let bound = batch.lower_bound.as_ref().map(|b| b.value);
        self.patterns.push(pattern.to_string());
        for row in rows {
            self.algorithms
                .entry(row.algorithm.clone())
                .or_default()
                .push(MatrixCell {
                    pattern: pattern.to_string(),
                    comparisons: row.comparisons,
                    rotations: row.rotations,
                    execution_time_ms: row.execution_time_ms,
                    lower_bound: bound,
                    comparisons_over_bound: row.comparisons_over_bound,
                });
        }
        Ok(())
    }

    /// Load every pattern subdirectory under `root`.
    ///
    /// Pattern directories without usable rows are skipped with a warning;
    /// the whole matrix being empty is an error.
    pub fn load(root: &Path, prefix: &str) -> Result<Self, AggregateError> {
        let mut dirs: Vec<_> = fs::read_dir(root)
            .map_err(|source| AggregateError::Io {
                path: root.to_path_buf(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_dir())
            .filter_map(|p| {
                let name = p.file_name()?.to_str()?.to_string();
                Some((name, p))
            })
            .collect();
        dirs.sort_by_key(|(name, _)| pattern_order(name));

        let mut matrix = Self::new();
        for (name, path) in dirs {
            let batch = load_results_dir(&path, prefix)?;
            match matrix.add_batch(&name, &batch) {
                Ok(()) => {}
                Err(AggregateError::EmptyResult) => {
                    tracing::warn!(pattern = %name, "no usable results, pattern skipped");
                }
                Err(e) => return Err(e),
            }
        }
        if matrix.algorithms.is_empty() {
            return Err(AggregateError::EmptyResult);
        }
        Ok(matrix)
    }

    pub fn cells(&self, algorithm: &str) -> Option<&[MatrixCell]> {
        self.algorithms.get(algorithm).map(Vec::as_slice)
    }

    /// One block per algorithm, one line per pattern
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (algorithm, cells) in &self.algorithms {
            let _ = writeln!(out, "== {} ==", algorithm);
            let _ = writeln!(
                out,
                "{:<14} | {:>12} | {:>12} | {:>8} | {:>12} | {:>10}",
                "Pattern", "Comparisons", "Bound", "C/Bound", "Rotations", "Time(ms)"
            );
            let _ = writeln!(out, "{}", "-".repeat(83));
            for cell in cells {
                let bound = cell.lower_bound.map_or_else(|| "-".to_string(), group_thousands);
                let ratio = if cell.comparisons_over_bound.is_nan() {
                    "n/a".to_string()
                } else {
                    format!("{:.2}", cell.comparisons_over_bound)
                };
                let _ = writeln!(
                    out,
                    "{:<14} | {:>12} | {:>12} | {:>8} | {:>12} | {:>10.2}",
                    cell.pattern,
                    group_thousands(cell.comparisons),
                    bound,
                    ratio,
                    group_thousands(cell.rotations),
                    cell.execution_time_ms,
                );
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::records::{LowerBound, RunResult};

    fn batch(bound: Option<Count>, runs: &[(&str, Count)]) -> ResultBatch {
        ResultBatch {
            runs: runs
                .iter()
                .map(|(name, c)| RunResult {
                    algorithm: name.to_string(),
                    comparisons: *c,
                    rotations: 0,
                    execution_time_ms: 2.0,
                })
                .collect(),
            lower_bound: bound.map(LowerBound::new),
            ..Default::default()
        }
    }

    #[test]
    fn test_pattern_order() {
        let mut names = vec!["zzz", "bit_reversal", "random", "aaa"];
        names.sort_by_key(|n| pattern_order(n));
        assert_eq!(names, ["random", "bit_reversal", "aaa", "zzz"]);
    }

    #[test]
    fn test_add_batches() {
        let mut m = PatternMatrix::new();
        m.add_batch("random", &batch(Some(100), &[("Splay", 300), ("Tango", 150)]))
            .unwrap();
        m.add_batch("zigzag", &batch(None, &[("Splay", 50)])).unwrap();

        let splay = m.cells("Splay").unwrap();
        assert_eq!(splay.len(), 2);
        assert_eq!(splay[0].comparisons_over_bound, 3.0);
        assert!(splay[1].comparisons_over_bound.is_nan());
        assert_eq!(m.cells("Tango").unwrap().len(), 1);
        assert_eq!(m.patterns, ["random", "zigzag"]);

        let text = m.render();
        assert!(text.contains("== Splay =="));
        assert!(text.contains("n/a"));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut m = PatternMatrix::new();
        assert!(matches!(
            m.add_batch("random", &batch(Some(1), &[])),
            Err(AggregateError::EmptyResult)
        ));
        assert!(m.patterns.is_empty());
    }
}
