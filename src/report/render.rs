//! Report Rendering - fixed-width text table and JSON document

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core_types::Count;
use crate::report::aggregate::ComparisonRow;
use crate::report::records::LowerBound;

/// Git revision baked in by build.rs
pub const BUILD_REVISION: &str = env!("GIT_HASH");

const RULE_WIDTH: usize = 74;

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: Count) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn fmt_ratio(r: f64) -> String {
    if r.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.2}", r)
    }
}

fn bound_label(bound: &LowerBound) -> String {
    match &bound.kind {
        Some(kind) => format!("Lower Bound ({})", kind),
        None => "Lower Bound".to_string(),
    }
}

/// Summary table sorted as given, plus the bound line when present.
pub fn render_table(rows: &[ComparisonRow], lower_bound: Option<&LowerBound>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} | {:>12} | {:>10} | {:>10} | {:>10} | {:>10}",
        "Algorithm", "Comparisons", "Rotations", "Time(ms)", "C/Bound", "R/C (%)"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for row in rows {
        let _ = writeln!(
            out,
            "{:<12} | {:>12} | {:>10} | {:>10.2} | {:>10} | {:>9.2}%",
            row.algorithm,
            group_thousands(row.comparisons),
            group_thousands(row.rotations),
            row.execution_time_ms,
            fmt_ratio(row.comparisons_over_bound),
            row.rotations_over_comparisons_pct,
        );
    }
    if let Some(bound) = lower_bound {
        let _ = writeln!(
            out,
            "\n{}: {}",
            bound_label(bound),
            group_thousands(bound.value)
        );
    }
    out
}

/// Machine-readable form of one comparison report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub revision: &'static str,
    pub lower_bound: Option<LowerBound>,
    pub skipped_rows: usize,
    pub rows: Vec<ComparisonRow>,
}

impl Report {
    pub fn new(rows: Vec<ComparisonRow>, lower_bound: Option<LowerBound>, skipped_rows: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            revision: BUILD_REVISION,
            lower_bound,
            skipped_rows,
            rows,
        }
    }
}

/// Pretty-printed JSON for a report or a pattern matrix
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "json report written");
    Ok(())
}
