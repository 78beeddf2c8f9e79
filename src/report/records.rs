//! Result Records - typed rows read from the drivers' CSV output
//!
//! Each `results_*.csv` file is either an algorithm measurement file
//! (`Algorithm,Comparisons,Rotations,ExecutionTime`) or a lower-bound file
//! (`LowerBoundType,Value`). The header is matched against a [`RecordSchema`]
//! once per file; each data row then becomes a typed record or a
//! [`MalformedRecordError`] that is logged and skipped.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::core_types::Count;
use crate::error::{AggregateError, MalformedRecordError, RecordFault};

// ============================================================
// Column names and file conventions
// ============================================================

pub const RESULTS_FILE_PREFIX: &str = "results_";
pub const RESULTS_FILE_SUFFIX: &str = ".csv";

pub const COL_ALGORITHM: &str = "Algorithm";
pub const COL_COMPARISONS: &str = "Comparisons";
pub const COL_ROTATIONS: &str = "Rotations";
pub const COL_EXECUTION_TIME: &str = "ExecutionTime";
pub const COL_LOWER_BOUND_TYPE: &str = "LowerBoundType";
pub const COL_VALUE: &str = "Value";

/// File name marker for bound files written without a type column
const BOUND_FILE_MARKER: &str = "wilber";

// ============================================================
// Typed records
// ============================================================

/// One algorithm's measurements for one experiment run
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub algorithm: String,
    pub comparisons: Count,
    pub rotations: Count,
    pub execution_time_ms: f64,
}

/// Reference access-cost lower bound shared by a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowerBound {
    /// Always > 0
    pub value: Count,
    /// e.g. `Wilber1`
    pub kind: Option<String>,
}

impl LowerBound {
    pub fn new(value: Count) -> Self {
        Self { value, kind: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultRecord {
    Run(RunResult),
    Bound(LowerBound),
}

// ============================================================
// Schemas
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Algorithm,
    Bound,
}

/// Columns a row kind needs. Optional columns may be absent or empty.
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub kind: RecordKind,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub const ALGORITHM_SCHEMA: RecordSchema = RecordSchema {
    kind: RecordKind::Algorithm,
    required: &[COL_ALGORITHM, COL_COMPARISONS, COL_EXECUTION_TIME],
    optional: &[COL_ROTATIONS],
};

pub const BOUND_SCHEMA: RecordSchema = RecordSchema {
    kind: RecordKind::Bound,
    required: &[COL_VALUE],
    optional: &[COL_LOWER_BOUND_TYPE],
};

/// Schema with column positions resolved against one header
struct ResolvedSchema {
    schema: RecordSchema,
    /// Parallel to `schema.required` then `schema.optional`
    positions: Vec<Option<usize>>,
}

impl ResolvedSchema {
    fn resolve(schema: RecordSchema, table: &CsvTable) -> Self {
        let positions = schema
            .required
            .iter()
            .chain(schema.optional)
            .map(|name| table.column(name))
            .collect();
        Self { schema, positions }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.schema
            .required
            .iter()
            .chain(self.schema.optional)
            .position(|c| *c == name)
            .and_then(|i| self.positions[i])
    }

    /// Trimmed, non-empty field value
    fn field<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        self.position(name)
            .and_then(|i| row.get(i))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    fn required<'a>(&self, row: &'a [String], name: &'static str) -> Result<&'a str, RecordFault> {
        self.field(row, name).ok_or(RecordFault::MissingColumn(name))
    }

    fn parse_row(&self, row: &[String]) -> Result<ResultRecord, RecordFault> {
        match self.schema.kind {
            RecordKind::Algorithm => {
                let algorithm = self.required(row, COL_ALGORITHM)?.to_string();
                let comparisons = parse_count(COL_COMPARISONS, self.required(row, COL_COMPARISONS)?)?;
                let rotations = match self.field(row, COL_ROTATIONS) {
                    Some(raw) => parse_count(COL_ROTATIONS, raw)?,
                    None => 0,
                };
                let execution_time_ms =
                    parse_millis(COL_EXECUTION_TIME, self.required(row, COL_EXECUTION_TIME)?)?;
                Ok(ResultRecord::Run(RunResult {
                    algorithm,
                    comparisons,
                    rotations,
                    execution_time_ms,
                }))
            }
            RecordKind::Bound => {
                let value = parse_count(COL_VALUE, self.required(row, COL_VALUE)?)?;
                if value == 0 {
                    return Err(RecordFault::ZeroBound);
                }
                let kind = self.field(row, COL_LOWER_BOUND_TYPE).map(str::to_string);
                Ok(ResultRecord::Bound(LowerBound { value, kind }))
            }
        }
    }
}

fn parse_count(column: &'static str, raw: &str) -> Result<Count, RecordFault> {
    raw.parse::<Count>().map_err(|_| {
        if raw.parse::<i64>().is_ok_and(|v| v < 0) {
            RecordFault::NegativeValue {
                column,
                value: raw.to_string(),
            }
        } else {
            RecordFault::InvalidNumber {
                column,
                value: raw.to_string(),
            }
        }
    })
}

fn parse_millis(column: &'static str, raw: &str) -> Result<f64, RecordFault> {
    let value: f64 = raw
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| RecordFault::InvalidNumber {
            column,
            value: raw.to_string(),
        })?;
    if value < 0.0 {
        return Err(RecordFault::NegativeValue {
            column,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

// ============================================================
// CSV table
// ============================================================

/// Header plus data rows of one comma-separated file
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub name: String,
    pub headers: Vec<String>,
    /// (1-based line number, fields)
    pub rows: Vec<(usize, Vec<String>)>,
}

impl CsvTable {
    /// Split on commas; blank lines are ignored. A leading byte-order mark
    /// is dropped and cells may be wrapped in double quotes. Quoted cells
    /// containing commas are not supported.
    pub fn parse(name: &str, text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());
        let headers = lines
            .next()
            .map(|(_, l)| split_cells(l))
            .unwrap_or_default();
        let rows = lines.map(|(i, l)| (i + 1, split_cells(l))).collect();
        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Bound files are recognised by name or by their type column;
    /// anything else with an `Algorithm` column holds measurements.
    pub fn schema(&self) -> Option<RecordSchema> {
        if self.name.to_lowercase().contains(BOUND_FILE_MARKER)
            || self.column(COL_LOWER_BOUND_TYPE).is_some()
        {
            Some(BOUND_SCHEMA)
        } else if self.column(COL_ALGORITHM).is_some() {
            Some(ALGORITHM_SCHEMA)
        } else {
            None
        }
    }

    /// Convert every data row, isolating failures per row.
    pub fn records(&self) -> Vec<Result<ResultRecord, MalformedRecordError>> {
        let malformed = |line: usize, fault: RecordFault| MalformedRecordError {
            file: self.name.clone(),
            line,
            fault,
        };

        let Some(schema) = self.schema() else {
            return vec![Err(malformed(1, RecordFault::UnrecognizedShape))];
        };
        let resolved = ResolvedSchema::resolve(schema, self);

        self.rows
            .iter()
            .map(|(line, fields)| {
                if fields.len() > self.headers.len() {
                    return Err(malformed(
                        *line,
                        RecordFault::FieldCount {
                            expected: self.headers.len(),
                            found: fields.len(),
                        },
                    ));
                }
                resolved.parse_row(fields).map_err(|f| malformed(*line, f))
            })
            .collect()
    }
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| {
            let cell = cell.trim();
            cell.strip_prefix('"')
                .and_then(|c| c.strip_suffix('"'))
                .unwrap_or(cell)
                .to_string()
        })
        .collect()
}

// ============================================================
// Batch loading
// ============================================================

/// Everything read for one experiment batch
#[derive(Debug, Clone, Default)]
pub struct ResultBatch {
    pub runs: Vec<RunResult>,
    pub lower_bound: Option<LowerBound>,
    pub skipped: Vec<MalformedRecordError>,
    pub files_read: usize,
}

impl ResultBatch {
    /// Fold one table into the batch. Skipped rows are logged, never fatal.
    pub fn absorb(&mut self, table: &CsvTable) {
        self.files_read += 1;
        let mut seen: FxHashSet<String> =
            self.runs.iter().map(|r| r.algorithm.clone()).collect();

        for record in table.records() {
            match record {
                Ok(ResultRecord::Run(run)) => {
                    if !seen.insert(run.algorithm.clone()) {
                        tracing::warn!(
                            file = %table.name,
                            algorithm = %run.algorithm,
                            "duplicate algorithm row, both kept"
                        );
                    }
                    self.runs.push(run);
                }
                Ok(ResultRecord::Bound(bound)) => {
                    if let Some(prev) = &self.lower_bound
                        && prev.value != bound.value
                    {
                        tracing::warn!(
                            file = %table.name,
                            previous = prev.value,
                            value = bound.value,
                            "conflicting lower bound, keeping the later one"
                        );
                    }
                    self.lower_bound = Some(bound);
                }
                Err(err) => {
                    tracing::warn!(code = err.code(), "skipping row: {}", err);
                    self.skipped.push(err);
                }
            }
        }
    }
}

/// Load every `<prefix>*.csv` in `dir`, in file name order.
pub fn load_results_dir(dir: &Path, prefix: &str) -> Result<ResultBatch, AggregateError> {
    let io_err = |source| AggregateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<_> = fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path.file_name().and_then(|n| n.to_str()).is_some_and(|n| {
                    n.starts_with(prefix) && n.ends_with(RESULTS_FILE_SUFFIX)
                })
        })
        .collect();
    files.sort();

    let mut batch = ResultBatch::default();
    for path in &files {
        let text = fs::read_to_string(path).map_err(|source| AggregateError::Io {
            path: path.clone(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        batch.absorb(&CsvTable::parse(&name, &text));
    }

    tracing::info!(
        dir = %dir.display(),
        files = batch.files_read,
        runs = batch.runs.len(),
        skipped = batch.skipped.len(),
        bound = ?batch.lower_bound.as_ref().map(|b| b.value),
        "results loaded"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, text: &str) -> CsvTable {
        CsvTable::parse(name, text)
    }

    #[test]
    fn test_algorithm_row() {
        let t = table(
            "results_SplayTree.csv",
            "Algorithm,Comparisons,Rotations,ExecutionTime\nSplayTree,30482255,29696390,603\n",
        );
        let records = t.records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].clone().unwrap(),
            ResultRecord::Run(RunResult {
                algorithm: "SplayTree".into(),
                comparisons: 30482255,
                rotations: 29696390,
                execution_time_ms: 603.0,
            })
        );
    }

    #[test]
    fn test_rotations_default_to_zero() {
        let t = table(
            "results_BasicBST.csv",
            "Algorithm,Comparisons,ExecutionTime\nBasicBST,100,1.5\n",
        );
        match t.records().remove(0).unwrap() {
            ResultRecord::Run(run) => assert_eq!(run.rotations, 0),
            other => panic!("unexpected {:?}", other),
        }

        let t = table(
            "results_BasicBST.csv",
            "Algorithm,Comparisons,Rotations,ExecutionTime\nBasicBST,100,,1.5\n",
        );
        assert!(matches!(
            t.records().remove(0),
            Ok(ResultRecord::Run(RunResult { rotations: 0, .. }))
        ));
    }

    #[test]
    fn test_bound_file_by_name_and_by_column() {
        let by_name = table("results_wilber.csv", "Value\n40\n");
        assert_eq!(
            by_name.records().remove(0).unwrap(),
            ResultRecord::Bound(LowerBound::new(40))
        );

        let by_column = table("results_lb.csv", "LowerBoundType,Value\nWilber1,12137338\n");
        assert_eq!(
            by_column.records().remove(0).unwrap(),
            ResultRecord::Bound(LowerBound {
                value: 12137338,
                kind: Some("Wilber1".into())
            })
        );
    }

    #[test]
    fn test_malformed_rows_carry_line_and_fault() {
        let t = table(
            "results_x.csv",
            "Algorithm,Comparisons,Rotations,ExecutionTime\n\
             A,abc,0,1\n\
             B,-5,0,1\n\
             C,10,0,-2\n\
             D,10,0\n\
             E,10,0,1,extra\n\
             F,10,0,1\n",
        );
        let records = t.records();
        let faults: Vec<_> = records
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| (e.line, e.fault.clone()))
            .collect();
        assert_eq!(faults.len(), 5);
        assert_eq!(faults[0].0, 2);
        assert!(matches!(faults[0].1, RecordFault::InvalidNumber { column: COL_COMPARISONS, .. }));
        assert!(matches!(faults[1].1, RecordFault::NegativeValue { column: COL_COMPARISONS, .. }));
        assert!(matches!(faults[2].1, RecordFault::NegativeValue { column: COL_EXECUTION_TIME, .. }));
        assert_eq!(faults[3].1, RecordFault::MissingColumn(COL_EXECUTION_TIME));
        assert!(matches!(faults[4].1, RecordFault::FieldCount { expected: 4, found: 5 }));
        assert!(records[5].is_ok());
    }

    #[test]
    fn test_unrecognized_header() {
        let t = table("results_junk.csv", "foo,bar\n1,2\n");
        let records = t.records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].clone().unwrap_err().fault,
            RecordFault::UnrecognizedShape
        );
    }

    #[test]
    fn test_zero_bound_rejected() {
        let t = table("results_wilber.csv", "LowerBoundType,Value\nWilber1,0\n");
        assert_eq!(
            t.records().remove(0).unwrap_err().fault,
            RecordFault::ZeroBound
        );
    }

    #[test]
    fn test_batch_absorb_keeps_order_and_last_bound() {
        let mut batch = ResultBatch::default();
        batch.absorb(&table(
            "results_A.csv",
            "Algorithm,Comparisons,ExecutionTime\nA,100,1\nB,50,2\n",
        ));
        batch.absorb(&table("results_wilber.csv", "LowerBoundType,Value\nW,30\n"));
        batch.absorb(&table("results_wilber2.csv", "LowerBoundType,Value\nW,40\n"));
        batch.absorb(&table("results_bad.csv", "x\n1\n"));

        let names: Vec<_> = batch.runs.iter().map(|r| r.algorithm.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(batch.lower_bound.as_ref().map(|b| b.value), Some(40));
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.files_read, 4);
    }

    #[test]
    fn test_bom_and_crlf_header() {
        let mut batch = ResultBatch::default();
        batch.absorb(&table(
            "results_SplayTree.csv",
            "\u{feff}Algorithm,Comparisons,Rotations,ExecutionTime\r\nSplayTree,100,5,1.5\r\n",
        ));
        assert!(batch.skipped.is_empty());
        assert_eq!(
            batch.runs,
            vec![RunResult {
                algorithm: "SplayTree".into(),
                comparisons: 100,
                rotations: 5,
                execution_time_ms: 1.5,
            }]
        );
    }

    #[test]
    fn test_quoted_cells() {
        let t = table(
            "results_Tango.csv",
            "\"Algorithm\",\"Comparisons\",\"Rotations\",\"ExecutionTime\"\n\"TangoTree\",\"70\",\"3\",\"2.25\"\n",
        );
        assert_eq!(t.headers[0], COL_ALGORITHM);
        assert!(matches!(
            t.records().remove(0),
            Ok(ResultRecord::Run(RunResult { comparisons: 70, rotations: 3, .. }))
        ));
    }

    #[test]
    fn test_skipped_row_code() {
        let t = table("results_x.csv", "Algorithm,Comparisons,ExecutionTime\nA,abc,1\n");
        assert_eq!(t.records().remove(0).unwrap_err().code(), "INVALID_NUMBER");
    }
}
