//! Command-line surface
//!
//! ```text
//! bst_workbench generate --type <pattern> [--size N] [--output PATH]
//!                        [--hotspots K] [--ratio R] [--seed S] [--env E]
//! bst_workbench report   [--dir DIR] [--prefix P] [--json PATH]
//!                        [--matrix ROOT] [--env E]
//! ```
//!
//! Values not given on the command line come from the `generator` and
//! `report` sections of the loaded [`AppConfig`].

use std::path::PathBuf;

use anyhow::Context;
use rustc_hash::FxHashMap;

use crate::config::AppConfig;
use crate::error::{CliError, ConfigurationError};
use crate::report::{PatternMatrix, Report, load_results_dir, render_table, write_json};
use crate::workload::{PatternConfig, PatternType, SequenceGenerator, is_power_of_two, write_sequence};

const GENERATE_FLAGS: &[&str] = &[
    "--type",
    "--size",
    "--output",
    "--hotspots",
    "--ratio",
    "--seed",
    "--env",
];
const REPORT_FLAGS: &[&str] = &["--dir", "--prefix", "--json", "--matrix", "--env"];

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    pub pattern: PatternType,
    pub size: usize,
    pub output: PathBuf,
    pub hotspots: usize,
    pub ratio: f64,
    pub seed: Option<u64>,
}

impl GenerateArgs {
    pub fn pattern_config(&self) -> PatternConfig {
        PatternConfig::new(self.pattern, self.size).with_hotspots(self.hotspots, self.ratio)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportArgs {
    pub dir: PathBuf,
    pub prefix: String,
    pub json: Option<PathBuf>,
    pub matrix: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Generate(GenerateArgs),
    Report(ReportArgs),
}

/// `--env`/`-e` value, default `dev`. Read before the config is loaded.
pub fn get_env(args: &[String]) -> String {
    args.iter()
        .position(|a| a == "--env" || a == "-e")
        .and_then(|i| args.get(i + 1))
        .cloned()
        .unwrap_or_else(|| "dev".to_string())
}

/// Pair every flag with its value, rejecting flags outside `allowed`.
fn collect_flags<'a>(
    args: &'a [String],
    allowed: &[&'static str],
) -> Result<FxHashMap<&'static str, &'a str>, CliError> {
    let mut flags = FxHashMap::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let normalized = if arg == "-e" { "--env" } else { arg.as_str() };
        let flag = allowed
            .iter()
            .copied()
            .find(|f| *f == normalized)
            .ok_or_else(|| CliError::UnknownFlag(arg.clone()))?;
        let value = iter
            .next()
            .ok_or_else(|| CliError::MissingValue(arg.clone()))?;
        flags.insert(flag, value.as_str());
    }
    Ok(flags)
}

fn parse_value<T: std::str::FromStr>(flag: &'static str, raw: &str) -> Result<T, CliError> {
    raw.parse().map_err(|_| CliError::InvalidValue {
        flag,
        value: raw.to_string(),
    })
}

fn parse_generate(args: &[String], config: &AppConfig) -> Result<GenerateArgs, CliError> {
    let flags = collect_flags(args, GENERATE_FLAGS)?;
    let defaults = &config.generator;

    let pattern: PatternType = flags
        .get("--type")
        .ok_or(CliError::MissingFlag("--type"))?
        .parse()?;
    let size = match flags.get("--size") {
        Some(raw) => parse_value("--size", raw)?,
        None => defaults.size,
    };
    // Every workload in an experiment shares one power-of-two size
    if !is_power_of_two(size) {
        return Err(ConfigurationError::NonPowerOfTwoSize(size).into());
    }
    let hotspots = match flags.get("--hotspots") {
        Some(raw) => parse_value("--hotspots", raw)?,
        None => defaults.hotspots,
    };
    let ratio = match flags.get("--ratio") {
        Some(raw) => parse_value("--ratio", raw)?,
        None => defaults.ratio,
    };
    let seed = match flags.get("--seed") {
        Some(raw) => Some(parse_value("--seed", raw)?),
        None => defaults.seed,
    };
    let output = flags
        .get("--output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&defaults.output));

    Ok(GenerateArgs {
        pattern,
        size,
        output,
        hotspots,
        ratio,
        seed,
    })
}

fn parse_report(args: &[String], config: &AppConfig) -> Result<ReportArgs, CliError> {
    let flags = collect_flags(args, REPORT_FLAGS)?;
    let defaults = &config.report;
    Ok(ReportArgs {
        dir: PathBuf::from(
            flags
                .get("--dir")
                .copied()
                .unwrap_or(defaults.results_dir.as_str()),
        ),
        prefix: flags
            .get("--prefix")
            .copied()
            .unwrap_or(defaults.file_prefix.as_str())
            .to_string(),
        json: flags
            .get("--json")
            .map(PathBuf::from)
            .or_else(|| defaults.json_output.as_ref().map(PathBuf::from)),
        matrix: flags.get("--matrix").map(PathBuf::from),
    })
}

/// Parse arguments after the program name.
pub fn parse_command(args: &[String], config: &AppConfig) -> Result<Command, CliError> {
    let (command, rest) = args
        .split_first()
        .ok_or_else(|| CliError::UnknownCommand(String::new()))?;
    match command.as_str() {
        "generate" => Ok(Command::Generate(parse_generate(rest, config)?)),
        "report" => Ok(Command::Report(parse_report(rest, config)?)),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

/// Generate and persist one workload. Nothing is written if generation fails.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<String> {
    let config = args.pattern_config();
    let seq = match args.seed {
        Some(seed) => SequenceGenerator::seeded(seed).generate(&config)?,
        None => SequenceGenerator::from_entropy().generate(&config)?,
    };
    write_sequence(&args.output, &seq)?;
    tracing::info!(
        pattern = %args.pattern,
        size = args.size,
        seed = ?args.seed,
        "workload generated"
    );
    Ok(format!(
        "[OK] Sequence ({}) of size {} written to {}",
        args.pattern,
        args.size,
        args.output.display()
    ))
}

/// Aggregate a results directory (or a pattern matrix) into report text.
pub fn run_report(args: &ReportArgs) -> anyhow::Result<String> {
    if let Some(root) = &args.matrix {
        let matrix = PatternMatrix::load(root, &args.prefix)
            .with_context(|| format!("Failed to build pattern matrix from {}", root.display()))?;
        if let Some(path) = &args.json {
            write_json(path, &matrix)?;
        }
        return Ok(matrix.render());
    }

    let batch = load_results_dir(&args.dir, &args.prefix)
        .with_context(|| format!("Failed to load results from {}", args.dir.display()))?;
    let rows = batch.aggregate().with_context(|| {
        format!(
            "No valid {}*.csv algorithm results in {}",
            args.prefix,
            args.dir.display()
        )
    })?;
    let text = render_table(&rows, batch.lower_bound.as_ref());
    if let Some(path) = &args.json {
        let report = Report::new(rows, batch.lower_bound.clone(), batch.skipped.len());
        write_json(path, &report)?;
    }
    Ok(text)
}
