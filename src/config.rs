use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::report::records::RESULTS_FILE_PREFIX;
use crate::workload::pattern::PatternConfig;
use crate::workload::sequence_file::DEFAULT_SEQUENCE_FILE;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "bst_workbench.log".to_string(),
            use_json: false,
            rotation: "never".to_string(),
            generator: GeneratorConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Defaults for `generate`; command-line flags win
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub size: usize,
    pub output: String,
    pub hotspots: usize,
    pub ratio: f64,
    /// None seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: 1024,
            output: DEFAULT_SEQUENCE_FILE.to_string(),
            hotspots: PatternConfig::DEFAULT_HOTSPOTS,
            ratio: PatternConfig::DEFAULT_RATIO,
            seed: None,
        }
    }
}

/// Defaults for `report`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub results_dir: String,
    pub file_prefix: String,
    pub json_output: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            results_dir: ".".to_string(),
            file_prefix: RESULTS_FILE_PREFIX.to_string(),
            json_output: None,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`. A missing file means defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", path.display()))
    }
}
