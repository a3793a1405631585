use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::{
    core::{engine::DEFAULT_SKIP_SUFFIXES, identity::DEFAULT_ROOT_MARKERS},
    report::ReportFormat,
    rules::DEFAULT_CATALOG_SECTION,
};

pub const CONFIG_FILE_NAME: &str = ".tdqarc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_rules_file")]
    pub rules_file: String,
    #[serde(default = "default_catalog_section")]
    pub catalog_section: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default)]
    pub report_format: ReportFormat,
    #[serde(default = "default_reserved_keywords_file")]
    pub reserved_keywords_file: String,
    #[serde(default = "default_root_markers")]
    pub root_markers: Vec<String>,
    #[serde(default = "default_skip_suffixes")]
    pub skip_suffixes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
}

fn default_rules_file() -> String {
    "resources/teradataQualityCheckRules.xml".to_string()
}

fn default_catalog_section() -> String {
    DEFAULT_CATALOG_SECTION.to_string()
}

fn default_report_file() -> String {
    "output/junit-QACheck.xml".to_string()
}

fn default_reserved_keywords_file() -> String {
    "resources/Teradata_Reserved_Words.csv".to_string()
}

fn default_root_markers() -> Vec<String> {
    DEFAULT_ROOT_MARKERS.iter().map(|s| s.to_string()).collect()
}

fn default_skip_suffixes() -> Vec<String> {
    DEFAULT_SKIP_SUFFIXES.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_file: default_rules_file(),
            catalog_section: default_catalog_section(),
            report_file: default_report_file(),
            report_format: ReportFormat::default(),
            reserved_keywords_file: default_reserved_keywords_file(),
            root_markers: default_root_markers(),
            skip_suffixes: default_skip_suffixes(),
            ignores: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns in `ignores` and for
    /// empty entries in `rootMarkers` or `skipSuffixes`.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.root_markers.iter().any(|m| m.is_empty()) {
            anyhow::bail!("Empty marker in 'rootMarkers'");
        }
        if self.skip_suffixes.iter().any(|s| s.is_empty()) {
            anyhow::bail!("Empty suffix in 'skipSuffixes'");
        }
        if self.catalog_section.is_empty() {
            anyhow::bail!("'catalogSection' must not be empty");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the config file, or `None` when defaults are used.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
