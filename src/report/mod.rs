//! Report exporters for a finished [`ResultSet`].
//!
//! Every format carries one entry per artifact identity with its three
//! channels; only the serialization differs.

pub mod json;
pub mod junit;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::results::ResultSet;

/// Name of the single test suite in every report.
pub const SUITE_NAME: &str = "Teradata Package Check";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Junit,
    Json,
}

pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, results: &ResultSet) -> Result<String>;
}

pub fn create_reporter(format: ReportFormat) -> Box<dyn Reporter> {
    match format {
        ReportFormat::Junit => Box::new(junit::JUnitReporter),
        ReportFormat::Json => Box::new(json::JsonReporter),
    }
}

/// Render `results` in `format` and write them to `path`, creating parent
/// directories as needed.
pub fn write_report(path: &Path, format: ReportFormat, results: &ResultSet) -> Result<()> {
    let reporter = create_reporter(format);
    let content = reporter.generate(results)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!(path = %path.display(), format = reporter.name(), "report written");
    Ok(())
}
