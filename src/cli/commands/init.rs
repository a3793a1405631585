use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::exit_status::ExitStatus;
use super::super::report::SUCCESS_MARK;
use crate::{
    config::{CONFIG_FILE_NAME, Config, default_config_json},
    report::create_reporter,
};

/// Write a default `.tdqarc.json` and show the catalog, keyword list and
/// report that `tdqa check` will use from this directory.
pub fn init() -> Result<ExitStatus> {
    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
        return Ok(ExitStatus::Failure);
    }

    fs::write(&config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );

    let config = Config::default();
    print_input(&cwd, "rules", &config.rules_file);
    print_input(&cwd, "keywords", &config.reserved_keywords_file);
    println!(
        "  {:<10}{} ({})",
        "report:",
        config.report_file,
        create_reporter(config.report_format).name()
    );

    Ok(ExitStatus::Success)
}

/// Print an input file the check reads, flagging it when it is not there yet.
fn print_input(cwd: &Path, label: &str, file: &str) {
    let status = if cwd.join(file).is_file() {
        "found".green()
    } else {
        "not found yet".yellow()
    };
    println!("  {:<10}{} ({})", format!("{}:", label), file, status);
}
