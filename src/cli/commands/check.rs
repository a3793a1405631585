use std::{env, io};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::super::{
    args::CheckCommand,
    exit_status::ExitStatus,
    report::{print_report_location, report_to},
};
use crate::{
    config::{Config, load_config},
    core::{Engine, EngineOptions, PackageCorpus},
    report::write_report,
    rules::load_catalog,
};

pub fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    let loaded = load_config(&cwd)?;
    match &loaded.path {
        Some(path) => debug!(path = %path.display(), "using config file"),
        None => debug!("no config file found, using defaults"),
    }
    let config = loaded.config;

    let rules_file = cmd
        .rules
        .clone()
        .unwrap_or_else(|| cwd.join(&config.rules_file));
    let keywords_file = cmd
        .keywords
        .clone()
        .unwrap_or_else(|| cwd.join(&config.reserved_keywords_file));
    let report_file = cmd
        .report
        .clone()
        .unwrap_or_else(|| cwd.join(&config.report_file));
    let report_format = cmd.format.unwrap_or(config.report_format);

    let catalog = load_catalog(&rules_file, &config.catalog_section)
        .with_context(|| format!("Invalid rule catalog: {}", rules_file.display()))?;
    info!(
        conditions = catalog.condition_count(),
        actions = catalog.actions().len(),
        rules = catalog.rules().len(),
        "catalog loaded"
    );

    let corpus = PackageCorpus::open(&cmd.package_dir, Some(&keywords_file), &config.ignores)?;
    let engine = Engine::new(&catalog, engine_options(&config));
    let results = engine.run(&corpus);

    let mut stdout = io::stdout().lock();
    report_to(&results, &mut stdout);

    if !cmd.no_report {
        write_report(&report_file, report_format, &results)?;
        print_report_location(&report_file.display().to_string(), &mut stdout);
    }

    if results.has_failures() {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

fn engine_options(config: &Config) -> EngineOptions {
    EngineOptions {
        root_markers: config.root_markers.clone(),
        skip_suffixes: config.skip_suffixes.clone(),
    }
}
