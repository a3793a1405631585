//! JSON reporter.

use anyhow::{Context, Result};
use serde::Serialize;

use super::{Reporter, SUITE_NAME};
use crate::results::{ResultEntry, ResultSet};

pub struct JsonReporter;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    suite: &'a str,
    summary: Summary,
    results: Vec<ResultEntry>,
}

#[derive(Debug, Serialize)]
struct Summary {
    artifacts: usize,
    failures: usize,
    warnings: usize,
}

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, results: &ResultSet) -> Result<String> {
        let report = JsonReport {
            suite: SUITE_NAME,
            summary: Summary {
                artifacts: results.len(),
                failures: results.failure_count(),
                warnings: results.warning_count(),
            },
            results: results.entries(),
        };
        serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")
    }
}
