//! tdqa - quality checks for Teradata release packages
//!
//! tdqa is a CLI tool and library that evaluates an XML rule catalog against
//! the artifacts of an extracted Teradata deployment package and reports
//! failures, warnings and informational findings per artifact.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`check`, `init`)
//! - `config`: Configuration file loading and parsing
//! - `core`: Artifact corpus, classification and the evaluation engine
//! - `logging`: Tracing subscriber setup
//! - `report`: JUnit and JSON report writers
//! - `results`: Per-artifact result aggregation
//! - `rules`: Rule model and catalog loader
//! - `utils`: Shared path helpers

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod report;
pub mod results;
pub mod rules;
pub mod utils;
