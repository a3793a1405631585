//! Console output for a finished check.
//!
//! Findings are printed per artifact in cargo style, followed by a summary
//! line. Kept separate from the engine so tdqa can be used as a library.

use std::io::Write;

use colored::{ColoredString, Colorize};

use crate::results::{ArtifactResult, ResultSet};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print every finding and a summary to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(results: &ResultSet, writer: &mut W) {
    for (identity, result) in results.iter() {
        print_artifact(identity, result, writer);
    }
    print_summary(results, writer);
}

/// Print where the structured report was written.
pub fn print_report_location<W: Write>(path: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", "Report:".bold(), path);
}

fn print_artifact<W: Write>(identity: &str, result: &ArtifactResult, writer: &mut W) {
    if !result.has_findings() {
        return;
    }

    let channels: [(ColoredString, &[String]); 3] = [
        ("error".bold().red(), result.failures.messages()),
        ("warning".bold().yellow(), result.warnings.messages()),
        ("info".bold().cyan(), result.information.messages()),
    ];

    for (label, messages) in channels {
        for message in messages {
            let _ = writeln!(writer, "{}: {}", label, message.replace('\n', "\n    "));
            let _ = writeln!(writer, "  {} {}", "-->".blue(), identity);
        }
    }

    let _ = writeln!(writer); // Empty line between artifacts
}

fn print_summary<W: Write>(results: &ResultSet, writer: &mut W) {
    let artifacts = results.len();
    let failures = results.failure_count();
    let warnings = results.warning_count();

    if failures == 0 && warnings == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} {} - no failures or warnings",
                artifacts,
                plural(artifacts, "artifact", "artifacts")
            )
            .green()
        );
        return;
    }

    let mark = if failures > 0 {
        FAILURE_MARK.red()
    } else {
        FAILURE_MARK.yellow()
    };
    let _ = writeln!(
        writer,
        "{} Checked {} {}: {} {}, {} {}",
        mark,
        artifacts,
        plural(artifacts, "artifact", "artifacts"),
        failures,
        "failed".red(),
        warnings,
        plural(warnings, "with warning", "with warnings").yellow()
    );
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
