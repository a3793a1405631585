//! Structural checks that the declarative rule language cannot express.
//!
//! Both report under synthetic identities starting with `.` so that they
//! sort ahead of every artifact path.

use std::{
    collections::BTreeSet,
    sync::LazyLock,
};

use regex::Regex;

use super::corpus::Corpus;
use crate::{results::ResultSet, rules::Level};

pub const OBJECT_COUNTS_IDENTITY: &str = ".Object Counts";
pub const CHANGE_RECORD_IDENTITY: &str = ".Change Record Number";

static CHANGE_REQUEST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"C[0-9]{7}").unwrap());

/// Compare created, deleted and rolled-back objects.
///
/// Every object created or deleted must be rolled back, and nothing may be
/// rolled back that the package does not touch.
pub fn check_object_counts(corpus: &dyn Corpus, results: &mut ResultSet) {
    let created = corpus.created_object_names();
    let deleted = corpus.deleted_object_names();
    let rolled_back = corpus.rolled_back_object_names();
    let touched: BTreeSet<&String> = created.union(deleted).collect();

    let result = results.entry(OBJECT_COUNTS_IDENTITY);
    let mut report = |level: Level, what: &str, names: Vec<&String>| {
        if !names.is_empty() {
            result.record(level, format!("These objects are {}: \n{}", what, join(&names)));
        }
    };

    report(
        Level::Error,
        "created but not rolled back",
        created.difference(rolled_back).collect(),
    );
    report(
        Level::Information,
        "created and rolled back",
        created.intersection(rolled_back).collect(),
    );
    report(
        Level::Error,
        "deleted but not rolled back",
        deleted.difference(rolled_back).collect(),
    );
    report(
        Level::Information,
        "deleted and rolled back",
        deleted.intersection(rolled_back).collect(),
    );
    report(
        Level::Error,
        "not created or deleted but are rolled back",
        rolled_back.iter().filter(|n| !touched.contains(n)).collect(),
    );
}

/// Record the package's change request number, as a warning when it does
/// not look like `C` followed by seven digits.
pub fn check_change_request_number(corpus: &dyn Corpus, results: &mut ResultSet) {
    let number = corpus.change_request_number();
    let level = if is_change_request_number(number) {
        Level::Information
    } else {
        Level::Warning
    };
    results.record(
        CHANGE_RECORD_IDENTITY,
        level,
        format!("The Change Record Number is: {}", number),
    );
}

pub fn is_change_request_number(text: &str) -> bool {
    CHANGE_REQUEST_REGEX.is_match(text)
}

fn join(names: &[&String]) -> String {
    names
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
