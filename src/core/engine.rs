//! The evaluation engine.
//!
//! Evaluation runs in two phases:
//!
//! 1. **Collection**: every artifact is scanned once. The conditions that
//!    apply to it (the `ALL` conditions plus those registered under each of
//!    its kinds) are tested against the unit of text their scope selects,
//!    and every hit is recorded as a [`Match`]. Artifacts are scanned in
//!    parallel; their hits are merged back in corpus order.
//! 2. **Evaluation**: built-in checks run first, then every rule's action
//!    is evaluated against each match of its condition, in catalog order.
//!
//! Matches live in a per-run [`MatchSet`], never on the catalog, so a
//! catalog can be evaluated against any number of corpora.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{
    builtin::{check_change_request_number, check_object_counts},
    classify::classify,
    corpus::Corpus,
    identity::{DEFAULT_ROOT_MARKERS, shorten_identity},
};
use crate::{
    results::ResultSet,
    rules::{Catalog, ConditionId, Scope, WhenFilter},
    utils::split_lines,
};

/// Suffixes of artifacts that are never scanned.
pub const DEFAULT_SKIP_SUFFIXES: &[&str] = &[".gz", ".tar"];

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Markers used to shorten artifact paths into report identities.
    pub root_markers: Vec<String>,
    /// Artifacts whose path ends with one of these are never scanned.
    pub skip_suffixes: Vec<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            root_markers: DEFAULT_ROOT_MARKERS.iter().map(|s| s.to_string()).collect(),
            skip_suffixes: DEFAULT_SKIP_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One piece of text selected by a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Full artifact path.
    pub artifact: String,
    /// A line (without terminator), the whole content, or the path itself.
    pub text: String,
}

/// Matches of one run, per condition, in collection order.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    matches: Vec<Vec<Match>>,
}

impl MatchSet {
    fn with_conditions(count: usize) -> Self {
        Self {
            matches: vec![Vec::new(); count],
        }
    }

    pub fn get(&self, id: ConditionId) -> &[Match] {
        self.matches
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.matches.iter().map(Vec::len).sum()
    }
}

/// Conditions grouped by kind filter and by scope, in definition order.
#[derive(Debug, Clone, Default)]
pub struct ConditionIndex {
    by_filter: BTreeMap<WhenFilter, Vec<ConditionId>>,
    by_scope: BTreeMap<Scope, Vec<ConditionId>>,
}

impl ConditionIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self::default();
        for (id, condition) in catalog.conditions() {
            index.by_filter.entry(condition.filter).or_default().push(id);
            index.by_scope.entry(condition.scope).or_default().push(id);
        }
        index
    }

    pub fn for_filter(&self, filter: WhenFilter) -> &[ConditionId] {
        self.by_filter
            .get(&filter)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn for_scope(&self, scope: Scope) -> &[ConditionId] {
        self.by_scope
            .get(&scope)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub struct Engine<'c> {
    catalog: &'c Catalog,
    options: EngineOptions,
    index: ConditionIndex,
}

impl<'c> Engine<'c> {
    pub fn new(catalog: &'c Catalog, options: EngineOptions) -> Self {
        let index = ConditionIndex::build(catalog);
        Self {
            catalog,
            options,
            index,
        }
    }

    /// Scan the corpus and collect every condition's matches.
    pub fn collect_matches(&self, corpus: &dyn Corpus) -> MatchSet {
        let hits: Vec<Vec<(ConditionId, Match)>> = corpus
            .artifact_paths()
            .par_iter()
            .map(|path| self.scan_artifact(corpus, path))
            .collect();

        let mut matches = MatchSet::with_conditions(self.catalog.condition_count());
        for (id, m) in hits.into_iter().flatten() {
            matches.matches[id.index()].push(m);
        }

        debug!(
            artifacts = corpus.artifact_paths().len(),
            matches = matches.total(),
            "match collection complete"
        );
        matches
    }

    /// Run the built-in checks and every rule against the corpus.
    pub fn run(&self, corpus: &dyn Corpus) -> ResultSet {
        let mut results = ResultSet::new();

        check_object_counts(corpus, &mut results);
        check_change_request_number(corpus, &mut results);

        let matches = self.collect_matches(corpus);

        for rule in self.catalog.rules() {
            let action = self.catalog.action(rule.action);
            for m in matches.get(rule.condition) {
                let identity = shorten_identity(&m.artifact, &self.options.root_markers);
                let result = results.entry(&identity);
                if action.is_violation(&m.text, corpus) {
                    result.record(rule.level, rule.message.as_str());
                }
            }
        }

        info!(
            rules = self.catalog.rules().len(),
            artifacts = results.len(),
            failures = results.failure_count(),
            warnings = results.warning_count(),
            "evaluation complete"
        );
        results
    }

    /// Conditions that apply to `path`: the `ALL` pass, then one pass per kind.
    fn applicable(&self, path: &str) -> Vec<ConditionId> {
        let mut ids = self.index.for_filter(WhenFilter::All).to_vec();
        for kind in classify(path) {
            ids.extend_from_slice(self.index.for_filter(kind));
        }
        ids
    }

    fn is_skipped(&self, path: &str) -> bool {
        self.options
            .skip_suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()))
    }

    fn scan_artifact(&self, corpus: &dyn Corpus, path: &str) -> Vec<(ConditionId, Match)> {
        if self.is_skipped(path) {
            return Vec::new();
        }
        let ids = self.applicable(path);
        if ids.is_empty() {
            return Vec::new();
        }

        let needs_content = ids
            .iter()
            .any(|&id| self.catalog.condition(id).scope.reads_content());
        let content = if needs_content {
            match corpus.read_artifact(path) {
                Ok(content) => Some(content),
                Err(e) => {
                    warn!(path, "failed to read artifact, skipping content checks: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let mut hits = Vec::new();
        for id in ids {
            let condition = self.catalog.condition(id);
            let hit = |text: &str| {
                (
                    id,
                    Match {
                        artifact: path.to_string(),
                        text: text.to_string(),
                    },
                )
            };

            match condition.scope {
                Scope::FilePath => {
                    if condition.is_matched(path) {
                        hits.push(hit(path));
                    }
                }
                Scope::Line => {
                    let Some(content) = content.as_deref() else {
                        continue;
                    };
                    hits.extend(
                        split_lines(content)
                            .filter(|line| condition.is_matched(line))
                            .map(hit),
                    );
                }
                Scope::Script => {
                    let Some(content) = content.as_deref() else {
                        continue;
                    };
                    if split_lines(content).any(|line| condition.is_matched(line)) {
                        hits.push(hit(content));
                    }
                }
            }
        }
        hits
    }
}
