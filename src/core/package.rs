//! A corpus backed by an extracted package directory.
//!
//! Paths are collected eagerly when the package is opened; every derived
//! fact is computed on first use and cached for the life of the corpus.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
    sync::{LazyLock, OnceLock},
};

use anyhow::{Context, Result};
use glob::Pattern;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::corpus::Corpus;
use crate::utils::{normalize_path, object_name_from_path, split_lines};

const VERSION_FILE: &str = "Version.txt";
const CR_NUMBER_MARKER: &str = "CR_NUMBER:";

const DROP_TABLES_SCRIPT: &str = "_Drop_Tables.sql";
const DROP_VIEWS_SCRIPT: &str = "_Drop_Views.sql";
const ROLLBACK_DROP_TABLES_SCRIPT: &str = "Rollback_Drop_Tables.sql";
const ROLLBACK_DROP_VIEWS_SCRIPT: &str = "Rollback_Drop_Views.sql";
const BACKUP_VIEWS_SCRIPT: &str = "_Backup_Views.sql";

static DROP_TABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DROP TABLE (.*);").unwrap());
static DROP_VIEW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DROP VIEW (.*);").unwrap());
static SHOW_VIEW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SHOW VIEW (.*);").unwrap());

#[derive(Debug)]
pub struct PackageCorpus {
    paths: Vec<String>,
    keywords_file: Option<PathBuf>,
    change_request_number: OnceLock<String>,
    reserved_keywords: OnceLock<Vec<String>>,
    created: OnceLock<BTreeSet<String>>,
    deleted: OnceLock<BTreeSet<String>>,
    rolled_back: OnceLock<BTreeSet<String>>,
}

impl PackageCorpus {
    /// Walk `root` and collect every file path, skipping paths (relative to
    /// `root`) that match one of `ignores`.
    pub fn open(root: &Path, keywords_file: Option<&Path>, ignores: &[String]) -> Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("Package directory not found: {}", root.display());
        }

        let patterns = ignores
            .iter()
            .map(|p| {
                Pattern::new(p).with_context(|| format!("Invalid ignore pattern: \"{}\"", p))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut paths = Vec::new();
        let mut ignored = 0usize;
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Cannot access path: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let relative = normalize_path(relative);
            if patterns.iter().any(|p| p.matches(&relative)) {
                ignored += 1;
                continue;
            }
            paths.push(normalize_path(entry.path()));
        }
        paths.sort();

        debug!(
            root = %root.display(),
            artifacts = paths.len(),
            ignored,
            "package walked"
        );

        Ok(Self {
            paths,
            keywords_file: keywords_file.map(Path::to_path_buf),
            change_request_number: OnceLock::new(),
            reserved_keywords: OnceLock::new(),
            created: OnceLock::new(),
            deleted: OnceLock::new(),
            rolled_back: OnceLock::new(),
        })
    }

    /// Read an artifact for fact derivation; unreadable files are skipped.
    fn read_or_warn(&self, path: &str) -> Option<String> {
        match self.read_artifact(path) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(path, "failed to read artifact: {}", e);
                None
            }
        }
    }

    /// Collect the first capture group of `pattern` from every line of the
    /// artifacts selected by `select`.
    fn collect_object_names(
        &self,
        names: &mut BTreeSet<String>,
        select: impl Fn(&str) -> bool,
        pattern: &Regex,
    ) {
        for path in self.paths.iter().filter(|p| select(p.as_str())) {
            let Some(content) = self.read_or_warn(path) else {
                continue;
            };
            names.extend(
                split_lines(&content)
                    .filter_map(|line| pattern.captures(line))
                    .filter_map(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string()),
            );
        }
    }
}

impl Corpus for PackageCorpus {
    fn artifact_paths(&self) -> &[String] {
        &self.paths
    }

    fn read_artifact(&self, path: &str) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// The value of the last `CR_NUMBER:` line across every `Version.txt`,
    /// in path order. Later files and later lines override earlier ones.
    fn change_request_number(&self) -> &str {
        self.change_request_number.get_or_init(|| {
            let number = self
                .paths
                .iter()
                .filter(|p| p.contains(VERSION_FILE))
                .filter_map(|p| self.read_or_warn(p))
                .filter_map(|content| parse_change_request_number(&content))
                .last()
                .unwrap_or_default();
            if number.is_empty() {
                warn!("no change request number found in package");
            }
            number
        })
    }

    fn reserved_keywords(&self) -> &[String] {
        self.reserved_keywords.get_or_init(|| match &self.keywords_file {
            Some(path) => load_reserved_keywords(path).unwrap_or_else(|e| {
                warn!("{:#}; continuing without reserved keywords", e);
                Vec::new()
            }),
            None => Vec::new(),
        })
    }

    fn created_object_names(&self) -> &BTreeSet<String> {
        self.created.get_or_init(|| {
            self.paths
                .iter()
                .filter(|p| p.ends_with(".tbl") || p.ends_with(".viw"))
                .map(|p| object_name_from_path(p).to_string())
                .collect()
        })
    }

    /// Objects dropped by any `*_Drop_Tables.sql` or `*_Drop_Views.sql`
    /// script. Rollback drop scripts match too, so an object a rollback
    /// drops is both deleted and rolled back.
    fn deleted_object_names(&self) -> &BTreeSet<String> {
        self.deleted.get_or_init(|| {
            let mut names = BTreeSet::new();
            self.collect_object_names(
                &mut names,
                |p| p.contains(DROP_TABLES_SCRIPT),
                &DROP_TABLE_REGEX,
            );
            self.collect_object_names(
                &mut names,
                |p| p.contains(DROP_VIEWS_SCRIPT),
                &DROP_VIEW_REGEX,
            );
            names
        })
    }

    fn rolled_back_object_names(&self) -> &BTreeSet<String> {
        self.rolled_back.get_or_init(|| {
            let mut names = BTreeSet::new();
            self.collect_object_names(
                &mut names,
                |p| p.contains(ROLLBACK_DROP_TABLES_SCRIPT),
                &DROP_TABLE_REGEX,
            );
            self.collect_object_names(
                &mut names,
                |p| p.contains(ROLLBACK_DROP_VIEWS_SCRIPT),
                &DROP_VIEW_REGEX,
            );
            self.collect_object_names(
                &mut names,
                |p| p.contains(BACKUP_VIEWS_SCRIPT),
                &SHOW_VIEW_REGEX,
            );
            names
        })
    }
}

/// Find the value after `CR_NUMBER:` on the last line that carries it.
fn parse_change_request_number(content: &str) -> Option<String> {
    split_lines(content)
        .filter_map(|line| {
            line.find(CR_NUMBER_MARKER)
                .map(|i| line[i + CR_NUMBER_MARKER.len()..].trim().to_string())
        })
        .last()
}

/// Load reserved keywords, one per line, each right-trimmed and given a
/// trailing space so that `CREATE` does not match `CREATED_TS`.
pub fn load_reserved_keywords(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reserved keywords: {}", path.display()))?;
    Ok(split_lines(&content)
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| format!("{} ", line))
        .collect())
}
