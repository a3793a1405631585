//! The artifact corpus: the read-only data source the engine evaluates.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
};

/// Read-only access to a package's artifacts and the facts derived from them.
///
/// Artifact paths are identities: forward-slash separated and stable for
/// the lifetime of the corpus. Implementations must be shareable across
/// the engine's scan workers.
pub trait Corpus: Sync {
    /// All artifact paths, in walk order.
    fn artifact_paths(&self) -> &[String];

    /// Full textual content of one artifact.
    fn read_artifact(&self, path: &str) -> io::Result<String>;

    /// The package's change request number, or an empty string when absent.
    fn change_request_number(&self) -> &str;

    /// Reserved keywords, each carrying its trailing space.
    fn reserved_keywords(&self) -> &[String];

    fn created_object_names(&self) -> &BTreeSet<String>;

    fn deleted_object_names(&self) -> &BTreeSet<String>;

    fn rolled_back_object_names(&self) -> &BTreeSet<String>;
}

/// An in-memory corpus.
///
/// Derived facts are set explicitly rather than computed from the artifacts.
#[derive(Debug, Default, Clone)]
pub struct MemoryCorpus {
    paths: Vec<String>,
    contents: BTreeMap<String, String>,
    change_request_number: String,
    reserved_keywords: Vec<String>,
    created: BTreeSet<String>,
    deleted: BTreeSet<String>,
    rolled_back: BTreeSet<String>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact. Re-adding a path replaces its content in place.
    pub fn with_artifact(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        if !self.contents.contains_key(&path) {
            self.paths.push(path.clone());
        }
        self.contents.insert(path, content.into());
        self
    }

    pub fn with_change_request_number(mut self, number: impl Into<String>) -> Self {
        self.change_request_number = number.into();
        self
    }

    /// Keywords are stored as given; callers supply the trailing space.
    pub fn with_reserved_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_created<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.created = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_deleted<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deleted = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rolled_back<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rolled_back = names.into_iter().map(Into::into).collect();
        self
    }
}

impl Corpus for MemoryCorpus {
    fn artifact_paths(&self) -> &[String] {
        &self.paths
    }

    fn read_artifact(&self, path: &str) -> io::Result<String> {
        self.contents.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no artifact at {}", path))
        })
    }

    fn change_request_number(&self) -> &str {
        &self.change_request_number
    }

    fn reserved_keywords(&self) -> &[String] {
        &self.reserved_keywords
    }

    fn created_object_names(&self) -> &BTreeSet<String> {
        &self.created
    }

    fn deleted_object_names(&self) -> &BTreeSet<String> {
        &self.deleted
    }

    fn rolled_back_object_names(&self) -> &BTreeSet<String> {
        &self.rolled_back
    }
}
