//! Conditions ("whens"): named predicates that select text from the corpus.
//!
//! A condition is tested against one unit of text chosen by its [`Scope`]
//! and is only applied to artifacts whose kind matches its [`WhenFilter`].

use std::{fmt, str::FromStr};

use regex::Regex;

/// How a condition's value is compared against a unit of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchType {
    Contains,
    BeginsWith,
    MatchesPattern,
}

/// The unit of text a condition is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Each line of the artifact, recorded separately.
    Line,
    /// The whole artifact; one match carrying the full content.
    Script,
    /// The artifact path itself.
    FilePath,
}

/// Restricts which artifacts a condition is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WhenFilter {
    All,
    CreateTable,
    CreateView,
    CreateComment,
    CreateBackupTable,
    CreateBackupView,
}

/// Error returned when an enumeration token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownToken {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Contains => "CONTAINS",
            MatchType::BeginsWith => "BEGINS_WITH",
            MatchType::MatchesPattern => "MATCHES_PATTERN",
        }
    }
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Line => "LINE",
            Scope::Script => "SCRIPT",
            Scope::FilePath => "FILE_PATH",
        }
    }

    /// Whether matching needs the artifact's content (as opposed to its path).
    pub fn reads_content(&self) -> bool {
        matches!(self, Scope::Line | Scope::Script)
    }
}

impl WhenFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhenFilter::All => "ALL",
            WhenFilter::CreateTable => "CREATE_TABLE",
            WhenFilter::CreateView => "CREATE_VIEW",
            WhenFilter::CreateComment => "CREATE_COMMENT",
            WhenFilter::CreateBackupTable => "CREATE_BACKUP_TABLE",
            WhenFilter::CreateBackupView => "CREATE_BACKUP_VIEW",
        }
    }
}

impl FromStr for MatchType {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONTAINS" => Ok(MatchType::Contains),
            "BEGINS_WITH" => Ok(MatchType::BeginsWith),
            "MATCHES_PATTERN" => Ok(MatchType::MatchesPattern),
            _ => Err(UnknownToken::new("match type", s)),
        }
    }
}

impl FromStr for Scope {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LINE" => Ok(Scope::Line),
            "SCRIPT" => Ok(Scope::Script),
            "FILE_PATH" => Ok(Scope::FilePath),
            _ => Err(UnknownToken::new("scope", s)),
        }
    }
}

impl FromStr for WhenFilter {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(WhenFilter::All),
            "CREATE_TABLE" => Ok(WhenFilter::CreateTable),
            "CREATE_VIEW" => Ok(WhenFilter::CreateView),
            "CREATE_COMMENT" => Ok(WhenFilter::CreateComment),
            "CREATE_BACKUP_TABLE" => Ok(WhenFilter::CreateBackupTable),
            "CREATE_BACKUP_VIEW" => Ok(WhenFilter::CreateBackupView),
            _ => Err(UnknownToken::new("filter", s)),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WhenFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The compiled form of a condition's value.
#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(String),
    BeginsWith(String),
    Pattern(Regex),
}

/// A named predicate over a unit of text.
///
/// Conditions are immutable once loaded. Matches found during a run are
/// kept by the engine, keyed by [`ConditionId`](super::ConditionId).
#[derive(Debug, Clone)]
pub struct Condition {
    pub name: String,
    pub value: String,
    pub scope: Scope,
    pub filter: WhenFilter,
    matcher: Matcher,
}

impl Condition {
    /// Build a condition, compiling the value when it is a pattern.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        match_type: MatchType,
        scope: Scope,
        filter: WhenFilter,
    ) -> Result<Self, regex::Error> {
        let value = value.into();
        let matcher = match match_type {
            MatchType::Contains => Matcher::Contains(value.clone()),
            MatchType::BeginsWith => Matcher::BeginsWith(value.clone()),
            MatchType::MatchesPattern => Matcher::Pattern(Regex::new(&value)?),
        };
        Ok(Self {
            name: name.into(),
            value,
            scope,
            filter,
            matcher,
        })
    }

    pub fn match_type(&self) -> MatchType {
        match self.matcher {
            Matcher::Contains(_) => MatchType::Contains,
            Matcher::BeginsWith(_) => MatchType::BeginsWith,
            Matcher::Pattern(_) => MatchType::MatchesPattern,
        }
    }

    /// Test one unit of text. Surrounding whitespace is ignored.
    pub fn is_matched(&self, text: &str) -> bool {
        let text = text.trim();
        match &self.matcher {
            Matcher::Contains(value) => text.contains(value.as_str()),
            Matcher::BeginsWith(value) => text.starts_with(value.as_str()),
            Matcher::Pattern(re) => re.is_match(text),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "When: {{name: ({}), value: ({}), type: ({}), scope: ({}), filter: ({})}}",
            self.name,
            self.value,
            self.match_type(),
            self.scope,
            self.filter
        )
    }
}
