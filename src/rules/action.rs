//! Actions: named checks run against text selected by a condition.
//!
//! An action answers a single question: does this text violate the rule?

use std::fmt;

use regex::Regex;
use tracing::warn;

use crate::core::Corpus;

/// Catalog attribute keys that select an action's kind, in lookup priority.
pub const ACTION_KIND_KEYS: [&str; 6] = [
    "textMatch",
    "noTextMatch",
    "patternMatch",
    "noPatternMatch",
    "containsCrNumber",
    "containsTeradataKeywords",
];

/// The check an action performs, with the data it needs.
#[derive(Debug, Clone)]
pub enum ActionKind {
    /// Violation when the text does not contain the value.
    TextMatch(String),
    /// Violation when the text contains the value.
    NoTextMatch(String),
    /// Violation when the pattern is not found in the text.
    PatternMatch(Regex),
    /// Violation when the pattern is found in the text.
    NoPatternMatch(Regex),
    /// Violation when the package's change request number is absent from the text.
    ContainsChangeRequestNumber,
    /// Violation when the text starts with a reserved keyword.
    ContainsReservedKeyword,
    /// No recognized kind key was present on the catalog node.
    Unknown,
}

impl ActionKind {
    /// Catalog attribute key for this kind, if any.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ActionKind::TextMatch(_) => Some("textMatch"),
            ActionKind::NoTextMatch(_) => Some("noTextMatch"),
            ActionKind::PatternMatch(_) => Some("patternMatch"),
            ActionKind::NoPatternMatch(_) => Some("noPatternMatch"),
            ActionKind::ContainsChangeRequestNumber => Some("containsCrNumber"),
            ActionKind::ContainsReservedKeyword => Some("containsTeradataKeywords"),
            ActionKind::Unknown => None,
        }
    }

    /// Build a kind from its catalog key and attribute value.
    ///
    /// Returns `Ok(None)` for keys that are not action kinds.
    pub fn from_key(key: &str, data: &str) -> Result<Option<Self>, regex::Error> {
        let kind = match key {
            "textMatch" => ActionKind::TextMatch(data.to_string()),
            "noTextMatch" => ActionKind::NoTextMatch(data.to_string()),
            "patternMatch" => ActionKind::PatternMatch(Regex::new(data)?),
            "noPatternMatch" => ActionKind::NoPatternMatch(Regex::new(data)?),
            "containsCrNumber" => ActionKind::ContainsChangeRequestNumber,
            "containsTeradataKeywords" => ActionKind::ContainsReservedKeyword,
            _ => return Ok(None),
        };
        Ok(Some(kind))
    }
}

#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub kind: ActionKind,
    /// Raw attribute value from the catalog (unused by some kinds).
    pub data: String,
}

impl Action {
    pub fn new(name: impl Into<String>, kind: ActionKind, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            data: data.into(),
        }
    }

    /// Evaluate the action against matched text.
    ///
    /// Returns `true` when the rule's finding must be recorded.
    pub fn is_violation(&self, text: &str, corpus: &dyn Corpus) -> bool {
        match &self.kind {
            ActionKind::TextMatch(value) => !text.contains(value.as_str()),
            ActionKind::NoTextMatch(value) => text.contains(value.as_str()),
            ActionKind::PatternMatch(re) => !re.is_match(text),
            ActionKind::NoPatternMatch(re) => re.is_match(text),
            ActionKind::ContainsChangeRequestNumber => {
                !text.contains(corpus.change_request_number())
            }
            ActionKind::ContainsReservedKeyword => {
                let text = text.trim_start();
                corpus
                    .reserved_keywords()
                    .iter()
                    .any(|keyword| text.starts_with(keyword.as_str()))
            }
            ActionKind::Unknown => {
                warn!(action = %self.name, "action type not implemented; treating as no violation");
                false
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Action: {{name: ({}), actionType: ({}), actionData: ({})}}",
            self.name,
            self.kind.key().unwrap_or(""),
            self.data
        )
    }
}
