use std::{fmt, str::FromStr};

use super::{ActionId, ConditionId, condition::UnknownToken};

/// How a rule's finding is reported.
///
/// - `Error` fails the build.
/// - `Warning` may fail the build (deploy only with supporting documentation).
/// - `Information` is reported but never affects the build status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warning,
    Information,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Information => "information",
        }
    }
}

impl FromStr for Level {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Level::Error),
            "warning" => Ok(Level::Warning),
            "information" => Ok(Level::Information),
            _ => Err(UnknownToken::new("level", s)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One quality check: run `action` on every match of `condition`.
///
/// `message` is reported verbatim, including any `[[X-N]]` reference tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub condition: ConditionId,
    pub action: ActionId,
    pub level: Level,
    pub message: String,
}
