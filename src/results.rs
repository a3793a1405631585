//! Per-artifact aggregation of findings.
//!
//! Each artifact identity owns three independent channels. A channel keeps
//! every message appended to it, in order, and renders them joined by
//! [`CHANNEL_SEPARATOR`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rules::Level;

/// Token placed between messages of one channel. Downstream report
/// transforms turn it into a line break.
pub const CHANNEL_SEPARATOR: &str = " _BR_ ";

/// One append-only channel of messages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Channel {
    messages: Vec<String>,
}

impl Channel {
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The channel as one string, or `None` when nothing was recorded.
    pub fn joined(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.messages.join(CHANNEL_SEPARATOR))
    }
}

/// Findings for one artifact identity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArtifactResult {
    pub failures: Channel,
    pub warnings: Channel,
    pub information: Channel,
}

impl ArtifactResult {
    /// Append a finding to the channel for `level`.
    pub fn record(&mut self, level: Level, message: impl Into<String>) {
        let channel = match level {
            Level::Error => &mut self.failures,
            Level::Warning => &mut self.warnings,
            Level::Information => &mut self.information,
        };
        channel.push(message);
    }

    pub fn has_findings(&self) -> bool {
        !(self.failures.is_empty() && self.warnings.is_empty() && self.information.is_empty())
    }

    pub fn is_failure(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Flattened view of one artifact's result, as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
}

/// All results of one evaluation run, keyed by shortened identity.
///
/// Iteration is in identity order, so built-in identities (which start
/// with `.`) come before path identities.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultSet {
    artifacts: BTreeMap<String, ArtifactResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the result for `identity`, creating an empty one on first use.
    pub fn entry(&mut self, identity: &str) -> &mut ArtifactResult {
        self.artifacts.entry(identity.to_string()).or_default()
    }

    pub fn record(&mut self, identity: &str, level: Level, message: impl Into<String>) {
        self.entry(identity).record(level, message);
    }

    pub fn get(&self, identity: &str) -> Option<&ArtifactResult> {
        self.artifacts.get(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArtifactResult)> {
        self.artifacts.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.artifacts.values().filter(|r| r.is_failure()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.artifacts
            .values()
            .filter(|r| !r.warnings.is_empty())
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.artifacts.values().any(ArtifactResult::is_failure)
    }

    /// Export one entry per artifact identity, with joined channels.
    pub fn entries(&self) -> Vec<ResultEntry> {
        self.iter()
            .map(|(name, result)| ResultEntry {
                name: name.to_string(),
                failure: result.failures.joined(),
                warning: result.warnings.joined(),
                information: result.information.joined(),
            })
            .collect()
    }
}
