//! Core evaluation: the corpus abstraction, artifact classification and
//! the rule engine.
//!
//! ## Module Structure
//!
//! - `corpus`: the read-only `Corpus` interface and an in-memory implementation
//! - `package`: a corpus over an extracted package directory
//! - `classify`: artifact-kind classification from path naming
//! - `identity`: shortened artifact identities for reporting
//! - `engine`: condition indexing, match collection and rule evaluation
//! - `builtin`: object-count and change request number checks

pub mod builtin;
pub mod classify;
pub mod corpus;
pub mod engine;
pub mod identity;
pub mod package;

pub use classify::classify;
pub use corpus::{Corpus, MemoryCorpus};
pub use engine::{ConditionIndex, Engine, EngineOptions, Match, MatchSet};
pub use identity::shorten_identity;
pub use package::PackageCorpus;
