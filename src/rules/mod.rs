//! Declarative rule model and catalog loading.
//!
//! A catalog is three flat lists: conditions ("whens"), actions and rules.
//! Rules bind one condition to one action by id, with a severity and message.

pub mod action;
pub mod catalog;
pub mod condition;
pub mod rule;

pub use action::{Action, ActionKind};
pub use catalog::{
    Catalog, CatalogError, DEFAULT_CATALOG_SECTION, load_catalog, parse_catalog,
};
pub use condition::{Condition, MatchType, Scope, WhenFilter};
pub use rule::{Level, Rule};

/// Index of a condition in its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionId(pub(crate) usize);

impl ConditionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an action in its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) usize);

impl ActionId {
    pub fn index(self) -> usize {
        self.0
    }
}
