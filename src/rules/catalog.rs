//! Rule catalog loading.
//!
//! A catalog document looks like:
//!
//! ```xml
//! <qualityChecks>
//!   <assembledTeradataPackageChecks>
//!     <whens>
//!       <when name="Create Table" value="CREATE" type="CONTAINS" scope="LINE" filter="CREATE_TABLE"/>
//!     </whens>
//!     <actions>
//!       <action name="No Multiset" noTextMatch="MULTISET"/>
//!     </actions>
//!     <rules>
//!       <rule when="Create Table" action="No Multiset" level="error" message="Use SET tables [[TD-1]]"/>
//!     </rules>
//!   </assembledTeradataPackageChecks>
//! </qualityChecks>
//! ```
//!
//! Sections are built in dependency order (whens, actions, rules) whatever
//! their order in the document. Document-level problems, including patterns
//! the `regex` engine cannot compile, degrade to an empty catalog in
//! [`load_catalog`]; broken rule references do not.

use std::{collections::HashMap, fs, path::Path};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::{debug, error, warn};

use super::{
    ActionId, ConditionId,
    action::{ACTION_KIND_KEYS, Action, ActionKind},
    condition::Condition,
    rule::{Level, Rule},
};

pub const DEFAULT_CATALOG_SECTION: &str = "assembledTeradataPackageChecks";

const WHENS: &str = "whens";
const ACTIONS: &str = "actions";
const RULES: &str = "rules";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read rule catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed rule catalog at byte {position}: {message}")]
    Parse { position: u64, message: String },

    #[error("{element} '{name}' is missing attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        name: String,
        attribute: &'static str,
    },

    #[error("{element} '{name}' has invalid attribute '{attribute}': {message}")]
    InvalidAttribute {
        element: &'static str,
        name: String,
        attribute: &'static str,
        message: String,
    },

    #[error("Rule references unknown condition '{name}'")]
    UnknownCondition { name: String },

    #[error("Rule references unknown action '{name}'")]
    UnknownAction { name: String },

    #[error("{element} '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        element: &'static str,
        name: String,
        #[source]
        source: regex::Error,
    },
}

impl CatalogError {
    /// Whether the error must abort the run rather than degrade to an empty catalog.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CatalogError::UnknownCondition { .. } | CatalogError::UnknownAction { .. }
        )
    }
}

/// Loaded conditions, actions and rules.
///
/// Conditions and actions live in arenas; rules refer to them by id.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    conditions: Vec<Condition>,
    actions: Vec<Action>,
    rules: Vec<Rule>,
    condition_names: HashMap<String, ConditionId>,
    action_names: HashMap<String, ActionId>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.actions.is_empty() && self.rules.is_empty()
    }

    /// Register a condition. A later definition with the same name replaces
    /// the earlier one in place.
    pub fn add_condition(&mut self, condition: Condition) -> ConditionId {
        if let Some(&id) = self.condition_names.get(&condition.name) {
            warn!(name = %condition.name, "duplicate condition definition replaces earlier one");
            self.conditions[id.0] = condition;
            return id;
        }
        let id = ConditionId(self.conditions.len());
        self.condition_names.insert(condition.name.clone(), id);
        self.conditions.push(condition);
        id
    }

    /// Register an action. Same replacement semantics as conditions.
    pub fn add_action(&mut self, action: Action) -> ActionId {
        if let Some(&id) = self.action_names.get(&action.name) {
            warn!(name = %action.name, "duplicate action definition replaces earlier one");
            self.actions[id.0] = action;
            return id;
        }
        let id = ActionId(self.actions.len());
        self.action_names.insert(action.name.clone(), id);
        self.actions.push(action);
        id
    }

    /// Register a rule, resolving its condition and action by name.
    pub fn add_rule(
        &mut self,
        when: &str,
        action: &str,
        level: Level,
        message: impl Into<String>,
    ) -> Result<(), CatalogError> {
        let condition = self
            .condition_id(when)
            .ok_or_else(|| CatalogError::UnknownCondition {
                name: when.to_string(),
            })?;
        let action = self
            .action_id(action)
            .ok_or_else(|| CatalogError::UnknownAction {
                name: action.to_string(),
            })?;
        self.rules.push(Rule {
            condition,
            action,
            level,
            message: message.into(),
        });
        Ok(())
    }

    pub fn condition_id(&self, name: &str) -> Option<ConditionId> {
        self.condition_names.get(name).copied()
    }

    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        self.action_names.get(name).copied()
    }

    pub fn condition(&self, id: ConditionId) -> &Condition {
        &self.conditions[id.0]
    }

    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.0]
    }

    /// Conditions in definition order.
    pub fn conditions(&self) -> impl Iterator<Item = (ConditionId, &Condition)> {
        self.conditions
            .iter()
            .enumerate()
            .map(|(i, c)| (ConditionId(i), c))
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Load a catalog file, degrading to an empty catalog on document errors.
///
/// Only fatal errors (see [`CatalogError::is_fatal`]) are returned.
pub fn load_catalog(path: &Path, section: &str) -> Result<Catalog, CatalogError> {
    debug!(path = %path.display(), section, "loading rule catalog");

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(source) => {
            let err = CatalogError::Read {
                path: path.display().to_string(),
                source,
            };
            error!("{}; continuing with no rules", err);
            return Ok(Catalog::default());
        }
    };

    match parse_catalog(&text, section) {
        Ok(catalog) => Ok(catalog),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            error!("{}; continuing with no rules", err);
            Ok(Catalog::default())
        }
    }
}

/// Parse a catalog document strictly, returning every error.
pub fn parse_catalog(text: &str, section: &str) -> Result<Catalog, CatalogError> {
    let document = read_document(text, section)?;

    let mut catalog = Catalog::default();
    for node in &document.whens {
        catalog.add_condition(build_condition(node)?);
    }
    for node in &document.actions {
        catalog.add_action(build_action(node)?);
    }
    for node in &document.rules {
        let when = node.required("rule", "when")?;
        let action = node.required("rule", "action")?;
        let level = node.parse::<Level>("rule", "level")?;
        let message = node.required("rule", "message")?;
        catalog.add_rule(when, action, level, message)?;
    }

    debug!(
        conditions = catalog.conditions.len(),
        actions = catalog.actions.len(),
        rules = catalog.rules.len(),
        "rule catalog loaded"
    );
    Ok(catalog)
}

/// An element's attributes, in document order.
#[derive(Debug, Default)]
struct Node {
    attributes: Vec<(String, String)>,
}

impl Node {
    fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn name(&self) -> String {
        self.get("name").unwrap_or("<unnamed>").to_string()
    }

    fn required(&self, element: &'static str, attribute: &'static str) -> Result<&str, CatalogError> {
        self.get(attribute)
            .ok_or_else(|| CatalogError::MissingAttribute {
                element,
                name: self.name(),
                attribute,
            })
    }

    fn parse<T>(&self, element: &'static str, attribute: &'static str) -> Result<T, CatalogError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.required(element, attribute)?
            .parse()
            .map_err(|e: T::Err| CatalogError::InvalidAttribute {
                element,
                name: self.name(),
                attribute,
                message: e.to_string(),
            })
    }
}

#[derive(Debug, Default)]
struct Document {
    whens: Vec<Node>,
    actions: Vec<Node>,
    rules: Vec<Node>,
}

fn read_document(text: &str, section: &str) -> Result<Document, CatalogError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut document = Document::default();
    // Names of the currently open elements, outermost first.
    let mut open: Vec<String> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;

        match reader.read_event() {
            Ok(Event::Start(element)) => {
                collect_entry(&open, section, &element, &mut document, position)?;
                open.push(element_name(&element));
            }
            Ok(Event::Empty(element)) => {
                collect_entry(&open, section, &element, &mut document, position)?;
            }
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Eof) => {
                if let Some(name) = open.last() {
                    return Err(CatalogError::Parse {
                        position,
                        message: format!("unclosed element <{}>", name),
                    });
                }
                break;
            }
            Ok(_) => {}
            Err(e) => {
                return Err(CatalogError::Parse {
                    position,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(document)
}

/// Record `element` if it is an entry of one of the catalog sections,
/// i.e. it sits at `<root>/<section>/<whens|actions|rules>/<element>`.
fn collect_entry(
    open: &[String],
    section: &str,
    element: &BytesStart<'_>,
    document: &mut Document,
    position: u64,
) -> Result<(), CatalogError> {
    let [_, parent_section, group] = open else {
        return Ok(());
    };
    if parent_section.as_str() != section {
        return Ok(());
    }
    let target = match group.as_str() {
        WHENS => &mut document.whens,
        ACTIONS => &mut document.actions,
        RULES => &mut document.rules,
        _ => return Ok(()),
    };

    let mut node = Node::default();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| CatalogError::Parse {
            position,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| CatalogError::Parse {
                position,
                message: e.to_string(),
            })?
            .into_owned();
        node.attributes.push((key, value));
    }
    target.push(node);
    Ok(())
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn build_condition(node: &Node) -> Result<Condition, CatalogError> {
    let name = node.required("when", "name")?;
    let value = node.required("when", "value")?;
    let match_type = node.parse("when", "type")?;
    let scope = node.parse("when", "scope")?;
    let filter = node.parse("when", "filter")?;

    Condition::new(name, value, match_type, scope, filter).map_err(|source| {
        CatalogError::InvalidPattern {
            element: "when",
            name: name.to_string(),
            source,
        }
    })
}

/// Build an action. The kind is the first recognized key present, in
/// [`ACTION_KIND_KEYS`] order.
fn build_action(node: &Node) -> Result<Action, CatalogError> {
    let name = node.required("action", "name")?;

    let present: Vec<&str> = ACTION_KIND_KEYS
        .iter()
        .copied()
        .filter(|key| node.get(key).is_some())
        .collect();

    let Some(&key) = present.first() else {
        error!(action = name, "unknown action type; no recognized attribute present");
        return Ok(Action::new(name, ActionKind::Unknown, ""));
    };
    if present.len() > 1 {
        warn!(action = name, keys = ?present, "several action types present; using '{}'", key);
    }

    let data = node.get(key).unwrap_or_default();
    let kind = ActionKind::from_key(key, data)
        .map_err(|source| CatalogError::InvalidPattern {
            element: "action",
            name: name.to_string(),
            source,
        })?
        .unwrap_or(ActionKind::Unknown);

    Ok(Action::new(name, kind, data))
}
