//! Validation engine
//!
//! Second phase of a compilation run. The whole document has already been
//! loaded, so every message name is visible here and forward references
//! resolve regardless of declaration order.

use crate::dependencies::resolve_dependencies;
use crate::rules::{TypeExpr, parse_type_expr};
use crate::{Error, Result};
use protoc_schema::{
    DataType, Diagnostics, Field, FieldType, Location, Message, MessageDecl, Schema,
    SchemaDocument,
};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, info};

/// Validation configuration
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig {
    /// Maximum diagnostics kept in a report (0 = unlimited)
    pub max_errors: usize,
}

/// Outcome of validating one document
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Every structural and validation diagnostic, in detection order
    pub diagnostics: Diagnostics,
    /// The resolved schema, present only when there are no diagnostics
    pub schema: Option<Schema>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Convert into the resolved schema or the diagnostic batch
    pub fn into_result(self) -> Result<Schema> {
        match self.schema {
            Some(schema) if self.diagnostics.is_empty() => Ok(schema),
            _ => Err(Error::Invalid(self.diagnostics)),
        }
    }
}

/// Type resolver and schema validator
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create a new validation engine collecting every diagnostic
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Resolve a loaded document into a [`Schema`], failing with the complete
    /// diagnostic batch if anything is wrong
    pub fn resolve(&self, document: &SchemaDocument) -> Result<Schema> {
        self.validate(document).into_result()
    }

    /// Validate a loaded document.
    ///
    /// Structural diagnostics from loading come first, followed by schema-wide
    /// uniqueness problems, then per-message and per-field problems in
    /// document order.
    pub fn validate(&self, document: &SchemaDocument) -> ValidationResult {
        let mut diagnostics = document.diagnostics.clone();
        let known: HashSet<&str> = document.message_names().collect();

        check_unique_message_ids(&document.messages, &mut diagnostics);
        check_unique_message_names(&document.messages, &mut diagnostics);

        let mut resolved = Vec::with_capacity(document.messages.len());
        for decl in &document.messages {
            if let Some(message) = resolve_message(decl, &known, &mut diagnostics) {
                resolved.push((decl.index, message));
            }
        }
        check_recursive_references(&resolved, &mut diagnostics);

        if self.config.max_errors > 0 {
            diagnostics.truncate(self.config.max_errors);
        }

        if !diagnostics.is_empty() {
            info!("Schema validation failed with {} diagnostics", diagnostics.len());
            return ValidationResult {
                diagnostics,
                schema: None,
            };
        }

        let messages = resolved.into_iter().map(|(_, message)| message).collect();
        let mut schema = Schema::new(messages);
        resolve_dependencies(&mut schema);
        info!("Validated schema with {} messages", schema.messages.len());

        ValidationResult {
            diagnostics,
            schema: Some(schema),
        }
    }
}

/// Resolve one message declaration. Returns `None` when any attribute was
/// structurally unusable; the reason is already in `diagnostics`.
fn resolve_message(
    decl: &MessageDecl,
    known: &HashSet<&str>,
    diagnostics: &mut Diagnostics,
) -> Option<Message> {
    check_unique_field_ids(decl, diagnostics);
    check_unique_field_names(decl, diagnostics);

    let mut fields = Vec::with_capacity(decl.fields.len());
    let mut complete = true;

    for field in &decl.fields {
        let location = Location::field(decl.index, field.index).key("type");
        let ty = field
            .raw_type
            .as_deref()
            .and_then(|raw| resolve_type(raw, known, &location, diagnostics));

        match (&field.name, field.id, &field.raw_type, ty) {
            (Some(name), Some(id), Some(raw), Some(ty)) => {
                fields.push(Field::new(name.clone(), id, raw.clone(), ty));
            }
            _ => complete = false,
        }
    }

    let (Some(name), Some(id)) = (&decl.name, decl.id) else {
        return None;
    };
    if !complete {
        return None;
    }

    debug!("Resolved message {} ({} fields)", name, fields.len());
    Some(Message::new(name.clone(), id).with_fields(fields))
}

/// Classify a raw type expression, reporting syntax errors and unresolved
/// message references at `location`
fn resolve_type(
    raw: &str,
    known: &HashSet<&str>,
    location: &Location,
    diagnostics: &mut Diagnostics,
) -> Option<FieldType> {
    let expr = match parse_type_expr(raw) {
        Ok(expr) => expr,
        Err(e) => {
            diagnostics.push(e.describe(raw), location.clone());
            return None;
        }
    };

    match expr {
        TypeExpr::SizedString(size) => Some(FieldType::SizedString(size)),
        TypeExpr::Named(name) => resolve_named(name, known, location, diagnostics),
        TypeExpr::Array { element, len } => {
            let element = resolve_named(element, known, location, diagnostics)?;
            Some(FieldType::Array {
                element: Box::new(element),
                len,
            })
        }
    }
}

fn resolve_named(
    name: &str,
    known: &HashSet<&str>,
    location: &Location,
    diagnostics: &mut Diagnostics,
) -> Option<FieldType> {
    if let Some(primitive) = DataType::from_name(name) {
        return Some(FieldType::Primitive(primitive));
    }
    if known.contains(name) {
        return Some(FieldType::Message(name.to_string()));
    }

    diagnostics.push(
        format!("{name} is not a valid type (not a primitive nor a defined message)."),
        location.clone(),
    );
    None
}

/// Group names sharing the same key, keeping first-seen order; only groups
/// with more than one member are returned
fn collisions<'a, K, I>(entries: I) -> Vec<Vec<&'a str>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, &'a str)>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<&'a str>> = Vec::new();

    for (key, name) in entries {
        match positions.get(&key) {
            Some(&position) => groups[position].push(name),
            None => {
                positions.insert(key, groups.len());
                groups.push(vec![name]);
            }
        }
    }

    groups.retain(|group| group.len() > 1);
    groups
}

fn quoted_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_unique_message_ids(messages: &[MessageDecl], diagnostics: &mut Diagnostics) {
    let entries = messages
        .iter()
        .filter_map(|m| Some((m.id?, m.name.as_deref()?)));

    for group in collisions(entries) {
        diagnostics.push(
            format!("{} have the same id.", quoted_list(&group)),
            Location::messages(),
        );
    }
}

fn check_unique_message_names(messages: &[MessageDecl], diagnostics: &mut Diagnostics) {
    let entries = messages
        .iter()
        .filter_map(|m| m.name.as_deref().map(|name| (name, name)));

    for group in collisions(entries) {
        diagnostics.push(
            format!(
                "Message name \"{}\" is declared {} times.",
                group[0],
                group.len()
            ),
            Location::messages(),
        );
    }
}

fn check_unique_field_ids(message: &MessageDecl, diagnostics: &mut Diagnostics) {
    let entries = message
        .fields
        .iter()
        .filter_map(|f| Some((f.id?, f.name.as_deref()?)));

    for group in collisions(entries) {
        diagnostics.push(
            format!("{} have the same id.", quoted_list(&group)),
            Location::fields(message.index),
        );
    }
}

fn check_unique_field_names(message: &MessageDecl, diagnostics: &mut Diagnostics) {
    let entries = message
        .fields
        .iter()
        .filter_map(|f| f.name.as_deref().map(|name| (name, name)));

    for group in collisions(entries) {
        diagnostics.push(
            format!(
                "Field name \"{}\" is declared {} times.",
                group[0],
                group.len()
            ),
            Location::fields(message.index),
        );
    }
}

/// Whether `target` can reach `goal` by following message references
fn reaches<'a>(
    target: &'a str,
    goal: &str,
    references: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
) -> bool {
    if target == goal {
        return true;
    }
    if !visited.insert(target) {
        return false;
    }
    references
        .get(target)
        .is_some_and(|next| next.iter().any(|&t| reaches(t, goal, references, visited)))
}

/// A message may not contain itself, directly or through other messages
fn check_recursive_references(messages: &[(usize, Message)], diagnostics: &mut Diagnostics) {
    let references: HashMap<&str, Vec<&str>> = messages
        .iter()
        .map(|(_, m)| {
            let targets = m.fields.iter().filter_map(Field::message_ref).collect();
            (m.name.as_str(), targets)
        })
        .collect();

    for (index, message) in messages {
        for (position, field) in message.fields.iter().enumerate() {
            let Some(target) = field.message_ref() else {
                continue;
            };
            let mut visited = HashSet::new();
            if reaches(target, &message.name, &references, &mut visited) {
                diagnostics.push(
                    format!(
                        "\"{}\" refers back to itself through field \"{}\" (recursive messages are not supported).",
                        message.name, field.name
                    ),
                    Location::field(*index, position).key("type"),
                );
            }
        }
    }
}
