//! Structurally parsed schema document
//!
//! Declarations keep whatever could be read from the input, with `None` for
//! any attribute that was missing or malformed. The corresponding diagnostic
//! is already recorded in [`SchemaDocument::diagnostics`], so later passes
//! simply skip absent attributes instead of reporting them twice.

use crate::diagnostic::{Diagnostics, Location, render_path};
use serde_json::Value;

/// A field declaration as written in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Position in the owning message's `fields` array
    pub index: usize,
    pub name: Option<String>,
    pub id: Option<u64>,
    pub raw_type: Option<String>,
}

/// A message declaration as written in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDecl {
    /// Position in the document's `messages` array
    pub index: usize,
    pub name: Option<String>,
    pub id: Option<u64>,
    pub fields: Vec<FieldDecl>,
}

/// The loaded input document: raw tree, declarations, structural diagnostics
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    raw: Value,
    pub messages: Vec<MessageDecl>,
    pub diagnostics: Diagnostics,
}

impl SchemaDocument {
    pub fn new(raw: Value, messages: Vec<MessageDecl>, diagnostics: Diagnostics) -> Self {
        Self {
            raw,
            messages,
            diagnostics,
        }
    }

    /// The document exactly as parsed, used to render diagnostic paths
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Render a location against this document's raw tree
    pub fn render_path(&self, location: &Location) -> String {
        render_path(location, &self.raw)
    }

    /// Whether structural parsing found no problem
    pub fn is_well_formed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Names of every declared message, in document order
    pub fn message_names(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().filter_map(|m| m.name.as_deref())
    }
}
