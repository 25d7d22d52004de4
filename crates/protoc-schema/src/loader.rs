//! Schema document loader
//!
//! Reads JSON or YAML into a raw [`serde_json::Value`] tree, then walks the
//! tree to build declarations. The walk never stops at the first problem:
//! every missing key, wrong kind, negative id, or invalid identifier in the
//! document ends up in the returned document's diagnostics.

use crate::diagnostic::{Diagnostics, Location};
use crate::document::{FieldDecl, MessageDecl, SchemaDocument};
use crate::model::is_valid_identifier;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, trace};

const REQUIRED: &str = "This field is required.";
const NEGATIVE_ID: &str = "Input should be greater than or equal to 0.";

/// Loader for schema documents
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a schema document from a file; `.yaml`/`.yml` files are read as
    /// YAML, everything else as JSON
    pub fn load_from_file(&self, path: &Path) -> Result<SchemaDocument> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }

        trace!("Loading schema document from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Load a schema document from a JSON string
    pub fn load_from_json(&self, json: &str) -> Result<SchemaDocument> {
        let raw: Value = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {}", e)))?;

        Ok(self.load_from_value(raw))
    }

    /// Load a schema document from a YAML string
    pub fn load_from_yaml(&self, yaml: &str) -> Result<SchemaDocument> {
        let raw: Value = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {}", e)))?;

        Ok(self.load_from_value(raw))
    }

    /// Structurally parse an already decoded document
    pub fn load_from_value(&self, raw: Value) -> SchemaDocument {
        let mut diagnostics = Diagnostics::new();
        let messages = parse_messages(&raw, &mut diagnostics);

        debug!(
            "Parsed {} message declarations ({} structural diagnostics)",
            messages.len(),
            diagnostics.len()
        );

        SchemaDocument::new(raw, messages, diagnostics)
    }
}

fn parse_messages(raw: &Value, diagnostics: &mut Diagnostics) -> Vec<MessageDecl> {
    let Some(root) = raw.as_object() else {
        diagnostics.push(kind_message("object"), Location::root());
        return Vec::new();
    };

    let Some(entries) = required_array(root, "messages", Location::root(), diagnostics) else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| parse_message(index, entry, diagnostics))
        .collect()
}

fn parse_message(index: usize, entry: &Value, diagnostics: &mut Diagnostics) -> Option<MessageDecl> {
    let location = Location::message(index);
    let Some(object) = entry.as_object() else {
        diagnostics.push(kind_message("object"), location);
        return None;
    };

    let name = required_name(object, location.clone(), diagnostics);
    let id = required_id(object, location.clone(), diagnostics);
    let fields = required_array(object, "fields", location, diagnostics)
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .filter_map(|(field_index, field)| parse_field(index, field_index, field, diagnostics))
                .collect()
        })
        .unwrap_or_default();

    Some(MessageDecl {
        index,
        name,
        id,
        fields,
    })
}

fn parse_field(
    message: usize,
    index: usize,
    entry: &Value,
    diagnostics: &mut Diagnostics,
) -> Option<FieldDecl> {
    let location = Location::field(message, index);
    let Some(object) = entry.as_object() else {
        diagnostics.push(kind_message("object"), location);
        return None;
    };

    let name = required_name(object, location.clone(), diagnostics);
    let id = required_id(object, location.clone(), diagnostics);
    let raw_type = required_string(object, "type", location, diagnostics);

    Some(FieldDecl {
        index,
        name,
        id,
        raw_type,
    })
}

fn kind_message(kind: &str) -> String {
    format!("Input should be a valid {kind}.")
}

fn required<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    location: &Location,
    diagnostics: &mut Diagnostics,
) -> Option<&'a Value> {
    match object.get(key) {
        None | Some(Value::Null) => {
            diagnostics.push(REQUIRED, location.clone().key(key));
            None
        }
        Some(value) => Some(value),
    }
}

fn required_array<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    location: Location,
    diagnostics: &mut Diagnostics,
) -> Option<&'a Vec<Value>> {
    let value = required(object, key, &location, diagnostics)?;
    match value.as_array() {
        Some(array) => Some(array),
        None => {
            diagnostics.push(kind_message("array"), location.key(key));
            None
        }
    }
}

fn required_string(
    object: &Map<String, Value>,
    key: &str,
    location: Location,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    let value = required(object, key, &location, diagnostics)?;
    match value.as_str() {
        Some("") => {
            diagnostics.push(REQUIRED, location.key(key));
            None
        }
        Some(s) => Some(s.to_string()),
        None => {
            diagnostics.push(kind_message("string"), location.key(key));
            None
        }
    }
}

fn required_name(
    object: &Map<String, Value>,
    location: Location,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    let name = required_string(object, "name", location.clone(), diagnostics)?;
    if !is_valid_identifier(&name) {
        diagnostics.push(
            format!(
                "\"{name}\" is not a valid name (only letters, digits and '_' allowed, cannot start with a digit)"
            ),
            location.key("name"),
        );
    }
    Some(name)
}

fn required_id(
    object: &Map<String, Value>,
    location: Location,
    diagnostics: &mut Diagnostics,
) -> Option<u64> {
    let value = required(object, "id", &location, diagnostics)?;
    if let Some(id) = value.as_u64() {
        return Some(id);
    }

    let message = match value.as_i64() {
        Some(_) => NEGATIVE_ID.to_string(),
        None => kind_message("integer"),
    };
    diagnostics.push(message, location.key("id"));
    None
}
