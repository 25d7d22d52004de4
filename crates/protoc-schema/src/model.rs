//! Resolved schema model
//!
//! A [`Schema`] is only ever built by the validation engine once a document
//! passed every check, so every field carries a fully classified
//! [`FieldType`] and every message reference names a message of the schema.

use crate::catalog::DataType;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Whether `name` is a valid message or field identifier
/// (starts with a letter or `_`, followed by letters, digits or `_`).
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Length of an array field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayLen {
    /// `<type>[N]`
    Fixed(u32),
    /// `<type>[]`
    Dynamic,
}

/// The element type underlying a field, borrowed from the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType<'a> {
    Primitive(DataType),
    Message(&'a str),
}

impl BaseType<'_> {
    pub fn is_primitive(&self) -> bool {
        matches!(self, BaseType::Primitive(_))
    }
}

impl fmt::Display for BaseType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Primitive(ty) => write!(f, "{ty}"),
            BaseType::Message(name) => f.write_str(name),
        }
    }
}

/// Classified type of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A catalog primitive, e.g. `uint8`
    Primitive(DataType),
    /// A string with an explicit positive size, e.g. `string[32]`
    SizedString(u32),
    /// An array of primitives or messages, e.g. `float32[4]` or `Sample[]`
    Array { element: Box<FieldType>, len: ArrayLen },
    /// A reference to another message of the schema
    Message(String),
}

impl FieldType {
    /// The primitive or message type the field is ultimately made of
    pub fn base(&self) -> BaseType<'_> {
        match self {
            FieldType::Primitive(ty) => BaseType::Primitive(*ty),
            FieldType::SizedString(_) => BaseType::Primitive(DataType::String),
            FieldType::Array { element, .. } => element.base(),
            FieldType::Message(name) => BaseType::Message(name),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Primitive(ty) => write!(f, "{ty}"),
            FieldType::SizedString(size) => write!(f, "string[{size}]"),
            FieldType::Array {
                element,
                len: ArrayLen::Fixed(n),
            } => write!(f, "{element}[{n}]"),
            FieldType::Array {
                element,
                len: ArrayLen::Dynamic,
            } => write!(f, "{element}[]"),
            FieldType::Message(name) => f.write_str(name),
        }
    }
}

/// A named, identified, typed member of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub id: u64,
    /// Type expression exactly as written in the document
    pub raw_type: String,
    pub ty: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, id: u64, raw_type: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            id,
            raw_type: raw_type.into(),
            ty,
        }
    }

    /// True when the field is made of a catalog primitive (including arrays
    /// of primitives and sized strings)
    pub fn is_primitive(&self) -> bool {
        self.ty.base().is_primitive()
    }

    pub fn base_type(&self) -> BaseType<'_> {
        self.ty.base()
    }

    /// Name of the referenced message, if the field is not primitive
    pub fn message_ref(&self) -> Option<&str> {
        match self.ty.base() {
            BaseType::Message(name) => Some(name),
            BaseType::Primitive(_) => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.ty, FieldType::Array { .. })
    }

    pub fn is_dynamic_array(&self) -> bool {
        matches!(
            self.ty,
            FieldType::Array {
                len: ArrayLen::Dynamic,
                ..
            }
        )
    }

    /// Element count of a fixed array
    pub fn array_len(&self) -> Option<u32> {
        match self.ty {
            FieldType::Array {
                len: ArrayLen::Fixed(n),
                ..
            } => Some(n),
            _ => None,
        }
    }

    /// Size of a sized string
    pub fn string_size(&self) -> Option<u32> {
        match self.ty {
            FieldType::SizedString(size) => Some(size),
            _ => None,
        }
    }
}

/// A named, identified record type composed of ordered fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub id: u64,
    pub fields: Vec<Field>,
    /// Other messages referenced by this one, first-seen order, no duplicates
    pub dependencies: Vec<String>,
}

impl Message {
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
            fields: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// All messages of one input document, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub messages: Vec<Message>,
}

impl Schema {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn find_message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    pub fn contains_message(&self, name: &str) -> bool {
        self.find_message(name).is_some()
    }
}
