//! Located diagnostics and path rendering
//!
//! Locations always point into the *original* input document (keys and array
//! indices as they appear in the file), never into the resolved model, so a
//! diagnostic stays meaningful after field types have been normalized.

use serde_json::Value;
use std::fmt;
use std::fmt::Write as _;

/// One step of a location path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl PathSegment {
    /// Build a key segment
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A path through the raw input document, e.g. `(messages, 0, fields, 1, type)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    segments: Vec<PathSegment>,
}

impl Location {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a location from raw segments
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// `(messages,)`
    pub fn messages() -> Self {
        Self::root().key("messages")
    }

    /// `(messages, i)`
    pub fn message(message: usize) -> Self {
        Self::messages().index(message)
    }

    /// `(messages, i, fields)`
    pub fn fields(message: usize) -> Self {
        Self::message(message).key("fields")
    }

    /// `(messages, i, fields, j)`
    pub fn field(message: usize, field: usize) -> Self {
        Self::fields(message).index(field)
    }

    /// Append a key segment
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{segment}")?;
        }
        if self.segments.len() == 1 {
            f.write_char(',')?;
        }
        f.write_char(')')
    }
}

/// A located, human-readable description of a structural or validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub location: Location,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// An ordered batch of diagnostics; empty means success
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic at the given location
    pub fn push(&mut self, message: impl Into<String>, location: Location) {
        self.items.push(Diagnostic::new(message, location));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Keep at most `max` diagnostics
    pub fn truncate(&mut self, max: usize) {
        self.items.truncate(max);
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(items: Vec<Diagnostic>) -> Self {
        Self { items }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

/// Render a location as a navigable path through the raw document.
///
/// Every step but the last is resolved against `document`: a step landing on
/// an object with a non-empty `name` renders as `/<name>`, an index renders as
/// `[<index>]`, any other key as `/<key>`. The last step is always rendered as
/// `/<key>`. A path that stops resolving is truncated at the last step that
/// still matched.
///
/// `(messages, 0, fields, 1, type)` over a document whose first message is
/// `SensorData` and whose second field is `value` renders as
/// `/messages/SensorData/fields/value/type`.
pub fn render_path(location: &Location, document: &Value) -> String {
    let Some((last, prefix)) = location.segments().split_last() else {
        return "/".to_string();
    };

    let mut path = String::new();
    let mut current = document;

    for segment in prefix {
        let next = match segment {
            PathSegment::Key(key) => current.get(key.as_str()),
            PathSegment::Index(index) => current.get(*index),
        };
        let Some(node) = next else {
            if path.is_empty() {
                path.push('/');
            }
            return path;
        };

        match node.get("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => {
                path.push('/');
                path.push_str(name);
            }
            _ => match segment {
                PathSegment::Index(index) => {
                    let _ = write!(path, "[{index}]");
                }
                PathSegment::Key(key) => {
                    path.push('/');
                    path.push_str(key);
                }
            },
        }
        current = node;
    }

    path.push('/');
    let _ = write!(path, "{last}");
    path
}
