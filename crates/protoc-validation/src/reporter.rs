//! Validation reporter

use protoc_schema::{Diagnostic, Diagnostics, SchemaDocument};
use std::fmt::Write as _;

/// Renders diagnostics as a plain-text listing, one line per diagnostic, each
/// annotated with a navigable path into the original document
pub struct ValidationReporter<'a> {
    document: &'a SchemaDocument,
}

impl<'a> ValidationReporter<'a> {
    /// Create a reporter resolving paths against `document`
    pub fn new(document: &'a SchemaDocument) -> Self {
        Self { document }
    }

    /// `in <path>: <message>` for one diagnostic
    pub fn line(&self, diagnostic: &Diagnostic) -> String {
        format!(
            "in {}: {}",
            self.document.render_path(&diagnostic.location),
            diagnostic.message
        )
    }

    /// Every diagnostic as a tab-indented bullet list
    pub fn render(&self, diagnostics: &Diagnostics) -> String {
        let mut out = String::new();
        for (i, diagnostic) in diagnostics.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "\t- {}", self.line(diagnostic));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc_schema::{Location, SchemaLoader};

    #[test]
    fn test_render_lines() {
        let doc = SchemaLoader::new()
            .load_from_json(
                r#"{"messages": [{"name": "Parent", "id": 1, "fields": [
                    {"name": "child", "id": 1, "type": "UnknownType"}
                ]}]}"#,
            )
            .unwrap();

        let mut diagnostics = Diagnostics::new();
        diagnostics.push("first", Location::field(0, 0).key("type"));
        diagnostics.push("second", Location::messages());

        let reporter = ValidationReporter::new(&doc);
        assert_eq!(
            reporter.render(&diagnostics),
            "\t- in /messages/Parent/fields/child/type: first\n\t- in /messages: second"
        );
    }

    #[test]
    fn test_render_empty() {
        let doc = SchemaLoader::new().load_from_json(r#"{"messages": []}"#).unwrap();
        assert_eq!(ValidationReporter::new(&doc).render(&Diagnostics::new()), "");
    }
}
