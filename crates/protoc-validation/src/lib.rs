#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # protoc-validation
//!
//! Type resolution, structural validation, and dependency resolution for
//! beta-protoc schemas.
//!
//! Validation is exhaustive: every problem in the document is collected into
//! one diagnostic batch instead of stopping at the first error.
//!
//! ## Example Usage
//!
//! ```rust
//! use protoc_schema::SchemaLoader;
//! use protoc_validation::ValidationEngine;
//!
//! let document = SchemaLoader::new()
//!     .load_from_json(r#"{"messages": [
//!         {"name": "Ping", "id": 0, "fields": [{"name": "seq", "id": 1, "type": "uint32"}]}
//!     ]}"#)
//!     .unwrap();
//!
//! let schema = ValidationEngine::new().resolve(&document).unwrap();
//! assert_eq!(schema.messages[0].name, "Ping");
//! ```

pub mod dependencies;
pub mod engine;
pub mod reporter;
pub mod rules;

// Re-export main types
pub use dependencies::{resolve_dependencies, resolve_message_dependencies};
pub use engine::{ValidationConfig, ValidationEngine, ValidationResult};
pub use reporter::ValidationReporter;
pub use rules::{TypeExpr, TypeExprError, parse_type_expr};

use protoc_schema::{Diagnostics, Schema, SchemaDocument};
use thiserror::Error;

/// Errors that can occur during validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema validation failed with {} error(s)", .0.len())]
    Invalid(Diagnostics),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to resolve a document with default settings
pub fn resolve(document: &SchemaDocument) -> Result<Schema> {
    ValidationEngine::new().resolve(document)
}
