#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # protoc-schema
//!
//! Type catalog, schema model, document loader, and diagnostics for beta-protoc.
//!
//! A compilation run starts here: [`SchemaLoader`] reads a JSON or YAML
//! document into a [`SchemaDocument`], recording every structural problem it
//! finds as a located [`Diagnostic`]. Type resolution and cross-message checks
//! happen afterwards in `protoc-validation`, which produces the resolved
//! [`Schema`] consumed by the code generators.

/// Closed set of primitive scalar types.
pub mod catalog;
/// Located diagnostics and human-readable path rendering.
pub mod diagnostic;
/// Structurally parsed, not yet resolved, message declarations.
pub mod document;
/// JSON/YAML loading into a [`SchemaDocument`].
pub mod loader;
/// Resolved schema model handed to the generators.
pub mod model;

pub use catalog::DataType;
pub use diagnostic::{Diagnostic, Diagnostics, Location, PathSegment, render_path};
pub use document::{FieldDecl, MessageDecl, SchemaDocument};
pub use loader::SchemaLoader;
pub use model::{ArrayLen, BaseType, Field, FieldType, Message, Schema, is_valid_identifier};

use thiserror::Error;

/// Errors that can occur when loading a schema document
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema file not found: {0}")]
    NotFound(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
