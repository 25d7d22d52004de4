#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # protoc-codegen
//!
//! Language descriptors, message templates, and the generator that writes one
//! set of files per message per selected language.
//!
//! ## Example Usage
//!
//! ```rust
//! use protoc_codegen::{Generator, LanguageRegistry};
//! use protoc_schema::SchemaLoader;
//!
//! let document = SchemaLoader::new()
//!     .load_from_json(r#"{"messages": [
//!         {"name": "Ping", "id": 0, "fields": [{"name": "seq", "id": 1, "type": "uint32"}]}
//!     ]}"#)
//!     .unwrap();
//! let schema = protoc_validation::resolve(&document).unwrap();
//!
//! let languages = LanguageRegistry::builtin().select(&["C"]).unwrap();
//! let generator = Generator::new(languages);
//! let files = generator.render_message(&schema.messages[0], &generator.languages()[0]).unwrap();
//! assert!(files.iter().any(|file| file.contents.contains("uint32_t seq;")));
//! ```

pub mod config;
pub mod generator;
pub mod language;
pub mod templates;

// Re-export main types
pub use config::LanguageRegistry;
pub use generator::{GeneratedFile, Generator};
pub use language::{Case, Language, builtin_languages, camel_to_snake};
pub use templates::{Member, MessageTemplate, RenderContext, TemplateSet, TemplateSlot};

use protoc_schema::DataType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum Error {
    #[error("{data_type} is not defined for {language} language.")]
    MissingTypeMapping { data_type: DataType, language: String },

    #[error("Template {template} is not available for {language} language.")]
    MissingTemplate { template: String, language: String },

    #[error(
        "Fields {} of message {message} all become member \"{member}\" in {language} language.",
        quoted_list(.fields)
    )]
    MemberCollision {
        language: String,
        message: String,
        member: String,
        fields: Vec<String>,
    },

    #[error(
        "Messages {} all declare \"{symbol}\" in {language} language.",
        quoted_list(.messages)
    )]
    SymbolCollision {
        language: String,
        symbol: String,
        messages: Vec<String>,
    },

    #[error("Unknown language: {name} (supported: {supported})")]
    UnknownLanguage { name: String, supported: String },

    #[error("Invalid language descriptor: {0}")]
    InvalidLanguage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// `"a", "b"`
fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
