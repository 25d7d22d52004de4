//! Language descriptors
//!
//! A [`Language`] carries everything the generator needs to know about one
//! target: its name, file extensions, identifier case convention, the native
//! spelling of every catalog primitive, and the template family used to render
//! it.

use crate::{Error, Result};
use protoc_schema::{BaseType, DataType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static LANG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+\-#]*$").expect("language name pattern is valid")
});

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*$").expect("extension pattern is valid"));

static FIRST_CAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("case pattern is valid"));

static ALL_CAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("case pattern is valid"));

/// Identifier case convention of a target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    /// `SensorData` → `sensor_data`
    #[default]
    Snake,
    /// Names are kept as declared
    Camel,
}

impl Case {
    /// Convert a canonical mixed-case identifier to this convention
    pub fn convert(&self, name: &str) -> String {
        match self {
            Case::Snake => camel_to_snake(name),
            Case::Camel => name.to_string(),
        }
    }
}

/// `SensorData` → `sensor_data`, `HTTPServer` → `http_server`
pub fn camel_to_snake(name: &str) -> String {
    let name = FIRST_CAP_RE.replace_all(name, "${1}_${2}");
    ALL_CAP_RE.replace_all(&name, "${1}_${2}").to_lowercase()
}

/// Per-target-language configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(default)]
    pub case: Case,
    pub src_ext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_ext: Option<String>,
    #[serde(default)]
    pub types_mapping: BTreeMap<DataType, String>,
    /// Template family to render with; defaults to the language name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<String>,
}

impl Language {
    /// Create a descriptor with an empty type mapping
    pub fn new(name: impl Into<String>, case: Case, src_ext: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            case,
            src_ext: src_ext.into(),
            header_ext: None,
            types_mapping: BTreeMap::new(),
            templates: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, header_ext: impl Into<String>) -> Self {
        self.header_ext = Some(header_ext.into());
        self
    }

    #[must_use]
    pub fn with_mapping<I, S>(mut self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (DataType, S)>,
        S: Into<String>,
    {
        self.types_mapping
            .extend(mapping.into_iter().map(|(ty, native)| (ty, native.into())));
        self
    }

    #[must_use]
    pub fn with_templates(mut self, family: impl Into<String>) -> Self {
        self.templates = Some(family.into());
        self
    }

    /// Check the language name and file extensions
    pub fn validate(&self) -> Result<()> {
        if !LANG_RE.is_match(&self.name) {
            return Err(Error::InvalidLanguage(format!(
                "\"{}\" is not a valid language name (can only start with a letter and cannot contain spaces)",
                self.name
            )));
        }

        for ext in std::iter::once(&self.src_ext).chain(self.header_ext.as_ref()) {
            if !EXTENSION_RE.is_match(ext) {
                return Err(Error::InvalidLanguage(format!(
                    "\"{ext}\" is not a valid extension name for {} (can only start with a letter and cannot contain spaces, upper case letters, and dots)",
                    self.name
                )));
            }
        }

        Ok(())
    }

    /// Native spelling of a field's base type.
    ///
    /// Primitives go through the type mapping and fail with
    /// [`Error::MissingTypeMapping`] when this language has no entry; message
    /// names are returned unchanged.
    pub fn convert_type(&self, ty: BaseType<'_>) -> Result<String> {
        match ty {
            BaseType::Primitive(primitive) => self
                .types_mapping
                .get(&primitive)
                .cloned()
                .ok_or_else(|| Error::MissingTypeMapping {
                    data_type: primitive,
                    language: self.name.clone(),
                }),
            BaseType::Message(name) => Ok(name.to_string()),
        }
    }

    /// Convert a canonical identifier to this language's case convention
    pub fn proper_case(&self, name: &str) -> String {
        self.case.convert(name)
    }

    /// Template family used to render this language
    pub fn template_family(&self) -> &str {
        self.templates.as_deref().unwrap_or(&self.name)
    }

    pub fn has_header(&self) -> bool {
        self.header_ext.is_some()
    }

    /// `<message>.<src-ext>`
    pub fn source_file_name(&self, message: &str) -> String {
        format!("{message}.{}", self.src_ext)
    }

    /// `<message>.<header-ext>`, when the language has headers
    pub fn header_file_name(&self, message: &str) -> Option<String> {
        self.header_ext
            .as_ref()
            .map(|ext| format!("{message}.{ext}"))
    }
}

/// The C descriptor: snake case, `.c` sources and `.h` headers
pub fn c() -> Language {
    Language::new("C", Case::Snake, "c")
        .with_header("h")
        .with_mapping([
            (DataType::Uint8, "uint8_t"),
            (DataType::Uint16, "uint16_t"),
            (DataType::Uint32, "uint32_t"),
            (DataType::Uint64, "uint64_t"),
            (DataType::Int8, "int8_t"),
            (DataType::Int16, "int16_t"),
            (DataType::Int32, "int32_t"),
            (DataType::Int64, "int64_t"),
            (DataType::Float32, "float"),
            (DataType::Float64, "double"),
            (DataType::Char, "char"),
            (DataType::String, "char"),
            (DataType::Bool, "bool"),
        ])
}

/// The Python descriptor: snake case, `.py` sources, no headers
pub fn python() -> Language {
    Language::new("Python", Case::Snake, "py").with_mapping([
        (DataType::Uint8, "int"),
        (DataType::Uint16, "int"),
        (DataType::Uint32, "int"),
        (DataType::Uint64, "int"),
        (DataType::Int8, "int"),
        (DataType::Int16, "int"),
        (DataType::Int32, "int"),
        (DataType::Int64, "int"),
        (DataType::Float32, "float"),
        (DataType::Float64, "float"),
        (DataType::Char, "str"),
        (DataType::String, "str"),
        (DataType::Bool, "bool"),
    ])
}

/// Every language supported out of the box
pub fn builtin_languages() -> Vec<Language> {
    vec![c(), python()]
}

/// `C, Python`
pub fn supported_languages_string(languages: &[Language]) -> String {
    languages
        .iter()
        .map(|lang| lang.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
