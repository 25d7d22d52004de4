//! Language configuration
//!
//! The registry starts from the built-in descriptors. A descriptor file
//! (YAML or JSON, `languages: [...]`) can add languages or replace a built-in
//! one of the same name.

use crate::language::{Language, builtin_languages, supported_languages_string};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Serializable descriptor file format
#[derive(Debug, Deserialize)]
struct LanguageFile {
    #[serde(default)]
    languages: Vec<Language>,
}

/// The set of languages available for generation
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    /// A registry holding only the built-in languages
    pub fn builtin() -> Self {
        Self {
            languages: builtin_languages(),
        }
    }

    /// An empty registry
    pub fn empty() -> Self {
        Self {
            languages: Vec::new(),
        }
    }

    /// Register a descriptor, replacing any language with the same name
    /// (compared case-insensitively)
    pub fn register(&mut self, language: Language) -> Result<()> {
        language.validate()?;

        match self
            .languages
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&language.name))
        {
            Some(existing) => {
                debug!("Overriding language descriptor: {}", language.name);
                *existing = language;
            }
            None => {
                debug!("Registering language descriptor: {}", language.name);
                self.languages.push(language);
            }
        }
        Ok(())
    }

    /// Load descriptors from a file; `.yaml`/`.yml` files are read as YAML,
    /// everything else as JSON
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

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

    /// Load descriptors from a YAML string
    pub fn load_from_yaml(&mut self, yaml: &str) -> Result<()> {
        let file: LanguageFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("YAML parse error: {}", e)))?;
        self.register_all(file)
    }

    /// Load descriptors from a JSON string
    pub fn load_from_json(&mut self, json: &str) -> Result<()> {
        let file: LanguageFile = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("JSON parse error: {}", e)))?;
        self.register_all(file)
    }

    fn register_all(&mut self, file: LanguageFile) -> Result<()> {
        let count = file.languages.len();
        for language in file.languages {
            self.register(language)?;
        }
        info!("Loaded {} language descriptors", count);
        Ok(())
    }

    /// Look up a language by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&Language> {
        self.languages
            .iter()
            .find(|lang| lang.name.eq_ignore_ascii_case(name))
    }

    /// Resolve requested language names; an empty request selects every
    /// registered language. Duplicate requests are collapsed.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Language>> {
        if names.is_empty() {
            return Ok(self.languages.clone());
        }

        let mut selected: Vec<Language> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let language = self.get(name).ok_or_else(|| Error::UnknownLanguage {
                name: name.to_string(),
                supported: self.supported_string(),
            })?;
            if !selected.iter().any(|s| s.name == language.name) {
                selected.push(language.clone());
            }
        }
        Ok(selected)
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Comma-separated names of every registered language
    pub fn supported_string(&self) -> String {
        supported_languages_string(&self.languages)
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Case;
    use protoc_schema::DataType;

    #[test]
    fn test_select_defaults_to_all() {
        let registry = LanguageRegistry::builtin();
        let all = registry.select::<&str>(&[]).unwrap();
        assert_eq!(
            all.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
            ["C", "Python"]
        );
    }

    #[test]
    fn test_select_is_case_insensitive_and_deduplicated() {
        let registry = LanguageRegistry::builtin();
        let selected = registry.select(&["python", "c", "PYTHON"]).unwrap();
        assert_eq!(
            selected.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
            ["Python", "C"]
        );
    }

    #[test]
    fn test_select_unknown_language() {
        let registry = LanguageRegistry::builtin();
        let err = registry.select(&["Cobol"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown language: Cobol (supported: C, Python)"
        );
    }

    #[test]
    fn test_register_overrides_by_name() {
        let mut registry = LanguageRegistry::builtin();
        let mut renamed = crate::language::c().with_mapping([(DataType::String, "char*")]);
        renamed.name = "c".to_string();
        registry.register(renamed).unwrap();

        assert_eq!(registry.languages().len(), 2);
        let c = registry.get("C").unwrap();
        assert_eq!(c.types_mapping.get(&DataType::String).map(String::as_str), Some("char*"));
    }

    #[test]
    fn test_register_rejects_invalid_descriptor() {
        let mut registry = LanguageRegistry::empty();
        let result = registry.register(Language::new("bad name", Case::Snake, "x"));
        assert!(matches!(result, Err(Error::InvalidLanguage(_))));
        assert!(registry.languages().is_empty());
    }

    #[test]
    fn test_load_from_yaml() {
        let mut registry = LanguageRegistry::builtin();
        registry
            .load_from_yaml(
                r#"
languages:
  - name: Firmware
    src_ext: c
    header_ext: h
    templates: C
    types_mapping:
      uint8: u8
"#,
            )
            .unwrap();

        let firmware = registry.get("firmware").unwrap();
        assert_eq!(firmware.case, Case::Snake);
        assert_eq!(firmware.template_family(), "C");
        assert_eq!(registry.supported_string(), "C, Python, Firmware");
    }

    #[test]
    fn test_load_from_json_invalid() {
        let mut registry = LanguageRegistry::builtin();
        let result = registry.load_from_json(r#"{"languages": [{"name": "X"}]}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("languages.json");
        std::fs::write(
            &path,
            r#"{"languages": [{"name": "Script", "src_ext": "py", "templates": "Python"}]}"#,
        )
        .unwrap();

        let mut registry = LanguageRegistry::empty();
        registry.load_from_file(&path).unwrap();
        assert_eq!(registry.supported_string(), "Script");

        let missing = registry.load_from_file(&dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(Error::Io { .. })));
    }
}
