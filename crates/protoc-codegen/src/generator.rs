//! Per-language file generation
//!
//! For every selected language the generator writes
//! `<out>/<language>/<message>.<src-ext>` and, when the language has headers,
//! `<out>/<language>/<message>.<header-ext>`. Writes are not transactional:
//! a failure aborts the run but leaves files already written in place.
//!
//! Names are checked before anything is written for a language: members a
//! template declares must be unique within a message after case conversion,
//! and file names and file-scope symbols must be unique across messages.

use crate::language::Language;
use crate::templates::{MessageTemplate, RenderContext, TemplateSet};
use crate::{Error, Result};
use protoc_schema::{Message, Schema};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// One rendered output file, relative to its language directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub contents: String,
}

/// Renders a resolved schema for a fixed list of languages
#[derive(Debug)]
pub struct Generator {
    templates: TemplateSet,
    languages: Vec<Language>,
}

impl Generator {
    /// Create a generator using the built-in templates
    pub fn new(languages: Vec<Language>) -> Self {
        Self::with_templates(TemplateSet::builtin(), languages)
    }

    pub fn with_templates(templates: TemplateSet, languages: Vec<Language>) -> Self {
        Self {
            templates,
            languages,
        }
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Output directory of one language
    pub fn language_dir(out_dir: &Path, language: &Language) -> PathBuf {
        out_dir.join(&language.name)
    }

    /// Remove the output directory of every selected language.
    ///
    /// Directories of languages that are not selected are left alone.
    pub fn clean_outputs(&self, out_dir: &Path) -> Result<()> {
        for language in &self.languages {
            let dir = Self::language_dir(out_dir, language);
            if dir.exists() {
                warn!("Removing existing output directory {}", dir.display());
                fs::remove_dir_all(&dir).map_err(|source| Error::Io {
                    path: dir.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Generate every message for every language, returning the written
    /// paths in write order
    pub fn generate(&self, schema: &Schema, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for language in &self.languages {
            written.extend(self.generate_language(schema, language, out_dir)?);
        }
        info!(
            "Generated {} files for {} language(s)",
            written.len(),
            self.languages.len()
        );
        Ok(written)
    }

    /// Generate every message for one language
    pub fn generate_language(
        &self,
        schema: &Schema,
        language: &Language,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let source = self.templates.source_template(language)?;
        let header = self.templates.header_template(language)?;

        let mut templates = vec![source];
        templates.extend(header);
        check_names(schema, language, &templates)?;

        let dir = Self::language_dir(out_dir, language);
        fs::create_dir_all(&dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;
        info!("Generating {} code in {}", language.name, dir.display());

        let mut written = Vec::new();
        for message in &schema.messages {
            debug!("Rendering {} for {}", message.name, language.name);
            let ctx = RenderContext::new(message, language);

            let path = dir.join(language.source_file_name(&message.name));
            write_file(&path, &source.render(&ctx)?)?;
            written.push(path);

            if let (Some(template), Some(file_name)) =
                (header, language.header_file_name(&message.name))
            {
                let path = dir.join(file_name);
                write_file(&path, &template.render(&ctx)?)?;
                written.push(path);
            }
        }
        Ok(written)
    }

    /// Render one message for one language without touching the filesystem
    pub fn render_message(&self, message: &Message, language: &Language) -> Result<Vec<GeneratedFile>> {
        let ctx = RenderContext::new(message, language);
        let source = self.templates.source_template(language)?;
        check_members(source, &ctx)?;
        let mut files = vec![GeneratedFile {
            file_name: language.source_file_name(&message.name),
            contents: source.render(&ctx)?,
        }];

        if let (Some(template), Some(file_name)) = (
            self.templates.header_template(language)?,
            language.header_file_name(&message.name),
        ) {
            check_members(template, &ctx)?;
            files.push(GeneratedFile {
                file_name,
                contents: template.render(&ctx)?,
            });
        }
        Ok(files)
    }
}

/// First name claimed by more than one distinct owner, with its owners in
/// first-seen order
fn first_collision<'a, I>(entries: I) -> Option<(String, Vec<String>)>
where
    I: IntoIterator<Item = (String, &'a str)>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&'a str>)> = Vec::new();

    for (name, owner) in entries {
        match positions.get(&name) {
            Some(&position) => {
                let owners = &mut groups[position].1;
                if !owners.contains(&owner) {
                    owners.push(owner);
                }
            }
            None => {
                positions.insert(name.clone(), groups.len());
                groups.push((name, vec![owner]));
            }
        }
    }

    groups
        .into_iter()
        .find(|(_, owners)| owners.len() > 1)
        .map(|(name, owners)| (name, owners.into_iter().map(str::to_string).collect()))
}

/// Fail if two fields of one message render to the same member
fn check_members(template: &dyn MessageTemplate, ctx: &RenderContext<'_>) -> Result<()> {
    let members = template
        .members(ctx)
        .into_iter()
        .map(|member| (member.name, member.field.name.as_str()));

    match first_collision(members) {
        Some((member, fields)) => Err(Error::MemberCollision {
            language: ctx.language.name.clone(),
            message: ctx.message.name.clone(),
            member,
            fields,
        }),
        None => Ok(()),
    }
}

/// Fail on any member collision, or on two messages sharing an output file
/// name (compared case-insensitively) or a file-scope symbol
fn check_names(schema: &Schema, language: &Language, templates: &[&dyn MessageTemplate]) -> Result<()> {
    let mut symbols: Vec<(String, &str)> = Vec::new();

    for message in &schema.messages {
        let ctx = RenderContext::new(message, language);
        let owner = message.name.as_str();

        symbols.push((language.source_file_name(owner).to_lowercase(), owner));
        if let Some(header) = language.header_file_name(owner) {
            symbols.push((header.to_lowercase(), owner));
        }

        for template in templates {
            check_members(*template, &ctx)?;
            symbols.extend(template.symbols(&ctx).into_iter().map(|symbol| (symbol, owner)));
        }
    }

    match first_collision(symbols) {
        Some((symbol, messages)) => Err(Error::SymbolCollision {
            language: language.name.clone(),
            symbol,
            messages,
        }),
        None => Ok(()),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    trace!("Writing {}", path.display());
    fs::write(path, contents).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
