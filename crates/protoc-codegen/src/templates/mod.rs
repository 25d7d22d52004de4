//! Message templates
//!
//! A language renders through at most two template slots: a source template
//! and, when the descriptor declares a header extension, a header template.
//! Templates are looked up by name, `<family>/message.<ext>`, so a descriptor
//! reusing a family must also reuse that family's extensions.

pub mod c;
pub mod python;

use crate::language::Language;
use crate::{Error, Result};
use protoc_schema::{Field, Message};
use std::collections::HashMap;
use std::fmt;

/// Which output file a template produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateSlot {
    Source,
    Header,
}

impl fmt::Display for TemplateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSlot::Source => f.write_str("source"),
            TemplateSlot::Header => f.write_str("header"),
        }
    }
}

/// Data bound while rendering one message for one language
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub message: &'a Message,
    pub language: &'a Language,
}

impl<'a> RenderContext<'a> {
    pub fn new(message: &'a Message, language: &'a Language) -> Self {
        Self { message, language }
    }
}

/// A member declared in the rendered output, with the field it comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member<'a> {
    pub name: String,
    pub field: &'a Field,
}

/// A template turning a message into the text of one output file.
///
/// Rendering must not depend on anything but the context, so the same schema
/// always renders to the same bytes.
pub trait MessageTemplate: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<String>;

    /// Members the rendered message declares, one entry per declaration
    fn members<'a>(&self, ctx: &RenderContext<'a>) -> Vec<Member<'a>> {
        ctx.message
            .fields
            .iter()
            .map(|field| Member {
                name: ctx.language.proper_case(&field.name),
                field,
            })
            .collect()
    }

    /// File-scope identifiers (macros, guards, globals) the output declares;
    /// these must differ between messages
    fn symbols(&self, _ctx: &RenderContext<'_>) -> Vec<String> {
        Vec::new()
    }
}

/// `<family>/message.<ext>`
pub fn template_name(family: &str, ext: &str) -> String {
    format!("{family}/message.{ext}")
}

/// Named templates available to the generator
#[derive(Default)]
pub struct TemplateSet {
    templates: HashMap<String, Box<dyn MessageTemplate>>,
}

impl TemplateSet {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// The templates for every built-in language
    pub fn builtin() -> Self {
        let mut set = Self::new();
        set.register(template_name("C", "c"), c::CSourceTemplate);
        set.register(template_name("C", "h"), c::CHeaderTemplate);
        set.register(template_name("Python", "py"), python::PythonTemplate);
        set
    }

    pub fn register(&mut self, name: impl Into<String>, template: impl MessageTemplate + 'static) {
        self.templates.insert(name.into(), Box::new(template));
    }

    pub fn get(&self, name: &str) -> Option<&dyn MessageTemplate> {
        self.templates.get(name).map(|template| &**template)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// The source template for `language`
    pub fn source_template(&self, language: &Language) -> Result<&dyn MessageTemplate> {
        self.lookup(language, &language.src_ext)
    }

    /// The header template for `language`, or `None` if it has no headers
    pub fn header_template(&self, language: &Language) -> Result<Option<&dyn MessageTemplate>> {
        language
            .header_ext
            .as_deref()
            .map(|ext| self.lookup(language, ext))
            .transpose()
    }

    /// The template for one slot of `language`
    pub fn slot(&self, language: &Language, slot: TemplateSlot) -> Result<Option<&dyn MessageTemplate>> {
        match slot {
            TemplateSlot::Source => self.source_template(language).map(Some),
            TemplateSlot::Header => self.header_template(language),
        }
    }

    fn lookup(&self, language: &Language, ext: &str) -> Result<&dyn MessageTemplate> {
        let name = template_name(language.template_family(), ext);
        self.get(&name).ok_or_else(|| Error::MissingTemplate {
            template: name,
            language: language.name.clone(),
        })
    }
}

impl fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.templates.keys().collect();
        names.sort();
        f.debug_struct("TemplateSet").field("templates", &names).finish()
    }
}
