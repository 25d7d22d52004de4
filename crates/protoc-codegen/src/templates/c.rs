//! C templates: one header with the struct definition, one source with the
//! field id table

use super::{Member, MessageTemplate, RenderContext};
use crate::Result;
use crate::language::Language;
use protoc_schema::{ArrayLen, Field, FieldType, Message};
use std::fmt::Write as _;

const GENERATED_BANNER: &str = "// Generated by beta-protoc. Do not edit.";

/// `SensorData.h`
#[derive(Debug, Clone, Copy, Default)]
pub struct CHeaderTemplate;

/// `SensorData.c`
#[derive(Debug, Clone, Copy, Default)]
pub struct CSourceTemplate;

/// `SENSOR_DATA`
fn macro_prefix(message: &Message, language: &Language) -> String {
    language.proper_case(&message.name).to_uppercase()
}

/// `SENSOR_DATA_MSG_H`
fn include_guard(message: &Message, language: &Language) -> String {
    format!("{}_MSG_H", macro_prefix(message, language))
}

/// `sensor_data_field_ids`
fn field_id_table(message: &Message, language: &Language) -> String {
    format!("{}_field_ids", language.proper_case(&message.name))
}

/// `<name>_count`, the length member of a dynamic array
fn count_member(name: &str) -> String {
    format!("{name}_count")
}

fn header_ext(language: &Language) -> &str {
    language.header_ext.as_deref().unwrap_or("h")
}

/// Member declaration lines for one field
fn member_lines(field: &Field, language: &Language) -> Result<Vec<String>> {
    let name = language.proper_case(&field.name);
    let native = language.convert_type(field.base_type())?;

    let lines = match &field.ty {
        FieldType::Primitive(_) | FieldType::Message(_) => vec![format!("{native} {name};")],
        FieldType::SizedString(size) => vec![format!("{native} {name}[{size}];")],
        FieldType::Array {
            len: ArrayLen::Fixed(n),
            ..
        } => vec![format!("{native} {name}[{n}];")],
        FieldType::Array {
            len: ArrayLen::Dynamic,
            ..
        } => vec![
            format!("{native} *{name};"),
            format!("size_t {}; // Number of elements in the array", count_member(&name)),
        ],
    };
    Ok(lines)
}

impl MessageTemplate for CHeaderTemplate {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let message = ctx.message;
        let language = ctx.language;
        let guard = include_guard(message, language);
        let prefix = macro_prefix(message, language);
        let ext = header_ext(language);

        let mut out = String::new();
        writeln!(out, "{GENERATED_BANNER}")?;
        writeln!(out, "#ifndef {guard}")?;
        writeln!(out, "#define {guard}")?;
        writeln!(out)?;
        writeln!(out, "#include <stdint.h>")?;
        writeln!(out, "#include <stdbool.h>")?;
        writeln!(out, "#include <stddef.h>")?;
        writeln!(out)?;

        if !message.dependencies.is_empty() {
            writeln!(out, "// Include dependencies for nested messages")?;
            for dependency in &message.dependencies {
                writeln!(out, "#include \"{dependency}.{ext}\"")?;
            }
            writeln!(out)?;
        }

        writeln!(out, "#ifdef __cplusplus")?;
        writeln!(out, "extern \"C\" {{")?;
        writeln!(out, "#endif")?;
        writeln!(out)?;
        writeln!(out, "#define {prefix}_MESSAGE_ID {}", message.id)?;
        writeln!(out, "#define {prefix}_FIELD_COUNT {}", message.fields.len())?;
        writeln!(out)?;

        writeln!(out, "// Message-specific struct definition")?;
        writeln!(out, "typedef struct {{")?;
        if message.fields.is_empty() {
            writeln!(out, "    uint8_t _reserved; // C does not allow empty structs")?;
        }
        for field in &message.fields {
            writeln!(out, "    // Field: {} (ID: {})", field.name, field.id)?;
            for line in member_lines(field, language)? {
                writeln!(out, "    {line}")?;
            }
        }
        writeln!(out, "}} {};", message.name)?;

        if !message.fields.is_empty() {
            writeln!(out)?;
            writeln!(
                out,
                "extern const uint32_t {}[{prefix}_FIELD_COUNT];",
                field_id_table(message, language)
            )?;
        }

        writeln!(out)?;
        writeln!(out, "#ifdef __cplusplus")?;
        writeln!(out, "}}")?;
        writeln!(out, "#endif")?;
        writeln!(out)?;
        writeln!(out, "#endif // {guard}")?;
        Ok(out)
    }

    fn members<'a>(&self, ctx: &RenderContext<'a>) -> Vec<Member<'a>> {
        let mut members = Vec::with_capacity(ctx.message.fields.len());
        for field in &ctx.message.fields {
            let name = ctx.language.proper_case(&field.name);
            let count = field.is_dynamic_array().then(|| count_member(&name));
            members.push(Member { name, field });
            if let Some(name) = count {
                members.push(Member { name, field });
            }
        }
        members
    }

    fn symbols(&self, ctx: &RenderContext<'_>) -> Vec<String> {
        let prefix = macro_prefix(ctx.message, ctx.language);
        vec![
            include_guard(ctx.message, ctx.language),
            format!("{prefix}_MESSAGE_ID"),
            format!("{prefix}_FIELD_COUNT"),
            field_id_table(ctx.message, ctx.language),
        ]
    }
}

impl MessageTemplate for CSourceTemplate {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let message = ctx.message;
        let language = ctx.language;

        let mut out = String::new();
        writeln!(out, "{GENERATED_BANNER}")?;
        writeln!(out, "#include \"{}.{}\"", message.name, header_ext(language))?;

        if !message.fields.is_empty() {
            let ids = message
                .fields
                .iter()
                .map(|f| f.id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out)?;
            writeln!(
                out,
                "const uint32_t {}[{}_FIELD_COUNT] = {{{ids}}};",
                field_id_table(message, language),
                macro_prefix(message, language)
            )?;
        }
        Ok(out)
    }
}
