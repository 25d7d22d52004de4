//! Python template: one dataclass module per message

use super::{MessageTemplate, RenderContext};
use crate::Result;
use crate::language::Language;
use protoc_schema::{ArrayLen, DataType, Field, FieldType};
use std::fmt::Write as _;

/// `SensorData.py`
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonTemplate;

/// Default value expression for a scalar of this type
fn scalar_default(ty: &FieldType, native: &str) -> String {
    match ty {
        FieldType::Primitive(DataType::Bool) => "False".to_string(),
        FieldType::Primitive(DataType::Char | DataType::String) | FieldType::SizedString(_) => {
            "\"\"".to_string()
        }
        FieldType::Primitive(primitive) if primitive.is_float() => "0.0".to_string(),
        FieldType::Primitive(_) => "0".to_string(),
        FieldType::Message(_) | FieldType::Array { .. } => format!("{native}()"),
    }
}

/// `name: annotation = default`
fn member_line(field: &Field, language: &Language) -> Result<String> {
    let name = language.proper_case(&field.name);
    let native = language.convert_type(field.base_type())?;

    let line = match &field.ty {
        FieldType::Message(_) => {
            format!("{name}: {native} = field(default_factory={native})")
        }
        FieldType::Array {
            len: ArrayLen::Dynamic,
            ..
        } => format!("{name}: List[{native}] = field(default_factory=list)"),
        FieldType::Array {
            element,
            len: ArrayLen::Fixed(n),
        } => {
            let item = scalar_default(element, &native);
            let factory = if matches!(**element, FieldType::Message(_)) {
                format!("lambda: [{item} for _ in range({n})]")
            } else {
                format!("lambda: [{item}] * {n}")
            };
            format!("{name}: List[{native}] = field(default_factory={factory})")
        }
        ty => format!("{name}: {native} = {}", scalar_default(ty, &native)),
    };
    Ok(line)
}

impl MessageTemplate for PythonTemplate {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let message = ctx.message;
        let language = ctx.language;

        let mut out = String::new();
        writeln!(out, "# Generated by beta-protoc. Do not edit.")?;
        writeln!(out, "from dataclasses import dataclass, field")?;
        writeln!(out, "from typing import ClassVar, List")?;
        for dependency in &message.dependencies {
            writeln!(out, "from .{dependency} import {dependency}")?;
        }
        writeln!(out)?;
        writeln!(out)?;

        let ids = message
            .fields
            .iter()
            .map(|f| f.id.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(out, "@dataclass")?;
        writeln!(out, "class {}:", message.name)?;
        writeln!(out, "    MESSAGE_ID: ClassVar[int] = {}", message.id)?;
        writeln!(out, "    FIELD_IDS: ClassVar[List[int]] = [{ids}]")?;

        for field in &message.fields {
            writeln!(out)?;
            writeln!(out, "    # Field: {} (ID: {})", field.name, field.id)?;
            writeln!(out, "    {}", member_line(field, language)?)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::python;
    use protoc_schema::Message;

    fn render(message: &Message) -> String {
        let lang = python();
        PythonTemplate
            .render(&RenderContext::new(message, &lang))
            .unwrap()
    }

    #[test]
    fn test_scalar_members() {
        let message = Message::new("Status", 2).with_fields(vec![
            Field::new("ok", 0, "bool", FieldType::Primitive(DataType::Bool)),
            Field::new("errorCode", 1, "int32", FieldType::Primitive(DataType::Int32)),
            Field::new("ratio", 2, "float64", FieldType::Primitive(DataType::Float64)),
            Field::new("label", 3, "string[16]", FieldType::SizedString(16)),
        ]);
        let module = render(&message);

        assert!(module.contains("class Status:\n"));
        assert!(module.contains("    MESSAGE_ID: ClassVar[int] = 2\n"));
        assert!(module.contains("    FIELD_IDS: ClassVar[List[int]] = [0, 1, 2, 3]\n"));
        assert!(module.contains("    ok: bool = False\n"));
        assert!(module.contains("    error_code: int = 0\n"));
        assert!(module.contains("    ratio: float = 0.0\n"));
        assert!(module.contains("    label: str = \"\"\n"));
    }

    #[test]
    fn test_message_and_array_members() {
        let mut message = Message::new("SensorData", 0).with_fields(vec![
            Field::new("value", 0, "Value", FieldType::Message("Value".to_string())),
            Field::new(
                "samples",
                1,
                "float32[4]",
                FieldType::Array {
                    element: Box::new(FieldType::Primitive(DataType::Float32)),
                    len: ArrayLen::Fixed(4),
                },
            ),
            Field::new(
                "readings",
                2,
                "Value[2]",
                FieldType::Array {
                    element: Box::new(FieldType::Message("Value".to_string())),
                    len: ArrayLen::Fixed(2),
                },
            ),
            Field::new(
                "history",
                3,
                "uint8[]",
                FieldType::Array {
                    element: Box::new(FieldType::Primitive(DataType::Uint8)),
                    len: ArrayLen::Dynamic,
                },
            ),
        ]);
        message.dependencies = vec!["Value".to_string()];
        let module = render(&message);

        assert!(module.contains("from .Value import Value\n"));
        assert!(module.contains("    value: Value = field(default_factory=Value)\n"));
        assert!(module.contains("    samples: List[float] = field(default_factory=lambda: [0.0] * 4)\n"));
        assert!(module.contains(
            "    readings: List[Value] = field(default_factory=lambda: [Value() for _ in range(2)])\n"
        ));
        assert!(module.contains("    history: List[int] = field(default_factory=list)\n"));
    }

    #[test]
    fn test_empty_message() {
        let module = render(&Message::new("Ping", 9));
        assert!(module.ends_with("    FIELD_IDS: ClassVar[List[int]] = []\n"));
        assert!(!module.contains("# Field:"));
    }
}
