//! Type-expression rules
//!
//! A field's raw type is matched, in priority order, against the sized-string
//! syntax `string[N]`, the array syntax `<name>[N]` / `<name>[]`, and finally
//! taken as a bare type name.

use protoc_schema::ArrayLen;
use regex::Regex;
use std::sync::LazyLock;

static SIZED_STRING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^string(?:\[([^\[\]]*)\])?$").expect("sized string pattern is valid")
});

static ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\[([^\[\]]*)\]$").expect("array pattern is valid")
});

/// A syntactically parsed type expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeExpr<'a> {
    /// A bare name: a catalog primitive or a message
    Named(&'a str),
    /// `string[N]`
    SizedString(u32),
    /// `<name>[N]` or `<name>[]`
    Array { element: &'a str, len: ArrayLen },
}

/// Syntax errors in a type expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeExprError {
    /// `string`, `string[]`, `string[0]`, `string[x]`
    InvalidStringSize,
    /// `<name>[0]`, `<name>[x]`
    InvalidArrayLength,
}

impl TypeExprError {
    /// User-facing description for the offending raw expression
    pub fn describe(&self, raw: &str) -> String {
        match self {
            TypeExprError::InvalidStringSize => format!(
                "\"{raw}\" is not a valid sized string (expected string[N] with N a positive integer)."
            ),
            TypeExprError::InvalidArrayLength => format!(
                "\"{raw}\" has an invalid array length (expected a positive integer, or [] for a dynamic array)."
            ),
        }
    }
}

/// Parse a raw type expression
pub fn parse_type_expr(raw: &str) -> Result<TypeExpr<'_>, TypeExprError> {
    let raw = raw.trim();

    if let Some(captures) = SIZED_STRING_RE.captures(raw) {
        return captures
            .get(1)
            .and_then(|size| parse_positive(size.as_str()))
            .map(TypeExpr::SizedString)
            .ok_or(TypeExprError::InvalidStringSize);
    }

    if let Some(captures) = ARRAY_RE.captures(raw) {
        let (Some(element), Some(len)) = (captures.get(1), captures.get(2)) else {
            return Ok(TypeExpr::Named(raw));
        };
        let len = match len.as_str().trim() {
            "" => ArrayLen::Dynamic,
            n => ArrayLen::Fixed(parse_positive(n).ok_or(TypeExprError::InvalidArrayLength)?),
        };
        return Ok(TypeExpr::Array {
            element: element.as_str(),
            len,
        });
    }

    Ok(TypeExpr::Named(raw))
}

/// Parse a strictly positive decimal literal
fn parse_positive(literal: &str) -> Option<u32> {
    let literal = literal.trim();
    if literal.is_empty() || !literal.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    literal.parse::<u32>().ok().filter(|n| *n > 0)
}
