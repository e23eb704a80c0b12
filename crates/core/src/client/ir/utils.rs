//! Common utilities for TypeScript code generation.
//!
//! This module provides shared helper functions used across normalization and codegen.

use std::collections::HashSet;
use std::sync::LazyLock;

use super::types::{TsPrimitive, TsType};

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// Map a server-side primitive type name to its TypeScript type.
///
/// Anything outside the table passes through verbatim as a type reference,
/// which lets shape names flow into the output untouched.
pub fn map_primitive(type_name: &str) -> TsType {
    match type_name {
        "int" | "integer" | "float" | "double" => TsType::Primitive(TsPrimitive::Number),
        "bool" | "boolean" => TsType::Primitive(TsPrimitive::Boolean),
        "string" => TsType::Primitive(TsPrimitive::String),
        "array" => TsType::Array(Box::new(TsType::Primitive(TsPrimitive::Any))),
        "mixed" => TsType::Primitive(TsPrimitive::Any),
        other => TsType::Ref(other.to_string()),
    }
}

/// Last segment of a namespaced identifier (`Models\User` or `models::User` -> `User`).
pub fn short_name(identifier: &str) -> &str {
    let after_backslash = identifier.rsplit('\\').next().unwrap_or(identifier);
    after_backslash
        .rsplit("::")
        .next()
        .unwrap_or(after_backslash)
}

/// Check if an identifier needs bracket notation (or quoting) for property/key access.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            .unwrap_or(false)
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in JavaScript/TypeScript string literals.
/// Escapes backslashes and double quotes.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape the static part of a template literal.
pub fn escape_template_chunk(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Quote a string if needed for use as a property key.
/// Returns the name quoted with escaped special characters if needed,
/// or the original name if it's a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Sanitize an identifier to be a valid TypeScript identifier.
/// - Replaces `-`, `.`, ` ` with separators and converts to camelCase
/// - Prepends `_` if starts with digit
/// - Escapes reserved words with `_` prefix
pub fn sanitize_ts_identifier(name: &str) -> String {
    if name.is_empty() {
        return "_empty".to_string();
    }

    // Split on separators (-, ., space) and convert to camelCase
    let parts: Vec<&str> = name.split(['-', '.', ' ']).collect();

    let mut result = String::new();
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            result.push_str(part);
        } else {
            result.push_str(&capitalize_first(part));
        }
    }

    // Drop anything that still cannot appear in an identifier
    result.retain(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if result.is_empty() {
        return "_empty".to_string();
    }

    // Prepend underscore if starts with digit
    if result
        .chars()
        .next()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
    {
        result = format!("_{result}");
    }

    // Check for reserved words (case-sensitive)
    if TS_RESERVED_WORDS.contains(result.as_str()) {
        result = format!("_{result}");
    }

    result
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lower-case the first letter of a string.
pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}
