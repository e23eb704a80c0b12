//! TypeScript code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting TypeScript AST nodes
//! to string representations. Each AST type implements `Emit` for clean, composable
//! code generation.

use super::types::{
    TemplatePart, TsClient, TsExpr, TsInterface, TsLiteral, TsMethod, TsModule, TsParam,
    TsPrimitive, TsProp, TsStmt, TsType,
};
use super::utils::{escape_js_string, escape_template_chunk, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Any => "any".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
        }
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap unions in parentheses
                if matches!(**inner, TsType::Union(_)) {
                    format!("({})[]", inner_str)
                } else {
                    format!("{}[]", inner_str)
                }
            }
            TsType::Union(types) => types.iter().map(|t| t.emit()).collect::<Vec<_>>().join(" | "),
            TsType::Ref(name) => name.clone(),
            TsType::Generic { name, args } => {
                let args = args.iter().map(|t| t.emit()).collect::<Vec<_>>().join(", ");
                format!("{name}<{args}>")
            }
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

impl Emit for TsInterface {
    fn emit(&self) -> String {
        let mut output = format!("export interface {} {{\n", self.name);
        for prop in &self.properties {
            output.push_str(&format!("  {};\n", prop.emit()));
        }
        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call { callee, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{}({})", callee.emit(), args_str)
            }
            TsExpr::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = props
                        .iter()
                        .map(|(k, v)| format!("{}: {}", quote_if_needed(k), v.emit()))
                        .collect();
                    format!("{{ {} }}", parts.join(", "))
                }
            }
            TsExpr::Member { object, prop } => {
                format!("{}.{}", object.emit(), prop)
            }
            TsExpr::Template(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Static(s) => escape_template_chunk(s),
                        TemplatePart::Dynamic(e) => format!("${{{}}}", e.emit()),
                    })
                    .collect();
                format!("`{}`", content)
            }
            TsExpr::Await(expr) => {
                format!("await {}", expr.emit())
            }
            TsExpr::Not(expr) => {
                format!("!{}", expr.emit())
            }
            TsExpr::New { callee, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("new {}({})", callee.emit(), args_str)
            }
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        format!("{}: {}", self.name, self.ty.emit())
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            TsStmt::Const { name, init } => {
                format!("{}const {} = {};\n", prefix, name, init.emit())
            }
            TsStmt::Return(expr) => format!("{}return {};\n", prefix, expr.emit()),
            TsStmt::If { cond, then_body } => {
                let mut output = format!("{}if ({}) {{\n", prefix, cond.emit());
                for stmt in then_body {
                    output.push_str(&stmt.emit_indented(indent + 1));
                }
                output.push_str(&format!("{}}}\n", prefix));
                output
            }
            TsStmt::Throw(expr) => {
                format!("{}throw {};\n", prefix, expr.emit())
            }
        }
    }
}

// =============================================================================
// Client object
// =============================================================================

impl Emit for TsMethod {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsMethod {
    /// Emit as an object literal member, trailing comma included.
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let async_str = if self.is_async { "async " } else { "" };
        let params_str = self.params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");

        let mut output = format!(
            "{}{}{}({}): {} {{\n",
            prefix,
            async_str,
            self.name,
            params_str,
            self.return_type.emit()
        );
        for stmt in &self.body {
            output.push_str(&stmt.emit_indented(indent + 1));
        }
        output.push_str(&format!("{}}},\n", prefix));
        output
    }
}

impl Emit for TsClient {
    fn emit(&self) -> String {
        let mut output = if self.methods.is_empty() {
            format!("export const {} = {{}};\n", self.name)
        } else {
            let methods = self
                .methods
                .iter()
                .map(|m| m.emit_indented(1))
                .collect::<Vec<_>>()
                .join("\n");
            format!("export const {} = {{\n{}}};\n", self.name, methods)
        };

        if self.default_export {
            output.push_str(&format!("\nexport default {};\n", self.name));
        }
        output
    }
}

// =============================================================================
// Module
// =============================================================================

const BANNER_RULE: &str =
    "// ============================================================================";

fn section_banner(title: &str) -> String {
    format!("{BANNER_RULE}\n// {title}\n{BANNER_RULE}\n")
}

fn doc_comment(lines: &[String]) -> String {
    let mut output = String::from("/**\n");
    for line in lines {
        if line.is_empty() {
            output.push_str(" *\n");
        } else {
            output.push_str(&format!(" * {}\n", line));
        }
    }
    output.push_str(" */\n");
    output
}

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        if !self.header.is_empty() {
            output.push_str(&doc_comment(&self.header));
            output.push('\n');
        }

        output.push_str(&section_banner("Type Definitions"));
        output.push('\n');
        for interface in &self.types {
            output.push_str(&interface.emit());
            output.push('\n');
        }

        output.push_str(&section_banner("API Client"));
        output.push('\n');
        output.push_str(&self.client.emit());

        output
    }
}

// =============================================================================
// Tests
// =============================================================================
