//! TypeScript IR types for code generation.
//!
//! This module defines the subset of TypeScript the client needs:
//! - TsType: Types (primitives, arrays, unions, references, generics)
//! - TsExpr: Expressions (identifiers, calls, templates, object literals)
//! - TsStmt: Statements inside a binding body
//! - TsInterface / TsMethod / TsClient / TsModule: module-level items

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, any
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Named type reference, emitted verbatim
    Ref(String),
    /// Generic instantiation: Name<A, B>
    Generic { name: String, args: Vec<TsType> },
}

impl TsType {
    /// Wrap the type in `T | null`.
    pub fn nullable(self) -> TsType {
        TsType::Union(vec![self, TsType::Primitive(TsPrimitive::Null)])
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Any,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar"
    Literal(TsLiteral),
    /// Function call: foo(a, b)
    Call {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },
    /// Object literal: { a: 1, b: 2 }
    Object(Vec<(String, TsExpr)>),
    /// Member access: foo.bar
    Member { object: Box<TsExpr>, prop: String },
    /// Template literal: `${foo}/bar`
    Template(Vec<TemplatePart>),
    /// Await expression: await fetch()
    Await(Box<TsExpr>),
    /// Logical not: !expr
    Not(Box<TsExpr>),
    /// new Error(...)
    New {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },
}

impl TsExpr {
    pub fn ident(name: &str) -> TsExpr {
        TsExpr::Ident(name.to_string())
    }

    pub fn string(value: &str) -> TsExpr {
        TsExpr::Literal(TsLiteral::String(value.to_string()))
    }

    pub fn member(object: TsExpr, prop: &str) -> TsExpr {
        TsExpr::Member {
            object: Box::new(object),
            prop: prop.to_string(),
        }
    }

    pub fn call(callee: TsExpr, args: Vec<TsExpr>) -> TsExpr {
        TsExpr::Call {
            callee: Box::new(callee),
            args,
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    pub name: String,
    pub ty: TsType,
}

/// Template literal part
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Static string part
    Static(String),
    /// Dynamic expression part: ${expr}
    Dynamic(TsExpr),
}

/// Statement in a method body
#[derive(Debug, Clone, PartialEq)]
pub enum TsStmt {
    /// const declaration
    Const { name: String, init: TsExpr },
    /// Return statement
    Return(TsExpr),
    /// If statement without else branch
    If { cond: TsExpr, then_body: Vec<TsStmt> },
    /// Throw statement
    Throw(TsExpr),
}

// =============================================================================
// Module-Level IR
// =============================================================================

/// `export interface Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct TsInterface {
    pub name: String,
    pub properties: Vec<TsProp>,
}

/// Method member of an object literal: `async name(...): T { ... },`
#[derive(Debug, Clone, PartialEq)]
pub struct TsMethod {
    pub name: String,
    pub params: Vec<TsParam>,
    pub return_type: TsType,
    pub body: Vec<TsStmt>,
    pub is_async: bool,
}

/// Exported client object aggregating every binding.
#[derive(Debug, Clone, PartialEq)]
pub struct TsClient {
    pub name: String,
    pub methods: Vec<TsMethod>,
    /// Also emit `export default <name>;`
    pub default_export: bool,
}

/// Complete TypeScript module
#[derive(Debug, Clone, PartialEq)]
pub struct TsModule {
    /// Lines of the leading doc comment
    pub header: Vec<String>,
    pub types: Vec<TsInterface>,
    pub client: TsClient,
}
