//! API-level IR for normalized routes.
//!
//! This module defines the intermediate representation the normalizer produces:
//! - ShapeIR: a shape declaration with its fields, dependencies first
//! - BindingIR: one client binding per resolved route
//! - SkippedRoute: routes left out of the client and why

use thiserror::Error;

use crate::registry::ResolveError;
use crate::routes::HttpMethod;

/// Name of the request body parameter on bindings that carry a body.
pub const BODY_PARAM: &str = "data";

/// Names a binding body declares or calls, unusable as path parameter names.
/// `arguments` and `eval` cannot be bound in strict-mode code.
pub const BINDING_LOCALS: &[&str] = &[
    "response", "json", "fetch", "JSON", "Error", "arguments", "eval",
];

/// Complete normalized client description.
#[derive(Debug, Clone, Default)]
pub struct ApiIR {
    /// Shape declarations in emission order (every shape after its dependencies)
    pub shapes: Vec<ShapeIR>,
    /// Bindings in route order
    pub bindings: Vec<BindingIR>,
    /// Routes that produced no binding
    pub skipped: Vec<SkippedRoute>,
}

/// A shape to declare as an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeIR {
    /// Fully qualified identifier from the registry
    pub identifier: String,
    /// Client-side name (short name)
    pub name: String,
    pub fields: Vec<FieldIR>,
}

/// A shape field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIR {
    pub name: String,
    /// Declared server-side type, nullable marker stripped
    pub declared_type: String,
    /// Short name of the referenced shape when the field nests one
    pub nested_shape: Option<String>,
    pub nullable: bool,
    pub optional: bool,
}

/// A callable client binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingIR {
    /// Member name on the client object (e.g., "itemView")
    pub name: String,
    pub method: HttpMethod,
    /// Path template as declared (e.g., "/items/{itemId}/view")
    pub path: String,
    /// Parsed path template
    pub url: Vec<UrlPart>,
    /// Distinct path parameter names, in order of first appearance.
    /// Never equal to [`BODY_PARAM`] or one of [`BINDING_LOCALS`].
    pub path_params: Vec<String>,
    /// Request short name; None when the method carries no body
    pub body: Option<String>,
    /// Response short name
    pub response: String,
}

/// URL template part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPart {
    /// Static string segment
    Static(String),
    /// Path parameter placeholder (TypeScript-safe name)
    Param(String),
}

/// A route left out of the generated client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRoute {
    pub method: HttpMethod,
    pub path: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Unresolved(#[from] ResolveError),
    #[error("Binding name '{0}' is already used by another route")]
    DuplicateBinding(String),
}
