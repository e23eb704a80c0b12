//! Intermediate Representation for route table to TypeScript client generation.
//!
//! This module defines a three-layer architecture:
//! 1. API-level IR: resolved shapes and bindings (registry-agnostic)
//! 2. TypeScript AST IR: interfaces, client methods, statements, expressions
//! 3. Emission: AST to TypeScript code strings via the `Emit` trait
//!
//! ## Module Structure
//!
//! - `api`: API-level IR (ApiIR, ShapeIR, BindingIR, SkippedRoute)
//! - `normalize`: route table + contract registry -> API IR
//! - `codegen`: API IR -> TypeScript AST
//! - `emit`: TypeScript AST -> code strings (via Emit trait)
//! - `types`: TypeScript AST IR
//! - `utils`: Common utilities shared across modules

mod api;
mod codegen;
mod emit;
mod normalize;
mod types;
pub mod utils;

// Re-export the main entry points
pub use api::{ApiIR, BindingIR, FieldIR, ShapeIR, SkipReason, SkippedRoute, UrlPart};
pub use codegen::{CLIENT_NAME, codegen_module};
pub use emit::Emit;
pub use normalize::{ContractOptions, binding_name, normalize_routes, url_parts};
pub use types::TsModule;
