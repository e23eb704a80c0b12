//! Route table to TypeScript client generator.
//!
//! Every resolvable route becomes an async method on an exported `api`
//! object; the request and response shapes it uses become interfaces:
//! - Shapes are declared once, after the shapes they reference
//! - GET bindings take only path parameters, others take `data` first
//! - Routes without a usable contract are skipped and reported
//! - A route whose binding name an earlier route already took is skipped
//!   and reported, since the client object cannot hold duplicate keys

mod emitter;
pub mod ir;

pub use emitter::{GenerateError, GeneratedClient, GenerationReport, generate, write_client};
pub use ir::ContractOptions;
