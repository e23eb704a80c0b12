//! Code generators for contract-based route tables.
//!
//! - [`client`]: emits a typed TypeScript client from a route table and its
//!   contract registry
//! - [`scaffold`]: writes a handler stub for a new route
//!
//! [`routes`] and [`registry`] load the two declarative inputs.

pub mod client;
pub mod registry;
pub mod routes;
pub mod scaffold;

pub use client::{
    ContractOptions, GenerateError, GeneratedClient, GenerationReport, generate, write_client,
};
pub use registry::{ContractRegistry, RegistryError, ResolveError};
pub use routes::{HttpMethod, Route, RouteTable, RouteTableError};
pub use scaffold::{HandlerTemplate, ScaffoldError, ScaffoldedRoute, scaffold_route};
