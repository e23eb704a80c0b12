//! TypeScript client emitter for route tables.
//!
//! This module is a thin wrapper around the IR-based code generation.
//! The pipeline is:
//! 1. Load: routes.json -> RouteTable, contracts.json -> ContractRegistry
//! 2. Normalize: RouteTable + ContractRegistry -> ApiIR (all resolution done here)
//! 3. Codegen: ApiIR -> TsModule (TypeScript AST)
//! 4. Emit: TsModule -> String (via Emit trait)

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::ir::{ContractOptions, Emit, SkippedRoute, codegen_module, normalize_routes};
use crate::registry::ContractRegistry;
use crate::routes::RouteTable;

/// Errors raised while writing the generated client.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Routes in the table
    pub routes: usize,
    /// Bindings emitted on the client object
    pub bindings: usize,
    /// Interfaces emitted
    pub shapes: usize,
    pub skipped: Vec<SkippedRoute>,
}

/// Generated module text plus what went into it.
#[derive(Debug, Clone)]
pub struct GeneratedClient {
    pub code: String,
    pub report: GenerationReport,
}

/// Generate the TypeScript client module for a route table.
///
/// Output depends only on the inputs: the same table and registry always
/// produce byte-identical text.
pub fn generate(
    routes: &RouteTable,
    registry: &ContractRegistry,
    options: &ContractOptions,
) -> GeneratedClient {
    let api_ir = normalize_routes(routes, registry, options);

    let report = GenerationReport {
        routes: routes.len(),
        bindings: api_ir.bindings.len(),
        shapes: api_ir.shapes.len(),
        skipped: api_ir.skipped.clone(),
    };
    info!(
        routes = report.routes,
        bindings = report.bindings,
        interfaces = report.shapes,
        skipped = report.skipped.len(),
        "Generated TypeScript client."
    );

    GeneratedClient {
        code: codegen_module(&api_ir).emit(),
        report,
    }
}

/// Write generated code to `path`, creating parent directories as needed.
pub fn write_client(path: &Path, code: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!(path = %parent.display(), "Creating output directory.");
            fs::create_dir_all(parent).map_err(|source| GenerateError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, code).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}
