//! Contract registry: the declarative description of handlers, their
//! capability contracts and the data shapes those contracts exchange.
//!
//! The registry answers the two questions the client generator needs:
//! - which request/response shapes does a handler's contract declare
//!   ([`ContractRegistry::resolve_contract`])
//! - which fields does a shape carry ([`ContractRegistry::reflect_shape`])

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Type assumed for a constructor parameter without a declared type.
pub const UNTYPED: &str = "mixed";

/// Type names that never refer to a shape.
const BUILTIN_TYPES: &[&str] = &[
    "int", "integer", "float", "double", "bool", "boolean", "string", "array", "mixed", "void",
    "null", "object", "callable", "iterable", "self", "static", "never", "false", "true",
];

/// Errors raised while loading the registry file.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read contract registry {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse contract registry: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a handler's request/response pair could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No contract interface found")]
    NoContract,
    #[error("Could not extract types from contract")]
    NoTypes,
}

/// A handler and the contracts it implements, in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandlerDecl {
    #[serde(default)]
    pub implements: Vec<String>,
}

/// A capability contract and its methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractDecl {
    #[serde(default)]
    pub methods: HashMap<String, MethodDecl>,
}

/// Signature of a contract method.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MethodDecl {
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Declared return type (None = undeclared)
    #[serde(default)]
    pub returns: Option<String>,
}

/// A formal parameter (of a contract method or a shape constructor).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    /// Declared type; a leading `?` marks it nullable
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    #[serde(default)]
    pub nullable: bool,
    /// Parameter has a default value
    #[serde(default)]
    pub optional: bool,
}

/// A data shape. `constructor` is `None` when the shape has no primary constructor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShapeDecl {
    #[serde(default)]
    pub constructor: Option<Vec<ParamDecl>>,
}

/// Request and response shape identifiers declared by a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractTypes {
    pub contract: String,
    pub request: String,
    pub response: String,
}

/// A reflected shape field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeField {
    pub name: String,
    /// Declared type with any nullable marker stripped
    pub declared_type: String,
    pub nullable: bool,
    pub optional: bool,
    /// The declared type is itself a shape known to the registry
    pub is_nested_shape: bool,
}

/// The full registry as stored in `contracts.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractRegistry {
    #[serde(default)]
    pub handlers: HashMap<String, HandlerDecl>,
    #[serde(default)]
    pub contracts: HashMap<String, ContractDecl>,
    #[serde(default)]
    pub shapes: HashMap<String, ShapeDecl>,
}

impl ContractRegistry {
    /// Load the registry at `path`. A missing file yields an empty registry,
    /// so every route will be skipped for lack of a contract.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            warn!(
                path = %path.display(),
                "Contract registry not found, no route will resolve a contract."
            );
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn has_shape(&self, identifier: &str) -> bool {
        self.shapes.contains_key(identifier)
    }

    /// Find the request/response pair for a handler.
    ///
    /// The first contract in the handler's `implements` list that is not the
    /// marker contract is selected; its `entry_method` must take at least one
    /// parameter and both the first parameter type and the return type must
    /// be declared.
    pub fn resolve_contract(
        &self,
        handler: &str,
        marker_contract: &str,
        entry_method: &str,
    ) -> Result<ContractTypes, ResolveError> {
        let decl = self.handlers.get(handler).ok_or(ResolveError::NoContract)?;

        let mut candidates = decl
            .implements
            .iter()
            .filter(|name| name.as_str() != marker_contract);
        let contract_name = candidates.next().ok_or(ResolveError::NoContract)?;
        let others: Vec<_> = candidates.collect();
        if !others.is_empty() {
            debug!(
                handler,
                selected = %contract_name,
                ignored = ?others,
                "Handler implements several contracts, using the first one."
            );
        }

        let contract = self
            .contracts
            .get(contract_name)
            .ok_or(ResolveError::NoContract)?;
        let method = contract
            .methods
            .get(entry_method)
            .ok_or(ResolveError::NoTypes)?;
        let first = method.params.first().ok_or(ResolveError::NoTypes)?;

        let request = first
            .ty
            .as_deref()
            .map(|ty| parse_declared_type(ty).0)
            .filter(|ty| !ty.is_empty())
            .ok_or(ResolveError::NoTypes)?;
        let response = method
            .returns
            .as_deref()
            .map(|ty| parse_declared_type(ty).0)
            .filter(|ty| !ty.is_empty())
            .ok_or(ResolveError::NoTypes)?;

        Ok(ContractTypes {
            contract: contract_name.clone(),
            request: request.to_string(),
            response: response.to_string(),
        })
    }

    /// Constructor fields of a shape, in declaration order.
    ///
    /// Unknown shapes and shapes without a constructor yield no fields.
    pub fn reflect_shape(&self, identifier: &str) -> Vec<ShapeField> {
        let Some(params) = self
            .shapes
            .get(identifier)
            .and_then(|shape| shape.constructor.as_ref())
        else {
            return Vec::new();
        };

        params
            .iter()
            .map(|param| {
                let (declared_type, marked_nullable) =
                    parse_declared_type(param.ty.as_deref().unwrap_or(UNTYPED));
                let is_nested_shape = !is_builtin(declared_type) && self.has_shape(declared_type);
                ShapeField {
                    name: param.name.clone(),
                    declared_type: declared_type.to_string(),
                    nullable: param.nullable || marked_nullable,
                    optional: param.optional,
                    is_nested_shape,
                }
            })
            .collect()
    }
}

/// Split a declared type into its name and whether it was marked nullable
/// with a leading `?`.
pub fn parse_declared_type(raw: &str) -> (&str, bool) {
    let raw = raw.trim();
    match raw.strip_prefix('?') {
        Some(rest) => (rest.trim(), true),
        None => (raw, false),
    }
}

pub fn is_builtin(type_name: &str) -> bool {
    BUILTIN_TYPES.contains(&type_name)
}
