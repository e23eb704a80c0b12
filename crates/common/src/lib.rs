//! Shared project configuration for routegen
//!
//! This crate reads the optional `routegen.toml` at a project root and
//! resolves the locations of the route table, the contract registry and the
//! generated client. Both the generator core and the CLI depend on it.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Config filename looked up at the project root.
pub const CONFIG_FILENAME: &str = "routegen.toml";

const CONFIG_TABLE: &str = "routegen";

const DEFAULT_ROUTES_PATH: &str = "src/config/routes.json";
const DEFAULT_CONTRACTS_PATH: &str = "src/config/contracts.json";
const DEFAULT_OUTPUT_PATH: &str = "client/api.ts";
const DEFAULT_MARKER_CONTRACT: &str = "Framework\\IRouteHandler";
const DEFAULT_ENTRY_METHOD: &str = "execute";
const DEFAULT_ROUTES_DIR: &str = "Routes";
const DEFAULT_HANDLER_NAMESPACE: &str = "Routes";

/// Errors raised while loading `routegen.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for {key} in routegen.toml: expected a string")]
    InvalidValue { key: String },
    #[error("Invalid [routegen] section in routegen.toml: expected a table")]
    InvalidSection,
}

/// Project settings. Every path is relative to the project root unless it is
/// already absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub routes: PathBuf,
    pub contracts: PathBuf,
    pub output: PathBuf,
    /// Generic contract every handler carries; never selected as the route contract.
    pub marker_contract: String,
    /// Contract method whose signature declares the request/response pair.
    pub entry_method: String,
    pub routes_dir: PathBuf,
    pub handler_namespace: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            routes: PathBuf::from(DEFAULT_ROUTES_PATH),
            contracts: PathBuf::from(DEFAULT_CONTRACTS_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            marker_contract: DEFAULT_MARKER_CONTRACT.to_string(),
            entry_method: DEFAULT_ENTRY_METHOD.to_string(),
            routes_dir: PathBuf::from(DEFAULT_ROUTES_DIR),
            handler_namespace: DEFAULT_HANDLER_NAMESPACE.to_string(),
        }
    }
}

impl ProjectConfig {
    /// Load `routegen.toml` from `project_root`, falling back to defaults when
    /// the file does not exist.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let path = project_root.join(CONFIG_FILENAME);
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults.");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let value: toml::Value = toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path, source })?;

        Self::from_toml(&value)
    }

    /// Build a config from an already parsed TOML document.
    pub fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let Some(section) = value.get(CONFIG_TABLE) else {
            return Ok(config);
        };
        if !section.is_table() {
            return Err(ConfigError::InvalidSection);
        }

        if let Some(routes) = get_optional_string(section, "routes")? {
            config.routes = PathBuf::from(routes);
        }
        if let Some(contracts) = get_optional_string(section, "contracts")? {
            config.contracts = PathBuf::from(contracts);
        }
        if let Some(output) = get_optional_string(section, "output")? {
            config.output = PathBuf::from(output);
        }
        if let Some(marker) = get_optional_string(section, "marker-contract")? {
            config.marker_contract = marker;
        }
        if let Some(method) = get_optional_string(section, "entry-method")? {
            config.entry_method = method;
        }
        if let Some(dir) = get_optional_string(section, "routes-dir")? {
            config.routes_dir = PathBuf::from(dir);
        }
        if let Some(namespace) = get_optional_string(section, "handler-namespace")? {
            config.handler_namespace = namespace;
        }

        Ok(config)
    }

    pub fn routes_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.routes)
    }

    pub fn contracts_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.contracts)
    }

    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.output)
    }

    pub fn routes_dir_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.routes_dir)
    }
}

/// Join `path` onto `project_root` unless it is already absolute.
pub fn resolve(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

fn get_optional_string(section: &toml::Value, key: &str) -> Result<Option<String>, ConfigError> {
    match section.get(key) {
        None => Ok(None),
        Some(val) => val
            .as_str()
            .map(|val| Some(val.to_string()))
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
            }),
    }
}
