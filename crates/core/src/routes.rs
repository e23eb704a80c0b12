//! Route table loading.
//!
//! The route table is a JSON object mapping an HTTP method to an object that
//! maps path templates to handler identifiers:
//!
//! ```json
//! { "GET": { "/items/{itemId}/view": "Routes\\ItemViewRoute" } }
//! ```
//!
//! Key order is declaration order and is preserved when flattening.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

/// Errors that make the route table unusable. All of them are fatal.
#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("Route table not found at {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read route table {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse route table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Route table must be an object keyed by HTTP method")]
    NotAnObject,
    #[error("Unsupported HTTP method '{method}' in route table")]
    InvalidMethod { method: String },
    #[error("Routes for {method} must be an object keyed by path")]
    InvalidMethodTable { method: String },
    #[error("Handler for {method} {path} must be a string")]
    InvalidHandler { method: String, path: String },
}

/// HTTP method of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// GET requests never carry a body.
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RouteTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(RouteTableError::InvalidMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// A single entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    /// Path template with `{param}` placeholders
    pub path: String,
    /// Identifier of the handler serving this route
    pub handler: String,
}

/// Flattened route table, grouped by method then by path in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Read and flatten the route table at `path`.
    pub fn load(path: &Path) -> Result<Self, RouteTableError> {
        if !path.exists() {
            return Err(RouteTableError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|source| RouteTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&contents)?;
        debug!(
            path = %path.display(),
            routes = table.len(),
            "Loaded route table."
        );
        Ok(table)
    }

    /// Parse a route table from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, RouteTableError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let by_method = value.as_object().ok_or(RouteTableError::NotAnObject)?;

        let mut routes = Vec::new();
        for (method_name, method_routes) in by_method {
            let method: HttpMethod = method_name.parse()?;
            let method_routes =
                method_routes
                    .as_object()
                    .ok_or_else(|| RouteTableError::InvalidMethodTable {
                        method: method_name.clone(),
                    })?;

            for (path, handler) in method_routes {
                let handler = handler
                    .as_str()
                    .ok_or_else(|| RouteTableError::InvalidHandler {
                        method: method_name.clone(),
                        path: path.clone(),
                    })?;
                routes.push(Route {
                    method,
                    path: path.clone(),
                    handler: handler.to_string(),
                });
            }
        }

        Ok(Self { routes })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_preserves_declaration_order() {
        let table = RouteTable::from_json(
            r#"{
  "POST": { "/login": "Routes\\LoginRoute", "/users/{userId}/posts": "Routes\\CreatePostRoute" },
  "GET": { "/items/{itemId}/view": "Routes\\ItemViewRoute", "/about": "Routes\\AboutRoute" }
}"#,
        )
        .unwrap();

        let flat: Vec<_> = table
            .iter()
            .map(|r| (r.method, r.path.as_str(), r.handler.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                (HttpMethod::Post, "/login", "Routes\\LoginRoute"),
                (HttpMethod::Post, "/users/{userId}/posts", "Routes\\CreatePostRoute"),
                (HttpMethod::Get, "/items/{itemId}/view", "Routes\\ItemViewRoute"),
                (HttpMethod::Get, "/about", "Routes\\AboutRoute"),
            ]
        );
    }

    #[test]
    fn test_method_names_are_case_insensitive() {
        let table = RouteTable::from_json(r#"{ "get": { "/a": "A" }, "Delete": { "/b": "B" } }"#)
            .unwrap();
        let methods: Vec<_> = table.iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Delete]);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let err = RouteTable::from_json(r#"{ "FETCH": { "/a": "A" } }"#).unwrap_err();
        assert!(matches!(err, RouteTableError::InvalidMethod { ref method } if method == "FETCH"));
    }

    #[test]
    fn test_non_string_handler_is_rejected() {
        let err = RouteTable::from_json(r#"{ "GET": { "/a": 1 } }"#).unwrap_err();
        assert!(matches!(err, RouteTableError::InvalidHandler { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = RouteTable::load(Path::new("/definitely/not/here/routes.json")).unwrap_err();
        assert!(matches!(err, RouteTableError::NotFound { .. }));
        assert!(err.to_string().contains("Route table not found"));
    }

    #[test]
    fn test_has_body() {
        assert!(!HttpMethod::Get.has_body());
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Delete.has_body());
    }
}
