//! Route handler scaffolding.
//!
//! Turns a kebab-case route name into a handler class name and writes a stub
//! implementing the marker contract:
//! `user-login` -> `<routes-dir>/UserLoginRoute.php`.

use std::fs;
use std::path::{Path, PathBuf};

use tera::Context;
use thiserror::Error;
use tracing::debug;

use crate::client::ir::utils::{capitalize_first, short_name};

const HANDLER_TEMPLATE: &str = include_str!("../templates/route_handler.php.jinja2");
const CLASS_SUFFIX: &str = "Route";
const HANDLER_EXTENSION: &str = "php";

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Invalid route name '{0}': use kebab-case letters and digits, e.g. user-login")]
    InvalidName(String),
    #[error("Route file already exists: {}", .0.display())]
    Exists(PathBuf),
    #[error("Failed to create routes directory {}: {source}", .path.display())]
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
    #[error("Failed to render handler template: {0}")]
    Render(#[from] tera::Error),
}

/// What a scaffold run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldedRoute {
    pub class_name: String,
    pub path: PathBuf,
    /// The routes directory did not exist and was created
    pub created_dir: bool,
}

/// Settings for the generated handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerTemplate<'a> {
    pub namespace: &'a str,
    pub marker_contract: &'a str,
}

/// Convert a kebab-case route name to its handler class name.
///
/// Each `-`-separated word gets its first letter upper-cased and `Route` is
/// appended. The result must be a valid class identifier.
pub fn handler_class_name(route_name: &str) -> Result<String, ScaffoldError> {
    let stem: String = route_name.split('-').map(capitalize_first).collect();

    let valid = stem
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(ScaffoldError::InvalidName(route_name.to_string()));
    }

    Ok(format!("{stem}{CLASS_SUFFIX}"))
}

/// Render the handler stub for `class_name`.
pub fn render_handler(
    class_name: &str,
    template: HandlerTemplate<'_>,
) -> Result<String, ScaffoldError> {
    let mut context = Context::new();
    context.insert("class_name", class_name);
    context.insert("handler_namespace", template.namespace);
    context.insert("marker_contract", template.marker_contract);
    context.insert("marker_short", short_name(template.marker_contract));
    tera::Tera::one_off(HANDLER_TEMPLATE, &context, false).map_err(ScaffoldError::from)
}

/// Write a handler stub for `route_name` into `routes_dir`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn scaffold_route(
    routes_dir: &Path,
    route_name: &str,
    template: HandlerTemplate<'_>,
    force: bool,
) -> Result<ScaffoldedRoute, ScaffoldError> {
    let class_name = handler_class_name(route_name)?;
    let path = routes_dir.join(format!("{class_name}.{HANDLER_EXTENSION}"));

    let created_dir = !routes_dir.is_dir();
    if created_dir {
        fs::create_dir_all(routes_dir).map_err(|source| ScaffoldError::CreateDir {
            path: routes_dir.to_path_buf(),
            source,
        })?;
    }

    if path.exists() && !force {
        return Err(ScaffoldError::Exists(path));
    }

    let rendered = render_handler(&class_name, template)?;
    fs::write(&path, rendered).map_err(|source| ScaffoldError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(class = %class_name, path = %path.display(), "Wrote route handler.");

    Ok(ScaffoldedRoute {
        class_name,
        path,
        created_dir,
    })
}
