use std::path::PathBuf;

use clap::Args;
use routegen_common::ProjectConfig;
use routegen_core::scaffold::{HandlerTemplate, scaffold_route};
use tracing::debug;

use crate::run_command;

#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Name of the route in kebab-case, e.g. user-login
    #[arg(value_name = "ROUTE_NAME")]
    pub name: String,
    /// Project root holding routegen.toml
    #[arg(long = "project-dir", value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
    /// Overwrite the handler file if it already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: RouteArgs) -> i32 {
    run_command(|| run_inner(args))
}

fn run_inner(args: RouteArgs) -> Result<(), String> {
    let root = args.project_dir.as_path();
    let config = ProjectConfig::load(root).map_err(|err| err.to_string())?;

    let template = HandlerTemplate {
        namespace: &config.handler_namespace,
        marker_contract: &config.marker_contract,
    };
    let routes_dir = config.routes_dir_path(root);
    debug!(name = %args.name, routes_dir = %routes_dir.display(), "Scaffolding route handler.");
    let scaffolded = scaffold_route(&routes_dir, &args.name, template, args.force)
        .map_err(|err| err.to_string())?;

    if scaffolded.created_dir {
        println!("Created {} directory", routes_dir.display());
    }
    println!("Created file {}", scaffolded.path.display());
    Ok(())
}
