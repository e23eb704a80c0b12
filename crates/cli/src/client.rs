use std::path::{Path, PathBuf};

use clap::Args;
use routegen_common::ProjectConfig;
use routegen_core::{ContractOptions, ContractRegistry, RouteTable, generate, write_client};
use tracing::debug;

use crate::run_command;

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Output file path (default: client/api.ts, or `output` in routegen.toml)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Project root holding routegen.toml and the route table
    #[arg(long = "project-dir", value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

pub fn run(args: ClientArgs) -> i32 {
    run_command(|| run_inner(args))
}

fn run_inner(args: ClientArgs) -> Result<(), String> {
    let root = args.project_dir.as_path();
    let mut config = ProjectConfig::load(root).map_err(|err| err.to_string())?;
    if let Some(output) = args.output {
        config.output = output;
    }
    debug!(root = %root.display(), ?config, "Loaded project config.");

    println!("Scanning routes...");
    let routes = RouteTable::load(&config.routes_path(root)).map_err(|err| err.to_string())?;
    println!("Found {} route(s)", routes.len());

    let registry =
        ContractRegistry::load(&config.contracts_path(root)).map_err(|err| err.to_string())?;

    println!("Generating TypeScript client...");
    let client = generate(&routes, &registry, &ContractOptions::from(&config));
    if !client.report.skipped.is_empty() {
        println!("Skipped {} route(s)", client.report.skipped.len());
    }

    let output = config.output_path(root);
    write_client(&output, &client.code).map_err(|err| err.to_string())?;

    println!("✓ Generated TypeScript client: {}", output.display());
    println!();
    println!("Usage in your frontend:");
    println!("  import {{ api }} from './{}';", import_stem(&output));
    println!("  const result = await api.functionName(data);");
    Ok(())
}

fn import_stem(output: &Path) -> String {
    output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "api".to_string())
}
