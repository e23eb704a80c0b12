//! Command-line interface for routegen.
//!
//! Each subcommand module exposes an `Args` struct and a `run(args) -> i32`
//! entry point; errors are printed and turned into exit code 1.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod client;
pub mod route;

/// Environment variable controlling log output.
pub const LOG_ENV: &str = "ROUTEGEN_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "routegen",
    version,
    about = "Typed TypeScript clients and handler stubs from a route table"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the TypeScript API client from the route table
    Client(client::ClientArgs),
    /// Create a new route handler stub
    Route(route::RouteArgs),
}

/// Parse `args` (program name first) and run the selected command.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Client(args)) => client::run(args),
            Some(Commands::Route(args)) => route::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Run a command body, printing its error and mapping it to an exit code.
pub fn run_command<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}

/// Install the stderr log subscriber.
pub fn init_tracing() {
    // ROUTEGEN_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "routegen_core=debug"
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => crate_filter(&level),
        Ok(spec) => spec,
        Err(_) => crate_filter("info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

/// Filter spec applying `level` to every routegen crate.
fn crate_filter(level: &str) -> String {
    ["routegen", "routegen_cli", "routegen_core", "routegen_common"]
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
