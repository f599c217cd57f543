//! TypedRoutes CLI
//!
//! ```bash
//! typedroutes serve --port 8000
//! typedroutes openapi > openapi.json
//! typedroutes hints full-name john doe
//! ```
//!
//! See `typedroutes --help` for all available commands and options.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::hints::HintCommand;

#[derive(Parser)]
#[command(name = "typedroutes", about = "Typed HTTP API server with generated OpenAPI docs", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server until Ctrl-C
    Serve {
        /// Configuration file (defaults to ./typedroutes.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Listen host, overrides configuration
        #[arg(long)]
        host: Option<String>,

        /// Listen port, overrides configuration
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the OpenAPI document
    Openapi {
        #[arg(long)]
        config: Option<PathBuf>,

        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Run one of the typed helper functions
    Hints {
        #[command(subcommand)]
        hint: HintCommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config, host, port } => {
            commands::serve::run(config.as_deref(), host, port).await
        }
        Commands::Openapi { config, compact } => {
            commands::openapi::run(config.as_deref(), compact).map(|document| println!("{}", document))
        }
        Commands::Hints { hint } => {
            commands::hints::run(hint).map(|lines| lines.iter().for_each(|line| println!("{}", line)))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
