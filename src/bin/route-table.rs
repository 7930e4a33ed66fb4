use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use route_dispatch::config::{load_manifest, ConfigError};
use route_dispatch::observability::logging::{init_logging, DEFAULT_DIRECTIVE};
use route_dispatch::Registry;

#[derive(Parser)]
#[command(name = "route-table")]
#[command(about = "Inspect and check route manifests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manifest and report every problem
    Check {
        manifest: PathBuf,
    },
    /// Print a manifest's placeholders and routes as JSON
    List {
        manifest: PathBuf,
    },
}

fn main() -> ExitCode {
    init_logging(DEFAULT_DIRECTIVE);
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { manifest } => check(&manifest),
        Commands::List { manifest } => list(&manifest),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match load_manifest(path) {
        Ok(manifest) => {
            println!(
                "{}: ok ({} placeholders, {} routes)",
                path.display(),
                manifest.placeholders.len(),
                manifest.routes.len()
            );
            Ok(())
        }
        Err(ConfigError::Validation(errors)) => {
            for err in &errors {
                eprintln!("{}: {}", path.display(), err);
            }
            Err(format!("{} problem(s) found", errors.len()).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn list(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = load_manifest(path)?;
    let mut registry = Registry::new();
    manifest.apply(&mut registry)?;
    println!("{}", serde_json::to_string_pretty(&registry.table_list())?);
    Ok(())
}
