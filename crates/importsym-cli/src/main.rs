//! importsym CLI
//!
//! Imports selected C declarations from header files into one file.

use anyhow::{Context, Result};
use clap::Parser;
use importsym_core::{Config, ImportReport};
use importsym_pipeline::SymbolImporter;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "importsym")]
#[command(author, version, about = "Import C symbol declarations into a single file", long_about = None)]
struct Cli {
    /// Symbol list: `<header> <name> [<name> ...]` per line
    #[arg(short, long, value_name = "FILE")]
    list: Option<PathBuf>,

    /// Declaration file to write
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Project root the include directories are relative to
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Fallback libc headers understood by the parser
    #[arg(long, value_name = "DIR")]
    fake_libc: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_yaml_file(path)?,
            None => Config::default(),
        };

        if let Some(list) = &self.list {
            config.paths.list_file = list.clone();
        }
        if let Some(output) = &self.output {
            config.paths.output_file = output.clone();
        }
        if let Some(root) = &self.root {
            config.preprocessor.project_root = root.clone();
        }
        if let Some(fake_libc) = &self.fake_libc {
            config.preprocessor.fake_libc_dir = fake_libc.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = cli.load_config()?;
    println!(
        "Importing symbols: '{}' --> '{}'",
        config.paths.list_file.display(),
        config.paths.output_file.display()
    );

    let importer = SymbolImporter::new(config)?;
    let result = importer.run();
    importer.cleanup();

    let report = result
        .inspect_err(|e| error!("{}", e))
        .context("symbol import aborted, output not written")?;

    print_report(&report, &cli.format)
}

fn print_report(report: &ImportReport, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("\n📊 Summary:");
    println!("   Symbols requested: {} from {} files", report.symbols, report.files);
    println!("   Declarations written: {}", report.written.len());
    if !report.missing.is_empty() {
        println!("   Not found: {}", report.missing.join(", "));
    }
    println!("   Output: {}", report.output.display());
    Ok(())
}
