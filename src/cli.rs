//! Command-line interface for smellcheck.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{self, Config, CONFIG_FILE_NAMES, DEFAULT_TEMPLATE};
use crate::detect::{Check, Runner};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Static analyzer for C# codebases.
///
/// Smellcheck reports overly long methods, magic numbers, identifiers that
/// break the naming conventions for their kind, and dead code (unused using
/// directives and declarations nothing refers to).
#[derive(Parser)]
#[command(name = "smellcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a file or directory for code smells
    #[command(visible_alias = "check")]
    Scan(ScanArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run only these checks (repeatable; default: all enabled in config)
    #[arg(long = "check", value_enum)]
    pub checks: Vec<Check>,

    /// Statement count at which a method is reported (overrides config)
    #[arg(short, long)]
    pub threshold: Option<usize>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Report at most this many findings per check
    #[arg(long)]
    pub max_findings: Option<usize>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "smellcheck.yaml")]
    pub output: PathBuf,
}

/// Log filter directive for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Find a config next to the scanned path, then in the current directory.
fn discover_config(scan_path: &Path) -> Option<PathBuf> {
    let scan_dir = if scan_path.is_dir() {
        Some(scan_path)
    } else {
        scan_path.parent()
    };

    scan_dir
        .and_then(Config::discover)
        .or_else(|| Config::discover("."))
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    // Explicit config, else discovered, else defaults
    let config_path = args.config.clone().or_else(|| discover_config(&abs_path));
    let config = match &config_path {
        Some(path) => {
            debug!(path = %path.display(), "using config");
            match Config::parse_file(path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error parsing config {}: {}", path.display(), e);
                    return Ok(EXIT_ERROR);
                }
            }
        }
        None => {
            debug!(
                "no config found (looked for {}), using defaults",
                CONFIG_FILE_NAMES.join(", ")
            );
            Config::default()
        }
    };

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    let runner = Runner::new(config)
        .checks(&args.checks)
        .threshold(args.threshold)
        .max_findings(args.max_findings);
    let result = runner.run(&abs_path)?;

    if result.scanned == 0 {
        eprintln!("Warning: no C# files to scan");
    }

    // Output results
    let path_str = args.path.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&path_str, &result)?,
        "sarif" => report::write_sarif(&abs_path, &result)?,
        _ => report::write_pretty(&path_str, &result),
    }

    if result.is_clean() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: smellcheck scan . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
