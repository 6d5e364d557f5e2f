//! The BSL syntax tree CLI.
//!
//! Provides the `bslc` command with the following subcommands:
//!
//! - `bslc fmt <module.json>` - Print BSL source for a serialized module
//! - `bslc walk <module.json>` - List every statement slot with its enclosing function
//! - `bslc assemble <items.json>` - Build a module from parser items, reporting misplaced ones
//!
//! Options:
//! - `-v` - Raise log verbosity (repeatable); `RUST_LOG` takes precedence
//! - `--indent` - Spaces per nesting level for `fmt`
//! - `--config` - TOML file with printer settings for `fmt`
//! - `--json` - Output diagnostics as JSON (one object per line)

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bsl_ast::{Module, ModuleItem, Statement};
use bsl_common::Diagnostics;
use bsl_fmt::FormatConfig;

#[derive(Parser)]
#[command(name = "bslc", version, about = "Tools for BSL syntax trees")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print BSL source for a module serialized as JSON
    Fmt {
        /// Path to the module JSON file
        file: PathBuf,

        /// Spaces per indentation level (overrides --config)
        #[arg(long)]
        indent: Option<usize>,

        /// TOML file with printer settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List every visited statement slot with its enclosing function
    Walk {
        /// Path to the module JSON file
        file: PathBuf,
    },
    /// Assemble a module from a JSON array of parser items
    Assemble {
        /// Path to the items JSON file
        file: PathBuf,

        /// Module name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Output diagnostics as JSON (one object per line) instead of human-readable format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = matches!(cli.command, Commands::Assemble { json: true, .. });
    init_logging(cli.verbose, json);

    let result = match cli.command {
        Commands::Fmt {
            file,
            indent,
            config,
        } => fmt(&file, indent, config.as_deref()).map(|text| {
            print!("{}", text);
            true
        }),
        Commands::Walk { file } => walk(&file).map(|lines| {
            for line in lines {
                println!("{}", line);
            }
            true
        }),
        Commands::Assemble { file, name, json } => assemble(&file, name, json),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            if json {
                let msg = serde_json::json!({
                    "code": "C0001",
                    "severity": "error",
                    "message": e,
                });
                eprintln!("{}", msg);
            } else {
                eprintln!("error: {}", e);
            }
            process::exit(1);
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
///
/// In JSON mode stderr carries diagnostics objects, so warnings stay off
/// unless asked for.
fn init_logging(verbose: u8, json: bool) {
    let level = match verbose {
        0 if json => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))
}

/// Load a module. A JSON `null` stands for an absent module.
fn load_module(path: &Path) -> Result<Option<Module>, String> {
    let source = read_file(path)?;
    serde_json::from_str(&source)
        .map_err(|e| format!("Invalid module JSON in '{}': {}", path.display(), e))
}

/// Resolve printer settings: defaults, then the config file, then `--indent`.
fn format_config(indent: Option<usize>, config: Option<&Path>) -> Result<FormatConfig, String> {
    let mut cfg = match config {
        Some(path) => {
            let source = read_file(path)?;
            toml::from_str(&source)
                .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))?
        }
        None => FormatConfig::default(),
    };
    if let Some(indent) = indent {
        cfg.indent_size = indent;
    }
    Ok(cfg)
}

fn fmt(file: &Path, indent: Option<usize>, config: Option<&Path>) -> Result<String, String> {
    let cfg = format_config(indent, config)?;
    debug!(indent = cfg.indent_size, "printer config");
    let Some(module) = load_module(file)? else {
        info!(file = %file.display(), "absent module, nothing to print");
        return Ok(String::new());
    };
    Ok(bsl_fmt::print_module(&module, &cfg))
}

/// One `<function or -> TAB <kind>` line per visited slot. Call chains
/// get a third column with their number of links.
fn walk(file: &Path) -> Result<Vec<String>, String> {
    let Some(mut module) = load_module(file)? else {
        return Ok(Vec::new());
    };
    let mut lines = Vec::new();
    module.walk(|func, slot| {
        let name = func.map_or("-", |f| f.name.as_str());
        let line = match &*slot {
            Statement::CallChain(chain) => {
                format!("{}\t{}\t{}", name, slot.kind_name(), chain.link_count())
            }
            _ => format!("{}\t{}", name, slot.kind_name()),
        };
        lines.push(line);
    });
    info!(module = %module.name, slots = lines.len(), "walk finished");
    Ok(lines)
}

/// Print the assembled module as JSON on stdout and the diagnostics on
/// stderr. Returns `Ok(false)` if anything was rejected.
fn assemble(file: &Path, name: Option<String>, json: bool) -> Result<bool, String> {
    let source = read_file(file)?;
    let items: Vec<ModuleItem> = serde_json::from_str(&source)
        .map_err(|e| format!("Invalid items JSON in '{}': {}", file.display(), e))?;
    let name = name.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let (module, diagnostics) = Module::assemble(name, items);
    report(&diagnostics, json);

    let out = serde_json::to_string_pretty(&module)
        .map_err(|e| format!("Failed to serialize module: {}", e))?;
    println!("{}", out);
    Ok(diagnostics.is_empty())
}

fn report(diagnostics: &Diagnostics, json: bool) {
    for err in diagnostics {
        if json {
            let msg = serde_json::json!({
                "code": err.code(),
                "severity": "error",
                "message": err.to_string(),
                "name": err.name(),
            });
            eprintln!("{}", msg);
        } else {
            eprintln!("error[{}]: {} ({})", err.code(), err, err.name());
        }
    }
}
