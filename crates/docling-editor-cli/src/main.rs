// Command handlers share one shape: owned clap arguments in, anyhow::Result out.
#![allow(
    clippy::needless_pass_by_value,    // clap requires owned strings
    clippy::unnecessary_wraps,         // consistent Result return for CLI handlers
    clippy::must_use_candidate,        // CLI functions don't need must_use
)]

//! Docling Editor CLI - inspect page annotation data
//!
//! A command-line interface over `docling-editor-core`: resolve the effective
//! Docling payload of a page, check its blocks, hit-test points, and print
//! the block-type color legend.

mod config;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use config::Config;
use docling_editor_core::{
    hit_test, legend, resolve_with_source, Block, BlockType, DoclingData, RgbColor,
};
use report::CheckReport;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Output format for report-style commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
enum ReportFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "docling-editor")]
#[command(version, about = "Inspect Docling page annotation data", long_about = None)]
struct Cli {
    /// Show detailed processing information
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.docling-editor.toml and ./.docling-editor.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective Docling data of a page as JSON
    #[command(long_about = "Print the effective Docling data of a page as JSON.\n\
                      \n\
                      Lookup order: docling_json_override, docling_json,\n\
                      metadata.docling_json_override, metadata.docling_json.\n\
                      The first present field is printed unchanged.")]
    Resolve {
        /// Page JSON file, or '-' to read from stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Compact JSON output (no pretty-printing)
        #[arg(long)]
        compact: bool,
    },

    /// Report block types, colors and bounding-box validity
    Check {
        /// Page JSON file, or '-' to read from stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Fail if any block has an invalid bounding box
        #[arg(long)]
        strict: bool,
    },

    /// Find the topmost block containing a point
    Hit {
        /// Page JSON file, or '-' to read from stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// X coordinate
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Y coordinate
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Print the block-type color legend
    Legend {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Print a new empty block as JSON
    NewBlock {
        /// Block type (default: text, or from config)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        block_type: Option<String>,

        /// Compact JSON output (no pretty-printing)
        #[arg(long)]
        compact: bool,
    },

    /// Show or create configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the merged configuration as TOML
    Show,

    /// Create a .docling-editor.toml with defaults
    Init {
        /// Create in the user home directory instead of the current directory
        #[arg(long)]
        user: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::discover(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve { input, compact } => run_resolve(&input, config.compact(compact)),
        Commands::Check {
            input,
            format,
            strict,
        } => run_check(&input, format, strict),
        Commands::Hit { input, x, y } => run_hit(&input, x, y),
        Commands::Legend { format } => run_legend(format),
        Commands::NewBlock {
            block_type,
            compact,
        } => run_new_block(
            config.block_type(block_type.as_deref()),
            config.compact(compact),
        ),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(&config),
            ConfigAction::Init { user, force } => run_config_init(user, force),
        },
    }
}

/// Read a page object from a file, or from stdin when `input` is `-`
fn read_page(input: &str) -> Result<Value> {
    let content = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read page JSON from stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?
    };
    serde_json::from_str(&content).with_context(|| format!("Failed to parse page JSON: {input}"))
}

/// Resolve the page payload, returning where it came from and the raw value
fn resolve_page(input: &str, page: &Value) -> Result<(String, Value)> {
    match resolve_with_source(Some(page)) {
        Some((source, data)) => {
            log::info!("{input}: using {source}");
            Ok((source.to_string(), data.clone()))
        }
        None => bail!("No Docling data found in {input}"),
    }
}

/// Resolve and decode the page payload into typed blocks
fn resolve_blocks(input: &str) -> Result<(String, DoclingData)> {
    let page = read_page(input)?;
    let (source, raw) = resolve_page(input, &page)?;
    let data: DoclingData = serde_json::from_value(raw)
        .with_context(|| format!("{source} in {input} is not valid Docling data"))?;
    Ok((source, data))
}

fn print_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}

fn run_resolve(input: &str, compact: bool) -> Result<()> {
    let page = read_page(input)?;
    let (_, data) = resolve_page(input, &page)?;
    print_json(&data, compact)
}

fn run_check(input: &str, format: ReportFormat, strict: bool) -> Result<()> {
    let (source, data) = resolve_blocks(input)?;
    let report = CheckReport::build(source, &data);

    match format {
        ReportFormat::Json => print_json(&report, false)?,
        ReportFormat::Text => print_check_text(&report),
    }

    if strict && report.summary.invalid_bbox > 0 {
        bail!(
            "{} block(s) have an invalid bounding box",
            report.summary.invalid_bbox
        );
    }
    Ok(())
}

fn print_check_text(report: &CheckReport) {
    println!("{} {}", "Source:".bold(), report.source);
    for row in &report.blocks {
        let kind = if row.known_type {
            row.block_type.normal()
        } else {
            format!("{} (unrecognized)", row.block_type).yellow()
        };
        let geometry = match (&row.bbox, row.width, row.height) {
            (Some(bbox), Some(w), Some(h)) if row.valid_bbox => {
                format!("[{}, {}, {}, {}] {w}x{h}", bbox.l, bbox.t, bbox.r, bbox.b)
            }
            (Some(bbox), _, _) => format!(
                "[{}, {}, {}, {}] {}",
                bbox.l,
                bbox.t,
                bbox.r,
                bbox.b,
                "invalid".red()
            ),
            (None, _, _) => "no bbox".dimmed().to_string(),
        };
        println!("  #{:<3} {:<28} {} {}", row.index, kind, row.color, geometry);
    }
    let s = &report.summary;
    println!(
        "{} {} blocks, {} known, {} unrecognized, {} missing bbox, {} invalid bbox",
        "Summary:".bold(),
        s.total,
        s.known_types,
        s.unrecognized_types,
        s.missing_bbox,
        s.invalid_bbox
    );
}

fn run_hit(input: &str, x: f64, y: f64) -> Result<()> {
    let (_, data) = resolve_blocks(input)?;
    let blocks = data.blocks();
    match hit_test(blocks, x, y) {
        Some(index) => {
            let block: &Block = &blocks[index];
            println!("Block {index} ({})", block.block_type);
            Ok(())
        }
        None => bail!("No block at ({x}, {y})"),
    }
}

fn run_legend(format: ReportFormat) -> Result<()> {
    let entries = legend();
    match format {
        ReportFormat::Json => print_json(&entries, false)?,
        ReportFormat::Text => {
            for entry in entries {
                let rgb = RgbColor::from_hex(entry.color)?;
                println!(
                    "{} {:<12} {:<12} {}",
                    "■".truecolor(rgb.r, rgb.g, rgb.b),
                    entry.label,
                    entry.block_type.as_str(),
                    entry.color
                );
            }
        }
    }
    Ok(())
}

fn run_new_block(block_type: &str, compact: bool) -> Result<()> {
    let kind: BlockType = block_type.parse().with_context(|| {
        let valid: Vec<&str> = BlockType::ALL.iter().map(|t| t.as_str()).collect();
        format!("Valid types: {}", valid.join(", "))
    })?;
    print_json(&Block::empty(kind), compact)
}

fn run_config_show(config: &Config) -> Result<()> {
    let toml = toml::to_string_pretty(config)?;
    print!("{toml}");
    Ok(())
}

fn run_config_init(user: bool, force: bool) -> Result<()> {
    let path = if user {
        Config::user_config_path().context("Could not determine home directory")?
    } else {
        Config::project_config_path()
    };
    write_default_config(&path, force)?;
    println!("{} Created {}", "✓".green(), path.display());
    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    let toml = toml::to_string_pretty(&Config::with_defaults())?;
    fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))
}
