//! bioctext - plain-text extraction from BioC corpus archives
//!
//! Streams document bodies out of BioC collections (plain XML, gzip XML,
//! or gzip tar bundles), filtering out references, tables, figures, and
//! footnotes. Records go to stdout; all diagnostics go to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "bioctext")]
#[command(about = "Extract plain-text document bodies from BioC corpus archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./bioctext.toml or ~/.config/bioctext/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract document text records from BioC archives
    Extract(cmd::extract::ExtractArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect); logging goes through it so log
    // lines and progress bars do not interleave
    let progress = bioctext_core::ProgressContext::new();
    let multi = if progress.is_tty() {
        Some(progress.multi())
    } else {
        None
    };
    bioctext_core::init_logging(cli.debug, multi);

    // Load configuration
    let config = match cli.config {
        Some(path) => Config::from_file(&path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Extract(args) => cmd::extract::run(args, &config, &progress),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Minimum body length".to_string(),
                config
                    .extract
                    .min_length
                    .map_or_else(|| "not set".to_string(), |n| n.to_string()),
            ]);
            table.add_row(vec![
                "DOC-ID markers".to_string(),
                config.extract.mark_docs.to_string(),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
