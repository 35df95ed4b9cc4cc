//! `bioctext extract` - extract text records from BioC archives

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;

use bioctext_core::ProgressContext;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// BioC input files (.xml, .xml.gz, .tar.gz/.tgz)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Maximum accepted documents across the whole run
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Minimum body length (characters) to accept a document
    #[arg(short, long)]
    pub min_length: Option<usize>,

    /// Probability in [0,1] that a document is considered at all
    #[arg(short, long, value_parser = parse_ratio)]
    pub random_ratio: Option<f64>,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Emit a DOC-ID marker line before each record
    #[arg(long)]
    pub mark_docs: bool,
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    let ratio: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("ratio must be in [0, 1], got {ratio}"))
    }
}

pub fn run(args: ExtractArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    // CLI flags override config file values
    let extract_config = bioctext_bioc::Config {
        limit: args.limit,
        min_length: args.min_length.or(config.extract.min_length),
        random_ratio: args.random_ratio,
        seed: args.seed,
        mark_docs: args.mark_docs || config.extract.mark_docs,
    };

    let stdout = std::io::stdout();
    let summary = bioctext_bioc::run(&args.paths, &extract_config, stdout.lock(), progress)?;

    if summary.failed_paths > 0 {
        bail!(
            "{} of {} input paths failed",
            summary.failed_paths,
            summary.paths
        );
    }
    Ok(())
}
