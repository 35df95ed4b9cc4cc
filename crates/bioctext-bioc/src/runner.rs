//! Run coordination: input paths → archive members → documents.
//!
//! One mutable run state (tally plus record separator state) is threaded
//! through every member of every path, so the configured limit is exact
//! across member and path boundaries. Processing is strictly sequential;
//! the limit check runs after every document, not only at stream ends.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use bioctext_core::{Flow, ProgressContext, visit_members};

use crate::config::Config;
use crate::extract::{self, Record, Sampler};
use crate::parser;

/// Run summary (diagnostic; the records themselves go to the output stream)
#[derive(Debug)]
pub struct Summary {
    pub paths: usize,
    pub failed_paths: usize,
    pub accepted: usize,
    pub elapsed: std::time::Duration,
}

/// Accepted-document tally and output state for one run
struct RunState<'a, W: Write> {
    config: &'a Config,
    sampler: Sampler,
    out: W,
    accepted: usize,
}

impl<W: Write> RunState<'_, W> {
    fn limit_reached(&self) -> bool {
        self.config.limit.is_some_and(|limit| self.accepted >= limit)
    }

    /// Write one record; consecutive records are separated by exactly one
    /// blank line.
    fn emit(&mut self, record: &Record) -> Result<()> {
        if self.accepted > 0 {
            writeln!(self.out)?;
        }
        if self.config.mark_docs {
            writeln!(self.out, "---- DOC-ID: \"{}\" ----", record.doc_id)?;
        }
        writeln!(self.out, "{}", record.body)?;
        self.accepted += 1;
        Ok(())
    }
}

/// Extract every input path in the order given, stopping at the configured
/// limit. A failing path is logged and the remaining paths still run.
pub fn run<W: Write>(
    paths: &[PathBuf],
    config: &Config,
    out: W,
    progress: &ProgressContext,
) -> Result<Summary> {
    let start = Instant::now();
    let mut state = RunState {
        config,
        sampler: Sampler::new(config.seed),
        out,
        accepted: 0,
    };
    let mut failed_paths = 0usize;

    for path in paths {
        if state.limit_reached() {
            break;
        }
        let pb = progress.path_spinner(&path.display().to_string());
        if let Err(e) = process_path(path, &mut state, &pb) {
            failed_paths += 1;
            log::error!("{}: {e:#}", path.display());
        }
        pb.finish_and_clear();
    }

    state.out.flush()?;

    let summary = Summary {
        paths: paths.len(),
        failed_paths,
        accepted: state.accepted,
        elapsed: start.elapsed(),
    };

    log::info!("=== Extraction summary ===");
    log::info!(
        "Paths: {}/{} processed ({} failed)",
        summary.paths - summary.failed_paths,
        summary.paths,
        summary.failed_paths
    );
    log::info!("Documents: {}", summary.accepted);
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    Ok(summary)
}

/// Stream every member of one path through the document pipeline.
fn process_path<W: Write>(
    path: &Path,
    state: &mut RunState<'_, W>,
    pb: &ProgressBar,
) -> Result<()> {
    visit_members::<anyhow::Error, _>(path, |member, reader| {
        pb.set_message(member.to_string());
        let flow = parser::stream_documents(reader, |document| {
            if let Some(record) = extract::assemble(&document, state.config, &mut state.sampler)? {
                state.emit(&record)?;
            }
            // checked per document so the limit is exact mid-member
            Ok(if state.limit_reached() {
                Flow::Stop
            } else {
                Flow::Continue
            })
        })
        .with_context(|| format!("failed to parse {member}"))?;
        Ok(flow)
    })?;
    Ok(())
}
