//! Bioctext Core - Common infrastructure for corpus extraction tools
//!
//! This crate provides the container dispatch over local archive files
//! (plain XML, gzip XML, gzip tar bundles) plus the logging and progress
//! plumbing shared by the extraction crates.

pub mod logging;
pub mod progress;
pub mod source;

// Re-exports for convenience
pub use logging::init_logging;
pub use progress::ProgressContext;
pub use source::{ArchiveKind, Flow, SourceError, classify, visit_members};
