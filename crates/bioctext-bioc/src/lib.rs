//! Bioctext BioC - plain-text extraction from BioC corpus archives
//!
//! Streams `<document>` elements out of BioC collections (plain XML, gzip
//! XML, or gzip tar bundles of XML members), drops non-prose passages
//! (references, tables, figures, footnotes), and emits one flattened text
//! record per surviving document.
//!
//! # Features
//!
//! - Streaming XML parsing with quick-xml, one document in memory at a time
//! - Per-passage exclusion by passage type and section type
//! - Document-level random sampling (seedable) and minimum-length filtering
//! - Exact global document limit across archive members and input paths
//!
//! # Example
//!
//! ```ignore
//! use bioctext_bioc::{Config, run};
//! use bioctext_core::ProgressContext;
//!
//! let config = Config {
//!     limit: Some(100),
//!     ..Default::default()
//! };
//!
//! let progress = ProgressContext::new();
//! let summary = run(&paths, &config, std::io::stdout().lock(), &progress)?;
//! eprintln!("Extracted {} documents", summary.accepted);
//! ```

pub mod config;
pub mod extract;
pub mod filter;
pub mod parser;
pub mod runner;

// Re-exports
pub use config::Config;
pub use runner::{Summary, run};
