//! Bioctext Sentence - line-oriented sentence segmentation driver
//!
//! Downstream collaborator for extractor output: splits each text line
//! into sentences with a pluggable [`Segmenter`], passing DOC-ID marker
//! lines and blank lines through unchanged. The segmentation model itself
//! stays external; this crate only contracts for it.

pub mod segment;

// Re-exports
pub use segment::{Refiner, Segmenter, is_doc_marker, sentences, split_lines};
