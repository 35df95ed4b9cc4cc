//! Sentence splitting over extractor output.
//!
//! Input is the record stream produced by `bioctext extract`: text lines,
//! blank record separators, and (with `--mark-docs`) DOC-ID marker lines.
//! Markers and blank lines pass through unchanged; every other line is
//! segmented into one sentence per output line.

use std::io::{BufRead, Write};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

/// Document boundary marker emitted by `bioctext extract --mark-docs`
static DOC_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^-+ DOC-ID: ".*" -+$"#).expect("invalid marker pattern"));

/// External sentence segmentation capability.
///
/// Implementations wrap whatever model does the actual splitting; the
/// driver only asks for the sentences of one passage.
pub trait Segmenter {
    fn segment(&self, passage: &str) -> Vec<String>;
}

/// Post-processing transform over a joined split: one sentence per line
/// in, one sentence per line out.
pub type Refiner = dyn Fn(&str) -> String;

/// Is this line a document boundary marker?
pub fn is_doc_marker(line: &str) -> bool {
    DOC_MARKER.is_match(line)
}

/// Sentences of one passage: segment, drop blank sentences, then apply
/// the refinement transform when one is configured.
pub fn sentences(passage: &str, segmenter: &dyn Segmenter, refine: Option<&Refiner>) -> Vec<String> {
    let mut passage = passage.to_string();
    if !passage.ends_with('\n') {
        // segmentation models expect a terminated line
        passage.push('\n');
    }

    let mut split: Vec<String> = segmenter
        .segment(&passage)
        .into_iter()
        .filter(|sentence| !sentence.trim().is_empty())
        .map(|sentence| sentence.trim_end_matches('\n').to_string())
        .collect();

    if let Some(refine) = refine {
        split = refine(&split.join("\n")).lines().map(String::from).collect();
    }

    split
}

/// Drive segmentation over an extractor record stream.
pub fn split_lines<R: BufRead, W: Write>(
    reader: R,
    mut out: W,
    segmenter: &dyn Segmenter,
    refine: Option<&Refiner>,
) -> Result<()> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if is_doc_marker(line) || line.is_empty() {
            writeln!(out, "{line}")?;
        } else {
            for sentence in sentences(line, segmenter, refine) {
                writeln!(out, "{sentence}")?;
            }
        }
    }
    Ok(())
}
