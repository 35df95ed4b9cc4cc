//! Document assembly: sampling, identifier lookup, passage filtering,
//! minimum-length check.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::filter;
use crate::parser::{DocChild, Document};

/// Fatal format violation in the input markup
#[derive(Debug, PartialEq, Eq)]
pub enum FormatError {
    /// Document without the mandatory `<id>` child
    MissingId,
    /// More than one `<id>` child where exactly one is expected
    MultipleIds(usize),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "expected 1 <id>, got 0"),
            Self::MultipleIds(n) => write!(f, "expected 1 <id>, got {n}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// The mandatory, unique document identifier.
///
/// Zero matches and multiple matches are distinct format errors; both are
/// fatal to the current input path.
pub fn document_id(document: &Document) -> Result<&str, FormatError> {
    let mut ids = document.children.iter().filter_map(|child| match child {
        DocChild::Id(id) => Some(id.as_str()),
        _ => None,
    });
    let first = ids.next().ok_or(FormatError::MissingId)?;
    let extra = ids.count();
    if extra > 0 {
        return Err(FormatError::MultipleIds(extra + 1));
    }
    Ok(first)
}

/// Document-level random sampling with optional fixed seed
#[derive(Debug)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Uniform [0, 1) draw; the document is skipped when the draw exceeds
    /// the configured ratio.
    fn keep(&mut self, ratio: f64) -> bool {
        self.rng.gen::<f64>() <= ratio
    }
}

/// One accepted document
#[derive(Debug, PartialEq, Eq)]
pub struct Record {
    pub doc_id: String,
    pub body: String,
}

/// Assemble one document into an emitted record, or `None` to skip it.
///
/// The sampling draw happens before any passage work. The identifier
/// lookup is the only fatal step; unexpected child tags are warned about
/// and otherwise ignored.
pub fn assemble(
    document: &Document,
    config: &Config,
    sampler: &mut Sampler,
) -> Result<Option<Record>> {
    if let Some(ratio) = config.random_ratio {
        if !sampler.keep(ratio) {
            return Ok(None);
        }
    }

    let doc_id = document_id(document)?;

    let mut parts: Vec<String> = Vec::new();
    for child in &document.children {
        match child {
            DocChild::Passage(passage) => {
                if filter::keep_passage(passage) {
                    parts.push(filter::passage_text(passage));
                }
            }
            // license metadata and the already-consumed identifier
            DocChild::Infon(_) | DocChild::Id(_) => {}
            DocChild::Other(tag) => {
                log::warn!("unexpected tag <{tag}> in document {doc_id}");
            }
        }
    }

    let body = parts.join("\n");
    if let Some(min) = config.min_length {
        if body.chars().count() < min {
            return Ok(None);
        }
    }

    Ok(Some(Record {
        doc_id: doc_id.to_string(),
        body,
    }))
}
