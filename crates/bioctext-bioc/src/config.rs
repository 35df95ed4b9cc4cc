//! Extraction pipeline configuration

/// Runtime configuration for one extraction run
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Stop after this many accepted documents across the whole run
    pub limit: Option<usize>,
    /// Skip documents whose joined body has fewer characters than this
    pub min_length: Option<usize>,
    /// Probability in [0, 1] that a document is considered at all
    pub random_ratio: Option<f64>,
    /// Seed for reproducible sampling (entropy-seeded when unset)
    pub seed: Option<u64>,
    /// Emit a DOC-ID marker line before each record
    pub mark_docs: bool,
}
