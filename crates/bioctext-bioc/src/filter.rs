//! Passage classification and exclusion
//!
//! Two independently-cased vocabularies are consulted because source
//! corpora are inconsistent about which metadata they populate: the
//! fine-grained passage `type` and the coarse `section_type`. A passage is
//! dropped when either value is in its exclusion set.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;

use crate::parser::Passage;

/// Infon key carrying the coarse section classification
pub const SECTION_TYPE_KEY: &str = "section_type";

/// Infon key carrying the fine-grained passage classification
pub const PASSAGE_TYPE_KEY: &str = "type";

/// Passage types whose text is non-prose
static EXCLUDED_PASSAGE_TYPES: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    [
        "ref",
        "table",
        "table_caption",
        "table_caption_title",
        "table_footnote",
        "table_footnote_title",
        "table_title",
        "fig",
        "fig_caption",
        "fig_caption_title",
        "fig_footnote",
        "footnote",
        "footnote_title",
    ]
    .into_iter()
    .collect()
});

/// Section types excluded wholesale
static EXCLUDED_SECTION_TYPES: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| ["REF", "FIG", "TABLE"].into_iter().collect());

/// Single infon value for `key`; `None` when the passage carries none.
///
/// Multiple infons with the same key are a warn-and-continue condition,
/// not an error: the first value wins and the duplicates are ignored.
pub fn infon_value<'a>(passage: &'a Passage, key: &str) -> Option<&'a str> {
    let values: Vec<&str> = passage
        .infons
        .iter()
        .filter(|infon| infon.key == key)
        .map(|infon| infon.value.as_str())
        .collect();

    match values.as_slice() {
        [] => None,
        [only] => Some(only),
        [first, ..] => {
            log::warn!("multiple '{key}' infons: {values:?}, using the first");
            Some(first)
        }
    }
}

/// Coarse section classification of a passage
pub fn section_type(passage: &Passage) -> Option<&str> {
    infon_value(passage, SECTION_TYPE_KEY)
}

/// Fine-grained passage classification
pub fn passage_type(passage: &Passage) -> Option<&str> {
    infon_value(passage, PASSAGE_TYPE_KEY)
}

/// Does this passage contribute text to the document body?
pub fn keep_passage(passage: &Passage) -> bool {
    if passage_type(passage).is_some_and(|t| EXCLUDED_PASSAGE_TYPES.contains(t)) {
        return false;
    }
    !section_type(passage).is_some_and(|t| EXCLUDED_SECTION_TYPES.contains(t))
}

/// Text contributed by an included passage: every text leaf beneath it in
/// document order, empty and all-whitespace leaves dropped, survivors
/// joined with newlines.
pub fn passage_text(passage: &Passage) -> String {
    let kept: Vec<&str> = passage
        .texts
        .iter()
        .map(String::as_str)
        .filter(|leaf| !leaf.trim().is_empty())
        .collect();
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Infon;

    fn passage(infons: &[(&str, &str)], texts: &[&str]) -> Passage {
        Passage {
            infons: infons
                .iter()
                .map(|(key, value)| Infon {
                    key: (*key).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
            texts: texts.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn untyped_passage_is_kept() {
        assert!(keep_passage(&passage(&[], &["Intro text."])));
    }

    #[test]
    fn excluded_passage_types_are_dropped() {
        for t in ["ref", "table", "fig_caption", "footnote_title"] {
            assert!(!keep_passage(&passage(&[("type", t)], &["x"])), "type {t}");
        }
    }

    #[test]
    fn excluded_section_types_are_dropped() {
        for t in ["REF", "FIG", "TABLE"] {
            assert!(
                !keep_passage(&passage(&[("section_type", t)], &["x"])),
                "section {t}"
            );
        }
    }

    #[test]
    fn vocabularies_are_independent() {
        // fine-grained exclusion wins even with a benign section type
        assert!(!keep_passage(&passage(
            &[("section_type", "INTRO"), ("type", "table")],
            &["x"]
        )));
        // coarse exclusion wins even with a benign passage type
        assert!(!keep_passage(&passage(
            &[("section_type", "REF"), ("type", "paragraph")],
            &["x"]
        )));
    }

    #[test]
    fn case_matters() {
        // the two vocabularies are differently cased on purpose
        assert!(keep_passage(&passage(&[("type", "REF")], &["x"])));
        assert!(keep_passage(&passage(&[("section_type", "ref")], &["x"])));
    }

    #[test]
    fn duplicate_key_uses_first_value() {
        let p = passage(
            &[("section_type", "INTRO"), ("section_type", "METHODS")],
            &[],
        );
        assert_eq!(section_type(&p), Some("INTRO"));
    }

    #[test]
    fn absent_key_is_none() {
        let p = passage(&[("license", "CC BY")], &[]);
        assert_eq!(section_type(&p), None);
        assert_eq!(passage_type(&p), None);
    }

    #[test]
    fn blank_leaves_are_dropped() {
        let p = passage(&[], &["First.", "", "   \n", "Second."]);
        assert_eq!(passage_text(&p), "First.\nSecond.");
    }

    #[test]
    fn all_blank_leaves_give_empty_text() {
        let p = passage(&[], &["", "  "]);
        assert_eq!(passage_text(&p), "");
    }
}
