//! End-to-end tests over real container fixtures.
//!
//! Each test builds a temp archive (plain XML, gzip XML, or gzip tar of
//! XML members) and runs the full pipeline against it.

use std::io::Write;
use std::path::{Path, PathBuf};

use bioctext_bioc::{Config, run};
use bioctext_core::ProgressContext;
use tempfile::TempDir;

fn collection(documents: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<collection><source>PMC</source>{documents}</collection>"
    )
}

fn doc(id: &str, passages: &str) -> String {
    format!("<document><id>{id}</id>{passages}</document>")
}

fn passage(infons: &[(&str, &str)], text: &str) -> String {
    let infons: String = infons
        .iter()
        .map(|(key, value)| format!("<infon key=\"{key}\">{value}</infon>"))
        .collect();
    format!("<passage>{infons}<text>{text}</text></passage>")
}

fn write_xml(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn write_xml_gz(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut gz = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
    gz.write_all(content.as_bytes()).unwrap();
    gz.finish().unwrap();
    path
}

fn write_tar_gz(dir: &Path, name: &str, members: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let gz = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
    let mut builder = tar::Builder::new(gz);
    for (member_name, content) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, member_name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
    path
}

fn extract(paths: &[PathBuf], config: &Config) -> (String, bioctext_bioc::Summary) {
    let mut out = Vec::new();
    let progress = ProgressContext::new();
    let summary = run(paths, config, &mut out, &progress).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

#[test]
fn table_passage_is_suppressed() {
    let dir = TempDir::new().unwrap();
    let xml = collection(&doc(
        "D1",
        &format!(
            "{}{}",
            passage(&[("type", "table")], "Table 1"),
            passage(&[], "Intro text.")
        ),
    ));
    let path = write_xml(dir.path(), "corpus.xml", &xml);

    let (output, summary) = extract(&[path], &Config::default());
    assert_eq!(output, "Intro text.\n");
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.failed_paths, 0);
}

#[test]
fn ref_only_document_emits_empty_record() {
    let dir = TempDir::new().unwrap();
    let xml = collection(&doc(
        "D1",
        &passage(&[("section_type", "REF")], "References..."),
    ));
    let path = write_xml(dir.path(), "corpus.xml", &xml);

    let (output, summary) = extract(&[path.clone()], &Config::default());
    assert_eq!(output, "\n");
    assert_eq!(summary.accepted, 1);

    // with a minimum length the document is skipped entirely
    let config = Config {
        min_length: Some(1),
        ..Config::default()
    };
    let (output, summary) = extract(&[path], &config);
    assert_eq!(output, "");
    assert_eq!(summary.accepted, 0);
}

#[test]
fn records_are_blank_line_separated() {
    let dir = TempDir::new().unwrap();
    let xml = collection(&format!(
        "{}{}",
        doc("A", &passage(&[], "First.")),
        doc("B", &passage(&[], "Second."))
    ));
    let path = write_xml(dir.path(), "corpus.xml", &xml);

    let (output, _) = extract(&[path], &Config::default());
    assert_eq!(output, "First.\n\nSecond.\n");
}

#[test]
fn gzip_xml_matches_plain_xml() {
    let dir = TempDir::new().unwrap();
    let xml = collection(&format!(
        "{}{}",
        doc("A", &passage(&[], "First.")),
        doc("B", &passage(&[], "Second."))
    ));
    let plain = write_xml(dir.path(), "corpus.xml", &xml);
    let gzipped = write_xml_gz(dir.path(), "corpus.xml.gz", &xml);

    let (from_plain, _) = extract(&[plain], &Config::default());
    let (from_gz, _) = extract(&[gzipped], &Config::default());
    assert_eq!(from_plain, from_gz);
}

#[test]
fn limit_is_exact_across_tar_members() {
    let dir = TempDir::new().unwrap();
    let a = collection(&format!(
        "{}{}",
        doc("A1", &passage(&[], "a one")),
        doc("A2", &passage(&[], "a two"))
    ));
    let b = collection(&format!(
        "{}{}{}",
        doc("B1", &passage(&[], "b one")),
        doc("B2", &passage(&[], "b two")),
        doc("B3", &passage(&[], "b three"))
    ));
    let path = write_tar_gz(
        dir.path(),
        "bundle.tar.gz",
        &[("a.xml", &a), ("notes.txt", "not xml"), ("b.xml", &b)],
    );

    let config = Config {
        limit: Some(3),
        ..Config::default()
    };
    let (output, summary) = extract(&[path], &config);
    assert_eq!(output, "a one\n\na two\n\nb one\n");
    assert_eq!(summary.accepted, 3);
}

#[test]
fn limit_is_exact_across_paths() {
    let dir = TempDir::new().unwrap();
    let first = write_xml(
        dir.path(),
        "first.xml",
        &collection(&doc("A", &passage(&[], "alpha"))),
    );
    let second = write_xml(
        dir.path(),
        "second.xml",
        &collection(&doc("B", &passage(&[], "beta"))),
    );

    let config = Config {
        limit: Some(1),
        ..Config::default()
    };
    let (output, summary) = extract(&[first, second], &config);
    assert_eq!(output, "alpha\n");
    assert_eq!(summary.accepted, 1);
}

#[test]
fn extraction_is_idempotent_without_sampling() {
    let dir = TempDir::new().unwrap();
    let xml = collection(&format!(
        "{}{}",
        doc("A", &passage(&[("section_type", "INTRO")], "Intro.")),
        doc("B", &passage(&[("type", "fig")], "Figure 1"))
    ));
    let path = write_xml(dir.path(), "corpus.xml", &xml);

    let (first, _) = extract(&[path.clone()], &Config::default());
    let (second, _) = extract(&[path], &Config::default());
    assert_eq!(first, second);
}

#[test]
fn seeded_sampling_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let documents: String = (0..50)
        .map(|i| doc(&format!("D{i}"), &passage(&[], &format!("body {i}"))))
        .collect();
    let path = write_xml(dir.path(), "corpus.xml", &collection(&documents));

    let config = Config {
        random_ratio: Some(0.5),
        seed: Some(42),
        ..Config::default()
    };
    let (first, first_summary) = extract(&[path.clone()], &config);
    let (second, second_summary) = extract(&[path], &config);
    assert_eq!(first, second);
    assert_eq!(first_summary.accepted, second_summary.accepted);
    // a 0.5 ratio over 50 documents should drop some and keep some
    assert!(first_summary.accepted > 0 && first_summary.accepted < 50);
}

#[test]
fn duplicate_section_type_uses_first_value() {
    let dir = TempDir::new().unwrap();
    // INTRO wins over METHODS; neither is excluded, so the text survives
    let xml = collection(&doc(
        "D1",
        &passage(
            &[("section_type", "INTRO"), ("section_type", "METHODS")],
            "Kept text.",
        ),
    ));
    let path = write_xml(dir.path(), "corpus.xml", &xml);

    let (output, _) = extract(&[path], &Config::default());
    assert_eq!(output, "Kept text.\n");

    // when the first duplicate is excluded, the passage is dropped
    let xml = collection(&doc(
        "D2",
        &format!(
            "{}{}",
            passage(
                &[("section_type", "REF"), ("section_type", "INTRO")],
                "Dropped text.",
            ),
            passage(&[], "Survivor.")
        ),
    ));
    let path = write_xml(dir.path(), "dup.xml", &xml);
    let (output, _) = extract(&[path], &Config::default());
    assert_eq!(output, "Survivor.\n");
}

#[test]
fn doc_markers_are_emitted_on_request() {
    let dir = TempDir::new().unwrap();
    let xml = collection(&format!(
        "{}{}",
        doc("PMC1", &passage(&[], "First.")),
        doc("PMC2", &passage(&[], "Second."))
    ));
    let path = write_xml(dir.path(), "corpus.xml", &xml);

    let config = Config {
        mark_docs: true,
        ..Config::default()
    };
    let (output, _) = extract(&[path], &config);
    assert_eq!(
        output,
        "---- DOC-ID: \"PMC1\" ----\nFirst.\n\n---- DOC-ID: \"PMC2\" ----\nSecond.\n"
    );
}

#[test]
fn missing_id_fails_the_path_but_not_the_run() {
    let dir = TempDir::new().unwrap();
    let bad = write_xml(
        dir.path(),
        "bad.xml",
        &collection("<document><passage><text>No id.</text></passage></document>"),
    );
    let good = write_xml(
        dir.path(),
        "good.xml",
        &collection(&doc("G1", &passage(&[], "Good."))),
    );

    let (output, summary) = extract(&[bad, good], &Config::default());
    assert_eq!(summary.failed_paths, 1);
    assert_eq!(summary.accepted, 1);
    assert!(output.ends_with("Good.\n"));
}

#[test]
fn duplicate_ids_fail_the_path() {
    let dir = TempDir::new().unwrap();
    let xml = collection("<document><id>D1</id><id>D2</id></document>");
    let path = write_xml(dir.path(), "corpus.xml", &xml);

    let (output, summary) = extract(&[path], &Config::default());
    assert_eq!(summary.failed_paths, 1);
    assert_eq!(summary.accepted, 0);
    assert_eq!(output, "");
}

#[test]
fn unsupported_container_fails_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corpus.json.gz");
    std::fs::write(&path, b"not a supported container").unwrap();

    let (_, summary) = extract(&[path], &Config::default());
    assert_eq!(summary.failed_paths, 1);
    assert_eq!(summary.accepted, 0);
}

#[test]
fn unexpected_document_child_warns_but_extracts() {
    let dir = TempDir::new().unwrap();
    let xml = collection(
        "<document><id>D1</id><relation refid=\"R1\"/><passage><text>Body.</text></passage></document>",
    );
    let path = write_xml(dir.path(), "corpus.xml", &xml);

    let (output, summary) = extract(&[path], &Config::default());
    assert_eq!(output, "Body.\n");
    assert_eq!(summary.failed_paths, 0);
}
