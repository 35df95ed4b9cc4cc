//! BioC XML parser using quick-xml
//!
//! Streaming parser for BioC collection files. Each `<document>` subtree is
//! materialized on its closing tag, handed to the caller, and dropped before
//! the next sibling is read, so peak memory stays at one document regardless
//! of collection size.

use std::io::BufRead;

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use bioctext_core::Flow;

/// Key/value metadata pair (`<infon key="...">value</infon>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Infon {
    pub key: String,
    pub value: String,
}

/// One `<passage>` subtree: its direct infon children plus the inner text
/// of every `<text>` element anywhere beneath it, in document order.
#[derive(Debug, Default)]
pub struct Passage {
    pub infons: Vec<Infon>,
    pub texts: Vec<String>,
}

/// Direct child of a `<document>` element
#[derive(Debug)]
pub enum DocChild {
    Id(String),
    Infon(Infon),
    Passage(Passage),
    /// Unrecognized tag, kept so the assembler can warn with the tag name
    Other(String),
}

/// One `<document>` subtree with children in source order
#[derive(Debug, Default)]
pub struct Document {
    pub children: Vec<DocChild>,
}

impl Document {
    /// Passages in source order
    pub fn passages(&self) -> impl Iterator<Item = &Passage> {
        self.children.iter().filter_map(|child| match child {
            DocChild::Passage(p) => Some(p),
            _ => None,
        })
    }
}

/// Stream `<document>` elements out of one BioC member.
///
/// Each completed document is handed to `consume` and dropped before the
/// next one is parsed. `consume` returning [`Flow::Stop`] abandons the rest
/// of the stream immediately, leaving remaining input unread.
pub fn stream_documents<R, F>(reader: R, mut consume: F) -> Result<Flow>
where
    R: BufRead,
    F: FnMut(Document) -> Result<Flow>,
{
    // No trim_text: whitespace inside <text> runs is significant
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).context("XML parse error")? {
            Event::Start(e) if e.name().as_ref() == b"document" => {
                let document = parse_document(&mut reader)?;
                if consume(document)? == Flow::Stop {
                    return Ok(Flow::Stop);
                }
            }
            // a childless <document/> still reaches the assembler, which
            // rejects it for the missing identifier
            Event::Empty(e) if e.name().as_ref() == b"document" => {
                if consume(Document::default())? == Flow::Stop {
                    return Ok(Flow::Stop);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(Flow::Continue)
}

fn parse_document<R: BufRead>(reader: &mut Reader<R>) -> Result<Document> {
    let mut document = Document::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"id" => {
                    let id = read_text_content(reader, b"id")?;
                    document.children.push(DocChild::Id(id.trim().to_string()));
                }
                b"infon" => {
                    let infon = read_infon(reader, &e)?;
                    document.children.push(DocChild::Infon(infon));
                }
                b"passage" => {
                    let passage = parse_passage(reader)?;
                    document.children.push(DocChild::Passage(passage));
                }
                other => {
                    let tag = String::from_utf8_lossy(other).into_owned();
                    skip_element(reader, other)?;
                    document.children.push(DocChild::Other(tag));
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"id" => document.children.push(DocChild::Id(String::new())),
                b"infon" => document.children.push(DocChild::Infon(Infon {
                    key: infon_key(&e),
                    value: String::new(),
                })),
                b"passage" => document.children.push(DocChild::Passage(Passage::default())),
                other => {
                    let tag = String::from_utf8_lossy(other).into_owned();
                    document.children.push(DocChild::Other(tag));
                }
            },
            Event::End(e) if e.name().as_ref() == b"document" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(document)
}

fn parse_passage<R: BufRead>(reader: &mut Reader<R>) -> Result<Passage> {
    let mut passage = Passage::default();
    let mut depth = 1usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                // classification reads direct children only
                b"infon" if depth == 1 => {
                    let infon = read_infon(reader, &e)?;
                    passage.infons.push(infon);
                }
                // a <text> leaf counts at any nesting depth
                b"text" => {
                    passage.texts.push(read_text_content(reader, b"text")?);
                }
                _ => depth += 1,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"infon" if depth == 1 => passage.infons.push(Infon {
                    key: infon_key(&e),
                    value: String::new(),
                }),
                b"text" => passage.texts.push(String::new()),
                _ => {}
            },
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(passage)
}

fn infon_key(e: &BytesStart) -> String {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"key" {
            return String::from_utf8_lossy(&attr.value).into_owned();
        }
    }
    String::new()
}

fn read_infon<R: BufRead>(reader: &mut Reader<R>, e: &BytesStart) -> Result<Infon> {
    let key = infon_key(e);
    let value = read_text_content(reader, b"infon")?;
    Ok(Infon {
        key,
        value: value.trim().to_string(),
    })
}

/// Inner text of an element: all text content in document order, nested
/// markup boundaries ignored.
fn read_text_content<R: BufRead>(reader: &mut Reader<R>, end_tag: &[u8]) -> Result<String> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 1usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                depth -= 1;
                if depth == 0 && e.name().as_ref() == end_tag {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Consume an element subtree without keeping any of it
fn skip_element<R: BufRead>(reader: &mut Reader<R>, end_tag: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                depth -= 1;
                if depth == 0 && e.name().as_ref() == end_tag {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
