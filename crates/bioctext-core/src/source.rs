//! Archive dispatch over local corpus files.
//!
//! Inputs come in exactly three container encodings, selected by filename
//! suffix: plain XML, single-file gzip XML (`.xml.gz`), and gzip tar
//! bundles of XML members (`.tar.gz`/`.tgz`). [`visit_members`] hides the
//! difference behind one member-stream callback, opening each stream
//! immediately before the callback runs and closing it on every exit path.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::{GzDecoder, MultiGzDecoder};

/// Buffer size for member readers (256KB)
const MEMBER_BUF_SIZE: usize = 256 * 1024;

/// Container encoding of an input path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Uncompressed XML file
    Xml,
    /// Single gzip-compressed XML file
    XmlGz,
    /// Gzip-compressed tar archive of XML members
    TarGz,
}

/// Error opening or walking a container
#[derive(Debug)]
pub enum SourceError {
    /// Container encoding outside the three supported kinds
    Unsupported { path: PathBuf },
    /// Failed to open or read the container (corrupt gzip/tar framing included)
    Io { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported { path } => {
                write!(
                    f,
                    "unsupported container encoding (not implemented): {}",
                    path.display()
                )
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unsupported { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Control flow verdict from a member or document callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Classify an input path by filename suffix.
///
/// A `.gz` that is neither `.xml.gz` nor a tar bundle (and a bare `.tar`)
/// is rejected rather than fed to the XML parser as-is; everything else
/// without a recognized suffix is assumed to be plain XML.
pub fn classify(path: &Path) -> Result<ArchiveKind, SourceError> {
    let name = path.to_string_lossy();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Ok(ArchiveKind::TarGz)
    } else if name.ends_with(".xml.gz") {
        Ok(ArchiveKind::XmlGz)
    } else if name.ends_with(".gz") || name.ends_with(".tar") {
        Err(SourceError::Unsupported {
            path: path.to_path_buf(),
        })
    } else {
        Ok(ArchiveKind::Xml)
    }
}

fn open(path: &Path) -> Result<File, SourceError> {
    File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Walk the member streams of one input path in archive order.
///
/// Plain and gzip XML paths have exactly one member; tar bundles yield one
/// member per regular file with an `.xml` extension (anything else is
/// silently skipped). The callback returning [`Flow::Stop`] abandons the
/// remaining members, leaving the rest of the archive unread.
pub fn visit_members<E, F>(path: &Path, mut visit: F) -> Result<Flow, E>
where
    E: From<SourceError>,
    F: FnMut(&str, &mut dyn BufRead) -> Result<Flow, E>,
{
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };

    match classify(path)? {
        ArchiveKind::Xml => {
            let mut reader = BufReader::with_capacity(MEMBER_BUF_SIZE, open(path)?);
            visit(&path.to_string_lossy(), &mut reader)
        }
        ArchiveKind::XmlGz => {
            // MultiGzDecoder: corpus providers concatenate gzip members
            let gz = MultiGzDecoder::new(open(path)?);
            let mut reader = BufReader::with_capacity(MEMBER_BUF_SIZE, gz);
            visit(&path.to_string_lossy(), &mut reader)
        }
        ArchiveKind::TarGz => {
            let mut archive = tar::Archive::new(GzDecoder::new(open(path)?));
            for entry in archive.entries().map_err(io_err)? {
                let entry = entry.map_err(io_err)?;
                if !entry.header().entry_type().is_file() {
                    continue;
                }
                let name = {
                    let member_path = entry.path().map_err(io_err)?;
                    if member_path.extension().is_none_or(|ext| ext != "xml") {
                        continue;
                    }
                    member_path.to_string_lossy().into_owned()
                };
                let mut reader = BufReader::with_capacity(MEMBER_BUF_SIZE, entry);
                if visit(&name, &mut reader)? == Flow::Stop {
                    return Ok(Flow::Stop);
                }
            }
            Ok(Flow::Continue)
        }
    }
}
