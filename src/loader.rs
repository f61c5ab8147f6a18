//! Document loading collaborator.
//!
//! The pager only needs something that turns a path into a [`Document`];
//! [`MusicXmlLoader`] is the implementation used unless another is supplied.

use std::path::Path;

use crate::error::LoadError;
use crate::model::{Document, Score};
use crate::mxl::parse_mxl;
use crate::parser::parse_musicxml;

/// Turns a file path into a [`Document`]. Failure must not leave partial state.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, LoadError>;
}

/// Loads uncompressed MusicXML (`.musicxml`, `.xml`) and compressed MXL (`.mxl`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicXmlLoader;

impl DocumentLoader for MusicXmlLoader {
    fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let score = parse_bytes(&data, path.extension().and_then(|e| e.to_str()))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        log::info!(
            "loaded '{}': {} parts, {} measures",
            path.display(),
            score.parts.len(),
            score.measure_count()
        );
        Ok(Document::new(name, score))
    }
}

/// Parse MusicXML from raw bytes with an optional format hint.
/// If `extension` is None or unknown, the format is sniffed.
pub fn parse_bytes(data: &[u8], extension: Option<&str>) -> Result<Score, LoadError> {
    match extension {
        Some("mxl") => parse_mxl(data),
        Some("musicxml") | Some("xml") => parse_musicxml(std::str::from_utf8(data)?),
        _ => {
            if let Ok(xml) = std::str::from_utf8(data) {
                if xml.trim_start().starts_with('<') {
                    return parse_musicxml(xml);
                }
            }
            parse_mxl(data)
        }
    }
}
