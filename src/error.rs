//! Error types.
//!
//! Only loading and configuration can fail. Everything the pager does after a
//! document is installed corrects itself silently.

use std::path::PathBuf;

use thiserror::Error;

/// A document could not be loaded. No pager state is touched when this is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid UTF-8 in MusicXML file: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("XML parse error: {0}")]
    Xml(String),
    #[error("unsupported root element '{0}', only 'score-partwise' is supported")]
    UnsupportedRoot(String),
    #[error("failed to read MXL archive: {0}")]
    Archive(String),
    #[error("no MusicXML root file in archive (entries: {0:?})")]
    MissingRootFile(Vec<String>),
}

/// Pager configuration was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("zoom scale must be positive, got {0}")]
    NonPositiveScale(f64),
    #[error("DPI must be positive, got {0}")]
    NonPositiveDpi(f64),
}
