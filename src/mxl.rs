//! MXL handler: reads compressed MusicXML (.mxl) archives.
//!
//! An .mxl file is a ZIP archive whose `META-INF/container.xml` names the
//! root MusicXML file. Archives without a container fall back to the first
//! MusicXML entry outside `META-INF/`.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::LoadError;
use crate::model::Score;
use crate::parser;

const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Read and parse a .mxl file from raw bytes.
pub fn parse_mxl(data: &[u8]) -> Result<Score, LoadError> {
    let xml = extract_musicxml_from_mxl(data)?;
    parser::parse_musicxml(&xml)
}

/// Extract the root MusicXML document from .mxl bytes.
pub fn extract_musicxml_from_mxl(data: &[u8]) -> Result<String, LoadError> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| LoadError::Archive(e.to_string()))?;
    let root_path = root_file_path(&mut archive)?;
    read_entry(&mut archive, &root_path)
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<String, LoadError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| LoadError::Archive(format!("'{name}': {e}")))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| LoadError::Archive(format!("'{name}': {e}")))?;
    Ok(xml)
}

fn root_file_path(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<String, LoadError> {
    let has_container = archive.file_names().any(|n| n == CONTAINER_PATH);
    if has_container {
        let container = read_entry(archive, CONTAINER_PATH)?;
        let doc = roxmltree::Document::parse(&container)
            .map_err(|e| LoadError::Xml(format!("container.xml: {e}")))?;
        return doc
            .descendants()
            .filter(|n| n.tag_name().name() == "rootfile")
            .find_map(|n| n.attribute("full-path"))
            .map(String::from)
            .ok_or_else(|| LoadError::MissingRootFile(vec![CONTAINER_PATH.to_string()]));
    }

    let names: Vec<String> = archive.file_names().map(String::from).collect();
    names
        .iter()
        .find(|name| {
            !name.starts_with("META-INF/") && (name.ends_with(".xml") || name.ends_with(".musicxml"))
        })
        .cloned()
        .ok_or(LoadError::MissingRootFile(names))
}
