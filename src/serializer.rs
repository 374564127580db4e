//! Serialization module for converting WebSocket API documents to YAML or JSON format.
//!
//! This module provides functions to serialize documents into standard formats, read them
//! back, and write them to files.

use crate::document::Document;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML format.
///
/// # Arguments
///
/// * `doc` - The document to serialize
///
/// # Returns
///
/// Returns the YAML string representation of the document.
///
/// # Example
///
/// ```
/// use wsapi_from_source::document::{Document, Info};
/// use wsapi_from_source::serializer::serialize_yaml;
///
/// let doc = Document {
///     info: Info {
///         title: "Chat API".to_string(),
///         version: "1.0.0".to_string(),
///         ..Info::default()
///     },
///     endpoints: vec![],
/// };
/// let yaml = serialize_yaml(&doc).unwrap();
/// assert!(yaml.contains("title: Chat API"));
/// ```
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Serializing document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes a document to JSON format with pretty printing.
///
/// The output is indented for readability, making it suitable for human review and
/// version control.
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing document to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Decodes a document from YAML. JSON input is accepted as well, being a subset of YAML.
pub fn deserialize_yaml(content: &str) -> Result<Document> {
    debug!("Deserializing document from {} bytes", content.len());
    Ok(serde_yaml::from_str(content)?)
}

/// Reads and decodes a document file.
pub fn read_document(path: &Path) -> Result<Document> {
    debug!("Reading document: {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| Error::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    deserialize_yaml(&content)
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does. Missing parent
/// directories are created.
///
/// # Arguments
///
/// * `content` - The string content to write
/// * `path` - The file path to write to
///
/// # Errors
///
/// Returns [`Error::WriteFile`] if a directory or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::WriteFile {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
