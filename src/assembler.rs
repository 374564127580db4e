use crate::annotation::AnnotationExtractor;
use crate::document::{Document, Info};
use crate::document_builder::DocumentBuilder;
use crate::error::{Diagnostic, Error, Result};
use crate::info::InfoParser;
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::type_catalog::TypeCatalog;
use log::{debug, info, warn};
use std::path::Path;

/// A document together with the non-fatal problems met while building it
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extracts the WebSocket API document of the source tree at `source_root`.
///
/// Diagnostics are logged as warnings and dropped. Use [`extract`] to keep them.
pub fn extract_document(source_root: &Path) -> Result<Document> {
    extract(source_root).map(|extraction| extraction.document)
}

/// Extracts the WebSocket API document of the source tree at `source_root`.
///
/// # Errors
///
/// Fails if `source_root` is not a directory, or if any file below it cannot be read or
/// parsed. No partial document is produced in that case.
pub fn extract(source_root: &Path) -> Result<Extraction> {
    if !source_root.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "source root is not a directory: {}",
            source_root.display()
        )));
    }

    info!("Scanning {}", source_root.display());
    let scan_result = FileScanner::new(source_root.to_path_buf()).scan()?;
    info!("Found {} Rust files", scan_result.source_files.len());

    let parsed_files = AstParser::parse_files(&scan_result.source_files)?;
    let extraction = assemble(&parsed_files);

    for diagnostic in &extraction.diagnostics {
        warn!("{}", diagnostic);
    }
    info!(
        "Extracted {} endpoints ({} warnings)",
        extraction.document.endpoints.len(),
        extraction.diagnostics.len()
    );

    Ok(extraction)
}

/// Builds the document from already parsed files, in the given order.
///
/// The type catalog is built from every file before any annotation is interpreted, so a
/// payload type may be declared anywhere in the tree.
pub fn assemble(parsed_files: &[ParsedFile]) -> Extraction {
    let catalog = TypeCatalog::build(parsed_files);
    let builder = DocumentBuilder::new(&catalog);

    let mut info = Info::default();
    let mut endpoints = Vec::new();
    let mut diagnostics = Vec::new();

    for parsed_file in parsed_files {
        InfoParser::apply(parsed_file, &mut info);

        for decl in AnnotationExtractor::extract(parsed_file) {
            let (endpoint, found) = builder.build_endpoint(&decl.lines);
            diagnostics.extend(
                found
                    .into_iter()
                    .map(|d| d.at(parsed_file.path.clone(), &decl.name, decl.line)),
            );

            if let Some(endpoint) = endpoint {
                debug!(
                    "{}: endpoint {} from {}",
                    parsed_file.path.display(),
                    endpoint.name,
                    decl.name
                );
                endpoints.push(endpoint);
            }
        }
    }

    Extraction {
        document: Document { info, endpoints },
        diagnostics,
    }
}
