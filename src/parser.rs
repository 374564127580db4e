use crate::comments::CommentMap;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// AST (Abstract Syntax Tree) parser for Rust source files.
///
/// The `AstParser` uses the `syn` crate to parse Rust source code into a syntax tree. The
/// original text is kept next to the tree because comments, which carry the WebSocket
/// annotations, are not part of `syn`'s tree.
///
/// # Example
///
/// ```no_run
/// use wsapi_from_source::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/main.rs")).unwrap();
/// println!("Parsed {} items", parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Raw file content
    pub source: String,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
    /// Line comments, which the syntax tree does not keep
    pub comments: CommentMap,
}

impl ParsedFile {
    /// Parses in-memory source. Used by tests and by [`AstParser::parse_file`].
    pub fn from_source(path: PathBuf, source: String) -> Result<Self> {
        let syntax_tree = syn::parse_file(&source).map_err(|e| Error::SourceParse {
            path: path.clone(),
            message: format!("{} (line {})", e, e.span().start().line),
        })?;
        let comments = CommentMap::new(&source).map_err(|message| Error::SourceParse {
            path: path.clone(),
            message,
        })?;

        Ok(Self {
            path,
            source,
            syntax_tree,
            comments,
        })
    }

    /// Module name used to qualify the types declared in this file.
    ///
    /// `handlers/chat.rs` is `chat`, `handlers/mod.rs` is `handlers`, and crate roots
    /// (`lib.rs`, `main.rs`) are `crate`.
    pub fn module_name(&self) -> String {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        match stem {
            "lib" | "main" => "crate".to_string(),
            "mod" => self
                .path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str())
                .unwrap_or("crate")
                .to_string(),
            other => other.to_string(),
        }
    }
}

/// Whether the attributes mark an item as `#[cfg(test)]`.
pub fn is_cfg_test(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .map(|ident| ident == "test")
                .unwrap_or(false)
    })
}

impl AstParser {
    /// Parses a single Rust source file into an AST.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceRead`] if the file cannot be read and [`Error::SourceParse`] if
    /// it contains invalid Rust syntax. Both carry the offending path.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let source = fs::read_to_string(path).map_err(|e| Error::SourceRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        ParsedFile::from_source(path.to_path_buf(), source)
    }

    /// Parses multiple Rust source files, stopping at the first failure.
    ///
    /// A single unreadable or unparsable file aborts the whole batch, so callers never work
    /// with a partial view of the source tree.
    pub fn parse_files(paths: &[PathBuf]) -> Result<Vec<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let parsed = paths
            .iter()
            .map(|path| Self::parse_file(path))
            .collect::<Result<Vec<_>>>()?;

        debug!("Parsing complete: {} files", parsed.len());
        Ok(parsed)
    }
}
