use std::fmt;
use std::path::PathBuf;

/// Result type alias for the extraction core
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Any of these aborts the run and no document is produced.
#[derive(Debug)]
pub enum Error {
    /// A directory entry or source file could not be read
    SourceRead { path: PathBuf, source: std::io::Error },
    /// A source file is not valid Rust syntax
    SourceParse { path: PathBuf, message: String },
    /// An output file could not be written
    WriteFile { path: PathBuf, source: std::io::Error },
    InvalidArgument(String),
    SerializationError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SourceRead { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Error::SourceParse { path, message } => {
                write!(f, "failed to parse {}: {}", path.display(), message)
            }
            Error::WriteFile { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SourceRead { source, .. } | Error::WriteFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML: {}", err))
    }
}

/// Kinds of non-fatal problems found while extracting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A directive was malformed and skipped
    DirectiveGrammar,
    /// `@Payload <TypeName>` named a type the catalog does not know
    PayloadResolutionMiss,
}

/// A non-fatal warning collected during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Source file the annotation came from, when known
    pub path: Option<PathBuf>,
    /// Name of the function the annotation block is attached to
    pub declaration: Option<String>,
    /// Line of that function
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn grammar(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::DirectiveGrammar,
            path: None,
            declaration: None,
            line: None,
            message: message.into(),
        }
    }

    pub fn payload_miss(type_name: &str) -> Self {
        Self {
            kind: DiagnosticKind::PayloadResolutionMiss,
            path: None,
            declaration: None,
            line: None,
            message: format!("payload type `{}` not found in type catalog", type_name),
        }
    }

    /// Attach the location the diagnostic was raised at.
    pub fn at(mut self, path: PathBuf, declaration: &str, line: usize) -> Self {
        self.path = Some(path);
        self.declaration = Some(declaration.to_string());
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}", path.display())?;
            if let Some(line) = self.line {
                write!(f, ":{}", line)?;
            }
            if let Some(decl) = &self.declaration {
                write!(f, " ({})", decl)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_read_error_mentions_path() {
        let err = Error::SourceRead {
            path: PathBuf::from("src/handlers.rs"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("src/handlers.rs"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_diagnostic_display_with_location() {
        let diag = Diagnostic::payload_miss("Missing").at(PathBuf::from("a.rs"), "chat", 12);
        assert_eq!(diag.kind, DiagnosticKind::PayloadResolutionMiss);
        assert_eq!(
            diag.to_string(),
            "a.rs:12 (chat): payload type `Missing` not found in type catalog"
        );
    }
}
