//! WebSocket API doc generator - WebSocket API documentation from annotated Rust sources.
//!
//! This library builds a structured WebSocket API document from comment annotations placed
//! above handler functions. Annotations use a small directive grammar (`@WebSocket`, `@URL`,
//! `@Message`, `@Send`, `@Receive`, `@Payload`, ...). Payloads may be written inline as JSON
//! or reference a struct declared anywhere in the tree, in which case an example payload is
//! synthesized from the struct's fields.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans a source tree for Rust files
//! 2. [`parser`] - Parses Rust source files into syntax trees
//! 3. [`comments`] - Recovers line comments, which `syn` does not keep
//! 4. [`type_catalog`] - Indexes the struct declarations used as payload types
//! 5. [`annotation`] - Attaches annotation blocks to the functions they document
//! 6. [`directive`] - Parses directive lines into typed directives
//! 7. [`document_builder`] - Turns a directive block into an endpoint
//! 8. [`info`] - Reads the general API info annotations
//! 9. [`assembler`] - Runs the steps above over a whole tree
//! 10. [`serializer`] / [`validator`] - Encode, decode and check documents
//!
//! # Example Usage
//!
//! ```no_run
//! use wsapi_from_source::{assembler, serializer::serialize_yaml};
//! use std::path::Path;
//!
//! let extraction = assembler::extract(Path::new("./my-service")).unwrap();
//! for diagnostic in &extraction.diagnostics {
//!     eprintln!("warning: {}", diagnostic);
//! }
//! println!("{}", serialize_yaml(&extraction.document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod annotation;
pub mod assembler;
pub mod cli;
pub mod comments;
pub mod directive;
pub mod document;
pub mod document_builder;
pub mod error;
pub mod info;
pub mod parser;
pub mod scanner;
pub mod serializer;
pub mod type_catalog;
pub mod validator;

pub use assembler::{extract, extract_document, Extraction};
pub use document::Document;
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
