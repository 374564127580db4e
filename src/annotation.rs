//! Annotation block extraction.
//!
//! Finds the comment groups of a file that contain directives, keeps their directive lines
//! (plus the lines of any JSON literal written under a directive) and attaches each block to
//! the first function declared after it. Several blocks in front of the same function are
//! concatenated in file order.

use crate::parser::{is_cfg_test, ParsedFile};
use log::debug;
use std::collections::BTreeMap;
use syn::spanned::Spanned;
use syn::visit::Visit;

/// Extracts annotation blocks from parsed files
pub struct AnnotationExtractor;

/// The merged annotation block of one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDecl {
    /// Function name, `Type::method` for methods
    pub name: String,
    /// Line of the `fn` keyword
    pub line: usize,
    /// Directive and literal lines, in file order
    pub lines: Vec<String>,
}

/// Position of a function-like declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnDecl {
    pub name: String,
    pub line: usize,
}

impl AnnotationExtractor {
    /// Returns the annotated functions of `parsed_file` in declaration order.
    pub fn extract(parsed_file: &ParsedFile) -> Vec<AnnotatedDecl> {
        let visitor = FnVisitor::collect(&parsed_file.syntax_tree);
        let decls = visitor.decls;

        // decl index -> merged block
        let mut blocks: BTreeMap<usize, Vec<String>> = BTreeMap::new();

        for group in parsed_file.comments.groups() {
            let block = Self::extract_block(&group.lines);
            if block.is_empty() {
                continue;
            }
            let in_test_module = visitor
                .test_modules
                .iter()
                .any(|&(start, end)| group.start_line >= start && group.end_line <= end);
            if in_test_module {
                debug!(
                    "{}: block at line {} is inside a test module",
                    parsed_file.path.display(),
                    group.start_line
                );
                continue;
            }

            match decls.iter().position(|decl| decl.line > group.end_line) {
                Some(idx) => {
                    debug!(
                        "{}: block at lines {}-{} documents {}",
                        parsed_file.path.display(),
                        group.start_line,
                        group.end_line,
                        decls[idx].name
                    );
                    blocks.entry(idx).or_default().extend(block);
                }
                None => debug!(
                    "{}: block at line {} is not followed by any function",
                    parsed_file.path.display(),
                    group.start_line
                ),
            }
        }

        blocks
            .into_iter()
            .map(|(idx, lines)| AnnotatedDecl {
                name: decls[idx].name.clone(),
                line: decls[idx].line,
                lines,
            })
            .collect()
    }

    /// Keeps the directive lines of a comment group and the literal lines under them.
    ///
    /// A non-directive line is kept once the block has started if it opens or closes a
    /// bracket literal, or while a literal opened above is still unbalanced.
    pub fn extract_block(comment_lines: &[String]) -> Vec<String> {
        let mut block = Vec::new();
        let mut depth: i32 = 0;

        for line in comment_lines {
            if line.starts_with('@') {
                block.push(line.clone());
                let argument = line
                    .split_once(char::is_whitespace)
                    .map(|(_, arg)| arg.trim_start())
                    .unwrap_or("");
                depth = if starts_literal(argument) {
                    bracket_delta(argument).max(0)
                } else {
                    0
                };
            } else if !block.is_empty() && (depth > 0 || is_literal_edge(line)) {
                block.push(line.clone());
                depth = (depth + bracket_delta(line)).max(0);
            }
        }

        block
    }

    /// Function-like declarations of a file, sorted by position.
    /// `#[cfg(test)]` modules and functions are left out.
    pub fn collect_fn_decls(file: &syn::File) -> Vec<FnDecl> {
        FnVisitor::collect(file).decls
    }
}

fn starts_literal(text: &str) -> bool {
    text.starts_with('{') || text.starts_with('[')
}

fn is_literal_edge(line: &str) -> bool {
    line.starts_with(['{', '}', '[', ']'])
}

/// Net count of opened brackets, ignoring those inside JSON strings.
fn bracket_delta(text: &str) -> i32 {
    let mut delta = 0;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => delta += 1,
            '}' | ']' => delta -= 1,
            _ => {}
        }
    }

    delta
}

/// Visitor recording free functions, methods and trait functions.
/// Function bodies and test modules are not entered.
#[derive(Default)]
struct FnVisitor {
    decls: Vec<FnDecl>,
    current_impl: Option<String>,
    /// Line ranges of `#[cfg(test)]` modules
    test_modules: Vec<(usize, usize)>,
}

impl FnVisitor {
    fn collect(file: &syn::File) -> Self {
        let mut visitor = Self::default();
        visitor.visit_file(file);
        visitor.decls.sort_by_key(|decl| decl.line);
        visitor
    }

    fn record(&mut self, sig: &syn::Signature) {
        let name = match &self.current_impl {
            Some(owner) => format!("{}::{}", owner, sig.ident),
            None => sig.ident.to_string(),
        };
        self.decls.push(FnDecl {
            name,
            line: sig.fn_token.span.start().line,
        });
    }
}

impl<'ast> Visit<'ast> for FnVisitor {
    fn visit_item_fn(&mut self, item_fn: &'ast syn::ItemFn) {
        if !is_cfg_test(&item_fn.attrs) {
            self.record(&item_fn.sig);
        }
    }

    fn visit_item_mod(&mut self, item_mod: &'ast syn::ItemMod) {
        if is_cfg_test(&item_mod.attrs) {
            let span = item_mod.span();
            self.test_modules
                .push((span.start().line, span.end().line));
            return;
        }
        syn::visit::visit_item_mod(self, item_mod);
    }

    fn visit_item_impl(&mut self, item_impl: &'ast syn::ItemImpl) {
        let owner = match item_impl.self_ty.as_ref() {
            syn::Type::Path(type_path) => type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident.to_string()),
            _ => None,
        };
        let previous = std::mem::replace(&mut self.current_impl, owner);
        syn::visit::visit_item_impl(self, item_impl);
        self.current_impl = previous;
    }

    fn visit_item_trait(&mut self, item_trait: &'ast syn::ItemTrait) {
        let previous = self.current_impl.replace(item_trait.ident.to_string());
        syn::visit::visit_item_trait(self, item_trait);
        self.current_impl = previous;
    }

    fn visit_impl_item_fn(&mut self, impl_fn: &'ast syn::ImplItemFn) {
        self.record(&impl_fn.sig);
    }

    fn visit_trait_item_fn(&mut self, trait_fn: &'ast syn::TraitItemFn) {
        self.record(&trait_fn.sig);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parsed(code: &str) -> ParsedFile {
        ParsedFile::from_source(PathBuf::from("src/ws.rs"), code.to_string()).unwrap()
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_block_keeps_directives_only() {
        let group = lines(&[
            "Chat handler.",
            "@WebSocket Chat",
            "Some prose in between",
            "@URL /chat",
        ]);

        assert_eq!(
            AnnotationExtractor::extract_block(&group),
            lines(&["@WebSocket Chat", "@URL /chat"])
        );
        assert!(AnnotationExtractor::extract_block(&lines(&["{", "}"])).is_empty());
    }

    #[test]
    fn test_extract_block_keeps_multiline_literals() {
        let group = lines(&[
            "@Payload",
            "",
            "{",
            "\"user\": \"Ali\",",
            "\"tags\": [\"a\", \"}\"]",
            "}",
            "",
            "trailing prose",
            "@Send",
        ]);

        assert_eq!(
            AnnotationExtractor::extract_block(&group),
            lines(&[
                "@Payload",
                "{",
                "\"user\": \"Ali\",",
                "\"tags\": [\"a\", \"}\"]",
                "}",
                "@Send",
            ])
        );
    }

    #[test]
    fn test_extract_block_literal_opened_on_directive_line() {
        let group = lines(&["@Example {", "\"n\": 1", "}", "not kept"]);

        assert_eq!(
            AnnotationExtractor::extract_block(&group),
            lines(&["@Example {", "\"n\": 1", "}"])
        );
    }

    #[test]
    fn test_blocks_attach_to_next_function_and_merge_in_order() {
        let code = r#"
// @WebSocket Chat
// @URL /chat

// plain comment

// @Message hello
// @Send
#[allow(dead_code)]
fn chat_handler() {}

// @WebSocket Other
fn other_handler() {
    // @Message inner
}

fn trailing() {}
"#;
        let decls = AnnotationExtractor::extract(&parsed(code));

        assert_eq!(decls.len(), 3);
        assert_eq!(decls[0].name, "chat_handler");
        assert_eq!(
            decls[0].lines,
            lines(&["@WebSocket Chat", "@URL /chat", "@Message hello", "@Send"])
        );
        assert_eq!(decls[1].name, "other_handler");
        assert_eq!(decls[1].lines, lines(&["@WebSocket Other"]));
        // a comment inside a body goes to the next declaration
        assert_eq!(decls[2].name, "trailing");
        assert_eq!(decls[2].lines, lines(&["@Message inner"]));
    }

    #[test]
    fn test_block_may_skip_over_non_function_items() {
        let code = r#"
/// @WebSocket Feed
/// @URL /feed
pub struct FeedState { pub count: u32 }

pub async fn feed() {}
"#;
        let decls = AnnotationExtractor::extract(&parsed(code));

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "feed");
        assert_eq!(decls[0].line, 6);
    }

    #[test]
    fn test_methods_and_trait_functions() {
        let code = r#"
struct Server;

impl Server {
    // @WebSocket Ticker
    pub fn ticker(&self) {}
}

trait Socket {
    // @WebSocket Stream
    fn stream(&self);
}
"#;
        let decls = AnnotationExtractor::extract(&parsed(code));
        let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["Server::ticker", "Socket::stream"]);
    }

    #[test]
    fn test_block_after_last_function_is_dropped() {
        let code = "fn a() {}\n// @WebSocket Orphan\n";

        assert!(AnnotationExtractor::extract(&parsed(code)).is_empty());
    }

    #[test]
    fn test_test_modules_are_skipped() {
        let code = r#"
// @WebSocket Live
pub fn live() {}

#[cfg(test)]
mod tests {
    // @WebSocket Fixture
    fn fixture() {}

    #[test]
    fn it_works() {}
}

pub fn after_tests() {}
"#;
        let parsed_file = parsed(code);
        let decls = AnnotationExtractor::extract(&parsed_file);
        let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["live"]);
        assert_eq!(
            AnnotationExtractor::collect_fn_decls(&parsed_file.syntax_tree)
                .into_iter()
                .map(|d| d.name)
                .collect::<Vec<_>>(),
            vec!["live", "after_tests"]
        );
    }

    #[test]
    fn test_bracket_delta_ignores_strings() {
        assert_eq!(bracket_delta("{"), 1);
        assert_eq!(bracket_delta("\"a\": \"{[\","), 0);
        assert_eq!(bracket_delta("\"q\\\"}\" }]"), -2);
    }
}
