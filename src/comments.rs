//! Line comment recovery.
//!
//! `syn` discards ordinary `//` comments, so annotation blocks are recovered with a
//! tree-sitter parse of the same text. Every `line_comment` node is recorded with its line
//! number and whether it sits on a line of its own. Comment markers inside string, raw
//! string and char literals or block comments never produce a `line_comment` node.

use std::collections::BTreeMap;

/// A single `//`, `///` or `//!` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineComment {
    /// 1-based line number
    pub line: usize,
    /// Comment body with markers and surrounding whitespace removed
    pub text: String,
    /// `false` when code precedes the comment on the same line
    pub own_line: bool,
}

/// A run of own-line comments on consecutive lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub start_line: usize,
    pub end_line: usize,
    pub lines: Vec<String>,
}

/// All line comments of one file, indexed by line.
#[derive(Debug, Default)]
pub struct CommentMap {
    by_line: BTreeMap<usize, LineComment>,
}

impl CommentMap {
    /// Collects the line comments of `source`.
    ///
    /// Fails only if the Rust grammar cannot be loaded or tree-sitter gives up on the text.
    pub fn new(source: &str) -> Result<Self, String> {
        let by_line = lex_line_comments(source)?
            .into_iter()
            .map(|c| (c.line, c))
            .collect();
        Ok(Self { by_line })
    }

    /// Comment groups in source order. Trailing comments never join a group.
    pub fn groups(&self) -> Vec<CommentGroup> {
        let mut groups: Vec<CommentGroup> = Vec::new();

        for comment in self.by_line.values().filter(|c| c.own_line) {
            match groups.last_mut() {
                Some(group) if group.end_line + 1 == comment.line => {
                    group.end_line = comment.line;
                    group.lines.push(comment.text.clone());
                }
                _ => groups.push(CommentGroup {
                    start_line: comment.line,
                    end_line: comment.line,
                    lines: vec![comment.text.clone()],
                }),
            }
        }

        groups
    }

    /// Text of the comment that trails code on `line`.
    pub fn trailing(&self, line: usize) -> Option<&str> {
        self.by_line
            .get(&line)
            .filter(|c| !c.own_line)
            .map(|c| c.text.as_str())
    }

    /// Text of the comment occupying `line` on its own.
    pub fn own_line(&self, line: usize) -> Option<&str> {
        self.by_line
            .get(&line)
            .filter(|c| c.own_line)
            .map(|c| c.text.as_str())
    }
}

/// Parses `source` with tree-sitter and returns every line comment in order.
pub fn lex_line_comments(source: &str) -> Result<Vec<LineComment>, String> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_rust::LANGUAGE.into())
        .map_err(|e| e.to_string())?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| "tree-sitter could not parse the source".to_string())?;

    let mut comments = Vec::new();
    visit_comments(&tree.root_node(), source, &mut comments);
    comments.sort_by_key(|c| c.line);
    Ok(comments)
}

fn visit_comments(node: &tree_sitter::Node, source: &str, comments: &mut Vec<LineComment>) {
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        match child.kind() {
            "line_comment" => {
                let start = child.start_byte();
                let text = &source[start..child.end_byte()];
                let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);

                comments.push(LineComment {
                    line: child.start_position().row + 1,
                    text: strip_markers(text.strip_prefix("//").unwrap_or(text)),
                    own_line: source[line_start..start].trim().is_empty(),
                });
            }
            "block_comment" => {}
            _ => visit_comments(&child, source, comments),
        }
    }
}

fn strip_markers(raw: &str) -> String {
    let body = raw
        .strip_prefix('/')
        .or_else(|| raw.strip_prefix('!'))
        .unwrap_or(raw);
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_strips_markers() {
        let source = "//! @title Demo\n// @WebSocket Chat\n/// @URL /ws\n//\t{\nfn ws() {}\n";
        let texts: Vec<String> = lex_line_comments(source)
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();

        assert_eq!(texts, vec!["@title Demo", "@WebSocket Chat", "@URL /ws", "{"]);
    }

    #[test]
    fn test_lex_ignores_comment_markers_in_literals() {
        let source = r####"
fn demo<'a>(x: &'a str) -> usize { // trailing
    let a = "// @WebSocket NotAComment";
    let b = r#"
// @WebSocket AlsoNot
"#;
    let c = '/';
    /* block
    // @WebSocket Hidden
    */
    a.len() + b.len() + x.len() + c.len_utf8()
}
// @WebSocket Real
"####;
        let comments = lex_line_comments(source).unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "trailing");
        assert!(!comments[0].own_line);
        assert_eq!(comments[0].line, 2);
        assert_eq!(comments[1].text, "@WebSocket Real");
        assert!(comments[1].own_line);
        assert_eq!(comments[1].line, 13);
    }

    #[test]
    fn test_groups_split_on_blank_lines_and_code() {
        let source = "\
// @WebSocket Chat
// @URL /chat

// @Message hello
// @Send
fn chat() {} // @Ignored
";
        let map = CommentMap::new(source).unwrap();
        let groups = map.groups();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].start_line, 1);
        assert_eq!(groups[0].end_line, 2);
        assert_eq!(groups[0].lines, vec!["@WebSocket Chat", "@URL /chat"]);
        assert_eq!(groups[1].lines, vec!["@Message hello", "@Send"]);
        assert_eq!(map.trailing(6), Some("@Ignored"));
        assert_eq!(map.own_line(6), None);
        assert_eq!(map.own_line(4), Some("@Message hello"));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let source = "const S: &str = \"a \\\" // b\"; // real\n";
        let comments = lex_line_comments(source).unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "real");
    }

    #[test]
    fn test_indented_comment_inside_body_is_own_line() {
        let source = "fn f() {\n    // @Message inner\n    let _x = 1;\n}\n";
        let comments = lex_line_comments(source).unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].line, 2);
        assert!(comments[0].own_line);
    }
}
