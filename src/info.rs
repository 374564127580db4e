use crate::annotation::AnnotationExtractor;
use crate::comments::CommentMap;
use crate::document::Info;
use crate::parser::ParsedFile;
use log::debug;

/// Reads the general API info annotations (`@title`, `@version`, ...).
///
/// They are taken from the comment lines opening a file and from the comment lines
/// directly above `fn main`, where blank lines and attributes may sit in between.
pub struct InfoParser;

impl InfoParser {
    /// Applies the info annotations of `parsed_file` to `info`. Values already present are
    /// overwritten.
    pub fn apply(parsed_file: &ParsedFile, info: &mut Info) {
        let comments = &parsed_file.comments;
        let source_lines: Vec<&str> = parsed_file.source.lines().collect();

        for line in Self::header_annotations(comments, source_lines.len()) {
            Self::apply_line(info, line);
        }

        let main_fn = AnnotationExtractor::collect_fn_decls(&parsed_file.syntax_tree)
            .into_iter()
            .find(|decl| decl.name == "main");
        if let Some(main_fn) = main_fn {
            for line in Self::main_annotations(comments, &source_lines, main_fn.line) {
                Self::apply_line(info, line);
            }
        }
    }

    /// Annotation lines starting at line 1.
    fn header_annotations(comments: &CommentMap, line_count: usize) -> Vec<&str> {
        (1..=line_count)
            .map_while(|line| comments.own_line(line).filter(|text| text.starts_with('@')))
            .collect()
    }

    /// Annotation lines above `fn main`, in file order.
    fn main_annotations<'c>(
        comments: &'c CommentMap,
        source_lines: &[&str],
        main_line: usize,
    ) -> Vec<&'c str> {
        let mut found = Vec::new();

        for line in (1..main_line).rev() {
            if let Some(text) = comments.own_line(line) {
                if text.starts_with('@') {
                    found.push(text);
                    continue;
                }
                break;
            }

            let raw = source_lines.get(line - 1).map(|l| l.trim()).unwrap_or("");
            if raw.is_empty() || raw.starts_with("#[") {
                continue;
            }
            break;
        }

        found.reverse();
        found
    }

    /// Applies a single `@key value...` line. Lines without a value are ignored.
    pub fn apply_line(info: &mut Info, line: &str) {
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            return;
        };
        let value = tokens.collect::<Vec<_>>().join(" ");
        if value.is_empty() {
            return;
        }

        let target = match key {
            "@title" => &mut info.title,
            "@version" => &mut info.version,
            "@description" => &mut info.description,
            "@contact.name" => &mut info.contact.name,
            "@contact.email" => &mut info.contact.email,
            "@license.name" => &mut info.license.name,
            "@license.url" => &mut info.license.url,
            _ => return,
        };
        debug!("Info {} = {}", key, value);
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn info_from(code: &str) -> Info {
        let parsed = ParsedFile::from_source(PathBuf::from("src/main.rs"), code.to_string())
            .unwrap();
        let mut info = Info::default();
        InfoParser::apply(&parsed, &mut info);
        info
    }

    #[test]
    fn test_header_annotations() {
        let info = info_from(
            "//! @title Chat API\n//! @version 2.1.0\n// @contact.email dev@example.com\n\n// @license.name MIT\nfn handler() {}\n",
        );

        assert_eq!(info.title, "Chat API");
        assert_eq!(info.version, "2.1.0");
        assert_eq!(info.contact.email, "dev@example.com");
        // not part of the opening run and not above main
        assert_eq!(info.license.name, "");
    }

    #[test]
    fn test_annotations_above_main() {
        let info = info_from(
            r#"use std::io;

// unrelated
fn helper() {}

// @title Realtime Gateway
// @description Sockets for the
//   dashboard
// @license.url https://example.com/license

#[tokio::main]
async fn main() {}
"#,
        );

        // the prose line stops the upward walk
        assert_eq!(info.license.url, "https://example.com/license");
        assert_eq!(info.title, "");
        assert_eq!(info.description, "");
    }

    #[test]
    fn test_annotations_above_main_skip_blank_and_attributes() {
        let info = info_from(
            "fn helper() {}\n\n// @title Gateway\n// @version 1.0.0\n\n#[allow(unused)]\nfn main() {}\n",
        );

        assert_eq!(info.title, "Gateway");
        assert_eq!(info.version, "1.0.0");
    }

    #[test]
    fn test_apply_line() {
        let mut info = Info::default();
        InfoParser::apply_line(&mut info, "@title   My   API");
        InfoParser::apply_line(&mut info, "@version");
        InfoParser::apply_line(&mut info, "@contact.name Ops Team");
        InfoParser::apply_line(&mut info, "@WebSocket Chat");

        assert_eq!(info.title, "My API");
        assert_eq!(info.version, "");
        assert_eq!(info.contact.name, "Ops Team");
    }
}
