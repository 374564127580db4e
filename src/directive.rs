//! Directive grammar.
//!
//! An annotation block is a list of lines, each either a directive (`@Name args...`) or a
//! literal continuation line belonging to the directive above it (multi-line JSON). This
//! module turns such a block into typed [`Directive`] values. Malformed directives are
//! dropped with a [`Diagnostic`]; directives outside the WebSocket grammar are ignored.

use crate::document::{Direction, ParamLocation};
use crate::error::Diagnostic;
use crate::type_catalog::parse_example_literal;
use log::debug;
use serde_json::Value;

/// The marker that opens a WebSocket documentation block
pub const WEBSOCKET_MARKER: &str = "@WebSocket";

/// One interpreted directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    WebSocket { name: String },
    Group(String),
    Url(String),
    Description(String),
    Tags(Vec<String>),
    ConnectionParam(ConnectionParamDirective),
    Message { exchange_type: String },
    /// `@Send`, `@Receive` or `@Direction <send|receive>`
    Direction(Direction),
    Payload(PayloadSource),
    Example(Value),
    Error {
        code: String,
        description: String,
        example: Option<Value>,
    },
    Deprecated,
}

impl Directive {
    /// Keyword as written in the source, for diagnostics
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::WebSocket { .. } => WEBSOCKET_MARKER,
            Directive::Group(_) => "@Group",
            Directive::Url(_) => "@URL",
            Directive::Description(_) => "@Description",
            Directive::Tags(_) => "@Tags",
            Directive::ConnectionParam(_) => "@ConnectionParam",
            Directive::Message { .. } => "@Message",
            Directive::Direction(Direction::Send) => "@Send",
            Directive::Direction(Direction::Receive) => "@Receive",
            Directive::Payload(_) => "@Payload",
            Directive::Example(_) => "@Example",
            Directive::Error { .. } => "@Error",
            Directive::Deprecated => "@Deprecated",
        }
    }
}

/// Arguments of `@ConnectionParam <name> <in> <type> <required|optional> [desc...]`
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionParamDirective {
    pub name: String,
    pub location: ParamLocation,
    pub type_name: String,
    pub required: bool,
    pub description: String,
}

/// What `@Payload` points at
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadSource {
    /// An inline JSON literal, already parsed
    Inline(Value),
    /// A record type name to look up in the type catalog
    TypeRef(String),
}

/// Whether the block documents a WebSocket endpoint at all.
pub fn is_websocket_block(lines: &[String]) -> bool {
    lines
        .iter()
        .any(|line| line.split_whitespace().next() == Some(WEBSOCKET_MARKER))
}

/// Parses a merged annotation block into directives, in order.
pub fn parse_directives(lines: &[String]) -> (Vec<Directive>, Vec<Diagnostic>) {
    let mut directives = Vec::new();
    let mut diagnostics = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].as_str();
        i += 1;

        if !line.starts_with('@') {
            debug!("Dropping stray literal line: {}", line);
            continue;
        }

        let mut body = Vec::new();
        while i < lines.len() && !lines[i].starts_with('@') {
            body.push(lines[i].as_str());
            i += 1;
        }

        match parse_line(line, &body) {
            Ok(Some(directive)) => directives.push(directive),
            Ok(None) => {}
            Err(diagnostic) => {
                debug!("Skipping directive: {}", diagnostic.message);
                diagnostics.push(diagnostic);
            }
        }
    }

    (directives, diagnostics)
}

/// Parses one directive line together with its literal body lines.
///
/// `Ok(None)` means the directive is not part of the WebSocket grammar.
pub fn parse_line(line: &str, body: &[&str]) -> Result<Option<Directive>, Diagnostic> {
    let mut tokens = line.split_whitespace();
    let name = match tokens.next() {
        Some(name) => name,
        None => return Ok(None),
    };
    let args: Vec<&str> = tokens.collect();
    let rest = line[name.len()..].trim();
    let literal = join_literal(rest, body);

    let directive = match name {
        WEBSOCKET_MARKER => Directive::WebSocket {
            name: first_arg(name, &args)?,
        },
        "@Group" => Directive::Group(required_text(name, &args)?),
        "@URL" => Directive::Url(first_arg(name, &args)?),
        "@Description" => Directive::Description(rest.to_string()),
        "@Tags" => Directive::Tags(parse_tags(name, &args)?),
        "@ConnectionParam" => Directive::ConnectionParam(parse_connection_param(&args)?),
        "@Message" => Directive::Message {
            exchange_type: first_arg(name, &args)?,
        },
        "@Send" => Directive::Direction(Direction::Send),
        "@Receive" => Directive::Direction(Direction::Receive),
        "@Direction" => {
            let token = first_arg(name, &args)?;
            let direction = Direction::parse(&token).ok_or_else(|| {
                Diagnostic::grammar(format!(
                    "@Direction expects `send` or `receive`, got `{}`",
                    token
                ))
            })?;
            Directive::Direction(direction)
        }
        "@Payload" => Directive::Payload(parse_payload(&literal)?),
        "@Example" => {
            if literal.is_empty() {
                return Err(Diagnostic::grammar("@Example needs a value"));
            }
            Directive::Example(parse_example_literal(&literal))
        }
        "@Error" => {
            let code = first_arg(name, &args)?;
            let example = if body.is_empty() {
                None
            } else {
                Some(parse_example_literal(&body.join("\n")))
            };
            Directive::Error {
                code,
                description: args[1..].join(" "),
                example,
            }
        }
        "@Deprecated" => Directive::Deprecated,
        other => {
            debug!("Ignoring directive outside the WebSocket grammar: {}", other);
            return Ok(None);
        }
    };

    Ok(Some(directive))
}

/// Inline argument plus any literal lines under it.
fn join_literal(rest: &str, body: &[&str]) -> String {
    if body.is_empty() {
        return rest.to_string();
    }
    let mut parts = Vec::with_capacity(body.len() + 1);
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts.extend_from_slice(body);
    parts.join("\n")
}

fn first_arg(name: &str, args: &[&str]) -> Result<String, Diagnostic> {
    args.first()
        .map(|s| s.to_string())
        .ok_or_else(|| Diagnostic::grammar(format!("{} needs an argument", name)))
}

fn required_text(name: &str, args: &[&str]) -> Result<String, Diagnostic> {
    if args.is_empty() {
        return Err(Diagnostic::grammar(format!("{} needs an argument", name)));
    }
    Ok(args.join(" "))
}

fn parse_tags(name: &str, args: &[&str]) -> Result<Vec<String>, Diagnostic> {
    let joined = required_text(name, args)?;
    Ok(joined
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect())
}

fn parse_connection_param(args: &[&str]) -> Result<ConnectionParamDirective, Diagnostic> {
    if args.len() < 4 {
        return Err(Diagnostic::grammar(format!(
            "@ConnectionParam expects `<name> <in> <type> <required|optional> [description]`, got {} arguments",
            args.len()
        )));
    }

    let location = ParamLocation::parse(args[1]).ok_or_else(|| {
        Diagnostic::grammar(format!(
            "@ConnectionParam {}: location must be `query` or `header`, got `{}`",
            args[0], args[1]
        ))
    })?;

    Ok(ConnectionParamDirective {
        name: args[0].to_string(),
        location,
        type_name: args[2].to_string(),
        required: args[3] == "required",
        description: args[4..].join(" "),
    })
}

fn parse_payload(literal: &str) -> Result<PayloadSource, Diagnostic> {
    if literal.is_empty() {
        return Err(Diagnostic::grammar("@Payload needs a JSON literal or a type name"));
    }

    if literal.starts_with('{') || literal.starts_with('[') {
        return match serde_json::from_str::<Value>(literal) {
            Ok(value) => Ok(PayloadSource::Inline(value)),
            Err(e) => {
                // keep the raw text rather than losing the payload
                debug!("Inline payload is not valid JSON ({}), keeping it as text", e);
                Ok(PayloadSource::Inline(Value::String(literal.to_string())))
            }
        };
    }

    match literal.split_whitespace().next() {
        Some(type_name) => Ok(PayloadSource::TypeRef(type_name.to_string())),
        None => Err(Diagnostic::grammar("@Payload needs a JSON literal or a type name")),
    }
}
