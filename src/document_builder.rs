//! Builds [`Endpoint`]s from annotation blocks.
//!
//! Directives are applied in order against a small state machine: the builder is either
//! idle or building one [`Message`]. Opening a new message, introducing a new `@Message`
//! type or reaching the end of the block completes the message being built, which is then
//! filed into its exchange.

use crate::directive::{self, ConnectionParamDirective, Directive, PayloadSource};
use crate::document::{ConnectionParam, Direction, Endpoint, ErrorCase, Message, MessageExchange};
use crate::error::Diagnostic;
use crate::type_catalog::TypeCatalog;
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

/// Message parser state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParserState {
    #[default]
    Idle,
    Building(Message),
}

impl ParserState {
    /// Starts a new message, completing the current one.
    pub fn open(self, exchange_type: &str, direction: Direction) -> (ParserState, Option<Message>) {
        let next = ParserState::Building(Message::new(exchange_type, direction));
        (next, self.into_message())
    }

    /// Completes the current message and goes idle.
    pub fn flush(self) -> (ParserState, Option<Message>) {
        (ParserState::Idle, self.into_message())
    }

    pub fn message_mut(&mut self) -> Option<&mut Message> {
        match self {
            ParserState::Building(message) => Some(message),
            ParserState::Idle => None,
        }
    }

    fn into_message(self) -> Option<Message> {
        match self {
            ParserState::Building(message) => Some(message),
            ParserState::Idle => None,
        }
    }
}

/// Turns annotation blocks into endpoints, resolving payload types against a catalog
pub struct DocumentBuilder<'a> {
    catalog: &'a TypeCatalog,
}

/// Accumulator for one endpoint
struct EndpointState {
    endpoint: Endpoint,
    exchanges: IndexMap<String, MessageExchange>,
    state: ParserState,
    current_type: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Builds the endpoint documented by a merged annotation block.
    ///
    /// Returns `None` for blocks without a `@WebSocket` line. An endpoint without any
    /// message exchange is still returned.
    pub fn build_endpoint(&self, lines: &[String]) -> (Option<Endpoint>, Vec<Diagnostic>) {
        if !directive::is_websocket_block(lines) {
            return (None, Vec::new());
        }

        let (directives, diagnostics) = directive::parse_directives(lines);
        let mut acc = EndpointState {
            endpoint: Endpoint::default(),
            exchanges: IndexMap::new(),
            state: ParserState::Idle,
            current_type: String::new(),
            diagnostics,
        };

        for directive in directives {
            self.apply(&mut acc, directive);
        }

        let (_, last) = std::mem::take(&mut acc.state).flush();
        acc.complete(last);

        let mut endpoint = acc.endpoint;
        endpoint.message_exchanges = acc.exchanges.into_values().collect();
        debug!(
            "Built endpoint {} with {} message exchanges",
            endpoint.name,
            endpoint.message_exchanges.len()
        );

        (Some(endpoint), acc.diagnostics)
    }

    fn apply(&self, acc: &mut EndpointState, directive: Directive) {
        match directive {
            Directive::WebSocket { name } => acc.endpoint.name = name,
            Directive::Group(group) => acc.endpoint.group = group,
            Directive::Url(url) => acc.endpoint.url = url,
            Directive::Description(text) => match acc.state.message_mut() {
                Some(message) => message.description = text,
                None => {
                    acc.warn_endpoint_fallback("@Description");
                    acc.endpoint.description = text;
                }
            },
            Directive::Tags(tags) => match acc.state.message_mut() {
                Some(message) => message.tags = tags,
                None => {
                    acc.warn_endpoint_fallback("@Tags");
                    acc.endpoint.tags = tags;
                }
            },
            Directive::ConnectionParam(param) => {
                acc.endpoint.connection_params.push(connection_param(param))
            }
            Directive::Message { exchange_type } => {
                let (state, done) = std::mem::take(&mut acc.state).flush();
                acc.state = state;
                acc.complete(done);

                acc.exchanges
                    .entry(exchange_type.clone())
                    .or_insert_with(|| MessageExchange::new(exchange_type.as_str()));
                acc.current_type = exchange_type;
            }
            Directive::Direction(direction) => {
                let (state, done) = std::mem::take(&mut acc.state).open(&acc.current_type, direction);
                acc.state = state;
                acc.complete(done);
            }
            Directive::Payload(source) => {
                let payload = self.resolve_payload(source, &mut acc.diagnostics);
                if let Some(payload) = payload {
                    acc.with_message("@Payload", |message| message.payload = Some(payload));
                }
            }
            Directive::Example(example) => {
                acc.with_message("@Example", |message| message.example = Some(example));
            }
            Directive::Error {
                code,
                description,
                example,
            } => {
                acc.with_message("@Error", |message| {
                    message.errors.push(ErrorCase {
                        code,
                        description,
                        example,
                    })
                });
            }
            Directive::Deprecated => {
                acc.with_message("@Deprecated", |message| message.deprecated = true);
            }
        }
    }

    /// Inline payloads are used as-is; type names are looked up in the catalog.
    /// An unknown type leaves the payload unset.
    fn resolve_payload(
        &self,
        source: PayloadSource,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Value> {
        match source {
            PayloadSource::Inline(value) => Some(value),
            PayloadSource::TypeRef(type_name) => match self.catalog.resolve(&type_name) {
                Some(record) => {
                    debug!("Resolved payload {} to {}.{}", type_name, record.package, record.name);
                    Some(record.example_payload())
                }
                None => {
                    diagnostics.push(Diagnostic::payload_miss(&type_name));
                    None
                }
            },
        }
    }
}

impl EndpointState {
    /// Applies `update` to the message being built, or records a grammar warning.
    fn with_message(&mut self, keyword: &str, update: impl FnOnce(&mut Message)) {
        match self.state.message_mut() {
            Some(message) => update(message),
            None => self.diagnostics.push(Diagnostic::grammar(format!(
                "{} has no open message (missing @Send or @Receive)",
                keyword
            ))),
        }
    }

    /// Records a grammar warning when a message-or-endpoint directive lands on the
    /// endpoint after a `@Message` left no message open.
    fn warn_endpoint_fallback(&mut self, keyword: &str) {
        if self.current_type.is_empty() {
            return;
        }
        self.diagnostics.push(Diagnostic::grammar(format!(
            "{} after @Message {} has no open message, applied to the endpoint",
            keyword, self.current_type
        )));
    }

    /// Files a completed message into its exchange, replacing any message already in
    /// the same direction.
    fn complete(&mut self, message: Option<Message>) {
        let Some(message) = message else {
            return;
        };

        if message.message_type.is_empty() {
            let keyword = Directive::Direction(message.direction).keyword();
            self.diagnostics.push(Diagnostic::grammar(format!(
                "{} without a preceding @Message type, message dropped",
                keyword
            )));
            return;
        }

        let exchange = self
            .exchanges
            .entry(message.message_type.clone())
            .or_insert_with(|| MessageExchange::new(message.message_type.as_str()));

        if exchange.description.is_empty() && !message.description.is_empty() {
            exchange.description = message.description.clone();
        }

        match message.direction {
            Direction::Send => exchange.send = Some(message),
            Direction::Receive => exchange.receive = Some(message),
        }
    }
}

fn connection_param(param: ConnectionParamDirective) -> ConnectionParam {
    ConnectionParam {
        name: param.name,
        location: param.location,
        type_name: param.type_name,
        required: param.required,
        description: param.description,
    }
}
