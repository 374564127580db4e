use crate::document::{Direction, Document, Message};
use std::collections::BTreeSet;

/// Checks a document for structural problems.
///
/// Returns one human-readable message per problem; an empty list means the document is
/// valid. Extraction itself never rejects a document, so this is where endpoints without
/// a URL or exchanges without messages get caught.
pub fn validate(doc: &Document) -> Vec<String> {
    let mut errors = Vec::new();

    if doc.info.title.is_empty() {
        errors.push("info.title is required".to_string());
    }
    if doc.info.version.is_empty() {
        errors.push("info.version is required".to_string());
    }

    if doc.endpoints.is_empty() {
        errors.push("at least one WebSocket endpoint is required".to_string());
    }

    let mut seen_names = BTreeSet::new();
    for (i, endpoint) in doc.endpoints.iter().enumerate() {
        if endpoint.name.is_empty() {
            errors.push(format!("sockets[{}].name is required", i));
        } else if !seen_names.insert(endpoint.name.as_str()) {
            errors.push(format!(
                "sockets[{}].name `{}` is already used by another endpoint",
                i, endpoint.name
            ));
        }
        if endpoint.url.is_empty() {
            errors.push(format!("sockets[{}].url is required", i));
        }

        for (j, exchange) in endpoint.message_exchanges.iter().enumerate() {
            let at = format!("sockets[{}].messages[{}]", i, j);
            if exchange.exchange_type.is_empty() {
                errors.push(format!("{}.type is required", at));
            }
            if exchange.send.is_none() && exchange.receive.is_none() {
                errors.push(format!("{} must have a send or a receive message", at));
            }
            if let Some(send) = &exchange.send {
                check_message(&mut errors, &format!("{}.send", at), send, Direction::Send);
            }
            if let Some(receive) = &exchange.receive {
                check_message(&mut errors, &format!("{}.receive", at), receive, Direction::Receive);
            }
        }
    }

    errors
}

fn check_message(errors: &mut Vec<String>, at: &str, message: &Message, slot: Direction) {
    if message.message_type.is_empty() {
        errors.push(format!("{}.type is required", at));
    }
    if message.direction != slot {
        errors.push(format!("{}.direction does not match its slot", at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Endpoint, Info, MessageExchange};

    fn valid_document() -> Document {
        Document {
            info: Info {
                title: "Chat API".to_string(),
                version: "1.0.0".to_string(),
                ..Info::default()
            },
            endpoints: vec![Endpoint {
                name: "Chat".to_string(),
                url: "/chat".to_string(),
                message_exchanges: vec![MessageExchange {
                    exchange_type: "say".to_string(),
                    description: String::new(),
                    send: Some(Message::new("say", Direction::Send)),
                    receive: None,
                }],
                ..Endpoint::default()
            }],
        }
    }

    #[test]
    fn test_valid_document() {
        assert!(validate(&valid_document()).is_empty());
    }

    #[test]
    fn test_missing_info_and_endpoints() {
        let errors = validate(&Document::default());

        assert_eq!(
            errors,
            vec![
                "info.title is required",
                "info.version is required",
                "at least one WebSocket endpoint is required",
            ]
        );
    }

    #[test]
    fn test_endpoint_problems() {
        let mut doc = valid_document();
        let mut duplicate = doc.endpoints[0].clone();
        duplicate.url = String::new();
        duplicate.message_exchanges = vec![MessageExchange::new("")];
        doc.endpoints.push(duplicate);

        let errors = validate(&doc);

        assert_eq!(
            errors,
            vec![
                "sockets[1].name `Chat` is already used by another endpoint",
                "sockets[1].url is required",
                "sockets[1].messages[0].type is required",
                "sockets[1].messages[0] must have a send or a receive message",
            ]
        );
    }

    #[test]
    fn test_message_problems() {
        let mut doc = valid_document();
        doc.endpoints[0].message_exchanges[0].receive = Some(Message::new("", Direction::Send));

        let errors = validate(&doc);

        assert_eq!(
            errors,
            vec![
                "sockets[0].messages[0].receive.type is required",
                "sockets[0].messages[0].receive.direction does not match its slot",
            ]
        );
    }

    #[test]
    fn test_endpoint_without_exchanges_is_valid() {
        let mut doc = valid_document();
        doc.endpoints[0].message_exchanges.clear();

        assert!(validate(&doc).is_empty());
    }
}
