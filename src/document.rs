//! WebSocket API document model.
//!
//! These types are what the extraction core produces and what the serializer encodes. Every
//! optional or empty field is skipped when encoding and defaulted when decoding, so a document
//! survives an encode/decode round trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete WebSocket API document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// API info
    #[serde(default)]
    pub info: Info,
    /// Documented endpoints, in scan order
    #[serde(rename = "sockets", default)]
    pub endpoints: Vec<Endpoint>,
}

/// General API information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Contact::is_empty")]
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "License::is_empty")]
    pub license: License,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

impl License {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.url.is_empty()
    }
}

/// One documented WebSocket URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Parameters supplied when opening the connection
    #[serde(rename = "connectionParams", default, skip_serializing_if = "Vec::is_empty")]
    pub connection_params: Vec<ConnectionParam>,
    /// Message exchanges in the order their type was introduced
    #[serde(rename = "messages", default)]
    pub message_exchanges: Vec<MessageExchange>,
}

/// Connection parameter (query string or header)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParam {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Where a connection parameter is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Query,
    Header,
}

impl ParamLocation {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "query" => Some(ParamLocation::Query),
            "header" => Some(ParamLocation::Header),
            _ => None,
        }
    }
}

/// A send and/or receive message sharing one message type name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageExchange {
    #[serde(rename = "type")]
    pub exchange_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive: Option<Message>,
}

impl MessageExchange {
    pub fn new(exchange_type: impl Into<String>) -> Self {
        Self {
            exchange_type: exchange_type.into(),
            ..Self::default()
        }
    }
}

/// A single message travelling in one direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Type of the exchange this message belongs to
    #[serde(rename = "type")]
    pub message_type: String,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorCase>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Message {
    pub fn new(message_type: impl Into<String>, direction: Direction) -> Self {
        Self {
            message_type: message_type.into(),
            direction,
            description: String::new(),
            payload: None,
            example: None,
            errors: Vec::new(),
            deprecated: false,
            tags: Vec::new(),
        }
    }
}

/// Message direction, seen from the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Send,
    Receive,
}

impl Direction {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "send" => Some(Direction::Send),
            "receive" => Some(Direction::Receive),
            _ => None,
        }
    }
}

/// An error a message can produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorCase {
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}
