// comanda-client/src/realtime/protocol.rs
// Engine.IO v4 / Socket.IO v5 text frame codec (default namespace only)

use serde::Deserialize;
use serde_json::Value;

use crate::{ClientError, ClientResult};

/// Handshake data carried by the Engine.IO open packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    pub sid: String,
    /// Milliseconds between server pings
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

/// A decoded text frame
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// `0{...}`
    Open(OpenInfo),
    /// `1`
    Close,
    /// `2`
    Ping,
    /// `3`
    Pong,
    /// `6`
    Noop,
    /// `40{"sid": ...}`
    Connect { sid: Option<String> },
    /// `41`
    Disconnect,
    /// `42["name", payload]`
    Event { name: String, payload: Value },
    /// `44{"message": ...}`
    ConnectError(String),
    /// Namespaced or ack packets this client does not consume
    Ignored,
}

pub fn encode_connect() -> String {
    "40".to_string()
}

pub fn encode_disconnect() -> String {
    "41".to_string()
}

pub fn encode_pong() -> String {
    "3".to_string()
}

pub fn decode(frame: &str) -> ClientResult<Packet> {
    let mut chars = frame.chars();
    let Some(engine_type) = chars.next() else {
        return Err(malformed(frame));
    };
    let rest = chars.as_str();
    match engine_type {
        '0' => {
            let info: OpenInfo = serde_json::from_str(rest).map_err(|_| malformed(frame))?;
            Ok(Packet::Open(info))
        }
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_socket(rest, frame),
        '6' => Ok(Packet::Noop),
        _ => Err(malformed(frame)),
    }
}

fn decode_socket(body: &str, frame: &str) -> ClientResult<Packet> {
    let mut chars = body.chars();
    let Some(socket_type) = chars.next() else {
        return Err(malformed(frame));
    };
    let rest = chars.as_str();
    if rest.starts_with('/') {
        return Ok(Packet::Ignored);
    }
    match socket_type {
        '0' => {
            let sid = if rest.is_empty() {
                None
            } else {
                serde_json::from_str::<Value>(rest)
                    .ok()
                    .and_then(|v| v.get("sid").and_then(Value::as_str).map(str::to_string))
            };
            Ok(Packet::Connect { sid })
        }
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(rest, frame),
        '3' => Ok(Packet::Ignored),
        '4' => {
            let message = serde_json::from_str::<Value>(rest)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| rest.to_string());
            Ok(Packet::ConnectError(message))
        }
        _ => Err(malformed(frame)),
    }
}

fn decode_event(rest: &str, frame: &str) -> ClientResult<Packet> {
    // Optional ack id precedes the array
    let array = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    let value: Value = serde_json::from_str(array).map_err(|_| malformed(frame))?;
    let Value::Array(mut items) = value else {
        return Err(malformed(frame));
    };
    if items.is_empty() {
        return Err(malformed(frame));
    }
    let name = match items.remove(0) {
        Value::String(name) => name,
        _ => return Err(malformed(frame)),
    };
    let payload = if items.is_empty() {
        Value::Null
    } else {
        items.remove(0)
    };
    Ok(Packet::Event { name, payload })
}

fn malformed(frame: &str) -> ClientError {
    let preview: String = frame.chars().take(64).collect();
    ClientError::Realtime(format!("malformed frame: {preview}"))
}
