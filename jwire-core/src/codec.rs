//! Codec for JSON-RPC message classification, encoding and decoding
//!
//! Inbound messages go through two steps:
//!
//! 1. **Classification**: the [`Discriminator`] looks at which members an
//!    object has (`jsonrpc`, `method`, `id`, `result`, `error`) without
//!    decoding their values, and reports a [`MessageKind`].
//! 2. **Typed decoding**: the caller picks the matching target
//!    ([`decode_request`] or [`decode_response`]) and decodes the payloads
//!    into its own types. [`decode`] does both steps in one call.
//!
//! # Classification rules
//!
//! - `jsonrpc` must be the string `"2.0"`, otherwise `Error::InvalidVersion`
//! - an object with `method` is a request, or a notification when its `id`
//!   is missing or `null`
//! - otherwise an object with `error` (and no `result`) is a response, and an
//!   object with `result` (and no `error`) is a response only if it has an `id`
//! - anything else is `Error::InvalidMessageShape`
//!
//! An object carrying both `method` and `result`/`error` is classified as a
//! request by default. A strict discriminator rejects it instead:
//!
//! ```rust
//! use jwire_core::codec::{Discriminator, MessageKind};
//! use jwire_core::Error;
//!
//! let raw = r#"{"jsonrpc":"2.0","method":"m","id":1,"result":0}"#;
//! assert_eq!(Discriminator::new().classify(raw).unwrap(), MessageKind::Request);
//! assert_eq!(
//!     Discriminator::new().with_strict(true).classify(raw),
//!     Err(Error::InvalidMessageShape)
//! );
//! ```
//!
//! # Error Handling
//!
//! - Invalid JSON text → `Error::Parse`
//! - Valid JSON that is not an object → `Error::InvalidMessageShape`
//! - Structural problems → the matching `Error` variant (see [`crate::Error`])
//!
//! # Examples
//!
//! ```rust
//! use jwire_core::{codec, Id, Request};
//!
//! let request = Request::new("ping", None::<()>, Id::Number(1));
//! let json = codec::encode_request(&request).unwrap();
//! assert_eq!(json, r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
//!
//! let decoded: Request = codec::decode_request(&json).unwrap();
//! assert_eq!(decoded.method, "ping");
//! ```

use crate::error::{Error, Result};
use crate::types::{Message, Request, Response, JSONRPC_VERSION};
use serde::de::{DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of an inbound message, as decided by the [`Discriminator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Has a `method` and an `id`: a reply is expected
    Request,
    /// Has a `method` but no `id`: no reply is expected
    Notification,
    /// Has a `result` or an `error`
    Response,
}

impl MessageKind {
    /// True for kinds that decode into a [`Request`]
    pub fn is_request_shaped(self) -> bool {
        matches!(self, MessageKind::Request | MessageKind::Notification)
    }
}

/// Message classifier
///
/// The default discriminator lets `method` win when an object also carries
/// `result` or `error`. Use [`Discriminator::strict`] (or
/// [`Discriminator::with_strict`]) to reject such objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Discriminator {
    strict: bool,
}

impl Discriminator {
    /// Create a permissive discriminator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a discriminator that rejects ambiguous objects
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Reject objects that carry both `method` and `result`/`error`
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether ambiguous objects are rejected
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Classify raw JSON text without decoding member values
    ///
    /// Only `jsonrpc` is read; the other members are skipped over.
    ///
    /// # Errors
    ///
    /// - `Error::Parse` if the input is not valid JSON
    /// - `Error::InvalidVersion` if `jsonrpc` is missing or not "2.0"
    /// - `Error::InvalidMessageShape` if the input is not an object, or the
    ///   object is not a request, notification or response
    pub fn classify(&self, data: impl AsRef<[u8]>) -> Result<MessageKind> {
        let shape: Result<Shape> = serde_json::from_slice(data.as_ref()).map_err(|e| {
            if e.is_data() {
                Error::InvalidMessageShape
            } else {
                Error::Parse(e.to_string())
            }
        });
        let result = shape.and_then(|shape| self.kind(&shape));

        match &result {
            Ok(kind) => tracing::trace!(kind = ?kind, "classified message"),
            Err(e) => tracing::debug!(error = %e, "rejected message"),
        }
        result
    }

    /// Classify and decode a message in one pass over the input
    pub fn decode<P, R, E>(&self, data: impl AsRef<[u8]>) -> Result<Message<P, R, E>>
    where
        P: DeserializeOwned,
        R: DeserializeOwned,
        E: DeserializeOwned,
    {
        let result = parse_object(data.as_ref()).and_then(|object| {
            let kind = self.kind(&Shape::of(&object))?;
            tracing::trace!(kind = ?kind, "decoding message");
            if kind.is_request_shaped() {
                Request::from_object(object).map(Message::Request)
            } else {
                Response::from_object(object).map(Message::Response)
            }
        });

        if let Err(e) = &result {
            tracing::debug!(error = %e, "failed to decode message");
        }
        result
    }

    fn kind(&self, shape: &Shape) -> Result<MessageKind> {
        if !shape.version {
            return Err(Error::InvalidVersion);
        }

        if shape.method {
            if self.strict && (shape.result || shape.error) {
                return Err(Error::InvalidMessageShape);
            }
            return Ok(if shape.id {
                MessageKind::Request
            } else {
                MessageKind::Notification
            });
        }

        match (shape.result, shape.error) {
            (false, true) => Ok(MessageKind::Response),
            // A success must name the request it answers
            (true, false) if shape.id => Ok(MessageKind::Response),
            _ => Err(Error::InvalidMessageShape),
        }
    }
}

/// Member presence of a message object
///
/// `id` is only set for a non-null id.
#[derive(Debug, Default)]
struct Shape {
    version: bool,
    method: bool,
    id: bool,
    result: bool,
    error: bool,
}

impl Shape {
    fn of(object: &Map<String, Value>) -> Self {
        Self {
            version: matches!(object.get("jsonrpc"), Some(Value::String(v)) if v == JSONRPC_VERSION),
            method: object.contains_key("method"),
            id: object.get("id").is_some_and(|id| !id.is_null()),
            result: object.contains_key("result"),
            error: object.contains_key("error"),
        }
    }
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum Member {
    Jsonrpc,
    Method,
    Id,
    Result,
    Error,
    #[serde(other)]
    Other,
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ShapeVisitor)
    }
}

struct ShapeVisitor;

impl<'de> Visitor<'de> for ShapeVisitor {
    type Value = Shape;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-RPC message object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Shape, A::Error> {
        let mut shape = Shape::default();
        while let Some(member) = map.next_key::<Member>()? {
            match member {
                Member::Jsonrpc => {
                    let version: Value = map.next_value()?;
                    shape.version = version.as_str() == Some(JSONRPC_VERSION);
                }
                Member::Id => {
                    let id: Option<IgnoredAny> = map.next_value()?;
                    shape.id = id.is_some();
                }
                Member::Method => {
                    map.next_value::<IgnoredAny>()?;
                    shape.method = true;
                }
                Member::Result => {
                    map.next_value::<IgnoredAny>()?;
                    shape.result = true;
                }
                Member::Error => {
                    map.next_value::<IgnoredAny>()?;
                    shape.error = true;
                }
                Member::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(shape)
    }
}

fn parse_object(data: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice(data) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(Error::InvalidMessageShape),
        Err(e) => Err(Error::Parse(e.to_string())),
    }
}

/// Classify raw JSON text with the default discriminator
///
/// ```rust
/// use jwire_core::codec::{self, MessageKind};
///
/// assert_eq!(codec::classify(r#"{"jsonrpc":"2.0","method":"m","id":1}"#).unwrap(), MessageKind::Request);
/// assert_eq!(codec::classify(r#"{"jsonrpc":"2.0","method":"m"}"#).unwrap(), MessageKind::Notification);
/// assert_eq!(codec::classify(r#"{"jsonrpc":"2.0","id":1,"result":"r"}"#).unwrap(), MessageKind::Response);
/// ```
pub fn classify(data: impl AsRef<[u8]>) -> Result<MessageKind> {
    Discriminator::default().classify(data)
}

/// Decode a message of unknown kind with the default discriminator
pub fn decode<P, R, E>(data: impl AsRef<[u8]>) -> Result<Message<P, R, E>>
where
    P: DeserializeOwned,
    R: DeserializeOwned,
    E: DeserializeOwned,
{
    Discriminator::default().decode(data)
}

/// Decode a request or notification
///
/// # Errors
///
/// - `Error::Parse` / `Error::InvalidMessageShape` for input that is not a JSON object
/// - `Error::InvalidVersion`, `Error::InvalidIdType`, `Error::MissingMethod`
/// - `Error::InvalidParams` if `params` does not fit `P`
pub fn decode_request<P: DeserializeOwned>(data: impl AsRef<[u8]>) -> Result<Request<P>> {
    parse_object(data.as_ref())
        .and_then(Request::from_object)
        .inspect_err(|e| tracing::debug!(error = %e, "failed to decode request"))
}

/// Decode a response
///
/// # Errors
///
/// - `Error::Parse` / `Error::InvalidMessageShape` for input that is not a JSON object
/// - `Error::InvalidVersion`, `Error::InvalidIdType`
/// - `Error::MissingResultOrError` if neither member is present
/// - `Error::InvalidMessageShape` if both members are present
/// - `Error::InvalidResult` / `Error::InvalidErrorObject` on payload type mismatch
pub fn decode_response<R, E>(data: impl AsRef<[u8]>) -> Result<Response<R, E>>
where
    R: DeserializeOwned,
    E: DeserializeOwned,
{
    parse_object(data.as_ref())
        .and_then(Response::from_object)
        .inspect_err(|e| tracing::debug!(error = %e, "failed to decode response"))
}

/// Encode any serializable value to JSON text
///
/// No JSON-RPC rules are checked here; a [`Request`] with an empty method is
/// written as is. Use [`encode_request`], [`encode_response`] or
/// [`encode_message`] for validated output.
pub fn encode<T: Serialize + ?Sized>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a request or notification
///
/// Fails with `Error::MissingMethod` if the method name is empty.
pub fn encode_request<P: Serialize>(req: &Request<P>) -> Result<String> {
    if req.method.is_empty() {
        return Err(Error::MissingMethod);
    }
    encode(req)
}

/// Encode a response
///
/// Writes `error` when the response carries a non-empty error, `result`
/// otherwise; never both.
pub fn encode_response<R: Serialize, E: Serialize>(resp: &Response<R, E>) -> Result<String> {
    encode(resp)
}

/// Encode a decoded-or-built [`Message`] with the same checks as
/// [`encode_request`] and [`encode_response`]
pub fn encode_message<P, R, E>(msg: &Message<P, R, E>) -> Result<String>
where
    P: Serialize,
    R: Serialize,
    E: Serialize,
{
    match msg {
        Message::Request(req) => encode_request(req),
        Message::Response(resp) => encode_response(resp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorObject;
    use crate::types::Version;
    use crate::Id;
    use serde_json::json;

    #[test]
    fn test_classify_request_and_notification() {
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","method":"testMethod","id":1}"#).unwrap(),
            MessageKind::Request
        );
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","method":"testMethod"}"#).unwrap(),
            MessageKind::Notification
        );
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","method":"testMethod","id":null}"#).unwrap(),
            MessageKind::Notification
        );
    }

    #[test]
    fn test_classify_response() {
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","id":1,"result":"testResult"}"#).unwrap(),
            MessageKind::Response
        );
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"error"}}"#).unwrap(),
            MessageKind::Response
        );
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","id":"a","result":null}"#).unwrap(),
            MessageKind::Response
        );
    }

    #[test]
    fn test_classify_result_without_id() {
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","result":"testResult"}"#),
            Err(Error::InvalidMessageShape)
        );
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","id":null,"result":"testResult"}"#),
            Err(Error::InvalidMessageShape)
        );
    }

    #[test]
    fn test_classify_invalid_version() {
        assert_eq!(
            classify(r#"{"jsonrpc":"1.0","method":"testMethod"}"#),
            Err(Error::InvalidVersion)
        );
        assert_eq!(classify(r#"{"method":"testMethod"}"#), Err(Error::InvalidVersion));
        assert_eq!(
            classify(r#"{"jsonrpc":2.0,"method":"testMethod"}"#),
            Err(Error::InvalidVersion)
        );
    }

    #[test]
    fn test_classify_invalid_shape() {
        assert_eq!(classify(r#"{"jsonrpc":"2.0","id":1}"#), Err(Error::InvalidMessageShape));
        assert_eq!(classify(r#"{"jsonrpc":"2.0"}"#), Err(Error::InvalidMessageShape));
        assert_eq!(
            classify(r#"{"jsonrpc":"2.0","id":1,"result":1,"error":{"code":1,"message":"m"}}"#),
            Err(Error::InvalidMessageShape)
        );
        assert_eq!(classify(r#"[{"jsonrpc":"2.0","method":"m"}]"#), Err(Error::InvalidMessageShape));
        assert_eq!(classify("42"), Err(Error::InvalidMessageShape));
    }

    #[test]
    fn test_classify_invalid_json() {
        assert!(matches!(classify("not valid json"), Err(Error::Parse(_))));
        assert!(matches!(classify(""), Err(Error::Parse(_))));
        assert!(matches!(classify(r#"{"jsonrpc":"2.0","method":"m"} x"#), Err(Error::Parse(_))));
    }

    #[test]
    fn test_classify_method_wins_by_default() {
        let raw = r#"{"jsonrpc":"2.0","method":"m","result":1}"#;
        assert_eq!(classify(raw).unwrap(), MessageKind::Notification);

        let strict = Discriminator::new().with_strict(true);
        assert!(strict.is_strict());
        assert_eq!(strict, Discriminator::strict());
        assert!(!Discriminator::new().is_strict());
        assert_eq!(strict.classify(raw), Err(Error::InvalidMessageShape));
        assert_eq!(
            strict.classify(r#"{"jsonrpc":"2.0","method":"m","id":1}"#).unwrap(),
            MessageKind::Request
        );
    }

    #[test]
    fn test_classify_ignores_unknown_members() {
        let raw = r#"{"extra":{"nested":[1,2,3]},"jsonrpc":"2.0","method":"m","id":"x"}"#;
        assert_eq!(classify(raw).unwrap(), MessageKind::Request);
    }

    #[test]
    fn test_message_kind_request_shaped() {
        assert!(MessageKind::Request.is_request_shaped());
        assert!(MessageKind::Notification.is_request_shaped());
        assert!(!MessageKind::Response.is_request_shaped());
    }

    #[test]
    fn test_decode_message() {
        let msg: Message = decode(r#"{"jsonrpc":"2.0","method":"test","id":1}"#).unwrap();
        assert!(msg.is_request());

        let msg: Message = decode(r#"{"jsonrpc":"2.0","method":"notify"}"#).unwrap();
        assert!(msg.is_notification());

        let msg: Message = decode(r#"{"jsonrpc":"2.0","result":42,"id":1}"#).unwrap();
        assert!(msg.is_response());
    }

    #[test]
    fn test_decode_message_errors() {
        assert_eq!(
            decode::<Value, Value, Value>(r#"{"jsonrpc":"2.0","result":42}"#),
            Err(Error::InvalidMessageShape)
        );
        assert_eq!(
            decode::<Value, Value, Value>(r#"{"jsonrpc":"2.0","method":"m","id":[1]}"#),
            Err(Error::InvalidIdType)
        );
        assert!(matches!(
            decode::<Value, Value, Value>("{"),
            Err(Error::Parse(_))
        ));
        assert_eq!(
            decode::<Value, Value, Value>("[]"),
            Err(Error::InvalidMessageShape)
        );
    }

    #[test]
    fn test_strict_decode() {
        let strict = Discriminator::new().with_strict(true);
        let raw = r#"{"jsonrpc":"2.0","method":"m","id":1,"error":{"code":1,"message":"x"}}"#;
        assert_eq!(
            strict.decode::<Value, Value, Value>(raw),
            Err(Error::InvalidMessageShape)
        );
    }

    #[test]
    fn test_encode_decode_request() {
        let req = Request::new("test_method", Some(json!([1, 2])), Id::Number(1));
        let encoded = encode_request(&req).unwrap();
        let decoded: Request = decode_request(&encoded).unwrap();

        assert_eq!(decoded, req);
        assert_eq!(decoded.jsonrpc, Version::V2);
    }

    #[test]
    fn test_encode_request_requires_method() {
        let req: Request = Request::new("", None, Id::Number(1));
        assert_eq!(encode_request(&req), Err(Error::MissingMethod));
    }

    #[test]
    fn test_decode_request_invalid_params() {
        let result = decode_request::<Vec<u32>>(r#"{"jsonrpc":"2.0","id":1,"method":"m","params":{"a":1}}"#);
        assert!(matches!(result, Err(Error::InvalidParams(_))));
    }

    #[test]
    fn test_decode_request_non_string_method() {
        let result = decode_request::<Value>(r#"{"jsonrpc":"2.0","id":1,"method":7}"#);
        assert_eq!(result, Err(Error::MissingMethod));
    }

    #[test]
    fn test_encode_decode_response_success() {
        let resp: Response = Response::success(json!({"result": 42}), Id::String("test-id".to_string()));
        let encoded = encode_response(&resp).unwrap();
        let decoded: Response = decode_response(&encoded).unwrap();

        assert!(decoded.is_success());
        assert_eq!(decoded, resp);
    }

    #[test]
    fn test_encode_decode_response_error() {
        let resp: Response = Response::error(ErrorObject::method_not_found("unknown"), Id::Number(99));
        let encoded = encode_response(&resp).unwrap();
        let decoded: Response = decode_response(&encoded).unwrap();

        assert!(decoded.is_error());
        assert_eq!(decoded.id, Id::Number(99));
        assert_eq!(decoded.error.unwrap().code, -32601);
    }

    #[test]
    fn test_decode_response_errors() {
        assert_eq!(
            decode_response::<Value, Value>(r#"{"jsonrpc":"2.0","id":1}"#),
            Err(Error::MissingResultOrError)
        );
        assert!(matches!(
            decode_response::<u32, Value>(r#"{"jsonrpc":"2.0","id":1,"result":"text"}"#),
            Err(Error::InvalidResult(_))
        ));
        assert!(matches!(
            decode_response::<Value, Value>(r#"{"jsonrpc":"2.0","id":1,"error":"oops"}"#),
            Err(Error::InvalidErrorObject(_))
        ));
        assert_eq!(
            decode_response::<Value, Value>(r#"{"jsonrpc":"2.0","id":false,"result":1}"#),
            Err(Error::InvalidIdType)
        );
    }

    #[test]
    fn test_encode_message() {
        let msg: Message = Message::Request(Request::notification("tick", Some(json!({"n": 1}))));
        assert_eq!(
            encode(&msg).unwrap(),
            r#"{"jsonrpc":"2.0","method":"tick","params":{"n":1}}"#
        );
        assert_eq!(encode_message(&msg).unwrap(), encode(&msg).unwrap());

        let reply: Message = Message::Response(Response::success(json!(1), Id::Number(3)));
        assert_eq!(
            encode_message(&reply).unwrap(),
            r#"{"jsonrpc":"2.0","id":3,"result":1}"#
        );
    }

    #[test]
    fn test_encode_message_requires_method() {
        let msg: Message = Message::Request(Request::new("", None, Id::Number(1)));
        assert_eq!(encode_message(&msg), Err(Error::MissingMethod));
        // the generic encoder does not validate
        assert_eq!(encode(&msg).unwrap(), r#"{"jsonrpc":"2.0","id":1,"method":""}"#);
    }
}
