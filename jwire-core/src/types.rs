//! JSON-RPC 2.0 envelopes
//!
//! This module implements the message containers of the JSON-RPC 2.0
//! specification (https://www.jsonrpc.org/specification). The envelopes are
//! generic over their payloads so applications can decode `params`, `result`
//! and error `data` straight into their own types. Every parameter defaults
//! to `serde_json::Value`.
//!
//! # Message Types
//!
//! 1. **Request**: a call that expects a response (`id` present)
//! 2. **Notification**: a [`Request`] whose `id` is absent; no response is sent
//! 3. **Response**: the outcome of a request, either a result or an error
//!
//! # Field omission
//!
//! The encoders follow the wire rules strictly: an absent `id` is left out
//! entirely, `params` is left out when there are none (or they serialize to
//! `null`), and a response carries exactly one of `result` and `error`.

use crate::error::{Error, ErrorObject, Result};
use crate::id::Id;
use serde::de::{self, DeserializeOwned};
use serde::ser::{self, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// The protocol version string carried in every message
pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol version marker
///
/// Only JSON-RPC 2.0 is supported; it serializes as the string `"2.0"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// JSON-RPC 2.0
    #[default]
    #[serde(rename = "2.0")]
    V2,
}

impl Version {
    /// Check the `jsonrpc` member of a raw message object
    pub(crate) fn check(object: &Map<String, Value>) -> Result<Self> {
        match object.get("jsonrpc") {
            Some(Value::String(v)) if v == JSONRPC_VERSION => Ok(Version::V2),
            _ => Err(Error::InvalidVersion),
        }
    }
}

fn take_id(object: &mut Map<String, Value>) -> Result<Id> {
    match object.remove("id") {
        Some(value) => Id::from_value(value),
        None => Ok(Id::Null),
    }
}

/// JSON-RPC 2.0 request or notification
///
/// A request with an absent id ([`Id::Null`]) is a notification: it is
/// encoded without an `id` member and no response is expected.
///
/// # Examples
///
/// ```rust
/// use jwire_core::{Id, Request};
/// use serde_json::json;
///
/// let req = Request::new("subtract", Some(json!([42, 23])), Id::Number(1));
/// assert!(!req.is_notification());
///
/// let notif: Request = Request::notification("update", None);
/// assert!(notif.is_notification());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request<P = Value> {
    /// Always "2.0"
    pub jsonrpc: Version,
    /// Correlation id, omitted from JSON when absent
    pub id: Id,
    /// Name of the remote method to invoke
    pub method: String,
    /// Optional parameters, omitted from JSON when `None` or when they
    /// serialize to `null`
    pub params: Option<P>,
}

impl<P> Request<P> {
    /// Create a new request
    ///
    /// Passing `Id::Null` creates a notification; prefer
    /// [`Request::notification`] to make that explicit.
    pub fn new(method: impl Into<String>, params: Option<P>, id: Id) -> Self {
        Self {
            jsonrpc: Version::V2,
            id,
            method: method.into(),
            params,
        }
    }

    /// Create a notification (a request without an id)
    pub fn notification(method: impl Into<String>, params: Option<P>) -> Self {
        Self::new(method, params, Id::Null)
    }

    /// True if no response is expected
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

impl<P: DeserializeOwned> Request<P> {
    /// Build a request from a parsed JSON object
    ///
    /// A missing `id` decodes as absent. A `null` or missing `params`
    /// decodes as `None`.
    pub(crate) fn from_object(mut object: Map<String, Value>) -> Result<Self> {
        let jsonrpc = Version::check(&object)?;
        let id = take_id(&mut object)?;

        let method = match object.remove("method") {
            Some(Value::String(method)) if !method.is_empty() => method,
            _ => return Err(Error::MissingMethod),
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value(value).map_err(|e| Error::InvalidParams(e.to_string()))?,
            ),
        };

        Ok(Self {
            jsonrpc,
            id,
            method,
            params,
        })
    }
}

impl<P: Serialize> Serialize for Request<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // `params: null` decodes as `None`, so it is never written
        let params = self
            .params
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(<S::Error as ser::Error>::custom)?
            .filter(|params| !params.is_null());

        let mut state = serializer.serialize_struct("Request", 4)?;
        state.serialize_field("jsonrpc", &self.jsonrpc)?;
        if self.id.is_null() {
            state.skip_field("id")?;
        } else {
            state.serialize_field("id", &self.id)?;
        }
        state.serialize_field("method", &self.method)?;
        match params {
            Some(params) => state.serialize_field("params", &params)?,
            None => state.skip_field("params")?,
        }
        state.end()
    }
}

impl<'de, P: DeserializeOwned> Deserialize<'de> for Request<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = Map::deserialize(deserializer)?;
        Request::from_object(object).map_err(de::Error::custom)
    }
}

/// JSON-RPC 2.0 response
///
/// A response carries either a result or an error. An `error` that is `None`
/// or the empty sentinel ([`ErrorObject::is_empty`]) means success: the
/// encoder then writes `result` (as `null` when it is `None`) and never
/// writes `error`.
///
/// If the request id could not be determined the response uses `Id::Null`,
/// in which case the `id` member is omitted.
///
/// # Examples
///
/// ```rust
/// use jwire_core::{ErrorObject, Id, Response};
/// use serde_json::json;
///
/// let success: Response = Response::success(json!({"value": 42}), Id::Number(1));
/// assert!(success.is_success());
///
/// let failure: Response = Response::error(ErrorObject::method_not_found("nope"), Id::Number(2));
/// assert!(failure.is_error());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response<R = Value, E = Value> {
    /// Always "2.0"
    pub jsonrpc: Version,
    /// Id of the request being answered
    pub id: Id,
    /// The result on success
    pub result: Option<R>,
    /// The error on failure
    pub error: Option<ErrorObject<E>>,
}

impl<R, E> Response<R, E> {
    /// Create a successful response
    pub fn success(result: R, id: Id) -> Self {
        Self {
            jsonrpc: Version::V2,
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(error: ErrorObject<E>, id: Id) -> Self {
        Self {
            jsonrpc: Version::V2,
            id,
            result: None,
            error: Some(error),
        }
    }

    /// The error, unless it is absent or the empty sentinel
    fn wire_error(&self) -> Option<&ErrorObject<E>> {
        self.error.as_ref().filter(|e| !e.is_empty())
    }

    /// True if the response carries a non-empty error
    pub fn is_error(&self) -> bool {
        self.wire_error().is_some()
    }

    /// True if the response is a success
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }

    /// Split into the result or the error
    ///
    /// ```rust
    /// use jwire_core::{Id, Response};
    ///
    /// let response: Response<u32> = Response::success(7, Id::Number(1));
    /// assert_eq!(response.into_result().unwrap(), Some(7));
    /// ```
    pub fn into_result(self) -> std::result::Result<Option<R>, ErrorObject<E>> {
        match self.error {
            Some(error) if !error.is_empty() => Err(error),
            _ => Ok(self.result),
        }
    }
}

impl<R: DeserializeOwned, E: DeserializeOwned> Response<R, E> {
    /// Build a response from a parsed JSON object
    pub(crate) fn from_object(mut object: Map<String, Value>) -> Result<Self> {
        let jsonrpc = Version::check(&object)?;
        let id = take_id(&mut object)?;

        let (result, error) = match (object.remove("result"), object.remove("error")) {
            (Some(_), Some(_)) => return Err(Error::InvalidMessageShape),
            (None, None) => return Err(Error::MissingResultOrError),
            (None, Some(error)) => {
                let error = serde_json::from_value(error)
                    .map_err(|e| Error::InvalidErrorObject(e.to_string()))?;
                (None, Some(error))
            }
            (Some(result), None) => {
                let result = serde_json::from_value(result)
                    .map_err(|e| Error::InvalidResult(e.to_string()))?;
                (Some(result), None)
            }
        };

        Ok(Self {
            jsonrpc,
            id,
            result,
            error,
        })
    }
}

impl<R: Serialize, E: Serialize> Serialize for Response<R, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Response", 3)?;
        state.serialize_field("jsonrpc", &self.jsonrpc)?;
        if self.id.is_null() {
            state.skip_field("id")?;
        } else {
            state.serialize_field("id", &self.id)?;
        }
        match self.wire_error() {
            Some(error) => state.serialize_field("error", error)?,
            None => state.serialize_field("result", &self.result)?,
        }
        state.end()
    }
}

impl<'de, R: DeserializeOwned, E: DeserializeOwned> Deserialize<'de> for Response<R, E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = Map::deserialize(deserializer)?;
        Response::from_object(object).map_err(de::Error::custom)
    }
}

/// Any decoded JSON-RPC 2.0 message
///
/// Returned by [`crate::codec::decode`] when the kind of an inbound message
/// is not known in advance.
///
/// ```rust
/// use jwire_core::{codec, Message};
///
/// let message: Message = codec::decode(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
/// match message {
///     Message::Request(req) if req.is_notification() => println!("notification {}", req.method),
///     Message::Request(req) => println!("request {}", req.method),
///     Message::Response(resp) => println!("response to {}", resp.id),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message<P = Value, R = Value, E = Value> {
    /// A request or a notification
    Request(Request<P>),
    /// A response
    Response(Response<R, E>),
}

impl<P, R, E> Message<P, R, E> {
    /// True for a request that expects a response
    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(req) if !req.is_notification())
    }

    /// True for a notification
    pub fn is_notification(&self) -> bool {
        matches!(self, Message::Request(req) if req.is_notification())
    }

    /// True for a response
    pub fn is_response(&self) -> bool {
        matches!(self, Message::Response(_))
    }

    /// The message id (absent for notifications)
    pub fn id(&self) -> &Id {
        match self {
            Message::Request(req) => &req.id,
            Message::Response(resp) => &resp.id,
        }
    }
}
