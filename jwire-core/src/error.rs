//! Error types for jwire
//!
//! This module provides two families of errors:
//!
//! - **Error**: codec failures (malformed input, wrong shapes) returned by the
//!   encode/decode functions (uses thiserror)
//! - **ErrorObject**: the wire-format error carried in the `error` member of a
//!   response, generic over the type of its `data` payload
//!
//! # The error capability
//!
//! Anything that can describe itself as a JSON-RPC error implements
//! [`RpcError`]. [`normalize`] turns such a value into an [`ErrorObject`]
//! without losing its code or data. Errors that only know how to print
//! themselves go through the [`Opaque`] adapter (or [`normalize_opaque`]),
//! which assigns the generic server error code.
//!
//! # Spec-Compliant Error Codes
//!
//! JSON-RPC 2.0 reserves these codes (see [`codes`]):
//! - `-32700`: Parse error (invalid JSON)
//! - `-32600`: Invalid request (not a valid request object)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000 to -32099`: Server error (implementation-defined)
//!
//! # Examples
//!
//! ```rust
//! use jwire_core::{normalize, normalize_opaque, ErrorObject};
//!
//! let structured = ErrorObject::with_data(-32001, "custom error", "data".to_string());
//! assert_eq!(normalize(&structured), structured);
//!
//! let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! let wrapped = normalize_opaque(&io);
//! assert_eq!(wrapped.code, -32000);
//! assert_eq!(wrapped.message, "disk full");
//! assert_eq!(wrapped.data.as_deref(), Some("disk full"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reserved JSON-RPC 2.0 error codes
pub mod codes {
    /// Invalid JSON was received
    pub const PARSE_ERROR: i64 = -32700;
    /// The JSON sent is not a valid request object
    pub const INVALID_REQUEST: i64 = -32600;
    /// The method does not exist or is not available
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid method parameter(s)
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal JSON-RPC error
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Generic implementation-defined server error, used for opaque errors
    pub const SERVER_ERROR: i64 = -32000;
}

/// Result type for jwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Codec error type
///
/// Every variant except `Serialization` describes malformed input. They are
/// all returned as values so a transport can answer with an error response
/// (see the [`RpcError`] impl below) instead of dropping the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input is not valid JSON text
    #[error("Parse error: {0}")]
    Parse(String),

    /// An outbound payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The `id` member is not a string, an integer or null
    #[error("invalid id type")]
    InvalidIdType,

    /// The `jsonrpc` member is missing or is not exactly "2.0"
    #[error("invalid JSON-RPC version")]
    InvalidVersion,

    /// The object is neither a request, a notification nor a response
    #[error("invalid message type")]
    InvalidMessageShape,

    /// A request without a non-empty `method` string
    #[error("missing method")]
    MissingMethod,

    /// A response carrying neither `result` nor `error`
    #[error("missing result or error")]
    MissingResultOrError,

    /// `params` does not match the expected parameter type
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// `result` does not match the expected result type
    #[error("Invalid result: {0}")]
    InvalidResult(String),

    /// `error` is not a valid error object for the expected data type
    #[error("Invalid error object: {0}")]
    InvalidErrorObject(String),
}

/// The error capability
///
/// Implement this for application errors that know their JSON-RPC code and
/// payload. `Display` provides the human-readable rendering.
///
/// # Examples
///
/// ```rust
/// use jwire_core::{normalize, RpcError};
/// use std::fmt;
///
/// struct InsufficientFunds { balance: u64 }
///
/// impl fmt::Display for InsufficientFunds {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "insufficient funds")
///     }
/// }
///
/// impl RpcError for InsufficientFunds {
///     type Data = u64;
///     fn code(&self) -> i64 { 1001 }
///     fn message(&self) -> String { self.to_string() }
///     fn data(&self) -> Option<u64> { Some(self.balance) }
/// }
///
/// let obj = normalize(&InsufficientFunds { balance: 50 });
/// assert_eq!(obj.code, 1001);
/// assert_eq!(obj.data, Some(50));
/// ```
pub trait RpcError: fmt::Display {
    /// Type of the optional `data` payload
    type Data;

    /// Numeric JSON-RPC error code
    fn code(&self) -> i64;

    /// Short description placed in the `message` member
    fn message(&self) -> String;

    /// Additional payload placed in the `data` member
    fn data(&self) -> Option<Self::Data>;
}

/// Convert any error implementing the capability into an [`ErrorObject`]
///
/// The three structured fields are copied verbatim, so normalizing an
/// `ErrorObject` returns an equal value.
pub fn normalize<T: RpcError + ?Sized>(err: &T) -> ErrorObject<T::Data> {
    ErrorObject {
        code: err.code(),
        message: err.message(),
        data: err.data(),
    }
}

/// Convert a text-only error into an [`ErrorObject`]
///
/// Shorthand for `normalize(&Opaque(err))`.
pub fn normalize_opaque<T: fmt::Display + ?Sized>(err: &T) -> ErrorObject<String> {
    normalize(&Opaque(err))
}

/// Adapter giving the error capability to anything that implements `Display`
///
/// The code is always [`codes::SERVER_ERROR`]; the rendered text is used as
/// both message and data.
#[derive(Debug, Clone, Copy)]
pub struct Opaque<T>(pub T);

impl<T: fmt::Display> fmt::Display for Opaque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: fmt::Display> RpcError for Opaque<T> {
    type Data = String;

    fn code(&self) -> i64 {
        codes::SERVER_ERROR
    }

    fn message(&self) -> String {
        self.0.to_string()
    }

    fn data(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

impl RpcError for Error {
    type Data = serde_json::Value;

    fn code(&self) -> i64 {
        match self {
            Error::Parse(_) => codes::PARSE_ERROR,
            Error::Serialization(_) => codes::INTERNAL_ERROR,
            Error::InvalidParams(_) => codes::INVALID_PARAMS,
            Error::InvalidIdType
            | Error::InvalidVersion
            | Error::InvalidMessageShape
            | Error::MissingMethod
            | Error::MissingResultOrError
            | Error::InvalidResult(_)
            | Error::InvalidErrorObject(_) => codes::INVALID_REQUEST,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn data(&self) -> Option<serde_json::Value> {
        None
    }
}

/// JSON-RPC 2.0 error object
///
/// This is the exact wire format of the `error` member of a response. The
/// `data` member is generic so applications can attach a typed payload;
/// it defaults to an arbitrary JSON value.
///
/// # The empty sentinel
///
/// `ErrorObject::default()` (code `0`, empty message) means "no error". The
/// response encoder never emits it; see [`ErrorObject::is_empty`].
///
/// # Examples
///
/// ```rust
/// use jwire_core::ErrorObject;
/// use serde_json::json;
///
/// let error: ErrorObject = ErrorObject::method_not_found("calculate");
/// assert_eq!(error.code, -32601);
///
/// let custom = ErrorObject::with_data(
///     1001,
///     "Insufficient funds",
///     json!({"balance": 50, "required": 100}),
/// );
/// assert_eq!(custom.as_message(), "Insufficient funds");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject<E = serde_json::Value> {
    /// Numeric error code
    ///
    /// Codes from -32768 to -32000 are reserved by the protocol.
    pub code: i64,

    /// Short human-readable description
    pub message: String,

    /// Optional additional information, omitted from JSON when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<E>,
}

impl<E> Default for ErrorObject<E> {
    fn default() -> Self {
        Self {
            code: 0,
            message: String::new(),
            data: None,
        }
    }
}

impl<E> ErrorObject<E> {
    /// Create an error object without data
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error object with a data payload
    pub fn with_data(code: i64, message: impl Into<String>, data: E) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Parse error (-32700)
    pub fn parse_error() -> Self {
        Self::new(codes::PARSE_ERROR, "Parse error")
    }

    /// Invalid request error (-32600)
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(codes::INVALID_REQUEST, msg)
    }

    /// Method not found error (-32601)
    ///
    /// ```rust
    /// use jwire_core::ErrorObject;
    ///
    /// let error: ErrorObject = ErrorObject::method_not_found("calculateFoo");
    /// assert_eq!(error.message, "Method not found: calculateFoo");
    /// ```
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method.into()),
        )
    }

    /// Invalid params error (-32602)
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, msg)
    }

    /// Internal error (-32603)
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, msg)
    }

    /// Generic server error (-32000)
    pub fn server_error(msg: impl Into<String>) -> Self {
        Self::new(codes::SERVER_ERROR, msg)
    }

    /// The error message
    pub fn as_message(&self) -> &str {
        &self.message
    }

    /// True for the "no error" sentinel: code 0 and an empty message
    pub fn is_empty(&self) -> bool {
        self.code == 0 && self.message.is_empty()
    }

    /// Convert the data payload, keeping code and message
    pub fn map_data<U>(self, f: impl FnOnce(E) -> U) -> ErrorObject<U> {
        ErrorObject {
            code: self.code,
            message: self.message,
            data: self.data.map(f),
        }
    }
}

impl<E: Clone> RpcError for ErrorObject<E> {
    type Data = E;

    fn code(&self) -> i64 {
        self.code
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn data(&self) -> Option<E> {
        self.data.clone()
    }
}

impl<E> fmt::Display for ErrorObject<E> {
    /// Formats as "[code] message", e.g. "[-32601] Method not found: foo"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl<E: fmt::Debug> std::error::Error for ErrorObject<E> {}
