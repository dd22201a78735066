//! Core JSON-RPC 2.0 types and codec for jwire
//!
//! This crate provides the message-level building blocks of JSON-RPC 2.0:
//!
//! - **Identifiers**: the string | integer | absent `id` union, strictly validated
//! - **Errors**: the wire error object, the [`RpcError`] capability and
//!   normalization of arbitrary errors
//! - **Codec**: message classification before decoding, and typed
//!   encoding/decoding of requests, notifications and responses
//! - **Observability**: `tracing` subscriber setup for hosts that want logs
//!
//! # Architecture
//!
//! The crate is transport-agnostic: it turns bytes into typed messages and
//! back, and leaves sockets, dispatch and batching to its callers. All
//! operations are pure functions over their inputs.
//!
//! # Example
//!
//! ```rust
//! use jwire_core::{codec, Id, Message, Request, Response};
//! use serde_json::json;
//!
//! // Outbound request
//! let request = Request::new("add", Some(json!({"a": 5, "b": 3})), Id::Number(1));
//! let wire = codec::encode_request(&request).unwrap();
//!
//! // Inbound message of unknown kind
//! let message: Message = codec::decode(&wire).unwrap();
//! assert!(message.is_request());
//!
//! // Reply
//! let response: Response = Response::success(json!(8), request.id.clone());
//! assert_eq!(
//!     codec::encode_response(&response).unwrap(),
//!     r#"{"jsonrpc":"2.0","id":1,"result":8}"#
//! );
//! ```

pub mod codec;
pub mod error;
pub mod id;
pub mod observability;
pub mod types;

// Re-export the most commonly used items
pub use codec::{Discriminator, MessageKind};
pub use error::{codes, normalize, normalize_opaque, Error, ErrorObject, Opaque, Result, RpcError};
pub use id::Id;
pub use observability::{init_observability, ObservabilityConfig};
pub use types::{Message, Request, Response, Version, JSONRPC_VERSION};
