//! jwire - JSON-RPC 2.0 message codec
//!
//! This is the convenience crate that re-exports the jwire sub-crates. Use it
//! if you want a single dependency.
//!
//! # Architecture
//!
//! - **jwire-core**: identifiers, error objects, message classification and
//!   the request/response codec, plus logging setup
//!
//! Transports, dispatchers and batching live outside jwire and consume these
//! types.
//!
//! # Quick Start
//!
//! ```rust
//! use jwire::{codec, normalize_opaque, Id, Message, Response};
//! use serde_json::Value;
//!
//! let inbound = br#"{"jsonrpc":"2.0","method":"divide","params":[1,0],"id":"q-1"}"#;
//!
//! let reply: Response<Value, String> = match codec::decode::<Value, Value, Value>(inbound) {
//!     Ok(Message::Request(req)) => {
//!         let failure = std::io::Error::new(std::io::ErrorKind::Other, "division by zero");
//!         Response::error(normalize_opaque(&failure), req.id)
//!     }
//!     _ => Response::error(normalize_opaque("unexpected message"), Id::Null),
//! };
//!
//! assert_eq!(
//!     codec::encode_response(&reply).unwrap(),
//!     r#"{"jsonrpc":"2.0","id":"q-1","error":{"code":-32000,"message":"division by zero","data":"division by zero"}}"#
//! );
//! ```

// Re-export all public APIs from sub-crates
pub use jwire_core as core;

// Convenience re-exports of the most commonly used items
pub use jwire_core::{
    codec, codes, normalize, normalize_opaque, Discriminator, Error, ErrorObject, Id, Message,
    MessageKind, Opaque, Request, Response, Result, RpcError,
};
