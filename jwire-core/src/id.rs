//! JSON-RPC 2.0 message identifiers
//!
//! The `id` member correlates a response with the request that produced it.
//! JSON-RPC 2.0 allows three shapes for it: a string, a number, or nothing at
//! all. This module models those three shapes as a closed enum so that every
//! consumer has to handle all of them and no fourth shape can sneak in.
//!
//! # Strictness
//!
//! Decoding is strict. Only the following JSON values are accepted:
//!
//! - a string, kept byte for byte
//! - an integer that fits in an `i64` (integer-valued floats such as `1.0`
//!   are accepted as integers)
//! - `null`, which decodes to [`Id::Null`]
//!
//! Booleans, arrays, objects and numbers with a fractional part are rejected
//! with [`Error::InvalidIdType`].

use crate::error::{Error, Result};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// JSON-RPC 2.0 message identifier
///
/// An `Id` is either absent ([`Id::Null`]), a string, or a signed integer.
/// A request with an absent id is a notification and receives no reply.
///
/// # Display
///
/// `Display` renders the identifier for logs and map keys: strings are
/// printed as-is, integers in decimal, and the absent id as an empty string.
///
/// # Examples
///
/// ```rust
/// use jwire_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.to_string(), "req-123");
/// assert_eq!(id2.to_string(), "42");
/// assert_eq!(Id::Null.to_string(), "");
///
/// assert_eq!(id2.to_json(), "42");
/// assert_eq!(Id::from_json("\"req-123\"").unwrap(), id1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Id {
    /// No identifier: the message is a notification, or a response whose
    /// request id could not be determined
    #[default]
    Null,
    /// String identifier, compared byte-wise
    String(String),
    /// Integer identifier
    Number(i64),
}

impl Id {
    /// Returns true if the identifier is absent
    pub fn is_null(&self) -> bool {
        matches!(self, Id::Null)
    }

    /// Decode an identifier from raw JSON text
    ///
    /// # Errors
    ///
    /// - `Error::Parse` if `raw` is not valid JSON
    /// - `Error::InvalidIdType` if the JSON value is not a string, an integer or `null`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jwire_core::{Error, Id};
    ///
    /// assert_eq!(Id::from_json("7").unwrap(), Id::Number(7));
    /// assert_eq!(Id::from_json("null").unwrap(), Id::Null);
    /// assert!(matches!(Id::from_json("true"), Err(Error::InvalidIdType)));
    /// ```
    pub fn from_json(raw: impl AsRef<[u8]>) -> Result<Self> {
        serde_json::from_slice(raw.as_ref()).map_err(|e| {
            if e.is_data() {
                Error::InvalidIdType
            } else {
                Error::Parse(e.to_string())
            }
        })
    }

    /// Decode an identifier from an already parsed JSON value
    ///
    /// This is what the envelope decoders use for the `id` member.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Id::deserialize(value).map_err(|_| Error::InvalidIdType)
    }

    /// Encode the identifier as a JSON value
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Id::Null => serde_json::Value::Null,
            Id::String(s) => serde_json::Value::String(s.clone()),
            Id::Number(n) => serde_json::Value::from(*n),
        }
    }

    /// Encode the identifier as JSON text
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Null => Ok(()),
            Id::String(s) => f.write_str(s),
            Id::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Id::Null => serializer.serialize_unit(),
            Id::String(s) => serializer.serialize_str(s),
            Id::Number(n) => serializer.serialize_i64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, an integer or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Id, E> {
        Ok(Id::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Id, E> {
        Ok(Id::String(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Id, E> {
        Ok(Id::Number(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Id, E> {
        i64::try_from(v)
            .map(Id::Number)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Id, E> {
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Ok(Id::Number(v as i64))
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Id, E> {
        Ok(Id::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Id, E> {
        Ok(Id::Null)
    }
}

// Convenience conversions so ids can be passed as `.into()`

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<i32> for Id {
    fn from(n: i32) -> Self {
        Id::Number(n.into())
    }
}

impl From<u32> for Id {
    fn from(n: u32) -> Self {
        Id::Number(n.into())
    }
}

impl TryFrom<u64> for Id {
    type Error = Error;

    /// Fails with `Error::InvalidIdType` for values above `i64::MAX`
    fn try_from(n: u64) -> Result<Self> {
        i64::try_from(n).map(Id::Number).map_err(|_| Error::InvalidIdType)
    }
}
