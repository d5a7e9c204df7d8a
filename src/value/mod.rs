//! Value Module
//!
//! The tagged-union representation of an XML-RPC value and the message
//! envelopes built from it.
//!
//! ## Kinds
//! ```text
//! nil | boolean | int | double | dateTime | base64 | string | array | struct
//! ```
//!
//! Values are transient: built per request/response and dropped once they have
//! been written out or projected into a native value.

mod message;

use std::fmt;

pub use message::{MethodCall, MethodResponse, Params};

/// Payload of a `dateTime.iso8601` value
pub type DateTime = chrono::DateTime<chrono::FixedOffset>;

/// An XML-RPC value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value (encodes as an empty `<value>`)
    #[default]
    Nil,
    Boolean(bool),
    Int(i64),
    Double(f64),
    DateTime(DateTime),
    Base64(Vec<u8>),
    String(String),
    Array(Vec<Value>),
    /// Members in insertion order
    Struct(Vec<Member>),
}

/// A named struct member
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub value: Value,
}

impl Member {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Value kinds, used for shape checks and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Boolean,
    Int,
    Double,
    DateTime,
    Base64,
    String,
    Array,
    Struct,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Nil => "nil",
            Kind::Boolean => "boolean",
            Kind::Int => "int",
            Kind::Double => "double",
            Kind::DateTime => "dateTime.iso8601",
            Kind::Base64 => "base64",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Struct => "struct",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Boolean(_) => Kind::Boolean,
            Value::Int(_) => Kind::Int,
            Value::Double(_) => Kind::Double,
            Value::DateTime(_) => Kind::DateTime,
            Value::Base64(_) => Kind::Base64,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Struct(_) => Kind::Struct,
        }
    }

    /// `nil`, an empty array and an empty struct are all empty.
    ///
    /// Projecting an empty value leaves the destination untouched.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Array(items) => items.is_empty(),
            Value::Struct(members) => members.is_empty(),
            _ => false,
        }
    }

    /// Look up a struct member by name
    pub fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.iter().find(|m| m.name == name).map(|m| &m.value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}
