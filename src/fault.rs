//! Fault taxonomy
//!
//! A [`Fault`] is both a wire value (a two-member struct) and an error that can
//! be propagated with `?`. Codes follow the xmlrpc-epi fault code convention:
//! http://xmlrpc-epi.sourceforge.net/specs/rfc.fault_codes.php

use std::fmt;

use thiserror::Error;

use crate::error::Result;
use crate::mapper::{self, FromValue, ToValue};
use crate::value::{Member, Value};

/// Well-known fault codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FaultCode {
    // parse errors
    MalformedInput = -32700,
    UnsupportedEncoding = -32701,
    InvalidCharacter = -32702,

    // server errors
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
}

impl FaultCode {
    pub const ALL: [FaultCode; 7] = [
        FaultCode::MalformedInput,
        FaultCode::UnsupportedEncoding,
        FaultCode::InvalidCharacter,
        FaultCode::InvalidRequest,
        FaultCode::MethodNotFound,
        FaultCode::InvalidParams,
        FaultCode::InternalError,
    ];

    /// Numeric wire code
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Message used when a fault is raised without one
    pub const fn default_message(self) -> &'static str {
        match self {
            FaultCode::MalformedInput => "malformed input",
            FaultCode::UnsupportedEncoding => "unsupported encoding",
            FaultCode::InvalidCharacter => "invalid character for encoding",
            FaultCode::InvalidRequest => "invalid xml-rpc. not conforming to spec",
            FaultCode::MethodNotFound => "requested method not found",
            FaultCode::InvalidParams => "invalid method parameters",
            FaultCode::InternalError => "internal xml-rpc error",
        }
    }

    /// Look up a well-known code
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Instantiate a fault with this code.
    ///
    /// An empty message falls back to [`FaultCode::default_message`].
    pub fn fault(self, message: impl Into<String>) -> Fault {
        let message = message.into();
        let message = if message.is_empty() {
            self.default_message().to_string()
        } else {
            message
        };
        Fault {
            code: self.code(),
            message,
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.default_message())
    }
}

/// An XML-RPC fault.
///
/// Serializes as `<struct>` with the members `faultCode` and `faultString`.
/// Passed as a response payload, it always takes the fault branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Fault {
    pub code: i32,
    pub message: String,
}

const CODE_MEMBER: &str = "faultCode";
const MESSAGE_MEMBER: &str = "faultString";

impl ToValue for Fault {
    fn to_value(&self) -> Value {
        Value::Struct(vec![
            Member::new(CODE_MEMBER, self.code.to_value()),
            Member::new(MESSAGE_MEMBER, self.message.to_value()),
        ])
    }

    fn as_fault(&self) -> Option<&Fault> {
        Some(self)
    }
}

impl FromValue for Fault {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        mapper::project_record(value, "Fault", |name, member| match name {
            CODE_MEMBER => mapper::project(member, &mut self.code).map(|()| true),
            MESSAGE_MEMBER => mapper::project(member, &mut self.message).map(|()| true),
            _ => Ok(false),
        })
    }
}

impl Fault {
    /// Create a fault with an arbitrary (application defined) code
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The well-known code of this fault, if it has one
    pub fn fault_code(&self) -> Option<FaultCode> {
        FaultCode::from_code(self.code)
    }

    /// Whether this fault carries the given well-known code
    pub fn is(&self, code: FaultCode) -> bool {
        self.code == code.code()
    }
}

impl From<FaultCode> for Fault {
    fn from(code: FaultCode) -> Self {
        code.fault("")
    }
}
