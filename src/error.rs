//! Error types for the XML-RPC codec
//!
//! Everything the codec reports is either a wire [`Fault`] or an I/O failure of
//! the byte stream owned by the transport.

use std::sync::Arc;

use thiserror::Error;

use crate::fault::{Fault, FaultCode};

/// Result type alias using XmlRpcError
pub type Result<T> = std::result::Result<T, XmlRpcError>;

/// Unified error type for codec operations
#[derive(Debug, Error)]
pub enum XmlRpcError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Wire Faults
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl XmlRpcError {
    /// The fault carried by this error, if any
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            XmlRpcError::Fault(fault) => Some(fault),
            XmlRpcError::Io(_) => None,
        }
    }

    /// Convert into a wire fault; stream failures become `InternalError`
    pub fn into_fault(self) -> Fault {
        match self {
            XmlRpcError::Fault(fault) => fault,
            XmlRpcError::Io(e) => FaultCode::InternalError.fault(e.to_string()),
        }
    }
}

impl From<FaultCode> for XmlRpcError {
    fn from(code: FaultCode) -> Self {
        XmlRpcError::Fault(code.fault(""))
    }
}

impl From<quick_xml::Error> for XmlRpcError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => XmlRpcError::Io(
                Arc::try_unwrap(e).unwrap_or_else(|e| std::io::Error::new(e.kind(), e.to_string())),
            ),
            quick_xml::Error::Encoding(e) => FaultCode::InvalidCharacter.fault(e.to_string()).into(),
            other => FaultCode::MalformedInput.fault(other.to_string()).into(),
        }
    }
}
