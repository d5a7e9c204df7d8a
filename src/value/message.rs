//! Message envelopes
//!
//! `methodCall` / `methodResponse` and the parameter list they share.

use crate::error::{Result, XmlRpcError};
use crate::fault::{Fault, FaultCode};
use crate::mapper::{self, FromValue, ToValue};

use super::Value;

/// Positional parameters of a call or response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert native arguments into parameters
    pub fn from_args(args: &[&dyn ToValue]) -> Self {
        Params(args.iter().map(|arg| arg.to_value()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Project the parameters into a native destination.
    ///
    /// A single parameter is projected directly. Several parameters are
    /// projected as one array, so positional arguments can be received into a
    /// single sequence-typed destination.
    pub fn project_into<T>(self, dest: &mut T) -> Result<()>
    where
        T: FromValue + ?Sized,
    {
        let mut params = self.0;
        match params.len() {
            0 => Ok(()),
            1 => {
                let value = params.swap_remove(0);
                mapper::project(&value, dest)
            }
            _ => mapper::project(&Value::Array(params), dest),
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params(values)
    }
}

/// An XML-RPC request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodCall {
    pub method: String,
    pub params: Params,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, args: &[&dyn ToValue]) -> Self {
        Self {
            method: method.into(),
            params: Params::from_args(args),
        }
    }
}

/// An XML-RPC response.
///
/// Either params or a fault. The response is a fault iff `fault` is a
/// non-empty struct.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodResponse {
    pub params: Params,
    pub fault: Value,
}

impl MethodResponse {
    /// A params response carrying one value, whatever it is
    pub fn success<T>(reply: &T) -> Self
    where
        T: ToValue + ?Sized,
    {
        Self {
            params: Params(vec![reply.to_value()]),
            fault: Value::Nil,
        }
    }

    /// A response for an arbitrary payload; faults take the fault branch
    pub fn reply<T>(payload: &T) -> Self
    where
        T: ToValue + ?Sized,
    {
        match payload.as_fault() {
            Some(fault) => Self::failure(fault),
            None => Self::success(payload),
        }
    }

    pub fn failure(fault: &Fault) -> Self {
        Self {
            params: Params::default(),
            fault: fault.to_value(),
        }
    }

    /// A fault response for an arbitrary error.
    ///
    /// Faults (bare or wrapped in [`XmlRpcError`]) are sent as they are; any
    /// other error becomes an `InternalError` fault carrying its message.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(fault) = error.downcast_ref::<Fault>() {
            return Self::failure(fault);
        }
        if let Some(fault) = error.downcast_ref::<XmlRpcError>().and_then(XmlRpcError::fault) {
            return Self::failure(fault);
        }
        Self::failure(&FaultCode::InternalError.fault(error.to_string()))
    }

    pub fn is_fault(&self) -> bool {
        matches!(&self.fault, Value::Struct(members) if !members.is_empty())
    }

    /// Project the fault value into a [`Fault`]
    pub fn to_fault(&self) -> Result<Option<Fault>> {
        if !self.is_fault() {
            return Ok(None);
        }
        let mut fault = Fault::default();
        mapper::project(&self.fault, &mut fault)?;
        Ok(Some(fault))
    }
}
