//! Codec Module
//!
//! The four request/response operations, built on one decoder/encoder pair.
//!
//! ## Components
//! - `Codec`: a reusable decoder/encoder pair
//! - `CodecPool`: bounded pool of idle pairs handed out as RAII guards
//! - `BufferPool`: per-method staging buffers for outgoing requests

mod buffer;
mod pool;

use std::error::Error as StdError;
use std::io::{BufRead, Write};

pub use buffer::BufferPool;
pub use pool::{with_codec, CodecPool, PooledCodec};

use crate::config::Config;
use crate::error::Result;
use crate::fault::{Fault, FaultCode};
use crate::mapper::{self, FromValue, ToValue};
use crate::protocol::{Decoder, Encoder};
use crate::value::{MethodCall, MethodResponse, Params};

/// A decoder/encoder pair.
///
/// Not shareable between concurrent calls; take one from a [`CodecPool`] per
/// call instead.
#[derive(Debug)]
pub struct Codec {
    decoder: Decoder,
    encoder: Encoder,
    max_retained: usize,
}

impl Default for Codec {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            decoder: Decoder::with_capacity(config.buffer_capacity),
            encoder: Encoder::with_capacity(config.buffer_capacity),
            max_retained: config.max_retained_capacity,
        }
    }

    /// A pair with no buffers, left behind when a pooled pair is released
    pub(crate) fn detached() -> Self {
        Self {
            decoder: Decoder::new(),
            encoder: Encoder::new(),
            max_retained: 0,
        }
    }

    /// Clear all per-call state
    pub fn reset(&mut self) {
        self.decoder.reset(self.max_retained);
        self.encoder.reset(self.max_retained);
    }

    // =========================================================================
    // Client side
    // =========================================================================

    /// Encode a call to `method` with positional `args`
    pub fn write_request<W: Write>(&mut self, out: W, method: &str, args: &[&dyn ToValue]) -> Result<()> {
        tracing::debug!("Writing request {} with {} params", method, args.len());
        self.encoder.write_call(out, &MethodCall::new(method, args))
    }

    /// Decode a response into `reply`.
    ///
    /// A fault response is returned as `Err` carrying the [`Fault`]; `reply`
    /// is left untouched in that case.
    pub fn read_response<R, T>(&mut self, input: R, reply: &mut T) -> Result<()>
    where
        R: BufRead,
        T: FromValue + ?Sized,
    {
        let response = self.decoder.read_response(input)?;
        if let Some(fault) = response.to_fault()? {
            tracing::debug!("Read fault response {}", fault);
            return Err(fault.into());
        }
        tracing::debug!("Read response with {} params", response.params.len());
        response.params.project_into(reply)
    }

    // =========================================================================
    // Server side
    // =========================================================================

    /// Decode a call, returning the method name and its raw parameters
    pub fn read_request<R: BufRead>(&mut self, input: R) -> Result<(String, Params)> {
        let call = self.decoder.read_call(input)?;
        if call.method.is_empty() {
            return Err(FaultCode::InvalidRequest.fault("invalid method name").into());
        }
        tracing::debug!("Read request {} with {} params", call.method, call.params.len());
        Ok((call.method, call.params))
    }

    /// Decode a call, projecting its parameters into `params`
    pub fn read_request_into<R, T>(&mut self, input: R, params: &mut T) -> Result<String>
    where
        R: BufRead,
        T: FromValue + ?Sized,
    {
        let (method, received) = self.read_request(input)?;
        received.project_into(params)?;
        Ok(method)
    }

    /// Encode a response carrying `reply`.
    ///
    /// A [`Fault`] payload is written as a fault response.
    pub fn write_response<W, T>(&mut self, out: W, reply: &T) -> Result<()>
    where
        W: Write,
        T: ToValue + ?Sized,
    {
        let response = MethodResponse::reply(reply);
        tracing::debug!("Writing response (fault: {})", response.is_fault());
        self.encoder.write_response(out, &response)
    }

    /// Encode a fault response
    pub fn write_fault<W: Write>(&mut self, out: W, fault: &Fault) -> Result<()> {
        tracing::debug!("Writing fault response {}", fault);
        self.encoder.write_response(out, &MethodResponse::failure(fault))
    }

    /// Encode any error as a fault response; non-fault errors become
    /// `InternalError` faults
    pub fn write_error<W: Write>(&mut self, out: W, error: &(dyn StdError + 'static)) -> Result<()> {
        let response = MethodResponse::from_error(error);
        tracing::debug!("Writing error response: {}", error);
        self.encoder.write_response(out, &response)
    }

    // =========================================================================
    // Bare values
    // =========================================================================

    /// Encode a single `<value>` element
    pub fn write_value<W, T>(&mut self, out: W, value: &T) -> Result<()>
    where
        W: Write,
        T: ToValue + ?Sized,
    {
        self.encoder.write_value(out, &value.to_value())
    }

    /// Decode a single `<value>` element into `dest`
    pub fn read_value<R, T>(&mut self, input: R, dest: &mut T) -> Result<()>
    where
        R: BufRead,
        T: FromValue + ?Sized,
    {
        let value = self.decoder.read_value(input)?;
        mapper::project(&value, dest)
    }
}
