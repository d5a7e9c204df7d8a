//! XML-RPC encoder
//!
//! Walks a [`Value`] tree and emits its exact textual form. Documents are
//! staged in a reusable buffer and handed to the output stream in one write.

use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::Result;
use crate::value::{MethodCall, MethodResponse, Params, Value};

use super::{format_double, Tag, Writer, DATE_TIME_WRITE_FORMAT};

/// Reusable encoder state
#[derive(Debug, Default)]
pub struct Encoder {
    scratch: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Clear per-call state, shrinking the staging buffer past `max_capacity`
    pub fn reset(&mut self, max_capacity: usize) {
        self.scratch.clear();
        if self.scratch.capacity() > max_capacity {
            self.scratch.shrink_to(max_capacity);
        }
    }

    /// Encode a `methodCall` document
    pub fn write_call<W: Write>(&mut self, out: W, call: &MethodCall) -> Result<()> {
        self.stage(out, |w| {
            w.declaration()?;
            w.element(Tag::MethodCall, |w| {
                w.text(Tag::MethodName, &call.method)?;
                write_params(w, &call.params)
            })
        })
    }

    /// Encode a `methodResponse` document; the fault branch wins when present
    pub fn write_response<W: Write>(&mut self, out: W, response: &MethodResponse) -> Result<()> {
        self.stage(out, |w| {
            w.declaration()?;
            w.element(Tag::MethodResponse, |w| {
                if response.is_fault() {
                    w.element(Tag::Fault, |w| write_value(w, &response.fault))
                } else {
                    write_params(w, &response.params)
                }
            })
        })
    }

    /// Encode a single `<value>` element
    pub fn write_value<W: Write>(&mut self, out: W, value: &Value) -> Result<()> {
        self.stage(out, |w| write_value(w, value))
    }

    fn stage<W, F>(&mut self, mut out: W, body: F) -> Result<()>
    where
        W: Write,
        F: FnOnce(&mut Writer<&mut Vec<u8>>) -> io::Result<()>,
    {
        self.scratch.clear();
        body(&mut Writer::new(&mut self.scratch))?;
        out.write_all(&self.scratch)?;
        out.flush()?;
        Ok(())
    }
}

fn write_params<W: Write>(w: &mut Writer<W>, params: &Params) -> io::Result<()> {
    w.element(Tag::Params, |w| {
        for value in params.values() {
            w.element(Tag::Param, |w| write_value(w, value))?;
        }
        Ok(())
    })
}

/// Emit `<value>…</value>` for any value kind
pub fn write_value<W: Write>(w: &mut Writer<W>, value: &Value) -> io::Result<()> {
    w.element(Tag::Value, |w| match value {
        Value::Nil => Ok(()),
        Value::Int(i) => w.raw(Tag::Int, &i.to_string()),
        Value::Boolean(b) => w.raw(Tag::Boolean, if *b { "1" } else { "0" }),
        Value::Double(d) => w.raw(Tag::Double, &format_double(*d)),
        Value::String(s) => w.text(Tag::String, s),
        Value::DateTime(dt) => w.raw(Tag::DateTime, &dt.format(DATE_TIME_WRITE_FORMAT).to_string()),
        Value::Base64(bytes) => w.raw(Tag::Base64, &STANDARD.encode(bytes)),
        Value::Array(items) => w.element(Tag::Array, |w| {
            w.element(Tag::Data, |w| {
                for item in items {
                    write_value(w, item)?;
                }
                Ok(())
            })
        }),
        Value::Struct(members) => w.element(Tag::Struct, |w| {
            for member in members {
                w.element(Tag::Member, |w| {
                    w.text(Tag::Name, &member.name)?;
                    write_value(w, &member.value)
                })?;
            }
            Ok(())
        }),
    })
}
