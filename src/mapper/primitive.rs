//! Scalar mappings

use bytes::Bytes;
use chrono::{NaiveDateTime, TimeZone, Utc};

use crate::error::Result;
use crate::fault::FaultCode;
use crate::value::{DateTime, Value};

use super::{mismatch, FromValue, ToValue};

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Nil
    }
}

/// Discards whatever was received
impl FromValue for () {
    fn from_value(&mut self, _value: &Value) -> Result<()> {
        Ok(())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl FromValue for bool {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Boolean(b) => {
                *self = *b;
                Ok(())
            }
            other => Err(mismatch("bool", other)),
        }
    }
}

/// Every integer width maps to `int`; projection is range checked.
macro_rules! int_mappings {
    ($($ty:ty),* $(,)?) => {$(
        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                match i64::try_from(*self) {
                    Ok(i) => Value::Int(i),
                    Err(_) => {
                        tracing::warn!(value = %self, "integer does not fit an xml-rpc int, sending nil");
                        Value::Nil
                    }
                }
            }
        }

        impl FromValue for $ty {
            fn from_value(&mut self, value: &Value) -> Result<()> {
                match value {
                    Value::Int(i) => {
                        *self = <$ty>::try_from(*i).map_err(|_| {
                            FaultCode::InternalError
                                .fault(format!("int {} out of range for {}", i, stringify!($ty)))
                        })?;
                        Ok(())
                    }
                    other => Err(mismatch(stringify!($ty), other)),
                }
            }
        }
    )*};
}

int_mappings!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Double(*self)
    }
}

impl FromValue for f64 {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Double(d) => {
                *self = *d;
                Ok(())
            }
            other => Err(mismatch("f64", other)),
        }
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Double(f64::from(*self))
    }
}

impl FromValue for f32 {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Double(d) => {
                *self = *d as f32;
                Ok(())
            }
            other => Err(mismatch("f32", other)),
        }
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromValue for String {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::String(s) => {
                self.clone_from(s);
                Ok(())
            }
            other => Err(mismatch("String", other)),
        }
    }
}

impl ToValue for Bytes {
    fn to_value(&self) -> Value {
        Value::Base64(self.to_vec())
    }
}

impl FromValue for Bytes {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Base64(raw) => {
                *self = Bytes::copy_from_slice(raw);
                Ok(())
            }
            other => Err(mismatch("Bytes", other)),
        }
    }
}

// =============================================================================
// Date/Time
// =============================================================================

impl<Tz: TimeZone> ToValue for chrono::DateTime<Tz> {
    fn to_value(&self) -> Value {
        Value::DateTime(self.fixed_offset())
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::DateTime(self.and_utc().fixed_offset())
    }
}

impl FromValue for DateTime {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::DateTime(dt) => {
                *self = *dt;
                Ok(())
            }
            other => Err(mismatch("DateTime<FixedOffset>", other)),
        }
    }
}

impl FromValue for chrono::DateTime<Utc> {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::DateTime(dt) => {
                *self = dt.with_timezone(&Utc);
                Ok(())
            }
            other => Err(mismatch("DateTime<Utc>", other)),
        }
    }
}

/// Keeps the wall-clock time as written on the wire
impl FromValue for NaiveDateTime {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::DateTime(dt) => {
                *self = dt.naive_local();
                Ok(())
            }
            other => Err(mismatch("NaiveDateTime", other)),
        }
    }
}

// =============================================================================
// Dynamic
// =============================================================================

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

/// Receives the decoded value as is
impl FromValue for Value {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        self.clone_from(value);
        Ok(())
    }
}

