//! Mapper Module
//!
//! Converts native values into [`Value`] trees ([`ToValue`]) and projects
//! decoded values back into native destinations ([`FromValue`]).
//!
//! ## Supported shapes
//! ```text
//! native                         value kind
//! ─────────────────────────────  ──────────
//! ()  / None                     nil
//! bool                           boolean
//! i8..i64, u8..u64, isize/usize  int
//! f32, f64                       double
//! str, String                    string
//! bytes::Bytes                   base64 (Vec<u8> stays an int array)
//! chrono DateTime / NaiveDateTime dateTime
//! Vec<T>, [T], [T; N]            array
//! BTreeMap / HashMap             struct (key text as member name)
//! record!{ .. }                  struct (field or wire name)
//! Option<T>, Box<T>              whatever T maps to
//! Value                          itself (no shape checks)
//! ```

mod primitive;
mod collection;
mod record;

use crate::error::Result;
use crate::fault::{Fault, FaultCode};
use crate::value::Value;

/// Native value → [`Value`]
///
/// Byte sequences: only [`bytes::Bytes`] maps to `base64`. `Vec<u8>`, `[u8]`
/// and `[u8; N]` are ordinary sequences and map to an array of `int`; wrap
/// them in `Bytes` (`Bytes::from(vec)`) to send `base64`.
pub trait ToValue {
    fn to_value(&self) -> Value;

    /// The fault carried by this value, if it is one.
    ///
    /// A response payload that reports a fault is written as a fault
    /// response instead of params.
    fn as_fault(&self) -> Option<&Fault> {
        None
    }
}

/// [`Value`] → existing native slot.
///
/// Implementations overwrite scalars, append to sequences and assign record
/// fields by member name. Callers should go through [`project`], which skips
/// empty values.
pub trait FromValue {
    fn from_value(&mut self, value: &Value) -> Result<()>;
}

/// Project `value` into `dest`.
///
/// `nil`, empty arrays and empty structs leave `dest` untouched.
pub fn project<T>(value: &Value, dest: &mut T) -> Result<()>
where
    T: FromValue + ?Sized,
{
    if value.is_empty() {
        return Ok(());
    }
    dest.from_value(value)
}

/// Project a struct value member by member.
///
/// `assign` receives each member's wire name and value and reports whether the
/// name belongs to the destination; unknown names fail.
pub fn project_record<F>(value: &Value, record: &str, mut assign: F) -> Result<()>
where
    F: FnMut(&str, &Value) -> Result<bool>,
{
    let members = match value {
        Value::Struct(members) => members,
        other => return Err(mismatch(record, other)),
    };

    for member in members {
        if !assign(&member.name, &member.value)? {
            return Err(FaultCode::InternalError
                .fault(format!("error writing struct {}. unknown field {}", record, member.name))
                .into());
        }
    }
    Ok(())
}

/// Shape mismatch between a value and its destination
pub(crate) fn mismatch(expected: &str, found: &Value) -> crate::error::XmlRpcError {
    FaultCode::InternalError
        .fault(format!("type mismatch: cannot write {} value into {}", found.kind(), expected))
        .into()
}
