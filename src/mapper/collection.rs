//! Sequence, map and wrapper mappings

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::BuildHasher;

use crate::error::Result;
use crate::fault::Fault;
use crate::value::{Member, Value};

use super::{mismatch, project, FromValue, ToValue};

// =============================================================================
// Wrappers
// =============================================================================

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn as_fault(&self) -> Option<&Fault> {
        (**self).as_fault()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn as_fault(&self) -> Option<&Fault> {
        (**self).as_fault()
    }
}

impl<T: FromValue + ?Sized> FromValue for Box<T> {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        (**self).from_value(value)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Nil, ToValue::to_value)
    }
}

/// Projects into the held value, creating a default one first if needed
impl<T: FromValue + Default> FromValue for Option<T> {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        self.get_or_insert_with(T::default).from_value(value)
    }
}

// =============================================================================
// Sequences
// =============================================================================

fn array_of<'a, T, I>(items: I) -> Value
where
    T: ToValue + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Array(items.into_iter().map(ToValue::to_value).collect())
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        array_of(self)
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        array_of(self)
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        array_of(self)
    }
}

/// Appends the received elements; nothing is appended when any element fails
impl<T: FromValue + Default> FromValue for Vec<T> {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(mismatch("Vec", other)),
        };

        let mut received = Vec::with_capacity(items.len());
        for item in items {
            let mut slot = T::default();
            project(item, &mut slot)?;
            received.push(slot);
        }
        self.extend(received);
        Ok(())
    }
}

// =============================================================================
// Maps
// =============================================================================

fn struct_of<'a, K, V, I>(entries: I) -> Value
where
    K: Display + 'a,
    V: ToValue + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    Value::Struct(
        entries
            .into_iter()
            .map(|(key, value)| Member::new(key.to_string(), value.to_value()))
            .collect(),
    )
}

impl<K: Display, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        struct_of(self)
    }
}

/// Member order follows the map's iteration order
impl<K: Display, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        struct_of(self)
    }
}

/// Project every member into a fresh value; nothing is returned when any
/// member fails
fn project_members<V: FromValue + Default>(members: &[Member]) -> Result<Vec<(String, V)>> {
    let mut received = Vec::with_capacity(members.len());
    for member in members {
        let mut slot = V::default();
        project(&member.value, &mut slot)?;
        received.push((member.name.clone(), slot));
    }
    Ok(received)
}

/// Received members replace existing entries of the same name
impl<V: FromValue + Default> FromValue for BTreeMap<String, V> {
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Struct(members) => {
                self.extend(project_members(members)?);
                Ok(())
            }
            other => Err(mismatch("BTreeMap", other)),
        }
    }
}

impl<V, S> FromValue for HashMap<String, V, S>
where
    V: FromValue + Default,
    S: BuildHasher,
{
    fn from_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Struct(members) => {
                self.extend(project_members(members)?);
                Ok(())
            }
            other => Err(mismatch("HashMap", other)),
        }
    }
}
