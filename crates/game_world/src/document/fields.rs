//! Typed field access for component and service data
//!
//! Readers return `None` when a field is absent so callers can leave the
//! current value untouched. A field that is present but has the wrong shape is
//! logged and also treated as absent.

use super::{Document, Value};
use crate::foundation::math::Vec3;
use crate::world::{Result, WorldError};

#[allow(clippy::cast_possible_truncation)]
fn as_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Float(v) => Some(*v as f32),
        Value::Integer(v) => Some(*v as f32),
        _ => None,
    }
}

fn mismatch(field: &str, expected: &str, value: &Value) {
    log::warn!("Ignoring field '{}': expected {}, found {}", field, expected, value.type_str());
}

/// Read a number as `f32` (integers are accepted)
pub fn read_f32(data: &Document, field: &str) -> Option<f32> {
    let value = data.get(field)?;
    let parsed = as_f32(value);
    if parsed.is_none() {
        mismatch(field, "a number", value);
    }
    parsed
}

/// Read a non-negative integer that fits in `u32`
pub fn read_u32(data: &Document, field: &str) -> Option<u32> {
    let value = data.get(field)?;
    let parsed = value.as_integer().and_then(|v| u32::try_from(v).ok());
    if parsed.is_none() {
        mismatch(field, "an unsigned 32-bit integer", value);
    }
    parsed
}

/// Read a boolean
pub fn read_bool(data: &Document, field: &str) -> Option<bool> {
    let value = data.get(field)?;
    let parsed = value.as_bool();
    if parsed.is_none() {
        mismatch(field, "a boolean", value);
    }
    parsed
}

/// Read a string
pub fn read_string(data: &Document, field: &str) -> Option<String> {
    let value = data.get(field)?;
    let parsed = value.as_str().map(str::to_owned);
    if parsed.is_none() {
        mismatch(field, "a string", value);
    }
    parsed
}

fn read_floats<const N: usize>(data: &Document, field: &str) -> Option<[f32; N]> {
    let value = data.get(field)?;
    let parsed = value.as_array().filter(|items| items.len() == N).and_then(|items| {
        let mut out = [0.0; N];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = as_f32(item)?;
        }
        Some(out)
    });
    if parsed.is_none() {
        mismatch(field, &format!("an array of {N} numbers"), value);
    }
    parsed
}

/// Read a `[x, y, z]` array
pub fn read_vec3(data: &Document, field: &str) -> Option<Vec3> {
    read_floats::<3>(data, field).map(Vec3::from)
}

/// Read an `[r, g, b, a]` array
pub fn read_color(data: &Document, field: &str) -> Option<[f32; 4]> {
    read_floats::<4>(data, field)
}

/// Read a nested table that describes structure (`Components`, `Services`, ...)
///
/// Unlike the value readers, a wrong shape here is an error: the document
/// cannot be interpreted without it.
pub fn read_table<'a>(data: &'a Document, field: &str, context: &str) -> Result<Option<&'a Document>> {
    data.get(field).map(|value| expect_table(value, context, field)).transpose()
}

/// Interpret `value`, stored under `field`, as a table
pub fn expect_table<'a>(value: &'a Value, context: &str, field: &str) -> Result<&'a Document> {
    value.as_table().ok_or_else(|| WorldError::InvalidField {
        context: context.to_owned(),
        field: field.to_owned(),
        reason: format!("expected a table, found {}", value.type_str()),
    })
}

// Widen through the shortest decimal form so 0.1f32 is written as 0.1
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or_else(|_| f64::from(value))
}

/// Write an `f32`
pub fn write_f32(data: &mut Document, field: &str, value: f32) {
    data.insert(field.to_owned(), Value::Float(widen(value)));
}

/// Write a `u32`
pub fn write_u32(data: &mut Document, field: &str, value: u32) {
    data.insert(field.to_owned(), Value::Integer(i64::from(value)));
}

/// Write a boolean
pub fn write_bool(data: &mut Document, field: &str, value: bool) {
    data.insert(field.to_owned(), Value::Boolean(value));
}

/// Write a string
pub fn write_string(data: &mut Document, field: &str, value: &str) {
    data.insert(field.to_owned(), Value::String(value.to_owned()));
}

fn write_floats(data: &mut Document, field: &str, values: &[f32]) {
    let items = values.iter().map(|v| Value::Float(widen(*v))).collect();
    data.insert(field.to_owned(), Value::Array(items));
}

/// Write a `[x, y, z]` array
pub fn write_vec3(data: &mut Document, field: &str, value: &Vec3) {
    write_floats(data, field, value.as_slice());
}

/// Write an `[r, g, b, a]` array
pub fn write_color(data: &mut Document, field: &str, value: [f32; 4]) {
    write_floats(data, field, &value);
}
