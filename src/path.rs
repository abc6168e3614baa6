//! Dot-separated path helpers for nested documents.
//!
//! These are pure functions over a caller-owned root and never touch the
//! disk. A root must be an object; anything else is reported as
//! [`Error::TypeMismatch`]. Only objects are traversed: running into a
//! scalar or an array halfway down a path means "not found", not an error.
//!
//! Presence is key presence. A stored `0`, `false`, `""` or `{}` is found
//! like any other value.

use crate::error::{Error, Result};
use crate::value::{type_name, Mapping, Value};

/// Separator between path segments.
pub const DELIMITER: char = '.';

/// Split `path` into its segments, rejecting empty paths and empty segments.
fn segments(path: &str) -> Result<(&str, Vec<&str>)> {
    if path.is_empty() {
        return Err(Error::Path("path is empty".to_string()));
    }
    let mut parts: Vec<&str> = path.split(DELIMITER).collect();
    if let Some(pos) = parts.iter().position(|s| s.is_empty()) {
        return Err(Error::Path(format!(
            "empty segment at position {pos} in '{path}'"
        )));
    }
    match parts.pop() {
        Some(last) => Ok((last, parts)),
        None => Err(Error::Path("path is empty".to_string())),
    }
}

fn as_object(root: &Value) -> Result<&Mapping> {
    match root {
        Value::Object(map) => Ok(map),
        other => Err(Error::TypeMismatch {
            expected: "object",
            actual: type_name(other),
        }),
    }
}

fn as_object_mut(root: &mut Value) -> Result<&mut Mapping> {
    match root {
        Value::Object(map) => Ok(map),
        other => Err(Error::TypeMismatch {
            expected: "object",
            actual: type_name(other),
        }),
    }
}

/// Object stored under `key`, created (or replacing a non-object) as needed.
fn child_object<'a>(map: &'a mut Mapping, key: &str) -> &'a mut Mapping {
    let slot = map.entry(key).or_insert(Value::Null);
    if !slot.is_object() {
        *slot = Value::Object(Mapping::new());
    }
    match slot {
        Value::Object(child) => child,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

/// Write `value` at `path`, creating intermediate objects on the way.
///
/// An intermediate segment that currently holds a non-object is replaced
/// with an empty object. A single-segment path writes directly on `root`.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let (last, parents) = segments(path)?;
    let mut cursor = as_object_mut(root)?;
    for seg in parents {
        cursor = child_object(cursor, seg);
    }
    cursor.insert(last.to_string(), value);
    Ok(())
}

/// Look up the value at `path`. `Ok(None)` when any segment is missing or
/// an intermediate value is not an object.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    let (last, parents) = segments(path)?;
    let mut cursor = as_object(root)?;
    for seg in parents {
        cursor = match cursor.get(seg) {
            Some(Value::Object(child)) => child,
            _ => return Ok(None),
        };
    }
    Ok(cursor.get(last))
}

/// Mutable counterpart of [`get_path`]. Never creates anything.
pub fn get_path_mut<'a>(root: &'a mut Value, path: &str) -> Result<Option<&'a mut Value>> {
    let (last, parents) = segments(path)?;
    let mut cursor = as_object_mut(root)?;
    for seg in parents {
        cursor = match cursor.get_mut(seg) {
            Some(Value::Object(child)) => child,
            _ => return Ok(None),
        };
    }
    Ok(cursor.get_mut(last))
}

/// `true` if `path` resolves to a present value.
pub fn has_path(root: &Value, path: &str) -> Result<bool> {
    Ok(get_path(root, path)?.is_some())
}

/// Remove the key at `path`.
///
/// Returns `false` without touching `root` when an intermediate segment is
/// missing or not an object. Removing an absent leaf from a valid parent
/// still returns `true`.
pub fn unset_path(root: &mut Value, path: &str) -> Result<bool> {
    let (last, parents) = segments(path)?;
    let mut cursor = as_object_mut(root)?;
    for seg in parents {
        cursor = match cursor.get_mut(seg) {
            Some(Value::Object(child)) => child,
            _ => return Ok(false),
        };
    }
    cursor.shift_remove(last);
    Ok(true)
}

/// Deep-merge `source` into `destination`.
///
/// Where both sides hold an object the two are merged recursively; anywhere
/// else the source value wins. `source` is left untouched.
pub fn merge(destination: &mut Value, source: &Value) -> Result<()> {
    let source = as_object(source)?;
    let destination = as_object_mut(destination)?;
    merge_mappings(destination, source);
    Ok(())
}

/// [`merge`] over bare mappings; cannot fail.
pub fn merge_mappings(destination: &mut Mapping, source: &Mapping) {
    for (key, incoming) in source {
        match (destination.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                merge_mappings(existing, nested);
            }
            _ => {
                destination.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Re-nest a flat mapping by treating every key as a path.
///
/// `{"a.b": 1, "c": 2}` becomes `{"a": {"b": 1}, "c": 2}`. Keys are applied
/// in order, so a later `"a.b"` replaces an earlier scalar `"a"`.
pub fn expand(flat: &Mapping) -> Result<Mapping> {
    let mut root = Value::Object(Mapping::with_capacity(flat.len()));
    for (key, value) in flat {
        set_path(&mut root, key, value.clone())?;
    }
    match root {
        Value::Object(map) => Ok(map),
        other => Err(Error::TypeMismatch {
            expected: "object",
            actual: type_name(&other),
        }),
    }
}
