//! JSON Patch (RFC 6902) documents applied to serialized entities
//!
//! Object keys in paths are matched ignoring case, so `/Name` addresses the
//! camelCase `name` property of a serialized record.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::error::ValidationError;

/// A list of patch operations applied in order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(pub Vec<PatchOperation>);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchDocument {
    /// Parse a request body, rejecting an empty body or an empty operation list
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::MissingPatchDocument);
        }
        let document: PatchDocument =
            serde_json::from_slice(body).map_err(|e| ValidationError::InvalidPatch {
                message: e.to_string(),
            })?;
        if document.0.is_empty() {
            return Err(ValidationError::MissingPatchDocument);
        }
        Ok(document)
    }

    /// Apply every operation to `target`. On error `target` may be partially patched.
    pub fn apply(&self, target: &mut Value) -> Result<(), ValidationError> {
        for operation in &self.0 {
            operation.apply(target)?;
        }
        Ok(())
    }
}

impl PatchOperation {
    fn apply(&self, target: &mut Value) -> Result<(), ValidationError> {
        match self {
            PatchOperation::Add { path, value } => add(target, &parse_pointer(path)?, value.clone()),
            PatchOperation::Remove { path } => remove(target, &parse_pointer(path)?).map(drop),
            PatchOperation::Replace { path, value } => {
                let tokens = parse_pointer(path)?;
                let slot = lookup_mut(target, &tokens)?;
                *slot = value.clone();
                Ok(())
            }
            PatchOperation::Move { from, path } => {
                let from_tokens = parse_pointer(from)?;
                let to_tokens = parse_pointer(path)?;
                if to_tokens.len() > from_tokens.len() && to_tokens.starts_with(&from_tokens) {
                    return Err(invalid(format!("cannot move '{from}' into its own child '{path}'")));
                }
                let value = remove(target, &from_tokens)?;
                add(target, &to_tokens, value)
            }
            PatchOperation::Copy { from, path } => {
                let value = lookup_mut(target, &parse_pointer(from)?)?.clone();
                add(target, &parse_pointer(path)?, value)
            }
            PatchOperation::Test { path, value } => {
                let actual = lookup_mut(target, &parse_pointer(path)?)?;
                if *actual == *value {
                    Ok(())
                } else {
                    Err(invalid(format!("test failed at '{path}'")))
                }
            }
        }
    }
}

fn invalid(message: String) -> ValidationError {
    ValidationError::InvalidPatch { message }
}

fn parse_pointer(path: &str) -> Result<Vec<String>, ValidationError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(invalid(format!("path '{path}' must start with '/'")));
    };
    Ok(rest
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

/// Existing key matching `token`, exact match first
fn resolve_key(map: &Map<String, Value>, token: &str) -> Option<String> {
    if map.contains_key(token) {
        return Some(token.to_string());
    }
    map.keys().find(|k| k.eq_ignore_ascii_case(token)).cloned()
}

fn array_index(token: &str, len: usize, allow_end: bool) -> Result<usize, ValidationError> {
    if allow_end && token == "-" {
        return Ok(len);
    }
    let index: usize = token
        .parse()
        .map_err(|_| invalid(format!("'{token}' is not an array index")))?;
    let bound = if allow_end { len } else { len.saturating_sub(1) };
    if index > bound || (!allow_end && len == 0) {
        return Err(invalid(format!("array index {index} out of bounds")));
    }
    Ok(index)
}

fn lookup_mut<'a>(target: &'a mut Value, tokens: &[String]) -> Result<&'a mut Value, ValidationError> {
    let mut current = target;
    for token in tokens {
        current = match current {
            Value::Object(map) => {
                let key = resolve_key(map, token)
                    .ok_or_else(|| invalid(format!("path segment '{token}' not found")))?;
                map.get_mut(&key)
                    .ok_or_else(|| invalid(format!("path segment '{token}' not found")))?
            }
            Value::Array(items) => {
                let index = array_index(token, items.len(), false)?;
                &mut items[index]
            }
            _ => return Err(invalid(format!("cannot traverse into '{token}'"))),
        };
    }
    Ok(current)
}

fn add(target: &mut Value, tokens: &[String], value: Value) -> Result<(), ValidationError> {
    let Some((last, parent_tokens)) = tokens.split_last() else {
        *target = value;
        return Ok(());
    };
    match lookup_mut(target, parent_tokens)? {
        Value::Object(map) => {
            let key = resolve_key(map, last).unwrap_or_else(|| last.clone());
            map.insert(key, value);
            Ok(())
        }
        Value::Array(items) => {
            let index = array_index(last, items.len(), true)?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(invalid(format!("cannot add '{last}' to a scalar"))),
    }
}

fn remove(target: &mut Value, tokens: &[String]) -> Result<Value, ValidationError> {
    let Some((last, parent_tokens)) = tokens.split_last() else {
        return Err(invalid("cannot remove the whole document".to_string()));
    };
    match lookup_mut(target, parent_tokens)? {
        Value::Object(map) => {
            let key = resolve_key(map, last)
                .ok_or_else(|| invalid(format!("path segment '{last}' not found")))?;
            map.remove(&key)
                .ok_or_else(|| invalid(format!("path segment '{last}' not found")))
        }
        Value::Array(items) => {
            let index = array_index(last, items.len(), false)?;
            Ok(items.remove(index))
        }
        _ => Err(invalid(format!("cannot remove '{last}' from a scalar"))),
    }
}
