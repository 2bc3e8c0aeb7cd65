//! Field-by-field merge of response JSON into existing objects.
//!
//! Gateway responses are applied to the caller's transaction in place rather
//! than replacing it. Every type lists the keys it understands in an explicit
//! `match`; unknown keys are ignored. A field whose value has the wrong shape is
//! skipped and reported, but the remaining fields are still applied.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A response body (or part of one) that could not be merged completely.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The body is not JSON.
    #[error("response body is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    /// The body is JSON but not an object.
    #[error("response body is not a JSON object")]
    NotAnObject,
    /// A recognized field has a value of the wrong shape.
    #[error("field '{field}' could not be read: {source}")]
    Field {
        /// Dotted path of the offending field, e.g. `brand.name`.
        field: String,
        /// The underlying conversion error.
        #[source]
        source: serde_json::Error,
    },
}

impl MergeError {
    fn field(field: &str, source: serde_json::Error) -> Self {
        Self::Field {
            field: field.to_owned(),
            source,
        }
    }

    /// Prefixes the field path with the name of the enclosing object.
    fn within(self, parent: &str) -> Self {
        match self {
            Self::Field { field, source } => Self::Field {
                field: format!("{parent}.{field}"),
                source,
            },
            Self::Syntax(source) => Self::field(parent, source),
            Self::NotAnObject => Self::field(parent, shape_error("expected a JSON object")),
        }
    }
}

/// A type whose fields can be populated from a JSON object.
pub(crate) trait MergeFields {
    /// Applies one key/value pair. Unknown keys must be ignored.
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError>;

    /// Applies every entry, keeping the first failure.
    fn merge_map(&mut self, map: Map<String, Value>) -> Result<(), MergeError> {
        let mut first_error = None;
        for (key, value) in map {
            if let Err(err) = self.merge_field(&key, value) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl<T: MergeFields + ?Sized> MergeFields for Box<T> {
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError> {
        (**self).merge_field(key, value)
    }
}

/// Parses `body` as a JSON object and merges it into `target`.
pub(crate) fn merge_json<T: MergeFields>(target: &mut T, body: &str) -> Result<(), MergeError> {
    let value: Value = serde_json::from_str(body).map_err(MergeError::Syntax)?;
    match value {
        Value::Object(map) => target.merge_map(map),
        _ => Err(MergeError::NotAnObject),
    }
}

fn shape_error(message: &str) -> serde_json::Error {
    <serde_json::Error as serde::de::Error>::custom(message)
}

/// Reads a string, accepting numbers and booleans by their JSON text.
pub(crate) fn text(
    slot: &mut Option<String>,
    field: &str,
    value: Value,
) -> Result<(), MergeError> {
    *slot = match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => {
            return Err(MergeError::field(field, shape_error("expected a string")));
        }
    };
    Ok(())
}

/// Reads any serde-deserializable scalar.
pub(crate) fn typed<T: DeserializeOwned>(
    slot: &mut Option<T>,
    field: &str,
    value: Value,
) -> Result<(), MergeError> {
    *slot = serde_json::from_value(value).map_err(|e| MergeError::field(field, e))?;
    Ok(())
}

/// Reads a nested object into a fresh `T`.
///
/// On a partial failure the partially populated object is still stored.
pub(crate) fn nested<T: MergeFields + Default>(
    slot: &mut Option<T>,
    field: &str,
    value: Value,
) -> Result<(), MergeError> {
    match value {
        Value::Null => {
            *slot = None;
            Ok(())
        }
        Value::Object(map) => {
            let mut object = T::default();
            let result = object.merge_map(map);
            *slot = Some(object);
            result.map_err(|e| e.within(field))
        }
        _ => Err(MergeError::field(field, shape_error("expected a JSON object"))),
    }
}

/// Reads an array of nested objects, replacing the previous sequence.
pub(crate) fn nested_list<T: MergeFields + Default>(
    slot: &mut Vec<T>,
    field: &str,
    value: Value,
) -> Result<(), MergeError> {
    let items = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        _ => return Err(MergeError::field(field, shape_error("expected a JSON array"))),
    };

    let mut first_error = None;
    slot.clear();
    for (index, item) in items.into_iter().enumerate() {
        let mut element = None;
        if let Err(err) = nested(&mut element, &format!("{field}[{index}]"), item) {
            first_error.get_or_insert(err);
        }
        slot.extend(element);
    }
    first_error.map_or(Ok(()), Err)
}
