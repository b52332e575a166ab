//! The untyped parameter bundle and its typed extractor.
//!
//! Hosts send every command's arguments as a JSON object.  Inside the bridge
//! that object is held as a [`Params`] value, and typed code may only read it
//! through [`Params::require`] and [`Params::optional`].
//!
//! # Extraction rules
//!
//! | Situation                         | `require`                 | `optional`                |
//! |-----------------------------------|---------------------------|---------------------------|
//! | key absent                        | `ParamError::Missing`     | `Ok(None)`                |
//! | key present with JSON `null`      | `ParamError::Missing`     | `Ok(None)`                |
//! | key present, right shape          | `Ok(value)`               | `Ok(Some(value))`         |
//! | key present, wrong shape          | `ParamError::Invalid`     | `ParamError::Invalid`     |
//!
//! There is no implicit coercion: `"42"` is not a number, `4.0` is not an
//! integer, and `-1` is not a `u32`.  Host-side protocol drift therefore shows
//! up as an `Invalid` error naming the offending key.

use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to narrow an untyped parameter into a typed value.
///
/// Both variants carry the offending key so the host can tell exactly which
/// argument it got wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// A required key is absent from the bundle (or explicitly `null`).
    #[error("missing parameter '{0}'")]
    Missing(String),

    /// A key is present but its value does not have the expected shape.
    #[error("invalid parameter '{0}'")]
    Invalid(String),
}

/// Conversion from a borrowed JSON value into a typed Rust value.
///
/// Returns `None` when the value has the wrong shape.  Implementations must not
/// coerce across JSON types.
pub trait FromParam: Sized {
    fn from_param(value: &Value) -> Option<Self>;
}

impl FromParam for String {
    fn from_param(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromParam for bool {
    fn from_param(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromParam for i64 {
    fn from_param(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromParam for u32 {
    fn from_param(value: &Value) -> Option<Self> {
        value.as_u64().and_then(|n| u32::try_from(n).ok())
    }
}

impl FromParam for Vec<String> {
    fn from_param(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect()
    }
}

impl FromParam for Params {
    fn from_param(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Params)
    }
}

/// A loosely-typed key/value bundle received from the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a raw JSON value received from the host.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Invalid`] for the key `"params"` when the value
    /// is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ParamError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ParamError::Invalid("params".to_string())),
        }
    }

    /// Extracts a required value.
    ///
    /// # Errors
    ///
    /// [`ParamError::Missing`] if `key` is absent or `null`,
    /// [`ParamError::Invalid`] if it has the wrong shape.
    pub fn require<T: FromParam>(&self, key: &str) -> Result<T, ParamError> {
        self.optional(key)?
            .ok_or_else(|| ParamError::Missing(key.to_string()))
    }

    /// Extracts an optional value.
    ///
    /// # Errors
    ///
    /// [`ParamError::Invalid`] if `key` is present but has the wrong shape.
    pub fn optional<T: FromParam>(&self, key: &str) -> Result<Option<T>, ParamError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::from_param(value)
                .map(Some)
                .ok_or_else(|| ParamError::Invalid(key.to_string())),
        }
    }

    /// Returns `true` when `key` is present with a non-null value.
    pub fn contains(&self, key: &str) -> bool {
        !matches!(self.0.get(key), None | Some(Value::Null))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
