//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The tracker name cannot be used as a file name.
    #[error("invalid tracker name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Descriptions occupy exactly one line of the tracker file.
    #[error("description cannot span multiple lines")]
    MultilineDescription,

    /// A pushed value was not a finite number.
    #[error("'{value}' is not a number")]
    InvalidValue { value: String },

    /// The running mean left the range of finite numbers.
    #[error("average is too large to store")]
    MeanOverflow,
}

/// A validated tracker name.
///
/// Tracker names double as file names inside the store, so they must be
/// non-empty, must not contain path separators or NUL, and must not start
/// with a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackerName(String);

impl TrackerName {
    /// Creates a new name after validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::Empty {
                field: "tracker name",
            });
        }
        let reason = if name.starts_with('.') {
            Some("must not start with '.'")
        } else if name.contains(['/', '\\']) {
            Some("must not contain path separators")
        } else if name.contains('\0') {
            Some("must not contain NUL")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ValidationError::InvalidName { name, reason });
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TrackerName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrackerName> for String {
    fn from(name: TrackerName) -> Self {
        name.0
    }
}

impl fmt::Display for TrackerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TrackerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for TrackerName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Checks that a description fits on the first line of a tracker file.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.contains(['\n', '\r']) {
        return Err(ValidationError::MultilineDescription);
    }
    Ok(())
}

/// Parses a value given to `push`.
///
/// Surrounding whitespace is ignored. NaN and infinities are rejected since
/// they would poison the running mean.
pub fn parse_value(raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidValue {
            value: raw.to_string(),
        })
}
