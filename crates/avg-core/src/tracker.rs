//! Trackers and their on-disk text format.
//!
//! A tracker file is plain text:
//!
//! ```text
//! <description>
//! <value>
//! [<count>]
//! ```
//!
//! The count line is only written once samples have been pushed. A file
//! without it holds no samples yet. Anything after the third line is ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{TrackerName, ValidationError, validate_description};

/// Description used when `create` is not given one.
pub const DEFAULT_DESCRIPTION: &str = "(No description)";

/// Errors from reading a tracker file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The file ended before a required line.
    #[error("missing {what} on line {line}")]
    MissingLine { line: usize, what: &'static str },

    /// Line 2 did not hold a number.
    #[error("invalid value on line 2: '{raw}'")]
    InvalidValue { raw: String },

    /// Line 3 did not hold a sample count.
    #[error("invalid sample count on line 3: '{raw}'")]
    InvalidCount { raw: String },
}

/// A named running average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    pub name: TrackerName,
    pub description: String,
    /// Cumulative mean of every pushed sample.
    pub value: f64,
    /// Number of samples folded into `value`.
    #[serde(default)]
    pub count: u64,
}

impl Tracker {
    /// Creates an empty tracker with value 0.
    pub fn new(name: TrackerName, description: Option<&str>) -> Result<Self, ValidationError> {
        let description = description.unwrap_or(DEFAULT_DESCRIPTION);
        validate_description(description)?;
        Ok(Self {
            name,
            description: description.to_string(),
            value: 0.0,
            count: 0,
        })
    }

    /// Folds samples into the running mean.
    ///
    /// The tracker is left untouched if the mean cannot be represented.
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts never approach 2^53"
    )]
    pub fn push(&mut self, samples: &[f64]) -> Result<(), ValidationError> {
        let (mut value, mut count) = (self.value, self.count);
        for &sample in samples {
            count += 1;
            let n = count as f64;
            // Scale before adding so samples near f64::MAX cannot overflow.
            value = (value - value / n) + sample / n;
        }
        if !value.is_finite() {
            return Err(ValidationError::MeanOverflow);
        }
        self.value = value;
        self.count = count;
        Ok(())
    }

    /// Parses a tracker file's contents.
    pub fn parse(name: TrackerName, content: &str) -> Result<Self, FormatError> {
        let mut lines = content.lines();

        let description = lines.next().ok_or(FormatError::MissingLine {
            line: 1,
            what: "description",
        })?;

        let raw_value = lines
            .next()
            .ok_or(FormatError::MissingLine {
                line: 2,
                what: "value",
            })?
            .trim();
        let value = raw_value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FormatError::InvalidValue {
                raw: raw_value.to_string(),
            })?;

        let count = match lines.next().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw.parse().map_err(|_| FormatError::InvalidCount {
                raw: raw.to_string(),
            })?,
        };

        Ok(Self {
            name,
            description: description.to_string(),
            value,
            count,
        })
    }

    /// Renders the file contents for this tracker.
    pub fn render(&self) -> String {
        if self.count == 0 {
            format!("{}\n{}\n", self.description, self.value)
        } else {
            format!("{}\n{}\n{}\n", self.description, self.value, self.count)
        }
    }
}
