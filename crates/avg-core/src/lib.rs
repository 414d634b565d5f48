//! Core domain logic for avg.
//!
//! This crate contains the fundamental types for:
//! - Tracker names: validated, filesystem-safe identifiers
//! - Trackers: a description plus a running mean and its sample count
//! - The plain-text tracker file format

mod tracker;
pub mod types;

pub use tracker::{DEFAULT_DESCRIPTION, FormatError, Tracker};
pub use types::{TrackerName, ValidationError, parse_value, validate_description};
