//! Session-scoped health entities.
//!
//! Plain data types held in the session store. None of them reference
//! each other; every list is an independent, append-only sequence.

pub mod condition;
pub mod conversation;
pub mod enums;
pub mod invocation;
pub mod profile;
pub mod symptom;
pub mod treatment;

pub use condition::*;
pub use conversation::*;
pub use enums::*;
pub use invocation::*;
pub use profile::*;
pub use symptom::*;
pub use treatment::*;

use std::fmt::Display;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: String,
        max: String,
        value: String,
    },
    #[error("Invalid {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Check `value` against an inclusive range, naming the field on failure.
pub fn check_range<T>(field: &'static str, value: T, range: RangeInclusive<T>) -> Result<T, ModelError>
where
    T: PartialOrd + Display + Copy,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ModelError::OutOfRange {
            field,
            min: range.start().to_string(),
            max: range.end().to_string(),
            value: value.to_string(),
        })
    }
}
