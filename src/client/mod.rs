//! Client-side property coordination
//!
//! [`PropertyContext`] is the process-local cache of the property collection.
//! It talks to the API through a [`PropertyTransport`], refreshes after every
//! successful mutation, and reports results as [`Outcome`] descriptors —
//! errors never cross its public boundary as panics or raw faults.

pub mod context;
pub mod transport;

pub use context::PropertyContext;
pub use transport::{HttpTransport, PropertyTransport};

use thiserror::Error;

use crate::core::error::FieldViolation;

/// Error classes surfaced to the UI layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("validation failed: {}", format_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("record not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("payload rejected: {0}")]
    Payload(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("server error: {0}")]
    Server(String),
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tagged result descriptor returned by every context mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(ErrorKind),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T, ErrorKind> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, ErrorKind>> for Outcome<T> {
    fn from(result: Result<T, ErrorKind>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::Failure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success() {
        let outcome: Outcome<i32> = Ok(7).into();
        assert!(outcome.is_success());
        assert_eq!(outcome.error(), None);
        assert_eq!(outcome.into_result().unwrap(), 7);
    }

    #[test]
    fn test_outcome_failure_keeps_kind() {
        let outcome: Outcome<i32> = Err(ErrorKind::Forbidden).into();
        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(&ErrorKind::Forbidden));
    }

    #[test]
    fn test_validation_display_names_fields() {
        let kind = ErrorKind::Validation(vec![FieldViolation::new("price", "must be non-negative")]);
        assert!(kind.to_string().contains("price"));
    }
}
