use std::fmt;

use thiserror::Error;

/// Why a predicate was rejected as vacuous by the condition builder.
///
/// Detection is shallow: only the top-level node of a predicate is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vacuity {
    AlwaysTrue,
    AlwaysFalse,
    AlwaysNull,
    ComparedToZero,
}

impl fmt::Display for Vacuity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vacuity::AlwaysTrue => write!(f, "always 'true'"),
            Vacuity::AlwaysFalse => write!(f, "always 'false'"),
            Vacuity::AlwaysNull => write!(f, "always 'null'"),
            Vacuity::ComparedToZero => write!(f, "compared to the literal '0'"),
        }
    }
}

/// Unified error type for composition and evaluation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("required argument '{argument}' was not provided")]
    NullArgument { argument: &'static str },

    #[error("cannot evaluate a condition against a missing entity")]
    NullEntity,

    #[error("the condition has no effect because it is {0}")]
    InvalidPredicate(Vacuity),

    #[error("invalid argument '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("pattern cannot be empty")]
    EmptyPattern,

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("{operation} requires at least one matching element")]
    EmptyAggregation { operation: &'static str },

    #[error("{operation} overflowed the value type")]
    Overflow { operation: &'static str },

    #[error("error executing {operation} for entity type {entity}")]
    OperationFailed {
        operation: &'static str,
        entity: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn positive(argument: &'static str, value: usize) -> Result<()> {
        if value == 0 {
            return Err(Error::InvalidArgument {
                argument,
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}
