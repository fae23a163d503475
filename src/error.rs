//! Build and resolution errors.
//!
//! # Error Taxonomy
//!
//! | Category | Raised by | Variants |
//! |----------|-----------|----------|
//! | Precondition | resolution step 1 | `MissingSender`, `MissingGasBudget` |
//! | Format | `add`, classification, signatures | `ArgumentCountMismatch`, `UnknownCallArgType`, ... |
//! | Existence | object lookup | `ObjectsNotFound` |
//! | Resource | gas selection | `NoGasCoins` |
//! | Remote | any query service call | `Remote` |
//! | Encoding | snapshot, BCS | `Encoding` |
//! | State | structural edits after encoding | `Sealed` |
//!
//! Every error aborts the operation that raised it; nothing is downgraded to
//! a default.

use std::fmt;

use serde_json::Value;
use sui_tx_types::{Argument, ObjectId, SuiAddress};

/// Category of a [`BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Required transaction fields missing before resolution starts
    Precondition,
    /// Arguments or inputs do not fit the commands using them
    Format,
    /// Referenced objects do not exist
    Existence,
    /// No gas coins left to pay with
    Resource,
    /// Query service failure
    Remote,
    /// Snapshot or BCS encoding failure
    Encoding,
    /// Operation not allowed in the transaction's current state
    State,
}

impl ErrorCategory {
    /// Get a short name for this category
    pub fn short_name(&self) -> &'static str {
        match self {
            ErrorCategory::Precondition => "precondition",
            ErrorCategory::Format => "format",
            ErrorCategory::Existence => "existence",
            ErrorCategory::Resource => "resource",
            ErrorCategory::Remote => "remote",
            ErrorCategory::Encoding => "encoding",
            ErrorCategory::State => "state",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

#[derive(Debug)]
pub enum BuildError {
    MissingSender,
    MissingGasBudget,

    /// Caller-supplied argument count differs from the function's parameters
    /// (after dropping `TxContext`).
    ArgumentCountMismatch {
        command: usize,
        expected: usize,
        actual: usize,
    },
    /// A raw value that fits neither a pure nor an object parameter.
    UnknownCallArgType {
        command: usize,
        argument: usize,
        param: String,
        value: Value,
    },
    /// An object argument whose raw value is not an object id string.
    ExpectedObjectId {
        input: u16,
        value: Value,
    },
    /// A raw input used where no encoding can be determined.
    UnexpectedInputFormat {
        input: u16,
    },
    MissingInput {
        index: u16,
    },
    InvalidArgumentReference {
        argument: Argument,
        reason: String,
    },
    InvalidPureValue {
        wire_type: String,
        value: Value,
        reason: String,
    },
    TooManyInputs,
    TooManyCommands,

    /// Every missing id, deduplicated, in request order.
    ObjectsNotFound {
        ids: Vec<ObjectId>,
    },

    NoGasCoins {
        owner: SuiAddress,
    },

    Remote(anyhow::Error),
    Encoding(anyhow::Error),

    /// Structural change attempted after the transaction was encoded.
    Sealed,
}

impl BuildError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BuildError::MissingSender | BuildError::MissingGasBudget => ErrorCategory::Precondition,
            BuildError::ArgumentCountMismatch { .. }
            | BuildError::UnknownCallArgType { .. }
            | BuildError::ExpectedObjectId { .. }
            | BuildError::UnexpectedInputFormat { .. }
            | BuildError::MissingInput { .. }
            | BuildError::InvalidArgumentReference { .. }
            | BuildError::InvalidPureValue { .. }
            | BuildError::TooManyInputs
            | BuildError::TooManyCommands => ErrorCategory::Format,
            BuildError::ObjectsNotFound { .. } => ErrorCategory::Existence,
            BuildError::NoGasCoins { .. } => ErrorCategory::Resource,
            BuildError::Remote(_) => ErrorCategory::Remote,
            BuildError::Encoding(_) => ErrorCategory::Encoding,
            BuildError::Sealed => ErrorCategory::State,
        }
    }

    pub(crate) fn invalid_pure(
        wire_type: impl fmt::Display,
        value: &Value,
        reason: impl Into<String>,
    ) -> Self {
        BuildError::InvalidPureValue {
            wire_type: wire_type.to_string(),
            value: value.clone(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingSender => write!(f, "Missing transaction sender"),
            BuildError::MissingGasBudget => write!(f, "Missing gas budget"),
            BuildError::ArgumentCountMismatch {
                command,
                expected,
                actual,
            } => write!(
                f,
                "Command {} expects {} arguments but {} were supplied",
                command, expected, actual
            ),
            BuildError::UnknownCallArgType {
                command,
                argument,
                param,
                value,
            } => write!(
                f,
                "Command {} argument {}: cannot pass {} as parameter type {}",
                command, argument, value, param
            ),
            BuildError::ExpectedObjectId { input, value } => write!(
                f,
                "Input {} is used as an object but its value {} is not an object id",
                input, value
            ),
            BuildError::UnexpectedInputFormat { input } => write!(
                f,
                "Input {} is unresolved and no encoding is known for how it is used",
                input
            ),
            BuildError::MissingInput { index } => write!(f, "Input {} does not exist", index),
            BuildError::InvalidArgumentReference { argument, reason } => {
                write!(f, "Invalid argument {}: {}", argument, reason)
            }
            BuildError::InvalidPureValue {
                wire_type,
                value,
                reason,
            } => write!(f, "Cannot encode {} as {}: {}", value, wire_type, reason),
            BuildError::TooManyInputs => write!(f, "Transaction input limit reached"),
            BuildError::TooManyCommands => write!(f, "Transaction command limit reached"),
            BuildError::ObjectsNotFound { ids } => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "Objects not found: {}", ids.join(", "))
            }
            BuildError::NoGasCoins { owner } => {
                write!(f, "No gas coins available for {}", owner)
            }
            BuildError::Remote(e) => write!(f, "Query service error: {:#}", e),
            BuildError::Encoding(e) => write!(f, "Encoding error: {:#}", e),
            BuildError::Sealed => write!(
                f,
                "Transaction was already encoded; inputs and commands can no longer change"
            ),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Remote(e) | BuildError::Encoding(e) => Some(&**e),
            _ => None,
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_categories() {
        assert_eq!(BuildError::MissingSender.category(), ErrorCategory::Precondition);
        assert_eq!(BuildError::TooManyInputs.category(), ErrorCategory::Format);
        assert_eq!(
            BuildError::ObjectsNotFound { ids: vec![] }.category(),
            ErrorCategory::Existence
        );
        assert_eq!(
            BuildError::NoGasCoins {
                owner: SuiAddress::ZERO
            }
            .category()
            .short_name(),
            "resource"
        );
        assert_eq!(BuildError::Sealed.category(), ErrorCategory::State);
    }

    #[test]
    fn test_display_lists_missing_ids() {
        let err = BuildError::ObjectsNotFound {
            ids: vec![SuiAddress::from_u16(1), SuiAddress::from_u16(2)],
        };
        let msg = err.to_string();
        assert!(msg.contains(&SuiAddress::from_u16(1).to_string()));
        assert!(msg.contains(&SuiAddress::from_u16(2).to_string()));
    }

    #[test]
    fn test_remote_error_keeps_source() {
        let err = BuildError::Remote(anyhow::anyhow!("connection refused"));
        assert!(err.to_string().contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());

        let err = BuildError::invalid_pure("u8", &json!(300), "out of range");
        assert_eq!(err.to_string(), "Cannot encode 300 as u8: out of range");
    }
}
