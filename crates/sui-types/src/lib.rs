//! Shared types for the sui-tx-builder workspace.
//!
//! This crate owns the transaction data itself: addresses and digests, Move
//! type tags, call arguments, commands, inputs, gas configuration, the
//! portable snapshot and the BCS encoding. It also carries the data shapes the
//! query service returns (objects, coins, normalized function signatures).
//!
//! ## Transaction Types
//!
//! The [`transaction`] module contains the builder state and wire format:
//! - [`TransactionDataBuilder`](transaction::TransactionDataBuilder) - Inputs, commands and gas config, with snapshot/encode/digest
//! - [`Command`](transaction::Command) / [`Argument`](transaction::Argument) - Programmable transaction commands
//! - [`CallArg`](transaction::CallArg) - Resolved transaction inputs

pub mod address;
pub mod encoding;
pub mod fetched;
pub mod framework;
pub mod normalized;
pub mod transaction;
pub mod type_parsing;

pub use address::{ObjectDigest, ObjectId, SuiAddress, TransactionDigest};
pub use fetched::{CoinObject, ObjectData, ObjectResponse, Owner};
pub use normalized::{NormalizedFunction, NormalizedStruct, NormalizedType};
pub use transaction::{
    Argument, CallArg, Command, GasConfig, InputKind, InputValue, MoveCallTarget, ObjectArg,
    ObjectRef, ProgrammableMoveCall, TransactionDataBuilder, TransactionExpiration,
    TransactionInput,
};
pub use type_parsing::{StructTag, TypeTag};

use std::time::Duration;

/// Configuration for retry behavior on network operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Number of retry attempts.
    pub retries: usize,
    /// Initial backoff duration between retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl RetryConfig {
    /// Create a new RetryConfig with the specified parameters.
    pub fn new(retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Backoff before retry number `attempt` (0-based), doubling up to the cap.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(16) as u32).unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_millis(5000),
        }
    }
}
