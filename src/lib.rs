//! Sui Transaction Builder
//!
//! Builds programmable transactions from partially specified inputs and
//! resolves them against a fullnode before encoding.
//!
//! Callers declare object and pure inputs without knowing their wire
//! encodings or on-chain versions, chain command results into later commands,
//! and let [`Transaction::build`] fill in the rest: pure values are encoded
//! from the command or Move parameter they feed, objects are looked up in
//! batches, and gas price and payment are selected when unset.
//!
//! # Core Modules
//!
//! - [`transaction`]: the [`Transaction`] facade
//! - [`resolve`]: the resolution pipeline
//! - [`inputs`]: input declaration and object deduplication
//! - [`commands`]: fixed argument encodings and reference checks
//! - [`pure`]: pure value encoding and type inference
//! - [`result`]: command result handles
//! - [`error`]: error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use sui_tx_builder::{JsonRpcClient, Transaction};
//!
//! let client = JsonRpcClient::mainnet();
//! let mut tx = Transaction::new();
//! tx.set_sender(sender);
//! tx.set_gas_budget(10_000_000);
//!
//! let pool = tx.object(pool_id)?;
//! let amount = tx.pure(1_000_000u64)?;
//! let [coin] = tx.split_coins(tx.gas(), vec![amount])?.take_array();
//! tx.move_call("0xabc::pool::deposit".parse()?, vec![], vec![pool, coin])?;
//!
//! let bytes = tx.build(&client).await?;
//! ```

#![allow(clippy::result_large_err)]

pub mod commands;
pub mod config;
pub mod error;
pub mod inputs;
pub mod pure;
pub mod resolve;
pub mod result;
pub mod transaction;

pub use config::ResolverConfig;
pub use error::{BuildError, BuildResult, ErrorCategory};
pub use pure::PureType;
pub use resolve::resolve_transaction;
pub use result::ResultHandle;
pub use transaction::Transaction;

pub use sui_tx_transport::{ClientConfig, JsonRpcClient, MockQueryService, QueryService};
pub use sui_tx_types::{
    Argument, CallArg, Command, MoveCallTarget, ObjectArg, ObjectId, ObjectRef, SuiAddress,
    TransactionDigest, TransactionExpiration, TypeTag,
};
