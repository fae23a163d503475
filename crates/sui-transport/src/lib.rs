//! Sui Transport Layer
//!
//! The query service seam the transaction builder resolves against.
//!
//! This crate provides:
//! - [`QueryService`]: the async interface resolution talks to
//! - [`jsonrpc`]: JSON-RPC client for a Sui fullnode
//! - [`mock`]: in-memory service with call recording, for tests
//! - [`network`]: endpoint and client configuration
//!
//! # Example
//!
//! ```ignore
//! use sui_tx_transport::{JsonRpcClient, QueryService};
//!
//! let client = JsonRpcClient::testnet();
//! let price = client.get_reference_gas_price().await?;
//! ```

pub mod jsonrpc;
pub mod mock;
pub mod network;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sui_tx_types::{
    CoinObject, MoveCallTarget, NormalizedFunction, ObjectId, ObjectResponse, SuiAddress,
};

// Re-export main types for convenience
pub use jsonrpc::JsonRpcClient;
pub use mock::MockQueryService;
pub use network::ClientConfig;
pub use sui_tx_types::RetryConfig;

/// Remote ledger queries needed to resolve a transaction.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Current reference gas price.
    async fn get_reference_gas_price(&self) -> Result<u64>;

    /// Normalized signature of `package::module::function`.
    async fn get_normalized_move_function(
        &self,
        target: &MoveCallTarget,
    ) -> Result<NormalizedFunction>;

    /// Current state of each object, one response per id in request order.
    async fn multi_get_objects(&self, ids: &[ObjectId]) -> Result<Vec<ObjectResponse>>;

    /// Every coin of `coin_type` owned by `owner`, across all pages.
    async fn get_coins(&self, owner: &SuiAddress, coin_type: &str) -> Result<Vec<CoinObject>>;
}

#[async_trait]
impl<T: QueryService + ?Sized> QueryService for Arc<T> {
    async fn get_reference_gas_price(&self) -> Result<u64> {
        (**self).get_reference_gas_price().await
    }

    async fn get_normalized_move_function(
        &self,
        target: &MoveCallTarget,
    ) -> Result<NormalizedFunction> {
        (**self).get_normalized_move_function(target).await
    }

    async fn multi_get_objects(&self, ids: &[ObjectId]) -> Result<Vec<ObjectResponse>> {
        (**self).multi_get_objects(ids).await
    }

    async fn get_coins(&self, owner: &SuiAddress, coin_type: &str) -> Result<Vec<CoinObject>> {
        (**self).get_coins(owner, coin_type).await
    }
}
