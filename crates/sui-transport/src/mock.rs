//! In-memory query service for tests.
//!
//! Holds fixture objects, coins and function signatures, and records every
//! call so tests can assert how many round trips resolution made.
//!
//! # Example
//!
//! ```ignore
//! let service = MockQueryService::new()
//!     .with_gas_price(750)
//!     .with_shared_object(pool_id, 42)
//!     .with_coin(sender, coin_id, 1_000_000_000);
//! tx.build(&service).await?;
//! assert_eq!(service.calls().object_batches.len(), 1);
//! ```

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use sui_tx_types::framework::SUI_COIN_TYPE;
use sui_tx_types::{
    CoinObject, MoveCallTarget, NormalizedFunction, ObjectData, ObjectDigest, ObjectId, ObjectRef,
    ObjectResponse, Owner, SuiAddress,
};

use crate::QueryService;

/// Every call made against a [`MockQueryService`], in call order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    pub gas_price: usize,
    pub functions: Vec<MoveCallTarget>,
    pub object_batches: Vec<Vec<ObjectId>>,
    pub coins: Vec<(SuiAddress, String)>,
}

impl CallLog {
    /// Total number of round trips.
    pub fn total(&self) -> usize {
        self.gas_price + self.functions.len() + self.object_batches.len() + self.coins.len()
    }
}

pub struct MockQueryService {
    gas_price: Option<u64>,
    functions: HashMap<MoveCallTarget, NormalizedFunction>,
    objects: HashMap<ObjectId, ObjectData>,
    coins: HashMap<SuiAddress, Vec<CoinObject>>,
    calls: Mutex<CallLog>,
}

impl Default for MockQueryService {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic fake digest derived from an id and version.
fn fixture_digest(id: &ObjectId, version: u64) -> ObjectDigest {
    let mut bytes = *id.as_bytes();
    for (byte, v) in bytes.iter_mut().zip(version.to_le_bytes()) {
        *byte ^= v;
    }
    ObjectDigest::new(bytes)
}

impl MockQueryService {
    /// A service with reference gas price 1000 and no fixtures.
    pub fn new() -> Self {
        Self {
            gas_price: Some(1000),
            functions: HashMap::new(),
            objects: HashMap::new(),
            coins: HashMap::new(),
            calls: Mutex::new(CallLog::default()),
        }
    }

    pub fn with_gas_price(mut self, price: u64) -> Self {
        self.gas_price = Some(price);
        self
    }

    /// Make `get_reference_gas_price` fail.
    pub fn without_gas_price(mut self) -> Self {
        self.gas_price = None;
        self
    }

    pub fn with_function(mut self, target: MoveCallTarget, function: NormalizedFunction) -> Self {
        self.functions.insert(target, function);
        self
    }

    pub fn with_object(mut self, data: ObjectData) -> Self {
        self.objects.insert(data.object_id, data);
        self
    }

    /// An address-owned object at `version`.
    pub fn with_owned_object(self, id: ObjectId, version: u64) -> Self {
        self.with_object(ObjectData {
            object_id: id,
            version,
            digest: fixture_digest(&id, version),
            owner: Owner::AddressOwner(SuiAddress::ZERO),
        })
    }

    /// A shared object first shared at `initial_shared_version`.
    pub fn with_shared_object(self, id: ObjectId, initial_shared_version: u64) -> Self {
        let version = initial_shared_version + 10;
        self.with_object(ObjectData {
            object_id: id,
            version,
            digest: fixture_digest(&id, version),
            owner: Owner::Shared {
                initial_shared_version,
            },
        })
    }

    /// A SUI coin owned by `owner`. The coin is also visible as an owned object.
    pub fn with_coin(mut self, owner: SuiAddress, id: ObjectId, balance: u64) -> Self {
        let version = 1;
        let digest = fixture_digest(&id, version);
        self.coins.entry(owner).or_default().push(CoinObject {
            coin_type: SUI_COIN_TYPE.to_string(),
            coin_object_id: id,
            version,
            digest,
            balance,
        });
        self.objects.insert(
            id,
            ObjectData {
                object_id: id,
                version,
                digest,
                owner: Owner::AddressOwner(owner),
            },
        );
        self
    }

    /// Current reference of a fixture object.
    pub fn object_ref(&self, id: &ObjectId) -> Option<ObjectRef> {
        self.objects.get(id).map(ObjectData::object_ref)
    }

    pub fn calls(&self) -> CallLog {
        self.calls.lock().clone()
    }

    pub fn reset_calls(&self) {
        *self.calls.lock() = CallLog::default();
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn get_reference_gas_price(&self) -> Result<u64> {
        self.calls.lock().gas_price += 1;
        self.gas_price
            .ok_or_else(|| anyhow!("Reference gas price unavailable"))
    }

    async fn get_normalized_move_function(
        &self,
        target: &MoveCallTarget,
    ) -> Result<NormalizedFunction> {
        self.calls.lock().functions.push(target.clone());
        self.functions
            .get(target)
            .cloned()
            .ok_or_else(|| anyhow!("Function {} not found", target))
    }

    async fn multi_get_objects(&self, ids: &[ObjectId]) -> Result<Vec<ObjectResponse>> {
        self.calls.lock().object_batches.push(ids.to_vec());
        Ok(ids
            .iter()
            .map(|id| match self.objects.get(id) {
                Some(data) => ObjectResponse::Exists(data.clone()),
                None => ObjectResponse::NotFound { object_id: *id },
            })
            .collect())
    }

    async fn get_coins(&self, owner: &SuiAddress, coin_type: &str) -> Result<Vec<CoinObject>> {
        self.calls
            .lock()
            .coins
            .push((*owner, coin_type.to_string()));
        Ok(self
            .coins
            .get(owner)
            .map(|coins| {
                coins
                    .iter()
                    .filter(|c| c.coin_type == coin_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
