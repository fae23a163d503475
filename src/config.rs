//! Resolution settings.

use sui_tx_types::framework::SUI_COIN_TYPE;

/// Maximum number of object ids per batched lookup the fullnode accepts.
pub const DEFAULT_MAX_OBJECTS_PER_FETCH: usize = 50;

/// Maximum number of coins the ledger accepts as gas payment.
pub const DEFAULT_MAX_GAS_PAYMENT_OBJECTS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Coin type listed when selecting gas payment.
    pub gas_coin_type: String,
    /// Object lookups above this size are split into several batch calls.
    pub max_objects_per_fetch: usize,
    /// Upper bound on coins used for gas payment.
    pub max_gas_payment_objects: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            gas_coin_type: SUI_COIN_TYPE.to_string(),
            max_objects_per_fetch: DEFAULT_MAX_OBJECTS_PER_FETCH,
            max_gas_payment_objects: DEFAULT_MAX_GAS_PAYMENT_OBJECTS,
        }
    }
}

impl ResolverConfig {
    pub fn with_gas_coin_type(mut self, coin_type: impl Into<String>) -> Self {
        self.gas_coin_type = coin_type.into();
        self
    }

    /// Batch size for object lookups; zero is treated as one.
    pub fn with_max_objects_per_fetch(mut self, max: usize) -> Self {
        self.max_objects_per_fetch = max.max(1);
        self
    }

    pub fn with_max_gas_payment_objects(mut self, max: usize) -> Self {
        self.max_gas_payment_objects = max.max(1);
        self
    }
}
