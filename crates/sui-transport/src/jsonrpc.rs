//! JSON-RPC client for a Sui fullnode.
//!
//! Uses a blocking `ureq` agent; async callers go through
//! `tokio::task::spawn_blocking`.
//!
//! # Example
//!
//! ```ignore
//! let client = JsonRpcClient::new(ClientConfig::testnet());
//! let coins = client.get_coins(&owner, "0x2::sui::SUI").await?;
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use sui_tx_types::{
    CoinObject, MoveCallTarget, NormalizedFunction, ObjectData, ObjectId, ObjectResponse, Owner,
    RetryConfig, SuiAddress,
};
use tracing::{debug, warn};

use crate::network::ClientConfig;
use crate::QueryService;

/// JSON-RPC client for Sui fullnode queries.
#[derive(Clone)]
pub struct JsonRpcClient {
    config: ClientConfig,
    agent: ureq::Agent,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .timeout_connect(config.connect_timeout)
            .build();
        Self {
            config,
            agent,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Create a client for mainnet.
    pub fn mainnet() -> Self {
        Self::new(ClientConfig::mainnet())
    }

    /// Create a client for testnet.
    pub fn testnet() -> Self {
        Self::new(ClientConfig::testnet())
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Execute a JSON-RPC call and return its `result`.
    async fn call(&self, method: &'static str, params: Value) -> Result<Value> {
        let agent = self.agent.clone();
        let endpoint = self.config.endpoint.clone();
        let retry = self.config.retry;
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });
        debug!(method, endpoint = %endpoint, "JSON-RPC request");

        tokio::task::spawn_blocking(move || post_with_retry(&agent, &endpoint, retry, method, &body))
            .await
            .map_err(|e| anyhow!("JSON-RPC task for {} failed: {}", method, e))?
    }
}

fn post_with_retry(
    agent: &ureq::Agent,
    endpoint: &str,
    retry: RetryConfig,
    method: &str,
    body: &Value,
) -> Result<Value> {
    let mut attempt = 0;
    loop {
        match agent
            .post(endpoint)
            .set("Content-Type", "application/json")
            .send_json(body)
        {
            Ok(response) => {
                let envelope: Value = response
                    .into_json()
                    .map_err(|e| anyhow!("Failed to parse {} response: {}", method, e))?;
                return extract_result(method, envelope);
            }
            Err(err) if attempt < retry.retries && is_transient(&err) => {
                let backoff = retry.backoff(attempt);
                warn!(
                    method,
                    attempt = attempt + 1,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "Retrying JSON-RPC request"
                );
                std::thread::sleep(backoff);
                attempt += 1;
            }
            Err(err) => return Err(anyhow!("JSON-RPC request {} failed: {}", method, err)),
        }
    }
}

fn is_transient(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::Transport(_) => true,
        ureq::Error::Status(code, _) => *code == 429 || *code >= 500,
    }
}

/// Unwrap a JSON-RPC envelope. Error objects are reported, never retried.
fn extract_result(method: &str, mut envelope: Value) -> Result<Value> {
    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(anyhow!("JSON-RPC error from {} ({}): {}", method, code, message));
    }
    envelope
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| anyhow!("No result in {} response", method))
}

/// u64 fields arrive as decimal strings (BigInt) or plain numbers.
fn parse_u64(value: Option<&Value>, context: &str) -> Result<u64> {
    match value {
        Some(Value::String(s)) => s
            .parse()
            .with_context(|| format!("Invalid {} '{}'", context, s)),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| anyhow!("Invalid {} {}", context, n)),
        _ => Err(anyhow!("Missing {}", context)),
    }
}

fn parse_string<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Missing {} in response", field))
}

fn parse_owner(value: Option<&Value>) -> Result<Owner> {
    let value = value.ok_or_else(|| anyhow!("Missing owner in object response"))?;
    if value.as_str() == Some("Immutable") {
        return Ok(Owner::Immutable);
    }
    if let Some(addr) = value.get("AddressOwner").and_then(Value::as_str) {
        return Ok(Owner::AddressOwner(addr.parse()?));
    }
    if let Some(addr) = value.get("ObjectOwner").and_then(Value::as_str) {
        return Ok(Owner::ObjectOwner(addr.parse()?));
    }
    if let Some(shared) = value.get("Shared") {
        let initial_shared_version =
            parse_u64(shared.get("initial_shared_version"), "initial shared version")?;
        return Ok(Owner::Shared {
            initial_shared_version,
        });
    }
    Err(anyhow!("Unsupported object owner {}", value))
}

fn parse_object_response(requested: ObjectId, entry: &Value) -> Result<ObjectResponse> {
    let Some(data) = entry.get("data").filter(|d| !d.is_null()) else {
        if entry.get("error").is_some() {
            return Ok(ObjectResponse::NotFound {
                object_id: requested,
            });
        }
        return Err(anyhow!("Object response for {} has neither data nor error", requested));
    };

    Ok(ObjectResponse::Exists(ObjectData {
        object_id: parse_string(data, "objectId")?.parse()?,
        version: parse_u64(data.get("version"), "object version")?,
        digest: parse_string(data, "digest")?.parse()?,
        owner: parse_owner(data.get("owner"))?,
    }))
}

fn parse_objects(requested: &[ObjectId], result: &Value) -> Result<Vec<ObjectResponse>> {
    let entries = result
        .as_array()
        .ok_or_else(|| anyhow!("sui_multiGetObjects result is not an array"))?;
    if entries.len() != requested.len() {
        return Err(anyhow!(
            "sui_multiGetObjects returned {} entries for {} ids",
            entries.len(),
            requested.len()
        ));
    }
    requested
        .iter()
        .zip(entries)
        .map(|(id, entry)| parse_object_response(*id, entry))
        .collect()
}

struct CoinPage {
    coins: Vec<CoinObject>,
    next_cursor: Option<String>,
}

fn parse_coin_page(result: &Value) -> Result<CoinPage> {
    let data = result
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("suix_getCoins result has no data array"))?;

    let coins = data
        .iter()
        .map(|coin| {
            Ok(CoinObject {
                coin_type: parse_string(coin, "coinType")?.to_string(),
                coin_object_id: parse_string(coin, "coinObjectId")?.parse()?,
                version: parse_u64(coin.get("version"), "coin version")?,
                digest: parse_string(coin, "digest")?.parse()?,
                balance: parse_u64(coin.get("balance"), "coin balance")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let has_next_page = result
        .get("hasNextPage")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let next_cursor = if has_next_page {
        result
            .get("nextCursor")
            .and_then(Value::as_str)
            .map(str::to_string)
    } else {
        None
    };

    Ok(CoinPage { coins, next_cursor })
}

#[async_trait]
impl QueryService for JsonRpcClient {
    async fn get_reference_gas_price(&self) -> Result<u64> {
        let result = self.call("suix_getReferenceGasPrice", json!([])).await?;
        parse_u64(Some(&result), "reference gas price")
    }

    async fn get_normalized_move_function(
        &self,
        target: &MoveCallTarget,
    ) -> Result<NormalizedFunction> {
        let params = json!([
            target.package.to_hex_literal(),
            target.module,
            target.function
        ]);
        let result = self.call("sui_getNormalizedMoveFunction", params).await?;
        serde_json::from_value(result)
            .with_context(|| format!("Failed to parse normalized function {}", target))
    }

    async fn multi_get_objects(&self, ids: &[ObjectId]) -> Result<Vec<ObjectResponse>> {
        let id_strings: Vec<String> = ids.iter().map(|id| id.to_hex_literal()).collect();
        let params = json!([id_strings, { "showOwner": true }]);
        let result = self.call("sui_multiGetObjects", params).await?;
        parse_objects(ids, &result)
    }

    async fn get_coins(&self, owner: &SuiAddress, coin_type: &str) -> Result<Vec<CoinObject>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let params = json!([owner.to_hex_literal(), coin_type, cursor, Value::Null]);
            let result = self.call("suix_getCoins", params).await?;
            let page = parse_coin_page(&result)?;
            coins.extend(page.coins);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        debug!(owner = %owner.short(), coin_type, count = coins.len(), "Fetched coins");
        Ok(coins)
    }
}
