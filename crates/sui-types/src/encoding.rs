//! Encoding utilities for hex, base64 and base58.
//!
//! Provides shared encoding/decoding functions used across workspace crates.
//! These eliminate repetitive error handling patterns.

use anyhow::{anyhow, Result};

// =============================================================================
// Hex
// =============================================================================

/// Normalize an address string to lowercase with 0x prefix and full 64 hex characters.
///
/// This is the canonical address format for internal comparisons and storage.
/// Handles addresses with or without 0x prefix, short or full form. The input
/// is not validated; use `SuiAddress::from_str` for that.
///
/// # Examples
///
/// ```
/// use sui_tx_types::encoding::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x2"),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// assert_eq!(
///     normalize_address("ABC"),
///     "0x0000000000000000000000000000000000000000000000000000000000000abc"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let hex = strip_hex_prefix(addr.trim()).to_lowercase();
    if hex.len() < 64 {
        format!("0x{:0>64}", hex)
    } else {
        format!("0x{}", &hex[..64])
    }
}

/// Strip a leading `0x` / `0X` if present.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

// =============================================================================
// Base64
// =============================================================================

/// Encode bytes to base64 string.
pub fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 string to bytes with context-aware error message.
///
/// # Arguments
/// * `b64` - Base64 encoded string
/// * `context` - Description for error messages (e.g., "module bytecode", "transaction bytes")
pub fn base64_decode(b64: &str, context: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| anyhow!("Failed to decode {} from base64: {}", context, e))
}

// =============================================================================
// Base58 (digests)
// =============================================================================

/// Encode a 32-byte digest as base58.
pub fn base58_encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a base58 digest string into exactly 32 bytes.
pub fn base58_decode_digest(s: &str, context: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|e| anyhow!("Invalid {} '{}': {}", context, s, e))?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        anyhow!(
            "Invalid {} '{}': expected 32 bytes, got {}",
            context,
            s,
            bytes.len()
        )
    })
}

/// Serde adapter for `Vec<u8>` fields: base64 text in human-readable formats,
/// plain length-prefixed bytes otherwise (BCS).
pub mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            serializer.serialize_str(&encoded)
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            base64::engine::general_purpose::STANDARD
                .decode(&s)
                .map_err(serde::de::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer)
        }
    }
}

/// Same as [`base64_bytes`] for a list of byte blobs (package modules).
pub mod base64_bytes_vec {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            let mut seq = serializer.serialize_seq(Some(items.len()))?;
            for item in items {
                seq.serialize_element(&super::base64_encode(item))?;
            }
            seq.end()
        } else {
            let mut seq = serializer.serialize_seq(Some(items.len()))?;
            for item in items {
                seq.serialize_element(item)?;
            }
            seq.end()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let encoded = Vec::<String>::deserialize(deserializer)?;
            encoded
                .iter()
                .map(|s| super::base64_decode(s, "module bytes").map_err(serde::de::Error::custom))
                .collect()
        } else {
            Vec::<Vec<u8>>::deserialize(deserializer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0xABC"),
            "0x0000000000000000000000000000000000000000000000000000000000000abc"
        );
        assert_eq!(
            normalize_address("  0x2  "),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
        assert_eq!(
            normalize_address("0XABC"),
            "0x0000000000000000000000000000000000000000000000000000000000000abc"
        );
    }

    #[test]
    fn test_base64_decode_error() {
        let result = base64_decode("not-valid-base64!!!", "test data");
        assert!(result.unwrap_err().to_string().contains("test data"));
    }

    #[test]
    fn test_base58_digest_length_checked() {
        let encoded = base58_encode(&[7u8; 32]);
        assert_eq!(base58_decode_digest(&encoded, "digest").unwrap(), [7u8; 32]);

        let short = base58_encode(&[1u8; 5]);
        let err = base58_decode_digest(&short, "digest").unwrap_err();
        assert!(err.to_string().contains("expected 32 bytes"));
    }
}
