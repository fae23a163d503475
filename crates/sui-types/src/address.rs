//! Addresses, object IDs and digests.
//!
//! Sui addresses are 32-byte values, but they're often represented in different formats:
//! - Short form: "0x2"
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000002"
//! - Without prefix: "2"
//!
//! [`SuiAddress`] accepts all of them and always displays the full form, so two
//! spellings of the same object compare equal once parsed.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::{base58_decode_digest, base58_encode, normalize_address, strip_hex_prefix};

/// A 32-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SuiAddress([u8; 32]);

/// Object ID type (32-byte address).
pub type ObjectId = SuiAddress;

impl SuiAddress {
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build an address whose last two bytes hold `value`, e.g. `0x2`, `0x6`.
    pub const fn from_u16(value: u16) -> Self {
        let mut bytes = [0u8; 32];
        bytes[30] = (value >> 8) as u8;
        bytes[31] = value as u8;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full-width lowercase hex with `0x` prefix.
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Short form with leading zeros trimmed (`0x2`), for display.
    pub fn short(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }
}

impl FromStr for SuiAddress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex_part = strip_hex_prefix(trimmed);
        if hex_part.is_empty() || hex_part.len() > 64 {
            return Err(anyhow!("Invalid address '{}': expected 1-64 hex digits", s));
        }
        let normalized = normalize_address(trimmed);
        let bytes = hex::decode(&normalized[2..])
            .map_err(|e| anyhow!("Invalid address '{}': {}", s, e))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for SuiAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex_literal())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}

macro_rules! base58_digest {
    ($name:ident, $context:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                base58_decode_digest(s, $context).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&base58_encode(&self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        // BCS carries digests as length-prefixed byte vectors.
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&base58_encode(&self.0))
                } else {
                    serializer.serialize_bytes(&self.0)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                } else {
                    let bytes = Vec::<u8>::deserialize(deserializer)?;
                    <[u8; 32]>::try_from(bytes.as_slice())
                        .map(Self)
                        .map_err(|_| {
                            serde::de::Error::custom(format!(
                                "{} must be 32 bytes, got {}",
                                $context,
                                bytes.len()
                            ))
                        })
                }
            }
        }
    };
}

base58_digest!(ObjectDigest, "object digest");
base58_digest!(TransactionDigest, "transaction digest");
