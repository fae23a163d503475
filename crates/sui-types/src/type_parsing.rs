//! Move type tags and type string parsing.
//!
//! Type tags appear in move-call type arguments and in `MakeMoveVec` element
//! types. Variant order of [`TypeTag`] matches the BCS layout the node expects.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::address::SuiAddress;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    /// Whether this tag names `address::module::name`, ignoring type parameters.
    pub fn is(&self, address: &SuiAddress, module: &str, name: &str) -> bool {
        self.address == *address && self.module == module && self.name == name
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::Address => f.write_str("address"),
            TypeTag::Signer => f.write_str("signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => write!(f, "{}", tag),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address.short(), self.module, self.name)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(|t| t.to_string()).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

impl FromStr for TypeTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_type_tag(s).ok_or_else(|| anyhow!("Invalid type tag '{}'", s))
    }
}

impl FromStr for StructTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_type_tag(s) {
            Some(TypeTag::Struct(tag)) => Ok(*tag),
            _ => Err(anyhow!("Invalid struct tag '{}'", s)),
        }
    }
}

/// Parse a Move type string into a TypeTag.
///
/// Supports:
/// - Primitive types: `bool`, `u8`, `u16`, `u32`, `u64`, `u128`, `u256`, `address`, `signer`
/// - Vector types: `vector<T>`
/// - Struct types: `0x2::module::Struct` or `0x2::module::Struct<T1, T2>`
///
/// # Examples
///
/// ```
/// use sui_tx_types::type_parsing::parse_type_tag;
///
/// let tag = parse_type_tag("0x2::coin::Coin<0x2::sui::SUI>").unwrap();
/// assert_eq!(tag.to_string(), "0x2::coin::Coin<0x2::sui::SUI>");
/// ```
pub fn parse_type_tag(type_str: &str) -> Option<TypeTag> {
    let type_str = type_str.trim();

    match type_str {
        "bool" => return Some(TypeTag::Bool),
        "u8" => return Some(TypeTag::U8),
        "u16" => return Some(TypeTag::U16),
        "u32" => return Some(TypeTag::U32),
        "u64" => return Some(TypeTag::U64),
        "u128" => return Some(TypeTag::U128),
        "u256" => return Some(TypeTag::U256),
        "address" => return Some(TypeTag::Address),
        "signer" => return Some(TypeTag::Signer),
        _ => {}
    }

    if let Some(inner) = type_str
        .strip_prefix("vector<")
        .and_then(|s| s.strip_suffix('>'))
    {
        let inner_tag = parse_type_tag(inner)?;
        return Some(TypeTag::Vector(Box::new(inner_tag)));
    }

    // 0x<address>::<module>::<name><type_args>
    let (base_type, type_args_str) = match type_str.find('<') {
        Some(angle_pos) => (&type_str[..angle_pos], Some(&type_str[angle_pos..])),
        None => (type_str, None),
    };

    let parts: Vec<&str> = base_type.split("::").collect();
    if parts.len() != 3 {
        return None;
    }

    let address = SuiAddress::from_str(parts[0]).ok()?;
    let module = parse_identifier(parts[1])?;
    let name = parse_identifier(parts[2])?;

    let type_params = match type_args_str {
        Some(args_str) => parse_type_args(args_str)?,
        None => vec![],
    };

    Some(TypeTag::Struct(Box::new(StructTag {
        address,
        module,
        name,
        type_params,
    })))
}

/// Move identifiers: ASCII alphanumerics and `_`, not starting with a digit.
pub fn parse_identifier(s: &str) -> Option<String> {
    let s = s.trim();
    let mut chars = s.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(s.to_string())
}

/// Parse type arguments string like "<T1, T2, T3>".
fn parse_type_args(args_str: &str) -> Option<Vec<TypeTag>> {
    let inner = args_str.strip_prefix('<')?.strip_suffix('>')?;
    if inner.trim().is_empty() {
        return None;
    }
    split_type_params(inner)
        .into_iter()
        .map(parse_type_tag)
        .collect()
}

/// Split type parameters respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"] by tracking bracket depth.
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < s.len() {
        result.push(s[start..].trim());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        assert_eq!(parse_type_tag("bool"), Some(TypeTag::Bool));
        assert_eq!(parse_type_tag("u256"), Some(TypeTag::U256));
        assert_eq!(parse_type_tag(" address "), Some(TypeTag::Address));
    }

    #[test]
    fn test_parse_nested_generics() {
        let tag: TypeTag = "vector<0x2::coin::Coin<0x2::sui::SUI>>".parse().unwrap();
        let TypeTag::Vector(inner) = tag else {
            panic!("Expected vector type");
        };
        let TypeTag::Struct(coin) = *inner else {
            panic!("Expected struct type");
        };
        assert_eq!(coin.module, "coin");
        assert_eq!(coin.type_params.len(), 1);
    }

    #[test]
    fn test_struct_display_uses_short_addresses() {
        let tag: StructTag = "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI"
            .parse()
            .unwrap();
        assert_eq!(tag.to_string(), "0x2::sui::SUI");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_type_tag("0x2::coin").is_none());
        assert!(parse_type_tag("0x2::9coin::Coin").is_none());
        assert!(parse_type_tag("0x2::coin::Coin<>").is_none());
        assert!("u64".parse::<StructTag>().is_err());
    }

    #[test]
    fn test_split_type_params() {
        let params = split_type_params("u64, 0x2::coin::Coin<0x2::sui::SUI>, bool");
        assert_eq!(params, vec!["u64", "0x2::coin::Coin<0x2::sui::SUI>", "bool"]);
    }
}
