//! Normalized Move function signatures.
//!
//! Mirrors the JSON the node returns from `sui_getNormalizedMoveFunction`, so
//! these types deserialize straight from the RPC response.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::SuiAddress;
use crate::framework::{SUI_FRAMEWORK, TX_CONTEXT_MODULE, TX_CONTEXT_STRUCT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizedType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Struct(NormalizedStruct),
    Vector(Box<NormalizedType>),
    TypeParameter(u16),
    Reference(Box<NormalizedType>),
    MutableReference(Box<NormalizedType>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStruct {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub type_arguments: Vec<NormalizedType>,
}

impl NormalizedStruct {
    pub fn is(&self, address: &SuiAddress, module: &str, name: &str) -> bool {
        self.address == *address && self.module == module && self.name == name
    }
}

impl NormalizedType {
    pub fn is_mutable_reference(&self) -> bool {
        matches!(self, NormalizedType::MutableReference(_))
    }

    /// The type behind a reference, or the type itself.
    pub fn dereferenced(&self) -> &NormalizedType {
        match self {
            NormalizedType::Reference(inner) | NormalizedType::MutableReference(inner) => inner,
            other => other,
        }
    }

    /// Struct tag, looking through one level of reference.
    pub fn struct_tag(&self) -> Option<&NormalizedStruct> {
        match self.dereferenced() {
            NormalizedType::Struct(tag) => Some(tag),
            _ => None,
        }
    }

    /// Whether values of this type must be passed as objects: structs and
    /// type parameters, by value or by reference.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self.dereferenced(),
            NormalizedType::Struct(_) | NormalizedType::TypeParameter(_)
        )
    }

    /// `&TxContext` or `&mut TxContext`, the runtime-injected parameter.
    pub fn is_tx_context(&self) -> bool {
        match self {
            NormalizedType::Reference(_) | NormalizedType::MutableReference(_) => self
                .struct_tag()
                .is_some_and(|tag| tag.is(&SUI_FRAMEWORK, TX_CONTEXT_MODULE, TX_CONTEXT_STRUCT)),
            _ => false,
        }
    }
}

impl fmt::Display for NormalizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedType::Bool => f.write_str("bool"),
            NormalizedType::U8 => f.write_str("u8"),
            NormalizedType::U16 => f.write_str("u16"),
            NormalizedType::U32 => f.write_str("u32"),
            NormalizedType::U64 => f.write_str("u64"),
            NormalizedType::U128 => f.write_str("u128"),
            NormalizedType::U256 => f.write_str("u256"),
            NormalizedType::Address => f.write_str("address"),
            NormalizedType::Signer => f.write_str("signer"),
            NormalizedType::Struct(tag) => {
                write!(f, "{}::{}::{}", tag.address.short(), tag.module, tag.name)?;
                if !tag.type_arguments.is_empty() {
                    let args: Vec<String> =
                        tag.type_arguments.iter().map(|t| t.to_string()).collect();
                    write!(f, "<{}>", args.join(", "))?;
                }
                Ok(())
            }
            NormalizedType::Vector(inner) => write!(f, "vector<{}>", inner),
            NormalizedType::TypeParameter(i) => write!(f, "T{}", i),
            NormalizedType::Reference(inner) => write!(f, "&{}", inner),
            NormalizedType::MutableReference(inner) => write!(f, "&mut {}", inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Private,
    Public,
    Friend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySet {
    pub abilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFunction {
    pub visibility: Visibility,
    pub is_entry: bool,
    #[serde(default)]
    pub type_parameters: Vec<AbilitySet>,
    pub parameters: Vec<NormalizedType>,
    #[serde(rename = "return", default)]
    pub return_: Vec<NormalizedType>,
}

impl NormalizedFunction {
    /// Parameters the caller must supply: a trailing `TxContext` is dropped.
    pub fn caller_parameters(&self) -> &[NormalizedType] {
        match self.parameters.split_last() {
            Some((last, rest)) if last.is_tx_context() => rest,
            _ => &self.parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn function_json() -> serde_json::Value {
        json!({
            "visibility": "Public",
            "isEntry": true,
            "typeParameters": [{"abilities": ["Store", "Key"]}],
            "parameters": [
                {"MutableReference": {"Struct": {
                    "address": "0x2", "module": "coin", "name": "Coin",
                    "typeArguments": [{"TypeParameter": 0}]
                }}},
                "U64",
                {"MutableReference": {"Struct": {
                    "address": "0x2", "module": "tx_context", "name": "TxContext",
                    "typeArguments": []
                }}}
            ],
            "return": []
        })
    }

    #[test]
    fn test_deserialize_rpc_shape() {
        let func: NormalizedFunction = serde_json::from_value(function_json()).unwrap();
        assert!(func.is_entry);
        assert_eq!(func.parameters.len(), 3);
        assert_eq!(func.parameters[1], NormalizedType::U64);
        let coin = func.parameters[0].struct_tag().unwrap();
        assert_eq!(coin.name, "Coin");
        assert_eq!(coin.type_arguments, vec![NormalizedType::TypeParameter(0)]);
    }

    #[test]
    fn test_caller_parameters_drop_tx_context() {
        let func: NormalizedFunction = serde_json::from_value(function_json()).unwrap();
        let params = func.caller_parameters();
        assert_eq!(params.len(), 2);
        assert!(params[0].is_mutable_reference());
    }

    #[test]
    fn test_immutable_tx_context_is_dropped() {
        let mut func: NormalizedFunction = serde_json::from_value(function_json()).unwrap();
        let ctx = func.parameters.pop().unwrap();
        func.parameters
            .push(NormalizedType::Reference(Box::new(ctx.dereferenced().clone())));
        assert_eq!(func.caller_parameters().len(), 2);
    }

    #[test]
    fn test_tx_context_only_dropped_when_last() {
        let ctx = NormalizedType::MutableReference(Box::new(NormalizedType::Struct(
            NormalizedStruct {
                address: SUI_FRAMEWORK,
                module: "tx_context".into(),
                name: "TxContext".into(),
                type_arguments: vec![],
            },
        )));
        let func = NormalizedFunction {
            visibility: Visibility::Public,
            is_entry: false,
            type_parameters: vec![],
            parameters: vec![ctx, NormalizedType::U8],
            return_: vec![],
        };
        assert_eq!(func.caller_parameters().len(), 2);
    }

    #[test]
    fn test_display() {
        let func: NormalizedFunction = serde_json::from_value(function_json()).unwrap();
        assert_eq!(func.parameters[0].to_string(), "&mut 0x2::coin::Coin<T0>");
        assert_eq!(func.parameters[1].to_string(), "u64");
    }

    #[test]
    fn test_object_like() {
        assert!(NormalizedType::TypeParameter(0).is_object_like());
        assert!(NormalizedType::Reference(Box::new(NormalizedType::TypeParameter(1)))
            .is_object_like());
        assert!(!NormalizedType::Vector(Box::new(NormalizedType::U8)).is_object_like());
    }
}
