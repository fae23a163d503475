//! Pure value encoding and inference.
//!
//! A pure argument is a JSON value plus a wire type. The wire type is either
//! declared by the command using the argument (`SplitCoins` amounts are
//! `u64`) or inferred from a Move parameter type. Encoding produces the BCS
//! bytes stored in [`CallArg::Pure`](sui_tx_types::CallArg::Pure).

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeSeq, SerializeTuple};
use serde::{Serialize, Serializer};
use serde_json::Value;
use sui_tx_types::framework::{
    ASCII_MODULE, ID_STRUCT, MOVE_STDLIB, OBJECT_MODULE, OPTION_MODULE, OPTION_STRUCT,
    STRING_STRUCT, SUI_FRAMEWORK, UTF8_MODULE,
};
use sui_tx_types::{NormalizedType, SuiAddress};

use crate::error::{BuildError, BuildResult};

/// Wire type of a pure argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PureType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    /// `0x1::ascii::String`
    String,
    /// `0x1::string::String`
    Utf8String,
    Vector(Box<PureType>),
}

impl PureType {
    pub fn vector(inner: PureType) -> Self {
        PureType::Vector(Box::new(inner))
    }
}

impl fmt::Display for PureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PureType::Bool => f.write_str("bool"),
            PureType::U8 => f.write_str("u8"),
            PureType::U16 => f.write_str("u16"),
            PureType::U32 => f.write_str("u32"),
            PureType::U64 => f.write_str("u64"),
            PureType::U128 => f.write_str("u128"),
            PureType::U256 => f.write_str("u256"),
            PureType::Address => f.write_str("address"),
            PureType::String => f.write_str("string"),
            PureType::Utf8String => f.write_str("utf8string"),
            PureType::Vector(inner) => write!(f, "vector<{}>", inner),
        }
    }
}

impl FromStr for PureType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        Ok(match s {
            "bool" => PureType::Bool,
            "u8" => PureType::U8,
            "u16" => PureType::U16,
            "u32" => PureType::U32,
            "u64" => PureType::U64,
            "u128" => PureType::U128,
            "u256" => PureType::U256,
            "address" => PureType::Address,
            "string" => PureType::String,
            "utf8string" => PureType::Utf8String,
            _ => {
                let inner = s
                    .strip_prefix("vector<")
                    .and_then(|rest| rest.strip_suffix('>'))
                    .ok_or_else(|| anyhow::anyhow!("Unknown pure type '{}'", s))?;
                PureType::vector(inner.parse()?)
            }
        })
    }
}

/// A JSON value checked against its wire type, ready for BCS.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PureValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    /// Little-endian.
    U256([u8; 32]),
    Address(SuiAddress),
    Bytes(Vec<u8>),
    Vector(Vec<PureValue>),
}

impl Serialize for PureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PureValue::Bool(v) => serializer.serialize_bool(*v),
            PureValue::U8(v) => serializer.serialize_u8(*v),
            PureValue::U16(v) => serializer.serialize_u16(*v),
            PureValue::U32(v) => serializer.serialize_u32(*v),
            PureValue::U64(v) => serializer.serialize_u64(*v),
            PureValue::U128(v) => serializer.serialize_u128(*v),
            PureValue::U256(bytes) => {
                let mut tuple = serializer.serialize_tuple(32)?;
                for byte in bytes {
                    tuple.serialize_element(byte)?;
                }
                tuple.end()
            }
            PureValue::Address(addr) => addr.serialize(serializer),
            PureValue::Bytes(bytes) => serializer.serialize_bytes(bytes),
            PureValue::Vector(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Parse an unsigned decimal string into a little-endian 256-bit value.
fn parse_u256(s: &str) -> Option<[u8; 32]> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut out = [0u8; 32];
    for digit in s.bytes().map(|b| b - b'0') {
        let mut carry = digit as u16;
        for byte in out.iter_mut() {
            let v = (*byte as u16) * 10 + carry;
            *byte = v as u8;
            carry = v >> 8;
        }
        if carry != 0 {
            return None;
        }
    }
    Some(out)
}

fn unsigned(ty: &PureType, value: &Value) -> BuildResult<u128> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| BuildError::invalid_pure(ty, value, "expected an unsigned integer")),
        Value::String(s) => s
            .trim()
            .parse::<u128>()
            .map_err(|_| BuildError::invalid_pure(ty, value, "expected a decimal integer")),
        _ => Err(BuildError::invalid_pure(ty, value, "expected a number")),
    }
}

fn narrow<T: TryFrom<u128>>(ty: &PureType, value: &Value) -> BuildResult<T> {
    let wide = unsigned(ty, value)?;
    T::try_from(wide).map_err(|_| BuildError::invalid_pure(ty, value, "out of range"))
}

fn to_pure_value(ty: &PureType, value: &Value) -> BuildResult<PureValue> {
    Ok(match ty {
        PureType::Bool => PureValue::Bool(
            value
                .as_bool()
                .ok_or_else(|| BuildError::invalid_pure(ty, value, "expected a boolean"))?,
        ),
        PureType::U8 => PureValue::U8(narrow(ty, value)?),
        PureType::U16 => PureValue::U16(narrow(ty, value)?),
        PureType::U32 => PureValue::U32(narrow(ty, value)?),
        PureType::U64 => PureValue::U64(narrow(ty, value)?),
        PureType::U128 => PureValue::U128(unsigned(ty, value)?),
        PureType::U256 => {
            let parsed = match value {
                Value::Number(n) => n.as_u64().and_then(|v| parse_u256(&v.to_string())),
                Value::String(s) => parse_u256(s.trim()),
                _ => None,
            };
            PureValue::U256(
                parsed.ok_or_else(|| BuildError::invalid_pure(ty, value, "expected a u256"))?,
            )
        }
        PureType::Address => {
            let s = value
                .as_str()
                .ok_or_else(|| BuildError::invalid_pure(ty, value, "expected an address string"))?;
            PureValue::Address(
                s.parse()
                    .map_err(|e: anyhow::Error| BuildError::invalid_pure(ty, value, e.to_string()))?,
            )
        }
        PureType::String => {
            let s = value
                .as_str()
                .ok_or_else(|| BuildError::invalid_pure(ty, value, "expected a string"))?;
            if !s.is_ascii() {
                return Err(BuildError::invalid_pure(ty, value, "not an ASCII string"));
            }
            PureValue::Bytes(s.as_bytes().to_vec())
        }
        PureType::Utf8String => {
            let s = value
                .as_str()
                .ok_or_else(|| BuildError::invalid_pure(ty, value, "expected a string"))?;
            PureValue::Bytes(s.as_bytes().to_vec())
        }
        PureType::Vector(inner) => match value {
            // vector<u8> from text.
            Value::String(s) if **inner == PureType::U8 => PureValue::Bytes(s.as_bytes().to_vec()),
            // None for an Option parameter.
            Value::Null => PureValue::Vector(Vec::new()),
            Value::Array(items) => PureValue::Vector(
                items
                    .iter()
                    .map(|item| to_pure_value(inner, item))
                    .collect::<BuildResult<Vec<_>>>()?,
            ),
            _ => return Err(BuildError::invalid_pure(ty, value, "expected an array")),
        },
    })
}

/// BCS-encode `value` as `ty`.
pub fn encode_pure(ty: &PureType, value: &Value) -> BuildResult<Vec<u8>> {
    let pure = to_pure_value(ty, value)?;
    bcs::to_bytes(&pure).map_err(|e| BuildError::Encoding(e.into()))
}

fn expect_kind(
    ty: PureType,
    value: Option<&Value>,
    ok: impl Fn(&Value) -> bool,
    expected: &str,
) -> BuildResult<Option<PureType>> {
    match value {
        Some(v) if !ok(v) => Err(BuildError::invalid_pure(&ty, v, format!("expected {}", expected))),
        _ => Ok(Some(ty)),
    }
}

/// Wire type for a Move parameter, if the parameter takes a pure value.
///
/// Returns `Ok(None)` for parameters that are not pure (structs other than
/// the string, `ID` and `Option` types, type parameters, references), and an
/// error when the parameter is pure but `value` has the wrong JSON shape.
/// Vectors infer their element type from the first element.
pub fn infer_pure_type(
    param: &NormalizedType,
    value: Option<&Value>,
) -> BuildResult<Option<PureType>> {
    let is_integer = |v: &Value| v.is_u64() || v.is_string();
    match param {
        NormalizedType::Bool => expect_kind(PureType::Bool, value, Value::is_boolean, "a boolean"),
        NormalizedType::U8 => expect_kind(PureType::U8, value, is_integer, "a number"),
        NormalizedType::U16 => expect_kind(PureType::U16, value, is_integer, "a number"),
        NormalizedType::U32 => expect_kind(PureType::U32, value, is_integer, "a number"),
        NormalizedType::U64 => expect_kind(PureType::U64, value, is_integer, "a number"),
        NormalizedType::U128 => expect_kind(PureType::U128, value, is_integer, "a number"),
        NormalizedType::U256 => expect_kind(PureType::U256, value, is_integer, "a number"),
        NormalizedType::Address => {
            let valid = |v: &Value| v.as_str().is_some_and(|s| s.parse::<SuiAddress>().is_ok());
            expect_kind(PureType::Address, value, valid, "a valid address")
        }
        NormalizedType::Vector(inner) => {
            if **inner == NormalizedType::U8 && value.map_or(true, Value::is_string) {
                return Ok(Some(PureType::vector(PureType::U8)));
            }
            let first = match value {
                None | Some(Value::Null) => None,
                Some(Value::Array(items)) => items.first(),
                Some(other) => {
                    return Err(BuildError::invalid_pure("vector", other, "expected an array"))
                }
            };
            Ok(infer_pure_type(inner, first)?.map(PureType::vector))
        }
        NormalizedType::Struct(tag) => {
            if tag.is(&MOVE_STDLIB, ASCII_MODULE, STRING_STRUCT) {
                Ok(Some(PureType::String))
            } else if tag.is(&MOVE_STDLIB, UTF8_MODULE, STRING_STRUCT) {
                Ok(Some(PureType::Utf8String))
            } else if tag.is(&SUI_FRAMEWORK, OBJECT_MODULE, ID_STRUCT) {
                Ok(Some(PureType::Address))
            } else if tag.is(&MOVE_STDLIB, OPTION_MODULE, OPTION_STRUCT) {
                match tag.type_arguments.first() {
                    Some(inner) => {
                        infer_pure_type(&NormalizedType::Vector(Box::new(inner.clone())), value)
                    }
                    None => Ok(None),
                }
            } else {
                Ok(None)
            }
        }
        NormalizedType::Signer
        | NormalizedType::TypeParameter(_)
        | NormalizedType::Reference(_)
        | NormalizedType::MutableReference(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sui_tx_types::NormalizedStruct;

    fn std_struct(
        address: SuiAddress,
        module: &str,
        name: &str,
        args: Vec<NormalizedType>,
    ) -> NormalizedType {
        NormalizedType::Struct(NormalizedStruct {
            address,
            module: module.into(),
            name: name.into(),
            type_arguments: args,
        })
    }

    #[test]
    fn test_pure_type_parse_display() {
        for s in ["u64", "address", "vector<vector<u8>>", "utf8string"] {
            assert_eq!(s.parse::<PureType>().unwrap().to_string(), s);
        }
        assert!("vector<u7>".parse::<PureType>().is_err());
    }

    #[test]
    fn test_encode_integers() {
        assert_eq!(encode_pure(&PureType::U64, &json!(42)).unwrap(), bcs::to_bytes(&42u64).unwrap());
        assert_eq!(
            encode_pure(&PureType::U128, &json!("340282366920938463463374607431768211455")).unwrap(),
            bcs::to_bytes(&u128::MAX).unwrap()
        );
        assert_eq!(encode_pure(&PureType::U16, &json!("513")).unwrap(), vec![1, 2]);

        let err = encode_pure(&PureType::U8, &json!(256)).unwrap_err();
        assert!(matches!(err, BuildError::InvalidPureValue { .. }));
        assert!(encode_pure(&PureType::U64, &json!(-1)).is_err());
        assert!(encode_pure(&PureType::U64, &json!(true)).is_err());
    }

    #[test]
    fn test_encode_u256() {
        let mut one = [0u8; 32];
        one[0] = 1;
        assert_eq!(encode_pure(&PureType::U256, &json!(1)).unwrap(), one.to_vec());

        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(encode_pure(&PureType::U256, &json!(max)).unwrap(), vec![0xff; 32]);

        let overflow = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(encode_pure(&PureType::U256, &json!(overflow)).is_err());
    }

    #[test]
    fn test_encode_strings_and_bytes() {
        assert_eq!(encode_pure(&PureType::String, &json!("hi")).unwrap(), vec![2, b'h', b'i']);
        assert!(encode_pure(&PureType::String, &json!("héllo")).is_err());
        assert_eq!(
            encode_pure(&PureType::Utf8String, &json!("é")).unwrap(),
            vec![2, 0xc3, 0xa9]
        );
        let bytes_ty = PureType::vector(PureType::U8);
        assert_eq!(encode_pure(&bytes_ty, &json!("ab")).unwrap(), vec![2, b'a', b'b']);
        assert_eq!(encode_pure(&bytes_ty, &json!([1, 2])).unwrap(), vec![2, 1, 2]);
    }

    #[test]
    fn test_encode_address_and_vectors() {
        let bytes = encode_pure(&PureType::Address, &json!("0x2")).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 2);

        let ty = PureType::vector(PureType::U64);
        assert_eq!(encode_pure(&ty, &json!(null)).unwrap(), vec![0]);
        assert_eq!(encode_pure(&ty, &json!([7])).unwrap(), bcs::to_bytes(&vec![7u64]).unwrap());
        assert!(encode_pure(&ty, &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_infer_primitives() {
        assert_eq!(
            infer_pure_type(&NormalizedType::U64, Some(&json!(42))).unwrap(),
            Some(PureType::U64)
        );
        assert_eq!(
            infer_pure_type(&NormalizedType::U64, Some(&json!("42"))).unwrap(),
            Some(PureType::U64)
        );
        assert!(infer_pure_type(&NormalizedType::Bool, Some(&json!(1))).is_err());
        assert!(infer_pure_type(&NormalizedType::Address, Some(&json!("nope"))).is_err());
    }

    #[test]
    fn test_infer_vectors() {
        let bytes = NormalizedType::Vector(Box::new(NormalizedType::U8));
        assert_eq!(
            infer_pure_type(&bytes, Some(&json!("text"))).unwrap(),
            Some(PureType::vector(PureType::U8))
        );

        let nested = NormalizedType::Vector(Box::new(NormalizedType::Vector(Box::new(
            NormalizedType::U64,
        ))));
        assert_eq!(
            infer_pure_type(&nested, Some(&json!([[1, 2]]))).unwrap(),
            Some(PureType::vector(PureType::vector(PureType::U64)))
        );

        let objects = NormalizedType::Vector(Box::new(std_struct(
            SUI_FRAMEWORK,
            "coin",
            "Coin",
            vec![],
        )));
        assert_eq!(infer_pure_type(&objects, Some(&json!(["0x1"]))).unwrap(), None);
    }

    #[test]
    fn test_infer_framework_structs() {
        let ascii = std_struct(MOVE_STDLIB, "ascii", "String", vec![]);
        let utf8 = std_struct(MOVE_STDLIB, "string", "String", vec![]);
        let id = std_struct(SUI_FRAMEWORK, "object", "ID", vec![]);
        let option = std_struct(MOVE_STDLIB, "option", "Option", vec![NormalizedType::U64]);

        assert_eq!(infer_pure_type(&ascii, None).unwrap(), Some(PureType::String));
        assert_eq!(infer_pure_type(&utf8, None).unwrap(), Some(PureType::Utf8String));
        assert_eq!(infer_pure_type(&id, None).unwrap(), Some(PureType::Address));
        assert_eq!(
            infer_pure_type(&option, Some(&json!([5]))).unwrap(),
            Some(PureType::vector(PureType::U64))
        );
    }

    #[test]
    fn test_infer_non_pure() {
        let coin = std_struct(SUI_FRAMEWORK, "coin", "Coin", vec![]);
        assert_eq!(infer_pure_type(&coin, Some(&json!("0x5"))).unwrap(), None);
        assert_eq!(
            infer_pure_type(&NormalizedType::TypeParameter(0), Some(&json!("0x5"))).unwrap(),
            None
        );
        assert_eq!(
            infer_pure_type(&NormalizedType::MutableReference(Box::new(coin)), None).unwrap(),
            None
        );
    }
}
