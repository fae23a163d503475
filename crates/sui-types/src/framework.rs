//! Sui framework constants and well-known addresses.
//!
//! Move-call signature handling needs to recognise a handful of framework
//! structs (`TxContext`, the two string types, `ID`, `Option`). Their
//! addresses and identifiers live here so callers compare against constants
//! instead of parsing hex literals at runtime.
//!
//! # Example
//!
//! ```
//! use sui_tx_types::framework::{is_framework_address, MOVE_STDLIB, SUI_FRAMEWORK};
//!
//! assert!(is_framework_address(&MOVE_STDLIB));
//! assert_eq!(SUI_FRAMEWORK.short(), "0x2");
//! ```

use crate::address::SuiAddress;

// ============================================================================
// Framework Package Addresses
// ============================================================================

/// Move standard library address (0x1)
pub const MOVE_STDLIB: SuiAddress = SuiAddress::from_u16(1);

/// Sui framework address (0x2)
pub const SUI_FRAMEWORK: SuiAddress = SuiAddress::from_u16(2);

/// Sui system address (0x3)
pub const SUI_SYSTEM: SuiAddress = SuiAddress::from_u16(3);

// ============================================================================
// Well-Known Object IDs
// ============================================================================

/// Clock object ID (0x6)
pub const CLOCK_OBJECT_ID: SuiAddress = SuiAddress::from_u16(6);

/// Random object ID (0x8)
pub const RANDOM_OBJECT_ID: SuiAddress = SuiAddress::from_u16(8);

/// Check if an address is a framework package (0x1, 0x2, or 0x3)
#[inline]
pub fn is_framework_address(addr: &SuiAddress) -> bool {
    *addr == MOVE_STDLIB || *addr == SUI_FRAMEWORK || *addr == SUI_SYSTEM
}

// ============================================================================
// Well-Known Types
// ============================================================================

/// Native gas coin type, used when looking up gas payment coins.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// `0x2::tx_context::TxContext`, injected by the runtime as a trailing parameter.
pub const TX_CONTEXT_MODULE: &str = "tx_context";
pub const TX_CONTEXT_STRUCT: &str = "TxContext";

/// `0x1::ascii::String`
pub const ASCII_MODULE: &str = "ascii";
/// `0x1::string::String`
pub const UTF8_MODULE: &str = "string";
pub const STRING_STRUCT: &str = "String";

/// `0x2::object::ID`
pub const OBJECT_MODULE: &str = "object";
pub const ID_STRUCT: &str = "ID";

/// `0x1::option::Option<T>`
pub const OPTION_MODULE: &str = "option";
pub const OPTION_STRUCT: &str = "Option";
