//! Test fixtures: addresses, Move signatures and transactions.

use sui_tx_builder::{MockQueryService, MoveCallTarget, ObjectRef, SuiAddress, Transaction};
use sui_tx_types::normalized::Visibility;
use sui_tx_types::{NormalizedFunction, NormalizedStruct, NormalizedType};

pub const SENDER: SuiAddress = SuiAddress::from_u16(0x5e);
pub const PACKAGE: SuiAddress = SuiAddress::from_u16(0xabc);
pub const GAS_BUDGET: u64 = 50_000_000;

pub fn sender() -> SuiAddress {
    SENDER
}

/// `PACKAGE::m::<name>`
pub fn pkg_target(name: &str) -> MoveCallTarget {
    MoveCallTarget {
        package: PACKAGE,
        module: "m".to_string(),
        function: name.to_string(),
    }
}

/// `PACKAGE::m::SomeStruct`
pub fn some_struct() -> NormalizedType {
    NormalizedType::Struct(NormalizedStruct {
        address: PACKAGE,
        module: "m".to_string(),
        name: "SomeStruct".to_string(),
        type_arguments: vec![],
    })
}

/// `&mut 0x2::tx_context::TxContext`
pub fn tx_context() -> NormalizedType {
    NormalizedType::MutableReference(Box::new(NormalizedType::Struct(NormalizedStruct {
        address: SuiAddress::from_u16(2),
        module: "tx_context".to_string(),
        name: "TxContext".to_string(),
        type_arguments: vec![],
    })))
}

pub fn function(parameters: Vec<NormalizedType>) -> NormalizedFunction {
    NormalizedFunction {
        visibility: Visibility::Public,
        is_entry: true,
        type_parameters: vec![],
        parameters,
        return_: vec![],
    }
}

/// Fresh transaction with sender and budget set.
pub fn new_tx() -> Transaction {
    let mut tx = Transaction::new();
    tx.set_sender(SENDER);
    tx.set_gas_budget(GAS_BUDGET);
    tx
}

pub fn object_ref_of(service: &MockQueryService, id: SuiAddress) -> ObjectRef {
    service
        .object_ref(&id)
        .unwrap_or_else(|| panic!("fixture object {} missing", id))
}
