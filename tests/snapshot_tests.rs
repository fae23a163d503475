//! Snapshot and byte round trips.

mod common;

use common::*;
use sui_tx_builder::{
    Argument, BuildError, ErrorCategory, MockQueryService, PureType, ResolverConfig, SuiAddress,
    Transaction, TransactionExpiration,
};
use sui_tx_types::NormalizedType;

const POOL: SuiAddress = SuiAddress::from_u16(0x9001);
const COIN: SuiAddress = SuiAddress::from_u16(0xc01);

fn service() -> MockQueryService {
    MockQueryService::new()
        .with_function(
            pkg_target("deposit"),
            function(vec![
                NormalizedType::MutableReference(Box::new(some_struct())),
                NormalizedType::U64,
                NormalizedType::Vector(Box::new(NormalizedType::U8)),
                tx_context(),
            ]),
        )
        .with_shared_object(POOL, 12)
        .with_coin(SENDER, COIN, 1_000)
}

/// Partially built transaction with raw inputs of every kind.
fn partial_tx() -> Transaction {
    let mut tx = new_tx();
    tx.set_expiration(TransactionExpiration::Epoch(40));
    let pool = tx.object(POOL).unwrap();
    let amount = tx.pure("18446744073709551615").unwrap();
    let memo = tx.pure("hello").unwrap();
    tx.move_call(pkg_target("deposit"), vec![], vec![pool, amount, memo])
        .unwrap();
    let split = tx.pure_typed(5, PureType::U64).unwrap();
    let coins = tx.split_coins(tx.gas(), vec![split]).unwrap();
    let recipient = tx.pure(SENDER.to_string()).unwrap();
    tx.transfer_objects(vec![coins.nested(0)], recipient).unwrap();
    tx
}

#[tokio::test]
async fn test_snapshot_restore_builds_identical_bytes() {
    let service = service();
    let mut original = partial_tx();
    let snapshot = original.snapshot().unwrap();
    let mut restored = Transaction::from_snapshot(&snapshot).unwrap();
    assert_eq!(restored.data(), original.data());

    let original_bytes = original.build(&service).await.unwrap();
    let restored_bytes = restored.build(&service).await.unwrap();
    assert_eq!(original_bytes, restored_bytes);
    assert_eq!(
        original.digest(&service).await.unwrap(),
        restored.digest(&service).await.unwrap()
    );
}

#[tokio::test]
async fn test_resolved_snapshot_keeps_resolution() {
    let service = service();
    let mut tx = partial_tx();
    tx.resolve(&service).await.unwrap();

    let mut restored = Transaction::from_snapshot(&tx.snapshot().unwrap()).unwrap();
    service.reset_calls();
    let bytes = restored.build(&service).await.unwrap();
    assert_eq!(service.calls().total(), 0);
    assert_eq!(bytes, tx.build(&service).await.unwrap());
}

#[tokio::test]
async fn test_bytes_restore_to_equivalent_transaction() {
    let service = service();
    let mut tx = partial_tx();
    let bytes = tx.build(&service).await.unwrap();

    let mut restored = Transaction::from_bytes(&bytes).unwrap();
    assert_eq!(restored.data().sender, Some(SENDER));
    assert_eq!(restored.data().expiration, TransactionExpiration::Epoch(40));
    service.reset_calls();
    assert_eq!(restored.build(&service).await.unwrap(), bytes);
    assert_eq!(service.calls().total(), 0);
}

#[tokio::test]
async fn test_build_seals_inputs_and_commands() {
    let service = service();
    let mut tx = partial_tx();
    tx.build(&service).await.unwrap();

    assert!(matches!(tx.pure(1u64), Err(BuildError::Sealed)));
    let err = tx.split_coins(tx.gas(), vec![]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::State);

    tx.set_gas_price(2000);
    assert!(tx.build(&service).await.is_ok());
}

#[test]
fn test_corrupt_inputs_are_encoding_errors() {
    let err = Transaction::from_bytes(&[1, 2, 3]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Encoding);

    let snapshot = partial_tx().snapshot().unwrap();
    let bumped = snapshot.replacen("\"version\":1", "\"version\":2", 1);
    let err = Transaction::from_snapshot(&bumped).unwrap_err();
    assert_error_contains(err, "snapshot version 2", "future snapshot");
}

#[tokio::test]
async fn test_dangling_argument_in_snapshot_is_rejected() {
    let service = service();
    let snapshot = partial_tx().snapshot().unwrap();
    assert!(snapshot.contains("{\"Input\":0}"));
    let dangling = snapshot.replacen("{\"Input\":0}", "{\"Input\":7}", 1);

    let err = assert_category(
        Transaction::from_snapshot(&dangling).map(|_| ()),
        ErrorCategory::Format,
        "dangling input",
    );
    assert!(matches!(
        err,
        BuildError::InvalidArgumentReference {
            argument: Argument::Input(7),
            ..
        }
    ));
    assert_eq!(service.calls().total(), 0);
}

#[tokio::test]
async fn test_restore_with_config_keeps_config() {
    let service = service().with_coin(SENDER, SuiAddress::from_u16(0xc02), 1_000);
    let config = ResolverConfig::default().with_max_gas_payment_objects(1);
    let snapshot = partial_tx().snapshot().unwrap();

    assert_eq!(
        Transaction::from_snapshot(&snapshot).unwrap().config(),
        &ResolverConfig::default()
    );
    let mut restored = Transaction::from_snapshot_with_config(&snapshot, config.clone()).unwrap();
    assert_eq!(restored.config(), &config);

    let bytes = restored.build(&service).await.unwrap();
    assert_eq!(restored.data().gas_config.payment.as_ref().map(Vec::len), Some(1));
    let from_bytes = Transaction::from_bytes_with_config(&bytes, config.clone()).unwrap();
    assert_eq!(from_bytes.config(), &config);
}
