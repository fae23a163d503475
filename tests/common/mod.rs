#![allow(unused_imports)]
#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: addresses, Move signatures and prepared query services
//! - `assertions`: error assertion helpers

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_category, assert_error_contains};
pub use fixtures::{
    function, new_tx, object_ref_of, pkg_target, sender, some_struct, tx_context, SENDER,
};
