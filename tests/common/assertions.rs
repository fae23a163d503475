//! Assertion helpers with descriptive failure messages.

use sui_tx_builder::{BuildError, ErrorCategory};

/// Assert that an error message contains expected text (case-insensitive).
pub fn assert_error_contains<E: std::fmt::Display>(error: E, expected_text: &str, context: &str) {
    let error_str = error.to_string().to_lowercase();
    let expected_lower = expected_text.to_lowercase();

    assert!(
        error_str.contains(&expected_lower),
        "{}: error message should contain '{}', got: {}",
        context,
        expected_text,
        error
    );
}

/// Assert that a build result failed with an error of `category`.
pub fn assert_category<T: std::fmt::Debug>(
    result: Result<T, BuildError>,
    category: ErrorCategory,
    context: &str,
) -> BuildError {
    match result {
        Ok(v) => panic!("{} should have failed but got: {:?}", context, v),
        Err(e) => {
            assert_eq!(
                e.category(),
                category,
                "{}: expected a {} error, got: {}",
                context,
                category,
                e
            );
            e
        }
    }
}
