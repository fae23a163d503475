//! Command result handles.

use sui_tx_types::Argument;

/// Output of an appended command.
///
/// Usable directly as the whole result (`Argument::Result`) or indexed into
/// for commands returning several values. Handles are plain values: the same
/// nested index always yields an equal argument, so two reads of
/// `handle.nested(0)` are interchangeable everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResultHandle {
    command: u16,
}

impl ResultHandle {
    pub(crate) fn new(command: u16) -> Self {
        Self { command }
    }

    pub fn command_index(&self) -> u16 {
        self.command
    }

    /// The whole result.
    pub fn arg(&self) -> Argument {
        Argument::Result(self.command)
    }

    /// Result value `index`. Not bounds-checked here; an out of range index
    /// fails at execution.
    pub fn nested(&self, index: u16) -> Argument {
        Argument::NestedResult(self.command, index)
    }

    /// The first `count` nested results, for destructuring multi-value returns.
    ///
    /// ```
    /// # use sui_tx_builder::Transaction;
    /// # let mut tx = Transaction::new();
    /// # let a = tx.pure(1u64).unwrap();
    /// # let b = tx.pure(2u64).unwrap();
    /// let gas = tx.gas();
    /// let coins = tx.split_coins(gas, vec![a, b]).unwrap();
    /// let [first, second] = coins.take_array();
    /// assert_eq!(coins.take(2), vec![first, second]);
    /// ```
    pub fn take(&self, count: u16) -> Vec<Argument> {
        (0..count).map(|i| self.nested(i)).collect()
    }

    /// Same as [`take`](Self::take) with the count fixed at compile time.
    pub fn take_array<const N: usize>(&self) -> [Argument; N] {
        std::array::from_fn(|i| self.nested(i as u16))
    }
}

impl From<ResultHandle> for Argument {
    fn from(handle: ResultHandle) -> Self {
        handle.arg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_nested_is_stable() {
        let handle = ResultHandle::new(3);
        assert_eq!(handle.nested(2), handle.nested(2));
        assert_eq!(handle.nested(2), Argument::NestedResult(3, 2));
        assert_ne!(handle.nested(1), handle.nested(2));

        let seen: HashSet<Argument> = [handle.nested(0), handle.nested(0)].into_iter().collect();
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_whole_result() {
        let handle = ResultHandle::new(1);
        assert_eq!(Argument::from(handle), Argument::Result(1));
        assert_eq!(handle.command_index(), 1);
    }

    #[test]
    fn test_take() {
        let handle = ResultHandle::new(0);
        assert_eq!(
            handle.take(3),
            vec![
                Argument::NestedResult(0, 0),
                Argument::NestedResult(0, 1),
                Argument::NestedResult(0, 2)
            ]
        );
        assert!(handle.take(0).is_empty());
        let [a, b] = handle.take_array();
        assert_eq!((a, b), (handle.nested(0), handle.nested(1)));
    }
}
