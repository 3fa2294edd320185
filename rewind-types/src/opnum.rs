//! Ledger-wide ordering of operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{RawOperation, Transaction};

/// Position of an operation on the ledger: block, transaction within the
/// block, operation within the transaction.
///
/// Ordering is total. [`OperationNumber::NEVER`] sorts before every concrete
/// position, and [`OperationNumber::NOW`] and [`OperationNumber::FUTURE`]
/// sort after all of them, in that order. Concrete positions compare by
/// block, then transaction, then operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OperationNumber {
    /// Before anything on the ledger.
    Never,
    /// A concrete position.
    At {
        /// Block number.
        block: u64,
        /// Transaction index within the block.
        trx: u32,
        /// Operation index within the transaction.
        op: u32,
    },
    /// The current head of the ledger.
    Now,
    /// After anything the ledger will have produced so far.
    Future,
}

impl OperationNumber {
    /// Sentinel ordered before every position.
    pub const NEVER: Self = Self::Never;
    /// Sentinel ordered after every concrete position.
    pub const NOW: Self = Self::Now;
    /// Sentinel ordered after [`OperationNumber::NOW`].
    pub const FUTURE: Self = Self::Future;

    /// A concrete position.
    #[must_use]
    pub const fn new(block: u64, trx: u32, op: u32) -> Self {
        Self::At { block, trx, op }
    }

    /// Block number of a concrete position.
    #[must_use]
    pub const fn block(&self) -> Option<u64> {
        match self {
            Self::At { block, .. } => Some(*block),
            _ => None,
        }
    }

    /// Whether this is a concrete position rather than a sentinel.
    #[must_use]
    pub const fn is_concrete(&self) -> bool {
        matches!(self, Self::At { .. })
    }

    /// The same block and transaction, with the operation index replaced.
    #[must_use]
    pub const fn with_op(self, op: u32) -> Self {
        match self {
            Self::At { block, trx, .. } => Self::At { block, trx, op },
            other => other,
        }
    }
}

impl fmt::Display for OperationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("never"),
            Self::At { block, trx, op } => write!(f, "{block}/{trx}/{op}"),
            Self::Now => f.write_str("now"),
            Self::Future => f.write_str("future"),
        }
    }
}

/// Items that sit at a known ledger position.
pub trait Numbered {
    /// Ledger position of this item.
    fn operation_number(&self) -> OperationNumber;
}

impl Numbered for RawOperation {
    fn operation_number(&self) -> OperationNumber {
        OperationNumber::new(self.block_number, self.trx_in_block, self.op_in_trx)
    }
}

// A joined transaction is located by its first operation.
impl Numbered for Transaction {
    fn operation_number(&self) -> OperationNumber {
        OperationNumber::new(self.block_number, self.trx_in_block, 0)
    }
}

impl Numbered for OperationNumber {
    fn operation_number(&self) -> OperationNumber {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_bracket_concrete_positions() {
        let p = OperationNumber::new(u64::MAX, u32::MAX, u32::MAX);
        assert!(OperationNumber::NEVER < OperationNumber::new(0, 0, 0));
        assert!(p < OperationNumber::NOW);
        assert!(OperationNumber::NOW < OperationNumber::FUTURE);
    }

    #[test]
    fn with_op_keeps_sentinels() {
        assert_eq!(OperationNumber::NOW.with_op(3), OperationNumber::NOW);
        assert_eq!(
            OperationNumber::new(5, 1, 0).with_op(3),
            OperationNumber::new(5, 1, 3)
        );
    }

    #[test]
    fn display_is_slash_separated() {
        assert_eq!(OperationNumber::new(40, 1, 100).to_string(), "40/1/100");
        assert_eq!(OperationNumber::NEVER.to_string(), "never");
    }
}
