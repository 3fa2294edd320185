//! Operation and transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ledger operation as named by the node, with its untouched body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPayload {
    /// Operation kind, e.g. `"vote"` or `"custom_json"`.
    pub name: String,
    /// Operation body exactly as returned by the node.
    pub body: serde_json::Value,
}

impl OperationPayload {
    /// Build a payload from a kind name and body.
    pub fn new(name: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// Decode the body as a vote, if this is a `vote` operation.
    #[must_use]
    pub fn as_vote(&self) -> Option<VoteOperation> {
        if self.name != "vote" {
            return None;
        }
        serde_json::from_value(self.body.clone()).ok()
    }

    /// Decode the body as a custom JSON operation, if this is a `custom_json` operation.
    #[must_use]
    pub fn as_custom_json(&self) -> Option<CustomJsonOperation> {
        if self.name != "custom_json" {
            return None;
        }
        serde_json::from_value(self.body.clone()).ok()
    }
}

/// Typed view of a `vote` operation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOperation {
    /// Voting account.
    pub voter: String,
    /// Author of the voted post.
    pub author: String,
    /// Permlink of the voted post.
    pub permlink: String,
    /// Vote weight in basis points, `-10000..=10000`.
    pub weight: i32,
}

/// Typed view of a `custom_json` operation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomJsonOperation {
    /// Application-defined identifier.
    pub id: String,
    /// Application payload as a JSON string.
    pub json: String,
    /// Accounts that signed with active authority.
    #[serde(default)]
    pub required_auths: Vec<String>,
    /// Accounts that signed with posting authority.
    #[serde(default)]
    pub required_posting_auths: Vec<String>,
}

/// A single entry of an account's operation history.
///
/// `global_index` is assigned by the node, dense and strictly increasing over
/// the account's whole history (0 is the oldest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOperation {
    /// Position in the account's history.
    pub global_index: u64,
    /// Block containing the transaction.
    pub block_number: u64,
    /// Position of the transaction within its block.
    pub trx_in_block: u32,
    /// Transaction identifier; operations sharing it belong to one transaction.
    pub transaction_id: String,
    /// Position of the operation within its transaction.
    pub op_in_trx: u32,
    /// Block time (UTC).
    pub timestamp: DateTime<Utc>,
    /// The operation itself.
    pub payload: OperationPayload,
}

impl RawOperation {
    /// Wrap this operation into a single-operation transaction fragment.
    #[must_use]
    pub fn into_fragment(self) -> Transaction {
        Transaction {
            block_number: self.block_number,
            trx_in_block: self.trx_in_block,
            transaction_id: self.transaction_id,
            timestamp: self.timestamp,
            operations: vec![self.payload],
        }
    }
}

/// A logical transaction: every operation of the account that shares one
/// transaction id, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Block containing the transaction.
    pub block_number: u64,
    /// Position of the transaction within its block.
    pub trx_in_block: u32,
    /// Transaction identifier.
    pub transaction_id: String,
    /// Block time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Operations in ascending history order.
    pub operations: Vec<OperationPayload>,
}

impl Transaction {
    /// Ordering key: newer transactions have larger keys.
    #[must_use]
    pub fn position(&self) -> (u64, u32) {
        (self.block_number, self.trx_in_block)
    }
}
