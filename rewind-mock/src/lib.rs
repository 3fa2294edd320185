//! Mock history sources for CI-safe tests and demos.
//!
//! - [`generate_history`] builds a deterministic synthetic account history.
//! - [`MockHistorySource`] serves such a history with the ledger's inclusive
//!   paging semantics and logs every call.
//! - [`DynamicMockSource`] defers every call to a test-side controller.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rewind_core::{
    HistoryError, HistoryRequest, HistorySource, OperationPayload, RawOperation, StartAt,
    Transaction,
};
use tokio::sync::Mutex;

mod dynamic;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};

/// Block time of the first generated block (2018-01-01T00:00:00Z).
const GENESIS_SECS: i64 = 1_514_764_800;
/// Seconds between generated blocks.
const BLOCK_INTERVAL_SECS: i64 = 3;
/// Block number of the first generated block.
const FIRST_BLOCK: u64 = 20_000_000;

/// Build a synthetic history for `account`, oldest operation first.
///
/// Produces `trx_count` transactions of `ops_per_trx` operations each (drawn
/// uniformly), two transactions per block, with dense global indices from 0.
/// Operations alternate between votes and custom JSON. The same `seed` always
/// yields the same history.
#[must_use]
pub fn generate_history(
    account: &str,
    trx_count: usize,
    ops_per_trx: RangeInclusive<usize>,
    seed: u64,
) -> Vec<RawOperation> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ops = Vec::new();
    let mut index = 0u64;
    let mut block_number = FIRST_BLOCK;
    let mut timestamp = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(GENESIS_SECS);
    for trx in 0..trx_count {
        let trx_in_block = u32::from(trx % 2 == 1);
        if trx > 0 && trx_in_block == 0 {
            block_number += 1;
            timestamp += TimeDelta::seconds(BLOCK_INTERVAL_SECS);
        }
        let transaction_id = format!("{:016x}{:016x}", rng.random::<u64>(), rng.random::<u64>());
        let n_ops = rng.random_range(ops_per_trx.clone());
        for op_in_trx in (0u32..).take(n_ops) {
            let payload = if op_in_trx % 2 == 0 {
                OperationPayload::new(
                    "vote",
                    serde_json::json!({
                        "voter": account,
                        "author": format!("author{}", rng.random_range(0..50u32)),
                        "permlink": format!("post-{trx}-{op_in_trx}"),
                        "weight": rng.random_range(-10_000..=10_000i32),
                    }),
                )
            } else {
                OperationPayload::new(
                    "custom_json",
                    serde_json::json!({
                        "id": "follow",
                        "json": format!("[\"follow\",{{\"n\":{index}}}]"),
                        "required_auths": [],
                        "required_posting_auths": [account],
                    }),
                )
            };
            ops.push(RawOperation {
                global_index: index,
                block_number,
                trx_in_block,
                transaction_id: transaction_id.clone(),
                op_in_trx,
                timestamp,
                payload,
            });
            index += 1;
        }
    }
    ops
}

/// The transactions an engine should emit for `ops`, newest first.
///
/// Groups consecutive operations sharing a transaction id, which is how
/// [`generate_history`] lays them out.
#[must_use]
pub fn newest_first_transactions(ops: &[RawOperation]) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = Vec::new();
    for op in ops.iter().cloned() {
        match out.last_mut() {
            Some(last) if last.transaction_id == op.transaction_id => {
                last.operations.push(op.payload);
            }
            _ => out.push(op.into_fragment()),
        }
    }
    out.reverse();
    out
}

/// Encode an operation as the ledger's `[index, descriptor]` tuple.
#[must_use]
pub fn to_wire(op: &RawOperation) -> serde_json::Value {
    serde_json::json!([
        op.global_index,
        {
            "block": op.block_number,
            "trx_id": op.transaction_id,
            "trx_in_block": op.trx_in_block,
            "op_in_trx": op.op_in_trx,
            "virtual_op": 0,
            "timestamp": op.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "op": [op.payload.name, op.payload.body],
        }
    ])
}

/// A history source backed by an in-memory history.
///
/// A request `(from, limit)` returns indices `[max(0, from - limit), from]`,
/// oldest first, so up to `limit + 1` records; `from = latest` starts at the
/// newest record. Every call is logged, and a failure can be scheduled for the
/// n-th call.
pub struct MockHistorySource {
    name: &'static str,
    ops: Vec<RawOperation>,
    calls: Mutex<Vec<HistoryRequest>>,
    fail_on_call: Option<usize>,
    latency: Option<Duration>,
}

impl MockHistorySource {
    /// Serve `ops`, which must be sorted by `global_index` and dense from 0.
    #[must_use]
    pub fn new(ops: Vec<RawOperation>) -> Self {
        Self {
            name: "rewind-mock",
            ops,
            calls: Mutex::new(Vec::new()),
            fail_on_call: None,
            latency: None,
        }
    }

    /// Serve a history decoded from ledger wire tuples.
    ///
    /// # Errors
    /// `Data` if any tuple is malformed.
    pub fn from_wire(values: Vec<serde_json::Value>) -> Result<Self, HistoryError> {
        let mut ops = rewind_core::decode_page(values)?;
        ops.sort_by_key(|op| op.global_index);
        Ok(Self::new(ops))
    }

    /// Fail the `n`-th call (1-based) with a source error.
    #[must_use]
    pub const fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    /// Sleep this long before answering each call.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Wrap into a shareable trait object.
    #[must_use]
    pub fn into_shared(self) -> Arc<dyn HistorySource> {
        Arc::new(self)
    }

    /// The served history, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[RawOperation] {
        &self.ops
    }

    /// Copy of every request received so far.
    pub async fn calls(&self) -> Vec<HistoryRequest> {
        self.calls.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    fn slice(&self, req: &HistoryRequest) -> Vec<RawOperation> {
        let Some(newest) = self.ops.len().checked_sub(1) else {
            return Vec::new();
        };
        let from = match req.from {
            StartAt::Latest => newest,
            StartAt::Index(i) => usize::try_from(i).map_or(newest, |i| i.min(newest)),
        };
        let limit = usize::try_from(req.limit).unwrap_or(usize::MAX);
        let start = from.saturating_sub(limit);
        self.ops[start..=from].to_vec()
    }
}

#[async_trait]
impl HistorySource for MockHistorySource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_page(&self, req: &HistoryRequest) -> Result<Vec<RawOperation>, HistoryError> {
        let call = {
            let mut guard = self.calls.lock().await;
            guard.push(req.clone());
            guard.len()
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_on_call == Some(call) {
            return Err(HistoryError::source(
                self.name,
                format!("forced failure on call {call}"),
            ));
        }
        Ok(self.slice(req))
    }
}
