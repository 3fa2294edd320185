use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{HistoryError, RawOperation};

/// Where a history query starts, walking backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartAt {
    /// The most recent record of the account.
    Latest,
    /// A concrete history index (inclusive).
    Index(u64),
}

impl StartAt {
    /// Value of the `from` argument on the wire; the node uses `-1` for "latest".
    #[must_use]
    pub fn as_wire(self) -> i64 {
        match self {
            Self::Latest => -1,
            Self::Index(i) => i64::try_from(i).unwrap_or(i64::MAX),
        }
    }
}

impl fmt::Display for StartAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Arguments of one account-history query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Account whose history is queried.
    pub account: String,
    /// Newest index to include.
    pub from: StartAt,
    /// The node's `limit`: the response covers `[from - limit, from]`, inclusive
    /// at both ends, so up to `limit + 1` records come back.
    pub limit: u32,
}

impl HistoryRequest {
    /// Build a request.
    pub fn new(account: impl Into<String>, from: StartAt, limit: u32) -> Self {
        Self {
            account: account.into(),
            from,
            limit,
        }
    }

    /// Positional JSON-RPC params for `get_account_history`.
    #[must_use]
    pub fn to_params(&self) -> serde_json::Value {
        serde_json::json!([self.account, self.from.as_wire(), self.limit])
    }
}

/// The single call the engine needs from a ledger node.
///
/// Implementations perform one paginated account-history query and return the
/// records oldest-first, covering indices `[max(0, from - limit), from]`
/// (or the most recent ones for [`StartAt::Latest`]). Transport failures map to
/// [`HistoryError::Source`]; the engine never retries them.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Human-readable source name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Fetch one page of raw history, oldest record first.
    async fn fetch_page(&self, req: &HistoryRequest) -> Result<Vec<RawOperation>, HistoryError>;
}
