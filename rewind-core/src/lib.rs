//! rewind-core
//!
//! Core contracts shared across the rewind workspace.
//!
//! - `source`: the `HistorySource` trait, the single seam to the ledger node.
//! - `stream`: the chainable push pipeline (suppliers, transformers, sinks)
//!   with fan-out, per-branch cancellation and error isolation.
//!
//! Execution model
//! ---------------
//! A pipeline runs on a single logical thread of control. The only suspension
//! point is the `HistorySource::fetch_page` call; every `take`/`give` is a plain
//! synchronous call, so delivery order is exactly production order.
//!
#![warn(missing_docs)]

/// History-source trait and request descriptor.
pub mod source;
/// Chainable push-stream primitive.
pub mod stream;

pub use source::{HistoryRequest, HistorySource, StartAt};
pub use stream::{
    Chainable, Comparison, Delivery, Downstream, Filter, Limiter, OnError, OperationNumberFilter,
    PullSource, PullSupplier, Sink, SupplierState, Take, Transformer,
};

pub use rewind_types::{
    CustomJsonOperation, DEFAULT_OVERLAP_DEPTH, HistoryConfig, HistoryError, MAX_PAGE_SIZE,
    MIN_ACCOUNT_LEN, Numbered, OperationNumber, OperationPayload, RawOperation, Transaction,
    VoteOperation, decode_page, parse_ledger_timestamp, validate_account, validate_overlap_depth,
    validate_page_size,
};
