//! Rewind streams an account's complete operation history, newest first, from
//! a ledger node that only serves fixed-size pages walking backwards.
//!
//! Overview
//! - `PaginatingFetcher` drives a `HistorySource` from the most recent record
//!   down to index 0, one call per page, and stops calling once index 0 is seen.
//! - `OverlapJoinBuffer` groups operations into transactions and reassembles
//!   transactions split by a page boundary by holding back the oldest few
//!   transactions of every page.
//! - `TransactionIterator` serves the joined transactions one at a time, and
//!   `AccountHistorySupplier` pushes them through a `rewind_core` pipeline.
//!
//! Key behaviors and trade-offs
//! - Pagination: pages are requested strictly one after another; nothing is
//!   prefetched, so a consumer that stops early stops the fetching too.
//! - Ordering: transactions come out in non-increasing
//!   `(block_number, trx_in_block)` order, each with its operations in
//!   chronological order.
//! - Errors: source failures surface unchanged and are never retried; they
//!   reach pipeline error handlers, which decide whether to continue.
//! - Overlap depth: larger values tolerate more disorder between the ledger's
//!   index and block order at the cost of a slightly longer delay per page.
//!
//! Examples
//! Pulling transactions:
//! ```rust,ignore
//! use std::sync::Arc;
//! use rewind::AccountHistory;
//!
//! let history = AccountHistory::builder()
//!     .source(Arc::new(node))
//!     .account("alice")
//!     .page_size(1000)
//!     .build()?;
//! let mut iter = history.iter();
//! while let Some(trx) = iter.next_transaction().await? {
//!     println!("{} {}", trx.block_number, trx.transaction_id);
//! }
//! ```
//!
//! Pushing through a pipeline with two branches:
//! ```rust,ignore
//! use rewind::{Chainable, Filter, Sink, Transaction};
//!
//! let mut supplier = history.supplier();
//! supplier
//!     .branch(|s| {
//!         s.chain(Filter::new(|t: &Transaction| {
//!             t.operations.iter().any(|op| op.name == "vote")
//!         }))
//!         .chain(Sink::new(|t| { println!("vote in {}", t.transaction_id); true }));
//!     })
//!     .branch(|s| {
//!         s.chain(Sink::new(|_t| true)).catch(|err| { eprintln!("{err}"); false });
//!     });
//! supplier.start().await?;
//! ```
//!
//! See `demos/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod fetcher;
mod flatten;
mod join;

pub use crate::core::{AccountHistory, AccountHistoryBuilder, AccountHistorySupplier};
pub use fetcher::{Cursor, PaginatingFetcher, RawPage};
pub use flatten::TransactionIterator;
pub use join::OverlapJoinBuffer;

// Re-export core types for convenience
pub use rewind_core::{
    Chainable, Comparison, CustomJsonOperation, DEFAULT_OVERLAP_DEPTH, Delivery, Downstream,
    Filter, HistoryConfig, HistoryError, HistoryRequest, HistorySource, Limiter, MAX_PAGE_SIZE,
    MIN_ACCOUNT_LEN, Numbered, OnError, OperationNumber, OperationNumberFilter, OperationPayload,
    PullSource, PullSupplier, RawOperation, Sink, StartAt, SupplierState, Take, Transaction,
    Transformer, VoteOperation, decode_page, parse_ledger_timestamp,
};
