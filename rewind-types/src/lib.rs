//! Rewind-specific data transfer objects, configuration primitives, and errors.
#![warn(missing_docs)]

mod config;
mod error;
mod model;
mod opnum;
pub mod wire;

pub use config::{
    DEFAULT_OVERLAP_DEPTH, HistoryConfig, MAX_PAGE_SIZE, MIN_ACCOUNT_LEN, validate_account,
    validate_overlap_depth, validate_page_size,
};
pub use error::HistoryError;
pub use model::{CustomJsonOperation, OperationPayload, RawOperation, Transaction, VoteOperation};
pub use opnum::{Numbered, OperationNumber};
pub use wire::{decode_page, parse_ledger_timestamp};
