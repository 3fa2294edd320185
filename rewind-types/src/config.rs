//! Configuration types consumed by the history engine.

use serde::{Deserialize, Serialize};

use crate::HistoryError;

/// Largest page the ledger's account-history query accepts.
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Minimum length of an account name.
pub const MIN_ACCOUNT_LEN: usize = 3;

/// Overlap depth used when none is configured.
pub const DEFAULT_OVERLAP_DEPTH: u32 = 5;

/// Settings for streaming one account's history.
///
/// Validated once at construction; the engine never re-validates per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Account whose history is streamed.
    pub account: String,
    /// Records requested per fetch. The ledger treats the limit as inclusive of
    /// the starting index, so the fetcher asks for `page_size - 1`.
    pub page_size: u32,
    /// Number of oldest transactions held back per page for joining with the
    /// next (older) page. Bounds how far a split transaction can be reassembled.
    pub overlap_depth: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            page_size: MAX_PAGE_SIZE,
            overlap_depth: DEFAULT_OVERLAP_DEPTH,
        }
    }
}

impl HistoryConfig {
    /// Create a config for `account` with default paging.
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            ..Self::default()
        }
    }

    /// Check every constraint of the configuration surface.
    ///
    /// # Errors
    /// Returns `InvalidArg` naming the first offending option.
    pub fn validate(&self) -> Result<(), HistoryError> {
        validate_account(&self.account)?;
        validate_page_size(self.page_size)?;
        validate_overlap_depth(self.overlap_depth, self.page_size)
    }
}

/// Validate an account name (non-empty, at least [`MIN_ACCOUNT_LEN`] characters).
///
/// # Errors
/// Returns `InvalidArg` if the name is too short.
pub fn validate_account(account: &str) -> Result<(), HistoryError> {
    if account.chars().count() < MIN_ACCOUNT_LEN {
        return Err(HistoryError::invalid_arg(format!(
            "account must be at least {MIN_ACCOUNT_LEN} characters, got {account:?}"
        )));
    }
    Ok(())
}

/// Validate a page size against `1..=MAX_PAGE_SIZE`.
///
/// # Errors
/// Returns `InvalidArg` if the size is out of range.
pub fn validate_page_size(page_size: u32) -> Result<(), HistoryError> {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(HistoryError::invalid_arg(format!(
            "page_size must be in 1..={MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    Ok(())
}

/// Validate `0 < overlap_depth < page_size - 2`.
///
/// The upper bound keeps the retained window from ever swallowing a whole page.
///
/// # Errors
/// Returns `InvalidArg` if the depth is zero or too large for the page size.
pub fn validate_overlap_depth(overlap_depth: u32, page_size: u32) -> Result<(), HistoryError> {
    if overlap_depth == 0 {
        return Err(HistoryError::invalid_arg(
            "overlap_depth must be greater than 0",
        ));
    }
    if i64::from(overlap_depth) >= i64::from(page_size) - 2 {
        return Err(HistoryError::invalid_arg(format!(
            "overlap_depth must be less than page_size - 2 ({}), got {overlap_depth}",
            i64::from(page_size) - 2
        )));
    }
    Ok(())
}
