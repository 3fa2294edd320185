use std::sync::Arc;

use rewind_core::{
    HistoryError, HistoryRequest, HistorySource, StartAt, Transaction, validate_account,
    validate_page_size,
};

/// Where the next request starts and whether history is used up.
///
/// Only advanced after a successful fetch, so a failed call can be repeated
/// against the same range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Newest index of the next request.
    pub next_from: StartAt,
    /// Index 0 has been returned; no further request will be made.
    pub exhausted: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            next_from: StartAt::Latest,
            exhausted: false,
        }
    }
}

/// One fetched page, newest record first, each record wrapped as a
/// single-operation transaction fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    /// Fragments in descending history order.
    pub fragments: Vec<Transaction>,
    /// No older records exist below this page.
    pub is_last: bool,
}

/// Walks an account's history backwards, one source call per page.
pub struct PaginatingFetcher {
    source: Arc<dyn HistorySource>,
    account: String,
    effective_page_size: u32,
    cursor: Cursor,
}

impl PaginatingFetcher {
    /// Create a fetcher for `account` requesting `page_size` records per call.
    ///
    /// # Errors
    /// `InvalidArg` when the account name is too short or `page_size` is outside
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(
        source: Arc<dyn HistorySource>,
        account: impl Into<String>,
        page_size: u32,
    ) -> Result<Self, HistoryError> {
        let account = account.into();
        validate_account(&account)?;
        validate_page_size(page_size)?;
        Ok(Self::new_unchecked(source, account, page_size))
    }

    pub(crate) const fn new_unchecked(
        source: Arc<dyn HistorySource>,
        account: String,
        page_size: u32,
    ) -> Self {
        Self {
            source,
            account,
            // the node's limit is inclusive of `from`
            effective_page_size: page_size.saturating_sub(1),
            cursor: Cursor {
                next_from: StartAt::Latest,
                exhausted: false,
            },
        }
    }

    /// Current cursor.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether end of history has been reached.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.cursor.exhausted
    }

    /// Account being walked.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Name of the underlying history source.
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// The request the next call to [`fetch_next_page`](Self::fetch_next_page) will issue.
    #[must_use]
    pub fn next_request(&self) -> HistoryRequest {
        let limit = match self.cursor.next_from {
            StartAt::Latest => self.effective_page_size,
            StartAt::Index(from) => {
                u32::try_from(from).map_or(self.effective_page_size, |from| {
                    self.effective_page_size.min(from)
                })
            }
        };
        HistoryRequest::new(self.account.clone(), self.cursor.next_from, limit)
    }

    /// Fetch the next page, newest first.
    ///
    /// Returns `Ok(None)` once history is exhausted, without calling the source.
    ///
    /// # Errors
    /// Whatever the source fails with; the cursor is left untouched.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "rewind::fetcher::fetch_next_page",
            skip(self),
            fields(account = %self.account, source = self.source.name()),
        )
    )]
    pub async fn fetch_next_page(&mut self) -> Result<Option<RawPage>, HistoryError> {
        if self.cursor.exhausted {
            return Ok(None);
        }
        let req = self.next_request();
        let mut records = self.source.fetch_page(&req).await?;
        records.reverse();

        let returned = records.len();
        let next = next_cursor(
            returned,
            self.effective_page_size,
            records.last().map(|r| r.global_index),
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(
            from = %req.from,
            limit = req.limit,
            returned,
            newest = records.first().map(|r| r.global_index),
            oldest = records.last().map(|r| r.global_index),
            exhausted = next.exhausted,
            "fetched history page"
        );
        self.cursor = next;

        Ok(Some(RawPage {
            fragments: records
                .into_iter()
                .map(rewind_core::RawOperation::into_fragment)
                .collect(),
            is_last: next.exhausted,
        }))
    }
}

/// Cursor after a page of `returned` records whose oldest index is `oldest`.
fn next_cursor(returned: usize, effective_page_size: u32, oldest: Option<u64>) -> Cursor {
    let short = u32::try_from(returned).is_ok_and(|n| n < effective_page_size);
    match oldest {
        Some(oldest) if !short && oldest > 0 => Cursor {
            next_from: StartAt::Index(oldest - 1),
            exhausted: false,
        },
        _ => Cursor {
            next_from: StartAt::Latest,
            exhausted: true,
        },
    }
}
