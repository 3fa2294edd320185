use std::sync::Arc;

use rewind_core::{HistoryConfig, HistoryError, HistorySource, PullSupplier};

use crate::fetcher::PaginatingFetcher;
use crate::flatten::TransactionIterator;
use crate::join::OverlapJoinBuffer;

/// Supplier pushing an account's transactions, newest first, into a pipeline.
pub type AccountHistorySupplier = PullSupplier<TransactionIterator>;

/// Validated settings plus the source to read from.
///
/// Cheap to clone; each call to [`iter`](Self::iter) or
/// [`supplier`](Self::supplier) starts a fresh walk from the most recent record.
#[derive(Clone)]
pub struct AccountHistory {
    source: Arc<dyn HistorySource>,
    cfg: HistoryConfig,
}

/// Builder for [`AccountHistory`].
pub struct AccountHistoryBuilder {
    source: Option<Arc<dyn HistorySource>>,
    cfg: HistoryConfig,
}

impl Default for AccountHistoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountHistoryBuilder {
    /// Start with no source, an empty account and default paging
    /// (`MAX_PAGE_SIZE` records per call, overlap depth 5).
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            cfg: HistoryConfig::default(),
        }
    }

    /// Set the history source.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn HistorySource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the account to walk.
    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.cfg.account = account.into();
        self
    }

    /// Records requested per source call.
    ///
    /// Smaller pages mean more calls but earlier first results and less memory
    /// held per step.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.cfg.page_size = page_size;
        self
    }

    /// Number of oldest transactions held back per page for rejoining.
    ///
    /// Must exceed the number of transactions that can sit below a split one in
    /// a single page; see [`OverlapJoinBuffer`].
    #[must_use]
    pub const fn overlap_depth(mut self, overlap_depth: u32) -> Self {
        self.cfg.overlap_depth = overlap_depth;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: HistoryConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    /// `InvalidArg` if no source was set or the configuration is invalid.
    pub fn build(self) -> Result<AccountHistory, HistoryError> {
        let source = self
            .source
            .ok_or_else(|| HistoryError::invalid_arg("a history source is required"))?;
        self.cfg.validate()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            account = %self.cfg.account,
            source = source.name(),
            page_size = self.cfg.page_size,
            overlap_depth = self.cfg.overlap_depth,
            "account history configured"
        );
        Ok(AccountHistory {
            source,
            cfg: self.cfg,
        })
    }
}

impl AccountHistory {
    /// Start building an [`AccountHistory`].
    #[must_use]
    pub fn builder() -> AccountHistoryBuilder {
        AccountHistoryBuilder::new()
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &HistoryConfig {
        &self.cfg
    }

    /// Pull iterator over the account's transactions, newest first.
    #[must_use]
    pub fn iter(&self) -> TransactionIterator {
        TransactionIterator::new(
            PaginatingFetcher::new_unchecked(
                Arc::clone(&self.source),
                self.cfg.account.clone(),
                self.cfg.page_size,
            ),
            OverlapJoinBuffer::new_unchecked(self.cfg.overlap_depth),
        )
    }

    /// One-shot supplier over the account's transactions, newest first.
    ///
    /// ```rust,ignore
    /// let mut supplier = history.supplier();
    /// supplier
    ///     .chain(Sink::new(|trx: Transaction| {
    ///         println!("{} {}", trx.block_number, trx.transaction_id);
    ///         true
    ///     }))
    ///     .catch(|err| {
    ///         eprintln!("{err}");
    ///         false
    ///     });
    /// supplier.start().await?;
    /// ```
    #[must_use]
    pub fn supplier(&self) -> AccountHistorySupplier {
        PullSupplier::new(self.iter())
    }
}
