use std::collections::VecDeque;

use async_trait::async_trait;
use futures::Stream;
use rewind_core::{HistoryError, PullSource, Transaction};

use crate::fetcher::PaginatingFetcher;
use crate::join::OverlapJoinBuffer;

/// Pull iterator over an account's transactions, newest first.
///
/// Holds at most one joined page and refills it from the fetcher only once it
/// runs dry. Errors from either stage are returned as-is and never retried; the
/// cursor does not move on failure, so calling `next_transaction` again repeats
/// the failed request.
pub struct TransactionIterator {
    fetcher: PaginatingFetcher,
    joiner: OverlapJoinBuffer,
    buffer: VecDeque<Transaction>,
    done: bool,
}

impl TransactionIterator {
    /// Assemble from its two stages.
    #[must_use]
    pub const fn new(fetcher: PaginatingFetcher, joiner: OverlapJoinBuffer) -> Self {
        Self {
            fetcher,
            joiner,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Next transaction, or `Ok(None)` once the whole history has been served.
    ///
    /// # Errors
    /// `AlreadyDone` when called after `Ok(None)`; otherwise whatever the source
    /// or the join step fails with.
    pub async fn next_transaction(&mut self) -> Result<Option<Transaction>, HistoryError> {
        if self.done {
            return Err(HistoryError::AlreadyDone);
        }
        loop {
            if let Some(trx) = self.buffer.pop_front() {
                return Ok(Some(trx));
            }
            let Some(page) = self.fetcher.fetch_next_page().await? else {
                self.done = true;
                return Ok(None);
            };
            let released = self.joiner.push(page.fragments, page.is_last)?;
            self.buffer.extend(released);
        }
    }

    /// Next transaction paired with whether it is the last one.
    ///
    /// # Errors
    /// Same as [`next_transaction`](Self::next_transaction).
    pub async fn next_with_final(&mut self) -> Result<Option<(Transaction, bool)>, HistoryError> {
        Ok(self
            .next_transaction()
            .await?
            .map(|trx| (trx, self.is_final())))
    }

    /// `true` when nothing is left to serve: the last page has been joined and
    /// its transactions handed out.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.fetcher.is_exhausted() && self.buffer.is_empty()
    }

    /// Whether `Ok(None)` has already been returned.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Drain the remaining history into a vector.
    ///
    /// # Errors
    /// The first error met; transactions read before it are dropped.
    pub async fn collect_all(mut self) -> Result<Vec<Transaction>, HistoryError> {
        let mut out = Vec::new();
        while let Some(trx) = self.next_transaction().await? {
            out.push(trx);
        }
        Ok(out)
    }

    /// Adapt into a [`Stream`] that ends after the first error or at end of history.
    pub fn into_stream(self) -> impl Stream<Item = Result<Transaction, HistoryError>> + Send {
        futures::stream::unfold(Some(self), |state| async move {
            let mut iter = state?;
            match iter.next_transaction().await {
                Ok(Some(trx)) => Some((Ok(trx), Some(iter))),
                Ok(None) => None,
                Err(error) => Some((Err(error), None)),
            }
        })
    }
}

#[async_trait]
impl PullSource for TransactionIterator {
    type Item = Transaction;

    async fn next(&mut self) -> Result<Option<Transaction>, HistoryError> {
        self.next_transaction().await
    }
}
