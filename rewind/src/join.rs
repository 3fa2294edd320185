use std::collections::HashMap;

use rewind_core::{HistoryError, Transaction};

/// Reassembles transactions whose operations straddle page boundaries.
///
/// Pages arrive newest first. Each step merges the previous step's window with
/// the incoming fragments, groups them by transaction id, sorts the result by
/// `(block_number, trx_in_block)` descending and holds back the oldest
/// `overlap_depth` transactions, since the next (older) page may still carry
/// operations for them.
///
/// # Overlap bound
/// A transaction is released only once it is no longer among the oldest
/// `overlap_depth` joined transactions of a step. That is safe whenever every
/// transaction still continuing into the next page sorts into that tail. When
/// the ledger's index order agrees with block order, a split transaction is
/// always the oldest item of its page and a depth of 1 suffices; a larger depth
/// tolerates operations indexed out of block order, up to `overlap_depth - 1`
/// newer-positioned transactions interleaved below a split one.
#[derive(Debug, Clone)]
pub struct OverlapJoinBuffer {
    overlap_depth: usize,
    window: Vec<Transaction>,
}

impl OverlapJoinBuffer {
    /// Create an empty buffer.
    ///
    /// # Errors
    /// `InvalidArg` if `overlap_depth` is zero.
    pub fn new(overlap_depth: u32) -> Result<Self, HistoryError> {
        if overlap_depth == 0 {
            return Err(HistoryError::invalid_arg(
                "overlap_depth must be greater than 0",
            ));
        }
        Ok(Self::new_unchecked(overlap_depth))
    }

    pub(crate) fn new_unchecked(overlap_depth: u32) -> Self {
        Self {
            overlap_depth: usize::try_from(overlap_depth).unwrap_or(usize::MAX),
            window: Vec::new(),
        }
    }

    /// Transactions currently held back.
    #[must_use]
    pub fn window(&self) -> &[Transaction] {
        &self.window
    }

    /// Join one newest-first page of fragments and return what can be released.
    ///
    /// On the last page everything is released, window included.
    ///
    /// # Errors
    /// `Protocol` if a non-final page is empty. The buffer is unchanged then.
    pub fn push(
        &mut self,
        page: Vec<Transaction>,
        is_last: bool,
    ) -> Result<Vec<Transaction>, HistoryError> {
        if page.is_empty() && !is_last {
            return Err(HistoryError::protocol(
                "source returned an empty page before the end of history",
            ));
        }

        let merged = std::mem::take(&mut self.window).into_iter().chain(page);
        let mut joined = join_fragments(merged);
        joined.sort_by(|a, b| b.position().cmp(&a.position()));

        if is_last {
            #[cfg(feature = "tracing")]
            tracing::debug!(pass = joined.len(), retained = 0, "joined final page");
            return Ok(joined);
        }

        let keep = self.overlap_depth.min(joined.len());
        self.window = joined.split_off(joined.len() - keep);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            pass = joined.len(),
            retained = self.window.len(),
            "joined page"
        );
        Ok(joined)
    }
}

/// Group fragments by transaction id, in order of first appearance.
///
/// Input is newest first, so each group's operations are concatenated from its
/// last fragment to its first to come out in chronological order. Positional
/// fields are those of the group's first fragment.
fn join_fragments(fragments: impl IntoIterator<Item = Transaction>) -> Vec<Transaction> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Transaction>> = Vec::new();
    for fragment in fragments {
        match slots.get(&fragment.transaction_id) {
            Some(&slot) => groups[slot].push(fragment),
            None => {
                slots.insert(fragment.transaction_id.clone(), groups.len());
                groups.push(vec![fragment]);
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            let mut operations = Vec::new();
            for part in group.iter_mut().rev() {
                operations.append(&mut part.operations);
            }
            let head = group.into_iter().next()?;
            Some(Transaction { operations, ..head })
        })
        .collect()
}
