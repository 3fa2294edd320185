use rewind_types::{Numbered, OperationNumber};

use super::{Chainable, Delivery, Downstream, Take};
use crate::HistoryError;

/// How an item's position is compared with the filter's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Strictly before the bound.
    Before,
    /// Before or at the bound.
    AtOrBefore,
    /// Strictly after the bound.
    After,
    /// At or after the bound.
    AtOrAfter,
}

impl Comparison {
    /// Whether `position` satisfies this comparison against `bound`.
    #[must_use]
    pub fn holds(self, position: OperationNumber, bound: OperationNumber) -> bool {
        match self {
            Self::Before => position < bound,
            Self::AtOrBefore => position <= bound,
            Self::After => position > bound,
            Self::AtOrAfter => position >= bound,
        }
    }

    const fn is_lower_bound(self) -> bool {
        matches!(self, Self::After | Self::AtOrAfter)
    }
}

/// Forwards only items whose ledger position satisfies a comparison.
///
/// History arrives newest first. With [`OperationNumberFilter::limiting`], a
/// lower-bound filter ([`Comparison::After`], [`Comparison::AtOrAfter`]) stops
/// at the first item that falls below the bound, since no later item can pass
/// it. Upper-bound filters only skip. Error deliveries are forwarded.
pub struct OperationNumberFilter<T> {
    comparison: Comparison,
    bound: OperationNumber,
    limiting: bool,
    downstream: Downstream<T>,
}

impl<T> OperationNumberFilter<T>
where
    T: Clone + 'static,
{
    /// Keep items whose position compares to `bound` as `comparison` says.
    #[must_use]
    pub fn new(comparison: Comparison, bound: OperationNumber) -> Self {
        Self {
            comparison,
            bound,
            limiting: false,
            downstream: Downstream::new(),
        }
    }

    /// Stop the pipeline once a lower bound has been passed.
    #[must_use]
    pub const fn limiting(mut self) -> Self {
        self.limiting = true;
        self
    }

    /// The configured bound.
    #[must_use]
    pub const fn bound(&self) -> OperationNumber {
        self.bound
    }
}

impl<T> Chainable<T> for OperationNumberFilter<T>
where
    T: Clone + 'static,
{
    fn downstream(&mut self) -> &mut Downstream<T> {
        &mut self.downstream
    }
}

impl<T> Take<T> for OperationNumberFilter<T>
where
    T: Numbered + Clone + Send + 'static,
{
    fn take(&mut self, delivery: Delivery<T>) -> Result<bool, HistoryError> {
        let item = match delivery {
            Ok(item) => item,
            Err(error) => return Ok(self.downstream.give(Err(error))),
        };
        if self.comparison.holds(item.operation_number(), self.bound) {
            return Ok(self.downstream.give(Ok(item)));
        }
        if self.limiting && self.comparison.is_lower_bound() {
            #[cfg(feature = "tracing")]
            tracing::debug!(bound = %self.bound, "passed lower bound; stopping");
            return Ok(false);
        }
        Ok(self.downstream.has_downstream())
    }

    fn abort(&mut self, error: HistoryError) {
        let _ = self.downstream.give(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_against_sentinels() {
        let p = OperationNumber::new(10, 0, 0);
        assert!(Comparison::Before.holds(p, OperationNumber::NOW));
        assert!(Comparison::After.holds(p, OperationNumber::NEVER));
        assert!(!Comparison::After.holds(p, p));
        assert!(Comparison::AtOrAfter.holds(p, p));
        assert!(Comparison::AtOrBefore.holds(p, p));
    }
}
