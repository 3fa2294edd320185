use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Chainable, Downstream};
use crate::HistoryError;

/// Lifecycle of a one-shot supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SupplierState {
    /// Built, not started.
    #[default]
    Idle,
    /// `start()` is producing.
    Running,
    /// Production ended: upstream exhausted, no downstream left, or an unhandled error.
    Finished,
}

/// Pull-style producer a [`PullSupplier`] drives.
///
/// `Ok(None)` means the source is exhausted.
#[async_trait]
pub trait PullSource: Send {
    /// Item type produced.
    type Item: Clone + Send + 'static;

    /// Produce the next item.
    async fn next(&mut self) -> Result<Option<Self::Item>, HistoryError>;
}

/// Supplier that pulls from a [`PullSource`] and pushes into its downstream.
///
/// Each item is fully delivered before the next pull, so cancellation by the
/// last downstream is observed before any further upstream request.
pub struct PullSupplier<P>
where
    P: PullSource,
{
    source: P,
    downstream: Downstream<P::Item>,
    state: SupplierState,
}

impl<P> PullSupplier<P>
where
    P: PullSource,
{
    /// Wrap a pull source.
    pub fn new(source: P) -> Self {
        Self {
            source,
            downstream: Downstream::new(),
            state: SupplierState::Idle,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SupplierState {
        self.state
    }

    /// Borrow the wrapped source.
    pub const fn source(&self) -> &P {
        &self.source
    }

    /// Produce until the source is exhausted or no downstream remains.
    ///
    /// A source error is delivered to the downstream first; if nobody wants to
    /// continue after seeing it, `start` fails with that error. If someone does,
    /// the source is pulled again.
    ///
    /// # Errors
    /// `AlreadyStarted` on a second call, otherwise the unhandled source error.
    pub async fn start(&mut self) -> Result<(), HistoryError> {
        if self.state != SupplierState::Idle {
            return Err(HistoryError::AlreadyStarted);
        }
        self.state = SupplierState::Running;
        #[cfg(feature = "tracing")]
        tracing::debug!(downstream = self.downstream.len(), "supplier running");

        let outcome = self.run().await;

        self.state = SupplierState::Finished;
        #[cfg(feature = "tracing")]
        tracing::debug!(ok = outcome.is_ok(), "supplier finished");
        outcome
    }

    async fn run(&mut self) -> Result<(), HistoryError> {
        while self.downstream.has_downstream() {
            match self.source.next().await {
                Ok(Some(item)) => {
                    if !self.downstream.give(Ok(item)) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    if !self.downstream.give(Err(error.clone())) {
                        return Err(error);
                    }
                }
            }
        }
        Ok(())
    }
}

impl<P> Chainable<P::Item> for PullSupplier<P>
where
    P: PullSource,
{
    fn downstream(&mut self) -> &mut Downstream<P::Item> {
        &mut self.downstream
    }
}
