use super::{Delivery, Take};
use crate::HistoryError;

type ItemFn<T> = Box<dyn FnMut(T) -> Result<bool, HistoryError> + Send>;
type ErrorFn = Box<dyn FnMut(HistoryError) -> bool + Send>;

/// Terminal node invoking a callback per item.
///
/// Errors arrive at the handler registered with [`Sink::catch`]; the default
/// handler stops the pipeline. A sink has no downstream, so it cannot be chained
/// or branched from.
pub struct Sink<T> {
    on_item: ItemFn<T>,
    on_error: ErrorFn,
}

impl<T> Sink<T> {
    /// Sink whose callback returns `wantsMore`.
    pub fn new<F>(mut f: F) -> Self
    where
        F: FnMut(T) -> bool + Send + 'static,
    {
        Self::try_new(move |item| Ok(f(item)))
    }

    /// Sink whose callback may fail.
    ///
    /// A failure stops this sink only: its error handler is called once with
    /// the failure and the sink is detached from its upstream.
    pub fn try_new<F>(f: F) -> Self
    where
        F: FnMut(T) -> Result<bool, HistoryError> + Send + 'static,
    {
        Self {
            on_item: Box::new(f),
            on_error: Box::new(stop_on_error),
        }
    }

    /// Register the error handler; it returns `wantsMore` as well.
    pub fn catch<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(HistoryError) -> bool + Send + 'static,
    {
        self.on_error = Box::new(f);
        self
    }
}

// Default error handler: stop.
fn stop_on_error(_error: HistoryError) -> bool {
    false
}

impl<T> Take<T> for Sink<T> {
    fn take(&mut self, delivery: Delivery<T>) -> Result<bool, HistoryError> {
        match delivery {
            Ok(item) => (self.on_item)(item),
            Err(error) => Ok((self.on_error)(error)),
        }
    }

    fn abort(&mut self, error: HistoryError) {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %error, "sink callback failed; detaching sink");
        let _ = (self.on_error)(error);
    }
}
