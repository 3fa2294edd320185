use super::{Chainable, Delivery, Downstream, Take};
use crate::HistoryError;

type TransformFn<I, O> = Box<dyn FnMut(I) -> Result<Vec<O>, HistoryError> + Send>;

/// A node that turns each input into zero or more outputs.
///
/// A failure of the transform function is not propagated upward: it becomes an
/// error delivery to this node's own downstream, which decides whether the
/// pipeline keeps going. Incoming error deliveries are forwarded unchanged.
pub struct Transformer<I, O> {
    f: TransformFn<I, O>,
    downstream: Downstream<O>,
}

impl<I, O> Transformer<I, O>
where
    O: Clone + 'static,
{
    /// Build from a fallible one-to-many function.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(I) -> Result<Vec<O>, HistoryError> + Send + 'static,
    {
        Self {
            f: Box::new(f),
            downstream: Downstream::new(),
        }
    }

    /// Build from an infallible one-to-one function.
    pub fn map<F>(mut f: F) -> Self
    where
        F: FnMut(I) -> O + Send + 'static,
    {
        Self::new(move |item| Ok(vec![f(item)]))
    }

    /// Build from a fallible one-to-one function.
    pub fn try_map<F>(mut f: F) -> Self
    where
        F: FnMut(I) -> Result<O, HistoryError> + Send + 'static,
    {
        Self::new(move |item| f(item).map(|o| vec![o]))
    }
}

impl<I, O> Chainable<O> for Transformer<I, O>
where
    O: Clone + 'static,
{
    fn downstream(&mut self) -> &mut Downstream<O> {
        &mut self.downstream
    }
}

impl<I, O> Take<I> for Transformer<I, O>
where
    I: 'static,
    O: Clone + Send + 'static,
{
    fn take(&mut self, delivery: Delivery<I>) -> Result<bool, HistoryError> {
        let item = match delivery {
            Ok(item) => item,
            Err(error) => return Ok(self.downstream.give(Err(error))),
        };
        match (self.f)(item) {
            Ok(outputs) => {
                for out in outputs {
                    if !self.downstream.give(Ok(out)) {
                        return Ok(false);
                    }
                }
                Ok(self.downstream.has_downstream())
            }
            Err(error) => Ok(self.downstream.give(Err(error))),
        }
    }

    fn abort(&mut self, error: HistoryError) {
        let _ = self.downstream.give(Err(error));
    }
}

/// A transformer that forwards only items matching a predicate.
pub struct Filter<T> {
    predicate: Box<dyn FnMut(&T) -> bool + Send>,
    downstream: Downstream<T>,
}

impl<T> Filter<T>
where
    T: Clone + 'static,
{
    /// Keep items for which `predicate` returns `true`.
    pub fn new<F>(predicate: F) -> Self
    where
        F: FnMut(&T) -> bool + Send + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            downstream: Downstream::new(),
        }
    }
}

impl<T> Chainable<T> for Filter<T>
where
    T: Clone + 'static,
{
    fn downstream(&mut self) -> &mut Downstream<T> {
        &mut self.downstream
    }
}

impl<T> Take<T> for Filter<T>
where
    T: Clone + Send + 'static,
{
    fn take(&mut self, delivery: Delivery<T>) -> Result<bool, HistoryError> {
        match delivery {
            Ok(item) if !(self.predicate)(&item) => Ok(self.downstream.has_downstream()),
            other => Ok(self.downstream.give(other)),
        }
    }

    fn abort(&mut self, error: HistoryError) {
        let _ = self.downstream.give(Err(error));
    }
}

/// A transformer that forwards at most `limit` items, then asks its upstream to stop.
pub struct Limiter<T> {
    remaining: usize,
    downstream: Downstream<T>,
}

impl<T> Limiter<T>
where
    T: Clone + 'static,
{
    /// Forward at most `limit` items.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            remaining: limit,
            downstream: Downstream::new(),
        }
    }

    /// Items still allowed through.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<T> Chainable<T> for Limiter<T>
where
    T: Clone + 'static,
{
    fn downstream(&mut self) -> &mut Downstream<T> {
        &mut self.downstream
    }
}

impl<T> Take<T> for Limiter<T>
where
    T: Clone + Send + 'static,
{
    fn take(&mut self, delivery: Delivery<T>) -> Result<bool, HistoryError> {
        match delivery {
            Ok(item) => {
                if self.remaining == 0 {
                    return Ok(false);
                }
                self.remaining -= 1;
                let more = self.downstream.give(Ok(item));
                Ok(more && self.remaining > 0)
            }
            Err(error) => Ok(self.downstream.give(Err(error))),
        }
    }

    fn abort(&mut self, error: HistoryError) {
        let _ = self.downstream.give(Err(error));
    }
}

/// A transformer that handles errors and forwards only items.
///
/// Every error delivery goes to the handler, whose answer is this node's
/// `wantsMore`; errors never reach the downstream. Items pass through unchanged.
pub struct OnError<T> {
    handler: Box<dyn FnMut(HistoryError) -> bool + Send>,
    downstream: Downstream<T>,
}

impl<T> OnError<T>
where
    T: Clone + 'static,
{
    /// Route errors to `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(HistoryError) -> bool + Send + 'static,
    {
        Self {
            handler: Box::new(handler),
            downstream: Downstream::new(),
        }
    }
}

impl<T> Chainable<T> for OnError<T>
where
    T: Clone + 'static,
{
    fn downstream(&mut self) -> &mut Downstream<T> {
        &mut self.downstream
    }
}

impl<T> Take<T> for OnError<T>
where
    T: Clone + Send + 'static,
{
    fn take(&mut self, delivery: Delivery<T>) -> Result<bool, HistoryError> {
        match delivery {
            Ok(item) => Ok(self.downstream.give(Ok(item))),
            Err(error) => Ok((self.handler)(error) && self.downstream.has_downstream()),
        }
    }

    fn abort(&mut self, error: HistoryError) {
        let _ = (self.handler)(error);
    }
}
