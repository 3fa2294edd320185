//! A minimal push pipeline.
//!
//! Three roles share one capability set:
//!
//! - **Supplier** ([`PullSupplier`]): produces items and pushes them with `give`;
//!   it has no `take`.
//! - **Transformer** ([`Transformer`], [`Filter`], [`Limiter`], [`OnError`],
//!   [`OperationNumberFilter`]): implements
//!   [`Take`] and owns a [`Downstream`] it gives to.
//! - **Sink** ([`Sink`]): implements [`Take`] as a terminal callback; it has no
//!   downstream and therefore no `chain`/`branch`.
//!
//! Every `take` answers with `wantsMore`. A node answering `false` is dropped
//! from its parent's downstream list, and `give` reports whether any
//! downstream is left. That boolean is the only backpressure and cancellation
//! signal a supplier sees.
//!
//! ```rust,ignore
//! supplier
//!     .chain(Transformer::map(|trx: Transaction| trx.transaction_id))
//!     .chain(Sink::new(|id| { println!("{id}"); true }))
//!     .catch(|err| { eprintln!("{err}"); false });
//! supplier.start().await?;
//! ```

use std::any::Any;

use crate::HistoryError;

mod opnum_filter;
mod sink;
mod supplier;
mod transform;

pub use opnum_filter::{Comparison, OperationNumberFilter};
pub use sink::Sink;
pub use supplier::{PullSource, PullSupplier, SupplierState};
pub use transform::{Filter, Limiter, OnError, Transformer};

/// One unit pushed through a pipeline: an item or an error.
pub type Delivery<T> = Result<T, HistoryError>;

/// Consumer side of a pipeline node.
pub trait Take<T>: Send {
    /// Accept one delivery and report whether more are wanted.
    ///
    /// Returning `Err` marks this node as failed: the caller routes the error
    /// through [`Take::abort`] and drops the node, leaving its siblings alone.
    ///
    /// # Errors
    /// Implementation-defined; see above for how the caller handles it.
    fn take(&mut self, delivery: Delivery<T>) -> Result<bool, HistoryError>;

    /// Handle this node's own failure after `take` returned `Err`.
    ///
    /// Nodes with a downstream forward the error to it; sinks hand it to their
    /// error handler.
    fn abort(&mut self, error: HistoryError);
}

// Object-safe view that can recover the concrete node type after `chain`.
trait Node<T>: Take<T> {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T, N> Node<T> for N
where
    N: Take<T> + Any,
{
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The fan-out list of a producing node.
pub struct Downstream<T> {
    nodes: Vec<Box<dyn Node<T>>>,
}

impl<T> Default for Downstream<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> std::fmt::Debug for Downstream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Downstream")
            .field("len", &self.nodes.len())
            .finish()
    }
}

impl<T> Downstream<T>
where
    T: Clone + 'static,
{
    /// Create an empty downstream list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `node` and return it for fluent construction.
    pub fn chain<N>(&mut self, node: N) -> &mut N
    where
        N: Take<T> + 'static,
    {
        self.nodes.push(Box::new(node));
        match self
            .nodes
            .last_mut()
            .and_then(|n| (**n).as_any_mut().downcast_mut::<N>())
        {
            Some(node) => node,
            None => unreachable!("the node pushed above has type N"),
        }
    }

    /// Push one delivery to every downstream node.
    ///
    /// Each node present when the call starts sees the delivery exactly once.
    /// Nodes answering `false` are removed afterwards; a node whose `take`
    /// fails is aborted with its own error and removed as well.
    ///
    /// Returns `true` iff at least one downstream node remains.
    pub fn give(&mut self, delivery: Delivery<T>) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        self.nodes.retain_mut(|node| match node.take(delivery.clone()) {
            Ok(wants_more) => wants_more,
            Err(error) => {
                node.abort(error);
                false
            }
        });
        !self.nodes.is_empty()
    }

    /// Whether anything is still listening.
    #[must_use]
    pub fn has_downstream(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Number of live downstream nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no downstream node is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Producer side of a pipeline node: suppliers and transformers.
pub trait Chainable<O>: Sized
where
    O: Clone + 'static,
{
    /// The node's downstream list.
    fn downstream(&mut self) -> &mut Downstream<O>;

    /// Append `node` downstream and return it, e.g. `a.chain(b).chain(c)`.
    fn chain<N>(&mut self, node: N) -> &mut N
    where
        N: Take<O> + 'static,
    {
        self.downstream().chain(node)
    }

    /// Run `f` with this node, typically to attach several branches.
    fn branch<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        f(self);
        self
    }
}
