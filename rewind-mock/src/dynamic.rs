use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rewind_core::{HistoryError, HistoryRequest, HistorySource, RawOperation};

/// Instruction for how one call should behave.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(HistoryError),
    /// Hang indefinitely (simulate a stalled node).
    Hang,
}

#[derive(Default)]
struct InternalState {
    scripted: VecDeque<MockBehavior<Vec<RawOperation>>>,
    fallback: Option<MockBehavior<Vec<RawOperation>>>,
    requests: Vec<HistoryRequest>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Queue a behavior for the next unscripted call.
    pub async fn push_behavior(&self, behavior: MockBehavior<Vec<RawOperation>>) {
        let mut guard = self.state.lock().await;
        guard.scripted.push_back(behavior);
    }

    /// Behavior used once the queue is empty. Without one, such calls return an
    /// empty page.
    pub async fn set_fallback(&self, behavior: MockBehavior<Vec<RawOperation>>) {
        let mut guard = self.state.lock().await;
        guard.fallback = Some(behavior);
    }

    /// Copy of every request received so far.
    pub async fn requests(&self) -> Vec<HistoryRequest> {
        let guard = self.state.lock().await;
        guard.requests.clone()
    }

    /// Clear queued behaviors, the fallback and the request log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.scripted.clear();
        guard.fallback = None;
        guard.requests.clear();
    }
}

/// A history source that defers all behavior to an external controller.
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn HistorySource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn HistorySource>, controller)
    }
}

#[async_trait]
impl HistorySource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_page(&self, req: &HistoryRequest) -> Result<Vec<RawOperation>, HistoryError> {
        // Take the behavior without holding the lock across the hang
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(req.clone());
            guard
                .scripted
                .pop_front()
                .or_else(|| guard.fallback.clone())
        };

        match behavior {
            Some(MockBehavior::Return(ops)) => Ok(ops),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Ok(Vec::new()),
        }
    }
}
