use std::{future::Future, marker::PhantomData, mem};

use tokio::sync::watch;

use pf_boundary::Error;

use super::{RequestState, Transition};
use crate::Result;

const CANCELLED_MESSAGE: &str = "Request was cancelled";

/// Observable [`RequestState`] of one kind of request.
///
/// Every [`run`](Self::run) discards whatever the previous request left
/// behind. Overlapping runs are not cancelled: the state ends up with the
/// outcome of the run that finished last.
#[derive(Debug)]
pub struct RequestCell<T> {
    state: watch::Sender<RequestState<T>>,
}

impl<T> RequestCell<T> {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self { state }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    fn apply(&self, event: Transition<T>) {
        self.state.send_modify(|state| {
            let current = mem::take(state);
            *state = current.transition(event);
        });
    }
}

impl<T: Clone> RequestCell<T> {
    #[must_use]
    pub fn snapshot(&self) -> RequestState<T> {
        self.state.borrow().clone()
    }

    /// Enters loading, then invokes `request` and stores its outcome.
    ///
    /// If the returned future is dropped before the request settled
    /// the state becomes a failure instead of staying in loading.
    pub async fn run<F, Fut>(&self, request: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.apply(Transition::Start);
        let pending = PendingRequest {
            cell: self,
            settled: false,
        };
        let result = request().await;
        match &result {
            Ok(_) => log::debug!("Request succeeded"),
            Err(err) => log::debug!("Request failed with status {}: {err}", err.status),
        }
        pending.settle(result.clone());
        result
    }
}

struct PendingRequest<'a, T> {
    cell: &'a RequestCell<T>,
    settled: bool,
}

impl<T> PendingRequest<'_, T> {
    fn settle(mut self, result: Result<T>) {
        self.settled = true;
        self.cell.apply(Transition::Settle(result));
    }
}

impl<T> Drop for PendingRequest<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        log::debug!("Request was dropped before it settled");
        let err = Error::new(Error::STATUS_INTERNAL, CANCELLED_MESSAGE, "");
        self.cell.apply(Transition::Settle(Err(err)));
    }
}

impl<T> Default for RequestCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps an asynchronous operation with an observable lifecycle.
///
/// Arguments are passed as a single value, use a tuple for operations
/// that take more than one.
pub struct RequestController<A, T, F> {
    operation: F,
    cell: RequestCell<T>,
    _args: PhantomData<fn(A)>,
}

impl<A, T, F> RequestController<A, T, F> {
    pub fn new(operation: F) -> Self {
        Self {
            operation,
            cell: RequestCell::new(),
            _args: PhantomData,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.cell.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.cell.is_loading()
    }
}

impl<A, T, F, Fut> RequestController<A, T, F>
where
    T: Clone,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    /// Runs the operation.
    ///
    /// The state switches to loading before the operation is invoked.
    /// Dropping the returned future settles the state with a failure.
    /// The outcome is stored and also handed back to the caller.
    pub async fn execute(&self, args: A) -> Result<T> {
        self.cell.run(|| (self.operation)(args)).await
    }

    #[must_use]
    pub fn state(&self) -> RequestState<T> {
        self.cell.snapshot()
    }
}

impl<A, T, F> std::fmt::Debug for RequestController<A, T, F>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestController")
            .field("state", &*self.cell.state.borrow())
            .finish_non_exhaustive()
    }
}
