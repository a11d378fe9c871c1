//! # Ledgerflow Runtime
//!
//! Runtime implementation for the Ledgerflow architecture.
//!
//! This crate provides the [`Store`] that owns the state and runs the
//! dispatch pipeline: an ordered middleware chain wrapped around a pure
//! reducer fold.
//!
//! ## Core Components
//!
//! - **Store**: owns the state, exposes it as a live stream, and exposes
//!   `dispatch`
//! - **StoreBuilder**: the composition root; reducers and middleware are
//!   assembled once, at build time
//! - **Dispatch pipeline**: action → middleware (outer-to-inner) → reducer
//!   fold → published snapshot
//!
//! ## Example
//!
//! ```ignore
//! let store = StoreBuilder::new(AtmState::default())
//!     .middleware(tracking)
//!     .middleware(validation)
//!     .reducer(BalanceReducer)
//!     .build();
//!
//! store.dispatch(AtmAction::Deposit { amount: "100".into() })?;
//! store.settled().await;
//! let balance = store.state(|s| s.balance).await;
//! ```
//!
//! ## Concurrency
//!
//! Every call to `dispatch` spawns an independent task, so multiple
//! dispatches can be in flight at once. The reducer fold runs while holding
//! the single write lock on the state, so concurrent dispatches serialize at
//! the reducer and no update is lost. The relative order of independent
//! dispatches is not guaranteed.

use ledgerflow_core::composition::{CombinedReducer, combine_reducers};
use ledgerflow_core::middleware::{Dispatch, Middleware};
use ledgerflow_core::reducer::Reducer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Failures inside the pipeline itself are represented as state, not as
    /// errors; these variants only cover the store lifecycle.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for in-flight dispatches to finish
        #[error("Shutdown timed out with {0} dispatches still in flight")]
        ShutdownTimeout(usize),

        /// Timeout waiting for in-flight dispatches to settle
        #[error("Timed out waiting for dispatches to settle")]
        Timeout,
    }
}

pub use error::StoreError;

/// Guard that decrements the in-flight counter on drop
///
/// Ensures the counter is always decremented, even if a pipeline task
/// panics, and wakes `settled()` waiters when it reaches zero.
struct InFlightGuard {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

struct StoreInner<S: 'static, A: 'static> {
    state: RwLock<S>,
    reducer: CombinedReducer<S, A>,
    middleware: Vec<Arc<dyn Middleware<State = S, Action = A>>>,
    /// Snapshot published once per action that reaches the reducer.
    published: watch::Sender<S>,
    in_flight: Arc<AtomicUsize>,
    settled_tx: watch::Sender<()>,
    shutdown: AtomicBool,
}

impl<S, A> StoreInner<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Enqueue one run of the pipeline for `action`.
    ///
    /// Increments the in-flight counter before spawning so `settled()`
    /// never observes a false zero between a parent dispatch finishing and
    /// a re-entrant dispatch starting.
    fn dispatch(self: &Arc<Self>, action: A) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!("store.actions.rejected").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions.dispatched").increment(1);
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = InFlightGuard {
                counter: Arc::clone(&inner.in_flight),
                notifier: inner.settled_tx.clone(),
            };
            Arc::clone(&inner).run_pipeline(action).await;
        });

        Ok(())
    }

    /// Run the composed chain for one action.
    ///
    /// Middleware is applied in configuration order; each handler gets an
    /// owned state snapshot and a dispatch handle that re-enters the whole
    /// pipeline. If every handler forwards, the reducer fold runs under the
    /// write lock and the new state is published exactly once.
    async fn run_pipeline(self: Arc<Self>, action: A) {
        let dispatch = {
            let inner = Arc::clone(&self);
            Dispatch::new(move |action| {
                if let Err(error) = inner.dispatch(action) {
                    tracing::debug!(error = %error, "Re-entrant dispatch rejected");
                }
            })
        };

        let mut current = action;
        for middleware in &self.middleware {
            let snapshot = self.state.read().await.clone();
            match middleware.handle(current, snapshot, &dispatch).await {
                Some(next) => current = next,
                None => {
                    tracing::trace!(middleware = middleware.name(), "Action swallowed");
                    metrics::counter!(
                        "store.actions.swallowed",
                        "middleware" => middleware.name()
                    )
                    .increment(1);
                    return;
                }
            }
        }

        let snapshot = {
            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            self.reducer.reduce(&mut state, &current);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            state.clone()
        };

        self.published.send_replace(snapshot);
        tracing::trace!("Published new state snapshot");
    }
}

/// The Store - owner of the state and the single dispatch entry point
///
/// The Store manages:
/// 1. State (behind `RwLock`, replaced only by the reducer fold)
/// 2. The middleware chain (side effects, fixed at build time)
/// 3. The reducer fold (pure state transitions)
/// 4. A live state stream for observers
///
/// Cloning a Store is cheap and yields a handle to the same container;
/// there is exactly one state per store, however many handles exist.
pub struct Store<S: 'static, A: 'static> {
    inner: Arc<StoreInner<S, A>>,
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Start building a store around `initial_state`
    #[must_use]
    pub fn builder(initial_state: S) -> StoreBuilder<S, A> {
        StoreBuilder::new(initial_state)
    }

    /// Send an action into the pipeline, fire-and-forget
    ///
    /// The composed chain runs on a spawned task; this call only checks the
    /// shutdown flag, registers the dispatch as in flight, and returns.
    /// Use [`Store::settled`] or [`Store::observe`] to find out what
    /// happened.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since the pipeline runs on
    /// a spawned task.
    #[tracing::instrument(skip(self, action), name = "store_dispatch")]
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        self.inner.dispatch(action)
    }

    /// Observe the state as a live stream
    ///
    /// The receiver starts at the current snapshot and is updated exactly
    /// once per action that reaches the reducer. Swallowed actions publish
    /// nothing.
    #[must_use]
    pub fn observe(&self) -> watch::Receiver<S> {
        self.inner.published.subscribe()
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure so the read lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let balance = store.state(|s| s.balance).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Number of dispatches currently in flight
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until no dispatches are in flight
    ///
    /// Re-entrant dispatches are counted before their parent finishes, so
    /// this also waits for cascades started by middleware.
    pub async fn settled(&self) {
        let mut rx = self.inner.settled_tx.subscribe();
        while self.inner.in_flight.load(Ordering::SeqCst) > 0 {
            let _ = rx.changed().await;
        }
    }

    /// Wait until no dispatches are in flight, with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn settle_timeout(&self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.settled())
            .await
            .map_err(|_| StoreError::Timeout)
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag so new dispatches are rejected, then waits
    /// for in-flight work to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires with
    /// dispatches still in flight.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.inner.shutdown.store(true, Ordering::Release);

        match self.settle_timeout(timeout).await {
            Ok(()) => {
                tracing::info!("All dispatches settled, shutdown successful");
                metrics::counter!("store.shutdown.completed").increment(1);
                Ok(())
            }
            Err(_) => {
                let pending = self.in_flight();
                tracing::error!(
                    in_flight = pending,
                    "Shutdown timeout: {pending} dispatches still in flight"
                );
                metrics::counter!("store.shutdown.timeout").increment(1);
                Err(StoreError::ShutdownTimeout(pending))
            }
        }
    }
}

impl<S: 'static, A: 'static> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: 'static, A: 'static> std::fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("in_flight", &self.inner.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Builder for [`Store`] - the composition root
///
/// Reducers and middleware are registered here and fixed for the lifetime
/// of the store; there is no run-time swapping. Middleware order matters:
/// the first handler registered is the outermost and sees every action
/// first. Reducer order must not matter, which combined reducers guarantee
/// as long as they are action-disjoint.
pub struct StoreBuilder<S, A> {
    initial_state: S,
    reducers: Vec<Box<dyn Reducer<State = S, Action = A>>>,
    middleware: Vec<Arc<dyn Middleware<State = S, Action = A>>>,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Create a builder with the store's initial state
    #[must_use]
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            reducers: Vec::new(),
            middleware: Vec::new(),
        }
    }

    /// Register a reducer
    ///
    /// Registered reducers are folded left-to-right over each action that
    /// reaches the reducer stage.
    #[must_use]
    pub fn reducer(mut self, reducer: impl Reducer<State = S, Action = A> + 'static) -> Self {
        self.reducers.push(Box::new(reducer));
        self
    }

    /// Register a middleware handler
    ///
    /// Handlers run in registration order, outermost first.
    #[must_use]
    pub fn middleware(
        mut self,
        middleware: impl Middleware<State = S, Action = A> + 'static,
    ) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Assemble the store
    #[must_use]
    pub fn build(self) -> Store<S, A> {
        let (published, _) = watch::channel(self.initial_state.clone());
        let (settled_tx, _) = watch::channel(());

        Store {
            inner: Arc::new(StoreInner {
                state: RwLock::new(self.initial_state),
                reducer: combine_reducers(self.reducers),
                middleware: self.middleware,
                published,
                in_flight: Arc::new(AtomicUsize::new(0)),
                settled_tx,
                shutdown: AtomicBool::new(false),
            }),
        }
    }
}
