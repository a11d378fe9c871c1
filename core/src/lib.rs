//! # Ledgerflow Core
//!
//! Core traits and types for the Ledgerflow architecture.
//!
//! This crate provides the fundamental abstractions for building applications
//! around a single state container updated through pure reducers, with all
//! side effects expressed as an explicit middleware chain.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature, owned exclusively by the store
//! - **Action**: An immutable fact describing an intent or an outcome
//! - **Reducer**: Pure function `(&mut State, &Action)` with no I/O
//! - **Middleware**: Asynchronous handler wrapping the reducer, able to
//!   observe, swallow, or re-emit actions before reduction
//! - **Dispatch**: A callback handle that re-enters the full pipeline
//!
//! ## Architecture Principles
//!
//! - Unidirectional data flow
//! - Pure reducers, explicit effects (no hidden I/O)
//! - Statically configured composition: reducers and middleware are fixed
//!   when the store is built
//!
//! ## Example
//!
//! ```
//! use ledgerflow_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!
//!     fn reduce(&self, state: &mut CounterState, action: &CounterAction) {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!             CounterAction::Decrement => state.count -= 1,
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use futures::future::BoxFuture;
pub use serde::{Deserialize, Serialize};

/// Reducer composition utilities
pub mod composition;

/// Reducer module - the core trait for state transitions
///
/// Reducers are pure functions over `(&mut State, &Action)`. They contain
/// all state transition logic and are deterministic and testable.
pub mod reducer {
    /// The Reducer trait - core abstraction for state transitions
    ///
    /// A reducer must be:
    ///
    /// - **Pure**: no I/O, no clocks, no randomness. Everything the new
    ///   state needs must arrive in the action.
    /// - **Total**: it returns normally for every action in the closed set
    ///   and never panics.
    /// - **Identity by default**: actions it does not recognize leave the
    ///   state untouched.
    ///
    /// Reducers composed with [`crate::composition::combine_reducers`] are
    /// folded left-to-right over the same action, so they must be
    /// action-disjoint for composition order not to matter.
    pub trait Reducer: Send + Sync {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// Apply an action to the state
        ///
        /// Mutation through `state` is the only observable outcome; effects
        /// belong in middleware, not here.
        fn reduce(&self, state: &mut Self::State, action: &Self::Action);
    }
}

/// Middleware module - asynchronous side-effect handlers
///
/// Middleware wraps the reducer. Each handler sees an action before the
/// reducer does and decides whether to forward it, swallow it, or emit new
/// actions through the [`middleware::Dispatch`] handle.
pub mod middleware {
    use futures::future::BoxFuture;
    use std::sync::Arc;

    /// A callback handle into the store's dispatch pipeline.
    ///
    /// Middleware receives a `Dispatch` on every invocation. Calling
    /// [`Dispatch::send`] re-enters the complete pipeline from the top as an
    /// independent unit of work, before the current handler resolves.
    ///
    /// The handle is cheap to clone and safe to move into spawned futures.
    pub struct Dispatch<A> {
        inner: Arc<dyn Fn(A) + Send + Sync>,
    }

    impl<A> Dispatch<A> {
        /// Wrap a dispatch callback
        ///
        /// Built by the store at pipeline-assembly time; applications never
        /// construct one directly outside of tests.
        pub fn new(f: impl Fn(A) + Send + Sync + 'static) -> Self {
            Self { inner: Arc::new(f) }
        }

        /// Feed an action into the pipeline, fire-and-forget
        pub fn send(&self, action: A) {
            (self.inner)(action);
        }
    }

    impl<A> Clone for Dispatch<A> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<A> std::fmt::Debug for Dispatch<A> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Dispatch").finish_non_exhaustive()
        }
    }

    /// The Middleware trait - an asynchronous handler in the effect chain
    ///
    /// Handlers are configured as an ordered list when the store is built
    /// and applied outer-to-inner: the first handler sees the action first.
    ///
    /// A handler may:
    ///
    /// - return `Some(action)` to forward the (possibly same) action to the
    ///   next handler and ultimately the reducer,
    /// - return `None` to swallow the action,
    /// - call [`Dispatch::send`] zero or more times to emit new actions,
    ///   each of which passes through the whole chain independently.
    ///
    /// `state` is an owned snapshot taken when the handler is invoked; it is
    /// read-only in the sense that mutating it has no effect on the store.
    pub trait Middleware: Send + Sync {
        /// The state type snapshotted for this handler
        type State;

        /// The action type flowing through the chain
        type Action;

        /// A short name used in logs and metrics labels
        fn name(&self) -> &'static str;

        /// Handle one action
        fn handle(
            &self,
            action: Self::Action,
            state: Self::State,
            dispatch: &Dispatch<Self::Action>,
        ) -> BoxFuture<'static, Option<Self::Action>>;
    }
}

/// Environment module - dependency traits shared across crates
///
/// External collaborators are abstracted behind traits so reducers stay
/// pure and middleware stays testable.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time for testability
    ///
    /// Production code injects [`SystemClock`]; tests inject a fixed clock
    /// from the testing crate.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock backed by [`Utc::now`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
