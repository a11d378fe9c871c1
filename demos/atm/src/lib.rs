//! # ATM Example
//!
//! An account-balance demo built on the Ledgerflow architecture.
//!
//! This example showcases:
//! - A pure reducer over a closed action set
//! - A middleware chain with an async validator that re-enters the
//!   pipeline (`Deposit` → `Validating` → validated outcome or failure)
//! - Telemetry and navigation collaborators behind trait boundaries
//! - The idle / loading / error cycle driven entirely by actions
//!
//! ## Example
//!
//! ```no_run
//! use atm::{AtmAction, atm_store};
//! use atm::validator::LatencyValidator;
//!
//! # async fn example() {
//! let store = atm_store(LatencyValidator::default());
//!
//! let _ = store.dispatch(AtmAction::Deposit { amount: "100".into() });
//! store.settled().await;
//!
//! let balance = store.state(|s| s.balance).await;
//! assert_eq!(balance, 100);
//! # }
//! ```

use ledgerflow_core::environment::{Clock, SystemClock};
use ledgerflow_runtime::{Store, StoreBuilder};
use std::sync::Arc;

/// Side-effect handlers: validation, tracking, navigation
pub mod middleware;
/// The balance reducer
pub mod reducer;
/// Domain types: state, actions, transactions, screens
pub mod types;
/// Async amount validation
pub mod validator;

pub use middleware::{
    NavigationMiddleware, Navigator, Telemetry, TracingNavigator, TracingTelemetry,
    TrackingMiddleware, ValidationMiddleware,
};
pub use reducer::BalanceReducer;
pub use types::{AtmAction, AtmState, Screen, Transaction, TransactionId, TransactionKind};
pub use validator::{FlakyValidator, LatencyValidator, ValidationError, Validator};

/// The store type for the ATM demo
pub type AtmStore = Store<AtmState, AtmAction>;

/// Build the standard ATM store: tracking, then validation, then navigation
///
/// Tracking is outermost so it sees raw requests before validation swallows
/// them. Uses the system clock and the tracing-backed collaborators.
#[must_use]
pub fn atm_store<V>(validator: V) -> AtmStore
where
    V: Validator + 'static,
{
    atm_store_with(
        validator,
        TracingTelemetry,
        TracingNavigator,
        Arc::new(SystemClock),
    )
}

/// Build an ATM store with explicit collaborators
///
/// The composition root: reducers and middleware are fixed here and cannot
/// be swapped afterwards.
#[must_use]
pub fn atm_store_with<V, T, N>(
    validator: V,
    telemetry: T,
    navigator: N,
    clock: Arc<dyn Clock>,
) -> AtmStore
where
    V: Validator + 'static,
    T: Telemetry + 'static,
    N: Navigator + 'static,
{
    StoreBuilder::new(AtmState::default())
        .middleware(TrackingMiddleware::new(telemetry))
        .middleware(ValidationMiddleware::new(validator, clock))
        .middleware(NavigationMiddleware::new(navigator))
        .reducer(BalanceReducer::new())
        .build()
}
