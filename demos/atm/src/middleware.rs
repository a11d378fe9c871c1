//! Side-effect handlers for the ATM demo.
//!
//! Three handlers wrap the balance reducer, outermost first:
//!
//! 1. [`TrackingMiddleware`] observes raw user actions for telemetry and
//!    always forwards.
//! 2. [`ValidationMiddleware`] intercepts deposit/withdrawal requests,
//!    drives the `Validating` → validated/failed cycle, and swallows the
//!    raw request.
//! 3. [`NavigationMiddleware`] asks the navigator for a screen change when
//!    a transaction is opened for editing.

use crate::types::{AtmAction, AtmState, Screen, TransactionId};
use crate::validator::Validator;
use ledgerflow_core::BoxFuture;
use ledgerflow_core::environment::Clock;
use ledgerflow_core::middleware::{Dispatch, Middleware};
use std::sync::Arc;

/// Read-only sink for raw user actions
///
/// Receives the action plus the state snapshot it arrived with. By contract
/// a telemetry sink must not feed back into the dispatch chain.
pub trait Telemetry: Send + Sync {
    /// Record one user action
    fn record(&self, action: &AtmAction, state: &AtmState);
}

/// Telemetry sink that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn record(&self, action: &AtmAction, state: &AtmState) {
        tracing::info!(?action, balance = state.balance, "User action");
    }
}

/// Navigation collaborator
///
/// Owns all routing and rendering; the store only requests transitions.
pub trait Navigator: Send + Sync {
    /// Request that the given screen be shown
    fn go_to(&self, screen: Screen);
}

/// Navigator that logs requested transitions through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn go_to(&self, screen: Screen) {
        tracing::info!(%screen, "Navigation requested");
    }
}

/// Middleware that validates deposit and withdrawal requests
///
/// Intercepts `Deposit`/`Withdraw`, dispatches `Validating`, awaits the
/// validator, then dispatches the validated outcome or `ValidationFailed`.
/// The raw request never reaches the reducer. The transaction identity and
/// timestamp are stamped here so the reducer stays pure.
pub struct ValidationMiddleware<V> {
    validator: V,
    clock: Arc<dyn Clock>,
}

impl<V> ValidationMiddleware<V> {
    /// Creates a validation middleware
    pub fn new(validator: V, clock: Arc<dyn Clock>) -> Self {
        Self { validator, clock }
    }
}

enum RequestKind {
    Deposit,
    Withdrawal,
}

impl<V> Middleware for ValidationMiddleware<V>
where
    V: Validator,
{
    type State = AtmState;
    type Action = AtmAction;

    fn name(&self) -> &'static str {
        "validation"
    }

    fn handle(
        &self,
        action: AtmAction,
        _state: AtmState,
        dispatch: &Dispatch<AtmAction>,
    ) -> BoxFuture<'static, Option<AtmAction>> {
        let (kind, amount) = match action {
            AtmAction::Deposit { amount } => (RequestKind::Deposit, amount),
            AtmAction::Withdraw { amount } => (RequestKind::Withdrawal, amount),
            other => return Box::pin(futures::future::ready(Some(other))),
        };

        let outcome = self.validator.validate(&amount);
        let dispatch = dispatch.clone();
        let clock = Arc::clone(&self.clock);

        Box::pin(async move {
            // Each send becomes its own pipeline task and cross-task order
            // is not guaranteed; the validator latency keeps the outcome
            // reduction from overtaking the Validating one.
            dispatch.send(AtmAction::Validating);

            match outcome.await {
                Ok(amount) => {
                    let id = TransactionId::new();
                    let at = clock.now();
                    dispatch.send(match kind {
                        RequestKind::Deposit => AtmAction::DepositValidated { id, amount, at },
                        RequestKind::Withdrawal => {
                            AtmAction::WithdrawalValidated { id, amount, at }
                        }
                    });
                }
                Err(error) => {
                    tracing::warn!(%error, "Validation failed");
                    dispatch.send(AtmAction::ValidationFailed);
                }
            }

            None
        })
    }
}

/// Middleware that forwards raw user actions to a telemetry sink
///
/// Purely observational: it records and forwards, and never dispatches.
pub struct TrackingMiddleware<T> {
    telemetry: T,
}

impl<T> TrackingMiddleware<T> {
    /// Creates a tracking middleware
    pub const fn new(telemetry: T) -> Self {
        Self { telemetry }
    }
}

impl<T> Middleware for TrackingMiddleware<T>
where
    T: Telemetry,
{
    type State = AtmState;
    type Action = AtmAction;

    fn name(&self) -> &'static str {
        "tracking"
    }

    fn handle(
        &self,
        action: AtmAction,
        state: AtmState,
        _dispatch: &Dispatch<AtmAction>,
    ) -> BoxFuture<'static, Option<AtmAction>> {
        if action.is_user_action() {
            self.telemetry.record(&action, &state);
        }
        Box::pin(futures::future::ready(Some(action)))
    }
}

/// Middleware that requests screen transitions
///
/// Reacts to `EditTransaction` by asking the navigator for the transaction
/// screen; the action is forwarded and ignored by the reducer.
pub struct NavigationMiddleware<N> {
    navigator: N,
}

impl<N> NavigationMiddleware<N> {
    /// Creates a navigation middleware
    pub const fn new(navigator: N) -> Self {
        Self { navigator }
    }
}

impl<N> Middleware for NavigationMiddleware<N>
where
    N: Navigator,
{
    type State = AtmState;
    type Action = AtmAction;

    fn name(&self) -> &'static str {
        "navigation"
    }

    fn handle(
        &self,
        action: AtmAction,
        _state: AtmState,
        _dispatch: &Dispatch<AtmAction>,
    ) -> BoxFuture<'static, Option<AtmAction>> {
        if let AtmAction::EditTransaction { id } = &action {
            tracing::debug!(%id, "Edit requested");
            self.navigator.go_to(Screen::Transaction);
        }
        Box::pin(futures::future::ready(Some(action)))
    }
}
