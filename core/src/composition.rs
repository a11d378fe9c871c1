//! Reducer composition utilities
//!
//! [`combine_reducers`] folds multiple reducers over the same state and
//! action. Each reducer only touches the state for actions it recognizes, so
//! as long as the reducers are action-disjoint the fold order cannot change
//! the result.

use crate::reducer::Reducer;

/// Combines multiple reducers that operate on the same state and action types.
///
/// The reducers are run in sequence over the same action. This is the
/// mechanism for splitting transition logic across several implementations
/// while keeping a single store.
///
/// # Examples
///
/// ```
/// use ledgerflow_core::composition::combine_reducers;
/// use ledgerflow_core::reducer::Reducer;
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     counter: i32,
///     logged: bool,
/// }
///
/// #[derive(Clone)]
/// enum AppAction {
///     Increment,
///     Log,
/// }
///
/// struct CounterReducer;
/// struct LoggingReducer;
///
/// impl Reducer for CounterReducer {
///     type State = AppState;
///     type Action = AppAction;
///
///     fn reduce(&self, state: &mut AppState, action: &AppAction) {
///         if matches!(action, AppAction::Increment) {
///             state.counter += 1;
///         }
///     }
/// }
///
/// impl Reducer for LoggingReducer {
///     type State = AppState;
///     type Action = AppAction;
///
///     fn reduce(&self, state: &mut AppState, action: &AppAction) {
///         if matches!(action, AppAction::Log) {
///             state.logged = true;
///         }
///     }
/// }
///
/// let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(LoggingReducer)]);
///
/// let mut state = AppState::default();
/// combined.reduce(&mut state, &AppAction::Increment);
/// assert_eq!(state.counter, 1);
/// ```
#[must_use]
pub fn combine_reducers<S, A>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A>>>,
) -> CombinedReducer<S, A>
where
    S: 'static,
    A: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A>
where
    S: 'static,
    A: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A>>>,
}

impl<S, A> Reducer for CombinedReducer<S, A>
where
    S: 'static,
    A: 'static,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &mut Self::State, action: &Self::Action) {
        for reducer in &self.reducers {
            reducer.reduce(state, action);
        }
    }
}
