//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable
//! Given-When-Then syntax, plus checks for the laws every reducer must
//! satisfy (purity, identity for unrecognized actions).

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use ledgerflow_core::reducer::Reducer;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use ledgerflow_testing::ReducerTest;
///
/// ReducerTest::new(CounterReducer)
///     .given_state(CounterState { count: 0 })
///     .when_action(CounterAction::Increment)
///     .then_state(|state| {
///         assert_eq!(state.count, 1);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A>
where
    R: Reducer<State = S, Action = A>,
{
    reducer: R,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
}

impl<R, S, A> ReducerTest<R, S, A>
where
    R: Reducer<State = S, Action = A>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
        }
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add an action to apply (When); may be called repeatedly
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the initial state is not set, or if any assertion fails.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        for action in &self.actions {
            self.reducer.reduce(&mut state, action);
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }
    }
}

/// Checks for the laws every reducer must satisfy
pub mod laws {
    use ledgerflow_core::reducer::Reducer;

    /// Assert that reducing the same `(state, action)` pair twice yields
    /// identical results
    ///
    /// This is the purity law: a reducer may not consult clocks, counters,
    /// or randomness.
    ///
    /// # Panics
    ///
    /// Panics if the two applications diverge.
    pub fn assert_pure<R, S, A>(reducer: &R, state: &S, action: &A)
    where
        R: Reducer<State = S, Action = A>,
        S: Clone + PartialEq + std::fmt::Debug,
    {
        let mut first = state.clone();
        let mut second = state.clone();

        reducer.reduce(&mut first, action);
        reducer.reduce(&mut second, action);

        assert_eq!(
            first, second,
            "reducer produced different states for the same (state, action) pair"
        );
    }

    /// Assert that an action the reducer does not recognize leaves the
    /// state untouched
    ///
    /// # Panics
    ///
    /// Panics if the state changed.
    pub fn assert_identity<R, S, A>(reducer: &R, state: &S, action: &A)
    where
        R: Reducer<State = S, Action = A>,
        S: Clone + PartialEq + std::fmt::Debug,
    {
        let mut reduced = state.clone();
        reducer.reduce(&mut reduced, action);

        assert_eq!(
            &reduced, state,
            "reducer was expected to treat this action as identity"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        Ignored,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;

        fn reduce(&self, state: &mut Self::State, action: &Self::Action) {
            match action {
                TestAction::Increment => state.count += 1,
                TestAction::Decrement => state.count -= 1,
                TestAction::Ignored => {}
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_action_sequence() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Increment)
            .when_action(TestAction::Decrement)
            .when_action(TestAction::Decrement)
            .then_state(|state| {
                assert_eq!(state.count, 4);
            })
            .run();
    }

    #[test]
    fn test_laws_pure() {
        laws::assert_pure(&TestReducer, &TestState { count: 3 }, &TestAction::Increment);
    }

    #[test]
    fn test_laws_identity() {
        laws::assert_identity(&TestReducer, &TestState { count: 3 }, &TestAction::Ignored);
    }
}
