//! # Ledgerflow Testing
//!
//! Testing utilities and helpers for the Ledgerflow architecture.
//!
//! This crate provides:
//! - Mock implementations of environment traits
//! - A fluent Given-When-Then harness for reducers
//! - Assertion helpers for reducer laws (purity, identity)
//!
//! ## Example
//!
//! ```ignore
//! use ledgerflow_testing::ReducerTest;
//!
//! ReducerTest::new(BalanceReducer)
//!     .given_state(AtmState::default())
//!     .when_action(AtmAction::Retry)
//!     .then_state(|state| {
//!         assert!(!state.error);
//!         assert!(!state.loading);
//!     })
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use ledgerflow_core::environment::Clock;

/// Fluent harness for reducers
pub mod reducer_test;

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ledgerflow_testing::mocks::FixedClock;
    /// use ledgerflow_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, laws};
