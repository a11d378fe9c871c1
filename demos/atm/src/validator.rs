//! Amount validation with simulated latency.
//!
//! The validator stands in for a remote check: it suspends for a bounded
//! simulated latency and then either returns the parsed amount or rejects
//! the request. Rejection is always explicit; blank or non-numeric input is
//! never silently coerced to zero.

use futures::future::BoxFuture;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;

/// Default simulated latency for validators
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Why a submitted amount was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The submitted amount was blank
    #[error("amount is empty")]
    Empty,

    /// The submitted amount is not a non-negative integer literal
    #[error("amount {0:?} is not a non-negative integer")]
    NotANumber(String),

    /// The (simulated) remote check rejected the request
    #[error("validation service rejected the request")]
    Rejected,
}

/// Asynchronous amount validation
///
/// `validate` returns a future so the effect chain can suspend without
/// blocking other dispatches. A validator always eventually resolves; there
/// is no cancellation.
pub trait Validator: Send + Sync {
    /// Validate a raw amount string into a non-negative integer amount
    fn validate(&self, raw: &str) -> BoxFuture<'static, Result<u64, ValidationError>>;
}

/// Parse a trimmed amount string as a non-negative integer literal
fn parse_amount(raw: &str) -> Result<u64, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Empty);
    }
    raw.parse::<u64>()
        .map_err(|_| ValidationError::NotANumber(raw.to_owned()))
}

/// Deterministic validator: sleeps for a fixed latency, then parses
#[derive(Debug, Clone)]
pub struct LatencyValidator {
    latency: Duration,
}

impl LatencyValidator {
    /// Creates a validator with the given simulated latency
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for LatencyValidator {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl Validator for LatencyValidator {
    fn validate(&self, raw: &str) -> BoxFuture<'static, Result<u64, ValidationError>> {
        let raw = raw.trim().to_owned();
        let latency = self.latency;
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            parse_amount(&raw)
        })
    }
}

/// Unreliable validator: passes or fails at random, independent of input
///
/// Models a flaky remote check. On a pass the amount is still parsed, so
/// malformed input fails either way.
#[derive(Debug, Clone)]
pub struct FlakyValidator {
    latency: Duration,
    success_rate: f64,
}

impl FlakyValidator {
    /// Creates a flaky validator
    ///
    /// `success_rate` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(latency: Duration, success_rate: f64) -> Self {
        Self {
            latency,
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }
}

impl Validator for FlakyValidator {
    fn validate(&self, raw: &str) -> BoxFuture<'static, Result<u64, ValidationError>> {
        let raw = raw.trim().to_owned();
        let latency = self.latency;
        let success_rate = self.success_rate;
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            if rand::thread_rng().gen_bool(success_rate) {
                parse_amount(&raw)
            } else {
                Err(ValidationError::Rejected)
            }
        })
    }
}
