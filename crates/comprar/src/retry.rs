//! Bounded retry for eventually-observable conditions.
//!
//! Some UI outcomes are not a single readable state but a fleeting one: a
//! toast that fades, a counter that updates a beat after the click. The
//! retrier runs a full side-effecting probe a fixed number of times, which
//! is heavier than a [`crate::wait::Waiter`] poll and therefore opted into
//! explicitly per call site, never applied by default.

use std::time::Duration;

use tracing::debug;

use crate::result::{ComprarError, ComprarResult};
use crate::wait::DEFAULT_WAIT_TIMEOUT_MS;

/// Default number of observation attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts (500ms)
pub const DEFAULT_INTER_ATTEMPT_DELAY_MS: u64 = 500;

/// Policy for a bounded observation retry.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of attempts; at least 1
    pub max_attempts: u32,
    /// Wait budget each attempt's probes may spend, in milliseconds
    pub per_attempt_timeout_ms: u64,
    /// Pause between attempts, in milliseconds
    pub inter_attempt_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            per_attempt_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            inter_attempt_delay_ms: DEFAULT_INTER_ATTEMPT_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of attempts; values below 1 clamp to 1
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = if attempts == 0 { 1 } else { attempts };
        self
    }

    /// Set the per-attempt wait budget in milliseconds
    #[must_use]
    pub const fn with_per_attempt_timeout(mut self, ms: u64) -> Self {
        self.per_attempt_timeout_ms = ms;
        self
    }

    /// Set the delay between attempts in milliseconds
    #[must_use]
    pub const fn with_inter_attempt_delay(mut self, ms: u64) -> Self {
        self.inter_attempt_delay_ms = ms;
        self
    }
}

/// Run `action` up to `policy.max_attempts` times until it yields a value.
///
/// The action receives the 1-based attempt number. Between attempts (never
/// after the last) the retrier sleeps the inter-attempt delay.
///
/// # Errors
///
/// Returns [`ComprarError::RetriesExhausted`] after exactly
/// `policy.max_attempts` fruitless invocations.
pub fn observe_until<T, F>(policy: &RetryPolicy, mut action: F) -> ComprarResult<T>
where
    F: FnMut(u32) -> Option<T>,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        debug!(attempt, max = attempts, "observation attempt");
        if let Some(value) = action(attempt) {
            return Ok(value);
        }
        if attempt < attempts {
            std::thread::sleep(Duration::from_millis(policy.inter_attempt_delay_ms));
        }
    }
    Err(ComprarError::RetriesExhausted { attempts })
}
