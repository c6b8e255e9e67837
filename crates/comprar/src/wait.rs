//! Condition waits.
//!
//! Every interaction with an asynchronously-updating UI goes through a
//! bounded, polling wait: evaluate a predicate against the live driver,
//! pause, repeat until the predicate holds or the deadline passes. Fixed
//! sleeps are never the synchronization mechanism.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::driver::Driver;
use crate::locator::{locate, Locator};
use crate::result::{ComprarError, ComprarResult};

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Options for wait operations.
///
/// One shared value per session; callers deviate through the builders
/// rather than inventing ad-hoc timeouts.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Cancellable pause shared between a wait loop and its canceller.
///
/// The pause between polls parks on a condvar with a deadline instead of
/// sleeping unconditionally, so another thread can cut a wait short
/// without waiting out the poll interval.
#[derive(Debug, Clone, Default)]
pub struct WaitSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl WaitSignal {
    /// Create a new, uncancelled signal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every wait parked on this signal, now and in the future
    pub fn cancel(&self) {
        let (flag, condvar) = &*self.inner;
        *flag.lock().unwrap() = true;
        condvar.notify_all();
    }

    /// Whether the signal has been cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap()
    }

    /// Pause for up to `duration`.
    ///
    /// Returns `true` if the full pause elapsed, `false` if the signal was
    /// cancelled before or during the pause.
    #[must_use]
    pub fn pause(&self, duration: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let deadline = Instant::now() + duration;
        let mut cancelled = flag.lock().unwrap();
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            let (guard, timeout) = condvar.wait_timeout(cancelled, deadline - now).unwrap();
            cancelled = guard;
            if timeout.timed_out() {
                return !*cancelled;
            }
        }
        false
    }
}

/// Polling condition waiter.
///
/// Stateless apart from its cancellation signal; all timing comes from the
/// [`WaitOptions`] passed per call.
#[derive(Debug, Clone, Default)]
pub struct Waiter {
    signal: WaitSignal,
}

impl Waiter {
    /// Create a new waiter with its own signal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a waiter parked on an existing signal
    #[must_use]
    pub fn with_signal(signal: WaitSignal) -> Self {
        Self { signal }
    }

    /// Get a handle to this waiter's cancellation signal
    #[must_use]
    pub fn signal(&self) -> WaitSignal {
        self.signal.clone()
    }

    /// Poll `predicate` against the driver until it returns `Ok(true)`.
    ///
    /// A predicate `Err` counts as "not yet true"; the transient failure
    /// modes of a settling UI (missing element, stale handle) are exactly
    /// what the poll loop exists to ride out. The predicate is evaluated
    /// at least once even with a zero timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::Timeout`] if the deadline passes or the
    /// signal is cancelled before the predicate holds.
    pub fn until<D, F>(
        &self,
        driver: &mut D,
        mut predicate: F,
        options: &WaitOptions,
    ) -> ComprarResult<()>
    where
        D: Driver,
        F: FnMut(&mut D) -> ComprarResult<bool>,
    {
        let start = Instant::now();
        loop {
            match predicate(driver) {
                Ok(true) => {
                    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "condition satisfied");
                    return Ok(());
                }
                Ok(false) => {}
                Err(error) => {
                    trace!(%error, "condition probe not ready");
                }
            }
            if start.elapsed() >= options.timeout() || !self.signal.pause(options.poll_interval())
            {
                return Err(ComprarError::Timeout {
                    ms: options.timeout_ms,
                });
            }
        }
    }
}

/// Predicate: at least one element matches the locator
pub fn until_present<D: Driver>(
    locator: &Locator,
) -> impl FnMut(&mut D) -> ComprarResult<bool> + '_ {
    move |driver| Ok(!driver.find_elements(locator)?.is_empty())
}

/// Predicate: the locator resolves to a displayed element
pub fn until_visible<D: Driver>(
    locator: &Locator,
) -> impl FnMut(&mut D) -> ComprarResult<bool> + '_ {
    move |driver| {
        let handle = locate(driver, locator)?;
        driver.is_displayed(&handle)
    }
}

/// Predicate: the current URL contains a fragment
pub fn until_url_contains<D: Driver>(
    fragment: &str,
) -> impl FnMut(&mut D) -> ComprarResult<bool> + '_ {
    move |driver| Ok(driver.current_url()?.contains(fragment))
}

/// Predicate: a script evaluates to a truthy value
pub fn until_script_truthy<D: Driver>(
    script: &str,
) -> impl FnMut(&mut D) -> ComprarResult<bool> + '_ {
    move |driver| Ok(truthy(&driver.execute_script(script, &[])?))
}

/// JavaScript truthiness of a script result
#[must_use]
pub fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
