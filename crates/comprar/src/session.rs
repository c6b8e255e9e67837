//! Per-test session owning one driver.
//!
//! A [`Session`] scopes a driver, the shared wait settings and the context
//! switcher to a single test. Teardown happens on every exit path: `Drop`
//! releases the driver even when an assertion already failed.

use tracing::{debug, warn};

use crate::config::HarnessConfig;
use crate::context::{BrowsingContext, ContextSwitcher};
use crate::dialog;
use crate::driver::{Driver, WindowHandle};
use crate::interact::Interactor;
use crate::locator::Locator;
use crate::result::{ComprarError, ComprarResult};
use crate::retry;
use crate::wait::Waiter;

/// One test's harness state: a driver plus the synchronization layers
/// around it.
#[derive(Debug)]
pub struct Session<D: Driver> {
    driver: D,
    config: HarnessConfig,
    interactor: Interactor,
    switcher: ContextSwitcher,
    waiter: Waiter,
    closed: bool,
}

impl<D: Driver> Session<D> {
    /// Create a session around a driver.
    ///
    /// All components share one cancellation signal and the config's wait
    /// settings.
    #[must_use]
    pub fn new(driver: D, config: HarnessConfig) -> Self {
        let waiter = Waiter::new();
        let interactor = Interactor::with_options(waiter.clone(), config.wait.clone());
        let switcher = ContextSwitcher::with_options(waiter.clone(), config.wait.clone());
        Self {
            driver,
            config,
            interactor,
            switcher,
            waiter,
            closed: false,
        }
    }

    /// The session's configuration
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Direct access to the driver, for probes the structured API lacks
    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The current browsing context
    #[must_use]
    pub const fn context(&self) -> &BrowsingContext {
        self.switcher.current()
    }

    /// Navigate to a path under the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::Navigation`] wrapping the driver failure.
    pub fn goto(&mut self, path: &str) -> ComprarResult<()> {
        let url = self.config.url_for(path);
        debug!(%url, "goto");
        self.driver
            .navigate(&url)
            .map_err(|e| ComprarError::Navigation {
                url,
                message: e.to_string(),
            })
    }

    /// The current window's URL
    pub fn current_url(&mut self) -> ComprarResult<String> {
        self.driver.current_url()
    }

    /// Click the element, waiting for visibility first
    pub fn click(&mut self, locator: &Locator) -> ComprarResult<()> {
        self.interactor.click(&mut self.driver, locator)
    }

    /// Click the nth matching element (0-based)
    pub fn click_nth(&mut self, locator: &Locator, index: usize) -> ComprarResult<()> {
        self.interactor.click_nth(&mut self.driver, locator, index)
    }

    /// Clear the element and type into it, waiting for visibility first
    pub fn type_text(&mut self, locator: &Locator, text: &str) -> ComprarResult<()> {
        self.interactor.type_text(&mut self.driver, locator, text)
    }

    /// Clear and type into the nth matching element (0-based)
    pub fn type_text_nth(
        &mut self,
        locator: &Locator,
        index: usize,
        text: &str,
    ) -> ComprarResult<()> {
        self.interactor
            .type_text_nth(&mut self.driver, locator, index, text)
    }

    /// Read the element's text; `""` on any failure
    pub fn read_text(&mut self, locator: &Locator) -> String {
        self.interactor.read_text(&mut self.driver, locator)
    }

    /// Read the nth matching element's text; `""` on any failure
    pub fn read_text_nth(&mut self, locator: &Locator, index: usize) -> String {
        self.interactor.read_text_nth(&mut self.driver, locator, index)
    }

    /// Whether the element is present and displayed; `false` on any failure
    pub fn is_visible(&mut self, locator: &Locator) -> bool {
        self.interactor.is_visible(&mut self.driver, locator)
    }

    /// Number of elements matching the locator right now
    pub fn count(&mut self, locator: &Locator) -> usize {
        self.interactor.count(&mut self.driver, locator)
    }

    /// Poll a predicate against the driver under the session wait settings
    pub fn wait_until<F>(&mut self, predicate: F) -> ComprarResult<()>
    where
        F: FnMut(&mut D) -> ComprarResult<bool>,
    {
        self.waiter
            .until(&mut self.driver, predicate, &self.config.wait)
    }

    /// Enter a frame by its frame element's locator
    pub fn enter_frame(&mut self, frame: &Locator) -> ComprarResult<()> {
        self.switcher.enter_frame(&mut self.driver, frame)
    }

    /// Return to the top-level document of the current window
    pub fn leave_frame(&mut self) -> ComprarResult<()> {
        self.switcher.leave_frame(&mut self.driver)
    }

    /// Snapshot the open window handles before an action opens a window
    pub fn window_handles(&mut self) -> ComprarResult<Vec<WindowHandle>> {
        ContextSwitcher::window_handles(&mut self.driver)
    }

    /// Wait for a window absent from `before` to appear
    pub fn await_new_window(&mut self, before: &[WindowHandle]) -> ComprarResult<WindowHandle> {
        self.switcher.await_new_window(&mut self.driver, before)
    }

    /// Switch to a window
    pub fn switch_to_window(&mut self, handle: &WindowHandle) -> ComprarResult<()> {
        self.switcher.switch_to_window(&mut self.driver, handle)
    }

    /// Close the current window; switch to another before any other command
    pub fn close_current_window(&mut self) -> ComprarResult<()> {
        self.switcher.close_current_window(&mut self.driver)
    }

    /// Read the active dialog's text, `None` if no dialog is active
    pub fn dialog_text(&mut self) -> ComprarResult<Option<String>> {
        dialog::dialog_text(&mut self.driver)
    }

    /// Accept the active dialog; fails if none is active
    pub fn accept_dialog(&mut self) -> ComprarResult<()> {
        dialog::accept_dialog(&mut self.driver)
    }

    /// Dismiss the active dialog; fails if none is active
    pub fn dismiss_dialog(&mut self) -> ComprarResult<()> {
        dialog::dismiss_dialog(&mut self.driver)
    }

    /// Accept the active dialog if present; returns whether one was handled
    pub fn accept_dialog_if_present(&mut self) -> ComprarResult<bool> {
        dialog::accept_dialog_if_present(&mut self.driver)
    }

    /// Run a full observation probe under the session's retry policy.
    ///
    /// The probe gets the session back, so each attempt may interact, read
    /// and wait; the 1-based attempt number comes second. While the probe
    /// runs, the session's wait deadline is the policy's per-attempt
    /// budget, so one slow attempt cannot eat the whole retry window; the
    /// session's own wait settings are restored afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::RetriesExhausted`] if no attempt yields a
    /// value.
    pub fn observe_until<T, F>(&mut self, mut probe: F) -> ComprarResult<T>
    where
        F: FnMut(&mut Self, u32) -> Option<T>,
    {
        let policy = self.config.retry.clone();
        let attempt_wait = self
            .config
            .wait
            .clone()
            .with_timeout(policy.per_attempt_timeout_ms);
        let saved_wait = std::mem::replace(&mut self.config.wait, attempt_wait.clone());
        let saved_switcher_wait = self.switcher.set_wait_options(attempt_wait.clone());
        let saved_interactor = std::mem::replace(
            &mut self.interactor,
            Interactor::with_options(self.waiter.clone(), attempt_wait),
        );
        let result = retry::observe_until(&policy, |attempt| probe(&mut *self, attempt));
        self.config.wait = saved_wait;
        let _previous = self.switcher.set_wait_options(saved_switcher_wait);
        self.interactor = saved_interactor;
        result
    }

    /// Tear the driver down explicitly.
    ///
    /// Idempotent; also invoked by `Drop` if never called.
    pub fn close(&mut self) -> ComprarResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.driver.close()
    }
}

impl<D: Driver> Drop for Session<D> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(error) = self.driver.close() {
                warn!(%error, "driver teardown failed");
            }
            self.closed = true;
        }
    }
}
