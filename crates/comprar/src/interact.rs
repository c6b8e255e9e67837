//! Stale-tolerant element interaction.
//!
//! Two contracts live here and never mix:
//!
//! - State-changing actions ([`Interactor::click`], [`Interactor::type_text`])
//!   wait for the target to become visible, re-resolve it, act, and
//!   propagate every failure. A click that did not happen must fail the test.
//! - Read-only probes ([`Interactor::read_text`], [`Interactor::is_visible`])
//!   never raise. A missing or stale element reads as `""` / `false`; the
//!   caller's assertion reports the mismatch. All softening happens in one
//!   place, [`Interactor::soften`].

use tracing::{debug, warn};

use crate::driver::Driver;
use crate::locator::{locate, locate_all, Locator};
use crate::result::{ComprarError, ComprarResult};
use crate::wait::{until_visible, WaitOptions, Waiter};

/// Element interactor bound to a session's wait settings.
#[derive(Debug, Clone, Default)]
pub struct Interactor {
    waiter: Waiter,
    options: WaitOptions,
}

impl Interactor {
    /// Create an interactor with default wait options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interactor with the given waiter and wait options
    #[must_use]
    pub fn with_options(waiter: Waiter, options: WaitOptions) -> Self {
        Self { waiter, options }
    }

    /// The wait options every interaction in this session uses
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait for the element to be visible, then click it.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::Timeout`] if the element never becomes
    /// visible (no partial click is issued), or
    /// [`ComprarError::InteractionFailed`] if the click itself errors after
    /// the wait succeeded.
    pub fn click<D: Driver>(&self, driver: &mut D, locator: &Locator) -> ComprarResult<()> {
        self.waiter
            .until(driver, until_visible(locator), &self.options)?;
        debug!(%locator, "click");
        let handle = locate(driver, locator)
            .map_err(|e| ComprarError::interaction("click", e.to_string()))?;
        driver
            .click(&handle)
            .map_err(|e| ComprarError::interaction("click", e.to_string()))
    }

    /// Wait for the element to be visible, clear it, then type into it.
    ///
    /// # Errors
    ///
    /// Same contract as [`Interactor::click`].
    pub fn type_text<D: Driver>(
        &self,
        driver: &mut D,
        locator: &Locator,
        text: &str,
    ) -> ComprarResult<()> {
        self.waiter
            .until(driver, until_visible(locator), &self.options)?;
        debug!(%locator, chars = text.len(), "type");
        let handle = locate(driver, locator)
            .map_err(|e| ComprarError::interaction("type", e.to_string()))?;
        driver
            .clear(&handle)
            .and_then(|()| driver.send_keys(&handle, text))
            .map_err(|e| ComprarError::interaction("type", e.to_string()))
    }

    /// Click the nth element matching the locator (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::NotFound`] if fewer than `index + 1` elements
    /// match after the wait, otherwise the [`Interactor::click`] contract.
    pub fn click_nth<D: Driver>(
        &self,
        driver: &mut D,
        locator: &Locator,
        index: usize,
    ) -> ComprarResult<()> {
        self.waiter
            .until(driver, |d| Ok(locate_all(d, locator).len() > index), &self.options)?;
        debug!(%locator, index, "click nth");
        let mut found = locate_all(driver, locator);
        if found.len() <= index {
            return Err(ComprarError::NotFound {
                selector: format!("{locator}[{index}]"),
            });
        }
        driver
            .click(&found.swap_remove(index))
            .map_err(|e| ComprarError::interaction("click", e.to_string()))
    }

    /// Clear and type into the nth element matching the locator (0-based).
    ///
    /// # Errors
    ///
    /// Same contract as [`Interactor::click_nth`].
    pub fn type_text_nth<D: Driver>(
        &self,
        driver: &mut D,
        locator: &Locator,
        index: usize,
        text: &str,
    ) -> ComprarResult<()> {
        self.waiter
            .until(driver, |d| Ok(locate_all(d, locator).len() > index), &self.options)?;
        debug!(%locator, index, chars = text.len(), "type nth");
        let mut found = locate_all(driver, locator);
        if found.len() <= index {
            return Err(ComprarError::NotFound {
                selector: format!("{locator}[{index}]"),
            });
        }
        let handle = found.swap_remove(index);
        driver
            .clear(&handle)
            .and_then(|()| driver.send_keys(&handle, text))
            .map_err(|e| ComprarError::interaction("type", e.to_string()))
    }

    /// Read the element's visible text; `""` on any failure.
    pub fn read_text<D: Driver>(&self, driver: &mut D, locator: &Locator) -> String {
        Self::soften(locator, "read_text", Self::try_read_text(driver, locator))
            .unwrap_or_default()
    }

    /// Read the nth matching element's text (0-based); `""` on any failure.
    pub fn read_text_nth<D: Driver>(
        &self,
        driver: &mut D,
        locator: &Locator,
        index: usize,
    ) -> String {
        let mut probe = || -> ComprarResult<String> {
            let found = locate_all(driver, locator);
            let handle = found.get(index).ok_or_else(|| ComprarError::NotFound {
                selector: format!("{locator}[{index}]"),
            })?;
            driver.get_text(handle)
        };
        Self::soften(locator, "read_text_nth", probe()).unwrap_or_default()
    }

    /// Whether the element is present and displayed; `false` on any failure.
    pub fn is_visible<D: Driver>(&self, driver: &mut D, locator: &Locator) -> bool {
        Self::soften(locator, "is_visible", Self::try_is_visible(driver, locator))
            .unwrap_or_default()
    }

    /// Number of elements matching the locator right now.
    pub fn count<D: Driver>(&self, driver: &mut D, locator: &Locator) -> usize {
        locate_all(driver, locator).len()
    }

    fn try_read_text<D: Driver>(driver: &mut D, locator: &Locator) -> ComprarResult<String> {
        let handle = locate(driver, locator)?;
        driver.get_text(&handle)
    }

    fn try_is_visible<D: Driver>(driver: &mut D, locator: &Locator) -> ComprarResult<bool> {
        let handle = locate(driver, locator)?;
        driver.is_displayed(&handle)
    }

    /// The single point where read-probe failures collapse to neutral.
    fn soften<T>(locator: &Locator, probe: &str, result: ComprarResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(%locator, probe, %error, "read probe failed, reporting neutral");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{ClickEffect, MockDriver, MockElement, MockWindow};

    fn interactor() -> Interactor {
        Interactor::with_options(
            Waiter::new(),
            WaitOptions::new().with_timeout(200).with_poll_interval(10),
        )
    }

    mod click_tests {
        use super::*;

        #[test]
        fn test_click_visible_element() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("add", "input").with_css_id("add-to-cart"));
            let mut driver = MockDriver::with_window(window);
            interactor()
                .click(&mut driver, &Locator::id("add-to-cart"))
                .unwrap();
            assert!(driver.was_clicked("add"));
        }

        #[test]
        fn test_click_waits_for_late_element() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("ok", "button").with_css_id("ok").appears_after(2));
            let mut driver = MockDriver::with_window(window);
            interactor().click(&mut driver, &Locator::id("ok")).unwrap();
            assert!(driver.was_clicked("ok"));
        }

        #[test]
        fn test_click_never_visible_is_timeout_without_click() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("ghost", "button").with_css_id("ghost").hidden());
            let mut driver = MockDriver::with_window(window);
            let err = interactor()
                .click(&mut driver, &Locator::id("ghost"))
                .unwrap_err();
            assert!(matches!(err, ComprarError::Timeout { .. }));
            assert_eq!(driver.click_count("ghost"), 0);
        }

        #[test]
        fn test_click_missing_element_is_timeout() {
            let mut driver = MockDriver::new();
            let err = interactor()
                .click(&mut driver, &Locator::id("absent"))
                .unwrap_err();
            assert!(matches!(err, ComprarError::Timeout { .. }));
        }

        #[test]
        fn test_click_nth_picks_the_right_match() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("p0", "a").with_class("product-title"))
                .with_element(MockElement::new("p1", "a").with_class("product-title"));
            let mut driver = MockDriver::with_window(window);
            interactor()
                .click_nth(&mut driver, &Locator::class_name("product-title"), 1)
                .unwrap();
            assert!(driver.was_clicked("p1"));
            assert!(!driver.was_clicked("p0"));
        }
    }

    mod type_tests {
        use super::*;

        #[test]
        fn test_type_clears_then_types() {
            let window = MockWindow::new("http://shop.test/").with_element(
                MockElement::new("email", "input")
                    .with_css_id("Email")
                    .with_text("old@shop.test"),
            );
            let mut driver = MockDriver::with_window(window);
            interactor()
                .type_text(&mut driver, &Locator::id("Email"), "new@shop.test")
                .unwrap();
            assert_eq!(driver.typed("email"), Some("new@shop.test"));
            assert_eq!(
                interactor().read_text(&mut driver, &Locator::id("Email")),
                "new@shop.test"
            );
        }

        #[test]
        fn test_type_into_missing_element_is_timeout() {
            let mut driver = MockDriver::new();
            let err = interactor()
                .type_text(&mut driver, &Locator::id("absent"), "x")
                .unwrap_err();
            assert!(matches!(err, ComprarError::Timeout { .. }));
        }
    }

    mod probe_tests {
        use super::*;

        #[test]
        fn test_read_text_missing_is_empty() {
            let mut driver = MockDriver::new();
            assert_eq!(
                interactor().read_text(&mut driver, &Locator::id("absent")),
                ""
            );
        }

        #[test]
        fn test_read_text_with_open_dialog_is_empty() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("t", "h1").with_css_id("t").with_text("Title"));
            let mut driver = MockDriver::with_window(window);
            driver.raise_dialog("Please enter some search keyword");
            assert_eq!(interactor().read_text(&mut driver, &Locator::id("t")), "");
        }

        #[test]
        fn test_is_visible_reports_state_without_raising() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("shown", "div").with_css_id("shown"))
                .with_element(MockElement::new("hid", "div").with_css_id("hid").hidden());
            let mut driver = MockDriver::with_window(window);
            let ix = interactor();
            assert!(ix.is_visible(&mut driver, &Locator::id("shown")));
            assert!(!ix.is_visible(&mut driver, &Locator::id("hid")));
            assert!(!ix.is_visible(&mut driver, &Locator::id("absent")));
        }

        #[test]
        fn test_read_text_nth() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(
                    MockElement::new("p0", "a").with_class("product-title").with_text("Laptop"),
                )
                .with_element(
                    MockElement::new("p1", "a").with_class("product-title").with_text("Phone"),
                );
            let mut driver = MockDriver::with_window(window);
            let ix = interactor();
            let titles = Locator::class_name("product-title");
            assert_eq!(ix.read_text_nth(&mut driver, &titles, 1), "Phone");
            assert_eq!(ix.read_text_nth(&mut driver, &titles, 7), "");
            assert_eq!(ix.count(&mut driver, &titles), 2);
        }
    }

    mod stale_tests {
        use super::*;

        #[test]
        fn test_click_waits_out_a_hidden_then_revealed_element() {
            // The first polls see the element hidden; once another click
            // reveals it, the wait resolves and the click lands.
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("open", "button").with_css_id("open"))
                .with_element(MockElement::new("late", "div").with_css_id("late").hidden());
            let mut driver = MockDriver::with_window(window);
            driver.on_click(
                "open",
                vec![ClickEffect::RevealElement {
                    element_id: "late".to_string(),
                }],
            );
            let ix = interactor();
            ix.click(&mut driver, &Locator::id("open")).unwrap();
            ix.click(&mut driver, &Locator::id("late")).unwrap();
            assert!(driver.was_clicked("late"));
        }
    }
}
