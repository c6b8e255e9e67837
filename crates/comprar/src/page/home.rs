//! Home page: header search, cart summary, account state.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;

fn search_input() -> Locator {
    Locator::id("small-searchterms")
}

fn search_button() -> Locator {
    Locator::css(".search-box-button")
}

fn product_items() -> Locator {
    Locator::class_name("product-item")
}

fn product_titles() -> Locator {
    Locator::class_name("product-title")
}

fn cart_qty() -> Locator {
    Locator::css(".cart-qty")
}

fn cart_link() -> Locator {
    Locator::css("#topcartlink a")
}

fn logout_link() -> Locator {
    Locator::link_text("Log out")
}

/// The storefront's home page and header.
pub struct HomePage<'a, D: Driver> {
    session: &'a mut Session<D>,
}

impl<'a, D: Driver> HomePage<'a, D> {
    /// Bind the page to a session
    pub fn new(session: &'a mut Session<D>) -> Self {
        Self { session }
    }

    /// Navigate to the storefront root
    pub fn open(&mut self) -> ComprarResult<()> {
        self.session.goto("")
    }

    /// Submit a header search.
    ///
    /// An empty query makes the storefront raise a native alert instead of
    /// navigating; when that happens the alert is accepted and its text
    /// returned, so the page is never left blocked.
    pub fn search(&mut self, query: &str) -> ComprarResult<Option<String>> {
        self.session.type_text(&search_input(), query)?;
        self.session.click(&search_button())?;
        let alert = self.session.dialog_text()?;
        if alert.is_some() {
            self.session.accept_dialog()?;
        }
        Ok(alert)
    }

    /// Number of product tiles in the current result grid
    pub fn search_result_count(&mut self) -> usize {
        self.session.count(&product_items())
    }

    /// Title of the nth product tile (0-based); `""` if absent
    pub fn product_title(&mut self, index: usize) -> String {
        self.session.read_text_nth(&product_titles(), index)
    }

    /// Open the nth product's details page (0-based)
    pub fn click_product(&mut self, index: usize) -> ComprarResult<()> {
        self.session.click_nth(&product_titles(), index)
    }

    /// Item count from the header cart badge; `0` if unreadable.
    ///
    /// The badge renders as `(2)`.
    pub fn cart_item_count(&mut self) -> usize {
        let badge = self.session.read_text(&cart_qty());
        badge
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .parse()
            .unwrap_or(0)
    }

    /// Open the shopping cart from the header
    pub fn go_to_cart(&mut self) -> ComprarResult<()> {
        self.session.click(&cart_link())
    }

    /// Whether the header shows a logged-in account
    pub fn is_user_logged_in(&mut self) -> bool {
        self.session.is_visible(&logout_link())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::driver::{ClickEffect, MockDriver, MockElement, MockWindow, WindowHandle};
    use crate::wait::WaitOptions;

    fn config() -> HarnessConfig {
        HarnessConfig::new()
            .with_base_url("http://shop.test")
            .with_wait(WaitOptions::new().with_timeout(200).with_poll_interval(10))
    }

    fn header() -> MockWindow {
        MockWindow::new("http://shop.test/")
            .with_element(MockElement::new("q", "input").with_css_id("small-searchterms"))
            .with_element(MockElement::new("go", "input").matching_css(".search-box-button"))
            .with_element(
                MockElement::new("badge", "span").matching_css(".cart-qty").with_text("(2)"),
            )
    }

    #[test]
    fn test_search_navigates_and_lists_results() {
        let mut driver = MockDriver::with_window(header());
        driver.on_click(
            "go",
            vec![ClickEffect::OpenWindow {
                handle: WindowHandle::new("main"),
                window: MockWindow::new("http://shop.test/search?q=laptop")
                    .with_element(
                        MockElement::new("i0", "div").with_class("product-item"),
                    )
                    .with_element(
                        MockElement::new("t0", "h2")
                            .with_class("product-title")
                            .with_text("14.1-inch Laptop"),
                    ),
            }],
        );
        let mut session = Session::new(driver, config());
        let mut page = HomePage::new(&mut session);
        assert_eq!(page.search("laptop").unwrap(), None);
        assert_eq!(page.search_result_count(), 1);
        assert_eq!(page.product_title(0), "14.1-inch Laptop");
    }

    #[test]
    fn test_empty_search_surfaces_and_clears_the_alert() {
        let mut driver = MockDriver::with_window(header());
        driver.on_click(
            "go",
            vec![ClickEffect::RaiseDialog {
                message: "Please enter some search keyword".to_string(),
            }],
        );
        let mut session = Session::new(driver, config());
        let mut page = HomePage::new(&mut session);
        let alert = page.search("").unwrap();
        assert_eq!(alert.as_deref(), Some("Please enter some search keyword"));
        // The alert is gone; ordinary commands work again.
        assert!(session.current_url().is_ok());
    }

    #[test]
    fn test_cart_badge_parses_count() {
        let mut session = Session::new(MockDriver::with_window(header()), config());
        let mut page = HomePage::new(&mut session);
        assert_eq!(page.cart_item_count(), 2);
    }

    #[test]
    fn test_cart_badge_unreadable_is_zero() {
        let mut session = Session::new(MockDriver::new(), config());
        let mut page = HomePage::new(&mut session);
        assert_eq!(page.cart_item_count(), 0);
        assert!(!page.is_user_logged_in());
    }
}
