//! Shopping cart page.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;
use crate::wait::until_url_contains;

fn item_rows() -> Locator {
    Locator::css(".cart-item-row")
}

fn qty_inputs() -> Locator {
    Locator::css(".qty-input")
}

fn remove_checkboxes() -> Locator {
    Locator::css("input[name='removefromcart']")
}

fn update_cart_button() -> Locator {
    Locator::css("input[name='updatecart']")
}

fn continue_shopping_button() -> Locator {
    Locator::css("input[name='continueshopping']")
}

fn order_summary() -> Locator {
    Locator::css(".order-summary-content")
}

fn order_total() -> Locator {
    Locator::css(".order-total")
}

/// The shopping cart page.
pub struct CartPage<'a, D: Driver> {
    session: &'a mut Session<D>,
}

impl<'a, D: Driver> CartPage<'a, D> {
    /// Bind the page to a session
    pub fn new(session: &'a mut Session<D>) -> Self {
        Self { session }
    }

    /// Navigate to the cart page and wait for it
    pub fn open(&mut self) -> ComprarResult<()> {
        self.session.goto("cart")?;
        self.session.wait_until(until_url_contains("/cart"))
    }

    /// Number of item rows in the cart
    pub fn item_count(&mut self) -> usize {
        self.session.count(&item_rows())
    }

    /// Change an item row's quantity and apply the update (0-based row)
    pub fn update_quantity(&mut self, index: usize, quantity: u32) -> ComprarResult<()> {
        self.session
            .type_text_nth(&qty_inputs(), index, &quantity.to_string())?;
        self.session.click(&update_cart_button())
    }

    /// Tick an item row's remove box and apply the update (0-based row)
    pub fn remove_item(&mut self, index: usize) -> ComprarResult<()> {
        self.session.click_nth(&remove_checkboxes(), index)?;
        self.session.click(&update_cart_button())
    }

    /// Whether the cart reports itself empty.
    ///
    /// Fail-soft: an unreadable summary with zero rows also counts as
    /// empty.
    pub fn is_empty(&mut self) -> bool {
        let summary = self.session.read_text(&order_summary());
        summary.contains("Your Shopping Cart is empty") || self.item_count() == 0
    }

    /// The order total as displayed; `""` if unreadable
    pub fn total(&mut self) -> String {
        self.session.read_text(&order_total())
    }

    /// Leave the cart via the continue-shopping button
    pub fn continue_shopping(&mut self) -> ComprarResult<()> {
        self.session.click(&continue_shopping_button())
    }
}
