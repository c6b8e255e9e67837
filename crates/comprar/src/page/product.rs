//! Product details page.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;
use crate::wait::until_visible;

fn product_name() -> Locator {
    Locator::class_name("product-name")
}

fn product_price() -> Locator {
    Locator::class_name("product-price")
}

fn short_description() -> Locator {
    Locator::class_name("short-description")
}

fn product_image() -> Locator {
    Locator::class_name("picture")
}

// The button and quantity ids carry the product id, so match on the prefix.
fn add_to_cart_button() -> Locator {
    Locator::css("input[id^='add-to-cart-button-']")
}

fn quantity_input() -> Locator {
    Locator::css("input[id^='product_enteredQuantity_']")
}

fn notification() -> Locator {
    Locator::css("#bar-notification .content")
}

fn close_notification() -> Locator {
    Locator::css("#bar-notification .close")
}

fn cart_link() -> Locator {
    Locator::link_text("shopping cart")
}

/// A product's details page.
pub struct ProductPage<'a, D: Driver> {
    session: &'a mut Session<D>,
}

impl<'a, D: Driver> ProductPage<'a, D> {
    /// Bind the page to a session
    pub fn new(session: &'a mut Session<D>) -> Self {
        Self { session }
    }

    /// The product name, once visible
    pub fn name(&mut self) -> ComprarResult<String> {
        self.session.wait_until(until_visible(&product_name()))?;
        Ok(self.session.read_text(&product_name()))
    }

    /// The product price, once visible
    pub fn price(&mut self) -> ComprarResult<String> {
        self.session.wait_until(until_visible(&product_price()))?;
        Ok(self.session.read_text(&product_price()))
    }

    /// The short description, once visible
    pub fn description(&mut self) -> ComprarResult<String> {
        self.session.wait_until(until_visible(&short_description()))?;
        Ok(self.session.read_text(&short_description()))
    }

    /// Whether the product image is displayed; `false` on any failure
    pub fn is_image_displayed(&mut self) -> bool {
        self.session.is_visible(&product_image())
    }

    /// Set the order quantity
    pub fn set_quantity(&mut self, quantity: u32) -> ComprarResult<()> {
        self.session
            .type_text(&quantity_input(), &quantity.to_string())
    }

    /// Click the add-to-cart button
    pub fn add_to_cart(&mut self) -> ComprarResult<()> {
        self.session.click(&add_to_cart_button())
    }

    /// The notification bar's message; `""` if none appears in time
    pub fn notification(&mut self) -> String {
        if self.session.wait_until(until_visible(&notification())).is_err() {
            return String::new();
        }
        self.session.read_text(&notification())
    }

    /// Close the notification bar
    pub fn close_notification(&mut self) -> ComprarResult<()> {
        self.session.click(&close_notification())
    }

    /// Whether the add-to-cart confirmation was observed.
    ///
    /// The notification bar fades on its own, so a single read can miss
    /// it; each retry attempt waits for the bar, reads it, and closes it
    /// so it cannot cover other elements.
    pub fn is_added_to_cart(&mut self) -> bool {
        self.session
            .observe_until(|session, _| {
                if session.wait_until(until_visible(&notification())).is_err() {
                    return None;
                }
                let message = session.read_text(&notification());
                if session.is_visible(&close_notification()) {
                    let _unused = session.click(&close_notification());
                }
                message
                    .contains("added to your shopping cart")
                    .then_some(())
            })
            .is_ok()
    }

    /// Follow the "shopping cart" link in the notification bar
    pub fn go_to_cart(&mut self) -> ComprarResult<()> {
        self.session.click(&cart_link())
    }
}
