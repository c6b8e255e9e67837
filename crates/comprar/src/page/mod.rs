//! Page objects for the storefront under test.
//!
//! Each page is a thin call sequence over a [`crate::session::Session`]:
//! a locator table declared once plus methods naming user intentions.
//! Synchronization lives entirely in the core; page methods never sleep
//! or poll on their own.

mod cart;
mod home;
mod login;
mod product;

pub use cart::CartPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use product::ProductPage;
