//! Login page.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;
use crate::wait::{until_url_contains, until_visible};

fn email_input() -> Locator {
    Locator::id("Email")
}

fn password_input() -> Locator {
    Locator::id("Password")
}

fn login_button() -> Locator {
    Locator::css("input[value='Log in']")
}

fn remember_me() -> Locator {
    Locator::id("RememberMe")
}

fn login_error() -> Locator {
    Locator::class_name("validation-summary-errors")
}

fn email_error() -> Locator {
    Locator::css("span[data-valmsg-for='Email']")
}

fn logout_link() -> Locator {
    Locator::link_text("Log out")
}

fn login_link() -> Locator {
    Locator::link_text("Log in")
}

fn account_email() -> Locator {
    Locator::css(".header-links .account")
}

/// The storefront's login page.
pub struct LoginPage<'a, D: Driver> {
    session: &'a mut Session<D>,
}

impl<'a, D: Driver> LoginPage<'a, D> {
    /// Bind the page to a session
    pub fn new(session: &'a mut Session<D>) -> Self {
        Self { session }
    }

    /// Navigate to the login page and wait for it
    pub fn open(&mut self) -> ComprarResult<()> {
        self.session.goto("login")?;
        self.session.wait_until(until_url_contains("/login"))
    }

    /// Fill credentials and submit
    pub fn login(&mut self, email: &str, password: &str) -> ComprarResult<()> {
        self.session.type_text(&email_input(), email)?;
        self.session.type_text(&password_input(), password)?;
        self.session.click(&login_button())
    }

    /// Fill credentials, tick remember-me, and submit
    pub fn login_with_remember_me(&mut self, email: &str, password: &str) -> ComprarResult<()> {
        self.session.type_text(&email_input(), email)?;
        self.session.type_text(&password_input(), password)?;
        self.session.click(&remember_me())?;
        self.session.click(&login_button())
    }

    /// Whether the session reached the logged-in state.
    ///
    /// Fail-soft: an absent logout link after the wait reads as `false`.
    pub fn is_login_success(&mut self) -> bool {
        self.session.wait_until(until_visible(&logout_link())).is_ok()
    }

    /// The summary error above the form; `""` if none appears
    pub fn login_error(&mut self) -> String {
        if self.session.wait_until(until_visible(&login_error())).is_err() {
            return String::new();
        }
        self.session.read_text(&login_error())
    }

    /// The field-level email error, falling back to the summary error.
    ///
    /// A badly malformed email sometimes surfaces in the summary instead
    /// of under the field.
    pub fn email_error(&mut self) -> String {
        if self.session.is_visible(&email_error()) {
            let error = self.session.read_text(&email_error());
            if !error.is_empty() {
                return error;
            }
        }
        if self.session.is_visible(&login_error()) {
            return self.session.read_text(&login_error());
        }
        String::new()
    }

    /// Click the logout link and wait for the login link to return
    pub fn logout(&mut self) -> ComprarResult<()> {
        self.session.click(&logout_link())?;
        self.session.wait_until(until_visible(&login_link()))
    }

    /// Whether the session is back in the logged-out state
    pub fn is_logout_success(&mut self) -> bool {
        self.session.is_visible(&login_link())
    }

    /// The email shown in the account header; `""` when logged out
    pub fn account_email(&mut self) -> String {
        self.session.read_text(&account_email())
    }
}
