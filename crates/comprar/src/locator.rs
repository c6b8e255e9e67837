//! Locator abstraction for element lookup.
//!
//! A [`Locator`] is declared once per logical UI element and re-resolved on
//! every use: the underlying DOM node may be replaced at any time, so handles
//! are never cached across waits.

use serde::{Deserialize, Serialize};

use crate::driver::{Driver, ElementHandle};
use crate::result::{ComprarError, ComprarResult};

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// Element id attribute (e.g. "Email")
    Id(String),
    /// CSS selector (e.g. "input[value='Log in']")
    Css(String),
    /// Exact anchor text (e.g. "Log out")
    LinkText(String),
    /// Class name (e.g. "product-title")
    ClassName(String),
    /// Tag name (e.g. "h1")
    TagName(String),
}

impl Selector {
    /// Create an id selector
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::Css(value.into())
    }

    /// Create a link-text selector
    #[must_use]
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::LinkText(value.into())
    }

    /// Create a class-name selector
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::ClassName(value.into())
    }

    /// Create a tag-name selector
    #[must_use]
    pub fn tag_name(value: impl Into<String>) -> Self {
        Self::TagName(value.into())
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(v) => write!(f, "id={v}"),
            Self::Css(v) => write!(f, "css={v}"),
            Self::LinkText(v) => write!(f, "link-text={v}"),
            Self::ClassName(v) => write!(f, "class={v}"),
            Self::TagName(v) => write!(f, "tag={v}"),
        }
    }
}

/// A declarative description of how to find a UI element.
///
/// Immutable; declared once per logical element, typically in a page
/// object's locator table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
}

impl Locator {
    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self { selector }
    }

    /// Locate by element id
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::from_selector(Selector::id(value))
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::from_selector(Selector::css(value))
    }

    /// Locate by exact anchor text
    #[must_use]
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::from_selector(Selector::link_text(value))
    }

    /// Locate by class name
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::from_selector(Selector::class_name(value))
    }

    /// Locate by tag name
    #[must_use]
    pub fn tag_name(value: impl Into<String>) -> Self {
        Self::from_selector(Selector::tag_name(value))
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector)
    }
}

/// Resolve a locator to the first matching element in the current browsing
/// context.
///
/// Re-queries the driver on every call; nothing is cached.
///
/// # Errors
///
/// Returns [`ComprarError::NotFound`] if zero elements match at the moment
/// of the call.
pub fn locate<D: Driver>(driver: &mut D, locator: &Locator) -> ComprarResult<ElementHandle> {
    let mut found = driver.find_elements(locator)?;
    if found.is_empty() {
        return Err(ComprarError::NotFound {
            selector: locator.to_string(),
        });
    }
    Ok(found.remove(0))
}

/// Resolve a locator to all matching elements in the current browsing
/// context.
///
/// Zero matches yield an empty sequence, never an error; driver failures
/// collapse to an empty sequence as well, since "nothing there" is the
/// observable fact either way.
pub fn locate_all<D: Driver>(driver: &mut D, locator: &Locator) -> Vec<ElementHandle> {
    driver.find_elements(locator).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement, MockWindow};

    fn driver_with(elements: Vec<MockElement>) -> MockDriver {
        let mut window = MockWindow::new("http://shop.test/");
        for element in elements {
            window = window.with_element(element);
        }
        MockDriver::with_window(window)
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_selector_display() {
            assert_eq!(Selector::id("Email").to_string(), "id=Email");
            assert_eq!(Selector::css(".cart-qty").to_string(), "css=.cart-qty");
            assert_eq!(
                Selector::link_text("Log out").to_string(),
                "link-text=Log out"
            );
            assert_eq!(
                Selector::class_name("product-title").to_string(),
                "class=product-title"
            );
            assert_eq!(Selector::tag_name("h1").to_string(), "tag=h1");
        }

        #[test]
        fn test_locator_constructors() {
            assert_eq!(*Locator::id("Email").selector(), Selector::id("Email"));
            assert_eq!(*Locator::css("a.b").selector(), Selector::css("a.b"));
            assert_eq!(
                *Locator::class_name("picture").selector(),
                Selector::class_name("picture")
            );
        }
    }

    mod locate_tests {
        use super::*;

        #[test]
        fn test_locate_finds_first_match() {
            let mut driver = driver_with(vec![
                MockElement::new("first", "a").with_link_text("Log in"),
                MockElement::new("second", "a").with_link_text("Log in"),
            ]);
            let handle = locate(&mut driver, &Locator::link_text("Log in")).unwrap();
            assert!(handle.id.starts_with("first"));
        }

        #[test]
        fn test_locate_zero_matches_is_not_found() {
            let mut driver = driver_with(vec![]);
            let err = locate(&mut driver, &Locator::id("missing")).unwrap_err();
            assert!(matches!(err, ComprarError::NotFound { .. }));
            assert!(err.to_string().contains("id=missing"));
        }

        #[test]
        fn test_locate_all_zero_matches_is_empty() {
            let mut driver = driver_with(vec![]);
            let found = locate_all(&mut driver, &Locator::class_name("absent"));
            assert!(found.is_empty());
        }

        #[test]
        fn test_locate_all_returns_every_match() {
            let mut driver = driver_with(vec![
                MockElement::new("p1", "a").with_class("product-title"),
                MockElement::new("p2", "a").with_class("product-title"),
                MockElement::new("other", "div"),
            ]);
            let found = locate_all(&mut driver, &Locator::class_name("product-title"));
            assert_eq!(found.len(), 2);
        }

        #[test]
        fn test_locate_all_swallows_driver_failure() {
            let mut driver = driver_with(vec![MockElement::new("b", "button")]);
            driver.raise_dialog("Please enter some search keyword");
            // Commands are blocked while a dialog is open; the probe stays neutral.
            let found = locate_all(&mut driver, &Locator::tag_name("button"));
            assert!(found.is_empty());
        }

        #[test]
        fn test_locate_never_caches() {
            let mut driver = driver_with(vec![MockElement::new("btn", "button")]);
            let first = locate(&mut driver, &Locator::tag_name("button")).unwrap();
            driver.navigate("http://shop.test/other").unwrap();
            let second = locate(&mut driver, &Locator::tag_name("button")).unwrap();
            // A fresh resolution after navigation yields a fresh handle.
            assert_ne!(first.id, second.id);
        }
    }
}
