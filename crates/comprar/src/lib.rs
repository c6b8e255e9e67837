//! Comprar: synchronization-first UI automation harness for storefront
//! end-to-end tests
//!
//! Comprar (Spanish: "to shop") wraps a browser-automation driver in a
//! disciplined synchronization layer: explicit bounded waits instead of
//! sleeps, re-resolution of every element on every use, a hard line
//! between state-changing actions (which propagate failures) and
//! read-only probes (which collapse to neutral values), and explicit
//! tracking of frames, secondary windows and native dialogs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    COMPRAR Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌───────────┐    ┌───────────────┐    ┌────────────┐       │
//! │   │ Page      │    │ Session       │    │ Driver     │       │
//! │   │ Objects   │───►│ wait/interact │───►│ (browser   │       │
//! │   │           │    │ context/retry │    │  engine)   │       │
//! │   └───────────┘    └───────────────┘    └────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use comprar::{HarnessConfig, Locator, MockDriver, Session};
//!
//! let mut session = Session::new(MockDriver::new(), HarnessConfig::new());
//! assert_eq!(session.count(&Locator::class_name("product-item")), 0);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod config;
pub mod context;
pub mod dialog;
pub mod driver;
pub mod interact;
pub mod locator;
pub mod page;
pub mod result;
pub mod retry;
pub mod session;
pub mod wait;

pub use config::HarnessConfig;
pub use context::{BrowsingContext, ContextSwitcher};
pub use driver::{Driver, ElementHandle, MockDriver, MockElement, MockWindow, WindowHandle};
pub use interact::Interactor;
pub use locator::{locate, locate_all, Locator, Selector};
pub use page::{CartPage, HomePage, LoginPage, ProductPage};
pub use result::{ComprarError, ComprarResult};
pub use retry::{observe_until, RetryPolicy};
pub use session::Session;
pub use wait::{WaitOptions, WaitSignal, Waiter};
