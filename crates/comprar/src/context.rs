//! Browsing-context tracking: frames and secondary windows.
//!
//! The driver has exactly one current browsing context at a time. The
//! switcher mirrors that state in a typed value so every context change is
//! explicit and leaving a context returns to its statically known parent.
//! One switcher per session; never shared across drivers.

use tracing::debug;

use crate::driver::{Driver, WindowHandle};
use crate::locator::{locate, Locator};
use crate::result::{ComprarError, ComprarResult};
use crate::wait::{until_present, WaitOptions, Waiter};

/// Where the driver's commands currently resolve.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BrowsingContext {
    /// The primary window's top-level document
    #[default]
    Document,
    /// Inside a frame; the parent is the context the frame was entered from
    Frame {
        /// Context to return to on leave
        parent: Box<BrowsingContext>,
    },
    /// A secondary window or tab
    SecondaryWindow {
        /// The window's handle
        handle: WindowHandle,
        /// Context to return to when switching back
        parent: Box<BrowsingContext>,
    },
}

impl std::fmt::Display for BrowsingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Frame { .. } => write!(f, "frame"),
            Self::SecondaryWindow { handle, .. } => write!(f, "window {handle}"),
        }
    }
}

/// Tracks and drives browsing-context changes for one session.
#[derive(Debug, Clone, Default)]
pub struct ContextSwitcher {
    context: BrowsingContext,
    home: Option<WindowHandle>,
    waiter: Waiter,
    options: WaitOptions,
}

impl ContextSwitcher {
    /// Create a switcher in the top-level document context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a switcher with the given waiter and wait options
    #[must_use]
    pub fn with_options(waiter: Waiter, options: WaitOptions) -> Self {
        Self {
            context: BrowsingContext::Document,
            home: None,
            waiter,
            options,
        }
    }

    /// The current browsing context
    #[must_use]
    pub const fn current(&self) -> &BrowsingContext {
        &self.context
    }

    /// Replace the wait options, keeping the tracked context.
    ///
    /// Returns the previous options so a caller can restore them.
    pub fn set_wait_options(&mut self, options: WaitOptions) -> WaitOptions {
        std::mem::replace(&mut self.options, options)
    }

    /// Snapshot the open window handles, for diffing around an action
    /// expected to open a window.
    pub fn window_handles<D: Driver>(driver: &mut D) -> ComprarResult<Vec<WindowHandle>> {
        driver.list_window_handles()
    }

    /// Wait for the frame element, then switch the driver into it.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::Timeout`] if the frame element never appears,
    /// or a driver error if the element is not a frame.
    pub fn enter_frame<D: Driver>(
        &mut self,
        driver: &mut D,
        frame: &Locator,
    ) -> ComprarResult<()> {
        self.waiter
            .until(driver, until_present(frame), &self.options)?;
        let handle = locate(driver, frame)?;
        driver.switch_to_frame(&handle)?;
        debug!(%frame, "entered frame");
        self.context = BrowsingContext::Frame {
            parent: Box::new(std::mem::take(&mut self.context)),
        };
        Ok(())
    }

    /// Return to the top-level document of the current window.
    ///
    /// Unconditional: strips every frame level at once, mirroring the
    /// driver's switch-to-default-content semantics.
    pub fn leave_frame<D: Driver>(&mut self, driver: &mut D) -> ComprarResult<()> {
        driver.switch_to_default_content()?;
        while matches!(self.context, BrowsingContext::Frame { .. }) {
            if let BrowsingContext::Frame { parent } = std::mem::take(&mut self.context) {
                self.context = *parent;
            }
        }
        debug!(context = %self.context, "left frames");
        Ok(())
    }

    /// Wait for a window handle that was not in `before` to appear.
    ///
    /// Call after triggering the action that opens the window, passing the
    /// snapshot taken before it.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::WindowNotFound`] if no new handle appears
    /// within the wait deadline.
    pub fn await_new_window<D: Driver>(
        &self,
        driver: &mut D,
        before: &[WindowHandle],
    ) -> ComprarResult<WindowHandle> {
        let mut new_handle = None;
        let result = self.waiter.until(
            driver,
            |d| {
                let now = d.list_window_handles()?;
                new_handle = now.into_iter().find(|h| !before.contains(h));
                Ok(new_handle.is_some())
            },
            &self.options,
        );
        match result {
            Ok(()) => {
                let handle = new_handle.ok_or_else(|| ComprarError::WindowNotFound {
                    handle: "new window".to_string(),
                })?;
                debug!(%handle, "new window appeared");
                Ok(handle)
            }
            Err(_) => Err(ComprarError::WindowNotFound {
                handle: "new window".to_string(),
            }),
        }
    }

    /// Switch the driver to a window.
    ///
    /// Switching to the session's original window restores the
    /// [`BrowsingContext::Document`] context; any other handle pushes a
    /// [`BrowsingContext::SecondaryWindow`] whose parent is the context
    /// being left.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::WindowNotFound`] if the handle is not among
    /// the open window handles.
    pub fn switch_to_window<D: Driver>(
        &mut self,
        driver: &mut D,
        handle: &WindowHandle,
    ) -> ComprarResult<()> {
        if self.home.is_none() {
            if let Ok(current) = driver.current_window_handle() {
                self.home = Some(current);
            }
        }
        driver.switch_to_window(handle)?;
        self.context = if self.home.as_ref() == Some(handle) {
            BrowsingContext::Document
        } else {
            BrowsingContext::SecondaryWindow {
                handle: handle.clone(),
                parent: Box::new(std::mem::take(&mut self.context)),
            }
        };
        debug!(context = %self.context, "switched window");
        Ok(())
    }

    /// Close the current window.
    ///
    /// Explicit, never automatic. The driver is left without a current
    /// window; a [`ContextSwitcher::switch_to_window`] must follow before
    /// any other command.
    pub fn close_current_window<D: Driver>(&mut self, driver: &mut D) -> ComprarResult<()> {
        driver.close_current_window()?;
        if let BrowsingContext::SecondaryWindow { parent, .. } =
            std::mem::take(&mut self.context)
        {
            self.context = *parent;
        }
        debug!("closed current window");
        Ok(())
    }
}
