//! Native dialog handling (alerts, confirms).
//!
//! A native dialog blocks every other driver command until handled, so
//! call sites where a dialog may or may not appear use the `_if_present`
//! variants; [`crate::result::ComprarError::NoDialog`] is never fatal
//! there.

use tracing::debug;

use crate::driver::Driver;
use crate::result::{ComprarError, ComprarResult};

/// Read the active dialog's text, if any.
///
/// # Errors
///
/// Driver transport failures propagate; a missing dialog maps to
/// `Ok(None)`.
pub fn dialog_text<D: Driver>(driver: &mut D) -> ComprarResult<Option<String>> {
    match driver.active_dialog_text() {
        Ok(text) => Ok(Some(text)),
        Err(ComprarError::NoDialog) => Ok(None),
        Err(other) => Err(other),
    }
}

/// Accept the active dialog.
///
/// # Errors
///
/// Returns [`ComprarError::NoDialog`] if none is active.
pub fn accept_dialog<D: Driver>(driver: &mut D) -> ComprarResult<()> {
    driver.accept_dialog()?;
    debug!("dialog accepted");
    Ok(())
}

/// Dismiss the active dialog.
///
/// # Errors
///
/// Returns [`ComprarError::NoDialog`] if none is active.
pub fn dismiss_dialog<D: Driver>(driver: &mut D) -> ComprarResult<()> {
    driver.dismiss_dialog()?;
    debug!("dialog dismissed");
    Ok(())
}

/// Accept the active dialog if one is present.
///
/// Returns whether a dialog was handled. For flows where the dialog is
/// environment-dependent (an empty search may or may not alert).
///
/// # Errors
///
/// Only driver transport failures; a missing dialog is `Ok(false)`.
pub fn accept_dialog_if_present<D: Driver>(driver: &mut D) -> ComprarResult<bool> {
    match driver.accept_dialog() {
        Ok(()) => {
            debug!("dialog accepted");
            Ok(true)
        }
        Err(ComprarError::NoDialog) => Ok(false),
        Err(other) => Err(other),
    }
}

/// Dismiss the active dialog if one is present; returns whether one was.
///
/// # Errors
///
/// Only driver transport failures; a missing dialog is `Ok(false)`.
pub fn dismiss_dialog_if_present<D: Driver>(driver: &mut D) -> ComprarResult<bool> {
    match driver.dismiss_dialog() {
        Ok(()) => {
            debug!("dialog dismissed");
            Ok(true)
        }
        Err(ComprarError::NoDialog) => Ok(false),
        Err(other) => Err(other),
    }
}
