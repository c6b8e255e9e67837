//! Abstract driver boundary.
//!
//! The harness consumes a synchronous command/response capability supplied
//! by the browser-automation engine. The [`Driver`] trait is the only
//! boundary the core has; everything above it ([`crate::wait`],
//! [`crate::interact`], [`crate::context`]) is pure synchronization logic.
//!
//! A driver instance is exclusively owned by the test that created it; no
//! two tests share one concurrently. [`MockDriver`] is the in-memory
//! implementation used by the harness's own tests.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::locator::{Locator, Selector};
use crate::result::{ComprarError, ComprarResult};

/// Identifier for a window or tab
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowHandle(String);

impl WindowHandle {
    /// Create a new window handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw handle string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque, possibly-stale reference to a located DOM node.
///
/// Owned transiently by a single interaction call and never cached across
/// waits; every wait re-resolves via the [`Locator`] so that a detached
/// node is never acted upon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned identifier for the node
    pub id: String,
    /// Element tag name
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
        }
    }
}

/// Synchronous browser-automation capability consumed by the harness.
///
/// All operations take `&mut self`: the driver is a command/response
/// resource with a single logical thread of control per test.
pub trait Driver {
    /// Navigate the current window to a URL
    fn navigate(&mut self, url: &str) -> ComprarResult<()>;

    /// Get the current window's URL
    fn current_url(&mut self) -> ComprarResult<String>;

    /// Find all elements matching a locator in the current browsing context
    fn find_elements(&mut self, locator: &Locator) -> ComprarResult<Vec<ElementHandle>>;

    /// Click an element
    fn click(&mut self, element: &ElementHandle) -> ComprarResult<()>;

    /// Clear an input element's value
    fn clear(&mut self, element: &ElementHandle) -> ComprarResult<()>;

    /// Type text into an element
    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> ComprarResult<()>;

    /// Check whether an element is displayed
    fn is_displayed(&mut self, element: &ElementHandle) -> ComprarResult<bool>;

    /// Read an element's visible text
    fn get_text(&mut self, element: &ElementHandle) -> ComprarResult<String>;

    /// List all open window handles
    fn list_window_handles(&mut self) -> ComprarResult<Vec<WindowHandle>>;

    /// Get the handle of the current window
    fn current_window_handle(&mut self) -> ComprarResult<WindowHandle>;

    /// Switch the current browsing context to a window
    ///
    /// # Errors
    ///
    /// Fails with [`ComprarError::WindowNotFound`] if the handle is not
    /// among the open window handles.
    fn switch_to_window(&mut self, handle: &WindowHandle) -> ComprarResult<()>;

    /// Switch the current browsing context into a frame element
    fn switch_to_frame(&mut self, frame: &ElementHandle) -> ComprarResult<()>;

    /// Return to the top-level document of the current window
    fn switch_to_default_content(&mut self) -> ComprarResult<()>;

    /// Close the current window; a window switch must follow
    fn close_current_window(&mut self) -> ComprarResult<()>;

    /// Read the active native dialog's text
    ///
    /// # Errors
    ///
    /// Fails with [`ComprarError::NoDialog`] if no dialog is active.
    fn active_dialog_text(&mut self) -> ComprarResult<String>;

    /// Accept the active native dialog
    fn accept_dialog(&mut self) -> ComprarResult<()>;

    /// Dismiss the active native dialog
    fn dismiss_dialog(&mut self) -> ComprarResult<()>;

    /// Execute a script in the current browsing context
    ///
    /// Used only for interactions the structured API cannot express.
    fn execute_script(
        &mut self,
        script: &str,
        args: &[serde_json::Value],
    ) -> ComprarResult<serde_json::Value>;

    /// Tear the driver down, releasing the browser
    fn close(&mut self) -> ComprarResult<()>;
}

// ============================================================================
// Mock driver
// ============================================================================

/// An element in the mock DOM
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Stable element identifier (also the key for scripted effects)
    pub id: String,
    /// Tag name
    pub tag_name: String,
    /// id attribute, if any
    pub css_id: Option<String>,
    /// Class list
    pub classes: Vec<String>,
    /// Raw CSS selectors this element answers to
    pub css_selectors: Vec<String>,
    /// Anchor text, if any
    pub link_text: Option<String>,
    /// Visible text / input value
    pub text: String,
    /// Whether the element is displayed
    pub visible: bool,
    /// Number of lookups that miss before the element is reported present
    /// (models UI that appears after an asynchronous delay)
    pub appears_after: u32,
}

impl MockElement {
    /// Create a new visible element
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            css_id: None,
            classes: Vec::new(),
            css_selectors: Vec::new(),
            link_text: None,
            text: String::new(),
            visible: true,
            appears_after: 0,
        }
    }

    /// Set the id attribute
    #[must_use]
    pub fn with_css_id(mut self, id: impl Into<String>) -> Self {
        self.css_id = Some(id.into());
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Register a raw CSS selector this element answers to
    #[must_use]
    pub fn matching_css(mut self, selector: impl Into<String>) -> Self {
        self.css_selectors.push(selector.into());
        self
    }

    /// Set the anchor text
    #[must_use]
    pub fn with_link_text(mut self, text: impl Into<String>) -> Self {
        self.link_text = Some(text.into());
        self
    }

    /// Set the visible text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark the element as present but not displayed
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Make the element miss the first `n` lookups before appearing
    #[must_use]
    pub const fn appears_after(mut self, n: u32) -> Self {
        self.appears_after = n;
        self
    }

    /// Check whether this element matches a locator
    #[must_use]
    pub fn matches(&self, locator: &Locator) -> bool {
        match locator.selector() {
            Selector::Id(v) => self.css_id.as_deref() == Some(v.as_str()),
            Selector::Css(v) => {
                if self.css_selectors.iter().any(|s| s == v) {
                    return true;
                }
                if let Some(id) = v.strip_prefix('#') {
                    return self.css_id.as_deref() == Some(id);
                }
                if let Some(class) = v.strip_prefix('.') {
                    return self.classes.iter().any(|c| c == class);
                }
                self.tag_name == *v
            }
            Selector::LinkText(v) => self.link_text.as_deref() == Some(v.as_str()),
            Selector::ClassName(v) => self.classes.iter().any(|c| c == v),
            Selector::TagName(v) => self.tag_name == *v,
        }
    }
}

/// A frame's document in the mock DOM
#[derive(Debug, Clone, Default)]
pub struct MockFrame {
    /// Elements in the frame's document
    pub elements: Vec<MockElement>,
}

/// A window (top-level document) in the mock DOM
#[derive(Debug, Clone)]
pub struct MockWindow {
    /// Current URL
    pub url: String,
    /// Top-level elements
    pub elements: Vec<MockElement>,
    /// Frames keyed by their frame element's id
    pub frames: HashMap<String, MockFrame>,
}

impl MockWindow {
    /// Create a new window
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            elements: Vec::new(),
            frames: HashMap::new(),
        }
    }

    /// Add a top-level element
    #[must_use]
    pub fn with_element(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Add a frame: the frame element itself plus its inner document
    #[must_use]
    pub fn with_frame(mut self, frame_element: MockElement, elements: Vec<MockElement>) -> Self {
        let key = frame_element.id.clone();
        self.elements.push(frame_element);
        let _ = self.frames.insert(key, MockFrame { elements });
        self
    }
}

/// Effect triggered by clicking a mock element
#[derive(Debug, Clone)]
pub enum ClickEffect {
    /// Open a secondary window
    OpenWindow {
        /// Handle for the new window
        handle: WindowHandle,
        /// The new window's document
        window: MockWindow,
    },
    /// Raise a native dialog with the given message
    RaiseDialog {
        /// Dialog text
        message: String,
    },
    /// Navigate the current window
    Navigate {
        /// Target URL
        url: String,
    },
    /// Set the text of an element in the current window
    SetText {
        /// Target element id
        element_id: String,
        /// New text
        text: String,
    },
    /// Make a hidden element displayed
    RevealElement {
        /// Target element id
        element_id: String,
    },
    /// Remove an element from the current window
    RemoveElement {
        /// Target element id
        element_id: String,
    },
}

/// Scripted behavior for `execute_script`
#[derive(Debug, Clone)]
pub enum ScriptBehavior {
    /// Return a canned value
    Return(serde_json::Value),
    /// Set an element's text to the first script argument
    SetElementText {
        /// Target element id
        element_id: String,
    },
}

const NO_WINDOW: &str = "__no_window__";

/// In-memory driver for harness tests.
///
/// Models multiple windows, one frame level per window, native dialogs,
/// element staleness across context changes (via an epoch counter) and
/// elements that appear only after a number of lookups.
#[derive(Debug)]
pub struct MockDriver {
    pub(crate) windows: BTreeMap<WindowHandle, MockWindow>,
    current_window: WindowHandle,
    current_frame: Option<String>,
    dialog: Option<String>,
    click_effects: HashMap<String, Vec<ClickEffect>>,
    script_behaviors: HashMap<String, ScriptBehavior>,
    query_counts: HashMap<String, u32>,
    epoch: u64,
    clicks: Vec<String>,
    keys_sent: Vec<(String, String)>,
    closed: bool,
}

impl MockDriver {
    /// Create a driver with a single blank window named "main"
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(MockWindow::new("about:blank"))
    }

    /// Create a driver whose "main" window is the given one
    #[must_use]
    pub fn with_window(window: MockWindow) -> Self {
        let handle = WindowHandle::new("main");
        let mut windows = BTreeMap::new();
        let _ = windows.insert(handle.clone(), window);
        Self {
            windows,
            current_window: handle,
            current_frame: None,
            dialog: None,
            click_effects: HashMap::new(),
            script_behaviors: HashMap::new(),
            query_counts: HashMap::new(),
            epoch: 0,
            clicks: Vec::new(),
            keys_sent: Vec::new(),
            closed: false,
        }
    }

    /// Register effects to apply when an element is clicked
    pub fn on_click(&mut self, element_id: impl Into<String>, effects: Vec<ClickEffect>) {
        let _ = self.click_effects.insert(element_id.into(), effects);
    }

    /// Register a behavior for an exact script string
    pub fn on_script(&mut self, script: impl Into<String>, behavior: ScriptBehavior) {
        let _ = self.script_behaviors.insert(script.into(), behavior);
    }

    /// Raise a native dialog directly
    pub fn raise_dialog(&mut self, message: impl Into<String>) {
        self.dialog = Some(message.into());
    }

    /// Number of times an element was clicked
    #[must_use]
    pub fn click_count(&self, element_id: &str) -> usize {
        self.clicks.iter().filter(|c| *c == element_id).count()
    }

    /// Whether an element was ever clicked
    #[must_use]
    pub fn was_clicked(&self, element_id: &str) -> bool {
        self.click_count(element_id) > 0
    }

    /// Text most recently typed into an element
    #[must_use]
    pub fn typed(&self, element_id: &str) -> Option<&str> {
        self.keys_sent
            .iter()
            .rev()
            .find(|(id, _)| id == element_id)
            .map(|(_, text)| text.as_str())
    }

    /// Whether the driver has been torn down
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn guard_dialog(&self, op: &str) -> ComprarResult<()> {
        match &self.dialog {
            Some(message) => Err(ComprarError::driver(format!(
                "{op} blocked by unhandled dialog: {message}"
            ))),
            None => Ok(()),
        }
    }

    fn window(&self) -> ComprarResult<&MockWindow> {
        self.windows
            .get(&self.current_window)
            .ok_or_else(|| ComprarError::driver("no window selected"))
    }

    fn window_mut(&mut self) -> ComprarResult<&mut MockWindow> {
        self.windows
            .get_mut(&self.current_window)
            .ok_or_else(|| ComprarError::driver("no window selected"))
    }

    fn context_elements(&self) -> ComprarResult<&[MockElement]> {
        let window = self.window()?;
        match &self.current_frame {
            Some(frame_id) => window
                .frames
                .get(frame_id)
                .map(|f| f.elements.as_slice())
                .ok_or_else(|| ComprarError::driver(format!("frame {frame_id} detached"))),
            None => Ok(window.elements.as_slice()),
        }
    }

    fn context_element_mut(&mut self, element_id: &str) -> ComprarResult<&mut MockElement> {
        let frame = self.current_frame.clone();
        let window = self.window_mut()?;
        let elements = match frame {
            Some(frame_id) => {
                &mut window
                    .frames
                    .get_mut(&frame_id)
                    .ok_or_else(|| ComprarError::driver(format!("frame {frame_id} detached")))?
                    .elements
            }
            None => &mut window.elements,
        };
        elements
            .iter_mut()
            .find(|e| e.id == element_id)
            .ok_or_else(|| ComprarError::driver(format!("element {element_id} detached")))
    }

    /// Resolve a handle back to the stable element id, checking staleness.
    fn resolve(&self, handle: &ElementHandle) -> ComprarResult<String> {
        let (element_id, epoch) = handle
            .id
            .rsplit_once('#')
            .ok_or_else(|| ComprarError::driver(format!("malformed handle {}", handle.id)))?;
        if epoch != self.epoch.to_string() {
            return Err(ComprarError::driver(format!(
                "stale element reference: {element_id}"
            )));
        }
        Ok(element_id.to_string())
    }

    fn apply_effect(&mut self, effect: ClickEffect) {
        match effect {
            ClickEffect::OpenWindow { handle, window } => {
                let _ = self.windows.insert(handle, window);
            }
            ClickEffect::RaiseDialog { message } => self.dialog = Some(message),
            ClickEffect::Navigate { url } => {
                if let Ok(window) = self.window_mut() {
                    window.url = url;
                }
                self.epoch += 1;
            }
            ClickEffect::SetText { element_id, text } => {
                if let Ok(element) = self.context_element_mut(&element_id) {
                    element.text = text;
                }
            }
            ClickEffect::RevealElement { element_id } => {
                if let Ok(element) = self.context_element_mut(&element_id) {
                    element.visible = true;
                }
            }
            ClickEffect::RemoveElement { element_id } => {
                if let Ok(window) = self.window_mut() {
                    window.elements.retain(|e| e.id != element_id);
                    for frame in window.frames.values_mut() {
                        frame.elements.retain(|e| e.id != element_id);
                    }
                }
            }
        }
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for MockDriver {
    fn navigate(&mut self, url: &str) -> ComprarResult<()> {
        self.guard_dialog("navigate")?;
        self.window_mut()?.url = url.to_string();
        self.current_frame = None;
        self.epoch += 1;
        Ok(())
    }

    fn current_url(&mut self) -> ComprarResult<String> {
        self.guard_dialog("currentUrl")?;
        Ok(self.window()?.url.clone())
    }

    fn find_elements(&mut self, locator: &Locator) -> ComprarResult<Vec<ElementHandle>> {
        self.guard_dialog("findElements")?;
        let epoch = self.epoch;
        let matches: Vec<(String, String, u32)> = self
            .context_elements()?
            .iter()
            .filter(|e| e.matches(locator))
            .map(|e| (e.id.clone(), e.tag_name.clone(), e.appears_after))
            .collect();
        let mut found = Vec::new();
        for (id, tag, appears_after) in matches {
            let count = self.query_counts.entry(id.clone()).or_insert(0);
            *count += 1;
            if *count > appears_after {
                found.push(ElementHandle::new(format!("{id}#{epoch}"), tag));
            }
        }
        Ok(found)
    }

    fn click(&mut self, element: &ElementHandle) -> ComprarResult<()> {
        self.guard_dialog("click")?;
        let element_id = self.resolve(element)?;
        let target = self.context_element_mut(&element_id)?;
        if !target.visible {
            return Err(ComprarError::driver(format!(
                "element {element_id} is not interactable"
            )));
        }
        self.clicks.push(element_id.clone());
        if let Some(effects) = self.click_effects.get(&element_id).cloned() {
            for effect in effects {
                self.apply_effect(effect);
            }
        }
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> ComprarResult<()> {
        self.guard_dialog("clear")?;
        let element_id = self.resolve(element)?;
        self.context_element_mut(&element_id)?.text = String::new();
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> ComprarResult<()> {
        self.guard_dialog("sendKeys")?;
        let element_id = self.resolve(element)?;
        let target = self.context_element_mut(&element_id)?;
        target.text.push_str(text);
        self.keys_sent.push((element_id, text.to_string()));
        Ok(())
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> ComprarResult<bool> {
        self.guard_dialog("isDisplayed")?;
        let element_id = self.resolve(element)?;
        Ok(self
            .context_elements()?
            .iter()
            .find(|e| e.id == element_id)
            .is_some_and(|e| e.visible))
    }

    fn get_text(&mut self, element: &ElementHandle) -> ComprarResult<String> {
        self.guard_dialog("getText")?;
        let element_id = self.resolve(element)?;
        self.context_elements()?
            .iter()
            .find(|e| e.id == element_id)
            .map(|e| e.text.clone())
            .ok_or_else(|| ComprarError::driver(format!("element {element_id} detached")))
    }

    fn list_window_handles(&mut self) -> ComprarResult<Vec<WindowHandle>> {
        Ok(self.windows.keys().cloned().collect())
    }

    fn current_window_handle(&mut self) -> ComprarResult<WindowHandle> {
        if self.windows.contains_key(&self.current_window) {
            Ok(self.current_window.clone())
        } else {
            Err(ComprarError::driver("no window selected"))
        }
    }

    fn switch_to_window(&mut self, handle: &WindowHandle) -> ComprarResult<()> {
        if !self.windows.contains_key(handle) {
            return Err(ComprarError::WindowNotFound {
                handle: handle.to_string(),
            });
        }
        self.current_window = handle.clone();
        self.current_frame = None;
        self.epoch += 1;
        Ok(())
    }

    fn switch_to_frame(&mut self, frame: &ElementHandle) -> ComprarResult<()> {
        self.guard_dialog("switchToFrame")?;
        let element_id = self.resolve(frame)?;
        if !self.window()?.frames.contains_key(&element_id) {
            return Err(ComprarError::driver(format!(
                "element {element_id} is not a frame"
            )));
        }
        self.current_frame = Some(element_id);
        self.epoch += 1;
        Ok(())
    }

    fn switch_to_default_content(&mut self) -> ComprarResult<()> {
        self.guard_dialog("switchToDefaultContent")?;
        self.current_frame = None;
        self.epoch += 1;
        Ok(())
    }

    fn close_current_window(&mut self) -> ComprarResult<()> {
        self.guard_dialog("closeCurrentWindow")?;
        let _ = self.windows.remove(&self.current_window);
        self.current_window = WindowHandle::new(NO_WINDOW);
        self.current_frame = None;
        self.epoch += 1;
        Ok(())
    }

    fn active_dialog_text(&mut self) -> ComprarResult<String> {
        self.dialog.clone().ok_or(ComprarError::NoDialog)
    }

    fn accept_dialog(&mut self) -> ComprarResult<()> {
        self.dialog.take().map(|_| ()).ok_or(ComprarError::NoDialog)
    }

    fn dismiss_dialog(&mut self) -> ComprarResult<()> {
        self.dialog.take().map(|_| ()).ok_or(ComprarError::NoDialog)
    }

    fn execute_script(
        &mut self,
        script: &str,
        args: &[serde_json::Value],
    ) -> ComprarResult<serde_json::Value> {
        self.guard_dialog("executeScript")?;
        match self.script_behaviors.get(script).cloned() {
            Some(ScriptBehavior::Return(value)) => Ok(value),
            Some(ScriptBehavior::SetElementText { element_id }) => {
                let text = args
                    .first()
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                self.context_element_mut(&element_id)?.text = text;
                Ok(serde_json::Value::Null)
            }
            None => Err(ComprarError::driver(format!(
                "no scripted behavior for: {script}"
            ))),
        }
    }

    fn close(&mut self) -> ComprarResult<()> {
        self.closed = true;
        self.windows.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod element_tests {
        use super::*;

        #[test]
        fn test_matches_by_id() {
            let element = MockElement::new("email", "input").with_css_id("Email");
            assert!(element.matches(&Locator::id("Email")));
            assert!(!element.matches(&Locator::id("Password")));
        }

        #[test]
        fn test_matches_css_shorthand() {
            let element = MockElement::new("qty", "span")
                .with_css_id("cart-count")
                .with_class("cart-qty");
            assert!(element.matches(&Locator::css("#cart-count")));
            assert!(element.matches(&Locator::css(".cart-qty")));
            assert!(element.matches(&Locator::css("span")));
            assert!(!element.matches(&Locator::css(".other")));
        }

        #[test]
        fn test_matches_registered_css() {
            let element =
                MockElement::new("login", "input").matching_css("input[value='Log in']");
            assert!(element.matches(&Locator::css("input[value='Log in']")));
        }

        #[test]
        fn test_matches_link_text_and_tag() {
            let element = MockElement::new("logout", "a").with_link_text("Log out");
            assert!(element.matches(&Locator::link_text("Log out")));
            assert!(element.matches(&Locator::tag_name("a")));
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_appears_after_misses_then_hits() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("toast", "div").appears_after(2));
            let mut driver = MockDriver::with_window(window);
            let locator = Locator::tag_name("div");
            assert!(driver.find_elements(&locator).unwrap().is_empty());
            assert!(driver.find_elements(&locator).unwrap().is_empty());
            assert_eq!(driver.find_elements(&locator).unwrap().len(), 1);
        }

        #[test]
        fn test_handles_go_stale_across_navigation() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("btn", "button"));
            let mut driver = MockDriver::with_window(window);
            let handle = driver
                .find_elements(&Locator::tag_name("button"))
                .unwrap()
                .remove(0);
            driver.navigate("http://shop.test/next").unwrap();
            let err = driver.click(&handle).unwrap_err();
            assert!(err.to_string().contains("stale"));
        }
    }

    mod window_tests {
        use super::*;

        #[test]
        fn test_switch_to_unknown_window_fails() {
            let mut driver = MockDriver::new();
            let err = driver
                .switch_to_window(&WindowHandle::new("ghost"))
                .unwrap_err();
            assert!(matches!(err, ComprarError::WindowNotFound { .. }));
        }

        #[test]
        fn test_close_then_switch_recovers() {
            let mut driver = MockDriver::new();
            let main = WindowHandle::new("main");
            let popup = WindowHandle::new("popup");
            driver
                .windows
                .insert(popup.clone(), MockWindow::new("http://shop.test/popup"));
            driver.switch_to_window(&popup).unwrap();
            driver.close_current_window().unwrap();
            assert!(driver.current_window_handle().is_err());
            driver.switch_to_window(&main).unwrap();
            assert_eq!(driver.current_window_handle().unwrap(), main);
        }
    }

    mod dialog_tests {
        use super::*;

        #[test]
        fn test_dialog_blocks_commands_until_accepted() {
            let mut driver = MockDriver::new();
            driver.raise_dialog("Please enter some search keyword");
            assert!(driver.current_url().is_err());
            assert_eq!(
                driver.active_dialog_text().unwrap(),
                "Please enter some search keyword"
            );
            driver.accept_dialog().unwrap();
            assert!(driver.current_url().is_ok());
        }

        #[test]
        fn test_dialog_ops_without_dialog_fail_with_no_dialog() {
            let mut driver = MockDriver::new();
            assert!(matches!(
                driver.active_dialog_text().unwrap_err(),
                ComprarError::NoDialog
            ));
            assert!(matches!(
                driver.accept_dialog().unwrap_err(),
                ComprarError::NoDialog
            ));
            assert!(matches!(
                driver.dismiss_dialog().unwrap_err(),
                ComprarError::NoDialog
            ));
        }
    }

    mod script_tests {
        use super::*;

        #[test]
        fn test_scripted_return() {
            let mut driver = MockDriver::new();
            driver.on_script(
                "return document.querySelectorAll('.product-item').length;",
                ScriptBehavior::Return(serde_json::json!(4)),
            );
            let value = driver
                .execute_script(
                    "return document.querySelectorAll('.product-item').length;",
                    &[],
                )
                .unwrap();
            assert_eq!(value, serde_json::json!(4));
        }

        #[test]
        fn test_scripted_set_text_uses_first_arg() {
            let window = MockWindow::new("http://shop.test/")
                .with_element(MockElement::new("body", "body").with_text("original"));
            let mut driver = MockDriver::with_window(window);
            driver.on_script(
                "document.body.innerText = arguments[0];",
                ScriptBehavior::SetElementText {
                    element_id: "body".to_string(),
                },
            );
            driver
                .execute_script(
                    "document.body.innerText = arguments[0];",
                    &[serde_json::json!("tampered")],
                )
                .unwrap();
            let handle = driver
                .find_elements(&Locator::tag_name("body"))
                .unwrap()
                .remove(0);
            assert_eq!(driver.get_text(&handle).unwrap(), "tampered");
        }

        #[test]
        fn test_unknown_script_is_a_driver_error() {
            let mut driver = MockDriver::new();
            assert!(driver.execute_script("alert(1)", &[]).is_err());
        }
    }
}
