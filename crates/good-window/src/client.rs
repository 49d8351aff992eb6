//! The embedded client window.
//!
//! A [`GoodWindow`](crate::GoodWindow) hosts the application's widget tree
//! through the [`ClientWindow`] trait. The chrome forwards toolkit-level
//! events to it, asks it to confirm closes, and restores keyboard focus
//! inside it after activation changes.

use parking_lot::Mutex;

use crate::geometry::{Point, Size};
use crate::state::WindowState;

/// Opaque identifier of a focusable widget inside the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusId(pub u64);

/// Toolkit-level events synthesized by the chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClientEvent {
    /// The window became visible.
    Show,
    /// The window was hidden.
    Hide,
    /// The client area was resized (logical pixels).
    Resize(Size),
    /// The window moved (physical desktop coordinates).
    Move(Point),
    /// The canonical window state changed.
    WindowStateChange {
        /// Previous state.
        old: WindowState,
        /// New state.
        new: WindowState,
    },
    /// The window gained or lost activation.
    ActivationChange(bool),
    /// The window was enabled or disabled.
    EnabledChange(bool),
    /// The dark/light theme or compositor border mode changed.
    ThemeChange {
        /// Dark theme in effect.
        is_dark: bool,
    },
    /// The pixel ratio changed.
    ScaleChange(f64),
}

/// A cancelable close request.
///
/// Starts accepted; a client vetoes the close with [`ignore`](Self::ignore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseEvent {
    accepted: bool,
}

impl Default for CloseEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl CloseEvent {
    /// A new, accepted close event.
    pub fn new() -> Self {
        Self { accepted: true }
    }

    /// Let the close proceed.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Veto the close; the window stays open.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }

    /// Whether the close will proceed.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }
}

/// The application's content hosted inside the chrome.
///
/// Every method has a no-op default so simple clients only implement what
/// they care about.
pub trait ClientWindow: Send + Sync {
    /// A toolkit event for the client.
    fn event(&self, _event: &ClientEvent) {}

    /// Confirm or veto a close.
    fn close_event(&self, _event: &mut CloseEvent) {}

    /// The widget that currently has keyboard focus.
    fn focused_widget(&self) -> Option<FocusId> {
        None
    }

    /// Move focus to `widget`. Returns false when it can no longer take focus.
    fn set_focus(&self, _widget: FocusId) -> bool {
        false
    }

    /// The first widget in tab order that accepts focus.
    fn first_focusable(&self) -> Option<FocusId> {
        None
    }

    /// Give focus to the root of the widget tree.
    fn focus_root(&self) {}
}

/// A client with no content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClient;

impl ClientWindow for NullClient {}

/// Where focus went after an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRestore {
    /// The widget focused before deactivation.
    Remembered(FocusId),
    /// The first focusable widget.
    FirstFocusable(FocusId),
    /// The root of the widget tree.
    Root,
}

/// Remembers the focused widget across a deactivation.
#[derive(Debug, Default)]
pub struct FocusMemory {
    remembered: Mutex<Option<FocusId>>,
}

impl FocusMemory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the client's focused widget.
    pub fn remember(&self, client: &dyn ClientWindow) {
        *self.remembered.lock() = client.focused_widget();
    }

    /// The recorded widget, if any.
    pub fn remembered(&self) -> Option<FocusId> {
        *self.remembered.lock()
    }

    /// Restore focus: remembered widget, else first focusable, else root.
    pub fn restore(&self, client: &dyn ClientWindow) -> FocusRestore {
        let remembered = self.remembered.lock().take();
        if let Some(widget) = remembered
            && client.set_focus(widget)
        {
            return FocusRestore::Remembered(widget);
        }
        if let Some(widget) = client.first_focusable()
            && client.set_focus(widget)
        {
            return FocusRestore::FirstFocusable(widget);
        }
        client.focus_root();
        FocusRestore::Root
    }

    /// Forget the recorded widget.
    pub fn clear(&self) {
        *self.remembered.lock() = None;
    }
}
