//! Platform-neutral window messages.
//!
//! Native backends translate their raw notifications (winit `WindowEvent`s,
//! Win32 messages) into [`PlatformMessage`] values and feed them to
//! [`GoodWindow::handle_message`](crate::GoodWindow::handle_message). All
//! points are physical desktop coordinates.

use crate::geometry::{Point, Size};
use crate::hit_test::RegionCode;
use crate::state::WindowState;

/// Pointer button of a press/release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left (or primary) button.
    Primary,
    /// Right (or secondary) button.
    Secondary,
    /// Middle button.
    Middle,
}

/// A notification from the window manager or input system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformMessage {
    /// Non-client hit-test query.
    HitTest {
        /// Queried point.
        point: Point,
        /// The query came from an embedded child window.
        from_child: bool,
    },
    /// The pointer moved over the window.
    PointerMoved(Point),
    /// The pointer left the window.
    PointerLeft,
    /// A pointer button went down.
    PointerPressed {
        /// Pointer position.
        point: Point,
        /// Which button.
        button: PointerButton,
    },
    /// A pointer button went up.
    PointerReleased {
        /// Pointer position.
        point: Point,
        /// Which button.
        button: PointerButton,
    },
    /// The window gained (`true`) or lost activation.
    Activated(bool),
    /// The outer frame moved to a new origin.
    Moved(Point),
    /// The outer frame was resized.
    Resized(Size),
    /// The window manager changed the window state.
    StateChanged(WindowState),
    /// The monitor pixel ratio changed.
    ScaleFactorChanged(f64),
    /// The system theme changed.
    ThemeChanged,
    /// Desktop composition (compositor-drawn borders) was toggled.
    CompositionChanged,
    /// The user asked to close the window.
    CloseRequested,
    /// The system menu was requested, optionally at a point (Alt+Space has none).
    SystemMenuRequested(Option<Point>),
    /// The native window was destroyed behind our back.
    Destroyed,
}

/// The window procedure's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageResult {
    /// Answer to a hit-test query.
    HitTest(RegionCode),
    /// Answer to a child hit-test over decorations: let the parent classify.
    Transparent,
    /// The chrome consumed the message.
    Handled,
    /// The message is not the chrome's business (or the window is closed).
    Ignored,
}

impl MessageResult {
    /// True unless the message was ignored.
    pub fn is_handled(self) -> bool {
        self != Self::Ignored
    }
}
