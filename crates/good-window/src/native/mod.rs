//! Native top-level window backends.
//!
//! The chrome never talks to a concrete platform window. Everything it needs
//! from the operating system goes through [`NativeTopLevelWindow`], with one
//! implementation per backend:
//!
//! - [`WinitWindow`]: a borderless winit window (all desktop platforms)
//! - [`HeadlessWindow`]: an in-memory window for tests and offscreen use
//!
//! Backends also translate their raw notifications into
//! [`PlatformMessage`](crate::PlatformMessage)s; see [`WinitTranslator`].

mod headless;
#[cfg(target_os = "windows")]
pub mod win32;
mod winit_backend;

use std::fmt;

use winit::window::{CursorIcon, ResizeDirection};

use crate::geometry::{Point, Rect, Size};
use crate::screen::Screen;
use crate::state::WindowState;
use crate::system_menu::{SystemMenu, SystemMenuItem};

pub use headless::{HeadlessState, HeadlessWindow};
pub use winit_backend::{WinitTranslator, WinitWindow};

/// Errors from native window operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeWindowError {
    /// Failed to create the window.
    CreationFailed(String),
    /// The window has been destroyed.
    Destroyed,
    /// The window position is not available on this platform.
    PositionUnavailable,
    /// The platform does not support the operation.
    Unsupported(String),
}

impl fmt::Display for NativeWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreationFailed(msg) => write!(f, "failed to create window: {}", msg),
            Self::Destroyed => write!(f, "window has been destroyed"),
            Self::PositionUnavailable => write!(f, "window position is not available"),
            Self::Unsupported(what) => write!(f, "operation not supported: {}", what),
        }
    }
}

impl std::error::Error for NativeWindowError {}

/// The platform window hosting a chrome.
///
/// All geometry is physical pixels in desktop coordinates. Methods take
/// `&self`; implementations keep their own interior state.
pub trait NativeTopLevelWindow: Send + Sync {
    // =========================================================================
    // Visibility
    // =========================================================================

    /// Make the window visible.
    fn show(&self);

    /// Hide the window.
    fn hide(&self);

    /// Whether the window is visible.
    fn is_visible(&self) -> bool;

    /// Give the window keyboard focus and bring it to the front.
    fn focus(&self);

    /// Enable or disable input to the window.
    fn set_enabled(&self, enabled: bool);

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Outer frame in desktop coordinates.
    fn outer_frame(&self) -> Rect;

    /// Move and resize the outer frame.
    fn set_outer_frame(&self, frame: Rect);

    /// Minimum size, or none.
    fn set_min_size(&self, size: Option<Size>);

    /// Maximum size, or none.
    fn set_max_size(&self, size: Option<Size>);

    /// Monitor scale factor.
    fn scale_factor(&self) -> f64;

    /// Connected screens.
    fn screens(&self) -> Vec<Screen>;

    /// Extra invisible pixels the platform adds around a maximized window
    /// when it draws the frame itself.
    fn invisible_maximized_border(&self) -> i32 {
        0
    }

    /// Whether the compositor draws the window's borders and shadow.
    fn borders_drawn_by_system(&self) -> bool {
        false
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Set the window title.
    fn set_title(&self, title: &str);

    /// Minimize or un-minimize.
    fn set_minimized(&self, minimized: bool);

    /// Maximize or restore.
    fn set_maximized(&self, maximized: bool);

    /// Enter or leave full screen.
    fn set_full_screen(&self, full_screen: bool);

    /// The state as the window manager sees it.
    fn native_state(&self) -> WindowState;

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Start an interactive move with the pressed pointer.
    fn begin_drag_move(&self) -> Result<(), NativeWindowError>;

    /// Start an interactive resize with the pressed pointer.
    fn begin_drag_resize(&self, direction: ResizeDirection) -> Result<(), NativeWindowError>;

    /// Change the pointer cursor.
    fn set_cursor(&self, cursor: CursorIcon);

    /// Show the system menu and block until the user picks an item.
    ///
    /// Backends that can only show the platform's own menu return `None`.
    fn show_system_menu(&self, menu: &SystemMenu, at: Point) -> Option<SystemMenuItem>;

    /// Destroy the native resources. Further calls are no-ops.
    fn destroy(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NativeWindowError::CreationFailed("no display".into());
        assert_eq!(err.to_string(), "failed to create window: no display");
        assert_eq!(
            NativeWindowError::Unsupported("drag".into()).to_string(),
            "operation not supported: drag"
        );
    }
}
