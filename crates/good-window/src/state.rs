//! Canonical window state.

/// The authoritative state of a [`GoodWindow`](crate::GoodWindow).
///
/// Exactly one value per window, mutated only by the lifecycle controller.
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowState {
    /// Normal (restored) window.
    #[default]
    NoState,
    /// Minimized to the taskbar/dock.
    Minimized,
    /// Maximized to the monitor work area.
    Maximized,
    /// Covering the whole monitor without decorations.
    FullScreen,
    /// Closed; no further geometry or paint operations are valid.
    Closed,
}

impl WindowState {
    /// True for the normal (restored) state.
    pub fn is_normal(self) -> bool {
        self == Self::NoState
    }

    /// True once the window has been closed.
    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }
}

/// Which axes of a window are fixed (`min == max`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedSize {
    /// Minimum and maximum width are equal.
    pub width: bool,
    /// Minimum and maximum height are equal.
    pub height: bool,
}

impl FixedSize {
    /// Neither axis fixed.
    pub const NONE: Self = Self {
        width: false,
        height: false,
    };

    /// Both axes fixed.
    pub const BOTH: Self = Self {
        width: true,
        height: true,
    };

    /// True when at least one axis is fixed.
    pub fn any(self) -> bool {
        self.width || self.height
    }

    /// True when the whole window is fixed-size.
    pub fn all(self) -> bool {
        self.width && self.height
    }
}
