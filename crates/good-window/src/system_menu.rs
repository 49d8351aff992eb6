//! The window's system menu.
//!
//! Opened from the window icon, by right-clicking the caption, or with
//! Alt+Space. Item enablement is a pure function of the window state and its
//! fixed-size axes.

use crate::state::{FixedSize, WindowState};

/// An entry of the system menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemMenuItem {
    /// Restore a maximized or minimized window.
    Restore,
    /// Keyboard/pointer move.
    Move,
    /// Keyboard/pointer resize.
    Size,
    /// Minimize.
    Minimize,
    /// Maximize.
    Maximize,
    /// Close.
    Close,
}

impl SystemMenuItem {
    /// All items in menu order.
    pub const ALL: [SystemMenuItem; 6] = [
        Self::Restore,
        Self::Move,
        Self::Size,
        Self::Minimize,
        Self::Maximize,
        Self::Close,
    ];

    /// Menu label, with the mnemonic marked by `&`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Restore => "&Restore",
            Self::Move => "&Move",
            Self::Size => "&Size",
            Self::Minimize => "Mi&nimize",
            Self::Maximize => "Ma&ximize",
            Self::Close => "&Close",
        }
    }
}

/// A command the window executes on behalf of the system menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemCommand {
    /// Return to the normal state.
    Restore,
    /// Start an interactive move.
    Move,
    /// Start an interactive resize.
    Size,
    /// Minimize the window.
    Minimize,
    /// Maximize the window.
    Maximize,
    /// Request a (cancelable) close.
    Close,
}

impl From<SystemMenuItem> for SystemCommand {
    fn from(item: SystemMenuItem) -> Self {
        match item {
            SystemMenuItem::Restore => Self::Restore,
            SystemMenuItem::Move => Self::Move,
            SystemMenuItem::Size => Self::Size,
            SystemMenuItem::Minimize => Self::Minimize,
            SystemMenuItem::Maximize => Self::Maximize,
            SystemMenuItem::Close => Self::Close,
        }
    }
}

/// One menu line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemMenuEntry {
    /// The item.
    pub item: SystemMenuItem,
    /// Whether it can be chosen.
    pub enabled: bool,
}

/// The system menu for a given window state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemMenu {
    entries: Vec<SystemMenuEntry>,
}

impl SystemMenu {
    /// Build the menu with enablement derived from `state` and `fixed`.
    pub fn for_state(state: WindowState, fixed: FixedSize) -> Self {
        let maximized = state == WindowState::Maximized;
        let minimized = state == WindowState::Minimized;
        let full_screen = state == WindowState::FullScreen;

        let entries = SystemMenuItem::ALL
            .iter()
            .map(|&item| {
                let enabled = match item {
                    SystemMenuItem::Restore => maximized || minimized,
                    SystemMenuItem::Move => !maximized && !full_screen,
                    SystemMenuItem::Size => !maximized && !full_screen && !fixed.all(),
                    SystemMenuItem::Minimize => !minimized,
                    SystemMenuItem::Maximize => !maximized && !fixed.any(),
                    SystemMenuItem::Close => true,
                };
                SystemMenuEntry { item, enabled }
            })
            .collect();

        Self { entries }
    }

    /// Menu lines in order.
    pub fn entries(&self) -> &[SystemMenuEntry] {
        &self.entries
    }

    /// Whether `item` can be chosen.
    pub fn is_enabled(&self, item: SystemMenuItem) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.item == item && entry.enabled)
    }

    /// Translate a choice into a command; disabled items yield nothing.
    pub fn command_for(&self, item: SystemMenuItem) -> Option<SystemCommand> {
        self.is_enabled(item).then(|| item.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(menu: &SystemMenu) -> Vec<SystemMenuItem> {
        menu.entries()
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.item)
            .collect()
    }

    #[test]
    fn test_normal_window() {
        let menu = SystemMenu::for_state(WindowState::NoState, FixedSize::NONE);
        assert_eq!(
            enabled(&menu),
            vec![
                SystemMenuItem::Move,
                SystemMenuItem::Size,
                SystemMenuItem::Minimize,
                SystemMenuItem::Maximize,
                SystemMenuItem::Close
            ]
        );
    }

    #[test]
    fn test_maximized_window() {
        let menu = SystemMenu::for_state(WindowState::Maximized, FixedSize::NONE);
        assert_eq!(
            enabled(&menu),
            vec![SystemMenuItem::Restore, SystemMenuItem::Minimize, SystemMenuItem::Close]
        );
    }

    #[test]
    fn test_minimized_window() {
        let menu = SystemMenu::for_state(WindowState::Minimized, FixedSize::NONE);
        assert!(menu.is_enabled(SystemMenuItem::Restore));
        assert!(!menu.is_enabled(SystemMenuItem::Minimize));
    }

    #[test]
    fn test_fixed_size_window() {
        let menu = SystemMenu::for_state(WindowState::NoState, FixedSize::BOTH);
        assert!(!menu.is_enabled(SystemMenuItem::Maximize));
        assert!(!menu.is_enabled(SystemMenuItem::Size));
        assert!(menu.is_enabled(SystemMenuItem::Move));

        let one_axis = FixedSize {
            width: true,
            height: false,
        };
        let menu = SystemMenu::for_state(WindowState::NoState, one_axis);
        assert!(!menu.is_enabled(SystemMenuItem::Maximize));
        assert!(menu.is_enabled(SystemMenuItem::Size));
    }

    #[test]
    fn test_command_for_disabled_item() {
        let menu = SystemMenu::for_state(WindowState::Maximized, FixedSize::NONE);
        assert_eq!(menu.command_for(SystemMenuItem::Maximize), None);
        assert_eq!(
            menu.command_for(SystemMenuItem::Restore),
            Some(SystemCommand::Restore)
        );
    }
}
