//! An in-memory native window.
//!
//! `HeadlessWindow` applies every request synchronously to a plain state
//! record, the way a cooperative window manager would: maximizing fills the
//! work area of the nearest screen, full screen covers the whole screen and
//! restoring brings back the normal frame. Tests inspect the record through
//! [`HeadlessWindow::state`] and script user choices (system menu picks) and
//! platform quirks (compositor borders, invisible maximized border).

use parking_lot::Mutex;
use winit::window::{CursorIcon, ResizeDirection};

use good_window_core::logging::targets;

use super::{NativeTopLevelWindow, NativeWindowError};
use crate::geometry::{Point, Rect, Size};
use crate::screen::{Screen, ScreenId, ScreenSet};
use crate::state::WindowState;
use crate::system_menu::{SystemMenu, SystemMenuItem};

/// Observable state of a [`HeadlessWindow`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessState {
    /// Current outer frame.
    pub frame: Rect,
    /// Frame to return to when leaving maximized/full screen.
    pub normal_frame: Rect,
    /// Visible.
    pub visible: bool,
    /// Accepts input.
    pub enabled: bool,
    /// Has focus.
    pub focused: bool,
    /// Minimized.
    pub minimized: bool,
    /// Maximized.
    pub maximized: bool,
    /// Full screen.
    pub full_screen: bool,
    /// Title.
    pub title: String,
    /// Minimum size.
    pub min_size: Option<Size>,
    /// Maximum size.
    pub max_size: Option<Size>,
    /// Current cursor.
    pub cursor: CursorIcon,
    /// Interactive moves started.
    pub drag_moves: usize,
    /// Interactive resizes started.
    pub drag_resizes: Vec<ResizeDirection>,
    /// System menus shown, with their anchor point.
    pub menus_shown: Vec<(SystemMenu, Point)>,
    /// Native resources destroyed.
    pub destroyed: bool,
}

struct Platform {
    screens: Vec<Screen>,
    scale_factor: f64,
    borders_drawn_by_system: bool,
    invisible_border: i32,
    menu_choice: Option<SystemMenuItem>,
}

/// A native window without a windowing system.
pub struct HeadlessWindow {
    state: Mutex<HeadlessState>,
    platform: Mutex<Platform>,
}

impl HeadlessWindow {
    /// A hidden window with the given frame on a single 1920x1080 screen
    /// whose work area excludes a 40 px taskbar.
    pub fn new(frame: Rect) -> Self {
        let screen = Screen::new(
            ScreenId::new(1),
            "Headless",
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1040),
            1.0,
            true,
        );
        Self {
            state: Mutex::new(HeadlessState {
                frame,
                normal_frame: frame,
                visible: false,
                enabled: true,
                focused: false,
                minimized: false,
                maximized: false,
                full_screen: false,
                title: String::new(),
                min_size: None,
                max_size: None,
                cursor: CursorIcon::Default,
                drag_moves: 0,
                drag_resizes: Vec::new(),
                menus_shown: Vec::new(),
                destroyed: false,
            }),
            platform: Mutex::new(Platform {
                screens: vec![screen],
                scale_factor: 1.0,
                borders_drawn_by_system: false,
                invisible_border: 0,
                menu_choice: None,
            }),
        }
    }

    /// Replace the connected screens.
    pub fn with_screens(self, screens: Vec<Screen>) -> Self {
        self.platform.lock().screens = screens;
        self
    }

    /// Snapshot of the window record.
    pub fn state(&self) -> HeadlessState {
        self.state.lock().clone()
    }

    /// Set the reported scale factor.
    pub fn set_scale_factor(&self, scale: f64) {
        self.platform.lock().scale_factor = scale;
    }

    /// Pretend the compositor draws (or stops drawing) the borders.
    pub fn set_borders_drawn_by_system(&self, drawn: bool) {
        self.platform.lock().borders_drawn_by_system = drawn;
    }

    /// Invisible border added around the frame while maximized.
    pub fn set_invisible_border(&self, border: i32) {
        self.platform.lock().invisible_border = border.max(0);
    }

    /// The item the "user" picks the next time the system menu opens.
    pub fn set_menu_choice(&self, item: Option<SystemMenuItem>) {
        self.platform.lock().menu_choice = item;
    }

    /// Replace the connected screens at runtime.
    pub fn set_screens(&self, screens: Vec<Screen>) {
        self.platform.lock().screens = screens;
    }

    /// Move the frame as the window manager would during a user drag.
    pub fn move_frame(&self, frame: Rect) {
        let mut state = self.state.lock();
        state.frame = frame;
        if !state.maximized && !state.full_screen {
            state.normal_frame = frame;
        }
    }

    fn screen_for(&self, frame: &Rect) -> Option<Screen> {
        self.platform.lock().screens.nearest_to(frame).cloned()
    }

    fn apply_layout(&self) {
        let (maximized, full_screen, normal) = {
            let state = self.state.lock();
            (state.maximized, state.full_screen, state.normal_frame)
        };
        let frame = match self.screen_for(&normal) {
            Some(screen) if full_screen => screen.geometry(),
            Some(screen) if maximized => {
                let b = self.invisible_maximized_border();
                screen.work_area().adjusted(-b, -b, b, b)
            }
            _ => normal,
        };
        self.state.lock().frame = frame;
    }
}

impl NativeTopLevelWindow for HeadlessWindow {
    fn show(&self) {
        self.state.lock().visible = true;
    }

    fn hide(&self) {
        self.state.lock().visible = false;
    }

    fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    fn focus(&self) {
        self.state.lock().focused = true;
    }

    fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    fn outer_frame(&self) -> Rect {
        self.state.lock().frame
    }

    fn set_outer_frame(&self, frame: Rect) {
        let mut state = self.state.lock();
        let mut frame = frame;
        if let Some(min) = state.min_size {
            frame.width = frame.width.max(min.width);
            frame.height = frame.height.max(min.height);
        }
        if let Some(max) = state.max_size {
            frame.width = frame.width.min(max.width);
            frame.height = frame.height.min(max.height);
        }
        state.normal_frame = frame;
        if !state.maximized && !state.full_screen {
            state.frame = frame;
        }
    }

    fn set_min_size(&self, size: Option<Size>) {
        self.state.lock().min_size = size;
    }

    fn set_max_size(&self, size: Option<Size>) {
        self.state.lock().max_size = size;
    }

    fn scale_factor(&self) -> f64 {
        self.platform.lock().scale_factor
    }

    fn screens(&self) -> Vec<Screen> {
        self.platform.lock().screens.clone()
    }

    fn invisible_maximized_border(&self) -> i32 {
        let platform = self.platform.lock();
        if platform.borders_drawn_by_system {
            0
        } else {
            platform.invisible_border
        }
    }

    fn borders_drawn_by_system(&self) -> bool {
        self.platform.lock().borders_drawn_by_system
    }

    fn set_title(&self, title: &str) {
        self.state.lock().title = title.to_string();
    }

    fn set_minimized(&self, minimized: bool) {
        self.state.lock().minimized = minimized;
    }

    fn set_maximized(&self, maximized: bool) {
        {
            let mut state = self.state.lock();
            state.maximized = maximized;
            state.minimized = false;
            if maximized {
                state.full_screen = false;
            }
        }
        self.apply_layout();
    }

    fn set_full_screen(&self, full_screen: bool) {
        {
            let mut state = self.state.lock();
            state.full_screen = full_screen;
            state.minimized = false;
            if full_screen {
                state.maximized = false;
            }
        }
        self.apply_layout();
    }

    fn native_state(&self) -> WindowState {
        let state = self.state.lock();
        if state.destroyed {
            WindowState::Closed
        } else if state.minimized {
            WindowState::Minimized
        } else if state.full_screen {
            WindowState::FullScreen
        } else if state.maximized {
            WindowState::Maximized
        } else {
            WindowState::NoState
        }
    }

    fn begin_drag_move(&self) -> Result<(), NativeWindowError> {
        let mut state = self.state.lock();
        if state.destroyed {
            return Err(NativeWindowError::Destroyed);
        }
        state.drag_moves += 1;
        Ok(())
    }

    fn begin_drag_resize(&self, direction: ResizeDirection) -> Result<(), NativeWindowError> {
        let mut state = self.state.lock();
        if state.destroyed {
            return Err(NativeWindowError::Destroyed);
        }
        state.drag_resizes.push(direction);
        Ok(())
    }

    fn set_cursor(&self, cursor: CursorIcon) {
        self.state.lock().cursor = cursor;
    }

    fn show_system_menu(&self, menu: &SystemMenu, at: Point) -> Option<SystemMenuItem> {
        self.state.lock().menus_shown.push((menu.clone(), at));
        self.platform.lock().menu_choice.take()
    }

    fn destroy(&self) {
        let mut state = self.state.lock();
        if !state.destroyed {
            tracing::debug!(target: targets::NATIVE, "headless window destroyed");
            state.destroyed = true;
            state.visible = false;
        }
    }
}

impl<T: NativeTopLevelWindow + ?Sized> NativeTopLevelWindow for std::sync::Arc<T> {
    fn show(&self) {
        (**self).show()
    }
    fn hide(&self) {
        (**self).hide()
    }
    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }
    fn focus(&self) {
        (**self).focus()
    }
    fn set_enabled(&self, enabled: bool) {
        (**self).set_enabled(enabled)
    }
    fn outer_frame(&self) -> Rect {
        (**self).outer_frame()
    }
    fn set_outer_frame(&self, frame: Rect) {
        (**self).set_outer_frame(frame)
    }
    fn set_min_size(&self, size: Option<Size>) {
        (**self).set_min_size(size)
    }
    fn set_max_size(&self, size: Option<Size>) {
        (**self).set_max_size(size)
    }
    fn scale_factor(&self) -> f64 {
        (**self).scale_factor()
    }
    fn screens(&self) -> Vec<Screen> {
        (**self).screens()
    }
    fn invisible_maximized_border(&self) -> i32 {
        (**self).invisible_maximized_border()
    }
    fn borders_drawn_by_system(&self) -> bool {
        (**self).borders_drawn_by_system()
    }
    fn set_title(&self, title: &str) {
        (**self).set_title(title)
    }
    fn set_minimized(&self, minimized: bool) {
        (**self).set_minimized(minimized)
    }
    fn set_maximized(&self, maximized: bool) {
        (**self).set_maximized(maximized)
    }
    fn set_full_screen(&self, full_screen: bool) {
        (**self).set_full_screen(full_screen)
    }
    fn native_state(&self) -> WindowState {
        (**self).native_state()
    }
    fn begin_drag_move(&self) -> Result<(), NativeWindowError> {
        (**self).begin_drag_move()
    }
    fn begin_drag_resize(&self, direction: ResizeDirection) -> Result<(), NativeWindowError> {
        (**self).begin_drag_resize(direction)
    }
    fn set_cursor(&self, cursor: CursorIcon) {
        (**self).set_cursor(cursor)
    }
    fn show_system_menu(&self, menu: &SystemMenu, at: Point) -> Option<SystemMenuItem> {
        (**self).show_system_menu(menu, at)
    }
    fn destroy(&self) {
        (**self).destroy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximize_fills_work_area_and_restores() {
        let window = HeadlessWindow::new(Rect::new(100, 100, 800, 600));
        window.set_maximized(true);
        assert_eq!(window.outer_frame(), Rect::new(0, 0, 1920, 1040));
        assert_eq!(window.native_state(), WindowState::Maximized);
        window.set_maximized(false);
        assert_eq!(window.outer_frame(), Rect::new(100, 100, 800, 600));
        assert_eq!(window.native_state(), WindowState::NoState);
    }

    #[test]
    fn test_invisible_border_grows_maximized_frame() {
        let window = HeadlessWindow::new(Rect::new(100, 100, 800, 600));
        window.set_invisible_border(8);
        window.set_maximized(true);
        assert_eq!(window.outer_frame(), Rect::new(-8, -8, 1936, 1056));
    }

    #[test]
    fn test_full_screen_covers_screen() {
        let window = HeadlessWindow::new(Rect::new(100, 100, 800, 600));
        window.set_full_screen(true);
        assert_eq!(window.outer_frame(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(window.native_state(), WindowState::FullScreen);
    }

    #[test]
    fn test_size_constraints() {
        let window = HeadlessWindow::new(Rect::new(0, 0, 800, 600));
        window.set_min_size(Some(Size::new(400, 300)));
        window.set_max_size(Some(Size::new(1000, 700)));
        window.set_outer_frame(Rect::new(0, 0, 100, 2000));
        assert_eq!(window.outer_frame(), Rect::new(0, 0, 400, 700));
    }

    #[test]
    fn test_scripted_menu_choice_is_consumed() {
        let window = HeadlessWindow::new(Rect::new(0, 0, 800, 600));
        let menu = SystemMenu::for_state(WindowState::NoState, Default::default());
        window.set_menu_choice(Some(SystemMenuItem::Close));
        assert_eq!(window.show_system_menu(&menu, Point::new(0, 30)), Some(SystemMenuItem::Close));
        assert_eq!(window.show_system_menu(&menu, Point::new(0, 30)), None);
        assert_eq!(window.state().menus_shown.len(), 2);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let window = HeadlessWindow::new(Rect::new(0, 0, 800, 600));
        window.show();
        window.destroy();
        window.destroy();
        assert!(window.state().destroyed);
        assert!(!window.is_visible());
        assert_eq!(window.begin_drag_move(), Err(NativeWindowError::Destroyed));
    }
}
