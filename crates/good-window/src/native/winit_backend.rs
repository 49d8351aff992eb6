//! Borderless winit window backend.
//!
//! [`WinitWindow`] wraps an undecorated, transparent winit window and maps
//! the [`NativeTopLevelWindow`] requests onto it. [`WinitTranslator`] turns
//! the window's `WindowEvent`s into [`PlatformMessage`]s, tracking the
//! cursor position and keyboard modifiers that winit reports separately.
//!
//! ```ignore
//! use winit::event::WindowEvent;
//! use good_window::native::{WinitTranslator, WinitWindow};
//!
//! // In ApplicationHandler::resumed:
//! let window = good_window::GoodWindow::builder(dispatcher, theme)
//!     .build(|| Ok(Box::new(WinitWindow::create(event_loop, "Editor", Size::new(1024, 768))?)))?;
//!
//! // In ApplicationHandler::window_event:
//! if let Some(message) = translator.translate(&event, window.frame_geometry().origin()) {
//!     window.handle_message(message);
//! }
//! dispatcher.process(Instant::now());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{CursorIcon, Fullscreen, ResizeDirection, Window, WindowId};

use good_window_core::logging::targets;

use super::{NativeTopLevelWindow, NativeWindowError};
use crate::geometry::{Point, Rect, Size};
use crate::message::{PlatformMessage, PointerButton};
use crate::screen::{Screen, ScreenId};
use crate::state::WindowState;
use crate::system_menu::{SystemMenu, SystemMenuItem};

/// A borderless winit window.
pub struct WinitWindow {
    window: Mutex<Option<Arc<Window>>>,
    id: WindowId,
    enabled: AtomicBool,
}

impl WinitWindow {
    /// Create a hidden, undecorated window of `size` logical pixels.
    pub fn create(
        event_loop: &ActiveEventLoop,
        title: &str,
        size: Size,
    ) -> Result<Self, NativeWindowError> {
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_decorations(false)
            .with_transparent(true)
            .with_visible(false)
            .with_inner_size(LogicalSize::new(size.width.max(1), size.height.max(1)));
        let window = event_loop
            .create_window(attrs)
            .map_err(|e| NativeWindowError::CreationFailed(e.to_string()))?;
        tracing::debug!(target: targets::NATIVE, window_id = ?window.id(), "winit window created");
        Ok(Self::from_window(Arc::new(window)))
    }

    /// Wrap an existing winit window. It should be undecorated.
    pub fn from_window(window: Arc<Window>) -> Self {
        Self {
            id: window.id(),
            window: Mutex::new(Some(window)),
            enabled: AtomicBool::new(true),
        }
    }

    /// The winit window ID, for routing events.
    pub fn window_id(&self) -> WindowId {
        self.id
    }

    /// The wrapped winit window, until destroyed.
    pub fn winit_window(&self) -> Option<Arc<Window>> {
        self.window.lock().clone()
    }

    fn with<R>(&self, f: impl FnOnce(&Window) -> R) -> Option<R> {
        let window = self.window.lock().clone();
        window.as_deref().map(f)
    }
}

impl NativeTopLevelWindow for WinitWindow {
    fn show(&self) {
        self.with(|w| w.set_visible(true));
    }

    fn hide(&self) {
        self.with(|w| w.set_visible(false));
    }

    fn is_visible(&self) -> bool {
        self.with(|w| w.is_visible().unwrap_or(true))
            .unwrap_or(false)
    }

    fn focus(&self) {
        self.with(|w| w.focus_window());
    }

    fn set_enabled(&self, enabled: bool) {
        // winit has no input-enable toggle; the chrome stops routing input instead.
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn outer_frame(&self) -> Rect {
        self.with(|w| {
            let origin = w.outer_position().unwrap_or_default();
            let size = w.outer_size();
            Rect::new(origin.x, origin.y, size.width as i32, size.height as i32)
        })
        .unwrap_or_default()
    }

    fn set_outer_frame(&self, frame: Rect) {
        self.with(|w| {
            w.set_outer_position(PhysicalPosition::new(frame.x, frame.y));
            let _ = w.request_inner_size(PhysicalSize::new(
                frame.width.max(1) as u32,
                frame.height.max(1) as u32,
            ));
        });
    }

    fn set_min_size(&self, size: Option<Size>) {
        self.with(|w| {
            w.set_min_inner_size(size.map(|s| PhysicalSize::new(s.width.max(1) as u32, s.height.max(1) as u32)))
        });
    }

    fn set_max_size(&self, size: Option<Size>) {
        self.with(|w| {
            w.set_max_inner_size(size.map(|s| PhysicalSize::new(s.width.max(1) as u32, s.height.max(1) as u32)))
        });
    }

    fn scale_factor(&self) -> f64 {
        self.with(|w| w.scale_factor()).unwrap_or(1.0)
    }

    fn screens(&self) -> Vec<Screen> {
        self.with(|w| {
            let primary = w.primary_monitor();
            w.available_monitors()
                .enumerate()
                .map(|(index, monitor)| {
                    let position = monitor.position();
                    let size = monitor.size();
                    let geometry =
                        Rect::new(position.x, position.y, size.width as i32, size.height as i32);
                    let name = monitor
                        .name()
                        .unwrap_or_else(|| format!("Display {}", index + 1));
                    let is_primary = primary.as_ref() == Some(&monitor);
                    // winit does not expose work areas; the full geometry stands in.
                    Screen::new(
                        ScreenId::new(index as u64),
                        name,
                        geometry,
                        geometry,
                        monitor.scale_factor(),
                        is_primary,
                    )
                })
                .collect()
        })
        .unwrap_or_default()
    }

    #[cfg(target_os = "windows")]
    fn invisible_maximized_border(&self) -> i32 {
        super::win32::maximized_frame_border()
    }

    fn borders_drawn_by_system(&self) -> bool {
        cfg!(target_os = "macos")
    }

    fn set_title(&self, title: &str) {
        self.with(|w| w.set_title(title));
    }

    fn set_minimized(&self, minimized: bool) {
        self.with(|w| w.set_minimized(minimized));
    }

    fn set_maximized(&self, maximized: bool) {
        self.with(|w| w.set_maximized(maximized));
    }

    fn set_full_screen(&self, full_screen: bool) {
        self.with(|w| w.set_fullscreen(full_screen.then_some(Fullscreen::Borderless(None))));
    }

    fn native_state(&self) -> WindowState {
        self.with(|w| {
            if w.is_minimized() == Some(true) {
                WindowState::Minimized
            } else if w.fullscreen().is_some() {
                WindowState::FullScreen
            } else if w.is_maximized() {
                WindowState::Maximized
            } else {
                WindowState::NoState
            }
        })
        .unwrap_or(WindowState::Closed)
    }

    fn begin_drag_move(&self) -> Result<(), NativeWindowError> {
        self.with(|w| w.drag_window())
            .ok_or(NativeWindowError::Destroyed)?
            .map_err(|e| NativeWindowError::Unsupported(e.to_string()))
    }

    fn begin_drag_resize(&self, direction: ResizeDirection) -> Result<(), NativeWindowError> {
        self.with(|w| w.drag_resize_window(direction))
            .ok_or(NativeWindowError::Destroyed)?
            .map_err(|e| NativeWindowError::Unsupported(e.to_string()))
    }

    fn set_cursor(&self, cursor: CursorIcon) {
        self.with(|w| w.set_cursor(cursor));
    }

    fn show_system_menu(&self, _menu: &SystemMenu, at: Point) -> Option<SystemMenuItem> {
        // Only the platform's own window menu is available through winit.
        self.with(|w| w.show_window_menu(PhysicalPosition::new(at.x, at.y)));
        None
    }

    fn destroy(&self) {
        if self.window.lock().take().is_some() {
            tracing::debug!(target: targets::NATIVE, window_id = ?self.id, "winit window destroyed");
        }
    }
}

impl std::fmt::Debug for WinitWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinitWindow")
            .field("id", &self.id)
            .field("alive", &self.window.lock().is_some())
            .finish()
    }
}

/// Translates winit window events into platform messages.
#[derive(Debug, Default)]
pub struct WinitTranslator {
    cursor: Option<Point>,
    modifiers: ModifiersState,
}

impl WinitTranslator {
    /// Create a translator with no cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cursor position, relative to the window.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Translate one event. `origin` is the window's outer position in
    /// desktop coordinates, used to make pointer positions absolute.
    pub fn translate(&mut self, event: &WindowEvent, origin: Point) -> Option<PlatformMessage> {
        let to_desktop = |p: Point| p.translated(origin.x, origin.y);
        match event {
            WindowEvent::Resized(size) => Some(PlatformMessage::Resized(Size::new(
                size.width as i32,
                size.height as i32,
            ))),
            WindowEvent::Moved(position) => {
                Some(PlatformMessage::Moved(Point::new(position.x, position.y)))
            }
            WindowEvent::Focused(focused) => Some(PlatformMessage::Activated(*focused)),
            WindowEvent::CloseRequested => Some(PlatformMessage::CloseRequested),
            WindowEvent::Destroyed => Some(PlatformMessage::Destroyed),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                Some(PlatformMessage::ScaleFactorChanged(*scale_factor))
            }
            WindowEvent::ThemeChanged(_) => Some(PlatformMessage::ThemeChanged),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let local = Point::new(position.x.floor() as i32, position.y.floor() as i32);
                self.cursor = Some(local);
                Some(PlatformMessage::PointerMoved(to_desktop(local)))
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Some(PlatformMessage::PointerLeft)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return None,
                };
                let point = to_desktop(self.cursor?);
                Some(match state {
                    ElementState::Pressed => PlatformMessage::PointerPressed { point, button },
                    ElementState::Released => PlatformMessage::PointerReleased { point, button },
                })
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let alt_space = event.state == ElementState::Pressed
                    && !event.repeat
                    && self.modifiers.alt_key()
                    && event.logical_key == Key::Named(NamedKey::Space);
                alt_space.then_some(PlatformMessage::SystemMenuRequested(None))
            }
            _ => None,
        }
    }
}
