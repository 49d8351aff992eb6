//! The chrome window: lifecycle and state controller.
//!
//! A [`GoodWindow`] owns one native top-level window, the embedded client,
//! the caption button state machine and the shadow overlay, and holds the
//! canonical [`WindowState`]. Platform notifications reach it through
//! [`GoodWindow::handle_message`]; the application drives it through the
//! `show_*`/`set_*` commands and observes it through signals.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed -> Shown -> { Normal <-> Minimized | Maximized | FullScreen } -> Closed
//! ```
//!
//! `show`/`hide` are idempotent. `close` always asks the client first; a
//! vetoed close leaves the window untouched. Once closed, every command is a
//! no-op and every message is ignored.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use good_window::native::HeadlessWindow;
//! use good_window::theme::{ColorScheme, FixedThemeSource, ThemeService};
//! use good_window::{GoodWindow, Margins, Rect};
//! use good_window_core::Dispatcher;
//!
//! let dispatcher = Arc::new(Dispatcher::new());
//! let theme = ThemeService::new(Box::new(FixedThemeSource::new(ColorScheme::Light)));
//!
//! let window = GoodWindow::builder(dispatcher, theme)
//!     .with_title("Editor")
//!     .build(|| Ok(Box::new(HeadlessWindow::new(Rect::new(100, 100, 800, 600)))))
//!     .unwrap();
//!
//! window.set_margins(Margins::new(30, 0, 0, 0));
//! window.show();
//! assert!(window.is_visible());
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use winit::window::ResizeDirection;

use good_window_core::logging::targets;
use good_window_core::{Dispatcher, Signal, TaskId};

use crate::caption_buttons::{CaptionButton, CaptionButtonEvent, CaptionButtons};
use crate::client::{ClientEvent, ClientWindow, CloseEvent, FocusMemory, NullClient};
use crate::config::ChromeConfig;
use crate::error::ChromeResult;
use crate::geometry::{Margins, PixelRatio, Point, Rect, Region, Size};
use crate::hit_test::{Corner, HitTestContext, MaskKind, RegionCode, WindowChrome};
use crate::native::{NativeTopLevelWindow, NativeWindowError};
use crate::pointer_router::PointerRouter;
use crate::screen::{Screen, ScreenId, ScreenSet};
use crate::shadow::{HostSnapshot, NullOverlay, OverlayHost, OverlaySurface, ShadowOverlay};
use crate::state::{FixedSize, WindowState};
use crate::system_menu::{SystemCommand, SystemMenu};
use crate::theme::ThemeService;
use crate::window_geometry::SavedGeometry;

/// Payload of [`GoodWindow::state_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChangeEvent {
    /// Previous state.
    pub old: WindowState,
    /// New state.
    pub new: WindowState,
}

/// Payload of [`GoodWindow::theme_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChangeEvent {
    /// Dark theme in effect.
    pub is_dark: bool,
    /// The compositor draws the window borders.
    pub borders_drawn_by_system: bool,
}

pub(crate) struct WindowInner {
    pub(crate) state: WindowState,
    pub(crate) chrome: WindowChrome,
    pub(crate) visible: bool,
    pub(crate) shown_once: bool,
    pub(crate) active: bool,
    pub(crate) enabled: bool,
    pub(crate) closing: bool,
    pub(crate) destroyed: bool,
    pub(crate) title: String,
    pub(crate) min_size: Option<Size>,
    pub(crate) max_size: Option<Size>,
    pub(crate) fixed: FixedSize,
    pub(crate) pixel_ratio: PixelRatio,
    pub(crate) borders_drawn_by_system: bool,
    pub(crate) is_dark: bool,
    pub(crate) normal_frame: Rect,
    pub(crate) screen: Option<ScreenId>,
    pub(crate) refresh_pending: Option<TaskId>,
    pub(crate) focus_pending: Option<TaskId>,
}

/// A borderless top-level window with application-drawn chrome.
pub struct GoodWindow {
    pub(crate) native: Box<dyn NativeTopLevelWindow>,
    pub(crate) client: Arc<dyn ClientWindow>,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) theme: Arc<ThemeService>,
    pub(crate) config: ChromeConfig,
    pub(crate) buttons: CaptionButtons,
    pub(crate) router: PointerRouter,
    pub(crate) shadow: Arc<ShadowOverlay>,
    pub(crate) focus: FocusMemory,
    pub(crate) inner: Mutex<WindowInner>,
    pub(crate) self_ref: Weak<GoodWindow>,
    state_changed: Signal<StateChangeEvent>,
    theme_changed: Signal<ThemeChangeEvent>,
    activation_changed: Signal<bool>,
    close_accepted: Signal<()>,
    destroyed: Signal<()>,
}

/// Builder for [`GoodWindow`].
pub struct GoodWindowBuilder {
    dispatcher: Arc<Dispatcher>,
    theme: Arc<ThemeService>,
    config: ChromeConfig,
    client: Arc<dyn ClientWindow>,
    overlay: Box<dyn OverlaySurface>,
    title: String,
}

impl GoodWindowBuilder {
    /// Use a chrome configuration.
    pub fn with_config(mut self, config: ChromeConfig) -> Self {
        self.config = config;
        self
    }

    /// Host an embedded client.
    pub fn with_client(mut self, client: Arc<dyn ClientWindow>) -> Self {
        self.client = client;
        self
    }

    /// Use an overlay surface for the shadow.
    pub fn with_overlay(mut self, overlay: Box<dyn OverlaySurface>) -> Self {
        self.overlay = overlay;
        self
    }

    /// Initial title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Create the native window with `create` and assemble the chrome.
    ///
    /// A creation failure is returned as
    /// [`ChromeError::WindowCreation`](crate::ChromeError::WindowCreation);
    /// no window instance exists in that case.
    pub fn build<F>(self, create: F) -> ChromeResult<Arc<GoodWindow>>
    where
        F: FnOnce() -> Result<Box<dyn NativeTopLevelWindow>, NativeWindowError>,
    {
        let native = create().inspect_err(|error| {
            tracing::error!(target: targets::LIFECYCLE, %error, "native window creation failed");
        })?;
        Ok(GoodWindow::assemble(self, native))
    }
}

impl GoodWindow {
    /// Start building a window bound to a dispatcher and a theme service.
    pub fn builder(dispatcher: Arc<Dispatcher>, theme: Arc<ThemeService>) -> GoodWindowBuilder {
        GoodWindowBuilder {
            dispatcher,
            theme,
            config: ChromeConfig::default(),
            client: Arc::new(NullClient),
            overlay: Box::new(NullOverlay),
            title: String::new(),
        }
    }

    fn assemble(builder: GoodWindowBuilder, native: Box<dyn NativeTopLevelWindow>) -> Arc<Self> {
        let GoodWindowBuilder {
            dispatcher,
            theme,
            config,
            client,
            overlay,
            title,
        } = builder;

        native.set_title(&title);
        let frame = native.outer_frame();
        let screen = native.screens().nearest_to(&frame).map(Screen::id);
        let pixel_ratio = PixelRatio::new(native.scale_factor());
        let borders_drawn_by_system = native.borders_drawn_by_system();

        let mut chrome = WindowChrome::new();
        chrome.set_border_width(config.border_width);
        chrome.set_show_icon(config.show_window_icon);

        let inner = WindowInner {
            state: WindowState::NoState,
            chrome,
            visible: false,
            shown_once: false,
            active: false,
            enabled: true,
            closing: false,
            destroyed: false,
            title,
            min_size: None,
            max_size: None,
            fixed: FixedSize::NONE,
            pixel_ratio,
            borders_drawn_by_system,
            is_dark: theme.is_dark(),
            normal_frame: frame,
            screen,
            refresh_pending: None,
            focus_pending: None,
        };

        let window = Arc::new_cyclic(|weak: &Weak<GoodWindow>| {
            let host: Weak<dyn OverlayHost> = weak.clone();
            let shadow = ShadowOverlay::new(
                overlay,
                host,
                dispatcher.clone(),
                config.overlay_mode,
                config.shadow_width,
                config.shadow_show_delay(),
            );

            let buttons = CaptionButtons::new(dispatcher.clone(), config.click_debounce());
            let w = weak.clone();
            buttons.activation_requested().connect(move |_| {
                if let Some(window) = w.upgrade() {
                    window.activate_window();
                }
            });
            let w = weak.clone();
            let d = dispatcher.clone();
            buttons.events().connect(move |event| {
                if let CaptionButtonEvent::Clicked(button) = *event {
                    let w = w.clone();
                    d.post(move || {
                        if let Some(window) = w.upgrade() {
                            window.caption_button_clicked(button);
                        }
                    });
                }
            });

            GoodWindow {
                native,
                client,
                dispatcher,
                theme,
                config,
                buttons,
                router: PointerRouter::new(),
                shadow,
                focus: FocusMemory::new(),
                inner: Mutex::new(inner),
                self_ref: weak.clone(),
                state_changed: Signal::new(),
                theme_changed: Signal::new(),
                activation_changed: Signal::new(),
                close_accepted: Signal::new(),
                destroyed: Signal::new(),
            }
        });

        tracing::debug!(target: targets::LIFECYCLE, ?frame, "window constructed");
        window
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// The 15 caption button events.
    pub fn caption_button_event(&self) -> &Signal<CaptionButtonEvent> {
        self.buttons.events()
    }

    /// Canonical state transitions, including the final one to `Closed`.
    pub fn state_changed(&self) -> &Signal<StateChangeEvent> {
        &self.state_changed
    }

    /// Dark theme or compositor border mode changed.
    pub fn theme_changed(&self) -> &Signal<ThemeChangeEvent> {
        &self.theme_changed
    }

    /// Activation gained (`true`) or lost.
    pub fn activation_changed(&self) -> &Signal<bool> {
        &self.activation_changed
    }

    /// A close was accepted by the client.
    pub fn close_accepted(&self) -> &Signal<()> {
        &self.close_accepted
    }

    /// The native window was destroyed.
    pub fn destroyed(&self) -> &Signal<()> {
        &self.destroyed
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    /// The caption button state machine.
    pub fn caption_buttons(&self) -> &CaptionButtons {
        &self.buttons
    }

    /// The shadow overlay controller.
    pub fn shadow(&self) -> &ShadowOverlay {
        &self.shadow
    }

    /// The dispatcher this window posts continuations to.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// The shared theme service.
    pub fn theme(&self) -> &Arc<ThemeService> {
        &self.theme
    }

    /// The chrome configuration.
    pub fn config(&self) -> &ChromeConfig {
        &self.config
    }

    /// Connected screens, as reported by the native window.
    pub fn screens(&self) -> Vec<Screen> {
        self.native.screens()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Canonical state.
    pub fn window_state(&self) -> WindowState {
        self.inner.lock().state
    }

    /// Maximized.
    pub fn is_maximized(&self) -> bool {
        self.window_state() == WindowState::Maximized
    }

    /// Minimized.
    pub fn is_minimized(&self) -> bool {
        self.window_state() == WindowState::Minimized
    }

    /// Full screen.
    pub fn is_full_screen(&self) -> bool {
        self.window_state() == WindowState::FullScreen
    }

    /// Closed for good.
    pub fn is_closed(&self) -> bool {
        self.window_state().is_closed()
    }

    /// The window currently has activation.
    pub fn is_active_window(&self) -> bool {
        self.inner.lock().active
    }

    /// Visible.
    pub fn is_visible(&self) -> bool {
        self.inner.lock().visible
    }

    /// Accepts input (not blocked by a modal child).
    pub fn is_enabled(&self) -> bool {
        self.inner.lock().enabled
    }

    /// Window title.
    pub fn title(&self) -> String {
        self.inner.lock().title.clone()
    }

    /// Cached pixel ratio.
    pub fn pixel_ratio(&self) -> PixelRatio {
        self.inner.lock().pixel_ratio
    }

    /// Dark theme in effect.
    pub fn is_dark_theme(&self) -> bool {
        self.inner.lock().is_dark
    }

    /// The compositor draws the window's borders.
    pub fn borders_drawn_by_system(&self) -> bool {
        self.inner.lock().borders_drawn_by_system
    }

    /// Fixed-size axes.
    pub fn fixed_size(&self) -> FixedSize {
        self.inner.lock().fixed
    }

    /// Minimum size, if set.
    pub fn min_size(&self) -> Option<Size> {
        self.inner.lock().min_size
    }

    /// Maximum size, if set.
    pub fn max_size(&self) -> Option<Size> {
        self.inner.lock().max_size
    }

    /// The screen the window is on.
    pub fn screen(&self) -> Option<Screen> {
        self.native.screens().nearest_to(&self.frame_geometry()).cloned()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Visual frame in physical desktop coordinates.
    ///
    /// When maximized with app-drawn borders the platform's invisible border
    /// is subtracted, so the rectangle matches what the user sees.
    pub fn frame_geometry(&self) -> Rect {
        let frame = self.native.outer_frame();
        let (state, system_borders) = {
            let inner = self.inner.lock();
            (inner.state, inner.borders_drawn_by_system)
        };
        if state == WindowState::Maximized && !system_borders {
            let b = self.native.invisible_maximized_border();
            frame.adjusted(b, b, -b, -b)
        } else {
            frame
        }
    }

    /// Client geometry; the whole frame belongs to the client in a
    /// borderless window.
    pub fn geometry(&self) -> Rect {
        self.frame_geometry()
    }

    /// Frame origin.
    pub fn pos(&self) -> Point {
        self.frame_geometry().origin()
    }

    /// Frame size.
    pub fn size(&self) -> Size {
        self.frame_geometry().size()
    }

    /// The frame the window returns to when restored.
    pub fn normal_geometry(&self) -> Rect {
        self.inner.lock().normal_frame
    }

    /// Move and resize the frame.
    pub fn set_geometry(&self, frame: Rect) {
        if self.is_closed() {
            return;
        }
        self.native.set_outer_frame(frame);
        self.geometry_changed();
    }

    /// Move the frame.
    pub fn move_to(&self, origin: Point) {
        self.set_geometry(self.frame_geometry().moved_to(origin));
    }

    /// Resize the frame.
    pub fn resize(&self, size: Size) {
        self.set_geometry(Rect::from_origin_size(self.pos(), size));
    }

    /// Minimum frame size.
    pub fn set_min_size(&self, size: Option<Size>) {
        if self.is_closed() {
            return;
        }
        self.inner.lock().min_size = size;
        self.native.set_min_size(size);
        self.update_fixed_size();
    }

    /// Maximum frame size.
    pub fn set_max_size(&self, size: Option<Size>) {
        if self.is_closed() {
            return;
        }
        self.inner.lock().max_size = size;
        self.native.set_max_size(size);
        self.update_fixed_size();
    }

    /// Pin the frame size; maximize and full screen become no-ops and the
    /// resize edges disappear.
    pub fn set_fixed_size(&self, size: Size) {
        self.set_min_size(Some(size));
        self.set_max_size(Some(size));
        self.resize(size);
    }

    fn update_fixed_size(&self) {
        let mut inner = self.inner.lock();
        inner.fixed = match (inner.min_size, inner.max_size) {
            (Some(min), Some(max)) => FixedSize {
                width: min.width == max.width,
                height: min.height == max.height,
            },
            _ => FixedSize::NONE,
        };
    }

    // =========================================================================
    // Title Bar
    // =========================================================================

    /// Set the title bar margins (logical pixels).
    pub fn set_margins(&self, margins: Margins) {
        self.inner.lock().chrome.set_margins(margins);
    }

    /// Title bar margins.
    pub fn margins(&self) -> Margins {
        self.inner.lock().chrome.margins()
    }

    /// Replace one title-bar mask (title-bar-local logical coordinates).
    pub fn set_mask(&self, kind: MaskKind, region: impl Into<Region>) {
        self.inner.lock().chrome.set_mask(kind, region.into());
    }

    /// Widgets in the left title-bar zone.
    pub fn set_left_mask(&self, region: impl Into<Region>) {
        self.set_mask(MaskKind::Left, region);
    }

    /// Widgets in the right title-bar zone.
    pub fn set_right_mask(&self, region: impl Into<Region>) {
        self.set_mask(MaskKind::Right, region);
    }

    /// Widgets in the center title-bar zone.
    pub fn set_center_mask(&self, region: impl Into<Region>) {
        self.set_mask(MaskKind::Center, region);
    }

    /// Interactive content anywhere in the title bar.
    pub fn set_title_bar_mask(&self, region: impl Into<Region>) {
        self.set_mask(MaskKind::TitleBar, region);
    }

    /// The minimize button.
    pub fn set_minimize_mask(&self, region: impl Into<Region>) {
        self.set_mask(MaskKind::Minimize, region);
    }

    /// The maximize/restore button.
    pub fn set_maximize_mask(&self, region: impl Into<Region>) {
        self.set_mask(MaskKind::Maximize, region);
    }

    /// The close button.
    pub fn set_close_mask(&self, region: impl Into<Region>) {
        self.set_mask(MaskKind::Close, region);
    }

    /// Opt into built-in caption button hit-testing at `corner`.
    pub fn set_caption_buttons_handled(&self, handled: bool, corner: Corner) {
        self.inner
            .lock()
            .chrome
            .set_caption_buttons_handled(handled, corner);
        if !handled {
            self.buttons.reset();
            self.router.reset();
        }
    }

    /// Classify a physical desktop point.
    pub fn hit_test(&self, point: Point) -> RegionCode {
        let frame = self.frame_geometry();
        let inner = self.inner.lock();
        if inner.state.is_closed() {
            return RegionCode::Elsewhere;
        }
        let ctx = HitTestContext {
            frame,
            state: inner.state,
            pixel_ratio: inner.pixel_ratio,
            borders_drawn_by_system: inner.borders_drawn_by_system,
            fixed: inner.fixed,
        };
        inner.chrome.classify(point, &ctx)
    }

    /// Set the title.
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        if self.is_closed() {
            return;
        }
        self.native.set_title(&title);
        self.inner.lock().title = title;
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Show the window. Idempotent.
    pub fn show(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() || inner.visible {
                return;
            }
            inner.visible = true;
            inner.shown_once = true;
        }
        tracing::debug!(target: targets::LIFECYCLE, "show");
        self.native.show();
        self.client.event(&ClientEvent::Show);
        self.sync_state();
        if self.window_state().is_normal() && self.is_enabled() {
            self.shadow.show_later();
        }
    }

    /// Hide the window. Idempotent.
    pub fn hide(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() || !inner.visible {
                return;
            }
            inner.visible = false;
        }
        tracing::debug!(target: targets::LIFECYCLE, "hide");
        self.native.hide();
        self.shadow.hide();
        self.buttons.reset();
        self.router.reset();
        self.client.event(&ClientEvent::Hide);
    }

    /// True once the window has been shown at least once.
    pub fn was_shown(&self) -> bool {
        self.inner.lock().shown_once
    }

    /// Enable or disable input (a modal child disables its parent).
    pub fn set_enabled(&self, enabled: bool) {
        let visible_normal = {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() || inner.enabled == enabled {
                return;
            }
            inner.enabled = enabled;
            inner.visible && inner.state.is_normal()
        };
        self.native.set_enabled(enabled);
        if enabled {
            if visible_normal {
                self.shadow.show_later();
            }
        } else {
            self.buttons.reset();
            self.router.reset();
            self.shadow.hide();
        }
        self.client.event(&ClientEvent::EnabledChange(enabled));
    }

    /// Bring the window to the front and give it focus.
    pub fn activate_window(&self) {
        if self.is_closed() {
            return;
        }
        self.native.focus();
    }

    // =========================================================================
    // State Commands
    // =========================================================================

    /// Restore to the normal state and show.
    pub fn show_normal(&self) {
        if self.is_closed() {
            return;
        }
        self.set_native_state(WindowState::NoState);
        self.show();
    }

    /// Minimize and show.
    pub fn show_minimized(&self) {
        if self.is_closed() {
            return;
        }
        self.set_native_state(WindowState::Minimized);
        self.show();
    }

    /// Maximize and show. No-op for fixed-size windows.
    pub fn show_maximized(&self) {
        if self.is_closed() {
            return;
        }
        if self.fixed_size().any() {
            tracing::debug!(target: targets::LIFECYCLE, "maximize ignored for fixed-size window");
            return;
        }
        self.set_native_state(WindowState::Maximized);
        self.show();
    }

    /// Enter full screen and show. No-op for fixed-size windows.
    pub fn show_full_screen(&self) {
        if self.is_closed() {
            return;
        }
        if self.fixed_size().any() {
            tracing::debug!(target: targets::LIFECYCLE, "full screen ignored for fixed-size window");
            return;
        }
        self.set_native_state(WindowState::FullScreen);
        self.show();
    }

    /// Ask the native window for `target` and adopt whatever it reports.
    fn set_native_state(&self, target: WindowState) {
        let native = &self.native;
        match target {
            WindowState::NoState => {
                if native.native_state() == WindowState::Minimized {
                    native.set_minimized(false);
                }
                if native.native_state() == WindowState::FullScreen {
                    native.set_full_screen(false);
                }
                if native.native_state() == WindowState::Maximized {
                    native.set_maximized(false);
                }
            }
            WindowState::Minimized => native.set_minimized(true),
            WindowState::Maximized => {
                if native.native_state() == WindowState::FullScreen {
                    native.set_full_screen(false);
                }
                native.set_maximized(true);
            }
            WindowState::FullScreen => native.set_full_screen(true),
            WindowState::Closed => return,
        }
        self.sync_state();
    }

    /// Adopt the native window's notion of the state.
    pub(crate) fn sync_state(&self) {
        let state = self.native.native_state();
        if state != WindowState::Closed {
            self.apply_state(state);
        }
    }

    /// Move the canonical state to `new`, notifying everyone.
    pub(crate) fn apply_state(&self, new: WindowState) {
        if new == WindowState::Closed {
            return;
        }
        let old = {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() || inner.state == new {
                return;
            }
            std::mem::replace(&mut inner.state, new)
        };
        if new.is_normal() {
            let frame = self.native.outer_frame();
            self.inner.lock().normal_frame = frame;
        }

        tracing::info!(target: targets::LIFECYCLE, ?old, ?new, "window state changed");
        self.client.event(&ClientEvent::WindowStateChange { old, new });
        self.state_changed.emit(StateChangeEvent { old, new });

        if new.is_normal() {
            if self.is_visible() && self.is_enabled() {
                self.shadow.show_later();
            }
        } else {
            self.shadow.hide();
        }
        self.schedule_refresh();
    }

    fn caption_button_clicked(&self, button: CaptionButton) {
        if self.is_closed() {
            return;
        }
        tracing::debug!(target: targets::LIFECYCLE, ?button, "caption button clicked");
        match button {
            CaptionButton::Minimize => self.show_minimized(),
            CaptionButton::Maximize => self.toggle_maximized(),
            CaptionButton::Close => {
                self.close();
            }
        }
    }

    /// Maximize a normal window, restore a maximized one.
    pub fn toggle_maximized(&self) {
        if self.is_maximized() {
            self.show_normal();
        } else {
            self.show_maximized();
        }
    }

    // =========================================================================
    // Close
    // =========================================================================

    /// Request a close. The client may veto it; returns whether the window
    /// closed. Closing a closed window is a no-op.
    pub fn close(&self) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() || inner.closing {
                return false;
            }
            inner.closing = true;
        }
        let mut event = CloseEvent::new();
        self.client.close_event(&mut event);
        self.inner.lock().closing = false;

        if !event.is_accepted() {
            tracing::debug!(target: targets::LIFECYCLE, "close vetoed by client");
            return false;
        }
        self.finish_close();
        true
    }

    /// Mark the window closed and release its helpers.
    pub(crate) fn finish_close(&self) {
        let (old, pending) = {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() {
                return;
            }
            inner.visible = false;
            inner.active = false;
            (
                std::mem::replace(&mut inner.state, WindowState::Closed),
                [inner.refresh_pending.take(), inner.focus_pending.take()],
            )
        };
        tracing::info!(target: targets::LIFECYCLE, ?old, "window closed");

        for task in pending.into_iter().flatten() {
            self.dispatcher.cancel_task(task);
        }
        self.native.hide();
        self.shadow.destroy();
        self.buttons.shutdown();
        self.router.reset();
        self.focus.clear();

        self.client.event(&ClientEvent::Hide);
        self.state_changed.emit(StateChangeEvent {
            old,
            new: WindowState::Closed,
        });
        self.close_accepted.emit(());

        if self.config.delete_on_close {
            self.destroy_native();
        }
    }

    pub(crate) fn destroy_native(&self) {
        if std::mem::replace(&mut self.inner.lock().destroyed, true) {
            return;
        }
        self.native.destroy();
        tracing::debug!(target: targets::LIFECYCLE, "native window destroyed");
        self.destroyed.emit(());
    }

    // =========================================================================
    // Geometry Sync
    // =========================================================================

    /// The frame moved or was resized: resync the client and the overlay.
    pub(crate) fn geometry_changed(&self) {
        let frame = self.frame_geometry();
        let ratio = {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() {
                return;
            }
            if inner.state.is_normal() {
                inner.normal_frame = frame;
            }
            inner.pixel_ratio
        };
        self.client
            .event(&ClientEvent::Resize(ratio.rect_to_logical(frame).size()));
        self.shadow.resync(&self.host_snapshot());
    }

    /// Update the cached pixel ratio; returns whether it changed.
    pub(crate) fn set_pixel_ratio(&self, ratio: PixelRatio) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.pixel_ratio == ratio {
                return false;
            }
            inner.pixel_ratio = ratio;
        }
        tracing::debug!(target: targets::LIFECYCLE, ratio = ratio.get(), "pixel ratio changed");
        self.client.event(&ClientEvent::ScaleChange(ratio.get()));
        true
    }

    /// Re-evaluate the monitor after a move. When the window landed on
    /// another monitor, adopt its pixel ratio and keep the center inside the
    /// new work area (minus the safety margin).
    pub(crate) fn check_monitor(&self) {
        let frame = self.frame_geometry();
        let screens = self.native.screens();
        let Some(screen) = screens.nearest_to(&frame) else {
            return;
        };
        let (previous, old_ratio, state) = {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() || inner.screen == Some(screen.id()) {
                return;
            }
            (inner.screen.replace(screen.id()), inner.pixel_ratio, inner.state)
        };
        if previous.is_none() {
            return;
        }

        let new_ratio = screen.pixel_ratio();
        tracing::debug!(
            target: targets::LIFECYCLE,
            screen = screen.name(),
            ratio = new_ratio.get(),
            "window moved to another monitor"
        );
        self.set_pixel_ratio(new_ratio);
        if !state.is_normal() {
            return;
        }

        let mut target = frame;
        if new_ratio != old_ratio {
            let scale = new_ratio.get() / old_ratio.get();
            let size = Size::new(
                (frame.width as f64 * scale).round() as i32,
                (frame.height as f64 * scale).round() as i32,
            );
            target = Rect::from_origin_size(frame.origin(), size).centered_on(frame.center());
        }

        let margin = new_ratio.to_physical(self.config.monitor_safety_margin);
        let work = screen.work_area();
        let area = work.adjusted(margin, margin, -margin, -margin);
        let center = target.center();
        let anchored = if area.is_empty() {
            work.center()
        } else {
            Point::new(
                center.x.clamp(area.left(), area.right()),
                center.y.clamp(area.top(), area.bottom()),
            )
        };
        target = target.centered_on(anchored);

        if target != frame {
            tracing::debug!(target: targets::LIFECYCLE, ?frame, ?target, "re-anchored after monitor change");
            self.native.set_outer_frame(target);
            self.geometry_changed();
        }
    }

    /// Recompute theme and border flags; notify when they changed.
    pub(crate) fn refresh_theme_flags(&self) {
        self.theme.refresh();
        let is_dark = self.theme.is_dark();
        let borders = self.native.borders_drawn_by_system();
        let changed = {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() {
                return;
            }
            let changed = inner.is_dark != is_dark || inner.borders_drawn_by_system != borders;
            inner.is_dark = is_dark;
            inner.borders_drawn_by_system = borders;
            changed
        };
        if changed {
            tracing::debug!(target: targets::THEME, is_dark, borders, "window theme changed");
            self.client.event(&ClientEvent::ThemeChange { is_dark });
            self.theme_changed.emit(ThemeChangeEvent {
                is_dark,
                borders_drawn_by_system: borders,
            });
        }
        self.schedule_refresh();
    }

    /// Refresh frame metrics on the next loop turn; repeated requests
    /// coalesce.
    pub(crate) fn schedule_refresh(&self) {
        let mut inner = self.inner.lock();
        if inner.state.is_closed() || inner.refresh_pending.is_some() {
            return;
        }
        let weak = self.self_ref.clone();
        inner.refresh_pending = Some(self.dispatcher.post(move || {
            if let Some(window) = weak.upgrade() {
                window.deferred_refresh();
            }
        }));
    }

    fn deferred_refresh(&self) {
        {
            let mut inner = self.inner.lock();
            inner.refresh_pending = None;
            if inner.state.is_closed() {
                return;
            }
        }
        self.set_pixel_ratio(PixelRatio::new(self.native.scale_factor()));
        self.geometry_changed();
    }

    /// What the overlay may know about this window.
    pub(crate) fn host_snapshot(&self) -> HostSnapshot {
        let frame = self.frame_geometry();
        let screens = self.native.screens();
        let inner = self.inner.lock();
        HostSnapshot {
            frame,
            active: inner.active,
            pixel_ratio: inner.pixel_ratio,
            state: inner.state,
            visible: inner.visible,
            enabled: inner.enabled,
            screens,
        }
    }

    // =========================================================================
    // Activation
    // =========================================================================

    pub(crate) fn activation_change(&self, active: bool) {
        let stale = {
            let mut inner = self.inner.lock();
            if inner.state.is_closed() || inner.active == active {
                return;
            }
            inner.active = active;
            inner.focus_pending.take()
        };
        // At most one focus restore is queued, and only while active.
        if let Some(task) = stale {
            self.dispatcher.cancel_task(task);
        }
        tracing::debug!(target: targets::LIFECYCLE, active, "activation changed");
        self.shadow.set_active(active);
        self.client.event(&ClientEvent::ActivationChange(active));

        if active {
            let weak = self.self_ref.clone();
            let task = self.dispatcher.post(move || {
                if let Some(window) = weak.upgrade() {
                    window.deferred_focus_restore();
                }
            });
            self.inner.lock().focus_pending = Some(task);
        } else {
            self.focus.remember(self.client.as_ref());
            self.buttons.reset();
            self.router.reset();
        }
        self.activation_changed.emit(active);
    }

    fn deferred_focus_restore(&self) {
        {
            let mut inner = self.inner.lock();
            inner.focus_pending = None;
            if inner.state.is_closed() || !inner.active {
                return;
            }
        }
        let restored = self.focus.restore(self.client.as_ref());
        tracing::trace!(target: targets::LIFECYCLE, ?restored, "focus restored");
    }

    // =========================================================================
    // System Menu
    // =========================================================================

    /// The system menu for the current state.
    pub fn system_menu(&self) -> SystemMenu {
        let inner = self.inner.lock();
        SystemMenu::for_state(inner.state, inner.fixed)
    }

    /// Show the system menu (below the title bar's left end when no point is
    /// given) and execute the chosen command.
    pub fn show_system_menu(&self, at: Option<Point>) -> Option<SystemCommand> {
        if self.is_closed() {
            return None;
        }
        let menu = self.system_menu();
        let at = at.unwrap_or_else(|| {
            let (ratio, margins) = {
                let inner = self.inner.lock();
                (inner.pixel_ratio, inner.chrome.margins())
            };
            self.pos()
                .translated(0, ratio.to_physical(margins.title_bar_height))
        });
        let item = self.native.show_system_menu(&menu, at)?;
        let command = menu.command_for(item)?;
        self.execute_command(command);
        Some(command)
    }

    /// Execute a system command.
    pub fn execute_command(&self, command: SystemCommand) {
        tracing::debug!(target: targets::LIFECYCLE, ?command, "system command");
        match command {
            SystemCommand::Restore => self.show_normal(),
            SystemCommand::Move => self.log_native(self.native.begin_drag_move()),
            SystemCommand::Size => {
                self.log_native(self.native.begin_drag_resize(ResizeDirection::SouthEast))
            }
            SystemCommand::Minimize => self.show_minimized(),
            SystemCommand::Maximize => self.show_maximized(),
            SystemCommand::Close => {
                self.close();
            }
        }
    }

    pub(crate) fn log_native(&self, result: Result<(), NativeWindowError>) {
        if let Err(error) = result {
            tracing::warn!(target: targets::NATIVE, %error, "native request failed");
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Encode the normal frame and state as a 19-byte blob.
    pub fn save_geometry(&self) -> Vec<u8> {
        let inner = self.inner.lock();
        let state = if inner.state.is_closed() {
            WindowState::NoState
        } else {
            inner.state
        };
        SavedGeometry::new(inner.normal_frame, state).to_bytes().to_vec()
    }

    /// Restore a blob produced by [`save_geometry`](Self::save_geometry).
    ///
    /// An invalid blob is rejected and the geometry left untouched. A frame
    /// that would land entirely off-screen is centered on the primary work
    /// area instead.
    pub fn restore_geometry(&self, blob: &[u8]) -> ChromeResult<()> {
        let saved = SavedGeometry::from_bytes(blob).inspect_err(|error| {
            tracing::warn!(target: targets::LIFECYCLE, %error, "geometry blob rejected");
        })?;
        if self.is_closed() {
            return Ok(());
        }

        let frame = saved.fit_to_screens(&self.native.screens());
        if frame != saved.rect {
            tracing::debug!(target: targets::LIFECYCLE, saved = ?saved.rect, ?frame, "restored geometry re-centered");
        }
        if !self.window_state().is_normal() {
            self.set_native_state(WindowState::NoState);
        }
        self.native.set_outer_frame(frame);
        self.inner.lock().normal_frame = frame;
        self.geometry_changed();

        let state = saved.state();
        let fixed = self.fixed_size().any();
        if !state.is_normal()
            && !(fixed && matches!(state, WindowState::Maximized | WindowState::FullScreen))
        {
            self.set_native_state(state);
        }
        Ok(())
    }
}

impl OverlayHost for GoodWindow {
    fn overlay_snapshot(&self) -> Option<HostSnapshot> {
        if self.is_closed() {
            None
        } else {
            Some(self.host_snapshot())
        }
    }
}

impl Drop for GoodWindow {
    fn drop(&mut self) {
        self.shadow.destroy();
        self.buttons.shutdown();
        if !self.inner.get_mut().destroyed {
            self.native.destroy();
        }
    }
}

impl std::fmt::Debug for GoodWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("GoodWindow")
            .field("title", &inner.title)
            .field("state", &inner.state)
            .field("visible", &inner.visible)
            .field("active", &inner.active)
            .field("enabled", &inner.enabled)
            .finish()
    }
}

static_assertions::assert_impl_all!(GoodWindow: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::HeadlessWindow;
    use crate::theme::{ColorScheme, FixedThemeSource};
    use std::time::{Duration, Instant};

    fn window_with(native: Arc<HeadlessWindow>) -> Arc<GoodWindow> {
        let dispatcher = Arc::new(Dispatcher::new());
        let theme = ThemeService::new(Box::new(FixedThemeSource::new(ColorScheme::Light)));
        GoodWindow::builder(dispatcher, theme)
            .with_title("Test")
            .build(move || Ok(Box::new(native)))
            .unwrap()
    }

    fn flush(window: &GoodWindow) {
        window
            .dispatcher()
            .process(Instant::now() + Duration::from_secs(1));
    }

    #[test]
    fn test_construction_failure_is_reported() {
        let dispatcher = Arc::new(Dispatcher::new());
        let theme = ThemeService::new(Box::new(FixedThemeSource::new(ColorScheme::Light)));
        let result = GoodWindow::builder(dispatcher, theme)
            .build(|| Err(NativeWindowError::CreationFailed("no display".into())));
        assert!(matches!(result, Err(crate::ChromeError::WindowCreation(_))));
    }

    #[test]
    fn test_show_hide_idempotent() {
        let native = Arc::new(HeadlessWindow::new(Rect::new(100, 100, 800, 600)));
        let window = window_with(native.clone());
        assert!(!window.was_shown());
        window.show();
        window.show();
        assert!(window.is_visible() && native.is_visible());
        window.hide();
        window.hide();
        assert!(!window.is_visible() && !native.is_visible());
        assert!(window.was_shown());
    }

    #[test]
    fn test_maximize_and_restore_track_normal_frame() {
        let native = Arc::new(HeadlessWindow::new(Rect::new(100, 100, 800, 600)));
        let window = window_with(native.clone());
        window.show();
        window.show_maximized();
        assert!(window.is_maximized());
        assert_eq!(window.frame_geometry(), Rect::new(0, 0, 1920, 1040));
        assert_eq!(window.normal_geometry(), Rect::new(100, 100, 800, 600));
        window.show_normal();
        assert_eq!(window.window_state(), WindowState::NoState);
        assert_eq!(window.frame_geometry(), Rect::new(100, 100, 800, 600));
    }

    #[test]
    fn test_invisible_border_subtracted_when_maximized() {
        let native = Arc::new(HeadlessWindow::new(Rect::new(100, 100, 800, 600)));
        native.set_invisible_border(8);
        let window = window_with(native.clone());
        window.show_maximized();
        assert_eq!(native.outer_frame(), Rect::new(-8, -8, 1936, 1056));
        assert_eq!(window.frame_geometry(), Rect::new(0, 0, 1920, 1040));
        assert_eq!(window.size(), Size::new(1920, 1040));
    }

    #[test]
    fn test_fixed_size_blocks_maximize() {
        let native = Arc::new(HeadlessWindow::new(Rect::new(100, 100, 800, 600)));
        let window = window_with(native);
        window.set_fixed_size(Size::new(400, 300));
        assert_eq!(window.fixed_size(), FixedSize::BOTH);
        window.show_maximized();
        window.show_full_screen();
        assert_eq!(window.window_state(), WindowState::NoState);
        assert_eq!(window.size(), Size::new(400, 300));
    }

    #[test]
    fn test_closed_window_ignores_commands() {
        let native = Arc::new(HeadlessWindow::new(Rect::new(100, 100, 800, 600)));
        let window = window_with(native.clone());
        window.show();
        assert!(window.close());
        assert!(!window.close());
        window.show();
        window.show_maximized();
        window.set_geometry(Rect::new(0, 0, 10, 10));
        assert!(window.is_closed());
        assert!(!native.is_visible());
        assert_eq!(native.outer_frame(), Rect::new(100, 100, 800, 600));
    }

    #[test]
    fn test_refresh_requests_coalesce() {
        let native = Arc::new(HeadlessWindow::new(Rect::new(100, 100, 800, 600)));
        let window = window_with(native);
        window.schedule_refresh();
        window.schedule_refresh();
        assert_eq!(window.dispatcher().pending_tasks(), 1);
        flush(&window);
        assert_eq!(window.dispatcher().pending_tasks(), 0);
    }
}
