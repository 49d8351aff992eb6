//! The window procedure: platform messages in, chrome behaviour out.

use std::time::Instant;

use good_window_core::logging::targets;

use crate::client::ClientEvent;
use crate::geometry::{PixelRatio, Point, Size};
use crate::good_window::GoodWindow;
use crate::message::{MessageResult, PlatformMessage, PointerButton};
use crate::pointer_router::PointerAction;
use crate::state::WindowState;

impl GoodWindow {
    /// Route one platform message.
    ///
    /// Hit-test queries are answered; pointer traffic is routed through the
    /// caption buttons; state, geometry, activation and theme notifications
    /// update the canonical state and resync the overlay. Once the window is
    /// closed every message is ignored.
    #[tracing::instrument(name = "good_window::message", target = "good_window::procedure", level = "trace", skip(self))]
    pub fn handle_message(&self, message: PlatformMessage) -> MessageResult {
        if self.is_closed() {
            return MessageResult::Ignored;
        }
        match message {
            PlatformMessage::HitTest { point, from_child } => {
                let region = self.hit_test(point);
                if from_child && !region.is_client() {
                    MessageResult::Transparent
                } else {
                    MessageResult::HitTest(region)
                }
            }
            PlatformMessage::PointerMoved(point) => self.pointer_moved(point),
            PlatformMessage::PointerLeft => {
                self.router.pointer_left(&self.buttons);
                MessageResult::Handled
            }
            PlatformMessage::PointerPressed { point, button } => self.pointer_pressed(point, button),
            PlatformMessage::PointerReleased { point, button } => {
                if !self.is_enabled() {
                    return MessageResult::Ignored;
                }
                let region = self.hit_test(point);
                let action = self.router.pointer_released(region, button, &self.buttons);
                self.perform(action)
            }
            PlatformMessage::Activated(active) => {
                self.activation_change(active);
                MessageResult::Handled
            }
            PlatformMessage::Moved(origin) => {
                self.moved(origin);
                MessageResult::Handled
            }
            PlatformMessage::Resized(size) => {
                self.resized(size);
                MessageResult::Handled
            }
            PlatformMessage::StateChanged(state) => {
                if state == WindowState::Closed {
                    return MessageResult::Ignored;
                }
                self.apply_state(state);
                MessageResult::Handled
            }
            PlatformMessage::ScaleFactorChanged(scale) => {
                self.set_pixel_ratio(PixelRatio::new(scale));
                self.refresh_theme_flags();
                MessageResult::Handled
            }
            PlatformMessage::ThemeChanged | PlatformMessage::CompositionChanged => {
                self.refresh_theme_flags();
                MessageResult::Handled
            }
            PlatformMessage::CloseRequested => {
                self.close();
                MessageResult::Handled
            }
            PlatformMessage::SystemMenuRequested(at) => {
                self.show_system_menu(at);
                MessageResult::Handled
            }
            PlatformMessage::Destroyed => {
                tracing::warn!(target: targets::PROCEDURE, "native window destroyed while open");
                self.finish_close();
                self.destroy_native();
                MessageResult::Handled
            }
        }
    }

    fn pointer_moved(&self, point: Point) -> MessageResult {
        if !self.is_enabled() {
            return MessageResult::Ignored;
        }
        let region = self.hit_test(point);
        let previous = self.router.last_region();
        self.router.pointer_moved(region, &self.buttons);
        if previous != Some(region) {
            self.native.set_cursor(region.cursor());
        }
        if region.is_client() {
            MessageResult::Ignored
        } else {
            MessageResult::Handled
        }
    }

    fn pointer_pressed(&self, point: Point, button: PointerButton) -> MessageResult {
        if !self.is_enabled() {
            return MessageResult::Ignored;
        }
        let region = self.hit_test(point);
        let action = self
            .router
            .pointer_pressed(region, button, point, Instant::now(), &self.buttons);
        self.perform(action)
    }

    fn perform(&self, action: PointerAction) -> MessageResult {
        tracing::trace!(target: targets::PROCEDURE, ?action, "pointer action");
        match action {
            PointerAction::Client => return MessageResult::Ignored,
            PointerAction::BeginMove => self.log_native(self.native.begin_drag_move()),
            PointerAction::BeginResize(direction) => {
                self.log_native(self.native.begin_drag_resize(direction))
            }
            PointerAction::ShowSystemMenu(at) => {
                self.show_system_menu(Some(at));
            }
            PointerAction::ToggleMaximize => {
                if !self.fixed_size().any() {
                    self.toggle_maximized();
                }
            }
            PointerAction::None | PointerAction::ButtonPressed(_) | PointerAction::ButtonReleased => {}
        }
        MessageResult::Handled
    }

    fn moved(&self, origin: Point) {
        self.client.event(&ClientEvent::Move(origin));
        self.check_monitor();
        self.geometry_changed();
    }

    fn resized(&self, size: Size) {
        tracing::trace!(target: targets::PROCEDURE, ?size, "frame resized");
        self.sync_state();
        self.geometry_changed();
    }
}
