//! Pointer routing for platforms without non-client mouse messages.
//!
//! The router watches every pointer event over the window, classifies it and
//! drives the caption button state machine by diffing against the region
//! seen last. Presses outside the buttons become window-manager actions.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use winit::window::ResizeDirection;

use good_window_core::logging::targets;

use crate::caption_buttons::{CaptionButton, CaptionButtons};
use crate::geometry::Point;
use crate::hit_test::RegionCode;
use crate::message::PointerButton;

/// Two caption presses closer than this form a double click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum pointer travel between the two presses of a double click.
pub const DOUBLE_CLICK_DISTANCE: i32 = 4;

/// What the window should do after a routed pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Nothing further.
    None,
    /// Hand the event to the embedded client.
    Client,
    /// Start an interactive move.
    BeginMove,
    /// Start an interactive resize.
    BeginResize(ResizeDirection),
    /// Open the system menu at a point.
    ShowSystemMenu(Point),
    /// Double click on the caption.
    ToggleMaximize,
    /// A caption button went down.
    ButtonPressed(CaptionButton),
    /// A caption button press ended.
    ButtonReleased,
}

#[derive(Debug, Default)]
struct RouterInner {
    last_region: Option<RegionCode>,
    last_caption_press: Option<(Instant, Point)>,
}

/// Per-window pointer router.
#[derive(Debug, Default)]
pub struct PointerRouter {
    inner: Mutex<RouterInner>,
}

impl PointerRouter {
    /// Create a router with no hover history.
    pub fn new() -> Self {
        Self::default()
    }

    /// The region reported by the last move.
    pub fn last_region(&self) -> Option<RegionCode> {
        self.inner.lock().last_region
    }

    /// The pointer moved into `region`.
    pub fn pointer_moved(&self, region: RegionCode, buttons: &CaptionButtons) {
        let previous = self.inner.lock().last_region.replace(region);
        if previous == Some(region) {
            return;
        }
        tracing::trace!(target: targets::PROCEDURE, ?previous, ?region, "pointer region changed");
        if let Some(button) = previous.and_then(RegionCode::caption_button) {
            buttons.leave(button);
        }
        if let Some(button) = region.caption_button() {
            buttons.enter(button);
        }
    }

    /// The pointer left the window.
    pub fn pointer_left(&self, buttons: &CaptionButtons) {
        let previous = self.inner.lock().last_region.take();
        if let Some(button) = previous.and_then(RegionCode::caption_button) {
            buttons.leave(button);
        }
    }

    /// A pointer button went down over `region`.
    pub fn pointer_pressed(
        &self,
        region: RegionCode,
        button: PointerButton,
        point: Point,
        now: Instant,
        buttons: &CaptionButtons,
    ) -> PointerAction {
        match button {
            PointerButton::Primary => self.primary_pressed(region, point, now, buttons),
            PointerButton::Secondary => match region {
                RegionCode::Caption | RegionCode::SystemMenu => PointerAction::ShowSystemMenu(point),
                code if code.is_client() => PointerAction::Client,
                _ => PointerAction::None,
            },
            PointerButton::Middle => {
                if region.is_client() {
                    PointerAction::Client
                } else {
                    PointerAction::None
                }
            }
        }
    }

    fn primary_pressed(
        &self,
        region: RegionCode,
        point: Point,
        now: Instant,
        buttons: &CaptionButtons,
    ) -> PointerAction {
        if let Some(button) = region.caption_button() {
            buttons.press(button);
            return PointerAction::ButtonPressed(button);
        }
        if let Some(direction) = region.resize_direction() {
            return PointerAction::BeginResize(direction);
        }
        match region {
            RegionCode::Caption => {
                let mut inner = self.inner.lock();
                let double = inner.last_caption_press.take().is_some_and(|(at, from)| {
                    now.saturating_duration_since(at) < DOUBLE_CLICK_INTERVAL
                        && (point.x - from.x).abs() <= DOUBLE_CLICK_DISTANCE
                        && (point.y - from.y).abs() <= DOUBLE_CLICK_DISTANCE
                });
                if double {
                    PointerAction::ToggleMaximize
                } else {
                    inner.last_caption_press = Some((now, point));
                    PointerAction::BeginMove
                }
            }
            RegionCode::SystemMenu => PointerAction::ShowSystemMenu(point),
            _ => PointerAction::Client,
        }
    }

    /// A pointer button went up over `region`.
    pub fn pointer_released(
        &self,
        region: RegionCode,
        button: PointerButton,
        buttons: &CaptionButtons,
    ) -> PointerAction {
        if button != PointerButton::Primary {
            return if region.is_client() {
                PointerAction::Client
            } else {
                PointerAction::None
            };
        }
        match buttons.pressed() {
            Some(captured) => {
                let over = region.caption_button();
                buttons.release(over.unwrap_or(captured), over == Some(captured));
                PointerAction::ButtonReleased
            }
            None if region.is_client() => PointerAction::Client,
            None => PointerAction::None,
        }
    }

    /// Forget hover and double-click history.
    pub fn reset(&self) {
        *self.inner.lock() = RouterInner::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption_buttons::CaptionButtonEvent as E;
    use good_window_core::Dispatcher;
    use std::sync::Arc;

    fn setup() -> (PointerRouter, CaptionButtons, Arc<Mutex<Vec<E>>>) {
        let buttons = CaptionButtons::new(Arc::new(Dispatcher::new()), Duration::from_millis(100));
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        buttons.events().connect(move |e| l.lock().push(*e));
        (PointerRouter::new(), buttons, log)
    }

    #[test]
    fn test_hover_diffing() {
        let (router, buttons, log) = setup();
        router.pointer_moved(RegionCode::Caption, &buttons);
        router.pointer_moved(RegionCode::Close, &buttons);
        router.pointer_moved(RegionCode::Close, &buttons);
        router.pointer_moved(RegionCode::Maximize, &buttons);
        router.pointer_left(&buttons);
        assert_eq!(
            *log.lock(),
            vec![
                E::HoverEnter(CaptionButton::Close),
                E::HoverLeave(CaptionButton::Close),
                E::HoverEnter(CaptionButton::Maximize),
                E::HoverLeave(CaptionButton::Maximize),
            ]
        );
        assert_eq!(router.last_region(), None);
    }

    #[test]
    fn test_press_release_same_button_clicks() {
        let (router, buttons, log) = setup();
        let now = Instant::now();
        let p = Point::new(785, 15);
        assert_eq!(
            router.pointer_pressed(RegionCode::Close, PointerButton::Primary, p, now, &buttons),
            PointerAction::ButtonPressed(CaptionButton::Close)
        );
        assert_eq!(
            router.pointer_released(RegionCode::Close, PointerButton::Primary, &buttons),
            PointerAction::ButtonReleased
        );
        assert!(log.lock().contains(&E::Clicked(CaptionButton::Close)));
    }

    #[test]
    fn test_release_elsewhere_cancels() {
        let (router, buttons, log) = setup();
        let now = Instant::now();
        router.pointer_pressed(RegionCode::Minimize, PointerButton::Primary, Point::new(0, 0), now, &buttons);
        router.pointer_released(RegionCode::Maximize, PointerButton::Primary, &buttons);
        assert!(!log.lock().iter().any(|e| matches!(e, E::Clicked(_))));
        assert_eq!(buttons.pressed(), None);

        router.pointer_pressed(RegionCode::Close, PointerButton::Primary, Point::new(0, 0), now, &buttons);
        router.pointer_released(RegionCode::Caption, PointerButton::Primary, &buttons);
        assert!(!log.lock().iter().any(|e| matches!(e, E::Clicked(_))));
    }

    #[test]
    fn test_caption_press_moves_and_double_click_toggles() {
        let (router, buttons, _) = setup();
        let t0 = Instant::now();
        let p = Point::new(400, 15);
        assert_eq!(
            router.pointer_pressed(RegionCode::Caption, PointerButton::Primary, p, t0, &buttons),
            PointerAction::BeginMove
        );
        assert_eq!(
            router.pointer_pressed(
                RegionCode::Caption,
                PointerButton::Primary,
                p.translated(2, 1),
                t0 + Duration::from_millis(200),
                &buttons
            ),
            PointerAction::ToggleMaximize
        );
        // A third press starts a fresh sequence.
        assert_eq!(
            router.pointer_pressed(
                RegionCode::Caption,
                PointerButton::Primary,
                p,
                t0 + Duration::from_millis(300),
                &buttons
            ),
            PointerAction::BeginMove
        );
    }

    #[test]
    fn test_slow_second_press_is_not_double_click() {
        let (router, buttons, _) = setup();
        let t0 = Instant::now();
        let p = Point::new(400, 15);
        router.pointer_pressed(RegionCode::Caption, PointerButton::Primary, p, t0, &buttons);
        assert_eq!(
            router.pointer_pressed(
                RegionCode::Caption,
                PointerButton::Primary,
                p,
                t0 + DOUBLE_CLICK_INTERVAL,
                &buttons
            ),
            PointerAction::BeginMove
        );
    }

    #[test]
    fn test_edges_and_menus() {
        let (router, buttons, _) = setup();
        let now = Instant::now();
        let p = Point::new(1, 1);
        assert_eq!(
            router.pointer_pressed(RegionCode::TopLeft, PointerButton::Primary, p, now, &buttons),
            PointerAction::BeginResize(ResizeDirection::NorthWest)
        );
        assert_eq!(
            router.pointer_pressed(RegionCode::SystemMenu, PointerButton::Primary, p, now, &buttons),
            PointerAction::ShowSystemMenu(p)
        );
        assert_eq!(
            router.pointer_pressed(RegionCode::Caption, PointerButton::Secondary, p, now, &buttons),
            PointerAction::ShowSystemMenu(p)
        );
        assert_eq!(
            router.pointer_pressed(RegionCode::Nowhere, PointerButton::Primary, p, now, &buttons),
            PointerAction::Client
        );
        assert_eq!(
            router.pointer_released(RegionCode::Nowhere, PointerButton::Primary, &buttons),
            PointerAction::Client
        );
    }
}
