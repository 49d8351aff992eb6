//! Modal dialogs over a chrome window.
//!
//! The dialog itself (its window, its content, its nested event loop) is the
//! application's business and sits behind [`ModalDialog`]. This module only
//! decides where the dialog goes and keeps the parent blocked while it runs.

use crate::geometry::{Point, Rect, Size};
use crate::good_window::GoodWindow;
use crate::screen::ScreenSet;
use crate::state::WindowState;

use good_window_core::logging::targets;

/// A blocking dialog primitive.
pub trait ModalDialog {
    /// What the dialog returns when dismissed.
    type Output;

    /// Preferred outer size in physical pixels.
    fn size_hint(&self) -> Size;

    /// Show the dialog at `frame` and block until it is dismissed.
    fn exec(&mut self, frame: Rect) -> Self::Output;
}

/// Where a dialog of `size` should appear for `parent`.
///
/// Centered over the parent's frame, or over the nearest work area when the
/// parent is hidden or minimized; then kept inside that work area.
pub fn dialog_placement(parent: &GoodWindow, size: Size) -> Rect {
    let parent_frame = parent.frame_geometry();
    let screens = parent.screens();
    let work_area = screens
        .nearest_to(&parent_frame)
        .or_else(|| screens.primary())
        .map(|screen| screen.work_area());

    let parent_usable = parent.is_visible()
        && !matches!(parent.window_state(), WindowState::Minimized | WindowState::Closed);
    let center = match work_area {
        Some(area) if !parent_usable => area.center(),
        _ => parent_frame.center(),
    };

    let frame = Rect::from_origin_size(Point::default(), size).centered_on(center);
    match work_area {
        Some(area) => keep_inside(frame, area),
        None => frame,
    }
}

/// Shift `frame` so it lies inside `area`; an oversized frame is aligned to
/// the area's top-left corner.
fn keep_inside(frame: Rect, area: Rect) -> Rect {
    let max_x = (area.x + area.width - frame.width).max(area.x);
    let max_y = (area.y + area.height - frame.height).max(area.y);
    frame.moved_to(Point::new(
        frame.x.clamp(area.x, max_x),
        frame.y.clamp(area.y, max_y),
    ))
}

/// Run `dialog` modally over `parent`.
///
/// The parent is disabled for the duration (its overlay hides and its
/// pointer input is ignored), then re-enabled and re-activated.
pub fn run_modal<D: ModalDialog>(parent: &GoodWindow, dialog: &mut D) -> D::Output {
    let frame = dialog_placement(parent, dialog.size_hint());
    let was_enabled = parent.is_enabled();
    tracing::debug!(target: targets::LIFECYCLE, ?frame, "running modal dialog");

    parent.set_enabled(false);
    let output = dialog.exec(frame);
    if was_enabled {
        parent.set_enabled(true);
    }
    parent.activate_window();
    output
}
