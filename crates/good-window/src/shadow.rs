//! Shadow and resize-border overlay.
//!
//! A borderless window gets its drop shadow (and, where the compositor
//! already draws one, its outer resize grab area) from a separate overlay
//! surface that hugs the main frame. [`ShadowOverlay`] keeps that surface in
//! sync:
//!
//! - its geometry is `frame.adjusted(-w, -w, w, w)` clipped to the desktop
//!   work area, with `w` the shadow width scaled by the pixel ratio;
//! - it is only shown while the window is normal, visible and enabled;
//! - showing goes through a short restartable delay, so a window that is
//!   shown and immediately maximized never flashes a shadow;
//! - hiding is immediate and cancels a pending show.
//!
//! The overlay sees the main window only through [`OverlayHost`].

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use good_window_core::logging::targets;
use good_window_core::{Dispatcher, TimerId};

use crate::geometry::{PixelRatio, Rect};
use crate::screen::{Screen, ScreenSet};
use crate::state::WindowState;

/// Overlay flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverlayMode {
    /// One surface around the frame painting a drop shadow.
    #[default]
    Shadow,
    /// Four invisible resize strips; the compositor paints the shadow.
    BorderStrips,
}

/// Where the overlay surface(s) go, in physical desktop coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayPlacement {
    /// A single surrounding rectangle.
    Shadow(Rect),
    /// Up to four strips (top, left, right, bottom); clipped-away strips are dropped.
    Strips(Vec<Rect>),
}

impl OverlayPlacement {
    /// Bounding rectangle of the whole placement.
    pub fn bounding_rect(&self) -> Rect {
        match self {
            Self::Shadow(rect) => *rect,
            Self::Strips(strips) => strips.iter().fold(Rect::default(), |acc, r| acc.united(r)),
        }
    }
}

/// The overlay surface implementation (painting is up to the implementor).
pub trait OverlaySurface: Send + Sync {
    /// Move/resize the surface.
    fn place(&self, placement: &OverlayPlacement);
    /// Show or hide the surface.
    fn set_visible(&self, visible: bool);
    /// Switch between the active and inactive appearance.
    fn set_active(&self, active: bool);
    /// Release the surface for good.
    fn destroy(&self) {}
}

/// An overlay that does nothing, for hosts without shadow support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOverlay;

impl OverlaySurface for NullOverlay {
    fn place(&self, _placement: &OverlayPlacement) {}
    fn set_visible(&self, _visible: bool) {}
    fn set_active(&self, _active: bool) {}
}

/// What the overlay may know about the main window.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSnapshot {
    /// Main frame in physical desktop coordinates.
    pub frame: Rect,
    /// Main window is active.
    pub active: bool,
    /// Pixel ratio of the main window's monitor.
    pub pixel_ratio: PixelRatio,
    /// Canonical state.
    pub state: WindowState,
    /// Main window is visible.
    pub visible: bool,
    /// Main window is enabled (not blocked by a modal child).
    pub enabled: bool,
    /// Connected screens.
    pub screens: Vec<Screen>,
}

impl HostSnapshot {
    /// The overlay must be hidden for this host state.
    pub fn suppresses_overlay(&self) -> bool {
        self.state != WindowState::NoState || !self.visible || !self.enabled
    }
}

/// Access to the main window for deferred overlay work.
pub trait OverlayHost: Send + Sync {
    /// Current host state, or `None` once the host is closed.
    fn overlay_snapshot(&self) -> Option<HostSnapshot>;
}

/// Compute the overlay placement for a host.
pub fn placement_for(snapshot: &HostSnapshot, mode: OverlayMode, shadow_width: i32) -> OverlayPlacement {
    let w = snapshot.pixel_ratio.to_physical(shadow_width);
    let frame = snapshot.frame;
    let clip = |rect: Rect| {
        if snapshot.screens.is_empty() {
            rect
        } else {
            snapshot.screens.clip_to_work_areas(&rect)
        }
    };

    match mode {
        OverlayMode::Shadow => OverlayPlacement::Shadow(clip(frame.adjusted(-w, -w, w, w))),
        OverlayMode::BorderStrips => {
            let outer = frame.adjusted(-w, -w, w, w);
            let strips = [
                Rect::new(outer.x, outer.y, outer.width, w),
                Rect::new(outer.x, frame.y, w, frame.height),
                Rect::new(frame.x + frame.width, frame.y, w, frame.height),
                Rect::new(outer.x, frame.y + frame.height, outer.width, w),
            ];
            OverlayPlacement::Strips(
                strips
                    .into_iter()
                    .map(clip)
                    .filter(|r| !r.is_empty())
                    .collect(),
            )
        }
    }
}

#[derive(Debug, Default)]
struct OverlayInner {
    visible: bool,
    active: bool,
    pending_show: Option<TimerId>,
    placement: Option<OverlayPlacement>,
    destroyed: bool,
}

/// Keeps an [`OverlaySurface`] in sync with its host window.
pub struct ShadowOverlay {
    surface: Box<dyn OverlaySurface>,
    host: Weak<dyn OverlayHost>,
    dispatcher: Arc<Dispatcher>,
    mode: OverlayMode,
    shadow_width: i32,
    show_delay: Duration,
    inner: Mutex<OverlayInner>,
}

impl ShadowOverlay {
    /// Create the controller; the overlay starts hidden.
    pub fn new(
        surface: Box<dyn OverlaySurface>,
        host: Weak<dyn OverlayHost>,
        dispatcher: Arc<Dispatcher>,
        mode: OverlayMode,
        shadow_width: i32,
        show_delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            surface,
            host,
            dispatcher,
            mode,
            shadow_width: shadow_width.max(0),
            show_delay,
            inner: Mutex::new(OverlayInner::default()),
        })
    }

    /// Overlay flavour.
    pub fn mode(&self) -> OverlayMode {
        self.mode
    }

    /// Whether the surface is currently shown.
    pub fn is_visible(&self) -> bool {
        self.inner.lock().visible
    }

    /// Whether a delayed show is armed.
    pub fn is_show_pending(&self) -> bool {
        self.inner
            .lock()
            .pending_show
            .is_some_and(|id| self.dispatcher.is_timer_active(id))
    }

    /// Current appearance.
    pub fn is_active(&self) -> bool {
        self.inner.lock().active
    }

    /// Last placement handed to the surface.
    pub fn placement(&self) -> Option<OverlayPlacement> {
        self.inner.lock().placement.clone()
    }

    // =========================================================================
    // Sync
    // =========================================================================

    /// Recompute the placement after a geometry change.
    ///
    /// A suppressed host hides the overlay instead.
    pub fn resync(&self, snapshot: &HostSnapshot) {
        if self.inner.lock().destroyed {
            return;
        }
        if snapshot.suppresses_overlay() {
            self.hide();
            return;
        }
        self.place(snapshot);
    }

    fn place(&self, snapshot: &HostSnapshot) {
        let placement = placement_for(snapshot, self.mode, self.shadow_width);
        {
            let mut inner = self.inner.lock();
            if inner.placement.as_ref() == Some(&placement) {
                return;
            }
            inner.placement = Some(placement.clone());
        }
        tracing::trace!(target: targets::SHADOW, ?placement, "overlay placed");
        self.surface.place(&placement);
    }

    /// Show the overlay after the configured delay; a repeated call restarts
    /// the delay.
    pub fn show_later(self: &Arc<Self>) {
        let mut inner = self.inner.lock();
        if inner.destroyed {
            return;
        }
        if let Some(id) = inner.pending_show
            && self.dispatcher.restart_timer(id, self.show_delay).is_ok()
        {
            tracing::trace!(target: targets::SHADOW, "delayed show restarted");
            return;
        }
        let weak = Arc::downgrade(self);
        let id = self.dispatcher.start_single_shot(self.show_delay, move || {
            if let Some(overlay) = weak.upgrade() {
                overlay.show_now();
            }
        });
        inner.pending_show = Some(id);
    }

    /// Show immediately if the host allows it.
    pub fn show_now(&self) {
        {
            let mut inner = self.inner.lock();
            if let Some(id) = inner.pending_show.take() {
                self.dispatcher.stop_timer(id);
            }
            if inner.destroyed {
                return;
            }
        }
        let Some(snapshot) = self.host.upgrade().and_then(|h| h.overlay_snapshot()) else {
            tracing::debug!(target: targets::SHADOW, "host gone, delayed show dropped");
            return;
        };
        if snapshot.suppresses_overlay() {
            tracing::trace!(target: targets::SHADOW, state = ?snapshot.state, "show suppressed");
            return;
        }
        self.place(&snapshot);
        self.set_active(snapshot.active);

        let newly_visible = !std::mem::replace(&mut self.inner.lock().visible, true);
        if newly_visible {
            tracing::debug!(target: targets::SHADOW, "overlay shown");
            self.surface.set_visible(true);
        }
    }

    /// Hide immediately and cancel a pending show.
    pub fn hide(&self) {
        let was_visible = {
            let mut inner = self.inner.lock();
            if let Some(id) = inner.pending_show.take() {
                self.dispatcher.stop_timer(id);
            }
            std::mem::replace(&mut inner.visible, false)
        };
        if was_visible {
            tracing::debug!(target: targets::SHADOW, "overlay hidden");
            self.surface.set_visible(false);
        }
    }

    /// Switch the painted appearance; visibility is unaffected.
    pub fn set_active(&self, active: bool) {
        {
            let mut inner = self.inner.lock();
            if inner.destroyed || inner.active == active {
                return;
            }
            inner.active = active;
        }
        self.surface.set_active(active);
    }

    /// Tear the overlay down. Further calls are no-ops.
    pub fn destroy(&self) {
        self.hide();
        {
            let mut inner = self.inner.lock();
            if std::mem::replace(&mut inner.destroyed, true) {
                return;
            }
            inner.placement = None;
        }
        tracing::debug!(target: targets::SHADOW, "overlay destroyed");
        self.surface.destroy();
    }
}

impl std::fmt::Debug for ShadowOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowOverlay")
            .field("mode", &self.mode)
            .field("shadow_width", &self.shadow_width)
            .field("inner", &*self.inner.lock())
            .finish()
    }
}

static_assertions::assert_impl_all!(ShadowOverlay: Send, Sync);
