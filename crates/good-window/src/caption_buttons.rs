//! Caption button hover/press/release tracking.
//!
//! [`CaptionButtons`] turns raw enter/leave/press/release notifications into
//! the discrete [`CaptionButtonEvent`] stream the title-bar UI paints from.
//! Notifications may arrive reordered or duplicated, so every transition
//! that does not apply to the current state is a silent no-op.
//!
//! Rules:
//!
//! - at most one button is hovered and at most one is pressed;
//! - a press always requests window activation;
//! - `Clicked` fires only when the release is valid (pointer still over the
//!   button) and targets the button that was pressed;
//! - after a click, releases are ignored until a short debounce timer
//!   expires, so duplicated release notifications never click twice.
//!
//! ```
//! use std::sync::Arc;
//! use good_window::caption_buttons::{CaptionButton, CaptionButtonEvent, CaptionButtons};
//! use good_window_core::Dispatcher;
//!
//! let buttons = CaptionButtons::new(Arc::new(Dispatcher::new()), std::time::Duration::from_millis(100));
//! buttons.events().connect(|event| {
//!     if let CaptionButtonEvent::Clicked(CaptionButton::Close) = event {
//!         println!("close clicked");
//!     }
//! });
//! buttons.press(CaptionButton::Close);
//! buttons.release(CaptionButton::Close, true);
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use good_window_core::logging::targets;
use good_window_core::{Dispatcher, Signal, TimerId};

/// The three caption buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionButton {
    /// Minimize.
    Minimize,
    /// Maximize or restore.
    Maximize,
    /// Close.
    Close,
}

impl CaptionButton {
    /// All buttons, in title-bar order.
    pub const ALL: [CaptionButton; 3] = [Self::Minimize, Self::Maximize, Self::Close];
}

/// One of the 15 discrete caption button notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionButtonEvent {
    /// The pointer entered the button.
    HoverEnter(CaptionButton),
    /// The pointer left the button.
    HoverLeave(CaptionButton),
    /// The button was pressed.
    Press(CaptionButton),
    /// The button was released (clicked or not).
    Release(CaptionButton),
    /// Press and release completed over the same button.
    Clicked(CaptionButton),
}

impl CaptionButtonEvent {
    /// The button the event refers to.
    pub fn button(&self) -> CaptionButton {
        match *self {
            Self::HoverEnter(b)
            | Self::HoverLeave(b)
            | Self::Press(b)
            | Self::Release(b)
            | Self::Clicked(b) => b,
        }
    }
}

/// Visual state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// The pointer is over the button.
    pub hovered: bool,
    /// The button is held down.
    pub pressed: bool,
}

#[derive(Debug, Default)]
struct ButtonsInner {
    hovered: Option<CaptionButton>,
    pressed: Option<CaptionButton>,
    debounce: Option<TimerId>,
}

/// Caption button state machine of one window.
pub struct CaptionButtons {
    dispatcher: Arc<Dispatcher>,
    debounce_delay: Duration,
    inner: Mutex<ButtonsInner>,
    events: Signal<CaptionButtonEvent>,
    activation_requested: Signal<()>,
}

impl CaptionButtons {
    /// Create the state machine; `debounce_delay` guards against duplicate releases.
    pub fn new(dispatcher: Arc<Dispatcher>, debounce_delay: Duration) -> Self {
        Self {
            dispatcher,
            debounce_delay,
            inner: Mutex::new(ButtonsInner::default()),
            events: Signal::new(),
            activation_requested: Signal::new(),
        }
    }

    /// Button event stream.
    pub fn events(&self) -> &Signal<CaptionButtonEvent> {
        &self.events
    }

    /// Emitted on every press; the owner activates the window.
    pub fn activation_requested(&self) -> &Signal<()> {
        &self.activation_requested
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// The pointer entered `button`.
    pub fn enter(&self, button: CaptionButton) {
        let mut out = Vec::new();
        {
            let mut inner = self.inner.lock();
            if inner.hovered == Some(button) {
                return;
            }
            if let Some(previous) = inner.hovered.replace(button) {
                out.push(CaptionButtonEvent::HoverLeave(previous));
            }
            out.push(CaptionButtonEvent::HoverEnter(button));
        }
        self.publish(out);
    }

    /// The pointer left `button`.
    pub fn leave(&self, button: CaptionButton) {
        {
            let mut inner = self.inner.lock();
            if inner.hovered != Some(button) {
                return;
            }
            inner.hovered = None;
        }
        self.publish(vec![CaptionButtonEvent::HoverLeave(button)]);
    }

    /// `button` was pressed. A press on a second button cancels the first.
    pub fn press(&self, button: CaptionButton) {
        let mut out = Vec::new();
        {
            let mut inner = self.inner.lock();
            if let Some(previous) = inner.pressed.replace(button) {
                if previous == button {
                    tracing::trace!(target: targets::BUTTONS, ?button, "duplicate press");
                } else {
                    out.push(CaptionButtonEvent::Release(previous));
                }
            }
            out.push(CaptionButtonEvent::Press(button));
        }
        self.publish(out);
        self.activation_requested.emit(());
    }

    /// The pointer button was released over `button`.
    ///
    /// `valid_click` is true when the pointer is still over the button that
    /// was pressed. Ignored when nothing is pressed or a click was completed
    /// within the debounce window.
    pub fn release(&self, button: CaptionButton, valid_click: bool) {
        let mut out = Vec::new();
        {
            let mut inner = self.inner.lock();
            let Some(captured) = inner.pressed else {
                tracing::trace!(target: targets::BUTTONS, ?button, "release without press");
                return;
            };
            if let Some(timer) = inner.debounce
                && self.dispatcher.is_timer_active(timer)
            {
                tracing::debug!(target: targets::BUTTONS, ?button, "release debounced");
                return;
            }

            inner.pressed = None;
            out.push(CaptionButtonEvent::Release(captured));
            if valid_click && captured == button {
                out.push(CaptionButtonEvent::Clicked(captured));
                inner.debounce = Some(self.dispatcher.start_marker(self.debounce_delay));
            }
        }
        self.publish(out);
    }

    /// Drop hover and press state, e.g. when the window is disabled or
    /// deactivated. Emits the pending leave/release, never a click.
    pub fn reset(&self) {
        let mut out = Vec::new();
        {
            let mut inner = self.inner.lock();
            if let Some(pressed) = inner.pressed.take() {
                out.push(CaptionButtonEvent::Release(pressed));
            }
            if let Some(hovered) = inner.hovered.take() {
                out.push(CaptionButtonEvent::HoverLeave(hovered));
            }
        }
        self.publish(out);
    }

    /// Stop the debounce timer and drop all state without emitting anything.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        if let Some(timer) = inner.debounce.take() {
            self.dispatcher.stop_timer(timer);
        }
        inner.hovered = None;
        inner.pressed = None;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current state of one button.
    pub fn state(&self, button: CaptionButton) -> ButtonState {
        let inner = self.inner.lock();
        ButtonState {
            hovered: inner.hovered == Some(button),
            pressed: inner.pressed == Some(button),
        }
    }

    /// The hovered button, if any.
    pub fn hovered(&self) -> Option<CaptionButton> {
        self.inner.lock().hovered
    }

    /// The pressed button, if any.
    pub fn pressed(&self) -> Option<CaptionButton> {
        self.inner.lock().pressed
    }

    /// True while releases are being debounced.
    pub fn is_debouncing(&self) -> bool {
        self.inner
            .lock()
            .debounce
            .is_some_and(|timer| self.dispatcher.is_timer_active(timer))
    }

    fn publish(&self, events: Vec<CaptionButtonEvent>) {
        for event in events {
            tracing::debug!(target: targets::BUTTONS, ?event, "caption button event");
            self.events.emit(event);
        }
    }
}

impl std::fmt::Debug for CaptionButtons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CaptionButtons")
            .field("hovered", &inner.hovered)
            .field("pressed", &inner.pressed)
            .field("debounce_delay", &self.debounce_delay)
            .finish()
    }
}

static_assertions::assert_impl_all!(CaptionButtons: Send, Sync);
