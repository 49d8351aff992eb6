//! Shared fixtures: a chrome window over the headless backend with a
//! recording client and a recording overlay.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use good_window::client::FocusId;
use good_window::native::HeadlessWindow;
use good_window::theme::{ColorScheme, FixedThemeSource, ThemeService};
use good_window::{
    CaptionButtonEvent, ChromeConfig, ClientEvent, ClientWindow, CloseEvent, GoodWindow, Margins,
    OverlayPlacement, OverlaySurface, Rect, Region,
};
use good_window_core::Dispatcher;

/// Title bar layout used by most tests: 30 px high, buttons in the top-right
/// corner of an 800 px wide window.
pub const MINIMIZE_MASK: Rect = Rect::new(710, 0, 30, 30);
pub const MAXIMIZE_MASK: Rect = Rect::new(740, 0, 30, 30);
pub const CLOSE_MASK: Rect = Rect::new(770, 0, 30, 30);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Recording client
// =============================================================================

#[derive(Default)]
pub struct RecordingClient {
    pub events: Mutex<Vec<ClientEvent>>,
    pub veto_close: AtomicBool,
    pub close_requests: Mutex<usize>,
    pub focused: Mutex<Option<FocusId>>,
    pub focusable: Mutex<Vec<FocusId>>,
}

impl RecordingClient {
    pub fn take_events(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn set_veto(&self, veto: bool) {
        self.veto_close.store(veto, Ordering::SeqCst);
    }
}

impl ClientWindow for RecordingClient {
    fn event(&self, event: &ClientEvent) {
        self.events.lock().push(*event);
    }

    fn close_event(&self, event: &mut CloseEvent) {
        *self.close_requests.lock() += 1;
        if self.veto_close.load(Ordering::SeqCst) {
            event.ignore();
        }
    }

    fn focused_widget(&self) -> Option<FocusId> {
        *self.focused.lock()
    }

    fn set_focus(&self, widget: FocusId) -> bool {
        if self.focusable.lock().contains(&widget) {
            *self.focused.lock() = Some(widget);
            true
        } else {
            false
        }
    }

    fn first_focusable(&self) -> Option<FocusId> {
        self.focusable.lock().first().copied()
    }
}

// =============================================================================
// Recording overlay
// =============================================================================

#[derive(Debug, Default)]
pub struct OverlayLog {
    pub placement: Option<OverlayPlacement>,
    pub visible: bool,
    pub active: bool,
    pub destroyed: bool,
    pub show_count: usize,
}

pub struct RecordingOverlay(pub Arc<Mutex<OverlayLog>>);

impl OverlaySurface for RecordingOverlay {
    fn place(&self, placement: &OverlayPlacement) {
        self.0.lock().placement = Some(placement.clone());
    }

    fn set_visible(&self, visible: bool) {
        let mut log = self.0.lock();
        if visible {
            log.show_count += 1;
        }
        log.visible = visible;
    }

    fn set_active(&self, active: bool) {
        self.0.lock().active = active;
    }

    fn destroy(&self) {
        self.0.lock().destroyed = true;
    }
}

// =============================================================================
// Fixture
// =============================================================================

pub struct Fixture {
    pub window: Arc<GoodWindow>,
    pub native: Arc<HeadlessWindow>,
    pub client: Arc<RecordingClient>,
    pub overlay: Arc<Mutex<OverlayLog>>,
    pub theme_source: Arc<FixedThemeSource>,
    pub dispatcher: Arc<Dispatcher>,
    pub buttons: Arc<Mutex<Vec<CaptionButtonEvent>>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with(ChromeConfig::default(), HeadlessWindow::new(Rect::new(100, 100, 800, 600)))
    }

    pub fn with(config: ChromeConfig, native: HeadlessWindow) -> Self {
        init_tracing();
        let native = Arc::new(native);
        let client = Arc::new(RecordingClient::default());
        let overlay = Arc::new(Mutex::new(OverlayLog::default()));
        let theme_source = Arc::new(FixedThemeSource::new(ColorScheme::Light));
        let dispatcher = Arc::new(Dispatcher::new());
        let theme = ThemeService::new(Box::new(theme_source.clone()));

        let handle = native.clone();
        let window = GoodWindow::builder(dispatcher.clone(), theme)
            .with_config(config)
            .with_client(client.clone())
            .with_overlay(Box::new(RecordingOverlay(overlay.clone())))
            .with_title("Fixture")
            .build(move || Ok(Box::new(handle)))
            .expect("headless window creation");

        let buttons = Arc::new(Mutex::new(Vec::new()));
        let sink = buttons.clone();
        window
            .caption_button_event()
            .connect(move |event| sink.lock().push(*event));

        Self {
            window,
            native,
            client,
            overlay,
            theme_source,
            dispatcher,
            buttons,
        }
    }

    /// Title bar 30 px high with the three caption buttons at the top right.
    pub fn with_caption_buttons(self) -> Self {
        self.window.set_margins(Margins::new(30, 0, 0, 0));
        self.window.set_caption_buttons_handled(true, good_window::Corner::TopRight);
        self.window.set_minimize_mask(Region::from_rect(MINIMIZE_MASK));
        self.window.set_maximize_mask(Region::from_rect(MAXIMIZE_MASK));
        self.window.set_close_mask(Region::from_rect(CLOSE_MASK));
        self
    }

    /// Run loop turns far enough in the future for every pending timer to
    /// fire, including continuations those turns post.
    pub fn settle(&self) {
        let later = Instant::now() + Duration::from_secs(5);
        for _ in 0..4 {
            self.dispatcher.process(later);
        }
    }

    pub fn take_buttons(&self) -> Vec<CaptionButtonEvent> {
        std::mem::take(&mut *self.buttons.lock())
    }
}
