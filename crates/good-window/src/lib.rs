//! Good Window - custom window chrome for borderless top-level windows.
//!
//! The application draws its own title bar and caption buttons; this crate
//! makes the result behave like a native window:
//!
//! - **Hit testing**: every desktop point is classified into one of 15
//!   regions (resize edges and corners, caption, system-menu icon, caption
//!   buttons, client) from margins and masks the title bar publishes
//! - **Caption buttons**: hover/press/release/click state machine with click
//!   debouncing, reported as a stream of 15 events
//! - **Window procedure**: platform messages ([`PlatformMessage`]) are routed
//!   through [`GoodWindow::handle_message`]
//! - **Shadow overlay**: a drop shadow (or border strips) kept in sync with
//!   the window's frame, activation and state
//! - **Lifecycle**: canonical [`WindowState`], cancelable close, focus
//!   restoration, monitor and DPI changes, geometry save/restore
//!
//! Native windows plug in through [`native::NativeTopLevelWindow`]; a winit
//! backend and a headless backend ship with the crate.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use good_window::prelude::*;
//! use good_window::native::HeadlessWindow;
//! use good_window_core::Dispatcher;
//!
//! fn main() -> Result<(), ChromeError> {
//!     let dispatcher = Arc::new(Dispatcher::new());
//!     let window = GoodWindow::builder(dispatcher.clone(), ThemeService::system())
//!         .with_config(ChromeConfig::new().with_border_width(8))
//!         .with_title("Notes")
//!         .build(|| Ok(Box::new(HeadlessWindow::new(Rect::new(100, 100, 800, 600)))))?;
//!
//!     window.set_margins(Margins::new(32, 24, 0, 138));
//!     window.set_caption_buttons_handled(true, Corner::TopRight);
//!     window.caption_button_event().connect(|event| println!("{event:?}"));
//!     window.show();
//!     Ok(())
//! }
//! ```

pub mod caption_buttons;
pub mod client;
pub mod config;
pub mod dialog;
mod error;
pub mod geometry;
mod good_window;
pub mod message;
pub mod native;
pub mod pointer_router;
mod procedure;
pub mod screen;
pub mod shadow;
mod state;
pub mod system_menu;
pub mod theme;
pub mod window_geometry;

pub use caption_buttons::{ButtonState, CaptionButton, CaptionButtonEvent, CaptionButtons};
pub use client::{ClientEvent, ClientWindow, CloseEvent, FocusId};
pub use config::ChromeConfig;
pub use dialog::{ModalDialog, dialog_placement, run_modal};
pub use error::{ChromeError, ChromeResult, GeometryBlobError};
pub use geometry::{Margins, PixelRatio, Point, Rect, Region, Size};
pub use good_window::{GoodWindow, GoodWindowBuilder, StateChangeEvent, ThemeChangeEvent};
pub use hit_test::{Corner, MaskKind, RegionCode, WindowChrome};
pub use message::{MessageResult, PlatformMessage, PointerButton};
pub use screen::{Screen, ScreenId, ScreenSet};
pub use shadow::{OverlayMode, OverlayPlacement, OverlaySurface};
pub use state::{FixedSize, WindowState};
pub use system_menu::{SystemCommand, SystemMenu, SystemMenuItem};
pub use theme::{ColorScheme, ThemeService};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        CaptionButton, CaptionButtonEvent, ChromeConfig, ChromeError, ChromeResult, ClientWindow,
        Corner, FixedSize, GoodWindow, Margins, MaskKind, MessageResult, PlatformMessage, Point,
        Rect, Region, RegionCode, Size, ThemeService, WindowState,
    };
}
