//! Chrome configuration.
//!
//! The pixel constants of the chrome (resize border, shadow width, timer
//! delays) are configuration, not contract. [`ChromeConfig`] collects them
//! with serde defaults so a partial TOML table overrides only what it names.
//!
//! ```
//! use good_window::ChromeConfig;
//!
//! let config = ChromeConfig::from_toml_str("border_width = 8\nshadow_width = 12").unwrap();
//! assert_eq!(config.border_width, 8);
//! assert_eq!(config.click_debounce_ms, 100);
//!
//! let config = ChromeConfig::new().with_delete_on_close(true);
//! assert!(config.delete_on_close);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ChromeResult;
use crate::hit_test::DEFAULT_BORDER_WIDTH;
use crate::shadow::OverlayMode;

/// Tunable constants of a chrome window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Resize border thickness in logical pixels.
    pub border_width: i32,
    /// Shadow overlay margin around the frame in logical pixels.
    pub shadow_width: i32,
    /// Time after a completed click during which releases are ignored.
    pub click_debounce_ms: u64,
    /// Delay before a requested shadow show takes effect.
    pub shadow_show_delay_ms: u64,
    /// Distance kept from the work-area edge when re-anchoring after a
    /// monitor change, in logical pixels.
    pub monitor_safety_margin: i32,
    /// Whether the title bar has a window icon / system-menu zone.
    pub show_window_icon: bool,
    /// Overlay flavour.
    pub overlay_mode: OverlayMode,
    /// Destroy the native window once a close has been accepted.
    pub delete_on_close: bool,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            border_width: DEFAULT_BORDER_WIDTH,
            shadow_width: 10,
            click_debounce_ms: 100,
            shadow_show_delay_ms: 100,
            monitor_safety_margin: 20,
            show_window_icon: cfg!(target_os = "windows"),
            overlay_mode: OverlayMode::default(),
            delete_on_close: false,
        }
    }
}

impl ChromeConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> ChromeResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ChromeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            target: good_window_core::logging::targets::LIFECYCLE,
            path = %path.display(),
            "loaded chrome configuration"
        );
        Ok(config)
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Set the resize border thickness (logical pixels).
    pub fn with_border_width(mut self, width: i32) -> Self {
        self.border_width = width.max(0);
        self
    }

    /// Set the shadow margin (logical pixels).
    pub fn with_shadow_width(mut self, width: i32) -> Self {
        self.shadow_width = width.max(0);
        self
    }

    /// Set the click debounce window.
    pub fn with_click_debounce(mut self, delay: Duration) -> Self {
        self.click_debounce_ms = delay.as_millis() as u64;
        self
    }

    /// Set the delayed-show interval of the shadow overlay.
    pub fn with_shadow_show_delay(mut self, delay: Duration) -> Self {
        self.shadow_show_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the monitor-change safety margin (logical pixels).
    pub fn with_monitor_safety_margin(mut self, margin: i32) -> Self {
        self.monitor_safety_margin = margin.max(0);
        self
    }

    /// Enable or disable the window icon zone.
    pub fn with_window_icon(mut self, show: bool) -> Self {
        self.show_window_icon = show;
        self
    }

    /// Select the overlay flavour.
    pub fn with_overlay_mode(mut self, mode: OverlayMode) -> Self {
        self.overlay_mode = mode;
        self
    }

    /// Destroy the native window after an accepted close.
    pub fn with_delete_on_close(mut self, delete: bool) -> Self {
        self.delete_on_close = delete;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Click debounce window as a `Duration`.
    pub fn click_debounce(&self) -> Duration {
        Duration::from_millis(self.click_debounce_ms)
    }

    /// Shadow delayed-show interval as a `Duration`.
    pub fn shadow_show_delay(&self) -> Duration {
        Duration::from_millis(self.shadow_show_delay_ms)
    }
}
