//! Dark/light theme service.
//!
//! One [`ThemeService`] is created at application startup and handed to every
//! [`GoodWindow`](crate::GoodWindow). Windows ask it for the current scheme
//! and call [`ThemeService::refresh`] when the platform reports a theme or
//! settings change; listeners learn about actual changes through
//! [`ThemeService::color_scheme_changed`].
//!
//! ```
//! use std::sync::Arc;
//! use good_window::theme::{ColorScheme, FixedThemeSource, ThemeService};
//!
//! let source = Arc::new(FixedThemeSource::new(ColorScheme::Light));
//! let theme = ThemeService::new(Box::new(source.clone()));
//! assert!(!theme.is_dark());
//!
//! source.set(ColorScheme::Dark);
//! assert!(theme.refresh());
//! assert!(theme.is_dark());
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use good_window_core::Signal;
use good_window_core::logging::targets;

/// System color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    /// Light mode (dark text on light background).
    Light,
    /// Dark mode (light text on dark background).
    Dark,
    /// Unable to determine the preference.
    #[default]
    Unknown,
}

impl ColorScheme {
    /// Returns true if this is dark mode.
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Where the current color scheme comes from.
pub trait ThemeSource: Send + Sync {
    /// Query the current scheme.
    fn color_scheme(&self) -> ColorScheme;
}

impl<T: ThemeSource + ?Sized> ThemeSource for Arc<T> {
    fn color_scheme(&self) -> ColorScheme {
        (**self).color_scheme()
    }
}

/// The operating system's preference.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemThemeSource;

impl ThemeSource for SystemThemeSource {
    #[cfg(feature = "system-theme")]
    fn color_scheme(&self) -> ColorScheme {
        match dark_light::detect() {
            dark_light::Mode::Dark => ColorScheme::Dark,
            dark_light::Mode::Light => ColorScheme::Light,
            dark_light::Mode::Default => ColorScheme::Unknown,
        }
    }

    #[cfg(not(feature = "system-theme"))]
    fn color_scheme(&self) -> ColorScheme {
        ColorScheme::Unknown
    }
}

/// A scheme set by the application (tests, forced themes).
#[derive(Debug, Default)]
pub struct FixedThemeSource {
    scheme: Mutex<ColorScheme>,
}

impl FixedThemeSource {
    /// Start with `scheme`.
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme: Mutex::new(scheme),
        }
    }

    /// Change the reported scheme. Takes effect on the next refresh.
    pub fn set(&self, scheme: ColorScheme) {
        *self.scheme.lock() = scheme;
    }
}

impl ThemeSource for FixedThemeSource {
    fn color_scheme(&self) -> ColorScheme {
        *self.scheme.lock()
    }
}

/// Process-scoped theme state shared by all windows.
pub struct ThemeService {
    source: Box<dyn ThemeSource>,
    scheme: Mutex<ColorScheme>,
    color_scheme_changed: Signal<ColorScheme>,
}

impl ThemeService {
    /// Create the service and read the initial scheme.
    pub fn new(source: Box<dyn ThemeSource>) -> Arc<Self> {
        let scheme = source.color_scheme();
        tracing::debug!(target: targets::THEME, ?scheme, "theme service started");
        Arc::new(Self {
            source,
            scheme: Mutex::new(scheme),
            color_scheme_changed: Signal::new(),
        })
    }

    /// Service backed by the operating system preference.
    pub fn system() -> Arc<Self> {
        Self::new(Box::new(SystemThemeSource))
    }

    /// Cached scheme.
    pub fn color_scheme(&self) -> ColorScheme {
        *self.scheme.lock()
    }

    /// Whether the cached scheme is dark.
    pub fn is_dark(&self) -> bool {
        self.color_scheme().is_dark()
    }

    /// Re-query the source. Returns true and notifies listeners when the
    /// dark flag changed.
    pub fn refresh(&self) -> bool {
        let scheme = self.source.color_scheme();
        let previous = std::mem::replace(&mut *self.scheme.lock(), scheme);
        if previous.is_dark() == scheme.is_dark() {
            return false;
        }
        tracing::info!(target: targets::THEME, from = ?previous, to = ?scheme, "color scheme changed");
        self.color_scheme_changed.emit(scheme);
        true
    }

    /// Emitted when [`refresh`](Self::refresh) observes a dark/light change.
    pub fn color_scheme_changed(&self) -> &Signal<ColorScheme> {
        &self.color_scheme_changed
    }

    /// Drop every listener. Called at application shutdown.
    pub fn shutdown(&self) {
        self.color_scheme_changed.disconnect_all();
        tracing::debug!(target: targets::THEME, "theme service stopped");
    }
}

impl std::fmt::Debug for ThemeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeService")
            .field("scheme", &self.color_scheme())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_refresh_reports_only_dark_flag_changes() {
        let source = Arc::new(FixedThemeSource::new(ColorScheme::Unknown));
        let theme = ThemeService::new(Box::new(source.clone()));
        let changes = Arc::new(AtomicUsize::new(0));
        let c = changes.clone();
        theme.color_scheme_changed().connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        // Unknown -> Light keeps "not dark".
        source.set(ColorScheme::Light);
        assert!(!theme.refresh());
        assert_eq!(theme.color_scheme(), ColorScheme::Light);

        source.set(ColorScheme::Dark);
        assert!(theme.refresh());
        assert!(!theme.refresh());
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shutdown_disconnects() {
        let theme = ThemeService::new(Box::new(FixedThemeSource::new(ColorScheme::Dark)));
        theme.color_scheme_changed().connect(|_| {});
        theme.shutdown();
        assert_eq!(theme.color_scheme_changed().connection_count(), 0);
    }

    #[test]
    fn test_system_source_does_not_panic() {
        let _ = SystemThemeSource.color_scheme();
    }
}
