//! Logging targets used across Good Window.
//!
//! Good Window uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; applications decide where the output goes:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("good_window::hit_test=trace,good_window=debug")
//!     .init();
//! ```
//!
//! The constants below are the stable target names, so filters written
//! against them keep working when modules move around.

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "good_window_core";
    /// Dispatcher loop turns.
    pub const DISPATCHER: &str = "good_window_core::dispatcher";
    /// Timer system target.
    pub const TIMER: &str = "good_window_core::timer";
    /// Deferred task queue target.
    pub const TASK: &str = "good_window_core::task";
    /// Signal emission target.
    pub const SIGNAL: &str = "good_window_core::signal";

    /// Hit-test classification.
    pub const HIT_TEST: &str = "good_window::hit_test";
    /// Caption button state machine.
    pub const BUTTONS: &str = "good_window::buttons";
    /// Shadow and border overlay.
    pub const SHADOW: &str = "good_window::shadow";
    /// Platform message interception.
    pub const PROCEDURE: &str = "good_window::procedure";
    /// Window lifecycle and state changes.
    pub const LIFECYCLE: &str = "good_window::lifecycle";
    /// Theme service.
    pub const THEME: &str = "good_window::theme";
    /// Native backends.
    pub const NATIVE: &str = "good_window::native";
}

/// Span names used for the dispatcher hot paths.
pub mod span_names {
    /// One dispatcher turn (timers then tasks).
    pub const DISPATCH: &str = "good_window::dispatch";
    /// Handling of a single platform message.
    pub const MESSAGE: &str = "good_window::message";
}
