//! Core event-loop plumbing for Good Window.
//!
//! This crate provides the pieces every window-chrome component builds on:
//!
//! - **Signals**: type-safe notifications ([`Signal`]) used for caption button
//!   events, state changes and theme changes
//! - **Timers**: stoppable, restartable single-shot and repeating timers
//! - **Task queue**: zero-delay continuations posted back onto the event loop
//! - **Dispatcher**: drains timers and tasks once per event-loop iteration
//! - **Thread affinity**: debug checks that state stays on the loop thread
//!
//! Everything here is driven by the host event loop, which calls
//! [`Dispatcher::process`] once per iteration. There is no background thread.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//! use good_window_core::{Dispatcher, Signal};
//!
//! let dispatcher = Arc::new(Dispatcher::new());
//! let settled = Arc::new(Signal::<()>::new());
//!
//! let s = settled.clone();
//! dispatcher.start_single_shot(Duration::from_millis(50), move || s.emit(()));
//!
//! // Later, from the event loop:
//! dispatcher.process(Instant::now() + Duration::from_millis(50));
//! ```

mod dispatcher;
mod error;
pub mod logging;
pub mod signal;
mod task;
pub mod thread_check;
mod timer;

pub use dispatcher::{Dispatcher, TurnStats};
pub use error::{CoreError, Result};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};
pub use thread_check::ThreadAffinity;
pub use timer::{TimerId, TimerKind, TimerManager};
