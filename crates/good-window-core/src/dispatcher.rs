//! The per-loop-turn dispatcher.
//!
//! A [`Dispatcher`] is the explicit replacement for "post a zero-delay timer"
//! style continuations. It owns a FIFO task queue and the timer heap, and the
//! host event loop calls [`Dispatcher::process`] once per iteration:
//!
//! 1. expired timers fire, in deadline order;
//! 2. tasks queued before the drain began run, in post order.
//!
//! Tasks posted while a turn is running wait for the next turn, so a handler
//! can always defer work without re-entering itself. Callbacks are expected
//! to capture a `Weak` reference to their owner and bail out when the owner
//! is gone; the dispatcher itself never knows about windows.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use good_window_core::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.post(|| println!("next turn"));
//! let id = dispatcher.start_single_shot(Duration::from_millis(100), || println!("later"));
//!
//! dispatcher.process(Instant::now());
//! assert!(dispatcher.is_timer_active(id));
//! ```

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::Result;
use crate::logging::targets;
use crate::task::{TaskId, TaskQueue};
use crate::thread_check::ThreadAffinity;
use crate::timer::{TimerCallback, TimerId, TimerKind, TimerManager};

type Waker = Box<dyn Fn() + Send + Sync + 'static>;

/// What one call to [`Dispatcher::process`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnStats {
    /// Number of timers that fired.
    pub timers_fired: usize,
    /// Number of deferred tasks that ran.
    pub tasks_run: usize,
}

/// Timer heap plus deferred task queue, drained once per loop turn.
pub struct Dispatcher {
    affinity: ThreadAffinity,
    timers: Mutex<TimerManager>,
    tasks: Mutex<TaskQueue>,
    waker: Mutex<Option<Waker>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create a dispatcher bound to the current thread.
    pub fn new() -> Self {
        Self {
            affinity: ThreadAffinity::current(),
            timers: Mutex::new(TimerManager::new()),
            tasks: Mutex::new(TaskQueue::new()),
            waker: Mutex::new(None),
        }
    }

    /// Install a hook that wakes the host event loop when work is posted.
    ///
    /// The winit runner installs an `EventLoopProxy` based waker here.
    pub fn set_waker<F>(&self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.waker.lock() = Some(Box::new(waker));
    }

    fn wake(&self) {
        if let Some(waker) = self.waker.lock().as_ref() {
            waker();
        }
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Post a continuation to run on the next loop turn.
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.tasks.lock().post(task);
        tracing::trace!(target: targets::TASK, task_id = id.as_u64(), "task posted");
        self.wake();
        id
    }

    /// Cancel a pending continuation.
    pub fn cancel_task(&self, id: TaskId) -> bool {
        self.tasks.lock().cancel(id)
    }

    /// Number of continuations waiting for the next turn.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.lock().pending_count()
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Start a single-shot timer measured from `Instant::now()`.
    pub fn start_single_shot<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        self.start_single_shot_at(Instant::now(), delay, callback)
    }

    /// Start a single-shot timer measured from an explicit `now`.
    pub fn start_single_shot_at<F>(&self, now: Instant, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.timers.lock().start(
            now,
            delay,
            TimerKind::OneShot,
            Some(TimerCallback::Once(Box::new(callback))),
        );
        self.wake();
        id
    }

    /// Start a single-shot timer that only marks a time window.
    ///
    /// The timer is active until it expires or is stopped; nothing runs when
    /// it fires.
    pub fn start_marker(&self, delay: Duration) -> TimerId {
        self.start_marker_at(Instant::now(), delay)
    }

    /// [`Dispatcher::start_marker`] with an explicit `now`.
    pub fn start_marker_at(&self, now: Instant, delay: Duration) -> TimerId {
        let id = self.timers.lock().start_one_shot(now, delay);
        self.wake();
        id
    }

    /// Start a repeating timer.
    pub fn start_repeating<F>(&self, interval: Duration, callback: F) -> TimerId
    where
        F: FnMut() + Send + 'static,
    {
        let id = self.timers.lock().start(
            Instant::now(),
            interval,
            TimerKind::Repeating,
            Some(TimerCallback::Repeating(Box::new(callback))),
        );
        self.wake();
        id
    }

    /// Re-arm an active timer, keeping its callback.
    pub fn restart_timer(&self, id: TimerId, delay: Duration) -> Result<()> {
        self.restart_timer_at(id, Instant::now(), delay)
    }

    /// [`Dispatcher::restart_timer`] with an explicit `now`.
    pub fn restart_timer_at(&self, id: TimerId, now: Instant, delay: Duration) -> Result<()> {
        self.timers.lock().restart(id, now, delay)
    }

    /// Stop a timer. Stopping an expired or unknown timer is a no-op.
    pub fn stop_timer(&self, id: TimerId) -> bool {
        self.timers.lock().stop(id).is_ok()
    }

    /// Check whether a timer is still pending.
    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.timers.lock().is_active(id)
    }

    /// Number of pending timers.
    pub fn active_timers(&self) -> usize {
        self.timers.lock().active_count()
    }

    /// How long the host loop may sleep before the next timer is due.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        if self.tasks.lock().has_pending() {
            return Some(Duration::ZERO);
        }
        self.timers.lock().time_until_next(now)
    }

    // =========================================================================
    // Loop turn
    // =========================================================================

    /// Run one loop turn: fire expired timers, then drain queued tasks.
    #[tracing::instrument(name = "good_window::dispatch", skip(self), target = "good_window_core::dispatcher", level = "trace")]
    pub fn process(&self, now: Instant) -> TurnStats {
        self.affinity.debug_assert_same_thread("Dispatcher");
        let mut stats = TurnStats::default();

        let expired = self.timers.lock().take_expired(now);
        for timer in expired {
            stats.timers_fired += 1;
            match timer.callback {
                Some(TimerCallback::Once(callback)) => callback(),
                Some(TimerCallback::Repeating(mut callback)) => {
                    callback();
                    debug_assert_eq!(timer.kind, TimerKind::Repeating);
                    self.timers
                        .lock()
                        .restore_callback(timer.id, TimerCallback::Repeating(callback));
                }
                None => {}
            }
        }

        let batch = self.tasks.lock().take_all();
        for task in batch {
            stats.tasks_run += 1;
            (task.task)();
        }

        if stats != TurnStats::default() {
            tracing::trace!(
                target: targets::DISPATCHER,
                timers = stats.timers_fired,
                tasks = stats.tasks_run,
                "loop turn"
            );
        }
        stats
    }

    /// Drop every pending timer and task.
    pub fn clear(&self) {
        self.timers.lock().clear();
        self.tasks.lock().clear();
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("timers", &self.active_timers())
            .field("tasks", &self.pending_tasks())
            .finish()
    }
}

static_assertions::assert_impl_all!(Dispatcher: Send, Sync);
