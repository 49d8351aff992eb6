//! Timer system.
//!
//! Provides stoppable, restartable one-shot and repeating timers. Time is
//! always passed in explicitly (`now`), which keeps the manager independent of
//! the wall clock and makes the debounce and delayed-show logic built on top
//! of it deterministic under test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{CoreError, Result};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

/// Callback attached to a timer.
pub(crate) enum TimerCallback {
    Once(Box<dyn FnOnce() + Send + 'static>),
    Repeating(Box<dyn FnMut() + Send + 'static>),
}

struct TimerData {
    next_fire: Instant,
    interval: Duration,
    kind: TimerKind,
    /// Taken out while the callback runs, put back for repeating timers.
    callback: Option<TimerCallback>,
    /// Bumped on every restart so stale heap entries are skipped.
    generation: u64,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
    generation: u64,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; equal deadlines fire in start order.
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A timer that expired during [`TimerManager::take_expired`].
pub(crate) struct ExpiredTimer {
    pub id: TimerId,
    pub kind: TimerKind,
    pub callback: Option<TimerCallback>,
}

/// Manages all timers of one dispatcher.
pub struct TimerManager {
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<TimerQueueEntry>,
    sequence: u64,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }

    pub(crate) fn start(
        &mut self,
        now: Instant,
        interval: Duration,
        kind: TimerKind,
        callback: Option<TimerCallback>,
    ) -> TimerId {
        let next_fire = now + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
            callback,
            generation: 0,
        });
        self.push_entry(id, next_fire, 0);
        tracing::trace!(target: targets::TIMER, ?id, ?interval, ?kind, "timer started");
        id
    }

    /// Start a one-shot timer with no callback.
    ///
    /// Useful for pure "is the window still open" style checks such as
    /// debouncing: the timer is active until it expires or is stopped.
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        self.start(now, duration, TimerKind::OneShot, None)
    }

    /// Start a repeating timer with no callback.
    pub fn start_repeating(&mut self, now: Instant, interval: Duration) -> TimerId {
        self.start(now, interval, TimerKind::Repeating, None)
    }

    fn push_entry(&mut self, id: TimerId, fire_time: Instant, generation: u64) {
        self.sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            fire_time,
            generation,
            sequence: self.sequence,
        });
    }

    /// Re-arm an active timer so that it next fires `interval` after `now`.
    pub fn restart(&mut self, id: TimerId, now: Instant, interval: Duration) -> Result<()> {
        let timer = self.timers.get_mut(id).ok_or(CoreError::InvalidTimerId)?;
        timer.generation += 1;
        timer.interval = interval;
        timer.next_fire = now + interval;
        let (fire, generation) = (timer.next_fire, timer.generation);
        self.push_entry(id, fire, generation);
        tracing::trace!(target: targets::TIMER, ?id, ?interval, "timer restarted");
        Ok(())
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
            Ok(())
        } else {
            Err(CoreError::InvalidTimerId)
        }
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    fn is_current(&self, entry: &TimerQueueEntry) -> bool {
        self.timers
            .get(entry.id)
            .is_some_and(|t| t.generation == entry.generation)
    }

    fn discard_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.is_current(entry) {
                break;
            }
            self.queue.pop();
        }
    }

    /// Remove every timer due at `now` and hand back their callbacks.
    ///
    /// One-shot timers are removed before their callback runs, so a callback
    /// observing `is_active(id)` sees `false`. Repeating timers are
    /// rescheduled; the caller gives their callback back via
    /// [`TimerManager::restore_callback`].
    pub(crate) fn take_expired(&mut self, now: Instant) -> Vec<ExpiredTimer> {
        let mut expired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            if !self.is_current(&entry) {
                continue;
            }

            let id = entry.id;
            tracing::trace!(target: targets::TIMER, ?id, "timer fired");

            let Some(kind) = self.timers.get(id).map(|t| t.kind) else {
                continue;
            };
            match kind {
                TimerKind::OneShot => {
                    let data = self.timers.remove(id);
                    expired.push(ExpiredTimer {
                        id,
                        kind: TimerKind::OneShot,
                        callback: data.and_then(|d| d.callback),
                    });
                }
                TimerKind::Repeating => {
                    let Some(timer) = self.timers.get_mut(id) else {
                        continue;
                    };
                    timer.next_fire = now + timer.interval;
                    let callback = timer.callback.take();
                    let (fire, generation) = (timer.next_fire, timer.generation);
                    self.push_entry(id, fire, generation);
                    expired.push(ExpiredTimer {
                        id,
                        kind: TimerKind::Repeating,
                        callback,
                    });
                }
            }
        }

        expired
    }

    /// Give a repeating timer its callback back after it ran.
    ///
    /// Dropped silently if the timer was stopped from inside its own callback.
    pub(crate) fn restore_callback(&mut self, id: TimerId, callback: TimerCallback) {
        if let Some(timer) = self.timers.get_mut(id)
            && timer.callback.is_none()
        {
            timer.callback = Some(callback);
        }
    }

    /// Stop every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerManager")
            .field("active", &self.timers.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}
