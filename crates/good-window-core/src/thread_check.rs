//! Event-loop thread affinity.
//!
//! Every piece of chrome state is owned by the event-loop thread. The
//! [`ThreadAffinity`] tracker records the thread a dispatcher was created on
//! and lets hot paths assert (in debug builds) that they are still on it.

use std::thread::ThreadId;

/// Records the thread an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Debug-only assertion that we are on the same thread.
    ///
    /// This is a no-op in release builds.
    #[inline]
    pub fn debug_assert_same_thread(&self, what: &str) {
        #[cfg(debug_assertions)]
        if !self.is_same_thread() {
            self.panic_wrong_thread(what);
        }
        #[cfg(not(debug_assertions))]
        let _ = what;
    }

    #[cold]
    #[inline(never)]
    #[cfg(debug_assertions)]
    fn panic_wrong_thread(&self, what: &str) -> ! {
        let current = std::thread::current();
        panic!(
            "{what} accessed from thread \"{}\" ({:?}) but it belongs to the event-loop thread {:?}",
            current.name().unwrap_or("<unnamed>"),
            current.id(),
            self.thread_id
        )
    }
}
