//! Deferred task queue.
//!
//! Tasks are zero-delay continuations posted back onto the event loop. They
//! run in post order, once per loop turn.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
pub(crate) type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

pub(crate) struct TaskData {
    pub id: TaskId,
    pub task: BoxedTask,
}

/// FIFO queue of deferred tasks.
pub struct TaskQueue {
    tasks: VecDeque<TaskData>,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Post a task to be executed on the next loop turn.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            task: Box::new(task),
        });
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Take every task queued so far, leaving the queue empty.
    ///
    /// Tasks posted while the returned batch runs land in the queue and wait
    /// for the next turn.
    pub(crate) fn take_all(&mut self) -> VecDeque<TaskData> {
        std::mem::take(&mut self.tasks)
    }

    /// Drop every pending task without running it.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_cancel() {
        let mut queue = TaskQueue::new();
        let a = queue.post(|| {});
        let b = queue.post(|| {});
        assert_ne!(a, b);
        assert_eq!(queue.pending_count(), 2);

        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert_eq!(queue.pending_count(), 1);
    }

    #[test]
    fn test_take_all_preserves_order() {
        let mut queue = TaskQueue::new();
        let a = queue.post(|| {});
        let b = queue.post(|| {});

        let batch: Vec<TaskId> = queue.take_all().into_iter().map(|t| t.id).collect();
        assert_eq!(batch, vec![a, b]);
        assert!(!queue.has_pending());
    }
}
