//! # Deadline Queue
//!
//! Delayed work keyed by a tick deadline and driven by an external clock.
//!
//! Tasks come out of [`DeadlineQueue::poll`] ordered by deadline, FIFO
//! within the same deadline. Cancellation removes the task from the queue
//! and hands its payload back.

use std::collections::{BTreeMap, HashMap};

/// Handle for a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// Tasks waiting for their deadline tick.
#[derive(Clone, Debug)]
pub struct DeadlineQueue<T> {
    /// Ordered by (deadline, sequence); the sequence doubles as the id.
    tasks: BTreeMap<(u64, u64), T>,
    /// Deadline of every pending task, for cancellation.
    deadlines: HashMap<TaskId, u64>,
    sequence: u64,
}

impl<T> Default for DeadlineQueue<T> {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            deadlines: HashMap::new(),
            sequence: 0,
        }
    }
}

impl<T> DeadlineQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to come due at tick `deadline`.
    pub fn schedule(&mut self, deadline: u64, payload: T) -> TaskId {
        let id = TaskId(self.sequence);
        self.sequence += 1;
        self.tasks.insert((deadline, id.0), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Removes a pending task, returning its payload.
    ///
    /// Returns `None` if the task already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.tasks.remove(&(deadline, id.0))
    }

    /// Removes and returns every task with `deadline <= now`.
    pub fn poll(&mut self, now: u64) -> Vec<T> {
        let mut due = Vec::new();
        while let Some(entry) = self.tasks.first_entry() {
            let (deadline, sequence) = *entry.key();
            if deadline > now {
                break;
            }
            self.deadlines.remove(&TaskId(sequence));
            due.push(entry.remove());
        }
        due
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.tasks.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancels every pending task. Returns how many there were.
    pub fn clear(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        self.deadlines.clear();
        cancelled
    }
}
