use std::{cmp::Reverse, collections::BinaryHeap, time::Duration};

struct Entry<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.due, self.seq) == (other.due, other.seq)
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Single-stream cooperative task queue on a virtual clock.
///
/// Tasks run in `(due, insertion order)`. Popping a task advances the clock to its due
/// time; the clock never goes backwards.
pub struct TaskQueue<T> {
    now: Duration,
    seq: u64,
    heap: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            heap: BinaryHeap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `task` to run `delay` after now.
    pub fn after(&mut self, delay: Duration, task: T) {
        let due = self.now.saturating_add(delay);
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry { due, seq, task }));
    }

    /// Queue `task` behind everything already due now.
    pub fn push_now(&mut self, task: T) {
        self.after(Duration::ZERO, task);
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(e)| e.due)
    }

    /// Pop the earliest task if it is due at or before `until`.
    pub fn pop_until(&mut self, until: Duration) -> Option<T> {
        if self.next_due()? > until {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Move the clock forward without running anything.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn count_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.heap.iter().filter(|Reverse(e)| pred(&e.task)).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/queue.rs"]
mod tests;
