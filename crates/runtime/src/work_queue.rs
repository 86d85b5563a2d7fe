use std::collections::VecDeque;

/// Monotonic ticket assigned to each pushed item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkId(pub u64);

/// First-in, first-out work queue.
///
/// Key properties:
/// - Items pop in exactly the order they were pushed.
/// - Every pushed item pops exactly once.
/// - Ids are assigned in push order and never reused.
#[derive(Debug)]
pub struct WorkQueue<T> {
    next_id: u64,
    items: VecDeque<(WorkId, T)>,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: VecDeque::new(),
        }
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of items ever pushed.
    pub fn pushed_total(&self) -> u64 {
        self.next_id
    }

    pub fn push(&mut self, payload: T) -> WorkId {
        let id = WorkId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push_back((id, payload));
        id
    }

    /// Pops the oldest item.
    pub fn pop_next(&mut self) -> Option<(WorkId, T)> {
        self.items.pop_front()
    }
}
