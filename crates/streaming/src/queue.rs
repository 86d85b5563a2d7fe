use foundation::ids::PointId;
use runtime::work_queue::WorkQueue;

/// FIFO of thumbnail loads waiting for a free slot.
///
/// A thin wrapper over `runtime::WorkQueue` so the scheduler owns its policy
/// without duplicating queue logic.
#[derive(Debug, Default)]
pub struct LoadQueue {
    inner: WorkQueue<PointId>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn push(&mut self, id: PointId) {
        self.inner.push(id);
    }

    pub fn pop_next(&mut self) -> Option<PointId> {
        self.inner.pop_next().map(|(_, id)| id)
    }

    /// Total number of loads ever queued.
    pub fn queued_total(&self) -> u64 {
        self.inner.pushed_total()
    }
}
