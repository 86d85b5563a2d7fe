use std::collections::HashSet;

use foundation::ids::PointId;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheCounts, ImageCache, ImageState};
use crate::io::{FetchError, FetchOutcome, ImageFetcher};
use crate::queue::LoadQueue;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub max_concurrent: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_concurrent: 8 }
    }
}

impl SchedulerConfig {
    pub fn normalized(self) -> Self {
        Self {
            max_concurrent: self.max_concurrent.max(1),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub started: u64,
    pub loaded: u64,
    pub failed: u64,
    pub peak_in_flight: usize,
}

/// What one [`ImageLoadScheduler::pump`] call did.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PumpSummary {
    pub loaded: usize,
    pub failed: usize,
    pub started: usize,
}

/// Bounded-concurrency thumbnail loader with a never-evicting cache.
///
/// Key properties:
/// - At most `max_concurrent` fetches are in flight at any time.
/// - Each id is fetched at most once per session, however often it is requested.
/// - Queued ids start in request order.
/// - A failed id stays failed; there is no retry.
pub struct ImageLoadScheduler<F: ImageFetcher> {
    fetcher: F,
    cache: ImageCache<F::Image>,
    queue: LoadQueue,
    in_flight: HashSet<PointId>,
    config: SchedulerConfig,
    stats: SchedulerStats,
    completed: Vec<FetchOutcome<F::Image>>,
}

impl<F: ImageFetcher> ImageLoadScheduler<F> {
    pub fn new(fetcher: F, config: SchedulerConfig) -> Self {
        let config = config.normalized();
        Self {
            fetcher,
            cache: ImageCache::new(),
            queue: LoadQueue::new(),
            in_flight: HashSet::with_capacity(config.max_concurrent),
            config,
            stats: SchedulerStats::default(),
            completed: Vec::new(),
        }
    }

    /// Returns the entry for `id`, creating it (and queueing its fetch) on
    /// first reference.
    pub fn request(&mut self, id: PointId) -> ImageState<'_, F::Image> {
        if self.cache.insert_pending(id) {
            self.queue.push(id);
            self.start_queued();
        }
        self.cache.get(id).unwrap_or(ImageState::Pending)
    }

    /// Looks up `id` without creating an entry.
    pub fn peek(&self, id: PointId) -> Option<ImageState<'_, F::Image>> {
        self.cache.get(id)
    }

    /// Applies every completion the fetcher has ready, then refills free slots.
    pub fn pump(&mut self) -> PumpSummary {
        let mut done = std::mem::take(&mut self.completed);
        self.fetcher.poll_completed(&mut done);

        let started_before = self.stats.started;
        let mut summary = PumpSummary::default();
        for outcome in done.drain(..) {
            let ok = outcome.result.is_ok();
            if self.complete(outcome.id, outcome.result) {
                if ok {
                    summary.loaded += 1;
                } else {
                    summary.failed += 1;
                }
            }
        }
        self.completed = done;

        self.start_queued();
        summary.started = (self.stats.started - started_before) as usize;
        summary
    }

    /// Settles an in-flight fetch and starts the next queued one.
    ///
    /// Completions for ids that are not in flight are ignored; returns whether
    /// this one was applied.
    pub fn complete(&mut self, id: PointId, result: Result<F::Image, FetchError>) -> bool {
        if !self.in_flight.remove(&id) {
            tracing::debug!(%id, "ignoring completion for an id that is not in flight");
            return false;
        }

        let settled = match result {
            Ok(image) => {
                self.stats.loaded += 1;
                self.cache.mark_loaded(id, image)
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "thumbnail load failed");
                self.stats.failed += 1;
                self.cache.mark_failed(id)
            }
        };
        if let Err(err) = settled {
            tracing::warn!(%id, error = %err, "cache rejected completion");
        }

        self.start_queued();
        true
    }

    fn start_queued(&mut self) {
        while self.in_flight.len() < self.config.max_concurrent {
            let Some(id) = self.queue.pop_next() else {
                break;
            };
            self.in_flight.insert(id);
            self.stats.started += 1;
            tracing::trace!(%id, in_flight = self.in_flight.len(), "starting thumbnail load");
            self.fetcher.start(id);
        }
        self.stats.peak_in_flight = self.stats.peak_in_flight.max(self.in_flight.len());
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn counts(&self) -> CacheCounts {
        self.cache.counts()
    }

    pub fn cache(&self) -> &ImageCache<F::Image> {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }
}
