use std::collections::BTreeMap;

use foundation::ids::PointId;

use crate::residency::LoadState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    UnknownId(PointId),
    AlreadySettled { id: PointId, state: LoadState },
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::UnknownId(id) => write!(f, "no cache entry for point {id}"),
            CacheError::AlreadySettled { id, state } => {
                write!(f, "cache entry for point {id} already settled as {state:?}")
            }
        }
    }
}

impl std::error::Error for CacheError {}

/// Borrowed view of a cache entry, as handed to the renderer.
#[derive(Debug)]
pub enum ImageState<'a, I> {
    Pending,
    Loaded(&'a I),
    Failed,
}

impl<I> Clone for ImageState<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for ImageState<'_, I> {}

impl<'a, I> ImageState<'a, I> {
    pub fn load_state(&self) -> LoadState {
        match self {
            ImageState::Pending => LoadState::Pending,
            ImageState::Loaded(_) => LoadState::Loaded,
            ImageState::Failed => LoadState::Failed,
        }
    }

    pub fn image(&self) -> Option<&'a I> {
        match self {
            ImageState::Loaded(image) => Some(image),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct ImageEntry<I> {
    state: LoadState,
    image: Option<I>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CacheCounts {
    pub pending: usize,
    pub loaded: usize,
    pub failed: usize,
}

/// Thumbnail cache keyed by point id.
///
/// Entries are created once and never evicted; the dataset size bounds the
/// cache. `BTreeMap` keeps traversal order stable.
#[derive(Debug, Clone)]
pub struct ImageCache<I> {
    entries: BTreeMap<PointId, ImageEntry<I>>,
}

impl<I> Default for ImageCache<I> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<I> ImageCache<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Creates a pending entry. Returns `false` if `id` already had one.
    pub fn insert_pending(&mut self, id: PointId) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(
            id,
            ImageEntry {
                state: LoadState::Pending,
                image: None,
            },
        );
        true
    }

    pub fn get(&self, id: PointId) -> Option<ImageState<'_, I>> {
        let entry = self.entries.get(&id)?;
        Some(match (entry.state, entry.image.as_ref()) {
            (LoadState::Loaded, Some(image)) => ImageState::Loaded(image),
            (LoadState::Failed, _) => ImageState::Failed,
            _ => ImageState::Pending,
        })
    }

    pub fn mark_loaded(&mut self, id: PointId, image: I) -> Result<(), CacheError> {
        let entry = self.settle(id, LoadState::Loaded)?;
        entry.image = Some(image);
        Ok(())
    }

    pub fn mark_failed(&mut self, id: PointId) -> Result<(), CacheError> {
        self.settle(id, LoadState::Failed).map(|_| ())
    }

    fn settle(&mut self, id: PointId, next: LoadState) -> Result<&mut ImageEntry<I>, CacheError> {
        let entry = self.entries.get_mut(&id).ok_or(CacheError::UnknownId(id))?;
        if !entry.state.can_transition_to(next) {
            return Err(CacheError::AlreadySettled {
                id,
                state: entry.state,
            });
        }
        entry.state = next;
        Ok(entry)
    }

    pub fn counts(&self) -> CacheCounts {
        let mut counts = CacheCounts::default();
        for entry in self.entries.values() {
            match entry.state {
                LoadState::Pending => counts.pending += 1,
                LoadState::Loaded => counts.loaded += 1,
                LoadState::Failed => counts.failed += 1,
            }
        }
        counts
    }
}
