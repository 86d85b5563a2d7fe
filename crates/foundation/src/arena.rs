use std::ops::{Index, IndexMut};

/// Append-only arena addressed by `usize` handles.
///
/// Handles are never invalidated: there is no removal, so a handle returned by
/// [`Arena::alloc`] stays valid for the lifetime of the arena.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, v: T) -> usize {
        self.items.push(v);
        self.items.len() - 1
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.items.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates `(handle, item)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.items.iter().enumerate()
    }
}

impl<T> Index<usize> for Arena<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.items[idx]
    }
}

impl<T> IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        &mut self.items[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;

    #[test]
    fn handles_are_dense_and_stable() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!((a, b), (0, 1));
        assert_eq!(arena[a], "a");
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.get(2), None);

        arena[a] = "z";
        let items: Vec<_> = arena.iter().map(|(h, v)| (h, *v)).collect();
        assert_eq!(items, vec![(0, "z"), (1, "b")]);
    }
}
