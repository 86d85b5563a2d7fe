use std::collections::BTreeSet;

use foundation::ids::PointId;

/// Set of point ids matching the active search.
///
/// Produced by the search collaborator and read-only to the frame loop: points
/// outside the set are drawn de-emphasized, never dropped from queries.
///
/// Memory is proportional to the number of matches, not to the largest id.
///
/// Ordering contract:
/// - Iteration yields ids in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    ids: BTreeSet<PointId>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.ids.contains(&id)
    }

    /// Inserts `id` into the set.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, id: PointId) -> bool {
        self.ids.insert(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = PointId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<PointId> for FilterSet {
    fn from_iter<I: IntoIterator<Item = PointId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FilterSet;
    use foundation::ids::PointId;

    #[test]
    fn insert_contains_and_len() {
        let mut s = FilterSet::new();
        assert!(s.is_empty());
        assert!(!s.contains(PointId(1)));

        assert!(s.insert(PointId(1)));
        assert!(s.contains(PointId(1)));
        assert!(!s.insert(PointId(1)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn collects_and_iterates_sorted() {
        let s: FilterSet = [PointId(65), PointId(2), PointId(10), PointId(2)]
            .into_iter()
            .collect();
        assert_eq!(s.len(), 3);
        let got: Vec<u32> = s.iter().map(|id| id.0).collect();
        assert_eq!(got, vec![2, 10, 65]);
    }

    #[test]
    fn sparse_ids_near_the_top_of_the_range() {
        let top = PointId(u32::MAX - 1);
        let s: FilterSet = [top, PointId(0)].into_iter().collect();
        assert_eq!(s.len(), 2);
        assert!(s.contains(top));
        assert!(!s.contains(PointId(u32::MAX)));
        assert!(!s.contains(PointId(u32::MAX - 2)));
        let got: Vec<PointId> = s.iter().collect();
        assert_eq!(got, vec![PointId(0), top]);
    }
}
