use foundation::ids::PointId;
use scene::dataset::Dataset;
use scene::filter::FilterSet;

/// Case-insensitive substring search over point labels.
///
/// Every whitespace-separated term must occur in a label for it to match.
#[derive(Debug, Clone, Default)]
pub struct LabelSearch {
    entries: Vec<(PointId, String)>,
}

impl LabelSearch {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            entries: dataset
                .points()
                .iter()
                .map(|p| (p.id, p.label.to_lowercase()))
                .collect(),
        }
    }

    /// `None` for a blank query (no filter), otherwise the matching ids.
    pub fn query(&self, query: &str) -> Option<FilterSet> {
        let terms = terms(query);
        if terms.is_empty() {
            return None;
        }
        Some(
            self.entries
                .iter()
                .filter(|(_, label)| matches(label, &terms))
                .map(|(id, _)| *id)
                .collect(),
        )
    }

    /// First match in dataset order, for "jump to result".
    pub fn first_match(&self, query: &str) -> Option<PointId> {
        let terms = terms(query);
        if terms.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(_, label)| matches(label, &terms))
            .map(|(id, _)| *id)
    }
}

fn terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

fn matches(label: &str, terms: &[String]) -> bool {
    terms.iter().all(|t| label.contains(t.as_str()))
}
