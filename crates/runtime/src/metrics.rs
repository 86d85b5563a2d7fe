use std::collections::BTreeMap;
use std::fmt;

/// Frame-loop metrics: monotonic counters, last-value gauges and small
/// histograms, keyed by static names.
///
/// Keys live in sorted maps so snapshots list metrics in a stable order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    gauges: BTreeMap<&'static str, i64>,
    histograms: BTreeMap<&'static str, Histogram>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Histogram {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
}

impl Histogram {
    pub fn record(&mut self, value: i64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum = self.sum.saturating_add(value);
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: Vec<(&'static str, u64)>,
    pub gauges: Vec<(&'static str, i64)>,
    pub histograms: Vec<(&'static str, Histogram)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc_counter(&mut self, name: &'static str, by: u64) {
        *self.counters.entry(name).or_insert(0) += by;
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: &'static str, value: i64) {
        self.gauges.insert(name, value);
    }

    pub fn record_histogram(&mut self, name: &'static str, value: i64) {
        self.histograms.entry(name).or_default().record(value);
    }

    pub fn histogram(&self, name: &str) -> Option<Histogram> {
        self.histograms.get(name).copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (*k, *v)).collect(),
            gauges: self.gauges.iter().map(|(k, v)| (*k, *v)).collect(),
            histograms: self.histograms.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }
}

/// One-line `key=value` rendering for log output.
impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(self.counters.iter().map(|(k, v)| format!("{k}={v}")));
        parts.extend(self.gauges.iter().map(|(k, v)| format!("{k}={v}")));
        for (k, h) in &self.histograms {
            let mut part = format!("{k}[n={} min={} max={}", h.count, h.min, h.max);
            if let Some(mean) = h.mean() {
                part.push_str(&format!(" mean={mean:.1}"));
            }
            part.push(']');
            parts.push(part);
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::{Histogram, Metrics};

    #[test]
    fn counters_accumulate() {
        let mut m = Metrics::new();
        m.inc_counter("images.started", 1);
        m.inc_counter("images.started", 2);
        assert_eq!(m.counter("images.started"), 3);
        assert_eq!(m.counter("missing"), 0);
    }

    #[test]
    fn gauges_overwrite() {
        let mut m = Metrics::new();
        assert_eq!(m.gauge("visible"), None);
        m.set_gauge("visible", 10);
        m.set_gauge("visible", 11);
        assert_eq!(m.gauge("visible"), Some(11));
    }

    #[test]
    fn histogram_tracks_min_max_sum_count() {
        let mut h = Histogram::default();
        assert_eq!(h.mean(), None);
        h.record(5);
        h.record(-2);
        h.record(7);
        assert_eq!((h.count, h.sum, h.min, h.max), (3, 10, -2, 7));
        assert_eq!(h.mean(), Some(10.0 / 3.0));
    }

    #[test]
    fn snapshot_is_sorted_and_renders_one_line() {
        let mut m = Metrics::new();
        m.inc_counter("frames", 2);
        m.inc_counter("images.loaded", 1);
        m.set_gauge("visible", 4);
        m.record_histogram("query.results", 4);

        let snap = m.snapshot();
        assert_eq!(snap.counters, vec![("frames", 2), ("images.loaded", 1)]);
        assert_eq!(
            snap.to_string(),
            "frames=2 images.loaded=1 visible=4 query.results[n=1 min=4 max=4 mean=4.0]"
        );
    }
}
