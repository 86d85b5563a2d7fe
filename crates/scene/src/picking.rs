use foundation::math::Vec2;
use foundation::math::precision::stable_total_cmp_f64;

use crate::dataset::Dataset;

/// Finds the candidate closest to `at` within `radius` world units.
///
/// `candidates` are dataset indices (typically this frame's visible set).
///
/// Ordering contract:
/// - The smallest distance wins.
/// - Equal distances resolve to the lower `PointId`.
pub fn pick_nearest(dataset: &Dataset, candidates: &[usize], at: Vec2, radius: f64) -> Option<usize> {
    if !(radius >= 0.0) || !at.is_finite() {
        return None;
    }
    let max_d2 = radius * radius;

    let mut best: Option<(f64, usize)> = None;
    for &idx in candidates {
        let Some(point) = dataset.get(idx) else {
            continue;
        };
        let d2 = point.position.distance_squared(at);
        if d2 > max_d2 {
            continue;
        }
        best = match best {
            None => Some((d2, idx)),
            Some((bd2, bidx)) => {
                let ord = stable_total_cmp_f64(d2, bd2).then_with(|| {
                    let bid = dataset.get(bidx).map(|p| p.id);
                    Some(point.id).cmp(&bid)
                });
                if ord.is_lt() {
                    Some((d2, idx))
                } else {
                    Some((bd2, bidx))
                }
            }
        };
    }
    best.map(|(_, idx)| idx)
}

#[cfg(test)]
mod tests {
    use super::pick_nearest;
    use crate::dataset::{Dataset, Point};
    use foundation::math::Vec2;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Point::new(5, 0.0, 0.0, "origin"),
                Point::new(2, 3.0, 0.0, "east"),
                Point::new(1, -3.0, 0.0, "west"),
            ],
            None,
        )
        .expect("dataset")
    }

    #[test]
    fn picks_closest_within_radius() {
        let ds = dataset();
        let all = [0, 1, 2];
        assert_eq!(pick_nearest(&ds, &all, Vec2::new(0.4, 0.0), 1.0), Some(0));
        assert_eq!(pick_nearest(&ds, &all, Vec2::new(2.5, 0.1), 1.0), Some(1));
        assert_eq!(pick_nearest(&ds, &all, Vec2::new(0.0, 5.0), 1.0), None);
    }

    #[test]
    fn only_considers_candidates() {
        let ds = dataset();
        assert_eq!(pick_nearest(&ds, &[1, 2], Vec2::new(0.4, 0.0), 1.0), None);
        assert_eq!(pick_nearest(&ds, &[1, 2, 99], Vec2::new(2.9, 0.0), 1.0), Some(1));
    }

    #[test]
    fn equal_distance_prefers_lower_id() {
        let ds = dataset();
        // Midway between "east" (id 2) and "west" (id 1).
        assert_eq!(pick_nearest(&ds, &[0, 1, 2], Vec2::new(0.0, 0.0), 0.0), Some(0));
        assert_eq!(pick_nearest(&ds, &[1, 2], Vec2::new(0.0, 0.0), 3.0), Some(2));
    }

    #[test]
    fn rejects_bad_inputs() {
        let ds = dataset();
        assert_eq!(pick_nearest(&ds, &[0], Vec2::new(f64::NAN, 0.0), 1.0), None);
        assert_eq!(pick_nearest(&ds, &[0], Vec2::ZERO, f64::NAN), None);
    }
}
