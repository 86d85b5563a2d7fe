use std::collections::HashMap;
use std::fmt;

use foundation::bounds::Aabb2;
use foundation::ids::PointId;
use foundation::math::Vec2;

/// One positioned item: a thumbnail plus its text label.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: PointId,
    /// World-space position (already scaled by the dataset's world scale).
    pub position: Vec2,
    pub label: String,
}

impl Point {
    pub fn new(id: u32, x: f64, y: f64, label: impl Into<String>) -> Self {
        Self {
            id: PointId(id),
            position: Vec2::new(x, y),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    DuplicateId(PointId),
    NonFinitePosition(PointId),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::DuplicateId(id) => write!(f, "duplicate point id {id}"),
            DatasetError::NonFinitePosition(id) => {
                write!(f, "point {id} has a non-finite position")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

/// The immutable point set loaded once at startup.
///
/// Points are addressed by their position in the load order (`usize` index);
/// the spatial index and per-frame query results hold these indices rather
/// than copies of the points.
#[derive(Debug, Clone)]
pub struct Dataset {
    points: Vec<Point>,
    bounds: Aabb2,
    by_id: HashMap<PointId, usize>,
}

impl Dataset {
    /// Builds a dataset, validating ids and positions.
    ///
    /// `declared_bounds` is widened as needed so that it encloses every point;
    /// when absent, the bounds are computed from the points.
    pub fn new(points: Vec<Point>, declared_bounds: Option<Aabb2>) -> Result<Self, DatasetError> {
        let mut by_id = HashMap::with_capacity(points.len());
        for (idx, p) in points.iter().enumerate() {
            if !p.position.is_finite() {
                return Err(DatasetError::NonFinitePosition(p.id));
            }
            if by_id.insert(p.id, idx).is_some() {
                return Err(DatasetError::DuplicateId(p.id));
            }
        }

        let computed = Aabb2::from_points(points.iter().map(|p| p.position));
        let bounds = match (declared_bounds, computed) {
            (Some(declared), Some(computed)) if !declared.is_empty() => declared.union(&computed),
            (_, Some(computed)) => computed,
            (Some(declared), None) if !declared.is_empty() => declared,
            _ => Aabb2::new([0.0, 0.0], [0.0, 0.0]),
        };

        Ok(Self {
            points,
            bounds,
            by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn by_id(&self, id: PointId) -> Option<&Point> {
        self.index_of(id).and_then(|idx| self.points.get(idx))
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| p.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, DatasetError, Point};
    use foundation::bounds::Aabb2;
    use foundation::ids::PointId;

    #[test]
    fn computes_bounds_and_lookup() {
        let ds = Dataset::new(
            vec![Point::new(7, -1.0, 2.0, "a"), Point::new(3, 4.0, -5.0, "b")],
            None,
        )
        .expect("dataset");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.bounds(), Aabb2::new([-1.0, -5.0], [4.0, 2.0]));
        assert_eq!(ds.index_of(PointId(3)), Some(1));
        assert_eq!(ds.by_id(PointId(7)).map(|p| p.label.as_str()), Some("a"));
        assert_eq!(ds.by_id(PointId(99)), None);
    }

    #[test]
    fn declared_bounds_are_widened_to_cover_points() {
        let declared = Aabb2::new([0.0, 0.0], [1.0, 1.0]);
        let ds = Dataset::new(vec![Point::new(0, 3.0, 0.5, "x")], Some(declared)).unwrap();
        assert_eq!(ds.bounds(), Aabb2::new([0.0, 0.0], [3.0, 1.0]));
    }

    #[test]
    fn rejects_duplicates_and_non_finite() {
        let dup = Dataset::new(
            vec![Point::new(1, 0.0, 0.0, "a"), Point::new(1, 1.0, 1.0, "b")],
            None,
        );
        assert_eq!(dup.unwrap_err(), DatasetError::DuplicateId(PointId(1)));

        let nan = Dataset::new(vec![Point::new(2, f64::NAN, 0.0, "a")], None);
        assert_eq!(nan.unwrap_err(), DatasetError::NonFinitePosition(PointId(2)));
    }

    #[test]
    fn empty_dataset_is_valid() {
        let ds = Dataset::new(Vec::new(), None).unwrap();
        assert!(ds.is_empty());
        assert!(!ds.bounds().is_empty());
    }
}
