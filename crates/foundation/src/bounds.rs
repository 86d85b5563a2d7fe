use crate::math::Vec2;

/// Axis-aligned rectangle in world or screen space.
///
/// `min` is the top-left corner, `max` the bottom-right (y grows downward).
/// A rectangle with `max < min` on either axis, or any NaN coordinate, is
/// empty: it contains nothing and intersects nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Aabb2 {
            min: [a.x.min(b.x), a.y.min(b.y)],
            max: [a.x.max(b.x), a.y.max(b.y)],
        }
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = Aabb2::new([first.x, first.y], [first.x, first.y]);
        for p in iter {
            out.extend(p);
        }
        Some(out)
    }

    pub fn extend(&mut self, p: Vec2) {
        self.min[0] = self.min[0].min(p.x);
        self.min[1] = self.min[1].min(p.y);
        self.max[0] = self.max[0].max(p.x);
        self.max[1] = self.max[1].max(p.y);
    }

    pub fn union(&self, other: &Self) -> Self {
        Aabb2 {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }

    /// `true` for inverted or NaN rectangles. Zero-area rectangles are not empty.
    pub fn is_empty(&self) -> bool {
        !(self.min[0] <= self.max[0] && self.min[1] <= self.max[1])
    }

    /// Closed containment test: points on any edge are inside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min[0] && p.x <= self.max[0] && p.y >= self.min[1] && p.y <= self.max[1]
    }

    /// Closed overlap test; rectangles touching along an edge intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min[0] <= other.max[0]
            && other.min[0] <= self.max[0]
            && self.min[1] <= other.max[1]
            && other.min[1] <= self.max[1]
    }

    /// Splits into four equal quadrants ordered `[NW, NE, SW, SE]`.
    ///
    /// The order matches [`Aabb2::quadrant_of`].
    pub fn quadrants(&self) -> [Aabb2; 4] {
        let c = self.center();
        [
            Aabb2::new(self.min, [c.x, c.y]),
            Aabb2::new([c.x, self.min[1]], [self.max[0], c.y]),
            Aabb2::new([self.min[0], c.y], [c.x, self.max[1]]),
            Aabb2::new([c.x, c.y], self.max),
        ]
    }

    /// Index into [`Aabb2::quadrants`] for `p`.
    ///
    /// Lower edges are inclusive: a point on the vertical midline goes east,
    /// on the horizontal midline goes south. Every point of the closed
    /// rectangle maps to exactly one quadrant.
    pub fn quadrant_of(&self, p: Vec2) -> usize {
        let c = self.center();
        let east = usize::from(p.x >= c.x);
        let south = usize::from(p.y >= c.y);
        east + 2 * south
    }

    pub fn padded(&self, margin: f64) -> Self {
        Aabb2 {
            min: [self.min[0] - margin, self.min[1] - margin],
            max: [self.max[0] + margin, self.max[1] + margin],
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Aabb2::from_corners(
            Vec2::new(self.min[0] * factor, self.min[1] * factor),
            Vec2::new(self.max[0] * factor, self.max[1] * factor),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn containment_is_closed() {
        let r = Aabb2::new([0.0, 0.0], [10.0, 5.0]);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(10.0, 5.0)));
        assert!(!r.contains(Vec2::new(10.000_1, 5.0)));
        assert!(!r.contains(Vec2::new(f64::NAN, 1.0)));
    }

    #[test]
    fn inverted_and_nan_rects_are_empty() {
        let inverted = Aabb2::new([5.0, 0.0], [1.0, 1.0]);
        let nan = Aabb2::new([f64::NAN, 0.0], [1.0, 1.0]);
        let full = Aabb2::new([-100.0, -100.0], [100.0, 100.0]);
        assert!(inverted.is_empty());
        assert!(nan.is_empty());
        assert!(!inverted.intersects(&full));
        assert!(!full.intersects(&nan));
        assert!(!Aabb2::new([1.0, 1.0], [1.0, 1.0]).is_empty());
    }

    #[test]
    fn quadrant_of_matches_quadrants() {
        let r = Aabb2::new([0.0, 0.0], [4.0, 4.0]);
        let quads = r.quadrants();
        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(4.0, 4.0),
        ] {
            assert!(quads[r.quadrant_of(p)].contains(p), "{p:?}");
        }
        assert_eq!(r.quadrant_of(Vec2::new(2.0, 1.0)), 1);
        assert_eq!(r.quadrant_of(Vec2::new(1.0, 2.0)), 2);
    }

    #[test]
    fn from_points_and_union() {
        let b = Aabb2::from_points([Vec2::new(1.0, -2.0), Vec2::new(-3.0, 4.0)]).unwrap();
        assert_eq!(b, Aabb2::new([-3.0, -2.0], [1.0, 4.0]));
        assert!(Aabb2::from_points(std::iter::empty::<Vec2>()).is_none());

        let u = b.union(&Aabb2::new([0.0, 0.0], [9.0, 1.0]));
        assert_eq!(u, Aabb2::new([-3.0, -2.0], [9.0, 4.0]));
        assert_eq!(b.scaled(2.0), Aabb2::new([-6.0, -4.0], [2.0, 8.0]));
    }
}
