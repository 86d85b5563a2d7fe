use std::sync::Arc;

use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use scene::dataset::Dataset;

use crate::commands::{OverviewFrame, ScreenRect};
use crate::config::OverviewConfig;

/// Fixed projection of the whole dataset into the overview pane.
///
/// The dataset never changes, so point positions are projected once and
/// shared with every frame; only the pane placement and the viewport
/// rectangle are recomputed per tick.
#[derive(Debug, Clone)]
pub struct Overview {
    config: OverviewConfig,
    world: Aabb2,
    /// Pane pixels per world unit (uniform on both axes).
    scale: f64,
    /// Pane-local offset that centres the dataset.
    offset: Vec2,
    points: Arc<[[f32; 2]]>,
}

impl Overview {
    pub fn build(dataset: &Dataset, config: OverviewConfig) -> Self {
        let world = dataset.bounds();
        let size = config.size_px;
        let extent = world.width().max(world.height());
        let scale = if extent > 0.0 { size / extent } else { 1.0 };
        let offset = Vec2::new(
            (size - world.width() * scale) * 0.5,
            (size - world.height() * scale) * 0.5,
        );

        let mut overview = Self {
            config,
            world,
            scale,
            offset,
            points: Arc::from(Vec::new()),
        };
        let points: Vec<[f32; 2]> = dataset
            .points()
            .iter()
            .map(|p| {
                let local = overview.world_to_local(p.position);
                [local.x as f32, local.y as f32]
            })
            .collect();
        overview.points = Arc::from(points);
        overview
    }

    /// Pane placement on a surface of the given size.
    pub fn pane_rect(&self, surface: Vec2) -> ScreenRect {
        let s = self.config.size_px;
        let m = self.config.margin_px;
        let min = [(surface.x - m - s) as f32, (surface.y - m - s) as f32];
        ScreenRect::new(min, [min[0] + s as f32, min[1] + s as f32])
    }

    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            (world.x - self.world.min[0]) * self.scale + self.offset.x,
            (world.y - self.world.min[1]) * self.scale + self.offset.y,
        )
    }

    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        Vec2::new(
            (local.x - self.offset.x) / self.scale + self.world.min[0],
            (local.y - self.offset.y) / self.scale + self.world.min[1],
        )
    }

    /// World position under a surface pixel, if it falls inside the pane.
    pub fn hit(&self, surface: Vec2, at: Vec2) -> Option<Vec2> {
        let pane = self.pane_rect(surface);
        if !pane.contains([at.x as f32, at.y as f32]) {
            return None;
        }
        let local = Vec2::new(at.x - pane.min[0] as f64, at.y - pane.min[1] as f64);
        Some(self.local_to_world(local))
    }

    pub fn frame(&self, surface: Vec2, viewport: &Aabb2) -> OverviewFrame {
        let rect = self.pane_rect(surface);
        let a = self.world_to_local(Vec2::new(viewport.min[0], viewport.min[1]));
        let b = self.world_to_local(Vec2::new(viewport.max[0], viewport.max[1]));
        let view = ScreenRect::new(
            [rect.min[0] + a.x as f32, rect.min[1] + a.y as f32],
            [rect.min[0] + b.x as f32, rect.min[1] + b.y as f32],
        );
        OverviewFrame {
            rect,
            points: Arc::clone(&self.points),
            viewport: view.clamped_to(&rect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Overview;
    use crate::commands::ScreenRect;
    use crate::config::OverviewConfig;
    use foundation::bounds::Aabb2;
    use foundation::math::Vec2;
    use scene::dataset::{Dataset, Point};
    use std::sync::Arc;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Point::new(0, -100.0, -50.0, "a"),
                Point::new(1, 100.0, 50.0, "b"),
                Point::new(2, 0.0, 0.0, "c"),
            ],
            None,
        )
        .expect("dataset")
    }

    #[test]
    fn projects_points_preserving_aspect() {
        let ov = Overview::build(&dataset(), OverviewConfig::default());
        // 200 x 100 world into 180 px: scale 0.9, centred vertically.
        assert_eq!(ov.points[0], [0.0, 45.0]);
        assert_eq!(ov.points[1], [180.0, 135.0]);
        assert_eq!(ov.points[2], [90.0, 90.0]);
    }

    #[test]
    fn pane_sits_in_bottom_right_corner() {
        let ov = Overview::build(&dataset(), OverviewConfig::default());
        let rect = ov.pane_rect(Vec2::new(800.0, 600.0));
        assert_eq!(rect, ScreenRect::new([608.0, 408.0], [788.0, 588.0]));
    }

    #[test]
    fn viewport_is_clipped_and_points_shared() {
        let ov = Overview::build(&dataset(), OverviewConfig::default());
        let surface = Vec2::new(800.0, 600.0);
        let f1 = ov.frame(surface, &Aabb2::new([-1_000.0, -10.0], [0.0, 10.0]));
        assert_eq!(f1.viewport.min[0], f1.rect.min[0]);
        assert_eq!(f1.viewport.max[0], f1.rect.min[0] + 90.0);

        let f2 = ov.frame(surface, &Aabb2::new([0.0, 0.0], [1.0, 1.0]));
        assert!(Arc::ptr_eq(&f1.points, &f2.points));
    }

    #[test]
    fn hit_maps_back_to_world() {
        let ov = Overview::build(&dataset(), OverviewConfig::default());
        let surface = Vec2::new(800.0, 600.0);
        let centre = ov.hit(surface, Vec2::new(608.0 + 90.0, 408.0 + 90.0)).expect("inside");
        assert!(centre.x.abs() < 1e-9 && centre.y.abs() < 1e-9);
        assert_eq!(ov.hit(surface, Vec2::new(10.0, 10.0)), None);
    }
}
