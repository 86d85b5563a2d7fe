//! Smoothed, inertial 2D camera.
//!
//! Input mutates the *target* transform; [`Camera::tick`] is the only place
//! the *current* transform moves, easing toward the target by a fixed
//! fraction per frame. Releasing a drag leaves a velocity that keeps pushing
//! the target and decays geometrically.

use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Camera centre in world units plus a zoom scalar (screen px per world unit).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl ViewTransform {
    pub const fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the remaining distance covered per tick.
    pub smoothing: f64,
    /// Per-tick velocity multiplier after release.
    pub friction: f64,
    /// Momentum stops below this speed (screen px per tick).
    pub momentum_threshold: f64,
    /// Multiplicative step for zoom in/out commands and keys.
    pub zoom_step: f64,
    pub wheel_sensitivity: f64,
    pub key_pan_px: f64,
    pub fly_to_zoom: f64,
    /// Share of the surface the dataset covers after a fit.
    pub fit_fill: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.01,
            max_zoom: 20.0,
            smoothing: 0.15,
            friction: 0.92,
            momentum_threshold: 0.1,
            zoom_step: 1.25,
            wheel_sensitivity: 0.0025,
            key_pan_px: 60.0,
            fly_to_zoom: 4.0,
            fit_fill: 0.9,
        }
    }
}

impl CameraConfig {
    /// Repairs out-of-range values instead of rejecting them.
    pub fn normalized(self) -> Self {
        let d = Self::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };

        let mut min_zoom = positive(self.min_zoom, d.min_zoom);
        let mut max_zoom = positive(self.max_zoom, d.max_zoom);
        if min_zoom > max_zoom {
            std::mem::swap(&mut min_zoom, &mut max_zoom);
        }

        Self {
            min_zoom,
            max_zoom,
            smoothing: positive(self.smoothing, d.smoothing).min(1.0),
            friction: if self.friction.is_finite() {
                self.friction.clamp(0.0, 0.999)
            } else {
                d.friction
            },
            momentum_threshold: positive(self.momentum_threshold, d.momentum_threshold),
            zoom_step: if self.zoom_step.is_finite() && self.zoom_step > 1.0 {
                self.zoom_step
            } else {
                d.zoom_step
            },
            wheel_sensitivity: positive(self.wheel_sensitivity, d.wheel_sensitivity),
            key_pan_px: positive(self.key_pan_px, d.key_pan_px),
            fly_to_zoom: positive(self.fly_to_zoom, d.fly_to_zoom).clamp(min_zoom, max_zoom),
            fit_fill: positive(self.fit_fill, d.fit_fill).min(1.0),
        }
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    current: ViewTransform,
    target: ViewTransform,
    /// Last drag delta in screen px; drives momentum once released.
    velocity: Vec2,
    dragging: bool,
    surface: Vec2,
    home: ViewTransform,
    config: CameraConfig,
}

impl Camera {
    pub fn new(config: CameraConfig, width_px: f64, height_px: f64) -> Self {
        let config = config.normalized();
        let home = ViewTransform::new(0.0, 0.0, config.clamp_zoom(1.0));
        Self {
            current: home,
            target: home,
            velocity: Vec2::ZERO,
            dragging: false,
            surface: Vec2::new(sanitize_extent(width_px), sanitize_extent(height_px)),
            home,
            config,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn current(&self) -> ViewTransform {
        self.current
    }

    pub fn target(&self) -> ViewTransform {
        self.target
    }

    pub fn home(&self) -> ViewTransform {
        self.home
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn surface_size(&self) -> Vec2 {
        self.surface
    }

    pub fn set_surface_size(&mut self, width_px: f64, height_px: f64) {
        self.surface = Vec2::new(sanitize_extent(width_px), sanitize_extent(height_px));
    }

    /// `true` once the current transform has reached the target and no
    /// momentum is left.
    pub fn is_settled(&self) -> bool {
        // Sub-pixel on screen counts as arrived.
        const EPS_PX: f64 = 1e-3;
        let z = self.current.zoom;
        self.velocity == Vec2::ZERO
            && ((self.current.x - self.target.x) * z).abs() < EPS_PX
            && ((self.current.y - self.target.y) * z).abs() < EPS_PX
            && ((self.current.zoom - self.target.zoom) / z).abs() < EPS_PX
    }

    /// Jumps both transforms to `view` without animation.
    pub fn set_view(&mut self, view: ViewTransform) {
        let view = self.sanitize(view);
        self.current = view;
        self.target = view;
        self.velocity = Vec2::ZERO;
    }

    /// Centres `bounds` on the surface, records the result as the home view
    /// and jumps to it.
    pub fn fit(&mut self, bounds: &Aabb2) {
        self.fit_home(bounds);
        self.set_view(self.home);
    }

    /// Recomputes the home view for `bounds` at the current surface size
    /// without moving the camera.
    pub fn fit_home(&mut self, bounds: &Aabb2) {
        if bounds.is_empty() {
            return;
        }
        let sx = self.surface.x / bounds.width();
        let sy = self.surface.y / bounds.height();
        let zoom = sx.min(sy) * self.config.fit_fill;
        let c = bounds.center();
        self.home = ViewTransform::new(c.x, c.y, self.config.clamp_zoom(zoom));
        tracing::debug!(x = c.x, y = c.y, zoom = self.home.zoom, "home view fitted");
    }

    /// Animates back to the home view.
    pub fn reset(&mut self) {
        self.velocity = Vec2::ZERO;
        self.target = self.home;
    }

    /// Animates to `world` at `zoom`.
    pub fn fly_to(&mut self, world: Vec2, zoom: f64) {
        if !world.is_finite() {
            return;
        }
        self.velocity = Vec2::ZERO;
        self.target = ViewTransform::new(world.x, world.y, self.config.clamp_zoom(zoom));
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.velocity = Vec2::ZERO;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Drags the view by a pointer delta in screen pixels.
    ///
    /// The delta is divided by the current zoom so drag speed feels the same
    /// at every zoom level, and kept as the momentum sample.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.target.x -= dx / self.current.zoom;
        self.target.y -= dy / self.current.zoom;
        self.velocity = Vec2::new(dx, dy);
    }

    /// Moves the view by a screen-pixel offset without leaving momentum.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.target.x += dx / self.current.zoom;
        self.target.y += dy / self.current.zoom;
    }

    /// Zooms the target by `factor` keeping the world point under
    /// `(sx, sy)` fixed on screen.
    pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
        if !(sx.is_finite() && sy.is_finite() && factor.is_finite()) || factor <= 0.0 {
            return;
        }
        let half = self.surface * 0.5;
        let ox = sx - half.x;
        let oy = sy - half.y;

        let world_x = ox / self.target.zoom + self.target.x;
        let world_y = oy / self.target.zoom + self.target.y;

        let zoom = self.config.clamp_zoom(self.target.zoom * factor);
        self.target = ViewTransform::new(world_x - ox / zoom, world_y - oy / zoom, zoom);
    }

    /// Zooms about the surface centre.
    pub fn zoom_by(&mut self, factor: f64) {
        let half = self.surface * 0.5;
        self.zoom_at(half.x, half.y, factor);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / self.config.zoom_step);
    }

    /// Advances one frame: momentum first, then smoothing.
    pub fn tick(&mut self) {
        if !self.dragging && self.velocity != Vec2::ZERO {
            self.velocity = self.velocity * self.config.friction;
            if self.velocity.length() > self.config.momentum_threshold {
                self.target.x -= self.velocity.x / self.current.zoom;
                self.target.y -= self.velocity.y / self.current.zoom;
            } else {
                self.velocity = Vec2::ZERO;
            }
        }

        let s = self.config.smoothing;
        self.current.x += (self.target.x - self.current.x) * s;
        self.current.y += (self.target.y - self.current.y) * s;
        self.current.zoom += (self.target.zoom - self.current.zoom) * s;
        self.current.zoom = self.config.clamp_zoom(self.current.zoom);
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let half = self.surface * 0.5;
        Vec2::new(
            (world.x - self.current.x) * self.current.zoom + half.x,
            (world.y - self.current.y) * self.current.zoom + half.y,
        )
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let half = self.surface * 0.5;
        Vec2::new(
            (screen.x - half.x) / self.current.zoom + self.current.x,
            (screen.y - half.y) / self.current.zoom + self.current.y,
        )
    }

    /// World-space rectangle covered by the surface at the current transform.
    pub fn viewport_bounds(&self) -> Aabb2 {
        let corners = [
            Vec2::ZERO,
            Vec2::new(self.surface.x, 0.0),
            Vec2::new(0.0, self.surface.y),
            self.surface,
        ];
        let first = self.screen_to_world(corners[0]);
        let mut out = Aabb2::new([first.x, first.y], [first.x, first.y]);
        for c in &corners[1..] {
            out.extend(self.screen_to_world(*c));
        }
        out
    }

    fn sanitize(&self, view: ViewTransform) -> ViewTransform {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        ViewTransform::new(
            finite_or(view.x, self.target.x),
            finite_or(view.y, self.target.y),
            self.config.clamp_zoom(finite_or(view.zoom, self.target.zoom)),
        )
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}
