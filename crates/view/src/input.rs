use foundation::math::Vec2;

use crate::camera::Camera;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
    Reset,
}

/// Host-agnostic input, in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    /// Positive `delta` scrolls down, which zooms out.
    Wheel { x: f64, y: f64, delta: f64 },
    /// `scale` > 1 spreads the fingers (zoom in).
    Pinch { x: f64, y: f64, scale: f64 },
    Key(Key),
}

/// Translates [`InputEvent`]s into camera target changes.
///
/// Only the camera's target, drag flag and velocity sample are touched; the
/// current transform moves in [`Camera::tick`].
#[derive(Debug, Clone, Default)]
pub struct InputController {
    last_pointer: Option<Vec2>,
    hover: Option<Vec2>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last pointer position over the surface, for hover picking.
    pub fn hover_position(&self) -> Option<Vec2> {
        self.hover
    }

    pub fn apply(&mut self, camera: &mut Camera, event: InputEvent) {
        tracing::trace!(?event, "input");
        match event {
            InputEvent::PointerDown { x, y } => {
                let pos = Vec2::new(x, y);
                camera.begin_drag();
                self.last_pointer = Some(pos);
                self.hover = Some(pos);
            }
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                if camera.is_dragging() {
                    if let Some(last) = self.last_pointer {
                        let d = pos - last;
                        camera.pan_by(d.x, d.y);
                    }
                    self.last_pointer = Some(pos);
                }
                self.hover = Some(pos);
            }
            InputEvent::PointerUp => {
                camera.end_drag();
                self.last_pointer = None;
            }
            InputEvent::PointerLeave => {
                camera.end_drag();
                self.last_pointer = None;
                self.hover = None;
            }
            InputEvent::Wheel { x, y, delta } => {
                let factor = (-delta * camera.config().wheel_sensitivity).exp();
                camera.zoom_at(x, y, factor);
            }
            InputEvent::Pinch { x, y, scale } => camera.zoom_at(x, y, scale),
            InputEvent::Key(key) => {
                let step = camera.config().key_pan_px;
                match key {
                    Key::Left => camera.nudge(-step, 0.0),
                    Key::Right => camera.nudge(step, 0.0),
                    Key::Up => camera.nudge(0.0, -step),
                    Key::Down => camera.nudge(0.0, step),
                    Key::ZoomIn => camera.zoom_in(),
                    Key::ZoomOut => camera.zoom_out(),
                    Key::Reset => camera.reset(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InputController, InputEvent, Key};
    use crate::camera::{Camera, CameraConfig, ViewTransform};
    use foundation::math::Vec2;

    fn setup() -> (InputController, Camera) {
        let mut cam = Camera::new(CameraConfig::default(), 800.0, 600.0);
        cam.set_view(ViewTransform::new(0.0, 0.0, 2.0));
        (InputController::new(), cam)
    }

    #[test]
    fn drag_moves_target_and_leaves_momentum() {
        let (mut input, mut cam) = setup();
        input.apply(&mut cam, InputEvent::PointerDown { x: 100.0, y: 100.0 });
        input.apply(&mut cam, InputEvent::PointerMove { x: 140.0, y: 90.0 });
        assert_eq!(cam.target().center(), Vec2::new(-20.0, 5.0));
        assert_eq!(cam.current().center(), Vec2::ZERO);

        input.apply(&mut cam, InputEvent::PointerUp);
        assert!(!cam.is_dragging());
        assert_eq!(cam.velocity(), Vec2::new(40.0, -10.0));
    }

    #[test]
    fn hover_follows_pointer_and_clears_on_leave() {
        let (mut input, mut cam) = setup();
        input.apply(&mut cam, InputEvent::PointerMove { x: 5.0, y: 6.0 });
        assert_eq!(input.hover_position(), Some(Vec2::new(5.0, 6.0)));
        // Moving without a press does not pan.
        assert_eq!(cam.target().center(), Vec2::ZERO);

        input.apply(&mut cam, InputEvent::PointerLeave);
        assert_eq!(input.hover_position(), None);
    }

    #[test]
    fn wheel_and_pinch_zoom_about_pointer() {
        let (mut input, mut cam) = setup();
        input.apply(&mut cam, InputEvent::Wheel { x: 400.0, y: 300.0, delta: -100.0 });
        assert!(cam.target().zoom > 2.0);
        assert_eq!(cam.target().center(), Vec2::ZERO);

        let z = cam.target().zoom;
        input.apply(&mut cam, InputEvent::Pinch { x: 400.0, y: 300.0, scale: 0.5 });
        assert!((cam.target().zoom - z * 0.5).abs() < 1e-12);
    }

    #[test]
    fn keys_nudge_without_momentum() {
        let (mut input, mut cam) = setup();
        input.apply(&mut cam, InputEvent::Key(Key::Right));
        assert_eq!(cam.target().x, 30.0);
        assert_eq!(cam.velocity(), Vec2::ZERO);

        input.apply(&mut cam, InputEvent::Key(Key::ZoomIn));
        assert_eq!(cam.target().zoom, 2.5);
        input.apply(&mut cam, InputEvent::Key(Key::Reset));
        assert_eq!(cam.target(), cam.home());
    }
}
