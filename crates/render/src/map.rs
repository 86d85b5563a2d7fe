//! The per-tick frame loop.
//!
//! Each [`MapView::tick`] settles finished image loads, advances the camera,
//! queries the index for the viewport, picks one LOD for the whole frame and
//! emits draw commands, hover state, the overview pane and host events.

use foundation::ids::PointId;
use foundation::math::Vec2;
use layers::labels::truncate_label;
use layers::lod::{LodConfig, RenderMode, select_lod};
use layers::symbology::PointStyle;
use runtime::event_bus::{Event, EventBus};
use runtime::frame::Frame;
use runtime::metrics::Metrics;
use scene::dataset::Dataset;
use scene::filter::FilterSet;
use scene::picking::pick_nearest;
use scene::spatial::Quadtree;
use streaming::cache::ImageState;
use streaming::io::ImageFetcher;
use streaming::scheduler::ImageLoadScheduler;
use view::camera::{Camera, ViewTransform};
use view::input::{InputController, InputEvent, Key};

use crate::commands::{DrawCommand, RenderFrame, ScreenRect};
use crate::config::{EngineConfig, HoverConfig};
use crate::events::MapEvent;
use crate::overview::Overview;

/// Gap between a thumbnail and the hover outline.
const HOVER_PAD_PX: f32 = 3.0;

pub struct MapView<F: ImageFetcher> {
    dataset: Dataset,
    index: Quadtree,
    camera: Camera,
    input: InputController,
    images: ImageLoadScheduler<F>,
    lod: LodConfig,
    hover: HoverConfig,
    overview: Option<Overview>,
    filter: Option<FilterSet>,
    frame: Frame,
    events: EventBus<MapEvent>,
    metrics: Metrics,
    hovered: Option<PointId>,
    last_visible: Option<usize>,
    visible: Vec<usize>,
    /// Set once the user moves the camera; until then a resize re-centres.
    interacted: bool,
}

impl<F: ImageFetcher> MapView<F>
where
    F::Image: Clone,
{
    /// Builds the index over `dataset` and fits the camera to its bounds.
    pub fn new(dataset: Dataset, fetcher: F, config: &EngineConfig, width_px: f64, height_px: f64) -> Self {
        let config = config.clone().normalized();

        let index = Quadtree::build(&dataset.positions(), dataset.bounds(), config.quadtree);
        let mut camera = Camera::new(config.camera, width_px, height_px);
        camera.fit(&dataset.bounds());
        let overview = config
            .overview
            .enabled
            .then(|| Overview::build(&dataset, config.overview));

        Self {
            dataset,
            index,
            camera,
            input: InputController::new(),
            images: ImageLoadScheduler::new(fetcher, config.scheduler),
            lod: config.lod,
            hover: config.hover,
            overview,
            filter: None,
            frame: Frame::start(),
            events: EventBus::new(),
            metrics: Metrics::new(),
            hovered: None,
            last_visible: None,
            visible: Vec::new(),
            interacted: false,
        }
    }

    pub fn tick(&mut self, dt_s: f64) -> RenderFrame<F::Image> {
        self.frame = self.frame.next(dt_s);
        let started_before = self.images.stats().started;
        let pumped = self.images.pump();

        self.camera.tick();
        let viewport = self.camera.viewport_bounds();

        self.visible.clear();
        self.index.query_into(&viewport, &mut self.visible);
        // Stable paint order regardless of tree layout.
        self.visible.sort_unstable();

        let lod = select_lod(viewport.width(), self.dataset.bounds().width(), &self.lod);
        let size = lod.display_size_px as f32;

        let mut commands = Vec::with_capacity(self.visible.len() + 1);
        let mut labels = Vec::new();
        for &idx in &self.visible {
            let Some(point) = self.dataset.get(idx) else {
                continue;
            };
            let style = match &self.filter {
                Some(filter) if !filter.contains(point.id) => PointStyle::DeEmphasized,
                _ => PointStyle::Normal,
            };
            let s = self.camera.world_to_screen(point.position);
            let center = [s.x as f32, s.y as f32];

            if lod.mode == RenderMode::Marker {
                commands.push(DrawCommand::Marker {
                    id: point.id,
                    center,
                    radius: size * 0.5,
                    style,
                });
                continue;
            }

            let rect = ScreenRect::from_center_size(center, size);
            commands.push(match self.images.request(point.id) {
                ImageState::Loaded(image) => DrawCommand::Thumbnail {
                    id: point.id,
                    rect,
                    image: image.clone(),
                    style,
                },
                ImageState::Pending => DrawCommand::Placeholder {
                    id: point.id,
                    rect,
                    failed: false,
                    style,
                },
                ImageState::Failed => DrawCommand::Placeholder {
                    id: point.id,
                    rect,
                    failed: true,
                    style,
                },
            });

            if let Some(max_chars) = lod.label_chars {
                let text = truncate_label(&point.label, max_chars);
                if !text.is_empty() {
                    labels.push(DrawCommand::Label {
                        id: point.id,
                        anchor: [rect.min[0], rect.max[1]],
                        max_width: size,
                        text: text.into_owned(),
                        style,
                    });
                }
            }
        }
        commands.append(&mut labels);

        let hovered = self.pick_hovered(lod.display_size_px);
        if hovered != self.hovered {
            self.hovered = hovered;
            self.events.emit(self.frame, MapEvent::HoverChanged(hovered));
        }
        if let Some(id) = hovered
            && let Some(point) = self.dataset.by_id(id)
        {
            let s = self.camera.world_to_screen(point.position);
            commands.push(DrawCommand::HoverOutline {
                id,
                rect: ScreenRect::from_center_size([s.x as f32, s.y as f32], size).expanded(HOVER_PAD_PX),
            });
        }

        let overview = self
            .overview
            .as_ref()
            .map(|ov| ov.frame(self.camera.surface_size(), &viewport));

        let visible = self.visible.len();
        if self.last_visible != Some(visible) {
            self.last_visible = Some(visible);
            self.events.emit(self.frame, MapEvent::VisibleCountChanged(visible));
        }

        self.record_metrics(visible, pumped.loaded, pumped.failed, started_before);

        RenderFrame {
            frame: self.frame,
            lod,
            commands,
            overview,
            visible,
            hovered,
        }
    }

    /// Nearest visible point to the pointer, within a radius that is constant
    /// in screen pixels (and never smaller than half a thumbnail).
    fn pick_hovered(&self, display_size_px: f64) -> Option<PointId> {
        let pointer = self.input.hover_position()?;
        if let Some(ov) = &self.overview
            && ov.hit(self.camera.surface_size(), pointer).is_some()
        {
            return None;
        }
        let world = self.camera.screen_to_world(pointer);
        let radius_px = self.hover.radius_px.max(display_size_px * 0.5);
        let radius = radius_px / self.camera.current().zoom;
        pick_nearest(&self.dataset, &self.visible, world, radius)
            .and_then(|idx| self.dataset.get(idx))
            .map(|p| p.id)
    }

    fn record_metrics(&mut self, visible: usize, loaded: usize, failed: usize, started_before: u64) {
        let stats = self.images.stats();
        self.metrics.inc_counter("frames", 1);
        self.metrics.inc_counter("images.started", stats.started - started_before);
        self.metrics.inc_counter("images.loaded", loaded as u64);
        self.metrics.inc_counter("images.failed", failed as u64);
        self.metrics.set_gauge("visible", visible as i64);
        self.metrics.set_gauge("images.in_flight", self.images.in_flight() as i64);
        self.metrics.set_gauge("images.queued", self.images.queued() as i64);
        self.metrics.record_histogram("query.results", visible as i64);
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { .. } | InputEvent::PointerUp | InputEvent::PointerLeave => {}
            InputEvent::Key(Key::Reset) => self.interacted = false,
            _ => self.interacted = true,
        }
        self.input.apply(&mut self.camera, event);
    }

    pub fn zoom_in(&mut self) {
        self.interacted = true;
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.interacted = true;
        self.camera.zoom_out();
    }

    /// Animates back to the fitted view.
    pub fn reset_view(&mut self) {
        self.interacted = false;
        self.camera.reset();
    }

    pub fn fly_to(&mut self, world: Vec2, zoom: Option<f64>) {
        self.interacted = true;
        let zoom = zoom.unwrap_or(self.camera.target().zoom);
        self.camera.fly_to(world, zoom);
    }

    /// Centres on a point at the configured fly-to zoom. Returns `false` for
    /// unknown ids.
    pub fn focus_point(&mut self, id: PointId) -> bool {
        let Some(point) = self.dataset.by_id(id) else {
            return false;
        };
        let zoom = self.camera.config().fly_to_zoom.max(self.camera.home().zoom);
        self.interacted = true;
        self.camera.fly_to(point.position, zoom);
        true
    }

    pub fn set_filter(&mut self, filter: Option<FilterSet>) {
        tracing::debug!(matches = filter.as_ref().map(FilterSet::len), "filter updated");
        self.filter = filter;
    }

    /// Resizes the drawing surface and refits the home view to it.
    ///
    /// Before any user interaction the camera also jumps to the new fit, so
    /// the whole dataset stays in view while the window settles.
    pub fn set_surface_size(&mut self, width_px: f64, height_px: f64) {
        let before = self.camera.surface_size();
        self.camera.set_surface_size(width_px, height_px);
        if self.camera.surface_size() == before {
            return;
        }
        let bounds = self.dataset.bounds();
        if self.interacted {
            self.camera.fit_home(&bounds);
        } else {
            self.camera.fit(&bounds);
        }
    }

    /// Jumps without animation.
    pub fn set_view(&mut self, view: ViewTransform) {
        self.interacted = true;
        self.camera.set_view(view);
    }

    /// World position under a click in the overview pane, if any.
    pub fn overview_hit(&self, x: f64, y: f64) -> Option<Vec2> {
        self.overview
            .as_ref()
            .and_then(|ov| ov.hit(self.camera.surface_size(), Vec2::new(x, y)))
    }

    pub fn drain_events(&mut self) -> Vec<Event<MapEvent>> {
        self.events.drain()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn index(&self) -> &Quadtree {
        &self.index
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn images(&self) -> &ImageLoadScheduler<F> {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut ImageLoadScheduler<F> {
        &mut self.images
    }

    pub fn filter(&self) -> Option<&FilterSet> {
        self.filter.as_ref()
    }

    pub fn hovered(&self) -> Option<PointId> {
        self.hovered
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// `true` when another tick would change nothing on screen.
    pub fn is_idle(&self) -> bool {
        self.camera.is_settled() && self.images.in_flight() == 0 && self.images.queued() == 0
    }
}
