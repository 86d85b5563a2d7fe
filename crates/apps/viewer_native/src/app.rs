use egui::{ColorImage, Pos2, Sense, TextEdit, TextureHandle, TextureOptions};
use foundation::ids::PointId;
use layers::labels::LabelStyle;
use layers::symbology::Palette;
use render::config::EngineConfig;
use render::events::MapEvent;
use render::map::MapView;
use scene::dataset::Dataset;
use tokio::runtime::Handle;
use view::input::{InputEvent, Key};

use crate::fetch::{DecodedImage, ThumbnailFetcher};
use crate::paint::{paint_frame, placeholder_label, status_text};
use crate::search::LabelSearch;

pub struct AtlasApp {
    map: MapView<ThumbnailFetcher<TextureHandle>>,
    search: LabelSearch,
    query: String,
    palette: Palette,
    label_style: LabelStyle,
    visible: usize,
    hovered: Option<PointId>,
    dragging_overview: bool,
}

impl AtlasApp {
    /// `size` is the requested window size; the first frame corrects it to the
    /// actual painter area.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        dataset: Dataset,
        config: &EngineConfig,
        runtime: Handle,
        size: [f64; 2],
    ) -> Self {
        let upload_ctx = cc.egui_ctx.clone();
        let repaint_ctx = cc.egui_ctx.clone();
        let fetcher = ThumbnailFetcher::new(
            runtime,
            config.thumbnails.clone(),
            move |id: PointId, image: DecodedImage| {
                let size = [image.width as usize, image.height as usize];
                upload_ctx.load_texture(
                    format!("thumb-{id}"),
                    ColorImage::from_rgba_unmultiplied(size, &image.rgba),
                    TextureOptions::LINEAR,
                )
            },
            move || repaint_ctx.request_repaint(),
        );
        let search = LabelSearch::new(&dataset);
        let map = MapView::new(dataset, fetcher, config, size[0], size[1]);
        Self {
            map,
            search,
            query: String::new(),
            palette: Palette::default(),
            label_style: LabelStyle::default(),
            visible: 0,
            hovered: None,
            dragging_overview: false,
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("−").clicked() {
                self.map.zoom_out();
            }
            if ui.button("+").clicked() {
                self.map.zoom_in();
            }
            if ui.button("Reset").clicked() {
                self.map.reset_view();
            }
            ui.separator();

            let response = ui.add(
                TextEdit::singleline(&mut self.query)
                    .hint_text("Search labels")
                    .desired_width(240.0),
            );
            if response.changed() {
                self.map.set_filter(self.search.query(&self.query));
            }
            if response.lost_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter))
                && let Some(id) = self.search.first_match(&self.query)
            {
                self.map.focus_point(id);
            }
            ui.separator();

            let hovered = self
                .hovered
                .and_then(|id| self.map.dataset().by_id(id))
                .map(|p| p.label.as_str());
            ui.label(status_text(self.visible, self.map.dataset().len(), hovered));
        });
    }

    /// Feeds egui pointer, wheel and key state into the map as [`InputEvent`]s.
    fn forward_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let origin = response.rect.min;
        let local = |p: Pos2| ((p.x - origin.x) as f64, (p.y - origin.y) as f64);

        if response.drag_started()
            && let Some(p) = response.interact_pointer_pos()
        {
            let (x, y) = local(p);
            match self.map.overview_hit(x, y) {
                Some(world) => {
                    self.dragging_overview = true;
                    self.map.fly_to(world, None);
                }
                None => self.map.handle_input(InputEvent::PointerDown { x, y }),
            }
        }

        if response.dragged()
            && let Some(p) = response.interact_pointer_pos()
        {
            let (x, y) = local(p);
            if self.dragging_overview {
                if let Some(world) = self.map.overview_hit(x, y) {
                    self.map.fly_to(world, None);
                }
            } else {
                self.map.handle_input(InputEvent::PointerMove { x, y });
            }
        } else if let Some(p) = response.hover_pos() {
            let (x, y) = local(p);
            self.map.handle_input(InputEvent::PointerMove { x, y });
        } else {
            self.map.handle_input(InputEvent::PointerLeave);
        }

        if response.drag_stopped() {
            self.dragging_overview = false;
            self.map.handle_input(InputEvent::PointerUp);
        }

        if response.clicked()
            && let Some(p) = response.interact_pointer_pos()
        {
            let (x, y) = local(p);
            if let Some(world) = self.map.overview_hit(x, y) {
                self.map.fly_to(world, None);
            }
        }

        if let Some(p) = response.hover_pos() {
            let (x, y) = local(p);
            let (scroll, zoom) = ctx.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
            if scroll != 0.0 {
                self.map.handle_input(InputEvent::Wheel {
                    x,
                    y,
                    delta: -scroll as f64,
                });
            }
            if zoom != 1.0 {
                self.map.handle_input(InputEvent::Pinch {
                    x,
                    y,
                    scale: zoom as f64,
                });
            }
        }

        if !ctx.wants_keyboard_input() {
            let keys = ctx.input(|i| {
                [
                    (egui::Key::ArrowLeft, Key::Left),
                    (egui::Key::ArrowRight, Key::Right),
                    (egui::Key::ArrowUp, Key::Up),
                    (egui::Key::ArrowDown, Key::Down),
                    (egui::Key::Plus, Key::ZoomIn),
                    (egui::Key::Equals, Key::ZoomIn),
                    (egui::Key::Minus, Key::ZoomOut),
                    (egui::Key::Num0, Key::Reset),
                    (egui::Key::Home, Key::Reset),
                ]
                .into_iter()
                .filter(|(k, _)| i.key_pressed(*k))
                .map(|(_, key)| key)
                .collect::<Vec<_>>()
            });
            for key in keys {
                self.map.handle_input(InputEvent::Key(key));
            }
        }
    }

    fn drain_events(&mut self) {
        for event in self.map.drain_events() {
            tracing::debug!(frame = event.frame_index, payload = ?event.payload, "map event");
            match event.payload {
                MapEvent::HoverChanged(id) => self.hovered = id,
                MapEvent::VisibleCountChanged(n) => self.visible = n,
            }
        }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
                self.map
                    .set_surface_size(response.rect.width() as f64, response.rect.height() as f64);
                self.forward_input(ctx, &response);

                let dt = ctx.input(|i| i.stable_dt) as f64;
                let frame = self.map.tick(dt);
                painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(18));
                if self.map.dataset().is_empty() {
                    placeholder_label(&painter, response.rect.center(), "No points loaded");
                }
                paint_frame(&painter, response.rect.min, &frame, &self.palette, &self.label_style);
            });

        self.drain_events();
        if !self.map.is_idle() {
            ctx.request_repaint();
        }
    }
}
