//! Paints a [`RenderFrame`] with egui.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Stroke, TextureHandle};
use layers::labels::LabelStyle;
use layers::symbology::Palette;
use render::commands::{DrawCommand, OverviewFrame, RenderFrame, ScreenRect};

pub fn color(c: [f32; 4]) -> Color32 {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(to_u8(c[0]), to_u8(c[1]), to_u8(c[2]), to_u8(c[3]))
}

fn rect(r: &ScreenRect, origin: Pos2) -> Rect {
    Rect::from_min_max(
        Pos2::new(origin.x + r.min[0], origin.y + r.min[1]),
        Pos2::new(origin.x + r.max[0], origin.y + r.max[1]),
    )
}

/// Draws `frame` with its surface origin at `origin` (screen coordinates).
pub fn paint_frame(
    painter: &Painter,
    origin: Pos2,
    frame: &RenderFrame<TextureHandle>,
    palette: &Palette,
    label_style: &LabelStyle,
) {
    let uv = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0));
    for command in &frame.commands {
        match command {
            DrawCommand::Marker {
                center,
                radius,
                style,
                ..
            } => {
                let pos = Pos2::new(origin.x + center[0], origin.y + center[1]);
                painter.circle_filled(pos, *radius, color(palette.tint(palette.marker, *style)));
            }
            DrawCommand::Thumbnail {
                rect: r,
                image,
                style,
                ..
            } => {
                let tint = palette.tint([1.0, 1.0, 1.0, 1.0], *style);
                painter.image(image.id(), rect(r, origin), uv, color(tint));
            }
            DrawCommand::Placeholder {
                rect: r,
                failed,
                style,
                ..
            } => {
                let base = if *failed {
                    palette.failed
                } else {
                    palette.placeholder
                };
                painter.rect_filled(rect(r, origin), Rounding::same(2.0), color(palette.tint(base, *style)));
            }
            DrawCommand::Label {
                anchor,
                max_width,
                text,
                style,
                ..
            } => {
                let font = FontId::proportional(label_style.font_size_px);
                let galley = painter.layout(
                    text.clone(),
                    font,
                    color(palette.tint(label_style.color, *style)),
                    max_width.max(label_style.font_size_px * 4.0),
                );
                let pos = Pos2::new(origin.x + anchor[0], origin.y + anchor[1]);
                let bg = Rect::from_min_size(pos, galley.size()).expand(label_style.padding_px);
                painter.rect_filled(bg, Rounding::same(2.0), color(palette.tint(label_style.background, *style)));
                painter.galley(pos, galley, Color32::WHITE);
            }
            DrawCommand::HoverOutline { rect: r, .. } => {
                painter.rect_stroke(
                    rect(r, origin),
                    Rounding::same(3.0),
                    Stroke::new(palette.hover_outline_px, color(palette.hover_outline)),
                );
            }
        }
    }

    if let Some(overview) = &frame.overview {
        paint_overview(painter, origin, overview, palette);
    }
}

fn paint_overview(painter: &Painter, origin: Pos2, overview: &OverviewFrame, palette: &Palette) {
    let pane = rect(&overview.rect, origin);
    painter.rect_filled(pane, Rounding::same(4.0), color(palette.overview_background));

    let dot = color(palette.overview_point);
    for p in overview.points.iter() {
        painter.circle_filled(Pos2::new(pane.min.x + p[0], pane.min.y + p[1]), 0.8, dot);
    }

    painter.rect_stroke(
        rect(&overview.viewport, origin),
        Rounding::ZERO,
        Stroke::new(1.0, color(palette.overview_viewport)),
    );
}

/// One-line status text for the toolbar.
pub fn status_text(visible: usize, total: usize, hovered: Option<&str>) -> String {
    match hovered {
        Some(label) => format!("{visible} / {total} visible · {label}"),
        None => format!("{visible} / {total} visible"),
    }
}

pub fn placeholder_label(painter: &Painter, at: Pos2, text: &str) {
    painter.text(at, Align2::CENTER_CENTER, text, FontId::proportional(16.0), Color32::GRAY);
}
