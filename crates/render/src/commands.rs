use std::sync::Arc;

use foundation::ids::PointId;
use layers::lod::LodSelection;
use layers::symbology::PointStyle;
use runtime::frame::Frame;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl ScreenRect {
    pub fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: [f32; 2], size: f32) -> Self {
        let h = size * 0.5;
        Self {
            min: [center[0] - h, center[1] - h],
            max: [center[0] + h, center[1] + h],
        }
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    pub fn contains(&self, p: [f32; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }

    pub fn expanded(&self, by: f32) -> Self {
        Self {
            min: [self.min[0] - by, self.min[1] - by],
            max: [self.max[0] + by, self.max[1] + by],
        }
    }

    /// Intersection with `other`; collapses to a zero-size rect when disjoint.
    pub fn clamped_to(&self, other: &ScreenRect) -> Self {
        let min = [
            self.min[0].clamp(other.min[0], other.max[0]),
            self.min[1].clamp(other.min[1], other.max[1]),
        ];
        let max = [
            self.max[0].clamp(min[0], other.max[0]),
            self.max[1].clamp(min[1], other.max[1]),
        ];
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand<I> {
    Marker {
        id: PointId,
        center: [f32; 2],
        radius: f32,
        style: PointStyle,
    },
    Thumbnail {
        id: PointId,
        rect: ScreenRect,
        image: I,
        style: PointStyle,
    },
    /// Thumbnail slot whose image is still loading, or failed for good.
    Placeholder {
        id: PointId,
        rect: ScreenRect,
        failed: bool,
        style: PointStyle,
    },
    /// Text overlay; `anchor` is the top-left corner of the text box.
    Label {
        id: PointId,
        anchor: [f32; 2],
        max_width: f32,
        text: String,
        style: PointStyle,
    },
    HoverOutline {
        id: PointId,
        rect: ScreenRect,
    },
}

/// The minimap: every point projected into a small pane, plus the part of
/// the world currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewFrame {
    /// Pane position on the surface.
    pub rect: ScreenRect,
    /// Point positions relative to `rect.min`; shared across frames.
    pub points: Arc<[[f32; 2]]>,
    /// Visible world region, in surface pixels, clipped to the pane.
    pub viewport: ScreenRect,
}

/// Everything the host needs to paint one tick, in paint order.
#[derive(Debug, Clone)]
pub struct RenderFrame<I> {
    pub frame: Frame,
    pub lod: LodSelection,
    pub commands: Vec<DrawCommand<I>>,
    pub overview: Option<OverviewFrame>,
    pub visible: usize,
    pub hovered: Option<PointId>,
}
