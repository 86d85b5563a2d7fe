/// How a visible point is drawn relative to the active filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PointStyle {
    #[default]
    Normal,
    /// Outside the active filter: drawn, but dimmed.
    DeEmphasized,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub marker: [f32; 4],
    pub placeholder: [f32; 4],
    pub failed: [f32; 4],
    pub hover_outline: [f32; 4],
    pub hover_outline_px: f32,
    pub overview_background: [f32; 4],
    pub overview_point: [f32; 4],
    pub overview_viewport: [f32; 4],
    /// Alpha multiplier applied to de-emphasized points.
    pub de_emphasis_alpha: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            marker: [0.35, 0.7, 1.0, 0.9],
            placeholder: [0.3, 0.3, 0.35, 1.0],
            failed: [0.45, 0.2, 0.2, 1.0],
            hover_outline: [1.0, 0.85, 0.2, 1.0],
            hover_outline_px: 2.0,
            overview_background: [0.0, 0.0, 0.0, 0.6],
            overview_point: [0.7, 0.7, 0.75, 0.6],
            overview_viewport: [1.0, 1.0, 1.0, 0.9],
            de_emphasis_alpha: 0.15,
        }
    }
}

impl Palette {
    pub fn alpha(&self, style: PointStyle) -> f32 {
        match style {
            PointStyle::Normal => 1.0,
            PointStyle::DeEmphasized => self.de_emphasis_alpha,
        }
    }

    /// `color` with its alpha scaled for `style`.
    pub fn tint(&self, color: [f32; 4], style: PointStyle) -> [f32; 4] {
        let [r, g, b, a] = color;
        [r, g, b, a * self.alpha(style)]
    }
}

#[cfg(test)]
mod tests {
    use super::{Palette, PointStyle};

    #[test]
    fn de_emphasis_only_scales_alpha() {
        let p = Palette::default();
        let c = [0.5, 0.25, 1.0, 0.8];
        assert_eq!(p.tint(c, PointStyle::Normal), c);
        let dim = p.tint(c, PointStyle::DeEmphasized);
        assert_eq!(&dim[..3], &c[..3]);
        assert!(dim[3] < c[3]);
    }
}
