//! Per-frame level-of-detail selection.
//!
//! One display size is chosen per frame from how much of the dataset is in
//! view, and every visible point is drawn with it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderMode {
    Marker,
    SmallThumbnail,
    MediumThumbnail,
    LargeThumbnail,
}

impl RenderMode {
    pub fn shows_thumbnail(self) -> bool {
        self != RenderMode::Marker
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Display size (px) when exactly the dataset width is in view.
    pub k: f64,
    pub min_size_px: f64,
    pub max_size_px: f64,
    /// Sizes at or above these switch to the small, medium and large tiers.
    pub small_thumbnail_px: f64,
    pub medium_thumbnail_px: f64,
    pub large_thumbnail_px: f64,
    pub label_min_px: f64,
    pub label_chars: usize,
    pub long_label_px: f64,
    pub long_label_chars: usize,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            k: 6.0,
            min_size_px: 3.0,
            max_size_px: 220.0,
            small_thumbnail_px: 16.0,
            medium_thumbnail_px: 48.0,
            large_thumbnail_px: 96.0,
            label_min_px: 96.0,
            label_chars: 24,
            long_label_px: 160.0,
            long_label_chars: 64,
        }
    }
}

impl LodConfig {
    pub fn normalized(self) -> Self {
        let d = Self::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };

        let mut min_size_px = positive(self.min_size_px, d.min_size_px);
        let mut max_size_px = positive(self.max_size_px, d.max_size_px);
        if min_size_px > max_size_px {
            std::mem::swap(&mut min_size_px, &mut max_size_px);
        }

        let mut tiers = [
            positive(self.small_thumbnail_px, d.small_thumbnail_px),
            positive(self.medium_thumbnail_px, d.medium_thumbnail_px),
            positive(self.large_thumbnail_px, d.large_thumbnail_px),
        ];
        tiers.sort_by(f64::total_cmp);

        let label_min_px = positive(self.label_min_px, d.label_min_px);
        Self {
            k: positive(self.k, d.k),
            min_size_px,
            max_size_px,
            small_thumbnail_px: tiers[0],
            medium_thumbnail_px: tiers[1],
            large_thumbnail_px: tiers[2],
            label_min_px,
            label_chars: self.label_chars,
            long_label_px: positive(self.long_label_px, d.long_label_px).max(label_min_px),
            long_label_chars: self.long_label_chars.max(self.label_chars),
        }
    }

    pub fn mode_for(&self, size_px: f64) -> RenderMode {
        if size_px >= self.large_thumbnail_px {
            RenderMode::LargeThumbnail
        } else if size_px >= self.medium_thumbnail_px {
            RenderMode::MediumThumbnail
        } else if size_px >= self.small_thumbnail_px {
            RenderMode::SmallThumbnail
        } else {
            RenderMode::Marker
        }
    }

    /// Label truncation length for `size_px`, or `None` when labels are hidden.
    pub fn label_chars_for(&self, size_px: f64) -> Option<usize> {
        if size_px >= self.long_label_px {
            Some(self.long_label_chars)
        } else if size_px >= self.label_min_px {
            Some(self.label_chars)
        } else {
            None
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LodSelection {
    pub display_size_px: f64,
    pub mode: RenderMode,
    pub label_chars: Option<usize>,
}

/// Picks this frame's display size from the viewport and dataset widths
/// (both in world units).
///
/// `size = k * dataset_width / viewport_width`, clamped to the configured
/// range. A zero, negative or NaN viewport width reads as fully zoomed in; a
/// degenerate dataset width as fully zoomed out.
pub fn select_lod(viewport_width: f64, dataset_width: f64, config: &LodConfig) -> LodSelection {
    let ratio = if !(viewport_width > 0.0) {
        f64::INFINITY
    } else if !(dataset_width.is_finite() && dataset_width > 0.0) {
        0.0
    } else {
        dataset_width / viewport_width
    };

    let raw = config.k * ratio;
    let display_size_px = if raw.is_nan() {
        config.min_size_px
    } else {
        raw.clamp(config.min_size_px, config.max_size_px)
    };

    LodSelection {
        display_size_px,
        mode: config.mode_for(display_size_px),
        label_chars: config.label_chars_for(display_size_px),
    }
}

#[cfg(test)]
mod tests {
    use super::{LodConfig, RenderMode, select_lod};

    #[test]
    fn size_is_non_increasing_in_viewport_width() {
        let cfg = LodConfig::default();
        let dataset = 10_000.0;
        let mut prev = f64::INFINITY;
        let mut w = 1e-3;
        while w < 1e7 {
            let sel = select_lod(w, dataset, &cfg);
            assert!(sel.display_size_px <= prev, "width {w}");
            assert!(sel.display_size_px >= cfg.min_size_px);
            assert!(sel.display_size_px <= cfg.max_size_px);
            prev = sel.display_size_px;
            w *= 1.1;
        }
    }

    #[test]
    fn degenerate_inputs_stay_in_range() {
        let cfg = LodConfig::default();
        let cases = [
            (0.0, 100.0),
            (-5.0, 100.0),
            (f64::NAN, 100.0),
            (f64::INFINITY, 100.0),
            (100.0, 0.0),
            (100.0, f64::NAN),
            (0.0, 0.0),
        ];
        for (vw, dw) in cases {
            let size = select_lod(vw, dw, &cfg).display_size_px;
            assert!(
                (cfg.min_size_px..=cfg.max_size_px).contains(&size),
                "({vw}, {dw}) -> {size}"
            );
        }
        assert_eq!(select_lod(0.0, 100.0, &cfg).display_size_px, cfg.max_size_px);
        assert_eq!(select_lod(100.0, 0.0, &cfg).display_size_px, cfg.min_size_px);
    }

    #[test]
    fn tiers_and_labels_follow_breakpoints() {
        let cfg = LodConfig::default();

        let fitted = select_lod(1_100.0, 1_000.0, &cfg);
        assert_eq!(fitted.mode, RenderMode::Marker);
        assert_eq!(fitted.label_chars, None);

        assert_eq!(select_lod(200.0, 1_000.0, &cfg).mode, RenderMode::SmallThumbnail);
        assert_eq!(select_lod(100.0, 1_000.0, &cfg).mode, RenderMode::MediumThumbnail);

        let large = select_lod(50.0, 1_000.0, &cfg);
        assert_eq!(large.mode, RenderMode::LargeThumbnail);
        assert_eq!(large.label_chars, Some(24));

        let huge = select_lod(10.0, 1_000.0, &cfg);
        assert_eq!(huge.display_size_px, 220.0);
        assert_eq!(huge.label_chars, Some(64));
    }

    #[test]
    fn normalized_sorts_breakpoints() {
        let cfg: LodConfig = serde_json::from_str(
            r#"{"min_size_px": 300, "max_size_px": 2, "small_thumbnail_px": 90, "large_thumbnail_px": 10}"#,
        )
        .expect("parse");
        let cfg = cfg.normalized();
        assert_eq!((cfg.min_size_px, cfg.max_size_px), (2.0, 300.0));
        assert_eq!(cfg.small_thumbnail_px, 10.0);
        assert_eq!(cfg.medium_thumbnail_px, 48.0);
        assert_eq!(cfg.large_thumbnail_px, 90.0);
    }
}
