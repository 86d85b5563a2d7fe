use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use formats::loader::DatasetOptions;
use layers::lod::LodConfig;
use scene::spatial::QuadtreeConfig;
use serde::{Deserialize, Serialize};
use streaming::locator::ThumbnailLocator;
use streaming::scheduler::SchedulerConfig;
use view::camera::CameraConfig;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    pub enabled: bool,
    pub size_px: f64,
    /// Gap between the pane and the surface's bottom-right corner.
    pub margin_px: f64,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size_px: 180.0,
            margin_px: 12.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub radius_px: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self { radius_px: 10.0 }
    }
}

/// Every tunable of the engine, loadable from one JSON document.
///
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub camera: CameraConfig,
    pub quadtree: QuadtreeConfig,
    pub lod: LodConfig,
    pub scheduler: SchedulerConfig,
    pub overview: OverviewConfig,
    pub hover: HoverConfig,
    pub dataset: DatasetOptions,
    pub thumbnails: ThumbnailLocator,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "I/O error reading {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "Config parse error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        Ok(config.normalized())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&payload)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Saturates out-of-range values; never fails.
    pub fn normalized(self) -> Self {
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let overview_default = OverviewConfig::default();
        Self {
            camera: self.camera.normalized(),
            quadtree: self.quadtree.normalized(),
            lod: self.lod.normalized(),
            scheduler: self.scheduler.normalized(),
            overview: OverviewConfig {
                enabled: self.overview.enabled,
                size_px: positive(self.overview.size_px, overview_default.size_px),
                margin_px: if self.overview.margin_px.is_finite() {
                    self.overview.margin_px.max(0.0)
                } else {
                    overview_default.margin_px
                },
            },
            hover: HoverConfig {
                radius_px: positive(self.hover.radius_px, HoverConfig::default().radius_px),
            },
            dataset: self.dataset.normalized(),
            thumbnails: self.thumbnails,
        }
    }
}
