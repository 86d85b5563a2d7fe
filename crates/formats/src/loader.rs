use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::bounds::Aabb2;
use scene::dataset::{Dataset, Point};
use serde::{Deserialize, Serialize};

use crate::dataset_file::DatasetFile;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetOptions {
    /// Multiplier from the normalized file space into world units.
    pub world_scale: f64,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self { world_scale: 50.0 }
    }
}

impl DatasetOptions {
    pub fn normalized(self) -> Self {
        if self.world_scale.is_finite() && self.world_scale > 0.0 {
            self
        } else {
            Self::default()
        }
    }
}

#[derive(Debug)]
pub enum DatasetLoadError {
    Io { path: PathBuf, source: std::io::Error },
    Http(String),
    Parse(serde_json::Error),
    Invalid { reason: String },
}

impl fmt::Display for DatasetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetLoadError::Io { path, source } => {
                write!(f, "I/O error reading {}: {source}", path.display())
            }
            DatasetLoadError::Http(msg) => write!(f, "HTTP error: {msg}"),
            DatasetLoadError::Parse(err) => write!(f, "Dataset parse error: {err}"),
            DatasetLoadError::Invalid { reason } => write!(f, "Invalid dataset: {reason}"),
        }
    }
}

impl std::error::Error for DatasetLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetLoadError::Io { source, .. } => Some(source),
            DatasetLoadError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

pub fn load_dataset_from_path(
    path: impl AsRef<Path>,
    options: &DatasetOptions,
) -> Result<Dataset, DatasetLoadError> {
    let path = path.as_ref();
    let payload = fs::read(path).map_err(|source| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset_bytes(&payload, options)
}

pub fn parse_dataset_bytes(bytes: &[u8], options: &DatasetOptions) -> Result<Dataset, DatasetLoadError> {
    let file: DatasetFile = serde_json::from_slice(bytes).map_err(DatasetLoadError::Parse)?;
    dataset_from_file(file, options)
}

pub fn parse_dataset(json: &str, options: &DatasetOptions) -> Result<Dataset, DatasetLoadError> {
    parse_dataset_bytes(json.as_bytes(), options)
}

/// Scales a parsed file into world units and validates it.
pub fn dataset_from_file(file: DatasetFile, options: &DatasetOptions) -> Result<Dataset, DatasetLoadError> {
    let scale = options.normalized().world_scale;

    let points: Vec<Point> = file
        .points
        .into_iter()
        .map(|r| Point::new(r.id, r.x * scale, r.y * scale, r.prompt))
        .collect();

    let declared = file.bounds.map(|b| {
        Aabb2::new(
            [b.min_x.min(b.max_x) * scale, b.min_y.min(b.max_y) * scale],
            [b.max_x.max(b.min_x) * scale, b.max_y.max(b.min_y) * scale],
        )
    });

    let dataset = Dataset::new(points, declared).map_err(|err| DatasetLoadError::Invalid {
        reason: err.to_string(),
    })?;

    if let Some(declared) = declared
        && declared != dataset.bounds()
    {
        tracing::warn!(
            ?declared,
            computed = ?dataset.bounds(),
            "declared bounds do not enclose every point; widened"
        );
    }

    let b = dataset.bounds();
    tracing::info!(
        points = dataset.len(),
        width = b.width(),
        height = b.height(),
        scale,
        "dataset loaded"
    );
    Ok(dataset)
}
