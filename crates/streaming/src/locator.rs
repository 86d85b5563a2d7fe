use std::path::PathBuf;

use foundation::ids::PointId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailLocation {
    File(PathBuf),
    Url(String),
}

/// Maps a point id to its thumbnail by a fixed naming pattern.
///
/// `{id}` in `pattern` is replaced with the decimal id. A `base` starting with
/// `http://` or `https://` produces URLs, anything else filesystem paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailLocator {
    pub base: String,
    pub pattern: String,
}

impl Default for ThumbnailLocator {
    fn default() -> Self {
        Self {
            base: "thumbnails".to_string(),
            pattern: "{id}.jpg".to_string(),
        }
    }
}

impl ThumbnailLocator {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    pub fn is_remote(&self) -> bool {
        self.base.starts_with("http://") || self.base.starts_with("https://")
    }

    pub fn file_name(&self, id: PointId) -> String {
        self.pattern.replace("{id}", &id.to_string())
    }

    pub fn locate(&self, id: PointId) -> ThumbnailLocation {
        let name = self.file_name(id);
        if self.is_remote() {
            ThumbnailLocation::Url(format!("{}/{}", self.base.trim_end_matches('/'), name))
        } else {
            ThumbnailLocation::File(PathBuf::from(&self.base).join(name))
        }
    }
}
