use serde::{Deserialize, Serialize};

/// On-disk dataset as written by the preprocessing step.
///
/// Coordinates are in the normalized space (roughly `[-100, 100]`); the
/// loader scales them into world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    pub points: Vec<PointRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default, alias = "label")]
    pub prompt: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsRecord {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

#[cfg(test)]
mod tests {
    use super::{BoundsRecord, DatasetFile, PointRecord};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_preprocessed_layout() {
        let json = r#"{
            "points": [
                {"id": 0, "x": -12.5, "y": 3.0, "prompt": "a red fox"},
                {"id": 1, "x": 99.0, "y": -100.0, "label": "snowy peak"},
                {"id": 2, "x": 0.0, "y": 0.0}
            ],
            "bounds": {"minX": -100.0, "maxX": 100.0, "minY": -100.0, "maxY": 100.0}
        }"#;
        let file: DatasetFile = serde_json::from_str(json).expect("parse");
        assert_eq!(
            file.points,
            vec![
                PointRecord { id: 0, x: -12.5, y: 3.0, prompt: "a red fox".into() },
                PointRecord { id: 1, x: 99.0, y: -100.0, prompt: "snowy peak".into() },
                PointRecord { id: 2, x: 0.0, y: 0.0, prompt: String::new() },
            ]
        );
        assert_eq!(
            file.bounds,
            Some(BoundsRecord { min_x: -100.0, max_x: 100.0, min_y: -100.0, max_y: 100.0 })
        );
    }

    #[test]
    fn bounds_are_optional() {
        let file: DatasetFile = serde_json::from_str(r#"{"points": []}"#).expect("parse");
        assert!(file.points.is_empty());
        assert_eq!(file.bounds, None);
    }
}
