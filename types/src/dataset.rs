use std::path::PathBuf;

use serde_json::Value;

use crate::dedup::{deduplicate, filter_by_poets, flatten};
use crate::dynasty::DynastyConfig;
use crate::{LocationGroup, RawPoemRecord};

/// Errors raised while loading a poem dataset.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The dataset file could not be read from disk.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The network request for the dataset failed.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// The body is not valid JSON or does not match either dataset shape.
    #[error("cannot parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    /// The top-level JSON value is not an array of records.
    #[error("dataset must be a JSON array, found {0}")]
    NotAnArray(&'static str),
    #[error("unknown dynasty: {0}")]
    UnknownDynasty(String),
}

/// Which of the two on-disk layouts a dataset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetShape {
    /// One object per poem: `{final_location, latitude, longitude, …, poem}`.
    Flat,
    /// One object per place: `{name, coordinates: [lng, lat], poems: […]}`.
    Grouped,
}

impl DatasetShape {
    /// Detect the layout from the first element. Empty arrays count as flat.
    pub fn detect(items: &[Value]) -> Self {
        match items.first() {
            Some(Value::Object(obj)) if obj.contains_key("poems") => Self::Grouped,
            _ => Self::Flat,
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse either dataset shape into flat records.
///
/// Grouped input is flattened into one record per poem, carrying the parent
/// location's name and coordinates.
pub fn parse_dataset(json: &str) -> Result<Vec<RawPoemRecord>, LoadError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(LoadError::NotAnArray(kind_name(&value)));
    };

    match DatasetShape::detect(&items) {
        DatasetShape::Flat => {
            let records: Vec<RawPoemRecord> = serde_json::from_value(Value::Array(items))?;
            Ok(records)
        }
        DatasetShape::Grouped => {
            let groups: Vec<LocationGroup> = serde_json::from_value(Value::Array(items))?;
            Ok(flatten(&groups))
        }
    }
}

/// Parse a dataset body and build the location list for one dynasty.
///
/// `shared` marks the mixed all-dynasty file, whose poems are narrowed to
/// the dynasty's poets.
pub fn load_locations(
    json: &str,
    config: &DynastyConfig,
    shared: bool,
) -> Result<Vec<LocationGroup>, LoadError> {
    let records = parse_dataset(json)?;
    let groups = deduplicate(&records);
    if shared {
        Ok(filter_by_poets(groups, config.poets))
    } else {
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dynasty;

    const FLAT: &str = r#"[
        {"final_location":"钟山","latitude":32.1,"longitude":118.8,"title":"A","author":"X","poem":"p1"},
        {"final_location":"钟山","latitude":32.1,"longitude":118.8,"title":"B","author":"Y","poem":"p2"}
    ]"#;

    const GROUPED: &str = r#"[
        {"name":"钟山","coordinates":[118.8,32.1],"poems":[
            {"title":"A","author":"X","poem":"p1"},
            {"title":"B","author":"Y","literary_form":"词","poem":"p2"}
        ]},
        {"name":"方山","coordinates":[118.87,31.9],"poems":[
            {"title":"C","author":"谢朓","poem":"p3"}
        ]}
    ]"#;

    #[test]
    fn test_detect_shapes() {
        let flat: Vec<Value> = serde_json::from_str(FLAT).unwrap();
        let grouped: Vec<Value> = serde_json::from_str(GROUPED).unwrap();
        assert_eq!(DatasetShape::detect(&flat), DatasetShape::Flat);
        assert_eq!(DatasetShape::detect(&grouped), DatasetShape::Grouped);
        assert_eq!(DatasetShape::detect(&[]), DatasetShape::Flat);
    }

    #[test]
    fn test_parse_flat() {
        let records = parse_dataset(FLAT).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title, "B");
        assert_eq!(records[1].literary_form, "诗");
    }

    #[test]
    fn test_parse_grouped_flattens_cross_product() {
        let records = parse_dataset(GROUPED).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].location_name, "钟山");
        assert_eq!(records[0].longitude, 118.8);
        assert_eq!(records[0].latitude, 32.1);
        assert_eq!(records[1].literary_form, "词");
        assert_eq!(records[2].location_name, "方山");
        assert_eq!(records[2].latitude, 31.9);
    }

    #[test]
    fn test_grouped_matches_flattened_then_deduplicated() {
        let direct: Vec<LocationGroup> = serde_json::from_str(GROUPED).unwrap();
        let rebuilt = deduplicate(&parse_dataset(GROUPED).unwrap());
        assert_eq!(direct, rebuilt);
    }

    #[test]
    fn test_grouped_location_without_poems_is_dropped() {
        let json = r#"[
            {"name":"空","coordinates":[118.7,32.0],"poems":[]},
            {"name":"钟山","coordinates":[118.8,32.1],"poems":[
                {"title":"A","author":"X","poem":"p1"}
            ]}
        ]"#;
        let groups = deduplicate(&parse_dataset(json).unwrap());
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["钟山"]);
        assert!(groups.iter().all(|g| !g.poems.is_empty()));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_dataset(r#"{"name":"钟山"}"#).unwrap_err();
        assert!(matches!(err, LoadError::NotAnArray("an object")));
    }

    #[test]
    fn test_parse_reports_bad_json() {
        assert!(matches!(parse_dataset("[{"), Err(LoadError::Parse(_))));
        // Flat shape missing coordinates
        let missing = r#"[{"final_location":"钟山","title":"A","author":"X","poem":"p"}]"#;
        assert!(matches!(parse_dataset(missing), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_load_locations_shared_filters_poets() {
        let config = Dynasty::Liuchao.config();
        let all = load_locations(GROUPED, config, false).unwrap();
        assert_eq!(all.len(), 2);

        let filtered = load_locations(GROUPED, config, true).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "方山");
        assert_eq!(filtered[0].poems[0].author, "谢朓");
    }
}
