use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use poem_types::dynasty::SHARED_DATASET;
use poem_types::{Dynasty, LoadError, LocationGroup, deduplicate, parse_dataset};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::AppError;

pub fn read_dataset(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a locations file (or any dataset) back as deduplicated groups.
pub fn read_locations(path: &Path) -> Result<Vec<LocationGroup>, LoadError> {
    let json = read_dataset(path)?;
    Ok(deduplicate(&parse_dataset(&json)?))
}

pub fn write_locations(
    output_dir: &Path,
    dynasty: Dynasty,
    groups: &[LocationGroup],
) -> Result<PathBuf, AppError> {
    fs::create_dir_all(output_dir).map_err(|source| AppError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let path = output_dir.join(dynasty.locations_file());
    let json = serde_json::to_string_pretty(groups).map_err(AppError::Serialize)?;
    fs::write(&path, &json).map_err(|source| AppError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = json.len(), "wrote locations");
    Ok(path)
}

/// Dataset files found under a data directory.
#[derive(Debug, Default)]
pub struct DatasetInventory {
    pub dedicated: HashMap<Dynasty, PathBuf>,
    pub shared: Option<PathBuf>,
}

impl DatasetInventory {
    /// Where to load a dynasty from, and whether that file is the shared one.
    pub fn source_for(&self, dynasty: Dynasty) -> Option<(&Path, bool)> {
        if let Some(path) = self.dedicated.get(&dynasty) {
            return Some((path.as_path(), false));
        }
        self.shared.as_deref().map(|path| (path, true))
    }

    pub fn is_empty(&self) -> bool {
        self.dedicated.is_empty() && self.shared.is_none()
    }
}

/// Walk `root` for known dataset file names. The first hit in file-name
/// order wins when a name occurs more than once.
pub fn find_datasets(root: &Path) -> DatasetInventory {
    let mut inventory = DatasetInventory::default();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name == SHARED_DATASET {
            inventory
                .shared
                .get_or_insert_with(|| entry.path().to_path_buf());
            continue;
        }
        if let Some(dynasty) = dynasty_for_file(name) {
            inventory
                .dedicated
                .entry(dynasty)
                .or_insert_with(|| entry.path().to_path_buf());
        }
    }

    inventory
}

/// The dynasty whose dedicated dataset has this file name.
pub fn dynasty_for_file(file_name: &str) -> Option<Dynasty> {
    Dynasty::ALL
        .into_iter()
        .find(|d| d.config().dataset_file == file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = r#"[
        {"final_location":"钟山","latitude":32.1,"longitude":118.8,"title":"A","author":"X","poem":"p1"},
        {"final_location":"钟山","latitude":32.1,"longitude":118.8,"title":"B","author":"Y","poem":"p2"}
    ]"#;

    #[test]
    fn test_find_datasets() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("南唐")).unwrap();
        fs::write(dir.path().join("南唐/nantang-map.json"), FLAT).unwrap();
        fs::write(dir.path().join("tang-map.json"), FLAT).unwrap();
        fs::write(dir.path().join("poem-data.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.json"), "[]").unwrap();

        let inventory = find_datasets(dir.path());
        assert_eq!(inventory.dedicated.len(), 2);
        assert!(inventory.dedicated[&Dynasty::Nantang].ends_with("南唐/nantang-map.json"));
        assert!(inventory.shared.is_some());

        let (path, shared) = inventory.source_for(Dynasty::Tang).unwrap();
        assert!(path.ends_with("tang-map.json"));
        assert!(!shared);
        let (path, shared) = inventory.source_for(Dynasty::Song).unwrap();
        assert!(path.ends_with("poem-data.json"));
        assert!(shared);
    }

    #[test]
    fn test_empty_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = find_datasets(dir.path());
        assert!(inventory.is_empty());
        assert!(inventory.source_for(Dynasty::Ming).is_none());
    }

    #[test]
    fn test_write_then_read_locations() {
        let dir = tempfile::tempdir().unwrap();
        let groups = deduplicate(&parse_dataset(FLAT).unwrap());
        let out = dir.path().join("output");
        let path = write_locations(&out, Dynasty::Liuchao, &groups).unwrap();
        assert!(path.ends_with("liuchao-locations.json"));
        assert_eq!(read_locations(&path).unwrap(), groups);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_dataset(Path::new("/nonexistent/tang-map.json")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().starts_with("cannot read /nonexistent/tang-map.json"));
    }

    #[test]
    fn test_dynasty_for_file() {
        assert_eq!(dynasty_for_file("yuan-map.json"), Some(Dynasty::Yuan));
        assert_eq!(dynasty_for_file("poem-data.json"), None);
    }
}
