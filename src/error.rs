use std::path::PathBuf;

use poem_types::LoadError;

/// Everything the CLI can fail with; reported once by `main`.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize locations: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("no location named {name} in {path}")]
    NoSuchLocation { name: String, path: PathBuf },
    #[error("no dataset files found under {0}")]
    NothingToBuild(PathBuf),
}
