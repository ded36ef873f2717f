use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::SnapshotStore;

/// JSON-file snapshot store.
///
/// Writes go to a sibling temp file first and are moved into place with a
/// rename, so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone();
        staging.set_extension("json.tmp");
        staging
    }
}

impl SnapshotStore for JsonFileStore {
    fn save<S: Serialize>(&mut self, snapshot: &S) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let staging = self.staging_path();
        fs::write(&staging, &bytes)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "snapshot written");
        Ok(())
    }

    fn load<S: DeserializeOwned>(&self) -> StoreResult<Option<S>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
