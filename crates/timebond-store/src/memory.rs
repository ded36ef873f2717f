use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreResult;
use crate::traits::SnapshotStore;

/// In-memory snapshot store. Deterministic and test-friendly; state does not
/// survive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save<S: Serialize>(&mut self, snapshot: &S) -> StoreResult<()> {
        self.snapshot = Some(serde_json::to_value(snapshot)?);
        Ok(())
    }

    fn load<S: DeserializeOwned>(&self) -> StoreResult<Option<S>> {
        match &self.snapshot {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}
