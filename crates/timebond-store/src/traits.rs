use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreResult;

/// Persistence backend for a whole-state snapshot.
///
/// `save` replaces any previous snapshot; `load` returns `None` when no
/// snapshot has ever been saved (first boot).
pub trait SnapshotStore {
    fn save<S: Serialize>(&mut self, snapshot: &S) -> StoreResult<()>;

    fn load<S: DeserializeOwned>(&self) -> StoreResult<Option<S>>;
}
