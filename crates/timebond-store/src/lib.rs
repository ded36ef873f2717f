//! # timebond-store
//!
//! Snapshot persistence for the platform's durable state (the creator
//! directory, every ledger's balances and supply, every market's reserve
//! balance and curve parameters).
//!
//! The store is deliberately whole-state: platform operations are serialized
//! and atomic, so the consistent unit of persistence is one snapshot taken
//! at an operation boundary. `MemoryStore` is the deterministic reference
//! backend; `JsonFileStore` persists across process restarts with an
//! atomic temp-file-then-rename write.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::SnapshotStore;
