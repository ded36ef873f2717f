//! # timebond-registry
//!
//! The registry/factory and the platform facade:
//!
//! - **CreatorRecord** — the immutable directory entry binding a creator
//!   identity to its token ledger and market, created exactly once.
//! - **Platform** — owns the process-wide state: the shared reserve book,
//!   every creator's (ledger, market) pair, the platform curve defaults, and
//!   the event log drained by downstream indexers. All operations go through
//!   `&mut self`, which serializes them; each call either settles completely
//!   or changes nothing.

mod error;
mod platform;

pub use error::RegistryError;
pub use platform::{CreatorRecord, Platform};
