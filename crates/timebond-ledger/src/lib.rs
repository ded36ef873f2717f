//! # timebond-ledger
//!
//! Account books for the timebond platform:
//!
//! - **TokenLedger** — one fungible time-token book per creator. Mint and
//!   burn are restricted to a single authority account (the creator's
//!   market); holders move balances with standard transfer/approve semantics.
//! - **ReserveBook** — the platform-wide reserve-asset book the markets
//!   escrow against.
//!
//! Both books maintain the closed-ledger invariant (total supply equals the
//! sum of all balances) by construction: every mutation either moves value
//! between accounts or adjusts supply and a balance by the same checked
//! amount.

mod error;
mod reserve;
mod token;

pub use error::LedgerError;
pub use reserve::ReserveBook;
pub use token::TokenLedger;
