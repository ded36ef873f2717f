//! # timebond-market
//!
//! The pricing and settlement core:
//!
//! - **LinearCurve** — pure bonding-curve arithmetic. Instantaneous price at
//!   supply `s` is `base_price + slope * s`; batch cost/reward is the
//!   definite integral over the supply range the batch sweeps, with
//!   reserve-favoring rounding (cost rounds up, reward rounds down).
//! - **Market** — one settlement engine per creator. Owns the reserve escrow
//!   for its token, quotes against the ledger's live supply, and settles
//!   `buy`/`sell` atomically under slippage bounds.

mod curve;
mod error;
mod market;

pub use curve::LinearCurve;
pub use error::MarketError;
pub use market::Market;
