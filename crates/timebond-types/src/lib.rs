//! # timebond-types
//!
//! Shared vocabulary for the timebond platform:
//!
//! - **AccountId** — identity of creators, holders, and market escrows
//! - **Amount conventions** — unit amounts are plain `u64` counts; reserve
//!   amounts are `u128` at 18-decimal fixed point (`RESERVE_SCALE`)
//! - **CurveParams** — the linear bonding-curve coefficients, fixed per market
//! - **PlatformEvent** — records emitted at registration/settlement for
//!   downstream indexing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of time-token units. One unit is indivisible.
pub type UnitAmount = u64;

/// Reserve-asset quantity in atto units (18-decimal fixed point).
pub type ReserveAmount = u128;

/// Scale factor between whole reserve tokens and atto units.
pub const RESERVE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Account identifier — a string wrapper for addresses of creators, holders,
/// and market escrow accounts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a fresh escrow account id for a newly created market.
    pub fn generate_escrow() -> Self {
        Self(format!("escrow-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Linear bonding-curve coefficients, both in atto reserve units per unit.
///
/// Instantaneous price at supply `s` is `base_price + slope * s`. Fixed at
/// market construction; the registry supplies platform-wide defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Price of the first unit at zero supply.
    pub base_price: ReserveAmount,
    /// Price increase per outstanding unit.
    pub slope: ReserveAmount,
}

impl CurveParams {
    pub fn new(base_price: ReserveAmount, slope: ReserveAmount) -> Self {
        Self { base_price, slope }
    }
}

impl Default for CurveParams {
    /// Platform defaults: one whole reserve token base price, 0.1 slope.
    fn default() -> Self {
        Self {
            base_price: RESERVE_SCALE,
            slope: RESERVE_SCALE / 10,
        }
    }
}

/// Record emitted by the platform for downstream indexing (read by the UI
/// layer; never consumed internally).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlatformEvent {
    CreatorRegistered {
        creator: AccountId,
        /// Handle of the creator's token ledger.
        token: AccountId,
        /// Escrow account of the creator's market.
        market: AccountId,
        name: String,
        symbol: String,
        at: DateTime<Utc>,
    },
    UnitsBought {
        creator: AccountId,
        buyer: AccountId,
        amount: UnitAmount,
        cost: ReserveAmount,
        supply_after: UnitAmount,
        at: DateTime<Utc>,
    },
    UnitsSold {
        creator: AccountId,
        seller: AccountId,
        amount: UnitAmount,
        refund: ReserveAmount,
        supply_after: UnitAmount,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_display_roundtrip() {
        let id = AccountId::new("alice");
        assert_eq!(id.to_string(), "alice");
        assert_eq!(AccountId::from("alice"), id);
    }

    #[test]
    fn escrow_ids_are_unique() {
        assert_ne!(AccountId::generate_escrow(), AccountId::generate_escrow());
    }

    #[test]
    fn default_curve_params() {
        let params = CurveParams::default();
        assert_eq!(params.base_price, RESERVE_SCALE);
        assert_eq!(params.slope, RESERVE_SCALE / 10);
    }

    #[test]
    fn event_serializes_with_kind_tag() {
        let event = PlatformEvent::CreatorRegistered {
            creator: AccountId::new("alice"),
            token: AccountId::new("token-1"),
            market: AccountId::new("escrow-1"),
            name: "AliceToken".to_string(),
            symbol: "ALC".to_string(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "creator_registered");
        // Indexers read both handles straight off the event.
        assert_eq!(json["token"], "token-1");
        assert_eq!(json["market"], "escrow-1");
    }
}
