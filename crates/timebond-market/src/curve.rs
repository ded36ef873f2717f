use serde::{Deserialize, Serialize};

use timebond_types::{CurveParams, ReserveAmount, UnitAmount};

use crate::error::MarketError;

/// Pure linear bonding-curve arithmetic.
///
/// All quantities are atto reserve units (`u128`); every step is checked and
/// overflow fails the computation rather than wrapping.
///
/// Rounding is asymmetric by design: the half-term of the integral rounds
/// **up** when pricing a mint and **down** when pricing a burn, so rounding
/// drift always accrues to the reserve. A full buy-then-sell round trip
/// therefore leaves a non-negative residual of at most one atto unit per
/// operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearCurve {
    params: CurveParams,
}

impl LinearCurve {
    pub fn new(params: CurveParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> CurveParams {
        self.params
    }

    /// Instantaneous unit price at the given supply.
    pub fn spot_price(&self, supply: UnitAmount) -> Result<ReserveAmount, MarketError> {
        let rise = self
            .params
            .slope
            .checked_mul(supply as u128)
            .ok_or(MarketError::Overflow)?;
        self.params
            .base_price
            .checked_add(rise)
            .ok_or(MarketError::Overflow)
    }

    /// Reserve required to mint `amount` units starting from `supply`.
    ///
    /// Integral of the price over `[s0, s0 + n]`:
    /// `base_price * n + slope * (2 * s0 * n + n^2) / 2`, half-term rounded
    /// up.
    pub fn cost_to_mint(
        &self,
        supply: UnitAmount,
        amount: UnitAmount,
    ) -> Result<ReserveAmount, MarketError> {
        if amount == 0 {
            return Err(MarketError::ZeroAmount);
        }
        let swept = Self::swept_area(supply as u128, amount as u128)?;
        let rise = self
            .params
            .slope
            .checked_mul(swept)
            .ok_or(MarketError::Overflow)?;
        let half = rise / 2 + rise % 2; // ceil
        self.params
            .base_price
            .checked_mul(amount as u128)
            .and_then(|base| base.checked_add(half))
            .ok_or(MarketError::Overflow)
    }

    /// Reserve released by burning `amount` units starting from `supply`.
    ///
    /// Integral of the price over `[s0 - n, s0]`, half-term rounded down.
    pub fn reward_on_burn(
        &self,
        supply: UnitAmount,
        amount: UnitAmount,
    ) -> Result<ReserveAmount, MarketError> {
        if amount == 0 {
            return Err(MarketError::ZeroAmount);
        }
        if amount > supply {
            return Err(MarketError::InsufficientSupply {
                requested: amount,
                supply,
            });
        }
        let swept = Self::swept_area((supply - amount) as u128, amount as u128)?;
        let rise = self
            .params
            .slope
            .checked_mul(swept)
            .ok_or(MarketError::Overflow)?;
        let half = rise / 2; // floor
        self.params
            .base_price
            .checked_mul(amount as u128)
            .and_then(|base| base.checked_add(half))
            .ok_or(MarketError::Overflow)
    }

    /// `2 * s0 * n + n^2` — twice the area swept under the sloped part of
    /// the curve between `s0` and `s0 + n`.
    fn swept_area(s0: u128, n: u128) -> Result<u128, MarketError> {
        let cross = s0
            .checked_mul(n)
            .and_then(|v| v.checked_mul(2))
            .ok_or(MarketError::Overflow)?;
        let square = n.checked_mul(n).ok_or(MarketError::Overflow)?;
        cross.checked_add(square).ok_or(MarketError::Overflow)
    }
}
