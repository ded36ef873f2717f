use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use timebond_ledger::{ReserveBook, TokenLedger};
use timebond_types::{AccountId, CurveParams, ReserveAmount, UnitAmount};

use crate::curve::LinearCurve;
use crate::error::MarketError;

/// Per-creator settlement engine.
///
/// Owns the reserve escrow account for one creator's token and is the sole
/// mint/burn authority of that token's ledger (acting under its `escrow`
/// identity). Supply is always read fresh from the ledger; the market keeps
/// no supply counter of its own.
///
/// Atomicity: every fallible condition of a `buy`/`sell` is checked before
/// the first state mutation, so a failure of any kind leaves the token
/// ledger, the reserve book, and `reserve_balance` untouched. Internal
/// bookkeeping is committed before reserve leaves the escrow account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Market {
    creator: AccountId,
    /// The market's own reserve account; also its mint-authority identity.
    escrow: AccountId,
    curve: LinearCurve,
    /// Cumulative settled costs minus settled refunds.
    reserve_balance: ReserveAmount,
}

impl Market {
    pub fn new(creator: AccountId, escrow: AccountId, params: CurveParams) -> Self {
        Self {
            creator,
            escrow,
            curve: LinearCurve::new(params),
            reserve_balance: 0,
        }
    }

    pub fn creator(&self) -> &AccountId {
        &self.creator
    }

    /// The identity ledgers must be wired to as mint authority.
    pub fn escrow(&self) -> &AccountId {
        &self.escrow
    }

    pub fn curve_params(&self) -> CurveParams {
        self.curve.params()
    }

    pub fn reserve_balance(&self) -> ReserveAmount {
        self.reserve_balance
    }

    /// Quote the reserve cost of minting `amount` units at the ledger's
    /// current supply. Pure read.
    pub fn cost_to_mint(
        &self,
        amount: UnitAmount,
        token: &TokenLedger,
    ) -> Result<ReserveAmount, MarketError> {
        self.curve.cost_to_mint(token.total_supply(), amount)
    }

    /// Quote the reserve released by burning `amount` units at the ledger's
    /// current supply. Pure read.
    pub fn reward_on_burn(
        &self,
        amount: UnitAmount,
        token: &TokenLedger,
    ) -> Result<ReserveAmount, MarketError> {
        self.curve.reward_on_burn(token.total_supply(), amount)
    }

    /// Mint `amount` units to `buyer`, pulling exactly the quoted cost from
    /// their reserve account into escrow. Requires a prior reserve approval
    /// of at least the cost in favor of the escrow account.
    pub fn buy(
        &mut self,
        buyer: &AccountId,
        amount: UnitAmount,
        max_pay: ReserveAmount,
        token: &mut TokenLedger,
        reserve: &mut ReserveBook,
    ) -> Result<ReserveAmount, MarketError> {
        let supply = token.total_supply();
        let cost = self.curve.cost_to_mint(supply, amount)?;
        if cost > max_pay {
            return Err(MarketError::Slippage {
                quoted: cost,
                bound: max_pay,
            });
        }

        // Pre-validate the mutations so the settlement is all-or-nothing.
        let new_reserve = self
            .reserve_balance
            .checked_add(cost)
            .ok_or(MarketError::Overflow)?;
        supply.checked_add(amount).ok_or(MarketError::Overflow)?;

        // Escrow-pull is itself atomic: it either moves the full cost or
        // changes nothing.
        reserve.transfer_from(&self.escrow, buyer, &self.escrow, cost)?;
        self.reserve_balance = new_reserve;
        token.mint(&self.escrow, buyer, amount)?;

        info!(
            creator = %self.creator,
            %buyer,
            amount,
            cost,
            supply_after = token.total_supply(),
            "buy settled"
        );
        Ok(cost)
    }

    /// Burn `amount` units from `seller` and pay the quoted refund out of
    /// escrow. Requires a prior unit approval of at least `amount` in favor
    /// of the escrow account.
    pub fn sell(
        &mut self,
        seller: &AccountId,
        amount: UnitAmount,
        min_refund: ReserveAmount,
        token: &mut TokenLedger,
        reserve: &mut ReserveBook,
    ) -> Result<ReserveAmount, MarketError> {
        let supply = token.total_supply();
        let refund = self.curve.reward_on_burn(supply, amount)?;
        if refund < min_refund {
            return Err(MarketError::Slippage {
                quoted: refund,
                bound: min_refund,
            });
        }

        // Defensive: the quoted refund must be covered by both the
        // bookkeeping balance and the actual escrow account. A shortfall
        // means the conservation invariant broke upstream.
        let escrowed = reserve.balance_of(&self.escrow);
        if self.reserve_balance < refund || escrowed < refund {
            warn!(
                creator = %self.creator,
                refund,
                bookkeeping = self.reserve_balance,
                escrowed,
                "refund exceeds escrow"
            );
            return Err(MarketError::InsufficientReserve {
                required: refund,
                escrowed: escrowed.min(self.reserve_balance),
            });
        }
        reserve
            .balance_of(seller)
            .checked_add(refund)
            .ok_or(MarketError::Overflow)?;

        // Burn first, then debit the books, then hand reserve out; nothing
        // downstream of the burn can fail after the checks above.
        token.burn_from(&self.escrow, seller, amount)?;
        self.reserve_balance -= refund;
        reserve.transfer(&self.escrow, seller, refund)?;

        info!(
            creator = %self.creator,
            %seller,
            amount,
            refund,
            supply_after = token.total_supply(),
            "sell settled"
        );
        Ok(refund)
    }
}
