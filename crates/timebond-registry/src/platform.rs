use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use timebond_ledger::{ReserveBook, TokenLedger};
use timebond_market::Market;
use timebond_types::{AccountId, CurveParams, PlatformEvent, ReserveAmount, UnitAmount};

use crate::error::RegistryError;

/// Longest accepted token symbol.
const MAX_SYMBOL_LEN: usize = 8;

/// Directory entry binding one creator identity to its ledger and market.
/// Created by [`Platform::register_creator`]; never mutated or removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRecord {
    pub creator: AccountId,
    /// Handle of the creator's token ledger. Resolves back to the record
    /// (and through it, the ledger) via [`Platform::find_by_token`].
    pub token: AccountId,
    /// Handle of the creator's market — its reserve escrow account, and the
    /// spender callers approve reserve and units in favor of.
    pub market: AccountId,
    pub name: String,
    pub symbol: String,
    pub registered_at: DateTime<Utc>,
}

/// The platform facade.
///
/// Owns the shared reserve book, the creator directory, every per-creator
/// (ledger, market) pair, and the event log. Everything here is the durable
/// state: `Platform` serializes as a whole and restores through
/// `timebond-store` snapshots.
///
/// All mutating operations take `&mut self`, so calls against the platform
/// are serialized by construction: a quote and the settlement it prices can
/// never observe different supplies within one call, and no call observes
/// another call's partial state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Platform {
    params: CurveParams,
    reserve: ReserveBook,
    creators: HashMap<AccountId, CreatorRecord>,
    ledgers: HashMap<AccountId, TokenLedger>,
    markets: HashMap<AccountId, Market>,
    events: Vec<PlatformEvent>,
}

impl Platform {
    /// Platform with the given curve defaults applied to every new market.
    pub fn new(params: CurveParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn curve_defaults(&self) -> CurveParams {
        self.params
    }

    // --- Registry ---------------------------------------------------------

    /// Bind a new (ledger, market) pair to `caller`, exactly once.
    ///
    /// The new market's escrow identity becomes the ledger's sole mint/burn
    /// authority. A repeat call fails with `AlreadyRegistered` and mutates
    /// nothing.
    pub fn register_creator(
        &mut self,
        caller: &AccountId,
        name: &str,
        symbol: &str,
    ) -> Result<CreatorRecord, RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidName);
        }
        let symbol_len = symbol.chars().count();
        if symbol_len == 0 || symbol_len > MAX_SYMBOL_LEN {
            return Err(RegistryError::InvalidSymbol {
                len: symbol_len,
                max: MAX_SYMBOL_LEN,
            });
        }
        if self.creators.contains_key(caller) {
            return Err(RegistryError::AlreadyRegistered(caller.clone()));
        }

        let token = AccountId::new(format!("token-{}", Uuid::new_v4()));
        let escrow = AccountId::generate_escrow();
        let record = CreatorRecord {
            creator: caller.clone(),
            token,
            market: escrow.clone(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            registered_at: Utc::now(),
        };

        self.ledgers
            .insert(caller.clone(), TokenLedger::new(name, symbol, escrow.clone()));
        self.markets
            .insert(caller.clone(), Market::new(caller.clone(), escrow, self.params));
        self.creators.insert(caller.clone(), record.clone());

        info!(creator = %caller, name, symbol, market = %record.market, "creator registered");
        self.events.push(PlatformEvent::CreatorRegistered {
            creator: caller.clone(),
            token: record.token.clone(),
            market: record.market.clone(),
            name: record.name.clone(),
            symbol: record.symbol.clone(),
            at: record.registered_at,
        });
        Ok(record)
    }

    /// Directory lookup. Pure read.
    pub fn get_creator(&self, identity: &AccountId) -> Option<&CreatorRecord> {
        self.creators.get(identity)
    }

    /// Reverse directory lookup from a token handle, for consumers that
    /// hold an event's token handle rather than the creator identity.
    pub fn find_by_token(&self, token: &AccountId) -> Option<&CreatorRecord> {
        self.creators.values().find(|record| &record.token == token)
    }

    // --- Market operations ------------------------------------------------

    /// Preview the reserve cost of buying `amount` units of `creator`'s
    /// token at the current supply.
    pub fn quote_buy(
        &self,
        creator: &AccountId,
        amount: UnitAmount,
    ) -> Result<ReserveAmount, RegistryError> {
        let (market, token) = self.pair(creator)?;
        Ok(market.cost_to_mint(amount, token)?)
    }

    /// Preview the reserve released by selling `amount` units.
    pub fn quote_sell(
        &self,
        creator: &AccountId,
        amount: UnitAmount,
    ) -> Result<ReserveAmount, RegistryError> {
        let (market, token) = self.pair(creator)?;
        Ok(market.reward_on_burn(amount, token)?)
    }

    /// Buy `amount` units of `creator`'s token for `buyer`, bounded by
    /// `max_pay`. Returns the settled cost.
    pub fn buy(
        &mut self,
        creator: &AccountId,
        buyer: &AccountId,
        amount: UnitAmount,
        max_pay: ReserveAmount,
    ) -> Result<ReserveAmount, RegistryError> {
        let (market, token) = Self::pair_mut(&mut self.markets, &mut self.ledgers, creator)?;
        let cost = market.buy(buyer, amount, max_pay, token, &mut self.reserve)?;
        self.events.push(PlatformEvent::UnitsBought {
            creator: creator.clone(),
            buyer: buyer.clone(),
            amount,
            cost,
            supply_after: token.total_supply(),
            at: Utc::now(),
        });
        Ok(cost)
    }

    /// Sell `amount` units of `creator`'s token for `seller`, bounded below
    /// by `min_refund`. Returns the settled refund.
    pub fn sell(
        &mut self,
        creator: &AccountId,
        seller: &AccountId,
        amount: UnitAmount,
        min_refund: ReserveAmount,
    ) -> Result<ReserveAmount, RegistryError> {
        let (market, token) = Self::pair_mut(&mut self.markets, &mut self.ledgers, creator)?;
        let refund = market.sell(seller, amount, min_refund, token, &mut self.reserve)?;
        self.events.push(PlatformEvent::UnitsSold {
            creator: creator.clone(),
            seller: seller.clone(),
            amount,
            refund,
            supply_after: token.total_supply(),
            at: Utc::now(),
        });
        Ok(refund)
    }

    /// Reserve currently escrowed by `creator`'s market.
    pub fn market_reserve(&self, creator: &AccountId) -> Result<ReserveAmount, RegistryError> {
        Ok(self.market(creator)?.reserve_balance())
    }

    // --- Token ledger reads and holder operations -------------------------

    pub fn balance_of(
        &self,
        creator: &AccountId,
        who: &AccountId,
    ) -> Result<UnitAmount, RegistryError> {
        Ok(self.ledger(creator)?.balance_of(who))
    }

    pub fn total_supply(&self, creator: &AccountId) -> Result<UnitAmount, RegistryError> {
        Ok(self.ledger(creator)?.total_supply())
    }

    /// Holder-initiated unit transfer; no pricing semantics.
    pub fn transfer_units(
        &mut self,
        creator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: UnitAmount,
    ) -> Result<(), RegistryError> {
        Ok(self.ledger_mut(creator)?.transfer(from, to, amount)?)
    }

    /// Approve a spender over `owner`'s units — notably the market handle
    /// from the creator's record, ahead of a `sell`.
    pub fn approve_units(
        &mut self,
        creator: &AccountId,
        owner: &AccountId,
        spender: &AccountId,
        amount: UnitAmount,
    ) -> Result<(), RegistryError> {
        self.ledger_mut(creator)?.approve(owner, spender, amount);
        Ok(())
    }

    pub fn transfer_units_from(
        &mut self,
        creator: &AccountId,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: UnitAmount,
    ) -> Result<(), RegistryError> {
        Ok(self
            .ledger_mut(creator)?
            .transfer_from(spender, from, to, amount)?)
    }

    // --- Reserve boundary -------------------------------------------------

    /// Credit reserve into an account from outside the system (platform
    /// on-ramp; the test faucet).
    pub fn fund_reserve(
        &mut self,
        to: &AccountId,
        amount: ReserveAmount,
    ) -> Result<(), RegistryError> {
        Ok(self.reserve.deposit(to, amount)?)
    }

    /// Approve a spender over `owner`'s reserve — the market handle, ahead
    /// of a `buy`.
    pub fn approve_reserve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: ReserveAmount,
    ) {
        self.reserve.approve(owner, spender, amount);
    }

    pub fn reserve_balance_of(&self, who: &AccountId) -> ReserveAmount {
        self.reserve.balance_of(who)
    }

    // --- Events -----------------------------------------------------------

    /// Drain the pending event log for downstream indexing.
    pub fn take_events(&mut self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Internal lookups -------------------------------------------------

    fn market(&self, creator: &AccountId) -> Result<&Market, RegistryError> {
        self.markets
            .get(creator)
            .ok_or_else(|| RegistryError::NotFound(creator.clone()))
    }

    fn ledger(&self, creator: &AccountId) -> Result<&TokenLedger, RegistryError> {
        self.ledgers
            .get(creator)
            .ok_or_else(|| RegistryError::NotFound(creator.clone()))
    }

    fn ledger_mut(&mut self, creator: &AccountId) -> Result<&mut TokenLedger, RegistryError> {
        self.ledgers
            .get_mut(creator)
            .ok_or_else(|| RegistryError::NotFound(creator.clone()))
    }

    fn pair(&self, creator: &AccountId) -> Result<(&Market, &TokenLedger), RegistryError> {
        Ok((self.market(creator)?, self.ledger(creator)?))
    }

    /// Split borrow across the market and ledger maps for settlement calls.
    fn pair_mut<'a>(
        markets: &'a mut HashMap<AccountId, Market>,
        ledgers: &'a mut HashMap<AccountId, TokenLedger>,
        creator: &AccountId,
    ) -> Result<(&'a mut Market, &'a mut TokenLedger), RegistryError> {
        let market = markets
            .get_mut(creator)
            .ok_or_else(|| RegistryError::NotFound(creator.clone()))?;
        let token = ledgers
            .get_mut(creator)
            .ok_or_else(|| RegistryError::NotFound(creator.clone()))?;
        Ok((market, token))
    }
}
