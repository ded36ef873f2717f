use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use timebond_types::{AccountId, UnitAmount};

use crate::error::LedgerError;

/// Fungible time-token book for one creator.
///
/// Mint and burn are capability-gated: the single `mint_authority` account
/// (the creator's market, wired at registration) is checked on every
/// supply-changing call. There is no way to change the authority after
/// construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    mint_authority: AccountId,
    total_supply: UnitAmount,
    balances: HashMap<AccountId, UnitAmount>,
    /// owner -> spender -> remaining allowance
    allowances: HashMap<AccountId, HashMap<AccountId, UnitAmount>>,
}

impl TokenLedger {
    /// New empty book. Supply starts at zero; only `mint_authority` may
    /// change it.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        mint_authority: AccountId,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            mint_authority,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn mint_authority(&self) -> &AccountId {
        &self.mint_authority
    }

    pub fn total_supply(&self) -> UnitAmount {
        self.total_supply
    }

    pub fn balance_of(&self, who: &AccountId) -> UnitAmount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> UnitAmount {
        self.allowances
            .get(owner)
            .and_then(|per_spender| per_spender.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Increase `to`'s balance and the total supply. Authority-gated.
    pub fn mint(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: UnitAmount,
    ) -> Result<(), LedgerError> {
        self.require_authority(caller)?;

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self.balances.entry(to.clone()).or_insert(0);
        let new_balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;

        *balance = new_balance;
        self.total_supply = new_supply;
        debug!(symbol = %self.symbol, %to, amount, supply = new_supply, "minted units");
        Ok(())
    }

    /// Decrease `from`'s balance and the total supply. Authority-gated.
    pub fn burn(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        amount: UnitAmount,
    ) -> Result<(), LedgerError> {
        self.require_authority(caller)?;

        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.clone(),
                required: amount as u128,
                available: available as u128,
            });
        }
        // Supply >= any single balance under the closed-ledger invariant,
        // so this subtraction cannot underflow once the balance check passed.
        self.total_supply -= amount;
        self.set_balance(from, available - amount);
        debug!(symbol = %self.symbol, %from, amount, supply = self.total_supply, "burned units");
        Ok(())
    }

    /// Holder-initiated move. No pricing semantics.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: UnitAmount,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.clone(),
                required: amount as u128,
                available: from_balance as u128,
            });
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.set_balance(from, from_balance - amount);
        self.set_balance(to, to_balance);
        Ok(())
    }

    /// Set (not add to) `spender`'s allowance over `owner`'s units.
    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: UnitAmount) {
        self.allowances
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), amount);
    }

    /// Spend an allowance granted by `from` to move units to `to`.
    pub fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: UnitAmount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: from.clone(),
                spender: spender.clone(),
                required: amount as u128,
                available: allowed as u128,
            });
        }
        self.transfer(from, to, amount)?;
        self.allowances
            .entry(from.clone())
            .or_default()
            .insert(spender.clone(), allowed - amount);
        Ok(())
    }

    /// Spend an allowance and burn the units in one step. Authority-gated;
    /// used by the market to settle sells against a holder-approved amount.
    pub fn burn_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        amount: UnitAmount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, caller);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: from.clone(),
                spender: caller.clone(),
                required: amount as u128,
                available: allowed as u128,
            });
        }
        self.burn(caller, from, amount)?;
        self.allowances
            .entry(from.clone())
            .or_default()
            .insert(caller.clone(), allowed - amount);
        Ok(())
    }

    fn require_authority(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if caller != &self.mint_authority {
            return Err(LedgerError::Unauthorized {
                caller: caller.clone(),
                authority: self.mint_authority.clone(),
            });
        }
        Ok(())
    }

    fn set_balance(&mut self, who: &AccountId, value: UnitAmount) {
        if value == 0 {
            self.balances.remove(who);
        } else {
            self.balances.insert(who.clone(), value);
        }
    }

    /// Sum of all balances; equals `total_supply` at every operation
    /// boundary.
    pub fn balance_sum(&self) -> u128 {
        self.balances.values().map(|b| *b as u128).sum()
    }
}
