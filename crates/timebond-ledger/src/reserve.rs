use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use timebond_types::{AccountId, ReserveAmount};

use crate::error::LedgerError;

/// Platform-wide reserve-asset account book.
///
/// Stands in for the external stablecoin the markets escrow against: amounts
/// are atto units (18 decimals), and `deposit` is the boundary through which
/// reserve enters the system (funded by the platform operator or by tests).
/// Markets pull buyer payments with `transfer_from` against a prior approval
/// and pay refunds with `transfer` out of their escrow accounts.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReserveBook {
    balances: HashMap<AccountId, ReserveAmount>,
    /// owner -> spender -> remaining allowance
    allowances: HashMap<AccountId, HashMap<AccountId, ReserveAmount>>,
}

impl ReserveBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, who: &AccountId) -> ReserveAmount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> ReserveAmount {
        self.allowances
            .get(owner)
            .and_then(|per_spender| per_spender.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Credit reserve into an account from outside the system.
    pub fn deposit(&mut self, to: &AccountId, amount: ReserveAmount) -> Result<(), LedgerError> {
        let balance = self.balances.entry(to.clone()).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        debug!(%to, amount, "reserve deposited");
        Ok(())
    }

    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: ReserveAmount,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.clone(),
                required: amount,
                available: from_balance,
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

    /// Set (not add to) `spender`'s allowance over `owner`'s reserve.
    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: ReserveAmount) {
        self.allowances
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), amount);
    }

    /// Escrow-pull: `spender` draws on an approval from `from`.
    pub fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: ReserveAmount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: from.clone(),
                spender: spender.clone(),
                required: amount,
                available: allowed,
            });
        }
        self.transfer(from, to, amount)?;
        self.allowances
            .entry(from.clone())
            .or_default()
            .insert(spender.clone(), allowed - amount);
        Ok(())
    }

    fn set_balance(&mut self, who: &AccountId, value: ReserveAmount) {
        if value == 0 {
            self.balances.remove(who);
        } else {
            self.balances.insert(who.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timebond_types::RESERVE_SCALE;

    fn alice() -> AccountId {
        AccountId::new("alice")
    }

    fn escrow() -> AccountId {
        AccountId::new("escrow-1")
    }

    #[test]
    fn deposit_then_transfer() {
        let mut reserve = ReserveBook::new();
        reserve.deposit(&alice(), 10 * RESERVE_SCALE).unwrap();
        reserve.transfer(&alice(), &escrow(), 3 * RESERVE_SCALE).unwrap();
        assert_eq!(reserve.balance_of(&alice()), 7 * RESERVE_SCALE);
        assert_eq!(reserve.balance_of(&escrow()), 3 * RESERVE_SCALE);
    }

    #[test]
    fn transfer_from_requires_approval() {
        let mut reserve = ReserveBook::new();
        reserve.deposit(&alice(), RESERVE_SCALE).unwrap();

        let err = reserve
            .transfer_from(&escrow(), &alice(), &escrow(), RESERVE_SCALE)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));

        reserve.approve(&alice(), &escrow(), RESERVE_SCALE);
        reserve
            .transfer_from(&escrow(), &alice(), &escrow(), RESERVE_SCALE)
            .unwrap();
        assert_eq!(reserve.balance_of(&escrow()), RESERVE_SCALE);
        assert_eq!(reserve.allowance(&alice(), &escrow()), 0);
    }

    #[test]
    fn overdraw_fails_and_leaves_state() {
        let mut reserve = ReserveBook::new();
        reserve.deposit(&alice(), 5).unwrap();
        let err = reserve.transfer(&alice(), &escrow(), 6).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(reserve.balance_of(&alice()), 5);
    }
}
