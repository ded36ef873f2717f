use thiserror::Error;

use timebond_ledger::LedgerError;
use timebond_market::MarketError;
use timebond_types::AccountId;

/// Errors from the registry surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("creator {0} is already registered")]
    AlreadyRegistered(AccountId),

    #[error("creator {0} is not registered")]
    NotFound(AccountId),

    #[error("token name must not be empty")]
    InvalidName,

    #[error("token symbol must be 1 to {max} characters, got {len}")]
    InvalidSymbol { len: usize, max: usize },

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
