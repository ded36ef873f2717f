use thiserror::Error;

use timebond_types::AccountId;

/// Errors from the account books.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("mint/burn attempted by {caller}, authority is {authority}")]
    Unauthorized {
        caller: AccountId,
        authority: AccountId,
    },

    #[error("insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        required: u128,
        available: u128,
    },

    #[error("insufficient allowance from {owner} to {spender}: required {required}, available {available}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        required: u128,
        available: u128,
    },

    #[error("arithmetic overflow in ledger operation")]
    Overflow,
}
