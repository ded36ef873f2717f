use thiserror::Error;

use timebond_ledger::LedgerError;
use timebond_types::{ReserveAmount, UnitAmount};

/// Errors from pricing and settlement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("amount must be positive")]
    ZeroAmount,

    #[error("slippage: quoted {quoted} against caller bound {bound}")]
    Slippage {
        quoted: ReserveAmount,
        bound: ReserveAmount,
    },

    #[error("insufficient supply: requested {requested}, outstanding {supply}")]
    InsufficientSupply {
        requested: UnitAmount,
        supply: UnitAmount,
    },

    /// Escrow cannot cover a quoted refund. Unreachable while the reserve
    /// conservation invariant holds; treated as a programming-error signal.
    #[error("insufficient reserve: refund {required} exceeds escrowed {escrowed}")]
    InsufficientReserve {
        required: ReserveAmount,
        escrowed: ReserveAmount,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("arithmetic overflow in curve computation")]
    Overflow,
}
