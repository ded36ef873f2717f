//! End-to-end flows across the registry, market, ledger, and reserve book.

use timebond_registry::{Platform, RegistryError};
use timebond_market::MarketError;
use timebond_types::{AccountId, CurveParams, RESERVE_SCALE};

fn alice() -> AccountId {
    AccountId::new("alice")
}

fn bob() -> AccountId {
    AccountId::new("bob")
}

/// Platform with Alice registered and Bob funded, as the UI layer would set
/// them up: registration form first, then wallet funding.
fn setup() -> Platform {
    let mut platform = Platform::new(CurveParams::default());
    platform
        .register_creator(&alice(), "AliceToken", "ALC")
        .unwrap();
    platform
        .fund_reserve(&bob(), 10_000 * RESERVE_SCALE)
        .unwrap();
    platform
}

#[test]
fn buyer_acquires_and_redeems_units() {
    let mut platform = setup();
    let market = platform.get_creator(&alice()).unwrap().market.clone();

    let cost = platform.quote_buy(&alice(), 10).unwrap();
    platform.approve_reserve(&bob(), &market, cost);
    platform.buy(&alice(), &bob(), 10, cost).unwrap();
    assert_eq!(platform.balance_of(&alice(), &bob()).unwrap(), 10);

    let refund = platform.quote_sell(&alice(), 5).unwrap();
    platform.approve_units(&alice(), &bob(), &market, 5).unwrap();
    platform.sell(&alice(), &bob(), 5, refund).unwrap();

    assert_eq!(platform.balance_of(&alice(), &bob()).unwrap(), 5);
    assert_eq!(platform.total_supply(&alice()).unwrap(), 5);
    assert_eq!(platform.market_reserve(&alice()).unwrap(), cost - refund);
}

#[test]
fn underpaying_by_ten_percent_is_rejected() {
    let mut platform = setup();
    let market = platform.get_creator(&alice()).unwrap().market.clone();

    let quoted = platform.quote_buy(&alice(), 10).unwrap();
    let too_low = quoted * 90 / 100;
    platform.approve_reserve(&bob(), &market, too_low);

    let err = platform.buy(&alice(), &bob(), 10, too_low).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Market(MarketError::Slippage { .. })
    ));
    assert_eq!(platform.balance_of(&alice(), &bob()).unwrap(), 0);
    assert_eq!(platform.market_reserve(&alice()).unwrap(), 0);
}

#[test]
fn demanding_too_high_a_refund_is_rejected() {
    let mut platform = setup();
    let market = platform.get_creator(&alice()).unwrap().market.clone();

    let cost = platform.quote_buy(&alice(), 5).unwrap();
    platform.approve_reserve(&bob(), &market, cost);
    platform.buy(&alice(), &bob(), 5, cost).unwrap();

    platform.approve_units(&alice(), &bob(), &market, 5).unwrap();
    let err = platform
        .sell(&alice(), &bob(), 5, 10_000 * RESERVE_SCALE)
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Market(MarketError::Slippage { .. })
    ));
    assert_eq!(platform.balance_of(&alice(), &bob()).unwrap(), 5);
}

#[test]
fn batch_cost_grows_superlinearly() {
    let platform = setup();
    let cost1 = platform.quote_buy(&alice(), 1).unwrap();
    let cost3 = platform.quote_buy(&alice(), 3).unwrap();
    let cost5 = platform.quote_buy(&alice(), 5).unwrap();

    assert!(cost3 > 3 * cost1);
    assert!(3 * cost5 > 5 * cost3);
}

#[test]
fn full_round_trip_leaves_near_zero_reserve() {
    let mut platform = setup();
    let market = platform.get_creator(&alice()).unwrap().market.clone();

    let cost = platform.quote_buy(&alice(), 4).unwrap();
    platform.approve_reserve(&bob(), &market, cost);
    platform.buy(&alice(), &bob(), 4, cost).unwrap();

    let refund = platform.quote_sell(&alice(), 4).unwrap();
    platform.approve_units(&alice(), &bob(), &market, 4).unwrap();
    platform.sell(&alice(), &bob(), 4, refund).unwrap();

    // Dust only: at most one atto unit of rounding residual.
    assert!(platform.market_reserve(&alice()).unwrap() <= 1);
    assert_eq!(platform.total_supply(&alice()).unwrap(), 0);
    assert!(platform.reserve_balance_of(&bob()) >= 10_000 * RESERVE_SCALE - 1);
}

#[test]
fn registering_twice_fails() {
    let mut platform = setup();
    let err = platform
        .register_creator(&alice(), "Duplicate", "DUP")
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyRegistered(_)));
    assert_eq!(
        platform.get_creator(&alice()).unwrap().name,
        "AliceToken"
    );
}

#[test]
fn quotes_match_settled_amounts_exactly() {
    let mut platform = setup();
    let market = platform.get_creator(&alice()).unwrap().market.clone();

    // Quote and settlement see the same supply; they must agree to the
    // atto unit.
    for round in 0..5u64 {
        let amount = round + 1;
        let quoted = platform.quote_buy(&alice(), amount).unwrap();
        platform.approve_reserve(&bob(), &market, quoted);
        let settled = platform.buy(&alice(), &bob(), amount, quoted).unwrap();
        assert_eq!(settled, quoted);
    }
}
