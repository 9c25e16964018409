//! Properties the quote engine must hold against the contract's integer math.

use curvequote::curve::{
    instantaneous_price, price_for_amount, quote_buy, quote_sell, scale, CurveState,
};
use curvequote::QuoteError;
use ethers::types::U256;
use ethers::utils::format_units;

const AMOUNTS: [&str; 7] = ["0.000001", "0.01", "0.37", "1", "12.5", "250", "1000.123456789"];

fn linear_curve(fee_bps: u32) -> CurveState {
    CurveState {
        initial_price: U256::from(4_000_000_000u64),
        slope: U256::from(1_000u64),
        sold: scale() * 123_456 + scale() / 2,
        trade_fee_bps: fee_bps,
        lp_threshold: scale() * 50,
        is_complete: false,
    }
}

fn constant_curve(fee_bps: u32) -> CurveState {
    CurveState {
        initial_price: U256::from(6_250_000_000u64),
        slope: U256::zero(),
        sold: scale() * 1_000_000,
        trade_fee_bps: fee_bps,
        lp_threshold: scale() * 24,
        is_complete: false,
    }
}

/// Twice the base cost of buying `n` whole tokens starting at `q0`.
fn double_cost(curve: &CurveState, n: U256) -> U256 {
    let q0 = curve.sold_whole();
    curve.initial_price * n * 2 + curve.slope * q0 * n * 2 + curve.slope * n * n
}

#[test]
fn constant_curve_buys_exactly_net_over_price() {
    for fee_bps in [0, 100, 250] {
        let curve = constant_curve(fee_bps);
        for amount in AMOUNTS {
            let result = quote_buy(&curve, amount).unwrap();
            let net = result.amount_in - result.fee_amount;
            assert_eq!(
                result.fee_amount,
                result.amount_in * U256::from(fee_bps) / U256::from(10_000u64)
            );
            assert_eq!(result.counter_amount, net * scale() / curve.initial_price, "{amount}");
        }
    }
}

#[test]
fn linear_curve_buy_is_bracketed_by_forward_integral() {
    for fee_bps in [0, 100] {
        let curve = linear_curve(fee_bps);
        for amount in AMOUNTS {
            let result = quote_buy(&curve, amount).unwrap();
            let net = result.amount_in - result.fee_amount;

            assert!(
                (result.counter_amount % scale()).is_zero(),
                "linear buys settle in whole tokens"
            );
            let whole = result.counter_amount / scale();
            let paid = net * 2;
            assert!(double_cost(&curve, whole) <= paid, "{amount}: overshoot");
            assert!(paid < double_cost(&curve, whole + 1), "{amount}: undershoot");
        }
    }
}

#[test]
fn linear_buy_impact_grows_with_size() {
    let curve = linear_curve(0);
    let small = quote_buy(&curve, "1").unwrap();
    let large = quote_buy(&curve, "1000").unwrap();
    assert!(large.price_impact_pct > small.price_impact_pct);
}

#[test]
fn instantaneous_price_never_decreases_as_supply_sells() {
    let mut curve = linear_curve(0);
    let mut last = U256::zero();
    for step in 0..200u64 {
        curve.sold = scale() * step * 7 + U256::from(step);
        let price = instantaneous_price(&curve).unwrap();
        assert!(price >= last);
        last = price;
    }
}

#[test]
fn selling_back_a_buy_never_profits() {
    let curve = linear_curve(0);
    for amount in AMOUNTS {
        let bought = quote_buy(&curve, amount).unwrap();
        let whole = bought.counter_amount / scale();
        if whole.is_zero() {
            continue;
        }

        let mut after = curve.clone();
        after.sold = curve.sold + bought.counter_amount;
        let sold_back = quote_sell(&after, &whole.to_string()).unwrap();

        assert!(sold_back.counter_amount <= bought.amount_in, "{amount}");
        assert_eq!(sold_back.counter_amount * 2, double_cost(&curve, whole));
    }
}

#[test]
fn paying_the_quoted_cost_buys_at_least_the_tokens() {
    for curve in [linear_curve(100), constant_curve(100)] {
        for tokens in ["1", "25", "4096"] {
            let cost = price_for_amount(&curve, tokens).unwrap();
            let gross = format_units(cost.gross_cost, "ether").unwrap();
            let bought = quote_buy(&curve, &gross).unwrap();
            assert!(bought.counter_amount >= cost.tokens, "{tokens} tokens for {gross}");
        }
    }
}

#[test]
fn graduated_curve_always_refuses() {
    let mut curve = linear_curve(100);
    curve.is_complete = true;
    for amount in ["0", "1", "abc", "-1", ""] {
        assert_eq!(quote_buy(&curve, amount), Err(QuoteError::CurveGraduated));
    }
}

#[test]
fn zero_buy_is_free_and_empty() {
    let result = quote_buy(&linear_curve(100), "0").unwrap();
    assert!(result.counter_amount.is_zero());
    assert!(result.fee_amount.is_zero());
}

#[test]
fn malformed_amounts_are_invalid() {
    let curve = constant_curve(100);
    for bad in ["abc", "-1"] {
        assert!(matches!(quote_buy(&curve, bad), Err(QuoteError::InvalidAmount(_))));
    }
}
