/*
 * Bonding-curve quote math
 *
 * Price of the next whole token is p(q) = a + b*q where q counts whole
 * tokens already sold. Everything runs in checked U256 so a value the
 * contract would revert on surfaces as an error instead of wrapping.
 */

use ethers::types::U256;
use rust_decimal::Decimal;

use super::{scale, CurveState, Direction, QuoteRequest, QuoteResult, BPS_DENOMINATOR};
use crate::models::QuoteError;
use crate::utils::{parse_amount, ratio_percent};

type QuoteOutcome<T> = std::result::Result<T, QuoteError>;

/// Base required to buy an exact token amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuote {
    pub tokens: U256,
    pub net_cost: U256,
    pub fee_amount: U256,
    pub gross_cost: U256,
}

fn overflow(what: &str) -> QuoteError {
    QuoteError::CurveMathError(format!("overflow computing {what}"))
}

fn mul(a: U256, b: U256, what: &str) -> QuoteOutcome<U256> {
    a.checked_mul(b).ok_or_else(|| overflow(what))
}

fn add(a: U256, b: U256, what: &str) -> QuoteOutcome<U256> {
    a.checked_add(b).ok_or_else(|| overflow(what))
}

fn div_ceil(a: U256, b: U256) -> U256 {
    let (q, r) = a.div_mod(b);
    if r.is_zero() {
        q
    } else {
        q + 1
    }
}

fn fee_on(amount: U256, fee_bps: u32) -> QuoteOutcome<U256> {
    Ok(mul(amount, U256::from(fee_bps), "fee")? / U256::from(BPS_DENOMINATOR))
}

/// Marginal price of the next whole token, in base wei.
pub fn instantaneous_price(curve: &CurveState) -> QuoteOutcome<U256> {
    let step = mul(curve.slope, curve.sold_whole(), "instantaneous price")?;
    add(curve.initial_price, step, "instantaneous price")
}

/// Base raised by the curve so far: the integral of the price from 0 to q0.
pub fn raised_base(curve: &CurveState) -> QuoteOutcome<U256> {
    let q0 = curve.sold_whole();
    let linear = mul(curve.initial_price, q0, "raised base")?;
    let quadratic = mul(mul(curve.slope, q0, "raised base")?, q0, "raised base")? / 2;
    add(linear, quadratic, "raised base")
}

fn average_price(base: U256, tokens: U256) -> QuoteOutcome<Option<U256>> {
    if tokens.is_zero() {
        return Ok(None);
    }
    Ok(Some(mul(base, scale(), "effective price")? / tokens))
}

/// Tokens (in token wei) bought by `net` base wei after fees.
fn tokens_for_base(curve: &CurveState, net: U256) -> QuoteOutcome<U256> {
    if curve.slope.is_zero() {
        if curve.initial_price.is_zero() {
            return Err(QuoteError::CurveMathError(
                "constant-price curve with zero initial price".to_string(),
            ));
        }
        return Ok(mul(net, scale(), "tokens out")? / curve.initial_price);
    }

    let b = curve.slope;
    let big_b = mul(instantaneous_price(curve)?, U256::from(2u64), "B")?;
    let discriminant = add(
        mul(big_b, big_b, "discriminant")?,
        mul(mul(b, U256::from(8u64), "discriminant")?, net, "discriminant")?,
        "discriminant",
    )?;

    let root = discriminant.integer_sqrt();
    let Some(excess) = root.checked_sub(big_b) else {
        return Ok(U256::zero());
    };
    let whole = excess / mul(b, U256::from(2u64), "2b")?;
    mul(whole, scale(), "tokens out")
}

/// Twice-scaled integral of the price over `delta` token wei starting at
/// (or ending at, when `selling`) the current whole-token position.
/// Returns the numerator over `2 * SCALE^2`.
fn curve_integral_numerator(curve: &CurveState, delta: U256, selling: bool) -> QuoteOutcome<U256> {
    let s = scale();
    let delta_s = mul(delta, s, "integral")?;
    let linear = mul(mul(curve.initial_price, U256::from(2u64), "integral")?, delta_s, "integral")?;
    let step = mul(
        mul(mul(curve.slope, U256::from(2u64), "integral")?, curve.sold_whole(), "integral")?,
        delta_s,
        "integral",
    )?;
    let curvature = mul(mul(curve.slope, delta, "integral")?, delta, "integral")?;

    let base = add(linear, step, "integral")?;
    if selling {
        base.checked_sub(curvature).ok_or_else(|| {
            QuoteError::CurveMathError("sell runs past the start of the curve".to_string())
        })
    } else {
        add(base, curvature, "integral")
    }
}

fn integral_denominator() -> U256 {
    scale() * scale() * 2
}

/// Gross base wei paid out for selling `delta` token wei, before fees.
fn base_for_tokens(curve: &CurveState, delta: U256) -> QuoteOutcome<U256> {
    if curve.slope.is_zero() {
        return Ok(mul(delta, curve.initial_price, "base out")? / scale());
    }
    // Only `q0 * S` of `sold` sits on the slope; the fractional remainder
    // below whole token zero trades at the initial price.
    let on_slope = delta.min(mul(curve.sold_whole(), scale(), "base out")?);
    let below_start = delta - on_slope;
    let flat = mul(
        mul(mul(curve.initial_price, U256::from(2u64), "base out")?, below_start, "base out")?,
        scale(),
        "base out",
    )?;
    let numerator = add(curve_integral_numerator(curve, on_slope, true)?, flat, "base out")?;
    Ok(numerator / integral_denominator())
}

/// Quotes a buy paying `base_amount_in` (human decimal) of the base asset.
pub fn quote_buy(curve: &CurveState, base_amount_in: &str) -> QuoteOutcome<QuoteResult> {
    curve.ensure_tradeable()?;
    let amount_in = parse_amount(base_amount_in)?;

    let fee_amount = fee_on(amount_in, curve.trade_fee_bps)?;
    let net = amount_in - fee_amount;
    let tokens_out = tokens_for_base(curve, net)?;

    let spot = instantaneous_price(curve)?;
    let effective_price = average_price(net, tokens_out)?;
    let price_impact_pct = match effective_price {
        Some(price) if price > spot => ratio_percent(price - spot, spot)?,
        _ => Decimal::ZERO,
    };

    Ok(QuoteResult {
        direction: Direction::Buy,
        amount_in,
        counter_amount: tokens_out,
        fee_amount,
        effective_price,
        instantaneous_price: spot,
        price_impact_pct,
    })
}

/// Quotes a sell of `token_amount_in` (human decimal) tokens.
///
/// The fee is taken from the base payout.
pub fn quote_sell(curve: &CurveState, token_amount_in: &str) -> QuoteOutcome<QuoteResult> {
    curve.ensure_tradeable()?;
    let amount_in = parse_amount(token_amount_in)?;
    if amount_in > curve.sold {
        return Err(QuoteError::ExceedsCurveSupply);
    }

    let gross = base_for_tokens(curve, amount_in)?;
    let fee_amount = fee_on(gross, curve.trade_fee_bps)?;

    let spot = instantaneous_price(curve)?;
    let effective_price = average_price(gross, amount_in)?;
    let price_impact_pct = match effective_price {
        Some(price) if price < spot => ratio_percent(spot - price, spot)?,
        _ => Decimal::ZERO,
    };

    Ok(QuoteResult {
        direction: Direction::Sell,
        amount_in,
        counter_amount: gross - fee_amount,
        fee_amount,
        effective_price,
        instantaneous_price: spot,
        price_impact_pct,
    })
}

pub fn quote(curve: &CurveState, request: &QuoteRequest) -> QuoteOutcome<QuoteResult> {
    match request.direction {
        Direction::Buy => quote_buy(curve, &request.amount),
        Direction::Sell => quote_sell(curve, &request.amount),
    }
}

/// Base needed to buy exactly `token_amount` tokens, rounded up so that
/// paying `gross_cost` always yields at least that many whole tokens.
pub fn price_for_amount(curve: &CurveState, token_amount: &str) -> QuoteOutcome<CostQuote> {
    curve.ensure_tradeable()?;
    let tokens = parse_amount(token_amount)?;

    let net_cost = if curve.slope.is_zero() {
        div_ceil(mul(tokens, curve.initial_price, "cost")?, scale())
    } else {
        div_ceil(curve_integral_numerator(curve, tokens, false)?, integral_denominator())
    };

    let keep_bps = BPS_DENOMINATOR - u64::from(curve.trade_fee_bps);
    if keep_bps == 0 {
        return Err(QuoteError::CurveMathError("trade fee consumes the whole payment".to_string()));
    }
    let gross_cost = div_ceil(
        mul(net_cost, U256::from(BPS_DENOMINATOR), "gross cost")?,
        U256::from(keep_bps),
    );

    Ok(CostQuote {
        tokens,
        net_cost,
        fee_amount: gross_cost - net_cost,
        gross_cost,
    })
}
