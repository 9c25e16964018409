/*
 * Linear bonding-curve model and quote engine
 */

mod quoter;

pub use quoter::{
    instantaneous_price, price_for_amount, quote, quote_buy, quote_sell, raised_base, CostQuote,
};

use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::QuoteError;

/// Decimals shared by BNB and launchpad tokens.
pub const DECIMALS: u32 = 18;
pub const BPS_DENOMINATOR: u64 = 10_000;

/// One whole unit in 18-decimal fixed point.
#[must_use]
pub fn scale() -> U256 {
    U256::exp10(DECIMALS as usize)
}

/// Snapshot of a curve contract's state, read fresh for every quote.
///
/// Prices are base-asset wei per whole token; `sold` is in token wei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveState {
    pub initial_price: U256,
    pub slope: U256,
    pub sold: U256,
    pub trade_fee_bps: u32,
    pub lp_threshold: U256,
    pub is_complete: bool,
}

impl CurveState {
    /// Whole tokens sold, truncated the way the contract truncates.
    #[must_use]
    pub fn sold_whole(&self) -> U256 {
        self.sold / scale()
    }

    /// True once liquidity migrated or the base raised reached `lp_threshold`.
    ///
    /// `liquidityCreated` only flips when migration runs, which can trail the
    /// threshold being crossed.
    pub fn has_graduated(&self) -> Result<bool, QuoteError> {
        if self.is_complete {
            return Ok(true);
        }
        Ok(raised_base(self)? >= self.lp_threshold)
    }

    pub(crate) fn ensure_tradeable(&self) -> Result<(), QuoteError> {
        if self.has_graduated()? {
            return Err(QuoteError::CurveGraduated);
        }
        if u64::from(self.trade_fee_bps) > BPS_DENOMINATOR {
            return Err(QuoteError::CurveMathError(format!(
                "trade fee {} bps exceeds {BPS_DENOMINATOR}",
                self.trade_fee_bps
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Direction::Buy),
            "sell" => Ok(Direction::Sell),
            _ => Err(QuoteError::InvalidAmount(format!("unknown direction: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub direction: Direction,
    /// Base asset for buys, tokens for sells, as typed by the user.
    pub amount: String,
}

impl QuoteRequest {
    pub fn buy(amount: impl Into<String>) -> Self {
        Self { direction: Direction::Buy, amount: amount.into() }
    }

    pub fn sell(amount: impl Into<String>) -> Self {
        Self { direction: Direction::Sell, amount: amount.into() }
    }
}

/// Outcome of a quote, still in fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteResult {
    pub direction: Direction,
    pub amount_in: U256,
    /// Tokens received on a buy, base received on a sell (after fee).
    pub counter_amount: U256,
    pub fee_amount: U256,
    /// Average execution price in base wei per whole token, `None` when nothing trades.
    pub effective_price: Option<U256>,
    pub instantaneous_price: U256,
    /// Percent, never negative.
    pub price_impact_pct: rust_decimal::Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("BUY".parse::<Direction>().unwrap(), Direction::Buy);
        assert_eq!("sell".parse::<Direction>().unwrap(), Direction::Sell);
        assert!("hold".parse::<Direction>().is_err());
    }

    #[test]
    fn test_sold_whole_truncates() {
        let curve = CurveState {
            initial_price: U256::from(1u64),
            slope: U256::zero(),
            sold: scale() * 3 + U256::from(999u64),
            trade_fee_bps: 0,
            lp_threshold: U256::zero(),
            is_complete: false,
        };
        assert_eq!(curve.sold_whole(), U256::from(3u64));
    }

    #[test]
    fn test_fee_above_denominator_is_rejected() {
        let curve = CurveState {
            initial_price: U256::from(1u64),
            slope: U256::zero(),
            sold: U256::zero(),
            trade_fee_bps: 10_001,
            lp_threshold: scale(),
            is_complete: false,
        };
        assert!(matches!(curve.ensure_tradeable(), Err(QuoteError::CurveMathError(_))));
    }

    #[test]
    fn test_reaching_threshold_graduates_before_liquidity_flag() {
        let mut curve = CurveState {
            initial_price: U256::from(100u64),
            slope: U256::from(10u64),
            sold: scale() * 10,
            trade_fee_bps: 0,
            lp_threshold: U256::from(1501u64),
            is_complete: false,
        };
        assert!(!curve.has_graduated().unwrap());
        assert!(curve.ensure_tradeable().is_ok());

        curve.lp_threshold = U256::from(1500u64);
        assert!(curve.has_graduated().unwrap());
        assert_eq!(curve.ensure_tradeable(), Err(QuoteError::CurveGraduated));
    }
}
