/*
 * Analytics on top of raw quotes: impact warnings and graduation progress
 */

use ethers::types::U256;
use rust_decimal::Decimal;

use crate::curve::{raised_base, CurveState, QuoteResult, BPS_DENOMINATOR};
use crate::models::QuoteError;
use crate::utils::{parse_amount, ratio_percent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraduationStatus {
    pub raised: U256,
    pub lp_threshold: U256,
    pub remaining: U256,
    pub progress_pct: Decimal,
    pub is_complete: bool,
    /// A pending buy of this size would push the curve over the threshold.
    pub would_graduate: bool,
}

pub struct QuoteAnalyzer {
    impact_warn_pct: Decimal,
}

impl Default for QuoteAnalyzer {
    fn default() -> Self {
        Self::new(Decimal::from(5))
    }
}

impl QuoteAnalyzer {
    #[must_use]
    pub fn new(impact_warn_pct: Decimal) -> Self {
        Self { impact_warn_pct }
    }

    #[must_use]
    pub fn is_high_impact(&self, quote: &QuoteResult) -> bool {
        quote.price_impact_pct >= self.impact_warn_pct
    }

    /// Progress toward `lp_threshold`, optionally checking whether a buy of
    /// `pending_buy` base would graduate the curve.
    pub fn graduation_status(
        &self,
        curve: &CurveState,
        pending_buy: Option<&str>,
    ) -> std::result::Result<GraduationStatus, QuoteError> {
        let raised = raised_base(curve)?;
        let is_complete = curve.has_graduated()?;
        let remaining = curve.lp_threshold.saturating_sub(raised);

        let progress_pct = if curve.lp_threshold.is_zero() || raised >= curve.lp_threshold {
            Decimal::from(100)
        } else {
            ratio_percent(raised, curve.lp_threshold)?
        };

        let pending_net = match pending_buy {
            Some(amount) => {
                let gross = parse_amount(amount)?;
                let fee = gross
                    .checked_mul(U256::from(curve.trade_fee_bps))
                    .ok_or_else(|| QuoteError::CurveMathError("overflow computing fee".to_string()))?
                    / U256::from(BPS_DENOMINATOR);
                gross.saturating_sub(fee)
            }
            None => U256::zero(),
        };
        let would_graduate = is_complete || pending_net >= remaining;

        Ok(GraduationStatus {
            raised,
            lp_threshold: curve.lp_threshold,
            remaining,
            progress_pct,
            is_complete,
            would_graduate,
        })
    }
}
