/*
 * Data models and error types for the curve quote service
 */

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::Direction;

/// Human-readable quote returned by the service and the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub timestamp_utc: DateTime<Utc>,
    pub curve: String,
    pub direction: Direction,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub fee_amount: Decimal,
    pub effective_price_bnb: Option<Decimal>,
    pub spot_price_bnb: Decimal,
    pub price_impact_percent: Decimal,
    pub high_impact: bool,
    /// Raw fixed-point values, as decimal strings of wei.
    pub raw: RawQuote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuote {
    pub amount_in_wei: String,
    pub amount_out_wei: String,
    pub fee_amount_wei: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotPriceResponse {
    pub timestamp_utc: DateTime<Utc>,
    pub curve: String,
    pub price_bnb: Decimal,
    pub price_wei: String,
    pub sold_tokens: Decimal,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostResponse {
    pub timestamp_utc: DateTime<Utc>,
    pub curve: String,
    pub tokens: Decimal,
    pub net_cost_bnb: Decimal,
    pub fee_amount_bnb: Decimal,
    pub gross_cost_bnb: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraduationResponse {
    pub timestamp_utc: DateTime<Utc>,
    pub curve: String,
    pub raised_bnb: Decimal,
    pub lp_threshold_bnb: Decimal,
    pub remaining_bnb: Decimal,
    pub progress_percent: Decimal,
    pub is_complete: bool,
    pub would_graduate: bool,
}

/// Failures of the pure quote math.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Curve has graduated; trade on the DEX pool instead")]
    CurveGraduated,

    #[error("Curve math error: {0}")]
    CurveMathError(String),

    #[error("Sell amount exceeds tokens sold on the curve")]
    ExceedsCurveSupply,
}

#[derive(Debug, Error)]
pub enum LaunchpadError {
    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract interaction error: {0}")]
    ContractError(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

pub type Result<T> = std::result::Result<T, LaunchpadError>;
