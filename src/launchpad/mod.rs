/*
 * Launchpad curve contract integration
 */

mod contract;

pub use contract::CurveContractReader;

use async_trait::async_trait;
use ethers::types::Address;
use crate::curve::CurveState;
use crate::models::Result;

pub const P0_SIGNATURE: &str = "p0()";
pub const SLOPE_SIGNATURE: &str = "k()";
pub const SOLD_SIGNATURE: &str = "sold()";
pub const TRADE_FEE_SIGNATURE: &str = "tradeFeeBps()";
pub const LP_THRESHOLD_SIGNATURE: &str = "lpThreshold()";
pub const LIQUIDITY_CREATED_SIGNATURE: &str = "liquidityCreated()";

/// Source of curve snapshots. Implementations must hit the chain on every
/// call; another trade can move `sold` between two quotes.
#[async_trait]
pub trait CurveReader: Send + Sync {
    async fn fetch_curve_state(&self, curve: Address) -> Result<CurveState>;
}
