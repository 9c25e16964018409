/*
 * Curve contract reader over raw eth_call
 */

use async_trait::async_trait;
use ethers::{
    types::{Address, U256},
    utils::keccak256,
};
use std::sync::Arc;
use tracing::debug;
use crate::curve::CurveState;
use crate::launchpad::{
    CurveReader, LIQUIDITY_CREATED_SIGNATURE, LP_THRESHOLD_SIGNATURE, P0_SIGNATURE,
    SLOPE_SIGNATURE, SOLD_SIGNATURE, TRADE_FEE_SIGNATURE,
};
use crate::models::{LaunchpadError, Result};
use crate::rpc::RpcClient;

pub struct CurveContractReader {
    rpc: Arc<RpcClient>,
}

impl CurveContractReader {
    #[must_use]
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    fn selector(signature: &str) -> Vec<u8> {
        keccak256(signature.as_bytes())[0..4].to_vec()
    }

    async fn read_word(&self, curve: Address, signature: &str) -> Result<U256> {
        let result = self.rpc.call(curve, Self::selector(signature)).await?;

        if result.len() < 32 {
            return Err(LaunchpadError::ContractError(format!(
                "Invalid {signature} response: {} bytes",
                result.len()
            )));
        }

        Ok(U256::from_big_endian(&result[0..32]))
    }
}

#[async_trait]
impl CurveReader for CurveContractReader {
    async fn fetch_curve_state(&self, curve: Address) -> Result<CurveState> {
        let (initial_price, slope, sold, fee_bps, lp_threshold, liquidity_created) = tokio::try_join!(
            self.read_word(curve, P0_SIGNATURE),
            self.read_word(curve, SLOPE_SIGNATURE),
            self.read_word(curve, SOLD_SIGNATURE),
            self.read_word(curve, TRADE_FEE_SIGNATURE),
            self.read_word(curve, LP_THRESHOLD_SIGNATURE),
            self.read_word(curve, LIQUIDITY_CREATED_SIGNATURE),
        )?;

        if fee_bps > U256::from(u32::MAX) {
            return Err(LaunchpadError::ContractError(format!(
                "tradeFeeBps out of range: {fee_bps}"
            )));
        }

        let mut state = CurveState {
            initial_price,
            slope,
            sold,
            trade_fee_bps: fee_bps.as_u32(),
            lp_threshold,
            is_complete: !liquidity_created.is_zero(),
        };
        state.is_complete = state.has_graduated()?;

        debug!(
            "Read curve {:?}: p0={}, k={}, sold={}, fee_bps={}, complete={}",
            curve, state.initial_price, state.slope, state.sold, state.trade_fee_bps, state.is_complete
        );

        Ok(state)
    }
}
