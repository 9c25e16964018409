/*
 * RPC client module for reading BNB Chain state
 */

use crate::models::{LaunchpadError, Result};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Bytes, TransactionRequest};
use std::sync::Arc;

pub struct RpcClient {
    provider: Arc<Provider<Http>>,
}

impl RpcClient {
    pub async fn new(rpc_url: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| LaunchpadError::RpcError(format!("Failed to create provider: {e}")))?;

        let chain = provider
            .get_chainid()
            .await
            .map_err(|e| LaunchpadError::RpcError(format!("Failed to get chain ID: {e}")))?;

        if chain.as_u64() != chain_id {
            return Err(LaunchpadError::RpcError(format!(
                "Chain ID mismatch: expected {}, got {}",
                chain_id,
                chain.as_u64()
            )));
        }

        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    /// `eth_call` against the latest block.
    pub async fn call(&self, to: Address, call_data: Vec<u8>) -> Result<Bytes> {
        let tx = TransactionRequest::new().to(to).data(Bytes::from(call_data));

        self.provider
            .call(&tx.into(), None)
            .await
            .map_err(|e| LaunchpadError::RpcError(format!("eth_call to {to:?} failed: {e}")))
    }
}
