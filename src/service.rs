/*
 * Quote service: fetches fresh curve state and runs the quote engine
 */

use chrono::Utc;
use ethers::types::Address;
use std::sync::Arc;
use tracing::{error, info, warn};
use crate::{
    analytics::QuoteAnalyzer,
    config::{Config, QuoteConfig},
    curve::{self, CurveState, QuoteRequest, QuoteResult},
    launchpad::{CurveContractReader, CurveReader},
    metrics::Metrics,
    models::{
        CostResponse, GraduationResponse, LaunchpadError, QuoteError, QuoteResponse, RawQuote,
        Result, SpotPriceResponse,
    },
    rpc::RpcClient,
    utils::wei_to_decimal,
};

pub struct QuoteService {
    reader: Arc<dyn CurveReader>,
    analyzer: QuoteAnalyzer,
    metrics: Arc<Metrics>,
    default_amount: String,
}

impl QuoteService {
    /// Connects to the configured chain and reads curves from their contracts.
    pub async fn connect(config: &Config, metrics: Arc<Metrics>) -> Result<Self> {
        info!("Initializing Quote Service");

        let rpc = Arc::new(RpcClient::new(&config.chain.rpc_url, config.chain.chain_id).await?);
        info!("Connected to BNB Chain RPC (chain id {})", config.chain.chain_id);

        let reader: Arc<dyn CurveReader> = Arc::new(CurveContractReader::new(rpc));
        Ok(Self::new(reader, &config.quote, metrics))
    }

    #[must_use]
    pub fn new(reader: Arc<dyn CurveReader>, quote_config: &QuoteConfig, metrics: Arc<Metrics>) -> Self {
        Self {
            reader,
            analyzer: QuoteAnalyzer::new(quote_config.impact_warn_pct),
            metrics,
            default_amount: quote_config.default_amount.clone(),
        }
    }

    #[must_use]
    pub fn default_amount(&self) -> &str {
        &self.default_amount
    }

    async fn fetch(&self, address: Address) -> Result<CurveState> {
        let state = self.reader.fetch_curve_state(address).await;
        self.metrics.record_curve_read(state.is_ok());
        state.map_err(|e| {
            warn!("Failed to read curve {:?}: {}", address, e);
            e
        })
    }

    pub async fn quote(&self, address: Address, request: &QuoteRequest) -> Result<QuoteResponse> {
        info!("Quoting {} of {:?} on curve {:?}", request.direction, request.amount, address);

        let outcome = match self.fetch(address).await {
            Ok(state) => curve::quote(&state, request).map_err(LaunchpadError::from),
            Err(e) => Err(e),
        };
        self.metrics.record_quote(request.direction.as_str(), outcome_label(&outcome));

        let result = outcome.map_err(|e| {
            if let LaunchpadError::Quote(QuoteError::CurveMathError(detail)) = &e {
                error!("Curve math failed for {:?}: {}", address, detail);
            }
            e
        })?;

        self.render_quote(address, &result)
    }

    fn render_quote(&self, address: Address, result: &QuoteResult) -> Result<QuoteResponse> {
        let effective_price_bnb = result.effective_price.map(wei_to_decimal).transpose()?;

        Ok(QuoteResponse {
            timestamp_utc: Utc::now(),
            curve: format!("{address:?}"),
            direction: result.direction,
            amount_in: wei_to_decimal(result.amount_in)?,
            amount_out: wei_to_decimal(result.counter_amount)?,
            fee_amount: wei_to_decimal(result.fee_amount)?,
            effective_price_bnb,
            spot_price_bnb: wei_to_decimal(result.instantaneous_price)?,
            price_impact_percent: result.price_impact_pct,
            high_impact: self.analyzer.is_high_impact(result),
            raw: RawQuote {
                amount_in_wei: result.amount_in.to_string(),
                amount_out_wei: result.counter_amount.to_string(),
                fee_amount_wei: result.fee_amount.to_string(),
            },
        })
    }

    pub async fn spot_price(&self, address: Address) -> Result<SpotPriceResponse> {
        let state = self.fetch(address).await?;
        let price = curve::instantaneous_price(&state)?;

        Ok(SpotPriceResponse {
            timestamp_utc: Utc::now(),
            curve: format!("{address:?}"),
            price_bnb: wei_to_decimal(price)?,
            price_wei: price.to_string(),
            sold_tokens: wei_to_decimal(state.sold)?,
            is_complete: state.has_graduated()?,
        })
    }

    pub async fn cost(&self, address: Address, tokens: &str) -> Result<CostResponse> {
        let state = self.fetch(address).await?;
        let cost = curve::price_for_amount(&state, tokens)?;

        Ok(CostResponse {
            timestamp_utc: Utc::now(),
            curve: format!("{address:?}"),
            tokens: wei_to_decimal(cost.tokens)?,
            net_cost_bnb: wei_to_decimal(cost.net_cost)?,
            fee_amount_bnb: wei_to_decimal(cost.fee_amount)?,
            gross_cost_bnb: wei_to_decimal(cost.gross_cost)?,
        })
    }

    pub async fn graduation(&self, address: Address, pending_buy: Option<&str>) -> Result<GraduationResponse> {
        let state = self.fetch(address).await?;
        let status = self.analyzer.graduation_status(&state, pending_buy)?;

        Ok(GraduationResponse {
            timestamp_utc: Utc::now(),
            curve: format!("{address:?}"),
            raised_bnb: wei_to_decimal(status.raised)?,
            lp_threshold_bnb: wei_to_decimal(status.lp_threshold)?,
            remaining_bnb: wei_to_decimal(status.remaining)?,
            progress_percent: status.progress_pct.round_dp(2),
            is_complete: status.is_complete,
            would_graduate: status.would_graduate,
        })
    }
}

fn outcome_label<T>(outcome: &Result<T>) -> &'static str {
    match outcome {
        Ok(_) => "ok",
        Err(LaunchpadError::Quote(QuoteError::InvalidAmount(_))) => "invalid_amount",
        Err(LaunchpadError::Quote(QuoteError::CurveGraduated)) => "graduated",
        Err(LaunchpadError::Quote(QuoteError::ExceedsCurveSupply)) => "exceeds_supply",
        Err(LaunchpadError::Quote(QuoteError::CurveMathError(_))) => "math_error",
        Err(_) => "read_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ethers::types::U256;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingReader {
        state: CurveState,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl CurveReader for CountingReader {
        async fn fetch_curve_state(&self, _address: Address) -> Result<CurveState> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.state.clone())
        }
    }

    fn service(state: CurveState) -> (QuoteService, Arc<CountingReader>, Arc<Metrics>) {
        let reader = Arc::new(CountingReader { state, reads: AtomicUsize::new(0) });
        let metrics = Arc::new(Metrics::new().unwrap());
        let service = QuoteService::new(reader.clone(), &QuoteConfig::default(), metrics.clone());
        (service, reader, metrics)
    }

    fn constant_curve() -> CurveState {
        CurveState {
            initial_price: U256::from(6_250_000_000u64),
            slope: U256::zero(),
            sold: U256::zero(),
            trade_fee_bps: 100,
            lp_threshold: curve::scale() * 24,
            is_complete: false,
        }
    }

    #[test]
    fn test_every_quote_reads_fresh_state() {
        let (service, reader, _) = service(constant_curve());
        tokio_test::block_on(async {
            service.quote(Address::zero(), &QuoteRequest::buy("1")).await.unwrap();
            service.quote(Address::zero(), &QuoteRequest::buy("2")).await.unwrap();
        });
        assert_eq!(reader.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_quote_renders_human_amounts() {
        let (service, _, metrics) = service(constant_curve());
        let response = tokio_test::block_on(service.quote(Address::zero(), &QuoteRequest::buy("1")))
            .unwrap();

        assert_eq!(response.amount_in, Decimal::ONE);
        assert_eq!(response.fee_amount, Decimal::new(1, 2));
        assert_eq!(response.amount_out, Decimal::from(158_400_000u64));
        assert_eq!(response.raw.amount_out_wei, "158400000000000000000000000");
        assert!(!response.high_impact);
        assert_eq!(metrics.quote_count("buy", "ok"), 1);
    }

    #[test]
    fn test_graduated_quote_is_counted() {
        let mut state = constant_curve();
        state.is_complete = true;
        let (service, _, metrics) = service(state);

        let err = tokio_test::block_on(service.quote(Address::zero(), &QuoteRequest::sell("1")))
            .unwrap_err();
        assert!(matches!(err, LaunchpadError::Quote(QuoteError::CurveGraduated)));
        assert_eq!(metrics.quote_count("sell", "graduated"), 1);
    }
}
