/*
 * Prometheus counters for quotes and curve reads
 */

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use crate::models::{LaunchpadError, Result};

pub struct Metrics {
    registry: Registry,
    quotes: IntCounterVec,
    curve_reads: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let quotes = IntCounterVec::new(
            Opts::new("curvequote_quotes_total", "Quotes served by direction and outcome"),
            &["direction", "outcome"],
        )
        .map_err(metrics_error)?;
        let curve_reads = IntCounterVec::new(
            Opts::new("curvequote_curve_reads_total", "Curve state reads by outcome"),
            &["outcome"],
        )
        .map_err(metrics_error)?;

        registry.register(Box::new(quotes.clone())).map_err(metrics_error)?;
        registry.register(Box::new(curve_reads.clone())).map_err(metrics_error)?;

        Ok(Self { registry, quotes, curve_reads })
    }

    pub fn record_quote(&self, direction: &str, outcome: &str) {
        self.quotes.with_label_values(&[direction, outcome]).inc();
    }

    pub fn record_curve_read(&self, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.curve_reads.with_label_values(&[outcome]).inc();
    }

    #[must_use]
    pub fn quote_count(&self, direction: &str, outcome: &str) -> u64 {
        self.quotes.with_label_values(&[direction, outcome]).get()
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        String::from_utf8(buffer)
            .map_err(|e| LaunchpadError::CalculationError(format!("Metrics are not UTF-8: {e}")))
    }
}

fn metrics_error(e: prometheus::Error) -> LaunchpadError {
    LaunchpadError::ConfigError(format!("Metrics error: {e}"))
}
