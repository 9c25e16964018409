/*
 * Curvequote - Bonding-curve quote service
 * Core library exports and module declarations
 */

pub mod api;
pub mod analytics;
pub mod config;
pub mod curve;
pub mod launchpad;
pub mod metrics;
pub mod models;
pub mod rpc;
pub mod service;
pub mod utils;

pub use config::Config;
pub use curve::{instantaneous_price, quote, quote_buy, quote_sell, CurveState, QuoteResult};
pub use models::*;
pub use service::QuoteService;
