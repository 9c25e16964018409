/*
 * REST API module for the curve quote service
 */

use ethers::types::Address;
use rocket::figment::Figment;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, routes, Build, Rocket, State};
use std::sync::Arc;
use tracing::error;
use crate::config::ServerConfig;
use crate::curve::{Direction, QuoteRequest};
use crate::metrics::Metrics;
use crate::models::{
    CostResponse, GraduationResponse, LaunchpadError, QuoteError, QuoteResponse, SpotPriceResponse,
};
use crate::service::QuoteService;
use crate::utils::parse_address;

pub struct ApiState {
    pub quote_service: Arc<QuoteService>,
    pub metrics: Arc<Metrics>,
}

type ApiResult<T> = std::result::Result<T, Custom<String>>;

fn error_response(e: LaunchpadError) -> Custom<String> {
    match e {
        LaunchpadError::Quote(QuoteError::InvalidAmount(_)) => Custom(Status::BadRequest, e.to_string()),
        LaunchpadError::Quote(QuoteError::CurveGraduated | QuoteError::ExceedsCurveSupply) => {
            Custom(Status::Conflict, e.to_string())
        }
        LaunchpadError::Quote(QuoteError::CurveMathError(_)) => {
            error!("Quote computation failed: {e}");
            Custom(Status::InternalServerError, "Unable to compute quote".to_string())
        }
        LaunchpadError::RpcError(_) | LaunchpadError::ContractError(_) => {
            Custom(Status::BadGateway, format!("Unable to read curve state: {e}"))
        }
        _ => {
            error!("Request failed: {e:?}");
            Custom(Status::InternalServerError, e.to_string())
        }
    }
}

fn curve_address(address: &str) -> ApiResult<Address> {
    parse_address(address).map_err(|e| Custom(Status::BadRequest, e.to_string()))
}

#[get("/api/v1/curves/<address>/quote?<direction>&<amount>")]
pub async fn get_quote(
    address: &str,
    direction: Option<&str>,
    amount: Option<&str>,
    state: &State<ApiState>,
) -> ApiResult<Json<QuoteResponse>> {
    let curve = curve_address(address)?;
    let direction = match direction {
        Some(d) => d
            .parse::<Direction>()
            .map_err(|_| Custom(Status::BadRequest, format!("Invalid direction: {d}")))?,
        None => Direction::Buy,
    };
    let amount = match amount {
        Some(a) => a.to_string(),
        None => state.quote_service.default_amount().to_string(),
    };
    let request = QuoteRequest { direction, amount };

    let quote = state.quote_service.quote(curve, &request).await.map_err(error_response)?;
    Ok(Json(quote))
}

#[get("/api/v1/curves/<address>/price")]
pub async fn get_spot_price(
    address: &str,
    state: &State<ApiState>,
) -> ApiResult<Json<SpotPriceResponse>> {
    let curve = curve_address(address)?;
    let price = state.quote_service.spot_price(curve).await.map_err(error_response)?;
    Ok(Json(price))
}

#[get("/api/v1/curves/<address>/cost?<tokens>")]
pub async fn get_cost(
    address: &str,
    tokens: &str,
    state: &State<ApiState>,
) -> ApiResult<Json<CostResponse>> {
    let curve = curve_address(address)?;
    let cost = state.quote_service.cost(curve, tokens).await.map_err(error_response)?;
    Ok(Json(cost))
}

#[get("/api/v1/curves/<address>/graduation?<amount>")]
pub async fn get_graduation(
    address: &str,
    amount: Option<&str>,
    state: &State<ApiState>,
) -> ApiResult<Json<GraduationResponse>> {
    let curve = curve_address(address)?;
    let status = state
        .quote_service
        .graduation(curve, amount)
        .await
        .map_err(error_response)?;
    Ok(Json(status))
}

#[get("/metrics")]
pub fn get_metrics(state: &State<ApiState>) -> ApiResult<String> {
    state.metrics.render().map_err(error_response)
}

#[get("/health")]
pub async fn health_check() -> &'static str {
    "OK"
}

fn mount(rocket: Rocket<Build>, state: ApiState) -> Rocket<Build> {
    rocket.manage(state).mount(
        "/",
        routes![get_quote, get_spot_price, get_cost, get_graduation, get_metrics, health_check],
    )
}

/// Rocket with default settings, used by tests and embedders.
#[must_use]
pub fn create_rocket(state: ApiState) -> Rocket<Build> {
    mount(rocket::build(), state)
}

/// Rocket bound to the configured host and port.
#[must_use]
pub fn create_configured_rocket(state: ApiState, server: &ServerConfig) -> Rocket<Build> {
    let figment: Figment = rocket::Config::figment()
        .merge(("address", server.host.clone()))
        .merge(("port", server.port));
    mount(rocket::custom(figment), state)
}
