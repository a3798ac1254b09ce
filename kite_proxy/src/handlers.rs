//! Request handlers, one per proxy endpoint.
//!
//! Handlers are thin: decode the body, make the broker or AI call, and shape
//! the reply. Failures become `{"error": ..}` via [`ApiError`], except for the
//! option chain, which always answers with rows.
use axum::Json;
use axum::extract::{FromRequest, State};
use chrono::{SecondsFormat, Utc};
use kite_common::ProxyError;
use kite_common::option_chain::{
    ChainSource, OptionChainRequest, OptionChainResponse, synthetic_chain,
};
use kite_common::order::{OrderRequest, OrderResponse};
use kite_common::quote::{PortfolioResponse, QuoteRequest, QuoteResponse};
use kite_common::session::{LoginRequest, LoginResponse, TokenRequest};
use kite_common::signal::{AnalysisResponse, MarketSnapshot};
use log::{info, warn};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor whose rejection renders as `{"error": ..}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Login URL without a request token; token exchange with one.
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    match request.request_token.as_deref().filter(|t| !t.is_empty()) {
        None => Ok(Json(LoginResponse::LoginUrl {
            login_url: state.kite.login_url()?,
            message: String::from("Please authenticate via Zerodha"),
        })),
        Some(request_token) => {
            let session = state.kite.exchange_token(request_token).await?;
            Ok(Json(LoginResponse::from(session)))
        }
    }
}

pub async fn place_order(
    State(state): State<AppState>,
    AppJson(order): AppJson<OrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = state.kite.place_order(&order).await?;
    Ok(Json(OrderResponse {
        success: true,
        order_id,
        message: String::from("Order placed successfully"),
    }))
}

pub async fn quote(
    State(state): State<AppState>,
    AppJson(request): AppJson<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    if request.instruments.is_empty() {
        return Err(ProxyError::NoInstruments.into());
    }
    let quotes = state
        .kite
        .quotes(&request.access_token, &request.instruments)
        .await?;
    Ok(Json(QuoteResponse { quotes }))
}

pub async fn portfolio(
    State(state): State<AppState>,
    AppJson(request): AppJson<TokenRequest>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let holdings = state.kite.holdings(&request.access_token).await?;
    let positions = state.kite.positions(&request.access_token).await?;
    Ok(Json(PortfolioResponse {
        holdings,
        positions,
    }))
}

/// Live chain when the broker cooperates, a synthetic one otherwise.
pub async fn option_chain(
    State(state): State<AppState>,
    AppJson(request): AppJson<OptionChainRequest>,
) -> Json<OptionChainResponse> {
    let live = state
        .kite
        .option_chain(&request.access_token, &request.symbol, &request.expiry)
        .await;

    let (source, rows) = match live {
        Ok(rows) => (ChainSource::Live, rows),
        Err(e) => {
            let atm = request.resolve_atm(state.default_atm_strike);
            warn!(
                "Option chain for {} {} unavailable, serving synthetic rows around {}: {}",
                request.symbol, request.expiry, atm, e
            );
            (ChainSource::Synthetic, synthetic_chain(atm, request.row_count()))
        }
    };

    Json(OptionChainResponse {
        symbol: request.symbol,
        expiry: request.expiry,
        source,
        rows,
    })
}

pub async fn analyze_crypto(
    State(state): State<AppState>,
    AppJson(snapshot): AppJson<MarketSnapshot>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let analysis = state.ai.analyze(&snapshot).await?;
    info!("{} signal for {}", analysis.signal, snapshot.symbol);
    Ok(Json(AnalysisResponse {
        symbol: snapshot.symbol,
        analysis,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
