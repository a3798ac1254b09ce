//! Kite Connect HTTP proxy.
//!
//! This binary exposes a handful of JSON endpoints for the trading app and
//! forwards them to the broker's REST API or to a chat-completion API. It wires
//! together four building blocks:
//!
//! - `KiteClient`: authenticated broker calls (token exchange, orders, quotes,
//!   portfolio, instrument master) that surface broker rejections as errors.
//! - `AiClient`: a single-shot chat completion that turns market figures into
//!   a trading signal.
//! - `handlers`: one async handler per endpoint; every failure becomes a JSON
//!   `{"error": ..}` body with status 500.
//! - `routes`: the axum router with a permissive CORS layer.
//!
//! The option-chain endpoint is the exception to the error rule: if anything in
//! the live path fails (missing token, broker rejection, CSV decoding) it
//! answers with a synthetic chain around the requested ATM strike instead.
//!
//! Handlers share no mutable state. Each request makes its outbound calls one
//! after another; quote lookups for a whole chain go out as one batched call.
#![warn(missing_docs)]
use clap::Parser;
use kite_common::Result;
use log::{info, warn};

use crate::ai::AiClient;
use crate::config::Args;
use crate::kite::KiteClient;
use crate::routes::create_router;
use crate::state::AppState;

mod ai;
mod config;
mod error;
mod handlers;
mod kite;
mod routes;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    if args.api_key.is_none() || args.api_secret.is_none() {
        warn!("Zerodha credentials are not set; broker endpoints will fail");
    }
    if args.ai_base_url.is_none() || args.ai_api_key.is_none() {
        warn!("AI service is not configured; /analyze-crypto will fail");
    }

    let http = args.http_client()?;
    let kite = KiteClient::new(
        http.clone(),
        &args.kite_api_url,
        &args.kite_login_url,
        args.api_key.clone(),
        args.api_secret.clone(),
    );
    let ai = AiClient::new(
        http,
        args.ai_base_url.clone(),
        args.ai_api_key.clone(),
        &args.ai_model,
    );
    let app = create_router(AppState::new(kite, ai, args.default_atm_strike));

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("Kite proxy listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
