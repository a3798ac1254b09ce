//! Kite Client, a command-line front end for the Kite proxy. It keeps the
//! broker session token in a local file, calls the proxy's login, quote, order,
//! portfolio and option-chain endpoints, and runs rate-limited batches of AI
//! signal requests.
//!
//! Usage example (CLI):
//! ```bash
//! kite_client login-url
//! kite_client login <request_token>
//! kite_client option-chain --symbol NIFTY --expiry 2025-01-30 --spot 24861
//! kite_client signals ./snapshots.json --limit 3 --delay-ms 500
//! ```
//!
//! Results are printed to stdout as pretty JSON; progress and errors go to the
//! log (`RUST_LOG` overrides the default `info` level).
#![warn(missing_docs)]
mod args;
mod proxy;
mod session;
mod signals;

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use kite_common::option_chain::OptionChainRequest;
use kite_common::order::OrderRequest;
use kite_common::session::LoginResponse;
use kite_common::signal::MarketSnapshot;
use kite_common::{ProxyError, Result};
use log::{error, info, warn};
use serde::Serialize;

use crate::args::{Args, Command};
use crate::proxy::ProxyClient;
use crate::session::SessionStore;
use crate::signals::batch_signals;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: Args, shutdown: Arc<AtomicBool>) -> Result<()> {
    let client = ProxyClient::new(&args.proxy_url)?;
    let store = SessionStore::new(&args.session_file);

    match args.command {
        Command::LoginUrl => {
            println!("{}", client.login_url()?);
        }
        Command::Login { request_token } => match client.login(&request_token)? {
            LoginResponse::Authenticated {
                access_token,
                user_name,
                ..
            } => {
                store.save(&access_token)?;
                info!("Logged in as {}", user_name);
            }
            LoginResponse::LoginUrl { login_url, .. } => {
                warn!("Request token was not accepted; log in at {}", login_url);
            }
        },
        Command::Logout => {
            store.clear()?;
            info!("Session cleared");
        }
        Command::Status => {
            let state = if store.is_authenticated() {
                "authenticated"
            } else {
                "not authenticated"
            };
            println!("{}", state);
        }
        Command::Quote { instruments } => {
            print_json(&client.quote(&store.require()?, instruments)?)?;
        }
        Command::Order {
            symbol,
            exchange,
            side,
            quantity,
            order_type,
            price,
            trigger_price,
            product,
            validity,
        } => {
            let order = OrderRequest {
                trading_symbol: symbol,
                exchange,
                transaction_type: side,
                quantity,
                order_type,
                price,
                trigger_price,
                product,
                validity,
                access_token: store.require()?,
            };
            print_json(&client.place_order(&order)?)?;
        }
        Command::Portfolio => {
            print_json(&client.portfolio(&store.require()?)?)?;
        }
        Command::OptionChain {
            symbol,
            expiry,
            atm_strike,
            spot,
            count,
        } => {
            // The proxy substitutes a synthetic chain when the token is missing.
            let request = OptionChainRequest {
                symbol,
                expiry,
                access_token: store.load()?.unwrap_or_default(),
                atm_strike,
                spot_price: spot,
                count,
            };
            let chain = client.option_chain(&request)?;
            info!("{} rows ({:?})", chain.rows.len(), chain.source);
            print_json(&chain)?;
        }
        Command::Signals {
            path,
            limit,
            delay_ms,
        } => {
            let file = File::open(&path)?;
            let snapshots: Vec<MarketSnapshot> = serde_json::from_reader(BufReader::new(file))?;
            info!(
                "Analysing {} of {} snapshots",
                limit.min(snapshots.len()),
                snapshots.len()
            );
            let signals = batch_signals(
                &client,
                &snapshots,
                limit,
                Duration::from_millis(delay_ms),
                &shutdown,
            );
            print_json(&signals)?;
        }
    }
    Ok(())
}

fn main() {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Stopping...");
            shutdown.store(true, Ordering::SeqCst);
        }) {
            warn!("Could not install Ctrl+C handler: {}", e);
        }
    }

    if let Err(e) = run(args, shutdown) {
        if matches!(e, ProxyError::MissingAccessToken) {
            error!("{}. Run `kite_client login <request_token>` first.", e);
        } else {
            error!("{}", e);
        }
        std::process::exit(1);
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
