//! Command-line arguments for the Kite client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kite_common::net::PROXY_URL;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the running proxy.
    #[clap(long, env = "KITE_PROXY_URL", default_value = PROXY_URL)]
    pub proxy_url: String,

    /// File holding the broker session token between runs.
    #[clap(long, default_value = ".kite_session")]
    pub session_file: PathBuf,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Client operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the broker login URL.
    LoginUrl,
    /// Exchange a request token for a session and store the access token.
    Login {
        /// Request token from the login redirect.
        request_token: String,
    },
    /// Forget the stored access token.
    Logout,
    /// Report whether an access token is stored.
    Status,
    /// Fetch live quotes, e.g. `NSE:INFY NFO:NIFTY25JAN25000CE`.
    Quote {
        /// Exchange-qualified instruments.
        #[clap(required = true)]
        instruments: Vec<String>,
    },
    /// Place a regular order.
    Order {
        /// Trading symbol.
        #[clap(long)]
        symbol: String,
        /// Exchange.
        #[clap(long, default_value = "NSE")]
        exchange: String,
        /// BUY or SELL.
        #[clap(long)]
        side: String,
        /// Quantity.
        #[clap(long)]
        quantity: u32,
        /// MARKET, LIMIT, SL or SL-M.
        #[clap(long, default_value = "MARKET")]
        order_type: String,
        /// Limit price.
        #[clap(long)]
        price: Option<f64>,
        /// Trigger price.
        #[clap(long)]
        trigger_price: Option<f64>,
        /// MIS, CNC or NRML.
        #[clap(long, default_value = "CNC")]
        product: String,
        /// DAY or IOC.
        #[clap(long)]
        validity: Option<String>,
    },
    /// Show holdings and positions.
    Portfolio,
    /// Show the option chain of an underlying.
    OptionChain {
        /// Underlying name, e.g. NIFTY.
        #[clap(long, default_value = "NIFTY")]
        symbol: String,
        /// Expiry date, YYYY-MM-DD.
        #[clap(long)]
        expiry: String,
        /// ATM strike used if the proxy has to synthesize the chain.
        #[clap(long)]
        atm_strike: Option<f64>,
        /// Spot price, rounded to the nearest strike when no ATM strike is given.
        #[clap(long)]
        spot: Option<f64>,
        /// Rows of a synthetic chain.
        #[clap(long)]
        count: Option<usize>,
    },
    /// Request AI signals for market snapshots read from a JSON array file.
    Signals {
        /// Path to a JSON array of snapshots.
        path: PathBuf,
        /// Maximum number of snapshots analysed.
        #[clap(long, default_value_t = 3)]
        limit: usize,
        /// Pause after each request, in milliseconds.
        #[clap(long, default_value_t = 500)]
        delay_ms: u64,
    },
}
