//! Command-line and environment configuration for the proxy.
//!
//! Secrets are normally supplied through the environment (`ZERODHA_API_KEY`,
//! `ZERODHA_API_SECRET`, `ONSPACE_AI_BASE_URL`, `ONSPACE_AI_API_KEY`). Missing
//! secrets do not stop the server; the affected endpoints answer with a
//! "not configured" error instead.
use std::time::Duration;

use clap::Parser;
use kite_common::net::{KITE_API_URL, KITE_LOGIN_URL, PROXY_BIND};
use kite_common::Result;

/// Model used for signal analysis unless overridden.
pub const DEFAULT_AI_MODEL: &str = "google/gemini-3-flash-preview";

/// Parsed proxy configuration.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address the HTTP server binds to.
    #[clap(long, env = "KITE_PROXY_BIND", default_value = PROXY_BIND)]
    pub bind: String,

    /// Kite Connect API key.
    #[clap(long, env = "ZERODHA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Kite Connect API secret, used only for the token exchange checksum.
    #[clap(long, env = "ZERODHA_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Base URL of the Kite REST API.
    #[clap(long, default_value = KITE_API_URL)]
    pub kite_api_url: String,

    /// Kite login page handed to users without a request token.
    #[clap(long, default_value = KITE_LOGIN_URL)]
    pub kite_login_url: String,

    /// Base URL of the chat-completion API.
    #[clap(long, env = "ONSPACE_AI_BASE_URL")]
    pub ai_base_url: Option<String>,

    /// Bearer key for the chat-completion API.
    #[clap(long, env = "ONSPACE_AI_API_KEY", hide_env_values = true)]
    pub ai_api_key: Option<String>,

    /// Completion model name.
    #[clap(long, default_value = DEFAULT_AI_MODEL)]
    pub ai_model: String,

    /// Timeout for every outbound request, in seconds.
    #[clap(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// ATM strike of the synthetic chain when the caller gives neither strike nor spot.
    #[clap(long, default_value_t = 25_000.0)]
    pub default_atm_strike: f64,
}

impl Args {
    /// Shared outbound HTTP client honouring the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        Ok(client)
    }
}
