//! Kite Connect REST client.
//!
//! Each method is one outbound round trip (the chain builder makes two in a
//! row). Authenticated calls carry `X-Kite-Version: 3` and
//! `Authorization: token <api_key>:<access_token>`; non-success replies are
//! turned into `ProxyError::Upstream` with the broker's own message when it
//! sent one.
use kite_common::instrument::{Instrument, InstrumentParser};
use kite_common::net::{KITE_VERSION, OPTIONS_EXCHANGE, kite_auth, url};
use kite_common::option_chain::{OptionChainRow, normalize};
use kite_common::order::{OrderRequest, PlacedOrder};
use kite_common::quote::{KiteEnvelope, KiteErrorBody, QuoteMap};
use kite_common::session::{Session, checksum};
use kite_common::{ProxyError, Result};
use log::{debug, error, info};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Client for the broker API.
pub struct KiteClient {
    client: Client,
    api_url: String,
    login_url: String,
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl KiteClient {
    pub fn new(
        client: Client,
        api_url: &str,
        login_url: &str,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            login_url: login_url.to_string(),
            api_key,
            api_secret,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(ProxyError::NotConfigured("Zerodha API key"))
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.api_key.as_deref(), self.api_secret.as_deref()) {
            (Some(key), Some(secret)) => Ok((key, secret)),
            _ => Err(ProxyError::NotConfigured("Zerodha credentials")),
        }
    }

    /// Attach the version and session headers, rejecting an empty token.
    fn authorize(&self, request: RequestBuilder, access_token: &str) -> Result<RequestBuilder> {
        if access_token.is_empty() {
            return Err(ProxyError::MissingAccessToken);
        }
        Ok(request
            .header("X-Kite-Version", KITE_VERSION)
            .header("Authorization", kite_auth(self.api_key()?, access_token)))
    }

    /// Broker login page for this API key.
    pub fn login_url(&self) -> Result<String> {
        let (api_key, _) = self.credentials()?;
        Ok(format!("{}?api_key={}", self.login_url, api_key))
    }

    /// Exchange a one-time request token for a session.
    pub async fn exchange_token(&self, request_token: &str) -> Result<Session> {
        let (api_key, api_secret) = self.credentials()?;
        let checksum = checksum(api_key, request_token, api_secret);

        let response = self
            .client
            .post(url(&self.api_url, "/session/token"))
            .header("X-Kite-Version", KITE_VERSION)
            .form(&[
                ("api_key", api_key),
                ("request_token", request_token),
                ("checksum", checksum.as_str()),
            ])
            .send()
            .await?;
        let session: Session = read_envelope(response, "Zerodha auth failed").await?;
        info!("Session created for {}", session.user_name);
        Ok(session)
    }

    /// Place a regular order and return the broker order id.
    pub async fn place_order(&self, order: &OrderRequest) -> Result<String> {
        let request = self.client.post(url(&self.api_url, "/orders/regular"));
        let response = self
            .authorize(request, &order.access_token)?
            .form(&order.form_fields())
            .send()
            .await?;
        let placed: PlacedOrder = read_envelope(response, "Order placement failed").await?;
        info!(
            "Order {} placed: {} {} x{}",
            placed.order_id, order.transaction_type, order.trading_symbol, order.quantity
        );
        Ok(placed.order_id)
    }

    async fn fetch_quotes<T: DeserializeOwned>(
        &self,
        access_token: &str,
        instruments: &[String],
    ) -> Result<T> {
        if instruments.is_empty() {
            return Err(ProxyError::NoInstruments);
        }
        let params: Vec<(&str, &str)> = instruments.iter().map(|i| ("i", i.as_str())).collect();
        let request = self.client.get(url(&self.api_url, "/quote")).query(&params);
        debug!("Requesting {} quotes in one batch", instruments.len());
        let response = self.authorize(request, access_token)?.send().await?;
        read_envelope(response, "Failed to fetch quotes").await
    }

    /// Raw broker quotes keyed by exchange-qualified symbol.
    pub async fn quotes(&self, access_token: &str, instruments: &[String]) -> Result<Value> {
        self.fetch_quotes(access_token, instruments).await
    }

    /// Long-term holdings.
    pub async fn holdings(&self, access_token: &str) -> Result<Value> {
        self.get_data(access_token, "/portfolio/holdings", "Failed to fetch holdings")
            .await
    }

    /// Day and net positions.
    pub async fn positions(&self, access_token: &str) -> Result<Value> {
        self.get_data(access_token, "/portfolio/positions", "Failed to fetch positions")
            .await
    }

    async fn get_data(&self, access_token: &str, path: &str, context: &str) -> Result<Value> {
        let request = self.client.get(url(&self.api_url, path));
        let response = self.authorize(request, access_token)?.send().await?;
        read_envelope(response, context).await
    }

    /// Instrument master of `exchange` as CSV text.
    pub async fn instruments_csv(&self, access_token: &str, exchange: &str) -> Result<String> {
        let request = self
            .client
            .get(url(&self.api_url, &format!("/instruments/{}", exchange)));
        let response = self.authorize(request, access_token)?.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(response, "Failed to fetch instruments").await);
        }
        Ok(response.text().await?)
    }

    /// Live option chain of `symbol` for `expiry`, one row per strike.
    pub async fn option_chain(
        &self,
        access_token: &str,
        symbol: &str,
        expiry: &str,
    ) -> Result<Vec<OptionChainRow>> {
        let master = self.instruments_csv(access_token, OPTIONS_EXCHANGE).await?;
        let instruments =
            Instrument::parse_option_chain(master.as_bytes(), OPTIONS_EXCHANGE, symbol, expiry)?;
        info!(
            "{} option instruments for {} expiring {}",
            instruments.len(),
            symbol,
            expiry
        );
        if instruments.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = instruments.iter().map(Instrument::quote_key).collect();
        let quotes: QuoteMap = self.fetch_quotes(access_token, &keys).await?;
        Ok(normalize(&instruments, &quotes))
    }
}

/// Decode `{"status": .., "data": T}` or turn a failure into `ProxyError::Upstream`.
async fn read_envelope<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    if !response.status().is_success() {
        return Err(upstream_error(response, context).await);
    }
    let envelope: KiteEnvelope<T> = response.json().await?;
    Ok(envelope.data)
}

async fn upstream_error(response: Response, context: &str) -> ProxyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!("Kite API error (HTTP {}): {}", status, body);
    let detail = match serde_json::from_str::<KiteErrorBody>(&body) {
        Ok(err) if !err.message.is_empty() => err.message,
        _ => format!("HTTP {}", status.as_u16()),
    };
    ProxyError::upstream(status.as_u16(), format!("{}: {}", context, detail))
}
