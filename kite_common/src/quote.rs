//! Live quote payloads and the broker response envelope.
//!
//! Every Kite response is wrapped as `{"status": "...", "data": ...}`; failures
//! carry `{"status": "error", "message": "..."}` instead. A `Quote` keeps only
//! the figures an option-chain row needs, defaulting anything absent to zero.
//! Quote and portfolio calls from the app are passed through, so their replies
//! keep the broker payload as raw JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful broker response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct KiteEnvelope<T> {
    /// `success` for successful calls.
    #[serde(default)]
    pub status: String,
    /// Call-specific payload.
    pub data: T,
}

/// Broker error body.
#[derive(Debug, Clone, Deserialize)]
pub struct KiteErrorBody {
    /// Human-readable failure reason.
    #[serde(default)]
    pub message: String,
    /// Broker exception class, e.g. `TokenException`.
    #[serde(default)]
    pub error_type: Option<String>,
}

/// Market quote for a single instrument.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Last traded price.
    #[serde(rename = "last_price", alias = "ltp", default)]
    pub ltp: f64,
    /// Open interest.
    #[serde(default)]
    pub oi: f64,
    /// Change reported by the broker for the session.
    #[serde(alias = "net_change", default)]
    pub change: f64,
    /// Traded volume.
    #[serde(default)]
    pub volume: f64,
}

/// Quotes keyed by exchange-qualified trading symbol (`NFO:NIFTY25JAN25000CE`).
pub type QuoteMap = HashMap<String, Quote>;

/// Quote call from the app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Exchange-qualified symbols, e.g. `NSE:INFY`.
    #[serde(default)]
    pub instruments: Vec<String>,
    /// Broker session token.
    #[serde(default)]
    pub access_token: String,
}

/// Proxy reply to a quote call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Broker quote payload keyed by instrument.
    pub quotes: Value,
}

/// Proxy reply to a portfolio call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioResponse {
    /// Long-term holdings as reported by the broker.
    pub holdings: Value,
    /// Day and net positions as reported by the broker.
    pub positions: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_broker_quote_payload() {
        let body = r#"{
            "status": "success",
            "data": {
                "NFO:NIFTY25JAN25000CE": {
                    "instrument_token": 1,
                    "last_price": 112.5,
                    "net_change": -3.25,
                    "oi": 150000,
                    "volume": 20000,
                    "depth": {"buy": [], "sell": []}
                },
                "NFO:NIFTY25JAN25000PE": {"last_price": 98.0}
            }
        }"#;

        let envelope: KiteEnvelope<QuoteMap> = serde_json::from_str(body).unwrap();
        let call = envelope.data["NFO:NIFTY25JAN25000CE"];
        assert_eq!(call.ltp, 112.5);
        assert_eq!(call.change, -3.25);
        assert_eq!(call.oi, 150000.0);

        let put = envelope.data["NFO:NIFTY25JAN25000PE"];
        assert_eq!(put, Quote { ltp: 98.0, ..Quote::default() });
    }

    #[test]
    fn decodes_error_body() {
        let body = r#"{"status":"error","message":"Invalid api_key","error_type":"InputException"}"#;
        let err: KiteErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(err.message, "Invalid api_key");
        assert_eq!(err.error_type.as_deref(), Some("InputException"));
    }
}
