//! Blocking HTTP client for the proxy endpoints.
//!
//! Every endpoint takes a JSON body and answers with JSON; failures arrive as
//! `{"error": "<message>"}` and are surfaced as `ProxyError::Upstream`.
use std::time::Duration;

use kite_common::net::{
    ANALYZE_CRYPTO_PATH, LOGIN_PATH, OPTION_CHAIN_PATH, ORDER_PATH, PORTFOLIO_PATH, QUOTE_PATH,
    url,
};
use kite_common::option_chain::{OptionChainRequest, OptionChainResponse};
use kite_common::order::{OrderRequest, OrderResponse};
use kite_common::quote::{PortfolioResponse, QuoteRequest, QuoteResponse};
use kite_common::session::{LoginRequest, LoginResponse, TokenRequest};
use kite_common::signal::{AnalysisResponse, MarketSnapshot};
use kite_common::{ProxyError, Result};
use log::debug;
use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Request timeout for proxy calls.
const TIMEOUT_SECS: u64 = 30;

/// Helper type for calling the proxy.
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let endpoint = url(&self.base_url, path);
        debug!("POST {}", endpoint);
        let response = self.client.post(&endpoint).json(body).send()?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().unwrap_or(Value::Null);
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| format!("Proxy answered HTTP {}", status.as_u16()));
            return Err(ProxyError::upstream(status.as_u16(), message));
        }
        Ok(response.json()?)
    }

    pub fn login_url(&self) -> Result<String> {
        match self.post(LOGIN_PATH, &LoginRequest::default())? {
            LoginResponse::LoginUrl { login_url, .. } => Ok(login_url),
            LoginResponse::Authenticated { .. } => Err(ProxyError::Format(String::from(
                "expected a login URL, got a session",
            ))),
        }
    }

    pub fn login(&self, request_token: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            request_token: Some(request_token.to_string()),
        };
        self.post(LOGIN_PATH, &request)
    }

    pub fn quote(&self, access_token: &str, instruments: Vec<String>) -> Result<QuoteResponse> {
        let request = QuoteRequest {
            instruments,
            access_token: access_token.to_string(),
        };
        self.post(QUOTE_PATH, &request)
    }

    pub fn place_order(&self, order: &OrderRequest) -> Result<OrderResponse> {
        self.post(ORDER_PATH, order)
    }

    pub fn portfolio(&self, access_token: &str) -> Result<PortfolioResponse> {
        let request = TokenRequest {
            access_token: access_token.to_string(),
        };
        self.post(PORTFOLIO_PATH, &request)
    }

    pub fn option_chain(&self, request: &OptionChainRequest) -> Result<OptionChainResponse> {
        self.post(OPTION_CHAIN_PATH, request)
    }

    pub fn analyze(&self, snapshot: &MarketSnapshot) -> Result<AnalysisResponse> {
        self.post(ANALYZE_CRYPTO_PATH, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one HTTP request with a canned status and JSON body.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let size = stream.read(&mut buf).unwrap();
                if size == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..size]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn error_body_becomes_upstream_error() {
        let base = serve_once("500 Internal Server Error", r#"{"error":"Access token required"}"#);
        let client = ProxyClient::new(&base).unwrap();

        let err = client.portfolio("").unwrap_err();

        match err {
            ProxyError::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Access token required");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn login_url_is_extracted() {
        let base = serve_once(
            "200 OK",
            r#"{"loginUrl":"https://kite.zerodha.com/connect/login?api_key=k","message":"Please authenticate via Zerodha"}"#,
        );
        let client = ProxyClient::new(&base).unwrap();

        assert_eq!(
            client.login_url().unwrap(),
            "https://kite.zerodha.com/connect/login?api_key=k"
        );
    }

    #[test]
    fn login_decodes_session() {
        let base = serve_once(
            "200 OK",
            r#"{"success":true,"accessToken":"tok","userName":"AB1234","userEmail":"a@b.c"}"#,
        );
        let client = ProxyClient::new(&base).unwrap();

        match client.login("req").unwrap() {
            LoginResponse::Authenticated { access_token, .. } => assert_eq!(access_token, "tok"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
