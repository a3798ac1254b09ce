//! Shared networking constants and helpers used by proxy and client.

/// Default base URL of the Kite Connect REST API.
pub const KITE_API_URL: &str = "https://api.kite.trade";
/// Default Kite Connect login page that issues request tokens.
pub const KITE_LOGIN_URL: &str = "https://kite.zerodha.com/connect/login";
/// API version header value required by every authenticated Kite call.
pub const KITE_VERSION: &str = "3";
/// Exchange segment holding index and stock options.
pub const OPTIONS_EXCHANGE: &str = "NFO";

/// Default bind address of the proxy.
pub const PROXY_BIND: &str = "0.0.0.0:8787";
/// Default proxy URL the client talks to.
pub const PROXY_URL: &str = "http://127.0.0.1:8787";

/// Proxy route for login URL and token exchange.
pub const LOGIN_PATH: &str = "/zerodha-login";
/// Proxy route for order placement.
pub const ORDER_PATH: &str = "/zerodha-order";
/// Proxy route for batched quotes.
pub const QUOTE_PATH: &str = "/zerodha-quote";
/// Proxy route for holdings and positions.
pub const PORTFOLIO_PATH: &str = "/zerodha-portfolio";
/// Proxy route for the normalized option chain.
pub const OPTION_CHAIN_PATH: &str = "/zerodha-optionchain";
/// Proxy route for AI crypto signals.
pub const ANALYZE_CRYPTO_PATH: &str = "/analyze-crypto";
/// Proxy liveness route.
pub const HEALTH_PATH: &str = "/health";

/// `Authorization` header value for an authenticated Kite call.
pub fn kite_auth(api_key: &str, access_token: &str) -> String {
    format!("token {}:{}", api_key, access_token)
}

/// Join a base URL and a path without doubling the slash.
pub fn url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_joins_key_and_token() {
        assert_eq!(kite_auth("key", "tok"), "token key:tok");
    }

    #[test]
    fn url_strips_trailing_slash() {
        assert_eq!(url("http://host/", "/quote"), "http://host/quote");
        assert_eq!(url("http://host", "/quote"), "http://host/quote");
    }
}
