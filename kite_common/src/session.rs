//! Login request/response bodies and the token-exchange checksum.
//!
//! Kite authenticates the exchange of a one-time request token for an access
//! token with `SHA-256(api_key + request_token + api_secret)` as lowercase hex.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Checksum sent with the request-token exchange.
pub fn checksum(api_key: &str, request_token: &str, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(request_token.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Login call from the app. Without a request token the proxy answers with
/// the login URL instead of exchanging anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// One-time token returned by the broker's login redirect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_token: Option<String>,
}

/// Session data returned by the broker's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Token used to authenticate later calls.
    pub access_token: String,
    /// Broker user name.
    #[serde(default)]
    pub user_name: String,
    /// Broker account email.
    #[serde(default)]
    pub email: String,
}

/// Proxy reply to a login call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    /// No request token supplied: where to send the user.
    LoginUrl {
        /// Broker login page carrying the API key.
        #[serde(rename = "loginUrl")]
        login_url: String,
        /// Hint for the user.
        message: String,
    },
    /// Request token exchanged.
    #[serde(rename_all = "camelCase")]
    Authenticated {
        /// Always `true` on this path.
        success: bool,
        /// Session access token.
        access_token: String,
        /// Broker user name.
        user_name: String,
        /// Broker account email.
        user_email: String,
    },
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        LoginResponse::Authenticated {
            success: true,
            access_token: session.access_token,
            user_name: session.user_name,
            user_email: session.email,
        }
    }
}

/// Body of calls that only need the session token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Broker session token.
    #[serde(default)]
    pub access_token: String,
}
