//! Error types shared between the proxy and the client.
//!
//! The `ProxyError` enum unifies transport failures, upstream rejections,
//! decoding problems and missing configuration, so every handler and CLI
//! command can propagate a single error type and render it as a plain message.
use std::io;

use thiserror::Error;

/// Unified error type shared by proxy and client.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The instrument master could not be read as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Outbound HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream service answered with a non-success status.
    #[error("{message}")]
    Upstream {
        /// HTTP status code returned upstream.
        status: u16,
        /// Message extracted from the upstream body, or a fixed summary.
        message: String,
    },

    /// A required secret or endpoint was not configured.
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    /// Broker call attempted without an access token.
    #[error("Access token required")]
    MissingAccessToken,

    /// Quote call attempted with an empty instrument list.
    #[error("No instruments specified")]
    NoInstruments,

    /// AI reply could not be turned into a trading signal.
    #[error("Malformed AI response: {0}")]
    MalformedSignal(String),
}

impl ProxyError {
    /// Build an upstream error from a status code and message.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        ProxyError::Upstream {
            status,
            message: message.into(),
        }
    }
}
