//!
//! Common types and helpers shared by the Kite proxy server and its client.
//!
//! This crate aggregates:
//! - `error`: unified error type `ProxyError` used across the workspace.
//! - `result`: handy `Result<T, ProxyError>` alias.
//! - `instrument`: option instruments and the instrument-master CSV parser.
//! - `quote`: live quote payloads and the broker response envelope.
//! - `option_chain`: per-strike normalization and the synthetic fallback chain.
//! - `order`: order requests from the app and their broker form encoding.
//! - `session`: login request/response bodies and the token-exchange checksum.
//! - `signal`: AI prompt construction and signal parsing.
//! - `net`: endpoint paths, header values and default addresses.
#![warn(missing_docs)]
pub mod error;
pub mod instrument;
pub mod net;
pub mod option_chain;
pub mod order;
pub mod quote;
pub mod result;
pub mod session;
pub mod signal;

pub use error::ProxyError;
pub use result::Result;
