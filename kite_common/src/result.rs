//! `Result` alias for broker, AI and session calls.
//!
//! Both binaries and the shared DTO helpers fail with `ProxyError`; the proxy
//! renders it as a JSON error body and the CLI logs it before exiting.
use crate::error::ProxyError;

/// Workspace-wide `Result` alias with `ProxyError` as the default error.
pub type Result<T, E = ProxyError> = std::result::Result<T, E>;
