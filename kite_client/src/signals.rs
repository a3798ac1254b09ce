//! Sequential, rate-limited AI signal requests.
//!
//! The completion API is assumed to be rate limited, so snapshots are analysed
//! one at a time with a fixed pause after each request, and only the first
//! `limit` of them are sent at all. A failed item is logged and skipped.
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use kite_common::Result;
use kite_common::signal::{AnalysisResponse, MarketSnapshot};
use log::{info, warn};

use crate::proxy::ProxyClient;

/// Anything that can turn a snapshot into an analysis.
pub trait SignalSource {
    /// Analyse one snapshot.
    fn analyze(&self, snapshot: &MarketSnapshot) -> Result<AnalysisResponse>;
}

impl SignalSource for ProxyClient {
    fn analyze(&self, snapshot: &MarketSnapshot) -> Result<AnalysisResponse> {
        ProxyClient::analyze(self, snapshot)
    }
}

/// Analyse up to `limit` snapshots in order, pausing `delay` after each one.
///
/// Stops early when `shutdown` is set between items.
pub fn batch_signals<S: SignalSource>(
    source: &S,
    snapshots: &[MarketSnapshot],
    limit: usize,
    delay: Duration,
    shutdown: &AtomicBool,
) -> Vec<AnalysisResponse> {
    let mut signals = Vec::new();

    for snapshot in snapshots.iter().take(limit) {
        if shutdown.load(Ordering::Relaxed) {
            info!("Batch stopped before {}", snapshot.symbol);
            break;
        }
        match source.analyze(snapshot) {
            Ok(analysis) => signals.push(analysis),
            Err(e) => warn!("Skipping {}: {}", snapshot.symbol, e),
        }
        thread::sleep(delay);
    }
    signals
}
