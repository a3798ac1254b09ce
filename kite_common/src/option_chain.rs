//! Option-chain normalization and the synthetic fallback chain.
//!
//! Live instruments arrive as one entry per contract (a call and a put per
//! strike at most). `normalize` folds them into one row per strike, writing
//! each contract's quote into the side it belongs to. When the live path
//! cannot be served, `synthetic_chain` produces a chain of the same shape
//! centred on the at-the-money strike so callers always get rows back.
//!
//! Invariants of `normalize`:
//! - every strike appears exactly once and rows are strictly ascending;
//! - a side with no instrument, or whose quote is missing, stays zero;
//! - duplicate contracts for the same strike and side overwrite earlier ones.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::instrument::{Instrument, InstrumentType};
use crate::quote::{Quote, QuoteMap};

/// Distance between adjacent strikes of the synthetic chain.
pub const STRIKE_STEP: f64 = 50.0;
/// Row count used when the caller does not ask for one.
pub const DEFAULT_CHAIN_ROWS: usize = 10;
/// Upper bound on synthetic rows; larger requests are clamped.
pub const MAX_CHAIN_ROWS: usize = 200;

/// One strike of an option chain with call and put figures side by side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OptionChainRow {
    /// Strike price.
    pub strike: f64,
    /// Call last traded price.
    #[serde(rename = "callLTP")]
    pub call_ltp: f64,
    /// Call open interest.
    #[serde(rename = "callOI")]
    pub call_oi: f64,
    /// Call open-interest change.
    #[serde(rename = "callOIChange")]
    pub call_oi_change: f64,
    /// Call implied volatility.
    #[serde(rename = "callIV")]
    pub call_iv: f64,
    /// Put last traded price.
    #[serde(rename = "putLTP")]
    pub put_ltp: f64,
    /// Put open interest.
    #[serde(rename = "putOI")]
    pub put_oi: f64,
    /// Put open-interest change.
    #[serde(rename = "putOIChange")]
    pub put_oi_change: f64,
    /// Put implied volatility.
    #[serde(rename = "putIV")]
    pub put_iv: f64,
}

impl OptionChainRow {
    /// Empty row for `strike`.
    pub fn new(strike: f64) -> Self {
        OptionChainRow {
            strike,
            ..Default::default()
        }
    }

    /// Write `quote` into the side selected by `side`.
    ///
    /// The broker quote carries no implied volatility, so IV is left as is.
    pub fn apply(&mut self, side: InstrumentType, quote: &Quote) {
        match side {
            InstrumentType::CE => {
                self.call_ltp = quote.ltp;
                self.call_oi = quote.oi;
                self.call_oi_change = quote.change;
            }
            InstrumentType::PE => {
                self.put_ltp = quote.ltp;
                self.put_oi = quote.oi;
                self.put_oi_change = quote.change;
            }
        }
    }
}

/// Option-chain call from the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainRequest {
    /// Underlying name as listed in the instrument master, e.g. `NIFTY`.
    pub symbol: String,
    /// Expiry date, `YYYY-MM-DD`.
    pub expiry: String,
    /// Broker session token.
    #[serde(default)]
    pub access_token: String,
    /// Centre of the synthetic chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atm_strike: Option<f64>,
    /// Underlying price; its nearest strike is used when no ATM strike is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_price: Option<f64>,
    /// Rows of the synthetic chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl OptionChainRequest {
    /// ATM strike for the synthetic chain, falling back to `default_atm`.
    pub fn resolve_atm(&self, default_atm: f64) -> f64 {
        self.atm_strike
            .or_else(|| self.spot_price.map(|spot| nearest_strike(spot, STRIKE_STEP)))
            .unwrap_or(default_atm)
    }

    /// Requested synthetic row count, at most [`MAX_CHAIN_ROWS`].
    pub fn row_count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_CHAIN_ROWS).min(MAX_CHAIN_ROWS)
    }
}

/// Where the rows of a chain came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChainSource {
    /// Built from the broker's instruments and quotes.
    Live,
    /// Generated because the live path failed.
    Synthetic,
}

/// Proxy reply to an option-chain call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChainResponse {
    /// Underlying name.
    pub symbol: String,
    /// Expiry date.
    pub expiry: String,
    /// Origin of `rows`.
    pub source: ChainSource,
    /// Rows ascending by strike.
    pub rows: Vec<OptionChainRow>,
}

/// Map a strike to an exact ordering key (hundredths of a point).
fn strike_key(strike: f64) -> i64 {
    (strike * 100.0).round() as i64
}

/// Fold instruments and their quotes into one row per strike, ascending.
pub fn normalize(instruments: &[Instrument], quotes: &QuoteMap) -> Vec<OptionChainRow> {
    let mut rows: BTreeMap<i64, OptionChainRow> = BTreeMap::new();

    for instrument in instruments {
        let row = rows
            .entry(strike_key(instrument.strike))
            .or_insert_with(|| OptionChainRow::new(instrument.strike));
        if let Some(quote) = quotes.get(&instrument.quote_key()) {
            row.apply(instrument.instrument_type, quote);
        }
    }

    rows.into_values().collect()
}

/// Strike nearest to `price` on a grid of `step`.
pub fn nearest_strike(price: f64, step: f64) -> f64 {
    (price / step).round() * step
}

/// Build `count` rows of random figures around `atm_strike`.
///
/// `count` is clamped to [`MAX_CHAIN_ROWS`]. Strikes start `count / 2` steps
/// below the ATM strike and climb by [`STRIKE_STEP`]. In-the-money sides get
/// an intrinsic component so the chain looks plausible: calls below ATM and
/// puts above it are pricier.
pub fn synthetic_chain(atm_strike: f64, count: usize) -> Vec<OptionChainRow> {
    let count = count.min(MAX_CHAIN_ROWS);
    let mut rng = rand::rng();
    let start = atm_strike - (count / 2) as f64 * STRIKE_STEP;

    (0..count)
        .map(|i| {
            let strike = start + i as f64 * STRIKE_STEP;
            OptionChainRow {
                strike,
                call_oi: rng.random_range(10_000..60_000) as f64,
                call_oi_change: rng.random_range(-5_000..5_000) as f64,
                call_ltp: (((atm_strike - strike) / 2.0).floor() + rng.random_range(0.0..100.0))
                    .max(5.0),
                call_iv: rng.random_range(10..40) as f64,
                put_ltp: (((strike - atm_strike) / 2.0).floor() + rng.random_range(0.0..100.0))
                    .max(5.0),
                put_iv: rng.random_range(10..40) as f64,
                put_oi: rng.random_range(10_000..60_000) as f64,
                put_oi_change: rng.random_range(-5_000..5_000) as f64,
            }
        })
        .collect()
}
