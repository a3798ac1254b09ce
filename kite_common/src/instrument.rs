//! Option instruments and the instrument-master CSV parser.
//!
//! The broker publishes its instrument master as CSV with a header row. Only
//! the columns needed to build an option chain are decoded; everything else
//! is ignored by header name, so column order does not matter.

use std::io::Read;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::ProxyError;

/// Trait providing instrument-master parsing.
pub trait InstrumentParser {
    /// Parses option instruments of `underlying` expiring on `expiry` from CSV.
    ///
    /// `expiry` is compared verbatim against the `expiry` column
    /// (`YYYY-MM-DD`). Rows that are short, fail to decode, have a non-finite
    /// strike, or are not `CE`/`PE` are skipped rather than reported. A header
    /// row without the needed columns is a `ProxyError::Format`.
    fn parse_option_chain<R: Read>(
        reader: R,
        exchange: &str,
        underlying: &str,
        expiry: &str,
    ) -> Result<Vec<Instrument>, ProxyError>;
}

/// Option side of an instrument.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, Hash, Eq, PartialEq,
)]
pub enum InstrumentType {
    /// Call option.
    CE,
    /// Put option.
    PE,
}

/// A single tradable option contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Broker trading symbol, e.g. `NIFTY25JAN25000CE`.
    pub trading_symbol: String,
    /// Strike price.
    pub strike: f64,
    /// Call or put.
    #[serde(rename = "type")]
    pub instrument_type: InstrumentType,
    /// Exchange segment the instrument trades on.
    pub exchange: String,
}

impl Instrument {
    /// Create an instrument on the given exchange.
    pub fn new(
        exchange: &str,
        trading_symbol: &str,
        strike: f64,
        instrument_type: InstrumentType,
    ) -> Self {
        Instrument {
            trading_symbol: String::from(trading_symbol),
            strike,
            instrument_type,
            exchange: String::from(exchange),
        }
    }

    /// Exchange-qualified symbol used as the key of the quote map.
    pub fn quote_key(&self) -> String {
        format!("{}:{}", self.exchange, self.trading_symbol)
    }
}

/// Header names [`InstrumentRecord`] decodes.
const REQUIRED_COLUMNS: [&str; 5] = ["tradingsymbol", "name", "expiry", "strike", "instrument_type"];

/// Columns of the instrument master that the chain needs.
#[derive(Debug, Deserialize)]
struct InstrumentRecord {
    tradingsymbol: String,
    name: String,
    expiry: String,
    strike: f64,
    instrument_type: String,
}

impl InstrumentParser for Instrument {
    fn parse_option_chain<R: Read>(
        reader: R,
        exchange: &str,
        underlying: &str,
        expiry: &str,
    ) -> Result<Vec<Self>, ProxyError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?;
        if !headers.is_empty() {
            if let Some(missing) = REQUIRED_COLUMNS
                .iter()
                .find(|column| !headers.iter().any(|h| h == **column))
            {
                return Err(ProxyError::Format(format!(
                    "instrument master has no `{}` column",
                    missing
                )));
            }
        }

        let mut instruments = Vec::new();
        for record in csv_reader.deserialize::<InstrumentRecord>() {
            let Ok(record) = record else {
                continue;
            };
            if record.name != underlying || record.expiry != expiry || !record.strike.is_finite()
            {
                continue;
            }
            let Ok(instrument_type) = record.instrument_type.parse::<InstrumentType>() else {
                continue;
            };
            instruments.push(Instrument::new(
                exchange,
                &record.tradingsymbol,
                record.strike,
                instrument_type,
            ));
        }
        Ok(instruments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "\
instrument_token,exchange_token,tradingsymbol,name,last_price,expiry,strike,tick_size,lot_size,instrument_type,segment,exchange
1,10,NIFTY25JAN25000CE,\"NIFTY\",0,2025-01-30,25000,0.05,75,CE,NFO-OPT,NFO
2,11,NIFTY25JAN25000PE,\"NIFTY\",0,2025-01-30,25000,0.05,75,PE,NFO-OPT,NFO
3,12,NIFTY25JANFUT,NIFTY,0,2025-01-30,0,0.05,75,FUT,NFO-FUT,NFO
4,13,NIFTY25FEB25000CE,NIFTY,0,2025-02-27,25000,0.05,75,CE,NFO-OPT,NFO
5,14,BANKNIFTY25JAN51000CE,BANKNIFTY,0,2025-01-30,51000,0.05,30,CE,NFO-OPT,NFO
6,15,NIFTY25JAN25050CE,NIFTY,0,2025-01-30
7,16,NIFTY25JAN25050CE,NIFTY,0,2025-01-30,25050,0.05,75,CE,NFO-OPT,NFO
";

    #[test]
    fn keeps_matching_options_only() {
        let instruments =
            Instrument::parse_option_chain(MASTER.as_bytes(), "NFO", "NIFTY", "2025-01-30")
                .unwrap();

        let symbols: Vec<&str> = instruments
            .iter()
            .map(|i| i.trading_symbol.as_str())
            .collect();
        assert_eq!(
            symbols,
            vec!["NIFTY25JAN25000CE", "NIFTY25JAN25000PE", "NIFTY25JAN25050CE"]
        );
        assert_eq!(instruments[1].instrument_type, InstrumentType::PE);
        assert_eq!(instruments[2].strike, 25050.0);
    }

    #[test]
    fn quote_key_is_exchange_qualified() {
        let instrument = Instrument::new("NFO", "NIFTY25JAN25000CE", 25000.0, InstrumentType::CE);
        assert_eq!(instrument.quote_key(), "NFO:NIFTY25JAN25000CE");
    }

    #[test]
    fn empty_master_yields_nothing() {
        let instruments =
            Instrument::parse_option_chain("".as_bytes(), "NFO", "NIFTY", "2025-01-30").unwrap();
        assert!(instruments.is_empty());
    }

    #[test]
    fn non_finite_strikes_are_skipped() {
        let master = "\
tradingsymbol,name,expiry,strike,instrument_type
NIFTYNANCE,NIFTY,2025-01-30,NaN,CE
NIFTYINFPE,NIFTY,2025-01-30,inf,PE
NIFTY25JAN25000CE,NIFTY,2025-01-30,25000,CE
";
        let instruments =
            Instrument::parse_option_chain(master.as_bytes(), "NFO", "NIFTY", "2025-01-30")
                .unwrap();
        assert_eq!(instruments.len(), 1);
        assert_eq!(instruments[0].strike, 25000.0);
    }

    #[test]
    fn non_csv_body_is_a_format_error() {
        let body = "<html><body>Service unavailable</body></html>";
        let err = Instrument::parse_option_chain(body.as_bytes(), "NFO", "NIFTY", "2025-01-30")
            .unwrap_err();
        assert!(matches!(err, ProxyError::Format(_)));
    }
}
