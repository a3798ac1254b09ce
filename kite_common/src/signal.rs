//! AI prompt construction and trading-signal parsing.
//!
//! The completion model is asked for a bare JSON object, but replies often
//! wrap it in a markdown code fence anyway. `strip_code_fences` recovers the
//! inner text before it is decoded into an [`AiSignal`].

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::ProxyError;

/// System message sent ahead of every analysis prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert cryptocurrency trading advisor. Always respond with valid JSON only, no additional text.";

/// Market figures the app sends for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Ticker, e.g. `BTC`.
    pub symbol: String,
    /// Display name, e.g. `Bitcoin`.
    pub name: String,
    /// Current price in rupees.
    pub current_price: f64,
    /// Absolute 24h change in rupees.
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    /// 24h change in percent.
    #[serde(rename = "changePercent24h")]
    pub change_percent_24h: f64,
    /// Pre-formatted market cap, e.g. `₹85.2L Cr`.
    pub market_cap: String,
    /// Pre-formatted 24h volume.
    #[serde(rename = "volume24h")]
    pub volume_24h: String,
}

/// Recommended action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

/// Risk assessment of the recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Holding period the recommendation targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum TimeHorizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

/// Trading signal decoded from the model reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSignal {
    /// Recommended action.
    pub signal: SignalAction,
    /// Confidence in percent.
    pub confidence: f64,
    /// Expected price target.
    pub target_price: f64,
    /// Suggested stop-loss price.
    pub stop_loss: f64,
    /// Short justification.
    pub reasoning: String,
    /// Risk assessment.
    pub risk_level: RiskLevel,
    /// Holding period.
    pub time_horizon: TimeHorizon,
    /// Potential profit in percent.
    pub potential_profit: f64,
}

/// Proxy reply to an analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Ticker the analysis is for.
    pub symbol: String,
    /// Decoded signal.
    pub analysis: AiSignal,
    /// RFC 3339 UTC time the analysis was produced.
    pub timestamp: String,
}

/// Format an amount with Indian digit grouping (`12,34,567.5`).
///
/// At most three fraction digits are kept and trailing zeros dropped.
pub fn format_inr(value: f64) -> String {
    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let fixed = format!("{:.3}", rounded);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let grouped = if integer.len() <= 3 {
        integer.to_string()
    } else {
        let (head, tail) = integer.split_at(integer.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if value < 0.0 && rounded != 0.0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// Analysis prompt for `snapshot`.
pub fn build_prompt(snapshot: &MarketSnapshot) -> String {
    let sign = if snapshot.change_percent_24h >= 0.0 { "+" } else { "" };
    format!(
        "As a professional cryptocurrency trading advisor, analyze {name} ({symbol}) and provide actionable trading signals.

Current Market Data:
- Price: ₹{price}
- 24h Change: {sign}{percent:.2}% (₹{change})
- Market Cap: {cap}
- 24h Volume: {volume}

Provide:
1. Signal: BUY, SELL, or HOLD
2. Confidence: Percentage (0-100%)
3. Target Price: Expected price target in next 24-48 hours
4. Stop Loss: Recommended stop loss price
5. Reasoning: Brief explanation (max 2 sentences)
6. Risk Level: LOW, MEDIUM, or HIGH
7. Time Horizon: SHORT_TERM (24-48h), MEDIUM_TERM (1 week), or LONG_TERM (1 month+)

Format response as JSON:
{{
  \"signal\": \"BUY|SELL|HOLD\",
  \"confidence\": number,
  \"targetPrice\": number,
  \"stopLoss\": number,
  \"reasoning\": \"string\",
  \"riskLevel\": \"LOW|MEDIUM|HIGH\",
  \"timeHorizon\": \"SHORT_TERM|MEDIUM_TERM|LONG_TERM\",
  \"potentialProfit\": number (percentage)
}}",
        name = snapshot.name,
        symbol = snapshot.symbol,
        price = format_inr(snapshot.current_price),
        sign = sign,
        percent = snapshot.change_percent_24h,
        change = format_inr(snapshot.change_24h),
        cap = snapshot.market_cap,
        volume = snapshot.volume_24h,
    )
}

/// Inner text of the first markdown code fence, or the whole reply.
///
/// A ```` ```json ```` fence takes precedence over a bare one.
pub fn strip_code_fences(reply: &str) -> &str {
    let fenced = reply
        .split_once("```json")
        .or_else(|| reply.split_once("```"));
    match fenced {
        Some((_, rest)) => rest.split_once("```").map_or(rest, |(inner, _)| inner).trim(),
        None => reply.trim(),
    }
}

/// Decode a model reply into a signal.
pub fn parse_signal(reply: &str) -> Result<AiSignal, ProxyError> {
    serde_json::from_str(strip_code_fences(reply))
        .map_err(|e| ProxyError::MalformedSignal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNAL_JSON: &str = r#"{
        "signal": "BUY",
        "confidence": 78,
        "targetPrice": 9100000,
        "stopLoss": 8500000,
        "reasoning": "Breakout above resistance on rising volume.",
        "riskLevel": "MEDIUM",
        "timeHorizon": "SHORT_TERM",
        "potentialProfit": 4.2
    }"#;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            symbol: String::from("BTC"),
            name: String::from("Bitcoin"),
            current_price: 8_745_230.5,
            change_24h: -12_500.0,
            change_percent_24h: -1.4234,
            market_cap: String::from("₹172L Cr"),
            volume_24h: String::from("₹2.1L Cr"),
        }
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_inr(0.0), "0");
        assert_eq!(format_inr(999.0), "999");
        assert_eq!(format_inr(1000.0), "1,000");
        assert_eq!(format_inr(123_456.0), "1,23,456");
        assert_eq!(format_inr(8_745_230.5), "87,45,230.5");
        assert_eq!(format_inr(-12_500.0), "-12,500");
        assert_eq!(format_inr(1.23456), "1.235");
    }

    #[test]
    fn prompt_embeds_market_figures() {
        let prompt = build_prompt(&snapshot());
        assert!(prompt.contains("analyze Bitcoin (BTC)"));
        assert!(prompt.contains("- Price: ₹87,45,230.5"));
        assert!(prompt.contains("- 24h Change: -1.42% (₹-12,500)"));
        assert!(prompt.contains("- Market Cap: ₹172L Cr"));
        assert!(prompt.contains("\"potentialProfit\": number (percentage)"));
    }

    #[test]
    fn positive_change_is_signed() {
        let mut snapshot = snapshot();
        snapshot.change_percent_24h = 2.5;
        assert!(build_prompt(&snapshot).contains("+2.50%"));
    }

    #[test]
    fn strips_json_fence() {
        let reply = format!("Here you go:\n```json\n{}\n```\nGood luck", SIGNAL_JSON);
        let signal = parse_signal(&reply).unwrap();
        assert_eq!(signal.signal, SignalAction::Buy);
        assert_eq!(signal.risk_level, RiskLevel::Medium);
        assert_eq!(signal.time_horizon, TimeHorizon::ShortTerm);
        assert_eq!(signal.potential_profit, 4.2);
    }

    #[test]
    fn strips_bare_fence() {
        let reply = format!("```\n{}\n```", SIGNAL_JSON);
        assert_eq!(strip_code_fences(&reply), SIGNAL_JSON.trim());
        assert!(parse_signal(&reply).is_ok());
    }

    #[test]
    fn unfenced_reply_parses() {
        assert_eq!(parse_signal(SIGNAL_JSON).unwrap().confidence, 78.0);
    }

    #[test]
    fn malformed_reply_is_an_error() {
        let err = parse_signal("I think you should buy.").unwrap_err();
        assert!(matches!(err, ProxyError::MalformedSignal(_)));

        let wrong_action = SIGNAL_JSON.replace("\"BUY\"", "\"MOON\"");
        assert!(parse_signal(&wrong_action).is_err());
    }

    #[test]
    fn signal_round_trips_wire_names() {
        let signal = parse_signal(SIGNAL_JSON).unwrap();
        let value = serde_json::to_value(&signal).unwrap();
        assert_eq!(value["signal"], "BUY");
        assert_eq!(value["timeHorizon"], "SHORT_TERM");
        assert_eq!(signal.signal.to_string(), "BUY");
    }
}
