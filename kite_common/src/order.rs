//! Order requests from the app and their broker form encoding.
//!
//! Fields are passed through as given; the broker enforces which order types,
//! products and price combinations are valid. The only shaping done here is
//! choosing which optional price fields to send for the chosen order type.

use serde::{Deserialize, Serialize};

/// Validity used when the caller does not pick one.
pub const DEFAULT_VALIDITY: &str = "DAY";

/// Order as submitted by the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Broker trading symbol.
    pub trading_symbol: String,
    /// Exchange, e.g. `NSE` or `NFO`.
    pub exchange: String,
    /// `BUY` or `SELL`.
    pub transaction_type: String,
    /// Number of units.
    pub quantity: u32,
    /// `MARKET`, `LIMIT`, `SL` or `SL-M`.
    pub order_type: String,
    /// Limit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Stop-loss trigger price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<f64>,
    /// `MIS`, `CNC` or `NRML`.
    pub product: String,
    /// `DAY` or `IOC`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<String>,
    /// Broker session token.
    #[serde(default)]
    pub access_token: String,
}

impl OrderRequest {
    /// Encode as the broker's `application/x-www-form-urlencoded` fields.
    ///
    /// `price` is sent for `LIMIT` and `SL`; `trigger_price` for `SL` and `SL-M`.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("tradingsymbol", self.trading_symbol.clone()),
            ("exchange", self.exchange.clone()),
            ("transaction_type", self.transaction_type.clone()),
            ("quantity", self.quantity.to_string()),
            ("order_type", self.order_type.clone()),
            ("product", self.product.clone()),
            (
                "validity",
                self.validity
                    .clone()
                    .unwrap_or_else(|| String::from(DEFAULT_VALIDITY)),
            ),
        ];

        let sends_price = matches!(self.order_type.as_str(), "LIMIT" | "SL");
        let sends_trigger = matches!(self.order_type.as_str(), "SL" | "SL-M");

        if sends_trigger {
            if let Some(trigger) = self.trigger_price {
                fields.push(("trigger_price", trigger.to_string()));
            }
        }
        if sends_price {
            if let Some(price) = self.price {
                fields.push(("price", price.to_string()));
            }
        }
        fields
    }
}

/// Payload of a successful order placement.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedOrder {
    /// Broker order id.
    pub order_id: String,
}

/// Proxy reply to an order placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    /// Always `true` on this path.
    pub success: bool,
    /// Broker order id.
    pub order_id: String,
    /// Fixed confirmation text.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(order_type: &str) -> OrderRequest {
        OrderRequest {
            trading_symbol: String::from("INFY"),
            exchange: String::from("NSE"),
            transaction_type: String::from("BUY"),
            quantity: 5,
            order_type: String::from(order_type),
            price: Some(1500.5),
            trigger_price: Some(1490.0),
            product: String::from("CNC"),
            validity: None,
            access_token: String::from("tok"),
        }
    }

    fn field<'a>(fields: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn market_order_sends_no_prices() {
        let fields = order("MARKET").form_fields();
        assert_eq!(field(&fields, "price"), None);
        assert_eq!(field(&fields, "trigger_price"), None);
        assert_eq!(field(&fields, "validity"), Some("DAY"));
        assert_eq!(field(&fields, "quantity"), Some("5"));
    }

    #[test]
    fn limit_order_sends_price_only() {
        let fields = order("LIMIT").form_fields();
        assert_eq!(field(&fields, "price"), Some("1500.5"));
        assert_eq!(field(&fields, "trigger_price"), None);
    }

    #[test]
    fn stop_orders_send_trigger() {
        let sl = order("SL").form_fields();
        assert_eq!(field(&sl, "price"), Some("1500.5"));
        assert_eq!(field(&sl, "trigger_price"), Some("1490"));

        let slm = order("SL-M").form_fields();
        assert_eq!(field(&slm, "price"), None);
        assert_eq!(field(&slm, "trigger_price"), Some("1490"));
    }

    #[test]
    fn decodes_app_body() {
        let body = r#"{"tradingSymbol":"NIFTY25JAN25000CE","exchange":"NFO","transactionType":"SELL",
            "quantity":75,"orderType":"LIMIT","price":101.25,"product":"NRML","validity":"IOC","accessToken":"abc"}"#;
        let request: OrderRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.trigger_price, None);
        let fields = request.form_fields();
        assert_eq!(field(&fields, "validity"), Some("IOC"));
        assert_eq!(field(&fields, "tradingsymbol"), Some("NIFTY25JAN25000CE"));
    }
}
