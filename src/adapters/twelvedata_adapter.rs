//! TwelveData quote source adapter.
//!
//! Issues a single GET against the `/quote` endpoint per resolution. The
//! local symbol is mapped to the vendor's format by appending the fixed
//! market suffix before querying, and the price arrives as a
//! decimal-formatted string in the JSON payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::error::SourceError;
use crate::domain::symbol::Symbol;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_source::PriceSource;

const BASE_URL: &str = "https://api.twelvedata.com";
const MARKET_SUFFIX: &str = ":BIST";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fields of the `/quote` response we care about.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    price: Option<String>,
    message: Option<String>,
}

pub struct TwelveDataAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TwelveDataAdapter {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Same adapter against a different endpoint, used by tests.
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()),
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        Self::new(config.get_string("twelvedata", "apikey"))
    }

    fn vendor_symbol(symbol: &Symbol) -> String {
        format!("{}{}", symbol, MARKET_SUFFIX)
    }

    fn extract_price(payload: QuoteResponse) -> Result<f64, SourceError> {
        let raw = payload.price.ok_or_else(|| SourceError::InvalidResponse {
            reason: payload
                .message
                .unwrap_or_else(|| "price field missing".into()),
        })?;
        raw.parse::<f64>().map_err(|_| SourceError::InvalidResponse {
            reason: format!("non-numeric price '{raw}'"),
        })
    }
}

#[async_trait]
impl PriceSource for TwelveDataAdapter {
    async fn quote(&self, symbol: &Symbol) -> Result<f64, SourceError> {
        let api_key = self.api_key.as_deref().ok_or(SourceError::Unconfigured)?;

        let response = self
            .client
            .get(format!("{}/quote", self.base_url))
            .query(&[
                ("symbol", Self::vendor_symbol(symbol).as_str()),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                reason: e.to_string(),
            })?;

        let payload: QuoteResponse =
            response.json().await.map_err(|e| SourceError::InvalidResponse {
                reason: e.to_string(),
            })?;

        Self::extract_price(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(price: Option<&str>, message: Option<&str>) -> QuoteResponse {
        QuoteResponse {
            price: price.map(String::from),
            message: message.map(String::from),
        }
    }

    #[test]
    fn vendor_symbol_appends_market_suffix() {
        let sym = Symbol::new("thyao").unwrap();
        assert_eq!(TwelveDataAdapter::vendor_symbol(&sym), "THYAO:BIST");
    }

    #[test]
    fn extract_price_parses_decimal_string() {
        let price = TwelveDataAdapter::extract_price(payload(Some("123.45"), None)).unwrap();
        assert!((price - 123.45).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_price_field_is_invalid_response() {
        let err = TwelveDataAdapter::extract_price(payload(None, Some("symbol not found")));
        assert!(matches!(
            err,
            Err(SourceError::InvalidResponse { ref reason }) if reason == "symbol not found"
        ));
    }

    #[test]
    fn non_numeric_price_is_invalid_response() {
        let err = TwelveDataAdapter::extract_price(payload(Some("n/a"), None));
        assert!(matches!(err, Err(SourceError::InvalidResponse { .. })));
    }

    #[test]
    fn quote_response_deserializes_with_missing_fields() {
        let parsed: QuoteResponse = serde_json::from_str(r#"{"status":"error"}"#).unwrap();
        assert!(parsed.price.is_none());
    }

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        let adapter = TwelveDataAdapter::new(None);
        let err = adapter.quote(&Symbol::new("THYAO").unwrap()).await;
        assert!(matches!(err, Err(SourceError::Unconfigured)));
    }

    #[tokio::test]
    async fn blank_credential_treated_as_unconfigured() {
        let adapter = TwelveDataAdapter::new(Some("   ".into()));
        let err = adapter.quote(&Symbol::new("THYAO").unwrap()).await;
        assert!(matches!(err, Err(SourceError::Unconfigured)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let adapter =
            TwelveDataAdapter::with_base_url(Some("key".into()), "http://127.0.0.1:9");
        let err = adapter.quote(&Symbol::new("THYAO").unwrap()).await;
        assert!(matches!(err, Err(SourceError::Transport { .. })));
    }
}
