//! ExchangeRate-API v6 client.
//!
//! The API quotes "1 BASE = x FOREIGN"; the board wants "1 FOREIGN = y BASE",
//! so every quote is inverted before it leaves this module.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sarrafa_core::currency::invert_base_quotes;
use sarrafa_shared::CurrencyCode;
use sarrafa_shared::config::RatesConfig;

use crate::error::RatesError;
use crate::provider::{MarketRates, RateProvider};

const SUCCESS: &str = "success";

/// Request quota reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Requests allowed per plan period.
    pub plan_quota: u64,
    /// Requests used so far.
    pub requests_used: u64,
    /// Requests left.
    pub requests_remaining: u64,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
    #[serde(default, rename = "error-type", alias = "error_type")]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuotaResponse {
    result: String,
    #[serde(default)]
    plan_quota: u64,
    #[serde(default)]
    requests_used: u64,
    #[serde(default)]
    requests_remaining: u64,
    #[serde(default, rename = "error-type", alias = "error_type")]
    error_type: Option<String>,
}

fn provider_error(error_type: Option<String>) -> RatesError {
    RatesError::Provider(error_type.unwrap_or_else(|| "unknown-error".to_string()))
}

/// HTTP client for ExchangeRate-API.
#[derive(Debug, Clone)]
pub struct ExchangeRateApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateApiClient {
    /// Creates a client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RatesError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Creates a client from the rates section of the app config.
    pub fn from_config(config: &RatesConfig) -> Result<Self, RatesError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(RatesError::MissingApiKey)?;

        Self::new(
            config.provider_url.as_str(),
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Returns the provider's request quota.
    pub async fn quota(&self) -> Result<UsageStats, RatesError> {
        let url = format!("{}/{}/quota", self.base_url, self.api_key);
        let response: QuotaResponse = self.http.get(url).send().await?.json().await?;
        into_usage_stats(response)
    }

    /// Returns true if the key is accepted by the provider.
    pub async fn check_key(&self, base: &CurrencyCode) -> bool {
        match self.latest(base).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Rate provider rejected API key");
                false
            }
        }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiClient {
    fn name(&self) -> &'static str {
        "exchangerate-api"
    }

    async fn latest(&self, base: &CurrencyCode) -> Result<MarketRates, RatesError> {
        let url = format!("{}/{}/latest/{base}", self.base_url, self.api_key);
        debug!(base = %base, "Fetching latest rates");

        let response: LatestResponse = self.http.get(url).send().await?.json().await?;
        into_market_rates(response, base, Utc::now())
    }

    async fn usage(&self) -> Result<Option<UsageStats>, RatesError> {
        self.quota().await.map(Some)
    }
}

fn into_usage_stats(response: QuotaResponse) -> Result<UsageStats, RatesError> {
    if response.result != SUCCESS {
        return Err(provider_error(response.error_type));
    }

    Ok(UsageStats {
        plan_quota: response.plan_quota,
        requests_used: response.requests_used,
        requests_remaining: response.requests_remaining,
    })
}

fn into_market_rates(
    response: LatestResponse,
    base: &CurrencyCode,
    fetched_at: DateTime<Utc>,
) -> Result<MarketRates, RatesError> {
    if response.result != SUCCESS {
        return Err(provider_error(response.error_type));
    }

    let quotes = response
        .conversion_rates
        .into_iter()
        .filter(|(_, quote)| quote.is_finite())
        .filter_map(|(code, quote)| Decimal::from_f64(quote).map(|q| (code, q)));

    let mut rates = invert_base_quotes(quotes);
    rates.remove(base);

    Ok(MarketRates {
        base: base.clone(),
        rates,
        fetched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(json: &str) -> Result<MarketRates, RatesError> {
        let response: LatestResponse = serde_json::from_str(json).unwrap();
        into_market_rates(response, &CurrencyCode::ils(), Utc::now())
    }

    #[test]
    fn test_success_is_inverted() {
        let rates = parse(
            r#"{
                "result": "success",
                "base_code": "ILS",
                "conversion_rates": { "ILS": 1, "USD": 0.25, "EUR": 0.2, "XYZW": 2.0, "JPY": 0 }
            }"#,
        )
        .unwrap();

        assert_eq!(rates.base, CurrencyCode::ils());
        assert_eq!(rates.rates.len(), 2);
        assert_eq!(rates.rates[&"USD".parse::<CurrencyCode>().unwrap()], dec!(4));
        assert_eq!(rates.rates[&"EUR".parse::<CurrencyCode>().unwrap()], dec!(5));
    }

    #[tokio::test]
    async fn test_check_key_unreachable_provider() {
        // nothing listens on the discard port
        let client =
            ExchangeRateApiClient::new("http://127.0.0.1:9/v6", "key", Duration::from_secs(2))
                .unwrap();
        assert!(!client.check_key(&CurrencyCode::ils()).await);
        assert!(client.usage().await.is_err());
    }

    #[test]
    fn test_quota_parsing() {
        let response: QuotaResponse = serde_json::from_str(
            r#"{
                "result": "success",
                "plan_quota": 1500,
                "requests_remaining": 1377,
                "refresh_day_of_month": 17,
                "requests_used": 123
            }"#,
        )
        .unwrap();

        let stats = into_usage_stats(response).unwrap();
        assert_eq!(stats.plan_quota, 1500);
        assert_eq!(stats.requests_used, 123);
        assert_eq!(stats.requests_remaining, 1377);
    }

    #[test]
    fn test_quota_error_result() {
        let response: QuotaResponse =
            serde_json::from_str(r#"{ "result": "error", "error-type": "inactive-account" }"#)
                .unwrap();

        let err = into_usage_stats(response).unwrap_err();
        assert!(matches!(err, RatesError::Provider(kind) if kind == "inactive-account"));
    }

    #[test]
    fn test_error_result() {
        let err = parse(r#"{ "result": "error", "error-type": "invalid-key" }"#).unwrap_err();
        match err {
            RatesError::Provider(kind) => assert_eq!(kind, "invalid-key"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse(r#"{ "result": "error" }"#).unwrap_err();
        assert!(matches!(err, RatesError::Provider(kind) if kind == "unknown-error"));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = RatesConfig::default();
        assert!(matches!(
            ExchangeRateApiClient::from_config(&config),
            Err(RatesError::MissingApiKey)
        ));

        let config = RatesConfig {
            api_key: Some("   ".to_string()),
            ..RatesConfig::default()
        };
        assert!(matches!(
            ExchangeRateApiClient::from_config(&config),
            Err(RatesError::MissingApiKey)
        ));
    }

    #[test]
    fn test_from_config_trims_url() {
        let config = RatesConfig {
            api_key: Some("key".to_string()),
            provider_url: "http://localhost:9000/v6/".to_string(),
            ..RatesConfig::default()
        };
        let client = ExchangeRateApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9000/v6");
    }
}
