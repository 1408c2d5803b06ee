//! Frankfurter source for ECB daily reference rates.
//!
//! Frankfurter republishes the ECB fixings as JSON, with EUR as the base
//! currency, so its values are exactly the EUR quotes the engine expects.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Currency;
use crate::rates::{Observation, ObservationSource};

const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.app";

/// Time-series response: `rates` maps each published day to its quotes.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    /// The base currency (always EUR for our requests).
    base: String,
    rates: BTreeMap<String, HashMap<String, f64>>,
}

/// Frankfurter observation source. No API key is required.
#[derive(Debug, Clone)]
pub struct FrankfurterSource {
    client: Client,
    base_url: String,
}

impl FrankfurterSource {
    /// Creates a source with a default HTTP client.
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Creates a source with a custom HTTP client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: FRANKFURTER_BASE_URL.to_string(),
        }
    }

    /// Points the source at another host (mirrors, mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn parse(body: TimeSeriesResponse) -> Result<Vec<Observation>> {
        anyhow::ensure!(
            body.base.eq_ignore_ascii_case("EUR"),
            "Expected EUR based rates, got {}",
            body.base
        );

        let mut observations = Vec::new();
        for (day, quotes) in body.rates {
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .with_context(|| format!("Invalid date in response: {day}"))?;
            for (code, rate) in quotes {
                match Currency::new(&code) {
                    Ok(currency) => observations.push(Observation::new(date, currency, rate)),
                    Err(err) => warn!(error = %err, "skipping unrecognised currency"),
                }
            }
        }
        Ok(observations)
    }
}

impl Default for FrankfurterSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ObservationSource for FrankfurterSource {
    async fn fetch(
        &self,
        currencies: &[Currency],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>> {
        // The API range is inclusive on both ends.
        let Some(last) = end.pred_opt().filter(|last| *last >= start) else {
            return Ok(Vec::new());
        };
        let symbols: Vec<&str> = currencies
            .iter()
            .filter(|currency| !currency.is_pivot())
            .map(Currency::as_str)
            .collect();
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let symbols = symbols.join(",");

        let url = format!("{}/{start}..{last}", self.base_url);
        debug!(url = %url, symbols = %symbols, "requesting Frankfurter time series");

        let body = self
            .client
            .get(&url)
            .query(&[("from", "EUR"), ("to", symbols.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<TimeSeriesResponse>()
            .await
            .context("Failed to decode Frankfurter response")?;

        Self::parse(body)
    }

    fn name(&self) -> &str {
        "frankfurter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample time-series response covering a weekend.
    const SAMPLE_SERIES: &str = r#"{
        "amount": 1.0,
        "base": "EUR",
        "start_date": "2024-01-05",
        "end_date": "2024-01-08",
        "rates": {
            "2024-01-05": { "USD": 1.0921, "PLN": 4.3553 },
            "2024-01-08": { "USD": 1.0946, "PLN": 4.3523 }
        }
    }"#;

    #[test]
    fn test_parse_time_series() {
        let body: TimeSeriesResponse = serde_json::from_str(SAMPLE_SERIES).unwrap();
        let mut observations = FrankfurterSource::parse(body).unwrap();
        observations.sort_by(|a, b| (a.date, a.currency).cmp(&(b.date, b.currency)));

        assert_eq!(observations.len(), 4);
        assert_eq!(
            observations[0],
            Observation::new(
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                Currency::new("PLN").unwrap(),
                4.3553
            )
        );
        assert_eq!(observations[3].date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_parse_rejects_non_eur_base() {
        let body: TimeSeriesResponse =
            serde_json::from_str(r#"{"base": "USD", "rates": {}}"#).unwrap();
        assert!(FrankfurterSource::parse(body).is_err());
    }

    #[test]
    fn test_parse_skips_malformed_codes() {
        let body: TimeSeriesResponse = serde_json::from_str(
            r#"{"base": "EUR", "rates": {"2024-01-05": {"USD": 1.09, "X1": 2.0}}}"#,
        )
        .unwrap();
        assert_eq!(FrankfurterSource::parse(body).unwrap().len(), 1);
    }

    #[test]
    fn test_source_name() {
        assert_eq!(FrankfurterSource::default().name(), "frankfurter");
    }

    #[tokio::test]
    async fn test_empty_window_skips_http() {
        let source = FrankfurterSource::new().with_base_url("http://127.0.0.1:9");
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let usd = Currency::new("USD").unwrap();

        assert!(source.fetch(&[usd], day, day).await.unwrap().is_empty());
        assert!(source
            .fetch(&[Currency::EUR], day, day.succ_opt().unwrap())
            .await
            .unwrap()
            .is_empty());
    }
}
