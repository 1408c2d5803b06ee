//! ECB data portal source for the EXR (exchange rates) dataflow.
//!
//! Series are addressed by SDMX keys such as `D.USD+PLN.EUR.SP00.A`: daily
//! frequency, the quoted currencies, the EUR denominator, spot rate type and
//! average variation. Data is requested as CSV so it can be read with the
//! `csv` crate instead of walking SDMX-ML.

use std::fmt;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Currency;
use crate::rates::{Observation, ObservationSource};

const ECB_BASE_URL: &str = "https://data-api.ecb.europa.eu/service/data/EXR";

/// SDMX series key for the EXR dataflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesKey {
    pub frequency: String,
    pub currencies: Vec<Currency>,
    pub denominator: Currency,
    pub rate_type: String,
    pub variation: String,
}

impl SeriesKey {
    /// Daily spot reference rates of `currencies` against EUR.
    pub fn daily(currencies: Vec<Currency>) -> Self {
        Self {
            frequency: "D".to_string(),
            currencies,
            denominator: Currency::EUR,
            rate_type: "SP00".to_string(),
            variation: "A".to_string(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let currencies: Vec<&str> = self.currencies.iter().map(Currency::as_str).collect();
        write!(
            f,
            "{}.{}.{}.{}.{}",
            self.frequency,
            currencies.join("+"),
            self.denominator,
            self.rate_type,
            self.variation
        )
    }
}

/// One line of the `csvdata` response. Other columns are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "CURRENCY")]
    currency: String,
    #[serde(rename = "CURRENCY_DENOM")]
    currency_denom: String,
    #[serde(rename = "TIME_PERIOD")]
    time_period: String,
    #[serde(rename = "OBS_VALUE")]
    obs_value: Option<f64>,
}

/// ECB data portal observation source. No API key is required.
#[derive(Debug, Clone)]
pub struct EcbSource {
    client: Client,
    base_url: String,
}

impl EcbSource {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: ECB_BASE_URL.to_string(),
        }
    }

    /// Points the source at another host (mirrors, mock servers). The URL
    /// must include the dataflow path, e.g. `.../service/data/EXR`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn parse_csv(body: &str) -> Result<Vec<Observation>> {
        let mut reader = csv::Reader::from_reader(body.as_bytes());
        let mut observations = Vec::new();

        for result in reader.deserialize() {
            let row: CsvRow = result.context("Failed to parse ECB CSV row")?;
            if !row.currency_denom.eq_ignore_ascii_case(Currency::EUR.as_str()) {
                debug!(denom = %row.currency_denom, "skipping non-EUR series");
                continue;
            }
            let Some(value) = row.obs_value else {
                debug!(currency = %row.currency, date = %row.time_period, "skipping empty observation");
                continue;
            };
            let currency = match Currency::new(&row.currency) {
                Ok(currency) => currency,
                Err(err) => {
                    warn!(error = %err, "skipping unrecognised currency");
                    continue;
                }
            };
            let date = NaiveDate::parse_from_str(&row.time_period, "%Y-%m-%d")
                .with_context(|| format!("Invalid TIME_PERIOD in ECB data: {}", row.time_period))?;
            observations.push(Observation::new(date, currency, value));
        }

        Ok(observations)
    }
}

impl Default for EcbSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ObservationSource for EcbSource {
    async fn fetch(
        &self,
        currencies: &[Currency],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>> {
        // endPeriod is inclusive.
        let Some(last) = end.pred_opt().filter(|last| *last >= start) else {
            return Ok(Vec::new());
        };
        let quoted: Vec<Currency> = currencies
            .iter()
            .copied()
            .filter(|currency| !currency.is_pivot())
            .collect();
        if quoted.is_empty() {
            return Ok(Vec::new());
        }

        let key = SeriesKey::daily(quoted);
        let url = format!("{}/{key}", self.base_url);
        debug!(url = %url, start = %start, end = %last, "requesting ECB series");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("startPeriod", start.to_string()),
                ("endPeriod", last.to_string()),
                ("format", "csvdata".to_string()),
            ])
            .send()
            .await?;

        // The data portal answers 404 when the key has no data in range.
        if response.status() == StatusCode::NOT_FOUND {
            debug!(key = %key, "no ECB data in range");
            return Ok(Vec::new());
        }

        let body = response
            .error_for_status()?
            .text()
            .await
            .context("Failed to read ECB response body")?;

        Self::parse_csv(&body)
    }

    fn name(&self) -> &str {
        "ecb"
    }
}
