use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::QuoteError;
use crate::models::Currency;

/// Column names of an emitted row, in order.
pub const ROW_HEADER: [&str; 4] = ["date", "currency", "currency_denom", "value"];

/// One raw observation from a feed: on `date`, one EUR was worth `eur_rate`
/// units of `currency`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub currency: Currency,
    pub eur_rate: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, currency: Currency, eur_rate: f64) -> Self {
        Self {
            date,
            currency,
            eur_rate,
        }
    }
}

/// EUR rates of every known currency for a single day.
///
/// EUR itself is never stored; [`QuoteSet::rate`] answers 1.0 for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSet {
    rates: HashMap<Currency, f64>,
}

impl QuoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the EUR rate of `currency`, returning the rate it replaced.
    /// Rejects EUR itself and rates that are not positive finite numbers.
    pub fn insert(
        &mut self,
        currency: Currency,
        eur_rate: f64,
    ) -> Result<Option<f64>, QuoteError> {
        Self::validate(currency, eur_rate)?;
        Ok(self.rates.insert(currency, eur_rate))
    }

    /// Whether `eur_rate` may be stored for `currency`.
    pub fn validate(currency: Currency, eur_rate: f64) -> Result<(), QuoteError> {
        if currency.is_pivot() {
            return Err(QuoteError::Pivot);
        }
        if !eur_rate.is_finite() || eur_rate <= 0.0 {
            return Err(QuoteError::InvalidRate {
                currency,
                rate: eur_rate,
            });
        }
        Ok(())
    }

    pub fn rate(&self, currency: Currency) -> Option<f64> {
        if currency.is_pivot() {
            return Some(1.0);
        }
        self.rates.get(&currency).copied()
    }

    pub fn contains(&self, currency: Currency) -> bool {
        currency.is_pivot() || self.rates.contains_key(&currency)
    }

    /// Currencies with a direct quote, excluding the implicit EUR.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.rates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// One output row: on `date`, one unit of `currency` is worth `value` units
/// of `currency_denom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseRow {
    pub date: NaiveDate,
    pub currency: Currency,
    pub currency_denom: Currency,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ccy(code: &str) -> Currency {
        Currency::new(code).unwrap()
    }

    #[test]
    fn test_pivot_rate_is_implicit() {
        let quotes = QuoteSet::new();
        assert_eq!(quotes.rate(Currency::EUR), Some(1.0));
        assert!(quotes.contains(Currency::EUR));
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_insert_overwrites_existing_rate() {
        let mut quotes = QuoteSet::new();
        assert_eq!(quotes.insert(ccy("USD"), 1.09), Ok(None));
        assert_eq!(quotes.insert(ccy("USD"), 1.10), Ok(Some(1.09)));
        assert_eq!(quotes.rate(ccy("USD")), Some(1.10));
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes.rate(ccy("PLN")), None);
    }

    #[test]
    fn test_insert_rejects_pivot() {
        let mut quotes = QuoteSet::new();
        assert_eq!(quotes.insert(Currency::EUR, 1.0), Err(QuoteError::Pivot));
        assert!(quotes.is_empty());
        assert_eq!(quotes.rate(Currency::EUR), Some(1.0));
    }

    #[test]
    fn test_insert_rejects_non_positive_and_non_finite_rates() {
        let mut quotes = QuoteSet::new();
        for rate in [0.0, -1.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                quotes.insert(ccy("USD"), rate),
                Err(QuoteError::InvalidRate { .. })
            ));
        }
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_header_matches_row_fields() {
        let row = DenseRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            currency: ccy("USD"),
            currency_denom: ccy("PLN"),
            value: 3.9,
        };
        let json = serde_json::to_value(&row).unwrap();
        for column in ROW_HEADER {
            assert!(json.get(column).is_some(), "missing column {column}");
        }
    }
}
