use std::collections::HashMap;

use chrono::NaiveDate;

use super::{QuoteSet, RateError};
use crate::models::Currency;

/// Every cross rate for one day, triangulated through the EUR pivot.
///
/// `rate(base, quote)` is the number of `quote` units one `base` unit buys:
/// with EUR quotes `q`, that is `q(quote) / q(base)`.
#[derive(Debug, Clone)]
pub struct CrossRateMatrix {
    date: NaiveDate,
    index: HashMap<Currency, usize>,
    n: usize,
    /// Row-major, `values[base * n + quote]`.
    values: Vec<f64>,
}

impl CrossRateMatrix {
    /// Triangulate every pair of currencies quoted in `quotes`, EUR included.
    pub fn build(date: NaiveDate, quotes: &QuoteSet) -> Self {
        let mut members: Vec<(Currency, f64)> = quotes
            .currencies()
            .filter(|currency| !currency.is_pivot())
            .filter_map(|currency| quotes.rate(currency).map(|rate| (currency, rate)))
            .collect();
        members.push((Currency::EUR, 1.0));
        members.sort_by(|a, b| a.0.cmp(&b.0));

        let n = members.len();
        let mut values = vec![1.0; n * n];
        for (i, (_, base_rate)) in members.iter().enumerate() {
            for (j, (_, quote_rate)) in members.iter().enumerate() {
                if i != j {
                    values[i * n + j] = quote_rate / base_rate;
                }
            }
        }

        let index = members
            .iter()
            .enumerate()
            .map(|(i, (currency, _))| (*currency, i))
            .collect();

        Self {
            date,
            index,
            n,
            values,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn contains(&self, currency: Currency) -> bool {
        self.index.contains_key(&currency)
    }

    /// Units of `quote` per unit of `base`. A currency against itself is
    /// exactly 1.
    pub fn rate(&self, base: Currency, quote: Currency) -> Result<f64, RateError> {
        if base == quote {
            return Ok(1.0);
        }
        let i = self.position(base)?;
        let j = self.position(quote)?;
        Ok(self.values[i * self.n + j])
    }

    fn position(&self, currency: Currency) -> Result<usize, RateError> {
        self.index
            .get(&currency)
            .copied()
            .ok_or(RateError::UnknownCurrency {
                date: self.date,
                currency,
            })
    }
}
