use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{Observation, QuoteSet, RateError};
use crate::models::Currency;

/// Per-day EUR quotes for one run.
///
/// Keys are the days the feed reported on plus any day materialized by
/// [`QuoteStore::carry_forward`]. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct QuoteStore {
    quotes: BTreeMap<NaiveDate, QuoteSet>,
    /// Materialized day -> day its quotes were copied from.
    carried: BTreeMap<NaiveDate, NaiveDate>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a batch of observations. Invalid observations are
    /// logged and skipped.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut store = Self::new();
        store.ingest(observations);
        store
    }

    /// Record every observation, returning how many were accepted.
    pub fn ingest<I>(&mut self, observations: I) -> usize
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut accepted = 0;
        for obs in observations {
            if self.record(obs.date, obs.currency, obs.eur_rate) {
                accepted += 1;
            }
        }
        debug!(accepted, days = self.quotes.len(), "observations ingested");
        accepted
    }

    /// Insert or overwrite the EUR rate of `currency` on `date`. The last
    /// write for a `(date, currency)` pair wins.
    ///
    /// Returns false (and stores nothing) for EUR itself or for a rate that
    /// is not a positive finite number.
    ///
    /// A direct observation on a carried-forward day discards the copied
    /// quotes, so the day only holds what was actually observed.
    pub fn record(&mut self, date: NaiveDate, currency: Currency, eur_rate: f64) -> bool {
        if let Err(err) = QuoteSet::validate(currency, eur_rate) {
            warn!(date = %date, error = %err, "ignoring observation");
            return false;
        }

        if let Some(from) = self.carried.remove(&date) {
            debug!(date = %date, from = %from, "observation replaces carried-forward quotes");
            self.quotes.remove(&date);
        }
        self.quotes
            .entry(date)
            .or_default()
            .insert(currency, eur_rate)
            .is_ok()
    }

    /// Whether `date` has quotes, observed or carried forward.
    pub fn has(&self, date: NaiveDate) -> bool {
        self.quotes.contains_key(&date)
    }

    /// Quotes in effect on `date`: the set stored for `date`, or else the
    /// nearest earlier one. Never materializes anything.
    pub fn get(&self, date: NaiveDate) -> Result<&QuoteSet, RateError> {
        self.quotes
            .range(..=date)
            .next_back()
            .map(|(_, quotes)| quotes)
            .ok_or(RateError::NotFound { date })
    }

    pub fn earliest(&self) -> Option<NaiveDate> {
        self.quotes.keys().next().copied()
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.quotes.keys().next_back().copied()
    }

    /// Copy the quotes of the latest day before `date` onto `date`, so later
    /// lookups (and later gaps) resolve directly.
    ///
    /// Returns the day the quotes came from; `date` itself if it already has
    /// quotes. Fails with [`RateError::UnfillableGap`] when no earlier day
    /// exists.
    pub fn carry_forward(&mut self, date: NaiveDate) -> Result<NaiveDate, RateError> {
        if self.has(date) {
            return Ok(self.carried.get(&date).copied().unwrap_or(date));
        }

        let (source_date, quotes) = self
            .quotes
            .range(..date)
            .next_back()
            .map(|(day, quotes)| (*day, quotes.clone()))
            .ok_or(RateError::UnfillableGap {
                date,
                earliest: self.earliest(),
            })?;

        debug!(date = %date, from = %source_date, "carrying quotes forward");
        self.quotes.insert(date, quotes);
        self.carried.insert(date, source_date);
        Ok(source_date)
    }

    /// The day a materialized set was copied from, if `date` was carried
    /// forward.
    pub fn carried_from(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.carried.get(&date).copied()
    }

    pub fn is_carried_forward(&self, date: NaiveDate) -> bool {
        self.carried.contains_key(&date)
    }

    /// Every currency quoted on at least one day.
    pub fn currencies(&self) -> Vec<Currency> {
        let mut all: Vec<Currency> = self
            .quotes
            .values()
            .flat_map(QuoteSet::currencies)
            .collect();
        all.sort();
        all.dedup();
        all
    }

    /// Number of days with quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
