use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use super::{project, GapObserver, ObservationSource, QuoteStore, RateRequest, Rows, TracingGapObserver};
use crate::models::Currency;

/// Default number of extra days fetched before the range start, so the
/// first days of the range have something to carry forward.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Fetches observations for a request and projects them into rows.
pub struct CrossRateService {
    source: Arc<dyn ObservationSource>,
    universe: Vec<Currency>,
    lookback_days: u32,
    observer: Arc<dyn GapObserver>,
}

impl CrossRateService {
    pub fn new(source: Arc<dyn ObservationSource>) -> Self {
        Self {
            source,
            universe: Currency::default_universe(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            observer: Arc::new(TracingGapObserver),
        }
    }

    pub fn with_universe(mut self, universe: Vec<Currency>) -> Self {
        self.universe = universe;
        self
    }

    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn GapObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn universe(&self) -> &[Currency] {
        &self.universe
    }

    /// Days to fetch for `request`: the range widened by the lookback.
    pub fn fetch_window(&self, request: &RateRequest) -> (NaiveDate, NaiveDate) {
        let start = request
            .from_date
            .checked_sub_signed(Duration::days(i64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        (start, request.to_date)
    }

    /// Fetch the observations `request` needs and build a quote store.
    /// Source failures abort the run.
    pub async fn load(&self, request: &RateRequest) -> Result<QuoteStore> {
        anyhow::ensure!(
            request.from_date < request.to_date,
            "Empty date range: from {} is not before to {}",
            request.from_date,
            request.to_date
        );

        let currencies: Vec<Currency> = request
            .currencies(&self.universe)
            .into_iter()
            .filter(|currency| !currency.is_pivot())
            .collect();
        if currencies.is_empty() {
            debug!("only the pivot requested, nothing to fetch");
            return Ok(QuoteStore::new());
        }

        let (start, end) = self.fetch_window(request);
        debug!(
            source = self.source.name(),
            start = %start,
            end = %end,
            currencies = currencies.len(),
            "fetching observations"
        );
        let observations = self
            .source
            .fetch(&currencies, start, end)
            .await
            .with_context(|| format!("Failed to fetch rates from {}", self.source.name()))?;

        let fetched = observations.len();
        let store = QuoteStore::from_observations(observations);
        info!(
            source = self.source.name(),
            observations = fetched,
            days = store.len(),
            earliest = ?store.earliest(),
            latest = ?store.latest(),
            "rates loaded"
        );
        Ok(store)
    }

    /// Lazily project `store` onto `request`.
    pub fn rows<'a>(&'a self, store: &'a mut QuoteStore, request: &RateRequest) -> Rows<'a> {
        project(store, request, &self.universe, self.observer.as_ref())
    }
}
