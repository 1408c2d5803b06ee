use chrono::NaiveDate;
use tracing::debug;

use super::gap::{fill_gap, GapFill, GapObserver};
use super::{CrossRateMatrix, DenseRow, QuoteStore, RateError};
use crate::models::Currency;

/// Which rows to produce: every day in `[from_date, to_date)`, every
/// `from × to` pair. An empty currency list means the whole universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRequest {
    pub from_date: NaiveDate,
    /// Exclusive.
    pub to_date: NaiveDate,
    pub from_currencies: Vec<Currency>,
    pub to_currencies: Vec<Currency>,
}

impl RateRequest {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            from_date,
            to_date,
            from_currencies: Vec::new(),
            to_currencies: Vec::new(),
        }
    }

    pub fn with_from_currencies(mut self, currencies: Vec<Currency>) -> Self {
        self.from_currencies = currencies;
        self
    }

    pub fn with_to_currencies(mut self, currencies: Vec<Currency>) -> Self {
        self.to_currencies = currencies;
        self
    }

    /// Number of days in the half-open range.
    pub fn day_count(&self) -> usize {
        usize::try_from((self.to_date - self.from_date).num_days()).unwrap_or(0)
    }

    /// Requested currencies on either side, in first-seen order, or `universe`
    /// when both sides are left open.
    pub fn currencies(&self, universe: &[Currency]) -> Vec<Currency> {
        let from = resolve(&self.from_currencies, universe);
        let to = resolve(&self.to_currencies, universe);
        dedup_in_order(from.into_iter().chain(to))
    }
}

/// Counters for one pass over [`Rows`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStats {
    pub days: usize,
    pub carried_forward: usize,
    pub gaps: usize,
    pub rows: usize,
    pub unknown: usize,
}

/// Lazily project the store onto `request`, one row per call to `next`.
///
/// Days are resolved (and gap-filled) only when reached, so a consumer that
/// stops early leaves later days untouched.
pub fn project<'a>(
    store: &'a mut QuoteStore,
    request: &RateRequest,
    universe: &[Currency],
    observer: &'a dyn GapObserver,
) -> Rows<'a> {
    Rows {
        store,
        observer,
        from: resolve(&request.from_currencies, universe),
        to: resolve(&request.to_currencies, universe),
        next_date: request.from_date,
        end: request.to_date,
        matrix: None,
        from_pos: 0,
        to_pos: 0,
        stats: RowStats::default(),
    }
}

/// Rows in order: date ascending, then from-currency, then to-currency.
/// Self pairs are skipped. A pair whose currency has no quote yields
/// `Err(RateError::UnknownCurrency)` and iteration continues.
pub struct Rows<'a> {
    store: &'a mut QuoteStore,
    observer: &'a dyn GapObserver,
    from: Vec<Currency>,
    to: Vec<Currency>,
    next_date: NaiveDate,
    end: NaiveDate,
    matrix: Option<CrossRateMatrix>,
    from_pos: usize,
    to_pos: usize,
    stats: RowStats,
}

impl Rows<'_> {
    pub fn stats(&self) -> RowStats {
        self.stats
    }

    /// Resolve the next day in range into a matrix. Returns `None` once the
    /// range is exhausted.
    fn advance_day(&mut self) -> Option<Result<CrossRateMatrix, RateError>> {
        while self.next_date < self.end {
            let date = self.next_date;
            self.next_date = date.succ_opt().unwrap_or(self.end);

            match fill_gap(self.store, date) {
                Ok(fill) => {
                    self.stats.days += 1;
                    if let GapFill::CarriedForward { from } = fill {
                        self.stats.carried_forward += 1;
                        debug!(date = %date, from = %from, "using carried-forward rates");
                    }
                    return Some(
                        self.store
                            .get(date)
                            .map(|quotes| CrossRateMatrix::build(date, quotes)),
                    );
                }
                Err(RateError::UnfillableGap { date, earliest }) => {
                    self.stats.gaps += 1;
                    self.observer.unfillable_gap(date, earliest);
                }
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<DenseRow, RateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(matrix) = &self.matrix else {
                match self.advance_day()? {
                    Ok(matrix) => {
                        self.matrix = Some(matrix);
                        self.from_pos = 0;
                        self.to_pos = 0;
                    }
                    Err(err) => return Some(Err(err)),
                }
                continue;
            };

            if self.from_pos >= self.from.len() {
                self.matrix = None;
                continue;
            }
            if self.to_pos >= self.to.len() {
                self.from_pos += 1;
                self.to_pos = 0;
                continue;
            }

            let base = self.from[self.from_pos];
            let quote = self.to[self.to_pos];
            self.to_pos += 1;
            if base == quote {
                continue;
            }

            let date = matrix.date();
            return Some(match matrix.rate(base, quote) {
                Ok(value) => {
                    self.stats.rows += 1;
                    Ok(DenseRow {
                        date,
                        currency: base,
                        currency_denom: quote,
                        value,
                    })
                }
                Err(err) => {
                    self.stats.unknown += 1;
                    Err(err)
                }
            });
        }
    }
}

fn resolve(requested: &[Currency], universe: &[Currency]) -> Vec<Currency> {
    if requested.is_empty() {
        dedup_in_order(universe.iter().copied())
    } else {
        dedup_in_order(requested.iter().copied())
    }
}

fn dedup_in_order(currencies: impl IntoIterator<Item = Currency>) -> Vec<Currency> {
    let mut seen = Vec::new();
    for currency in currencies {
        if !seen.contains(&currency) {
            seen.push(currency);
        }
    }
    seen
}
