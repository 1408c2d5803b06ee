//! Gap filling for days without direct observations.
//!
//! Weekends and holidays have no ECB fixing; the rate in effect on such a
//! day is the last published one. Days before the first observation cannot
//! be filled and are reported to a [`GapObserver`] instead of failing.

use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::warn;

use super::{QuoteStore, RateError};

/// How a day's quotes were resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapFill {
    /// The feed reported on this day.
    Observed,
    /// Quotes were copied from an earlier day.
    CarriedForward { from: NaiveDate },
}

/// Receives non-fatal gap warnings.
pub trait GapObserver: Send + Sync {
    fn unfillable_gap(&self, date: NaiveDate, earliest: Option<NaiveDate>);
}

/// Logs gaps through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingGapObserver;

impl GapObserver for TracingGapObserver {
    fn unfillable_gap(&self, date: NaiveDate, earliest: Option<NaiveDate>) {
        match earliest {
            Some(earliest) => warn!(
                date = %date,
                earliest = %earliest,
                "no rates on or before date, skipping"
            ),
            None => warn!(date = %date, "no rates ingested, skipping"),
        }
    }
}

/// Keeps every reported gap in memory.
#[derive(Debug, Default)]
pub struct CollectingGapObserver {
    gaps: Mutex<Vec<NaiveDate>>,
}

impl CollectingGapObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gaps(&self) -> Vec<NaiveDate> {
        self.gaps
            .lock()
            .map(|gaps| gaps.clone())
            .unwrap_or_default()
    }
}

impl GapObserver for CollectingGapObserver {
    fn unfillable_gap(&self, date: NaiveDate, _earliest: Option<NaiveDate>) {
        if let Ok(mut gaps) = self.gaps.lock() {
            gaps.push(date);
        }
    }
}

/// Make sure `date` has quotes in `store`, carrying the most recent earlier
/// day forward when needed. Never averages or interpolates.
pub fn fill_gap(store: &mut QuoteStore, date: NaiveDate) -> Result<GapFill, RateError> {
    if store.has(date) && !store.is_carried_forward(date) {
        return Ok(GapFill::Observed);
    }
    if let Some(earliest) = store.earliest() {
        if date < earliest {
            return Err(RateError::UnfillableGap {
                date,
                earliest: Some(earliest),
            });
        }
    }
    let from = store.carry_forward(date)?;
    Ok(GapFill::CarriedForward { from })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with_friday() -> QuoteStore {
        let mut store = QuoteStore::new();
        // 2024-01-05 is a Friday.
        store.record(date(2024, 1, 5), Currency::new("USD").unwrap(), 1.0942);
        store.record(date(2024, 1, 5), Currency::new("PLN").unwrap(), 4.3553);
        store
    }

    #[test]
    fn test_observed_day_is_untouched() {
        let mut store = store_with_friday();
        assert_eq!(fill_gap(&mut store, date(2024, 1, 5)), Ok(GapFill::Observed));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_weekend_carries_friday_forward_exactly() {
        let mut store = store_with_friday();

        assert_eq!(
            fill_gap(&mut store, date(2024, 1, 6)),
            Ok(GapFill::CarriedForward {
                from: date(2024, 1, 5)
            })
        );
        assert_eq!(
            fill_gap(&mut store, date(2024, 1, 7)),
            Ok(GapFill::CarriedForward {
                from: date(2024, 1, 6)
            })
        );

        let friday = store.get(date(2024, 1, 5)).unwrap().clone();
        assert_eq!(store.get(date(2024, 1, 6)).unwrap(), &friday);
        assert_eq!(store.get(date(2024, 1, 7)).unwrap(), &friday);
    }

    #[test]
    fn test_refilling_reports_original_source() {
        let mut store = store_with_friday();
        fill_gap(&mut store, date(2024, 1, 6)).unwrap();
        assert_eq!(
            fill_gap(&mut store, date(2024, 1, 6)),
            Ok(GapFill::CarriedForward {
                from: date(2024, 1, 5)
            })
        );
    }

    #[test]
    fn test_day_before_first_observation_is_unfillable() {
        let mut store = store_with_friday();
        assert_eq!(
            fill_gap(&mut store, date(2024, 1, 4)),
            Err(RateError::UnfillableGap {
                date: date(2024, 1, 4),
                earliest: Some(date(2024, 1, 5)),
            })
        );
        assert!(!store.has(date(2024, 1, 4)));
    }

    #[test]
    fn test_empty_store_is_unfillable() {
        let mut store = QuoteStore::new();
        assert!(matches!(
            fill_gap(&mut store, date(2024, 1, 4)),
            Err(RateError::UnfillableGap { earliest: None, .. })
        ));
    }

    #[test]
    fn test_collecting_observer_records_dates() {
        let observer = CollectingGapObserver::new();
        observer.unfillable_gap(date(2024, 1, 1), None);
        observer.unfillable_gap(date(2024, 1, 2), Some(date(2024, 1, 3)));
        assert_eq!(observer.gaps(), vec![date(2024, 1, 1), date(2024, 1, 2)]);
    }
}
