use chrono::NaiveDate;

use crate::models::Currency;

/// Failures of the rate engine itself. Ingestion failures are not part of
/// this type; they travel as `anyhow::Error` from the source unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    /// The currency has no quote on this date, even after gap filling.
    #[error("No rate for {currency} on {date}")]
    UnknownCurrency { date: NaiveDate, currency: Currency },

    /// The date lies before the earliest ingested observation.
    #[error("{date} precedes all known rates (earliest is {earliest:?})")]
    UnfillableGap {
        date: NaiveDate,
        earliest: Option<NaiveDate>,
    },

    /// No quote set exists on or before this date.
    #[error("No rates found on or before {date}")]
    NotFound { date: NaiveDate },
}

/// A quote that cannot enter a [`QuoteSet`](super::QuoteSet).
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum QuoteError {
    /// EUR is the implicit pivot and is never quoted.
    #[error("EUR is the pivot and cannot be quoted")]
    Pivot,

    #[error("Invalid EUR rate {rate} for {currency}")]
    InvalidRate { currency: Currency, rate: f64 },
}
