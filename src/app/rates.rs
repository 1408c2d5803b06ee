use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::clock::Clock;
use crate::config::Config;
use crate::models::Currency;
use crate::output::{write_rows, WriteSummary};
use crate::rates::{CrossRateService, ObservationSource, RateRequest, RowStats};

/// Range length used when no start date is given.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// Outcome of one `rates` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: RowStats,
    pub output: WriteSummary,
}

/// Fill in a missing end (tomorrow, so today is included) and a missing
/// start ([`DEFAULT_RANGE_DAYS`] before the end).
pub fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    clock: &dyn Clock,
) -> Result<(NaiveDate, NaiveDate)> {
    let to = match to {
        Some(to) => to,
        None => clock
            .today()
            .succ_opt()
            .context("Cannot compute a default end date")?,
    };
    let from = match from {
        Some(from) => from,
        None => to
            .checked_sub_signed(Duration::days(DEFAULT_RANGE_DAYS))
            .context("Cannot compute a default start date")?,
    };
    anyhow::ensure!(from < to, "--from ({from}) must be before --to ({to})");
    Ok((from, to))
}

/// Build a request from the range plus currency lists. Lists left empty
/// fall back to the config file.
pub fn build_request(
    config: &Config,
    from_date: NaiveDate,
    to_date: NaiveDate,
    from_currencies: Vec<Currency>,
    to_currencies: Vec<Currency>,
) -> RateRequest {
    let from_currencies = if from_currencies.is_empty() {
        config.request.from_currencies.clone()
    } else {
        from_currencies
    };
    let to_currencies = if to_currencies.is_empty() {
        config.request.to_currencies.clone()
    } else {
        to_currencies
    };
    RateRequest::new(from_date, to_date)
        .with_from_currencies(from_currencies)
        .with_to_currencies(to_currencies)
}

/// Fetch, derive and write the cross-rate table for `request`.
///
/// `open` is called only once the rates are loaded, so a failed fetch never
/// truncates an existing output file.
pub async fn run_rates<W, F>(
    config: &Config,
    source: Arc<dyn ObservationSource>,
    request: &RateRequest,
    open: F,
) -> Result<RunSummary>
where
    W: Write,
    F: FnOnce() -> Result<W>,
{
    let service = CrossRateService::new(source)
        .with_universe(config.universe())
        .with_lookback_days(config.request.lookback_days);

    let mut store = service.load(request).await?;
    let out = open()?;
    let mut rows = service.rows(&mut store, request);
    let output = write_rows(rows.by_ref(), out, &config.output)?;
    let stats = rows.stats();

    info!(
        from = %request.from_date,
        to = %request.to_date,
        days = stats.days,
        carried_forward = stats.carried_forward,
        gaps = stats.gaps,
        rows = output.written,
        skipped = output.skipped,
        "cross rates written"
    );

    Ok(RunSummary { stats, output })
}
