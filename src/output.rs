//! Row sinks: CSV and JSON lines.

use std::collections::HashSet;
use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::{OutputConfig, OutputFormat};
use crate::format::{format_rate, round_rate};
use crate::models::Currency;
use crate::rates::{DenseRow, RateError, ROW_HEADER};

/// What happened while draining a row sequence into a sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Drain `rows` into `out`. Rows that failed are logged and skipped; only
/// complete rows reach the sink.
pub fn write_rows<I, W>(rows: I, out: W, config: &OutputConfig) -> Result<WriteSummary>
where
    I: IntoIterator<Item = Result<DenseRow, RateError>>,
    W: Write,
{
    match config.format {
        OutputFormat::Csv => drain(rows, CsvSink::new(out, config.decimals)?),
        OutputFormat::Json => drain(rows, JsonLinesSink::new(out, config.decimals)),
    }
}

fn drain<I, S>(rows: I, mut sink: S) -> Result<WriteSummary>
where
    I: IntoIterator<Item = Result<DenseRow, RateError>>,
    S: RowSink,
{
    let mut summary = WriteSummary::default();
    let mut unknown: HashSet<Currency> = HashSet::new();
    for row in rows {
        match row {
            Ok(row) => {
                sink.write(&row)?;
                summary.written += 1;
            }
            Err(RateError::UnknownCurrency { date, currency }) => {
                summary.skipped += 1;
                if unknown.insert(currency) {
                    warn!(currency = %currency, date = %date, "no rates for currency, skipping its pairs");
                } else {
                    debug!(currency = %currency, date = %date, "skipping pair");
                }
            }
            Err(err) => {
                summary.skipped += 1;
                warn!(error = %err, "skipping row");
            }
        }
    }
    sink.finish()?;
    Ok(summary)
}

trait RowSink {
    fn write(&mut self, row: &DenseRow) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    decimals: Option<u32>,
}

impl<W: Write> CsvSink<W> {
    fn new(out: W, decimals: Option<u32>) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(out);
        writer
            .write_record(ROW_HEADER)
            .context("Failed to write CSV header")?;
        Ok(Self { writer, decimals })
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write(&mut self, row: &DenseRow) -> Result<()> {
        self.writer
            .write_record([
                row.date.to_string(),
                row.currency.to_string(),
                row.currency_denom.to_string(),
                format_rate(row.value, self.decimals),
            ])
            .context("Failed to write CSV row")
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV output")
    }
}

struct JsonLinesSink<W: Write> {
    out: W,
    decimals: Option<u32>,
}

impl<W: Write> JsonLinesSink<W> {
    fn new(out: W, decimals: Option<u32>) -> Self {
        Self { out, decimals }
    }
}

impl<W: Write> RowSink for JsonLinesSink<W> {
    fn write(&mut self, row: &DenseRow) -> Result<()> {
        let row = DenseRow {
            value: round_rate(row.value, self.decimals),
            ..row.clone()
        };
        serde_json::to_writer(&mut self.out, &row).context("Failed to write JSON row")?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("Failed to flush JSON output")
    }
}
