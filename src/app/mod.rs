mod config;
mod rates;

pub use config::config_output;
pub use rates::{build_request, resolve_range, run_rates, RunSummary, DEFAULT_RANGE_DAYS};
