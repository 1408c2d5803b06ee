mod cross;
mod error;
pub mod gap;
mod models;
mod projector;
pub mod providers;
mod service;
mod source;
mod store;

pub use cross::CrossRateMatrix;
pub use error::{QuoteError, RateError};
pub use gap::{fill_gap, CollectingGapObserver, GapFill, GapObserver, TracingGapObserver};
pub use models::{DenseRow, Observation, QuoteSet, ROW_HEADER};
pub use projector::{project, RateRequest, RowStats, Rows};
pub use service::{CrossRateService, DEFAULT_LOOKBACK_DAYS};
pub use source::{MemorySource, ObservationSource};
pub use store::QuoteStore;
