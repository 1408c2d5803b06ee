pub mod ecb;
pub mod frankfurter;

pub use ecb::{EcbSource, SeriesKey};
pub use frankfurter::FrankfurterSource;
