mod currency;

pub use currency::{Currency, CurrencyError, DEFAULT_UNIVERSE};
