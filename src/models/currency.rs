use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid currency code {value:?}: expected three ASCII letters (e.g. \"USD\")")]
pub struct CurrencyError {
    value: String,
}

/// ISO 4217 style three-letter currency code, stored upper-case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

/// ECB reference-rate currencies, quoted against the EUR pivot.
pub const DEFAULT_UNIVERSE: [&str; 30] = [
    "USD", "JPY", "BGN", "CZK", "DKK", "GBP", "HUF", "PLN", "RON", "SEK", "CHF", "ISK", "NOK",
    "TRY", "AUD", "BRL", "CAD", "CNY", "HKD", "IDR", "ILS", "INR", "KRW", "MXN", "MYR", "NZD",
    "PHP", "SGD", "THB", "ZAR",
];

impl Currency {
    /// The pivot currency of the feed. Its EUR rate is always 1.
    pub const EUR: Currency = Currency(*b"EUR");

    /// Parse a currency code. Surrounding whitespace is ignored and the
    /// code is upper-cased.
    pub fn new(value: &str) -> Result<Self, CurrencyError> {
        let trimmed = value.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(CurrencyError {
                value: value.to_string(),
            });
        }
        let mut code = [0u8; 3];
        for (slot, byte) in code.iter_mut().zip(bytes) {
            *slot = byte.to_ascii_uppercase();
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn is_pivot(&self) -> bool {
        *self == Self::EUR
    }

    /// The default universe: every ECB reference currency followed by EUR.
    pub fn default_universe() -> Vec<Currency> {
        DEFAULT_UNIVERSE
            .iter()
            .filter_map(|code| Currency::new(code).ok())
            .chain(std::iter::once(Currency::EUR))
            .collect()
    }

    /// Parse a comma separated list such as `"usd, PLN,GBP"`. Empty entries
    /// are ignored.
    pub fn parse_list(value: &str) -> Result<Vec<Currency>, CurrencyError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(Currency::new)
            .collect()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.as_str().to_string()
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
