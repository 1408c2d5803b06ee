#![allow(dead_code)]

use chrono::NaiveDate;
use eurocross::models::Currency;
use eurocross::rates::{MemorySource, Observation};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ccy(code: &str) -> Currency {
    Currency::new(code).unwrap()
}

pub fn obs(day: NaiveDate, code: &str, eur_rate: f64) -> Observation {
    Observation::new(day, ccy(code), eur_rate)
}

/// ECB fixings for the first trading week of 2024 (Jan 1 was a holiday).
pub fn first_week_2024() -> Vec<Observation> {
    vec![
        obs(date(2024, 1, 2), "USD", 1.0956),
        obs(date(2024, 1, 2), "PLN", 4.3580),
        obs(date(2024, 1, 2), "GBP", 0.86645),
        obs(date(2024, 1, 3), "USD", 1.0919),
        obs(date(2024, 1, 3), "PLN", 4.3673),
        obs(date(2024, 1, 3), "GBP", 0.86478),
        obs(date(2024, 1, 4), "USD", 1.0953),
        obs(date(2024, 1, 4), "PLN", 4.3550),
        obs(date(2024, 1, 4), "GBP", 0.86170),
        obs(date(2024, 1, 5), "USD", 1.0921),
        obs(date(2024, 1, 5), "PLN", 4.3553),
        obs(date(2024, 1, 5), "GBP", 0.86080),
    ]
}

pub fn memory_source(observations: Vec<Observation>) -> MemorySource {
    MemorySource::new(observations)
}
