use anyhow::Result;
use chrono::NaiveDate;

use super::Observation;
use crate::models::Currency;

/// A feed of EUR-pivoted daily observations.
#[async_trait::async_trait]
pub trait ObservationSource: Send + Sync {
    /// Observations for `currencies` on days in `[start, end)`. EUR is never
    /// requested. Network and parse failures are returned unchanged.
    async fn fetch(
        &self,
        currencies: &[Currency],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>>;

    fn name(&self) -> &str;
}

/// Serves a fixed set of observations.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    observations: Vec<Observation>,
}

impl MemorySource {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.observations.push(observation);
        self
    }
}

#[async_trait::async_trait]
impl ObservationSource for MemorySource {
    async fn fetch(
        &self,
        currencies: &[Currency],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>> {
        Ok(self
            .observations
            .iter()
            .filter(|obs| obs.date >= start && obs.date < end)
            .filter(|obs| currencies.contains(&obs.currency))
            .copied()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source_filters_window_and_currencies() {
        let usd = Currency::new("USD").unwrap();
        let pln = Currency::new("PLN").unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();

        let source = MemorySource::default()
            .with_observation(Observation::new(day(1), usd, 1.10))
            .with_observation(Observation::new(day(2), usd, 1.11))
            .with_observation(Observation::new(day(2), pln, 4.31))
            .with_observation(Observation::new(day(3), usd, 1.12));

        let fetched = source.fetch(&[usd], day(2), day(3)).await.unwrap();
        assert_eq!(fetched, vec![Observation::new(day(2), usd, 1.11)]);
        assert_eq!(source.name(), "memory");
    }
}
