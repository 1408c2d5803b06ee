//! Live integration test for the Frankfurter source
//! Run with: cargo test --test frankfurter_live -- --ignored

use chrono::NaiveDate;
use eurocross::models::Currency;
use eurocross::rates::providers::FrankfurterSource;
use eurocross::rates::ObservationSource;

#[tokio::test]
#[ignore] // Run manually with --ignored flag
async fn test_frankfurter_live_week() {
    let source = FrankfurterSource::new();
    let usd = Currency::new("USD").unwrap();
    let gbp = Currency::new("GBP").unwrap();

    let start = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();

    match source.fetch(&[usd, gbp], start, end).await {
        Ok(observations) => {
            println!("{} observations", observations.len());
            // Five trading days, two currencies.
            assert_eq!(observations.len(), 10);
            for obs in &observations {
                assert!(obs.date >= start && obs.date < end);
                assert!(obs.eur_rate > 0.5 && obs.eur_rate < 2.0, "Rate {} seems unreasonable", obs.eur_rate);
            }
        }
        Err(e) => panic!("Error fetching rates: {e}"),
    }
}
