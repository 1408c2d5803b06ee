mod support;

use eurocross::models::Currency;
use eurocross::rates::{
    project, CollectingGapObserver, CrossRateMatrix, DenseRow, QuoteSet, QuoteStore, RateRequest,
};
use proptest::prelude::*;
use support::{ccy, date};

const CODES: [&str; 4] = ["USD", "PLN", "GBP", "JPY"];

fn rate_strategy() -> impl Strategy<Value = f64> {
    0.001f64..10_000.0
}

fn quotes_strategy() -> impl Strategy<Value = [f64; 4]> {
    proptest::array::uniform4(rate_strategy())
}

fn members() -> Vec<Currency> {
    let mut members: Vec<Currency> = CODES.iter().map(|code| ccy(code)).collect();
    members.push(Currency::EUR);
    members
}

fn matrix(rates: [f64; 4]) -> CrossRateMatrix {
    let mut quotes = QuoteSet::new();
    for (code, rate) in CODES.iter().zip(rates) {
        quotes.insert(ccy(code), rate).unwrap();
    }
    CrossRateMatrix::build(date(2024, 1, 2), &quotes)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn cross_rate_of_a_currency_with_itself_is_one(rates in quotes_strategy()) {
        let matrix = matrix(rates);
        for currency in members() {
            prop_assert_eq!(matrix.rate(currency, currency).unwrap(), 1.0);
        }
    }

    #[test]
    fn cross_rates_are_reciprocal(rates in quotes_strategy()) {
        let matrix = matrix(rates);
        for a in members() {
            for b in members() {
                let product = matrix.rate(a, b).unwrap() * matrix.rate(b, a).unwrap();
                prop_assert!(close(product, 1.0), "{a}/{b}: {product}");
            }
        }
    }

    #[test]
    fn cross_rates_are_transitive(rates in quotes_strategy()) {
        let matrix = matrix(rates);
        for a in members() {
            for b in members() {
                for c in members() {
                    let direct = matrix.rate(a, c).unwrap();
                    let via = matrix.rate(a, b).unwrap() * matrix.rate(b, c).unwrap();
                    prop_assert!(close(direct, via), "{a}/{b}/{c}: {direct} vs {via}");
                }
            }
        }
    }

    #[test]
    fn carried_days_repeat_the_last_observation_exactly(
        rates in quotes_strategy(),
        observed_day in 1u32..10,
        extra_days in 1u32..15,
    ) {
        let mut store = QuoteStore::new();
        let observed = date(2024, 3, observed_day);
        for (code, rate) in CODES.iter().zip(rates) {
            store.record(observed, ccy(code), rate);
        }

        let end = observed + chrono::Duration::days(i64::from(extra_days) + 1);
        let request = RateRequest::new(observed, end);
        let observer = CollectingGapObserver::new();
        let universe = members();
        let rows: Vec<DenseRow> = project(&mut store, &request, &universe, &observer)
            .collect::<Result<_, _>>()
            .unwrap();

        let per_day = universe.len() * (universe.len() - 1);
        prop_assert_eq!(rows.len(), per_day * (extra_days as usize + 1));
        let first = &rows[..per_day];
        for day in rows.chunks(per_day).skip(1) {
            for (a, b) in first.iter().zip(day) {
                prop_assert_eq!(a.value, b.value);
            }
        }
        prop_assert!(observer.gaps().is_empty());
    }

    #[test]
    fn rows_cover_every_day_from_first_observation(
        first_observed in 1u32..20,
        from_day in 1u32..20,
        len in 1u32..10,
    ) {
        let mut store = QuoteStore::new();
        store.record(date(2024, 5, first_observed), ccy("USD"), 1.08);

        let from = date(2024, 5, from_day);
        let to = from + chrono::Duration::days(i64::from(len));
        let request = RateRequest::new(from, to)
            .with_from_currencies(vec![ccy("USD")])
            .with_to_currencies(vec![Currency::EUR]);
        let observer = CollectingGapObserver::new();
        let days: Vec<_> = project(&mut store, &request, &[], &observer)
            .map(|row| row.unwrap().date)
            .collect();

        let start = from.max(date(2024, 5, first_observed));
        let expected: Vec<_> = start
            .iter_days()
            .take_while(|day| *day < to)
            .collect();
        prop_assert_eq!(&days, &expected);
        prop_assert_eq!(observer.gaps().len() + days.len(), len as usize);
    }
}
