mod common;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use sales_analytics::analytics::{
    AbcClassifier, InventoryMetricsEngine, ItemAggregator, TrendForecaster,
};
use sales_analytics::domain_types::{ItemSeries, Metric, StockRecord, Tier, TransactionRow};

fn base_date() -> NaiveDate {
    common::date(2024, 1, 1)
}

fn series_strategy() -> impl Strategy<Value = ItemSeries> {
    prop::collection::vec((0i64..120, 0.0f64..1_000.0), 1..40).prop_map(|points| {
        ItemSeries::from_unsorted(
            "P",
            points
                .into_iter()
                .map(|(offset, qty)| (base_date() + Duration::days(offset), qty))
                .collect(),
        )
    })
}

fn totals_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..10_000.0, 1..50)
        .prop_filter("grand total must be positive", |v| v.iter().sum::<f64>() > 0.0)
}

proptest! {
    #[test]
    fn forecast_is_never_negative(series in series_strategy(), ahead in 0i64..365) {
        let target = base_date() + Duration::days(120 + ahead);
        if let Ok(value) = TrendForecaster::new().forecast(&series, &target) {
            prop_assert!(value >= 0.0);
            prop_assert!(value.is_finite());
        }
    }

    #[test]
    fn distinct_dates_always_fit(series in series_strategy()) {
        // 單點序列斜率為 0；多點序列日期必然不同
        prop_assert!(TrendForecaster::new().forecast(&series, &base_date()).is_ok());
    }

    #[test]
    fn aggregation_preserves_totals(
        rows in prop::collection::vec((0usize..5, 0i64..30, 0.0f64..100.0), 1..80)
    ) {
        let rows: Vec<TransactionRow> = rows
            .into_iter()
            .map(|(code, offset, qty)| {
                TransactionRow::new(
                    format!("C{}", code),
                    "item",
                    base_date() + Duration::days(offset),
                    qty,
                )
            })
            .collect();

        let aggregation = ItemAggregator::aggregate(&rows);
        let codes: Vec<&str> = aggregation.items.iter().map(|i| i.summary.code.as_str()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        prop_assert_eq!(codes, sorted);

        for item in &aggregation.items {
            let expected: f64 = rows
                .iter()
                .filter(|r| r.code == item.summary.code)
                .map(|r| r.quantity_sold)
                .sum();
            prop_assert!((item.summary.total_sales - expected).abs() < 1e-6);
            prop_assert_eq!(item.summary.days_of_sales, item.series.len());

            let dates: Vec<NaiveDate> = item.series.points().iter().map(|(d, _)| *d).collect();
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn abc_tiers_are_monotonic(totals in totals_strategy()) {
        let assignments = AbcClassifier::default().classify(&totals).unwrap();
        prop_assert_eq!(assignments.len(), totals.len());

        for pair in assignments.windows(2) {
            prop_assert!(pair[0].total_sales >= pair[1].total_sales);
            prop_assert!(pair[0].cumulative_percent <= pair[1].cumulative_percent);
            prop_assert!(pair[0].tier <= pair[1].tier);
            if pair[0].total_sales == pair[1].total_sales {
                prop_assert!(pair[0].index < pair[1].index);
            }
        }

        let percent_sum: f64 = assignments.iter().map(|a| a.sale_percent).sum();
        let tolerance = 0.005 * totals.len() as f64 + 1e-6;
        prop_assert!((percent_sum - 100.0).abs() <= tolerance);

        let first = &assignments[0];
        if first.cumulative_percent <= 80.0 {
            prop_assert_eq!(first.tier, Tier::A);
        }
    }

    #[test]
    fn abc_is_deterministic(totals in totals_strategy()) {
        let classifier = AbcClassifier::default();
        prop_assert_eq!(classifier.classify(&totals).unwrap(), classifier.classify(&totals).unwrap());
    }

    #[test]
    fn turnover_out_of_stock_iff_no_stock(
        on_hand in prop_oneof![Just(0.0f64), 0.0f64..500.0],
        sold in 0.0f64..500.0,
        days in prop_oneof![Just(0.0f64), 0.0f64..60.0],
    ) {
        let engine = InventoryMetricsEngine::new(30.0, 30.0).unwrap();
        let metrics = engine.compute(&StockRecord::new(0, on_hand, sold, days, sold));

        prop_assert_eq!(metrics.turnover.is_out_of_stock(), on_hand == 0.0);
        prop_assert!(!metrics.days_of_inventory.is_out_of_stock());
        if let Metric::Numeric(d) = metrics.days_of_inventory {
            prop_assert!(d >= 0.1);
        }
        if let Some(required) = metrics.required_quantity {
            prop_assert!(required > 0.0);
        }
    }
}
