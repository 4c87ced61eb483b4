mod common;

use assert_matches::assert_matches;
use common::{float_column, read_csv, text_column, STOCK_CSV};
use polars::prelude::*;
use rstest::rstest;
use sales_analytics::analytics::{AnalyticsError, InventoryMetricsEngine};
use sales_analytics::config::ApplicationConfig;
use sales_analytics::data_ingestion::validator::ValidationError;
use sales_analytics::data_ingestion::{CsvFileWriter, CsvReader};
use sales_analytics::domain_types::{ColumnName, Metric, StockRecord, Tier};
use sales_analytics::pipeline::{
    inventory_frame, metrics_frame, DiagnosticKind, InventoryPipeline, PipelineError,
};

#[test]
fn test_abc_report_from_csv() {
    let source = read_csv(STOCK_CSV);
    let output = InventoryPipeline::default()
        .run(&source, 30.0, 30.0)
        .unwrap();

    let cumulative: Vec<f64> = output.records.iter().map(|r| r.cumulative_percent).collect();
    assert_eq!(cumulative, vec![50.0, 80.0, 95.0, 100.0]);

    let tiers: Vec<Tier> = output.records.iter().map(|r| r.tier).collect();
    assert_eq!(tiers, vec![Tier::A, Tier::A, Tier::B, Tier::C]);

    let table = inventory_frame(&source, &output.records).unwrap();
    assert_eq!(table.height(), 4);
    assert_eq!(text_column(&table, "code"), vec!["A1", "B2", "C3", "D4"]);
    assert_eq!(text_column(&table, ColumnName::TIER), vec!["A", "A", "B", "C"]);
    assert_eq!(
        float_column(&table, ColumnName::SALE_PERCENT),
        vec![Some(50.0), Some(30.0), Some(15.0), Some(5.0)]
    );

    // A1: 50 / 10 = 5；B2: 30 / 5 = 6；C3: 15 / 30 = 0.5；D4 缺貨
    assert_eq!(
        text_column(&table, ColumnName::TURNOVER),
        vec!["5.0", "6.0", "0.5", "o.s"]
    );
    // A1: 10 / 5 = 2 天；B2: nds 為 0；C3: 30 / 3 = 10 天；D4: 0 / 2 = 0 → 0.1
    assert_eq!(
        text_column(&table, ColumnName::DAYS_OF_INVENTORY),
        vec!["2D", "0.1D", "10D", "0.1D"]
    );
    assert_eq!(
        text_column(&table, ColumnName::DAILY_SALES),
        vec!["5.0", "inf", "3.0", "2.0"]
    );
    // 需補貨 = 銷售數量 / 30 * 30 - 庫存
    assert_eq!(
        float_column(&table, ColumnName::REQUIRED_QUANTITY),
        vec![Some(40.0), Some(25.0), None, Some(20.0)]
    );
}

#[test]
fn test_original_columns_are_preserved() {
    let source = read_csv(STOCK_CSV);
    let output = InventoryPipeline::default()
        .run(&source, 30.0, 30.0)
        .unwrap();
    let table = inventory_frame(&source, &output.records).unwrap();

    assert_eq!(table.width(), source.width() + 7);
    for name in source.get_column_names() {
        assert!(table.column(name.as_str()).is_ok());
    }
}

#[test]
fn test_tied_totals_keep_input_order() {
    let source = df![
        "code" => ["first", "big", "second"],
        "quy" => [1.0, 1.0, 1.0],
        "quy sale" => [1.0, 1.0, 1.0],
        "nds" => [1.0, 1.0, 1.0],
        "total sales" => [25.0, 50.0, 25.0],
    ]
    .unwrap();

    let output = InventoryPipeline::default()
        .run(&source, 30.0, 30.0)
        .unwrap();
    let codes: Vec<&str> = output
        .records
        .iter()
        .map(|r| r.stock.code.as_deref().unwrap())
        .collect();
    assert_eq!(codes, vec!["big", "first", "second"]);
}

#[test]
fn test_custom_thresholds_from_config() {
    let mut config = ApplicationConfig::default();
    config.pipeline.tier_a_max = 50.0;
    config.pipeline.tier_b_max = 80.0;
    config.pipeline.parallel = false;

    let output = InventoryPipeline::from_config(&config)
        .unwrap()
        .run(&read_csv(STOCK_CSV), 30.0, 30.0)
        .unwrap();

    assert_eq!(output.tier_count(Tier::A), 1);
    assert_eq!(output.tier_count(Tier::B), 1);
    assert_eq!(output.tier_count(Tier::C), 2);
}

#[test]
fn test_invalid_thresholds_rejected() {
    let mut config = ApplicationConfig::default();
    config.pipeline.tier_a_max = 99.0;
    config.pipeline.tier_b_max = 90.0;

    assert_matches!(
        InventoryPipeline::from_config(&config),
        Err(PipelineError::Analytics(AnalyticsError::InvalidThresholds { .. }))
    );
}

#[rstest]
#[case(0.0, 30.0)]
#[case(30.0, -5.0)]
#[case(f64::INFINITY, 30.0)]
fn test_invalid_durations(#[case] sales: f64, #[case] storage: f64) {
    let err = InventoryPipeline::default()
        .run(&read_csv(STOCK_CSV), sales, storage)
        .unwrap_err();
    assert_matches!(
        err,
        PipelineError::Analytics(AnalyticsError::InvalidDuration { .. })
    );
}

#[test]
fn test_missing_inventory_column() {
    let source = df![
        "quy" => [1.0],
        "nds" => [1.0],
        "total sales" => [1.0],
    ]
    .unwrap();

    let err = InventoryPipeline::default()
        .run(&source, 30.0, 30.0)
        .unwrap_err();
    assert_matches!(
        err,
        PipelineError::Validation(ValidationError::MissingColumn { ref column }) if column == "quy sale"
    );
}

#[test]
fn test_null_cells_are_counted() {
    let source = df![
        "quy" => [Some(5.0), None],
        "quy sale" => [Some(10.0), Some(10.0)],
        "nds" => [Some(5.0), None],
        "total sales" => [Some(10.0), Some(10.0)],
    ]
    .unwrap();

    let output = InventoryPipeline::default()
        .run(&source, 30.0, 30.0)
        .unwrap();
    assert_eq!(
        output.report.diagnostics.count_of(DiagnosticKind::NullValues),
        2
    );
    // 第二列：庫存 0 → 缺貨；nds 0 → 日均無限大
    let second = output
        .records
        .iter()
        .find(|r| r.stock.row_index == 1)
        .unwrap();
    assert_eq!(second.metrics.turnover, Metric::OutOfStock);
    assert_eq!(second.metrics.daily_sales, Metric::EffectivelyInfinite);
}

#[test]
fn test_metrics_only_round_trip_through_csv() {
    let source = df![
        "item name" => ["Apple", "Banana"],
        "quantity on hand" => [10.0, 100.0],
        "quy sale" => [30.0, 30.0],
        "nds" => [10.0, 10.0],
    ]
    .unwrap();

    let output = InventoryPipeline::default()
        .run_metrics(&source, 30.0, 60.0)
        .unwrap();
    let mut table = metrics_frame(&source, &output.records).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    CsvFileWriter::default().write_file(&mut table, &path).unwrap();

    let back = CsvReader::default().read_file(&path).unwrap();
    assert_eq!(back.height(), 2);
    assert_eq!(text_column(&back, "item name"), vec!["Apple", "Banana"]);
    assert_eq!(
        float_column(&back, ColumnName::REQUIRED_QUANTITY),
        vec![Some(50.0), None]
    );
}

#[test]
fn test_classify_typed_records() {
    let engine = InventoryMetricsEngine::new(10.0, 20.0).unwrap();
    let records = vec![
        StockRecord::new(0, 2.0, 4.0, 2.0, 10.0).with_code("small"),
        StockRecord::new(1, 2.0, 4.0, 2.0, 90.0).with_code("large"),
    ];

    let classified = InventoryPipeline::default()
        .classify_records(records, &engine)
        .unwrap();

    assert_eq!(classified[0].stock.code.as_deref(), Some("large"));
    assert_eq!(classified[0].sale_percent, 90.0);
    assert_eq!(classified[1].cumulative_percent, 100.0);
    // 4 / 10 * 20 - 2 = 6
    assert_eq!(classified[0].metrics.required_quantity, Some(6.0));
}
