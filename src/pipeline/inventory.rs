//! 庫存分析管線
//!
//! 期間檢查 → 結構驗證 → 逐列庫存指標 → ABC 分級。輸出依 ABC 排名排序。

use polars::prelude::DataFrame;
use tracing::info;

use super::error::PipelineResult;
use super::report::{DiagnosticKind, PipelineReport};
use crate::analytics::{AbcClassifier, InventoryMetricsEngine};
use crate::config::ApplicationConfig;
use crate::data_ingestion::validator::{DateNormalizer, SchemaValidator};
use crate::data_ingestion::{LoadedStock, TableLoader};
use crate::domain_types::{ClassifiedRecord, InventoryMetrics, StockRecord, Tier};

/// ABC 分析結果
#[derive(Debug, Clone)]
pub struct InventoryOutput {
    /// 依排名排序（總銷售遞減，同值保留輸入順序）
    pub records: Vec<ClassifiedRecord>,
    pub report: PipelineReport,
}

impl InventoryOutput {
    pub fn tier_count(&self, tier: Tier) -> usize {
        self.records.iter().filter(|r| r.tier == tier).count()
    }
}

/// 只計算庫存指標（不分級）的結果，順序與輸入相同
#[derive(Debug, Clone)]
pub struct MetricsOutput {
    pub records: Vec<(StockRecord, InventoryMetrics)>,
    pub report: PipelineReport,
}

/// 庫存分析管線
#[derive(Debug, Clone, Default)]
pub struct InventoryPipeline {
    loader: TableLoader,
    classifier: AbcClassifier,
    parallel: bool,
}

impl InventoryPipeline {
    pub fn new(loader: TableLoader, classifier: AbcClassifier) -> Self {
        Self {
            loader,
            classifier,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 依應用程式設定建立；分級門檻不合法時返回錯誤
    pub fn from_config(config: &ApplicationConfig) -> PipelineResult<Self> {
        let loader = TableLoader::new(
            SchemaValidator::new(config.columns.aliases()),
            DateNormalizer::new(config.pipeline.date_parsing.clone()),
        );
        let classifier =
            AbcClassifier::with_thresholds(config.pipeline.tier_a_max, config.pipeline.tier_b_max)?;
        Ok(Self::new(loader, classifier).with_parallel(config.pipeline.parallel))
    }

    /// 計算庫存指標並做 ABC 分級
    ///
    /// 期間在讀取任何列之前檢查。
    pub fn run(
        &self,
        df: &DataFrame,
        sales_duration: f64,
        storage_duration: f64,
    ) -> PipelineResult<InventoryOutput> {
        let engine = InventoryMetricsEngine::new(sales_duration, storage_duration)?;
        let loaded = self.loader.load_stock(df, true)?;

        let mut report = Self::start_report("inventory", &loaded);
        let records = self.classify_records(loaded.records, &engine)?;

        report.output_records = records.len();
        for tier in [Tier::A, Tier::B, Tier::C] {
            report.add_statistic(
                format!("tier_{}", tier.as_str().to_lowercase()),
                records.iter().filter(|r| r.tier == tier).count(),
            );
        }
        Self::add_metric_statistics(&mut report, records.iter().map(|r| &r.metrics));
        let report = report.finish();

        info!(
            "ABC 分析完成: {} 列，銷售期間 {} 天，儲存期間 {} 天",
            records.len(),
            sales_duration,
            storage_duration
        );

        Ok(InventoryOutput { records, report })
    }

    /// 只計算庫存指標，不要求總銷售欄位
    pub fn run_metrics(
        &self,
        df: &DataFrame,
        sales_duration: f64,
        storage_duration: f64,
    ) -> PipelineResult<MetricsOutput> {
        let engine = InventoryMetricsEngine::new(sales_duration, storage_duration)?;
        let loaded = self.loader.load_stock(df, false)?;

        let mut report = Self::start_report("inventory_metrics", &loaded);
        let metrics = engine.compute_all(&loaded.records, self.parallel);
        let records: Vec<(StockRecord, InventoryMetrics)> =
            loaded.records.into_iter().zip(metrics).collect();

        report.output_records = records.len();
        Self::add_metric_statistics(&mut report, records.iter().map(|(_, m)| m));

        Ok(MetricsOutput {
            records,
            report: report.finish(),
        })
    }

    /// 對型別化紀錄計算指標並分級，結果依排名排序
    pub fn classify_records(
        &self,
        records: Vec<StockRecord>,
        engine: &InventoryMetricsEngine,
    ) -> PipelineResult<Vec<ClassifiedRecord>> {
        let metrics = engine.compute_all(&records, self.parallel);
        let totals: Vec<f64> = records.iter().map(|r| r.total_sales).collect();
        let assignments = self.classifier.classify(&totals)?;

        let mut rows: Vec<Option<(StockRecord, InventoryMetrics)>> =
            records.into_iter().zip(metrics).map(Some).collect();

        Ok(assignments
            .into_iter()
            .filter_map(|assignment| {
                let (stock, metrics) = rows[assignment.index].take()?;
                Some(ClassifiedRecord {
                    stock,
                    metrics,
                    sale_percent: assignment.sale_percent,
                    cumulative_percent: assignment.cumulative_percent,
                    tier: assignment.tier,
                })
            })
            .collect())
    }

    fn start_report(name: &str, loaded: &LoadedStock) -> PipelineReport {
        let mut report = PipelineReport::new(name);
        report.input_records = loaded.records.len();
        report.diagnostics.warn(
            DiagnosticKind::NullValues,
            loaded.null_cells,
            format!("{} 個數值儲存格為空，以 0 計算", loaded.null_cells),
        );
        report
    }

    fn add_metric_statistics<'a>(
        report: &mut PipelineReport,
        metrics: impl Iterator<Item = &'a InventoryMetrics>,
    ) {
        let (out_of_stock, to_reorder) = metrics.fold((0usize, 0usize), |(oos, reorder), m| {
            (
                oos + usize::from(m.turnover.is_out_of_stock()),
                reorder + usize::from(m.required_quantity.is_some()),
            )
        });
        report.add_statistic("out_of_stock", out_of_stock);
        report.add_statistic("to_reorder", to_reorder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsError;
    use crate::domain_types::Metric;
    use crate::pipeline::PipelineError;
    use assert_matches::assert_matches;
    use polars::prelude::*;

    fn stock_frame() -> DataFrame {
        df![
            "code" => ["D", "A", "C", "B"],
            "quy" => [0.0, 10.0, 30.0, 5.0],
            "quy sale" => [20.0, 50.0, 15.0, 30.0],
            "nds" => [10.0, 10.0, 5.0, 0.0],
            "total sales" => [50.0, 500.0, 150.0, 300.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_run_ranks_and_classifies() {
        let output = InventoryPipeline::default().run(&stock_frame(), 30.0, 30.0).unwrap();

        let codes: Vec<&str> = output
            .records
            .iter()
            .map(|r| r.stock.code.as_deref().unwrap())
            .collect();
        assert_eq!(codes, vec!["A", "B", "C", "D"]);

        let tiers: Vec<Tier> = output.records.iter().map(|r| r.tier).collect();
        assert_eq!(tiers, vec![Tier::A, Tier::A, Tier::B, Tier::C]);
        assert_eq!(output.tier_count(Tier::A), 2);

        let out_of_stock = &output.records[3];
        assert_eq!(out_of_stock.metrics.turnover, Metric::OutOfStock);
        assert_eq!(out_of_stock.stock.row_index, 0);

        // nds = 0 而有銷售：日均視為無限大
        assert_eq!(output.records[1].metrics.daily_sales, Metric::EffectivelyInfinite);
    }

    #[test]
    fn test_invalid_duration_checked_before_rows() {
        let df = df!["unrelated" => [1]].unwrap();
        let err = InventoryPipeline::default().run(&df, 0.0, 30.0).unwrap_err();
        assert_matches!(err, PipelineError::Analytics(AnalyticsError::InvalidDuration { .. }));
    }

    #[test]
    fn test_zero_totals_are_degenerate() {
        let df = df![
            "quy" => [1.0, 2.0],
            "quy sale" => [0.0, 0.0],
            "nds" => [1.0, 1.0],
            "total sales" => [0.0, 0.0],
        ]
        .unwrap();

        let err = InventoryPipeline::default().run(&df, 30.0, 30.0).unwrap_err();
        assert_matches!(err, PipelineError::Analytics(AnalyticsError::DegenerateTotals { .. }));
    }

    #[test]
    fn test_run_metrics_keeps_input_order() {
        let df = df![
            "quy" => [10.0, 100.0],
            "quy sale" => [30.0, 30.0],
            "nds" => [10.0, 10.0],
        ]
        .unwrap();

        let output = InventoryPipeline::default().run_metrics(&df, 30.0, 60.0).unwrap();
        assert_eq!(output.records.len(), 2);
        // 30 / 30 * 60 - 10 = 50
        assert_eq!(output.records[0].1.required_quantity, Some(50.0));
        // 30 / 30 * 60 - 100 < 0
        assert_eq!(output.records[1].1.required_quantity, None);
    }
}
