//! 銷售速度預測管線
//!
//! 驗證 → 日期正規化 → 依品項彙總 → 逐品項趨勢擬合。單一品項擬合失敗或沒有每日序列時，
//! 該品項不列入輸出，只記錄在診斷清單中，不影響其他品項。

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::{info, warn};

use super::error::PipelineResult;
use super::report::{DiagnosticKind, PipelineReport};
use crate::analytics::{ItemAggregator, TrendForecaster};
use crate::config::ApplicationConfig;
use crate::data_ingestion::validator::{DateNormalizer, SchemaValidator};
use crate::data_ingestion::{LoadedTransactions, TableLoader};
use crate::domain_types::{ItemSummary, TransactionRow};

/// 預測結果
#[derive(Debug, Clone)]
pub struct ForecastOutput {
    pub target_date: NaiveDate,
    /// 成功預測的品項，依代碼遞增排序
    pub items: Vec<ItemSummary>,
    pub report: PipelineReport,
}

impl ForecastOutput {
    /// 有預測值的品項數
    pub fn forecasted(&self) -> usize {
        self.items.iter().filter(|i| i.forecast.is_some()).count()
    }
}

/// 預測管線
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    loader: TableLoader,
    forecaster: TrendForecaster,
}

impl ForecastPipeline {
    pub fn new(loader: TableLoader, forecaster: TrendForecaster) -> Self {
        Self { loader, forecaster }
    }

    /// 依應用程式設定建立（日期模式、欄位別名、平行化）
    pub fn from_config(config: &ApplicationConfig) -> Self {
        let loader = TableLoader::new(
            SchemaValidator::new(config.columns.aliases()),
            DateNormalizer::new(config.pipeline.date_parsing.clone()),
        );
        let forecaster = TrendForecaster::new().with_parallel(config.pipeline.parallel);
        Self::new(loader, forecaster)
    }

    /// 對單一表格執行預測
    pub fn run(&self, df: &DataFrame, target: NaiveDate) -> PipelineResult<ForecastOutput> {
        let loaded = self.loader.load_transactions(df, None)?;
        Ok(self.finish(loaded, target))
    }

    /// 合併多個表格後執行預測，每個表格的名稱作為來源標籤
    pub fn run_many(
        &self,
        frames: &[(String, DataFrame)],
        target: NaiveDate,
    ) -> PipelineResult<ForecastOutput> {
        let loaded = self.loader.load_transactions_many(frames)?;
        Ok(self.finish(loaded, target))
    }

    /// 直接以型別化交易紀錄執行預測
    pub fn run_rows(&self, rows: &[TransactionRow], target: NaiveDate) -> ForecastOutput {
        let mut report = PipelineReport::new("forecast");
        report.input_records = rows.len();
        let items = self.forecast_rows(rows, target, &mut report);
        Self::complete(report, items, target)
    }

    fn finish(&self, loaded: LoadedTransactions, target: NaiveDate) -> ForecastOutput {
        let mut report = PipelineReport::new("forecast");
        report.input_records = loaded.total_rows;
        record_load_diagnostics(&mut report, &loaded);

        let items = self.forecast_rows(&loaded.rows, target, &mut report);
        Self::complete(report, items, target)
    }

    fn forecast_rows(
        &self,
        rows: &[TransactionRow],
        target: NaiveDate,
        report: &mut PipelineReport,
    ) -> Vec<ItemSummary> {
        let aggregation = ItemAggregator::aggregate(rows);
        for code in &aggregation.empty_series {
            report
                .diagnostics
                .item(DiagnosticKind::EmptySeries, code, "沒有每日銷售資料，略過預測");
        }

        let outcomes = self.forecaster.forecast_all(aggregation.forecastable(), &target);
        let mut outcomes = outcomes.into_iter().peekable();

        let mut items = Vec::with_capacity(aggregation.len());
        for item in aggregation.items {
            let mut summary = item.summary;
            // forecastable() 與 items 同序，只略過空序列
            let Some(outcome) = outcomes.next_if(|o| o.code == summary.code) else {
                continue;
            };
            match outcome.result {
                Ok(value) => {
                    summary.forecast = Some(value);
                    items.push(summary);
                }
                Err(err) => {
                    warn!("{}", err);
                    report.diagnostics.item(
                        DiagnosticKind::ForecastFitFailed,
                        &summary.code,
                        err.to_string(),
                    );
                }
            }
        }
        items
    }

    fn complete(mut report: PipelineReport, items: Vec<ItemSummary>, target: NaiveDate) -> ForecastOutput {
        report.output_records = items.len();
        report.add_statistic("target_date", target.to_string());
        report.add_statistic(
            "forecasted_items",
            items.iter().filter(|i| i.forecast.is_some()).count(),
        );
        let report = report.finish();

        info!(
            "預測完成: {} 個品項，目標日期 {}，{} 則診斷",
            items.len(),
            target,
            report.diagnostics.len()
        );

        ForecastOutput {
            target_date: target,
            items,
            report,
        }
    }
}

fn record_load_diagnostics(report: &mut PipelineReport, loaded: &LoadedTransactions) {
    let samples = loaded
        .rejected_samples
        .iter()
        .map(|(origin, row, raw)| match origin {
            Some(origin) => format!("{}#{}: '{}'", origin, row, raw),
            None => format!("#{}: '{}'", row, raw),
        })
        .collect::<Vec<_>>()
        .join(", ");

    report.diagnostics.warn(
        DiagnosticKind::DroppedDates,
        loaded.dropped_dates,
        format!("{} 列銷售日期無法解析而捨棄 ({})", loaded.dropped_dates, samples),
    );
    report.diagnostics.warn(
        DiagnosticKind::MissingCode,
        loaded.dropped_missing_code,
        format!("{} 列缺少品項代碼而捨棄", loaded.dropped_missing_code),
    );
    report.diagnostics.warn(
        DiagnosticKind::NullValues,
        loaded.null_quantities,
        format!("{} 列銷售數量為空，以 0 計算", loaded.null_quantities),
    );
}
