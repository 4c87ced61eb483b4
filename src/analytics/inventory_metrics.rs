//! 庫存指標計算
//!
//! 每列獨立計算周轉率、日均銷售、庫存天數與需補貨數量。

use rayon::prelude::*;
use tracing::debug;

use super::error::{AnalyticsError, AnalyticsResult};
use crate::domain_types::{InventoryMetrics, Metric, StockRecord};
use crate::utils::{round_half_even, round_to_i64_days};

/// 日均銷售為 0 或庫存天數為 0 時使用的可忽略天數
pub const NEGLIGIBLE_DAYS: f64 = 0.1;

/// 庫存指標引擎
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryMetricsEngine {
    sales_duration: f64,
    storage_duration: f64,
}

impl InventoryMetricsEngine {
    /// 建立引擎；兩個期間都必須為有限正數
    pub fn new(sales_duration: f64, storage_duration: f64) -> AnalyticsResult<Self> {
        Self::check_duration("sales_duration", sales_duration)?;
        Self::check_duration("storage_duration", storage_duration)?;
        Ok(Self {
            sales_duration,
            storage_duration,
        })
    }

    fn check_duration(name: &str, value: f64) -> AnalyticsResult<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AnalyticsError::InvalidDuration {
                name: name.to_string(),
                value,
            });
        }
        Ok(())
    }

    pub fn sales_duration(&self) -> f64 {
        self.sales_duration
    }

    pub fn storage_duration(&self) -> f64 {
        self.storage_duration
    }

    /// 計算單列指標
    pub fn compute(&self, record: &StockRecord) -> InventoryMetrics {
        let daily_sales = Self::daily_sales(record);
        InventoryMetrics {
            turnover: Self::turnover(record),
            days_of_inventory: Self::days_of_inventory(record.quantity_on_hand, &daily_sales),
            daily_sales,
            required_quantity: self.required_quantity(record),
        }
    }

    /// 計算所有列，輸出順序與輸入相同
    pub fn compute_all(&self, records: &[StockRecord], parallel: bool) -> Vec<InventoryMetrics> {
        let metrics: Vec<InventoryMetrics> = if parallel {
            records.par_iter().map(|r| self.compute(r)).collect()
        } else {
            records.iter().map(|r| self.compute(r)).collect()
        };
        debug!("已計算 {} 筆庫存指標", metrics.len());
        metrics
    }

    /// 周轉率 = 銷售數量 / 庫存現量；庫存為 0 時為缺貨
    pub fn turnover(record: &StockRecord) -> Metric {
        if record.quantity_on_hand == 0.0 {
            return Metric::OutOfStock;
        }
        Metric::Numeric(round_half_even(
            record.sales_quantity / record.quantity_on_hand,
            1,
        ))
    }

    /// 日均銷售 = 銷售數量 / 銷售天數；沒有銷售時為 0
    pub fn daily_sales(record: &StockRecord) -> Metric {
        if record.sales_quantity == 0.0 {
            return Metric::Numeric(0.0);
        }
        let rate = record.sales_quantity / record.number_of_days_sold;
        if !rate.is_finite() {
            return Metric::EffectivelyInfinite;
        }
        Metric::Numeric(round_half_even(rate, 1))
    }

    /// 庫存天數 = 庫存現量 / 日均銷售，截斷為整數天
    pub fn days_of_inventory(quantity_on_hand: f64, daily_sales: &Metric) -> Metric {
        let rate = match daily_sales {
            Metric::Numeric(rate) if *rate == 0.0 => return Metric::Numeric(NEGLIGIBLE_DAYS),
            Metric::Numeric(rate) => *rate,
            // 日均無限大時庫存天數趨近 0
            Metric::EffectivelyInfinite => return Metric::Numeric(NEGLIGIBLE_DAYS),
            Metric::OutOfStock => return Metric::Numeric(NEGLIGIBLE_DAYS),
        };

        match round_to_i64_days(quantity_on_hand / rate) {
            None => Metric::EffectivelyInfinite,
            Some(0) => Metric::Numeric(NEGLIGIBLE_DAYS),
            Some(days) => Metric::Numeric(days as f64),
        }
    }

    /// 需補貨數量 = (銷售數量 / 銷售期間) * 儲存期間 - 庫存現量；不需補貨時為 None
    pub fn required_quantity(&self, record: &StockRecord) -> Option<f64> {
        let needed = record.sales_quantity / self.sales_duration * self.storage_duration
            - record.quantity_on_hand;
        (needed > 0.0).then_some(needed)
    }
}
