use serde::{Deserialize, Serialize};

use super::metric::Metric;
use super::types::Tier;

/// 庫存紀錄（外部提供，已與銷售彙總合併）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// 在輸入表格中的列位置，用於穩定排序與輸出重排
    pub row_index: usize,
    pub code: Option<String>,
    pub item_name: Option<String>,
    pub quantity_on_hand: f64,
    pub sales_quantity: f64,
    pub number_of_days_sold: f64,
    pub total_sales: f64,
}

impl StockRecord {
    pub fn new(
        row_index: usize,
        quantity_on_hand: f64,
        sales_quantity: f64,
        number_of_days_sold: f64,
        total_sales: f64,
    ) -> Self {
        Self {
            row_index,
            code: None,
            item_name: None,
            quantity_on_hand,
            sales_quantity,
            number_of_days_sold,
            total_sales,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// 單列的庫存指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryMetrics {
    pub turnover: Metric,
    pub daily_sales: Metric,
    pub days_of_inventory: Metric,
    /// 需補貨數量；None 表示庫存足夠（不適用），與「剛好需要 0」區分
    pub required_quantity: Option<f64>,
}

/// 完成 ABC 分類的紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub stock: StockRecord,
    pub metrics: InventoryMetrics,
    pub sale_percent: f64,
    pub cumulative_percent: f64,
    pub tier: Tier,
}
