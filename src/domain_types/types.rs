//! 基本銷售數據類型定義

use serde::{Deserialize, Serialize};
use std::fmt;

/// 標準欄位名稱
///
/// 與原始試算表的表頭一致；實際表頭經 [`normalize_column_name`] 正規化後比對，
/// 別名由設定檔提供。
pub struct ColumnName;

impl ColumnName {
    pub const SALES_DATE: &'static str = "sales date";
    pub const CODE: &'static str = "code";
    pub const ITEM_NAME: &'static str = "item name";
    /// 銷售數量（預測模式下為每筆交易的售出數量）
    pub const QUANTITY_SOLD: &'static str = "quy sale";
    /// 庫存現量
    pub const QUANTITY_ON_HAND: &'static str = "quy";
    /// 有銷售的天數
    pub const DAYS_SOLD: &'static str = "nds";
    pub const TOTAL_SALES: &'static str = "total sales";
    pub const SHEET_ORIGIN: &'static str = "sheet";

    // 輸出欄位
    pub const DAYS_OF_SALES: &'static str = "days_of_sales";
    pub const FORECAST: &'static str = "forecast";
    pub const TURNOVER: &'static str = "Turnover";
    pub const DAILY_SALES: &'static str = "Daily Sales";
    pub const DAYS_OF_INVENTORY: &'static str = "Days of Inventory";
    pub const REQUIRED_QUANTITY: &'static str = "Required Quantity";
    pub const SALE_PERCENT: &'static str = "total sale percent";
    pub const CUMULATIVE_PERCENT: &'static str = "total cum percent";
    pub const TIER: &'static str = "abc";

    /// 所有輸入欄位，設定檔中的別名只能對應到這些名稱
    pub const INPUTS: [&'static str; 8] = [
        Self::SALES_DATE,
        Self::CODE,
        Self::ITEM_NAME,
        Self::QUANTITY_SOLD,
        Self::QUANTITY_ON_HAND,
        Self::DAYS_SOLD,
        Self::TOTAL_SALES,
        Self::SHEET_ORIGIN,
    ];

    /// 預測模式必要欄位（依宣告順序檢查）
    pub const FORECAST_REQUIRED: [&'static str; 4] = [
        Self::SALES_DATE,
        Self::CODE,
        Self::ITEM_NAME,
        Self::QUANTITY_SOLD,
    ];

    /// 庫存指標必要欄位
    pub const INVENTORY_REQUIRED: [&'static str; 3] = [
        Self::QUANTITY_ON_HAND,
        Self::QUANTITY_SOLD,
        Self::DAYS_SOLD,
    ];

    /// ABC 分類必要欄位（庫存指標欄位加上總銷售）
    pub const CLASSIFICATION_REQUIRED: [&'static str; 4] = [
        Self::QUANTITY_ON_HAND,
        Self::QUANTITY_SOLD,
        Self::DAYS_SOLD,
        Self::TOTAL_SALES,
    ];
}

/// 正規化欄位名稱：去除前後空白、轉小寫，底線與連續空白視為單一空格
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// ABC 分級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    /// 依累計百分比判定分級，邊界值歸入較高的分級
    pub fn from_cumulative_percent(cumulative: f64, a_max: f64, b_max: f64) -> Self {
        if cumulative <= a_max {
            Tier::A
        } else if cumulative <= b_max {
            Tier::B
        } else {
            Tier::C
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
