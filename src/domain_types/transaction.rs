use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 單筆銷售交易
///
/// `sales_date` 一定是已解析的日期；無法解析的列不會成為 `TransactionRow`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub code: String,
    pub item_name: String,
    pub sales_date: NaiveDate,
    pub quantity_sold: f64,
    /// 來源工作表或檔案標籤
    pub sheet_origin: Option<String>,
}

impl TransactionRow {
    pub fn new(
        code: impl Into<String>,
        item_name: impl Into<String>,
        sales_date: NaiveDate,
        quantity_sold: f64,
    ) -> Self {
        Self {
            code: code.into(),
            item_name: item_name.into(),
            sales_date,
            quantity_sold,
            sheet_origin: None,
        }
    }
}
