use thiserror::Error;

/// 表格驗證錯誤
///
/// 結構性錯誤，發生時整次執行中止並原樣回報給呼叫端。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("缺少必要欄位: {column}")]
    MissingColumn { column: String },

    #[error("欄位 {column} 第 {row} 列的值 '{value}' 無法轉換為數值")]
    UncoercibleColumn {
        column: String,
        row: usize,
        value: String,
    },

    #[error("正規化後沒有任何有效資料（共 {total} 列，捨棄 {dropped} 列）")]
    EmptyResult { total: usize, dropped: usize },

    #[error("表格讀取錯誤: {0}")]
    Table(String),
}

impl ValidationError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

impl From<polars::error::PolarsError> for ValidationError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::Table(err.to_string())
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
