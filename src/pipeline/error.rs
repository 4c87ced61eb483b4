use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::data_ingestion::processor::csv_io::CsvError;
use crate::data_ingestion::validator::ValidationError;

/// 管線錯誤類型
///
/// 結構性錯誤會中止整次執行；單一品項的擬合失敗不會出現在這裡，而是記錄在診斷清單中。
#[derive(Error, Debug)]
pub enum PipelineError {
    /// 輸入表格驗證錯誤
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// 分析計算錯誤
    #[error("{0}")]
    Analytics(#[from] AnalyticsError),

    /// CSV 讀取錯誤
    #[error("{0}")]
    Csv(#[from] CsvError),

    /// 表格處理錯誤
    #[error("表格處理錯誤: {0}")]
    Table(#[from] polars::error::PolarsError),
}

/// 管線結果類型別名
pub type PipelineResult<T> = Result<T, PipelineError>;
