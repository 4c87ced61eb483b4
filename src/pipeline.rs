//! 分析管線
//!
//! 串接輸入驗證、分析核心與輸出表格，並收集診斷訊息。

pub mod error;
pub mod forecast;
pub mod inventory;
pub mod output;
pub mod report;

pub use error::{PipelineError, PipelineResult};
pub use forecast::{ForecastOutput, ForecastPipeline};
pub use inventory::{InventoryOutput, InventoryPipeline, MetricsOutput};
pub use output::{forecast_frame, inventory_frame, metrics_frame};
pub use report::{
    Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsSummary, PipelineReport, ReportFormatter,
};
