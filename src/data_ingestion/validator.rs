//! 資料驗證器模組
//!
//! 在進入分析核心之前確認輸入表格可用。
//!
//! # 主要功能
//!
//! - **結構檢查**：依宣告順序確認必要欄位存在，數值欄位可轉換
//! - **日期正規化**：解析銷售日期，捨棄無法解析的列並回報數量
//!
//! # 使用範例
//!
//! ```rust,ignore
//! use sales_analytics::data_ingestion::validator::{DateNormalizer, DateParsing, SchemaValidator};
//! use sales_analytics::domain_types::ColumnName;
//!
//! let resolved = SchemaValidator::default().validate(
//!     &df,
//!     &ColumnName::FORECAST_REQUIRED,
//!     &[],
//!     &[ColumnName::QUANTITY_SOLD],
//! )?;
//! let dates = DateNormalizer::new(DateParsing::explicit_default()).normalize(&raw_dates)?;
//! ```

pub mod date_normalizer;
pub mod error;
pub mod schema_validator;

// 重新導出常用類型
pub use date_normalizer::{DateNormalizer, DateParsing, NormalizedDates, DEFAULT_EXPLICIT_FORMAT};
pub use error::{ValidationError, ValidationResult};
pub use schema_validator::{ColumnAliases, ResolvedColumns, SchemaValidator};
