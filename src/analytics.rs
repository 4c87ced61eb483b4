//! 銷售分析核心
//!
//! 彙總交易、擬合趨勢、計算庫存指標與 ABC 分級。此層不做任何 I/O，
//! 輸入皆為已驗證的型別化紀錄。

pub mod abc_classifier;
pub mod aggregator;
pub mod error;
pub mod forecaster;
pub mod inventory_metrics;

pub use abc_classifier::{AbcClassifier, TierAssignment, DEFAULT_TIER_A_MAX, DEFAULT_TIER_B_MAX};
pub use aggregator::{Aggregation, ItemAggregate, ItemAggregator};
pub use error::{AnalyticsError, AnalyticsResult};
pub use forecaster::{ForecastOutcome, LinearTrend, TrendForecaster};
pub use inventory_metrics::InventoryMetricsEngine;
