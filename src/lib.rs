// 模組定義
pub mod analytics;
pub mod config;
pub mod data_ingestion;
pub mod domain_types;
pub mod pipeline;
pub mod utils;
