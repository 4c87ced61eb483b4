use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analytics::{DEFAULT_TIER_A_MAX, DEFAULT_TIER_B_MAX};
use crate::config::validation::{ConfigValidationError, ValidationUtils, Validator};
use crate::data_ingestion::validator::{ColumnAliases, DateParsing};
use crate::domain_types::{normalize_column_name, ColumnName};

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        // 驗證各個部分的配置
        self.log.validate()?;
        self.pipeline.validate()?;
        self.columns.validate()?;

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase().as_str(),
            &["trace", "debug", "info", "warn", "error"],
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase().as_str(),
            &["pretty", "json"],
            "log.format",
        )?;

        Ok(())
    }
}

/// 管線配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 銷售日期解析模式
    #[serde(default)]
    pub date_parsing: DateParsing,
    /// 是否以 rayon 平行計算各品項
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// A 級累積百分比上限
    #[serde(default = "default_tier_a_max")]
    pub tier_a_max: f64,
    /// B 級累積百分比上限
    #[serde(default = "default_tier_b_max")]
    pub tier_b_max: f64,
    /// 預設銷售期間（天），命令列未指定時使用
    #[serde(default)]
    pub sales_duration: Option<f64>,
    /// 預設儲存期間（天）
    #[serde(default)]
    pub storage_duration: Option<f64>,
}

fn default_parallel() -> bool {
    true
}

fn default_tier_a_max() -> f64 {
    DEFAULT_TIER_A_MAX
}

fn default_tier_b_max() -> f64 {
    DEFAULT_TIER_B_MAX
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_parsing: DateParsing::default(),
            parallel: default_parallel(),
            tier_a_max: DEFAULT_TIER_A_MAX,
            tier_b_max: DEFAULT_TIER_B_MAX,
            sales_duration: None,
            storage_duration: None,
        }
    }
}

impl Validator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if let DateParsing::Explicit(format) = &self.date_parsing {
            ValidationUtils::not_empty(format, "pipeline.date_parsing.format")?;
        }

        ValidationUtils::positive(self.tier_a_max, "pipeline.tier_a_max")?;
        ValidationUtils::in_range(self.tier_a_max, 0.0, self.tier_b_max, "pipeline.tier_a_max")?;
        ValidationUtils::in_range(self.tier_b_max, self.tier_a_max, 100.0, "pipeline.tier_b_max")?;

        if let Some(days) = self.sales_duration {
            ValidationUtils::positive(days, "pipeline.sales_duration")?;
        }
        if let Some(days) = self.storage_duration {
            ValidationUtils::positive(days, "pipeline.storage_duration")?;
        }
        ValidationUtils::check_dependency(
            self.storage_duration.is_some(),
            self.sales_duration.is_some(),
            "pipeline.storage_duration",
            "pipeline.sales_duration",
        )?;

        Ok(())
    }
}

/// 欄位別名配置：標準欄位名稱 → 其他可接受的表頭
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,
}

impl ColumnsConfig {
    /// 內建別名加上配置的別名
    pub fn aliases(&self) -> ColumnAliases {
        ColumnAliases::from_map(&self.aliases)
    }
}

impl Validator for ColumnsConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        for (canonical, aliases) in &self.aliases {
            ValidationUtils::one_of(
                &normalize_column_name(canonical).as_str(),
                &ColumnName::INPUTS,
                "columns.aliases",
            )?;
            for alias in aliases {
                ValidationUtils::not_empty(alias, &format!("columns.aliases.{}", canonical))?;
            }
        }
        Ok(())
    }
}
