//! 銷售日期正規化
//!
//! 將銷售日期欄位的文字解析為日曆日期。無法解析的列會被捨棄，捨棄數量回報給呼叫端；
//! 全部捨棄時返回 `EmptyResult`。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{ValidationError, ValidationResult};
use crate::utils::parse_date;

/// 明確格式模式的預設樣式（日-月-兩位數年）
pub const DEFAULT_EXPLICIT_FORMAT: &str = "%d-%m-%y";

/// 保留的無效樣本數上限
const MAX_REJECTED_SAMPLES: usize = 5;

/// 日期解析模式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "format", rename_all = "lowercase")]
pub enum DateParsing {
    /// 依常見格式自動推斷
    Infer,
    /// 只接受指定的 chrono 格式
    Explicit(String),
}

impl Default for DateParsing {
    fn default() -> Self {
        DateParsing::Infer
    }
}

impl DateParsing {
    pub fn explicit_default() -> Self {
        DateParsing::Explicit(DEFAULT_EXPLICIT_FORMAT.to_string())
    }

    fn format(&self) -> Option<&str> {
        match self {
            DateParsing::Infer => None,
            DateParsing::Explicit(fmt) => Some(fmt.as_str()),
        }
    }
}

/// 正規化結果
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDates {
    /// 與輸入同長度；被捨棄的列為 None
    pub dates: Vec<Option<NaiveDate>>,
    pub total: usize,
    pub dropped: usize,
    /// 前幾筆無法解析的 (列號, 原始值)
    pub rejected_samples: Vec<(usize, String)>,
}

impl NormalizedDates {
    pub fn valid(&self) -> usize {
        self.total - self.dropped
    }
}

/// 日期正規化器
#[derive(Debug, Clone, Default)]
pub struct DateNormalizer {
    parsing: DateParsing,
}

impl DateNormalizer {
    pub fn new(parsing: DateParsing) -> Self {
        Self { parsing }
    }

    pub fn parsing(&self) -> &DateParsing {
        &self.parsing
    }

    /// 解析整個日期欄位
    pub fn normalize(&self, values: &[Option<String>]) -> ValidationResult<NormalizedDates> {
        let format = self.parsing.format();
        let mut rejected_samples = Vec::new();
        let mut dropped = 0;

        let dates: Vec<Option<NaiveDate>> = values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                let parsed = value
                    .as_deref()
                    .and_then(|raw| parse_date(raw, format).ok());
                if parsed.is_none() {
                    dropped += 1;
                    if rejected_samples.len() < MAX_REJECTED_SAMPLES {
                        rejected_samples.push((row, value.clone().unwrap_or_default()));
                    }
                }
                parsed
            })
            .collect();

        let total = values.len();
        if dropped == total {
            return Err(ValidationError::EmptyResult { total, dropped });
        }

        if dropped > 0 {
            warn!("{} / {} 筆銷售日期無法解析，已捨棄", dropped, total);
        } else {
            debug!("{} 筆銷售日期解析完成", total);
        }

        Ok(NormalizedDates {
            dates,
            total,
            dropped,
            rejected_samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[Option<&str>]) -> Vec<Option<String>> {
        raw.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_infer_mode_drops_unparseable_rows() {
        let normalizer = DateNormalizer::default();
        let result = normalizer
            .normalize(&values(&[Some("2024-01-01"), Some("bogus"), None, Some("2024/01/03")]))
            .unwrap();

        assert_eq!(result.total, 4);
        assert_eq!(result.dropped, 2);
        assert_eq!(result.valid(), 2);
        assert_eq!(result.dates[0], NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(result.dates[1], None);
        assert_eq!(result.rejected_samples[0], (1, "bogus".to_string()));
    }

    #[test]
    fn test_explicit_mode_is_strict() {
        let normalizer = DateNormalizer::new(DateParsing::explicit_default());
        let result = normalizer
            .normalize(&values(&[Some("31-12-23"), Some("2023-12-31")]))
            .unwrap();

        assert_eq!(result.dates[0], NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(result.dates[1], None);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_all_rows_dropped_is_empty_result() {
        let normalizer = DateNormalizer::default();
        let err = normalizer
            .normalize(&values(&[Some("x"), Some("y")]))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyResult { total: 2, dropped: 2 });
    }

    #[test]
    fn test_empty_input_is_empty_result() {
        let err = DateNormalizer::default().normalize(&[]).unwrap_err();
        assert_eq!(err, ValidationError::EmptyResult { total: 0, dropped: 0 });
    }

    #[test]
    fn test_date_parsing_serde_shape() {
        let explicit: DateParsing =
            serde_json::from_str(r#"{"mode":"explicit","format":"%d-%m-%y"}"#).unwrap();
        assert_eq!(explicit, DateParsing::explicit_default());

        let infer: DateParsing = serde_json::from_str(r#"{"mode":"infer"}"#).unwrap();
        assert_eq!(infer, DateParsing::Infer);
    }
}
