// time_utils.rs
//
// 提供日期相關的工具函數，用於在輸入表格的文字欄位與分析核心之間轉換。
// 主要功能：
// 1. 日曆日期與整數序數（趨勢回歸的自變數）的互相轉換
// 2. 依指定格式或自動推斷格式解析銷售日期

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// 推斷模式下依序嘗試的日期格式（ISO 優先）
pub const INFER_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%b %d, %Y",
];

/// 推斷模式下依序嘗試的日期時間格式，解析後只取日期部分
const INFER_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// 日期解析錯誤
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("空白的日期值")]
    Empty,

    #[error("無法以格式 '{format}' 解析日期 '{value}'")]
    FormatMismatch { value: String, format: String },

    #[error("無法推斷日期 '{0}' 的格式")]
    Unrecognized(String),
}

//
// 序數轉換函數
//

/// 將日期轉換為序數（公元 0001-01-01 為 1）
pub fn date_to_ordinal(date: &NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// 將序數轉換回日期，超出範圍時返回 None
pub fn ordinal_to_date(ordinal: i64) -> Option<NaiveDate> {
    i32::try_from(ordinal)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

//
// 日期解析函數
//

/// 解析銷售日期
///
/// `format` 為 `Some` 時只接受該格式；為 `None` 時依序嘗試 [`INFER_FORMATS`]、
/// 常見的日期時間格式與 RFC 3339。
pub fn parse_date(value: &str, format: Option<&str>) -> Result<NaiveDate, DateParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Some(fmt) = format {
        return parse_with_format(value, fmt).ok_or_else(|| DateParseError::FormatMismatch {
            value: value.to_string(),
            format: fmt.to_string(),
        });
    }

    INFER_FORMATS
        .iter()
        .chain(INFER_DATETIME_FORMATS.iter())
        .find_map(|fmt| parse_with_format(value, fmt))
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .ok_or_else(|| DateParseError::Unrecognized(value.to_string()))
}

/// 先嘗試純日期，再嘗試帶時間的格式
fn parse_with_format(value: &str, fmt: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, fmt)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, fmt)
                .ok()
                .map(|dt| dt.date())
        })
}
