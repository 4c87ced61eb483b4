// utils.rs - 公共工具模組
//
// 提供日期換算與數值取整等通用的工具函數，供驗證層與分析層共用。

pub mod numeric;
pub mod time_utils;

// 重新導出常用工具函數，使其可以通過 utils::function_name 直接訪問
pub use numeric::{round_half_even, round_to_i64_days};
pub use time_utils::{date_to_ordinal, ordinal_to_date, parse_date, DateParseError, INFER_FORMATS};
