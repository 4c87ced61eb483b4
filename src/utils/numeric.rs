//! 數值取整工具
//!
//! 百分比與周轉率以銀行家捨入（四捨六入五成雙）取整，與試算表輸出一致。

use rust_decimal::{Decimal, RoundingStrategy};

/// 以半數取偶的方式取到小數點後 `dp` 位，非有限值原樣返回
///
/// 以 f64 實際儲存的二進位值判斷進位，2.675（實為 2.67499…）取兩位為 2.67。
pub fn round_half_even(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // 經由十進位字串轉回，確保得到最接近的 f64
    match Decimal::from_f64_retain(value) {
        Some(decimal) => decimal
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
            .to_string()
            .parse()
            .unwrap_or(value),
        None => value,
    }
}

/// 將天數截斷為整數，非有限值返回 None
pub fn round_to_i64_days(value: f64) -> Option<i64> {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(2.25, 1), 2.2);
        assert_eq!(round_half_even(2.35, 1), 2.4);
        assert_eq!(round_half_even(33.333_333, 2), 33.33);
        assert_eq!(round_half_even(66.666_666, 2), 66.67);
        assert!(round_half_even(f64::INFINITY, 2).is_infinite());
    }

    #[test]
    fn test_round_uses_stored_binary_value() {
        assert_eq!(round_half_even(2.675, 2), 2.67);
        assert_eq!(round_half_even(1.005, 2), 1.0);
        // 0.125 可精確表示，才會落在中點
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(0.375, 2), 0.38);
    }

    #[test]
    fn test_round_to_i64_days() {
        assert_eq!(round_to_i64_days(12.9), Some(12));
        assert_eq!(round_to_i64_days(0.4), Some(0));
        assert_eq!(round_to_i64_days(f64::NAN), None);
        assert_eq!(round_to_i64_days(f64::INFINITY), None);
    }
}
