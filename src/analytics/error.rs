use thiserror::Error;

/// 分析核心錯誤
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// 單一品項擬合失敗，只影響該品項
    #[error("品項 {code} 趨勢擬合失敗: {reason}")]
    ForecastFit { code: String, reason: String },

    #[error("無效的期間設定: {name} = {value}，必須為正數")]
    InvalidDuration { name: String, value: f64 },

    #[error("總銷售量為 {grand_total}，無法計算銷售百分比")]
    DegenerateTotals { grand_total: f64 },

    #[error("無效的分級門檻: A ≤ {a_max}, B ≤ {b_max}")]
    InvalidThresholds { a_max: f64, b_max: f64 },
}

impl AnalyticsError {
    pub fn forecast_fit(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ForecastFit {
            code: code.into(),
            reason: reason.into(),
        }
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
