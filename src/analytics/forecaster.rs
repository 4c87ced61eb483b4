//! 線性趨勢預測
//!
//! 以日期序數為唯一自變數、每日銷售量為應變數做最小平方法擬合，並預測目標日期的銷售量。
//! 單點序列的斜率固定為 0，直接以該點數值作為預測。

use chrono::NaiveDate;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use tracing::{debug, warn};

use super::error::{AnalyticsError, AnalyticsResult};
use crate::domain_types::ItemSeries;
use crate::utils::date_to_ordinal;

/// 擬合後的直線，以平均點為錨點：y = y_mean + slope * (x - x_mean)
///
/// x 以序列第一天為原點，避免大序數造成的精度損失。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub origin: i64,
    pub slope: f64,
    pub x_mean: f64,
    pub y_mean: f64,
}

impl LinearTrend {
    /// 擬合單一品項的每日序列
    pub fn fit(series: &ItemSeries) -> AnalyticsResult<Self> {
        let first = series
            .first_date()
            .ok_or_else(|| AnalyticsError::forecast_fit(&series.code, "序列沒有任何資料點"))?;
        let origin = date_to_ordinal(&first);

        let (xs, ys): (Vec<f64>, Vec<f64>) = series
            .points()
            .iter()
            .map(|(date, quantity)| ((date_to_ordinal(date) - origin) as f64, *quantity))
            .unzip();

        if ys.iter().any(|y| !y.is_finite()) {
            return Err(AnalyticsError::forecast_fit(&series.code, "銷售量含有非有限值"));
        }

        if xs.len() == 1 {
            return Ok(Self {
                origin,
                slope: 0.0,
                x_mean: xs[0],
                y_mean: ys[0],
            });
        }

        let x_mean = xs.iter().mean();
        let y_mean = ys.iter().mean();
        let x_variance = xs.iter().variance();
        if x_variance == 0.0 || !x_variance.is_finite() {
            return Err(AnalyticsError::forecast_fit(
                &series.code,
                "日期沒有變異，無法求解斜率",
            ));
        }

        let slope = xs.iter().covariance(ys.iter()) / x_variance;
        if !slope.is_finite() || !y_mean.is_finite() {
            return Err(AnalyticsError::forecast_fit(&series.code, "斜率數值溢位"));
        }

        Ok(Self {
            origin,
            slope,
            x_mean,
            y_mean,
        })
    }

    /// 預測指定日期的值（未截斷）
    pub fn predict(&self, date: &NaiveDate) -> f64 {
        let x = (date_to_ordinal(date) - self.origin) as f64;
        self.y_mean + self.slope * (x - self.x_mean)
    }
}

/// 單一品項的預測結果
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    pub code: String,
    pub result: AnalyticsResult<f64>,
}

/// 趨勢預測器
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendForecaster {
    parallel: bool,
}

impl TrendForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否以 rayon 平行擬合各品項
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 預測單一品項，負值截為 0
    pub fn forecast(&self, series: &ItemSeries, target: &NaiveDate) -> AnalyticsResult<f64> {
        let trend = LinearTrend::fit(series)?;
        let predicted = trend.predict(target);
        if !predicted.is_finite() {
            return Err(AnalyticsError::forecast_fit(&series.code, "預測值數值溢位"));
        }
        Ok(predicted.max(0.0))
    }

    /// 預測所有品項；各品項互不影響，結果順序與輸入相同
    pub fn forecast_all<'a, I>(&self, series: I, target: &NaiveDate) -> Vec<ForecastOutcome>
    where
        I: IntoIterator<Item = &'a ItemSeries>,
    {
        let series: Vec<&ItemSeries> = series.into_iter().collect();

        let run = |s: &&ItemSeries| ForecastOutcome {
            code: s.code.clone(),
            result: self.forecast(s, target),
        };

        let outcomes: Vec<ForecastOutcome> = if self.parallel {
            series.par_iter().map(run).collect()
        } else {
            series.iter().map(run).collect()
        };

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            warn!("{} / {} 個品項趨勢擬合失敗", failed, outcomes.len());
        }
        debug!("已預測 {} 個品項至 {}", outcomes.len(), target);

        outcomes
    }
}
