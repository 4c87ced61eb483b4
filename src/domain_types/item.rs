use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 單一品項的每日銷售序列，依日期遞增排序，同日數量已加總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSeries {
    pub code: String,
    points: Vec<(NaiveDate, f64)>,
}

impl ItemSeries {
    /// 由任意順序的 (日期, 數量) 建立序列，同日數量加總
    pub fn from_unsorted(code: impl Into<String>, mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(date, _)| *date);

        let mut merged: Vec<(NaiveDate, f64)> = Vec::with_capacity(points.len());
        for (date, quantity) in points {
            match merged.last_mut() {
                Some((last_date, total)) if *last_date == date => *total += quantity,
                _ => merged.push((date, quantity)),
            }
        }

        Self {
            code: code.into(),
            points: merged,
        }
    }

    /// 獲取數據點數量
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(date, _)| *date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(date, _)| *date)
    }
}

/// 品項摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub code: String,
    pub item_name: String,
    /// 有銷售的不同日期數
    pub days_of_sales: usize,
    pub total_sales: f64,
    /// 目標日期的預測銷量；None 表示沒有成功的趨勢擬合
    pub forecast: Option<f64>,
}
