//! 基於 Polars 的銷售表格擴充

use polars::prelude::*;

use super::types::normalize_column_name;

/// 銷售表格 trait，提供以文字或數值形式讀取欄位的功能
pub trait SalesFrameExt {
    /// 獲取正規化前後的欄位名稱對
    fn header_pairs(&self) -> Vec<(String, String)>;

    /// 以文字讀取欄位，空值為 None
    fn text_values(&self, column: &str) -> PolarsResult<Vec<Option<String>>>;

    /// 以浮點數讀取欄位，空值或無法轉換者為 None
    fn numeric_values(&self, column: &str) -> PolarsResult<Vec<Option<f64>>>;

    /// 找出第一個非空但無法轉換為數值的儲存格
    fn first_uncoercible(&self, column: &str) -> PolarsResult<Option<(usize, String)>>;
}

impl SalesFrameExt for DataFrame {
    fn header_pairs(&self) -> Vec<(String, String)> {
        self.get_column_names()
            .iter()
            .map(|name| {
                let name = name.to_string();
                let normalized = normalize_column_name(&name);
                (name, normalized)
            })
            .collect()
    }

    fn text_values(&self, column: &str) -> PolarsResult<Vec<Option<String>>> {
        let series = self
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::String)?;

        Ok(series
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect())
    }

    fn numeric_values(&self, column: &str) -> PolarsResult<Vec<Option<f64>>> {
        let series = self
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;

        Ok(series.f64()?.into_iter().collect())
    }

    fn first_uncoercible(&self, column: &str) -> PolarsResult<Option<(usize, String)>> {
        let raw = self.text_values(column)?;
        let numeric = self.numeric_values(column)?;

        Ok(raw
            .into_iter()
            .zip(numeric)
            .enumerate()
            .find_map(|(row, (raw, value))| match (raw, value) {
                (Some(raw), None) if !raw.trim().is_empty() => Some((row, raw)),
                _ => None,
            }))
    }
}
