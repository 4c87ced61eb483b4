//! 將驗證過的表格轉換為型別化的交易與庫存紀錄

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use crate::data_ingestion::validator::{
    DateNormalizer, ResolvedColumns, SchemaValidator, ValidationError, ValidationResult,
};
use crate::domain_types::{ColumnName, SalesFrameExt, StockRecord, TransactionRow};

/// 交易載入結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedTransactions {
    pub rows: Vec<TransactionRow>,
    /// 輸入總列數
    pub total_rows: usize,
    /// 日期無法解析而捨棄的列數
    pub dropped_dates: usize,
    /// 缺少品項代碼而捨棄的列數
    pub dropped_missing_code: usize,
    /// 數量為空、以 0 計算的列數
    pub null_quantities: usize,
    /// 日期無法解析的樣本 (來源, 列號, 原始值)
    pub rejected_samples: Vec<(Option<String>, usize, String)>,
}

impl LoadedTransactions {
    fn merge(&mut self, other: LoadedTransactions) {
        self.rows.extend(other.rows);
        self.total_rows += other.total_rows;
        self.dropped_dates += other.dropped_dates;
        self.dropped_missing_code += other.dropped_missing_code;
        self.null_quantities += other.null_quantities;
        self.rejected_samples.extend(other.rejected_samples);
    }
}

/// 庫存載入結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedStock {
    pub records: Vec<StockRecord>,
    /// 數值為空、以 0 計算的儲存格數
    pub null_cells: usize,
}

/// 表格載入器
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    schema: SchemaValidator,
    dates: DateNormalizer,
}

impl TableLoader {
    pub fn new(schema: SchemaValidator, dates: DateNormalizer) -> Self {
        Self { schema, dates }
    }

    /// 載入單一表格的交易紀錄
    pub fn load_transactions(
        &self,
        df: &DataFrame,
        sheet_origin: Option<&str>,
    ) -> ValidationResult<LoadedTransactions> {
        let loaded = self.extract_transactions(df, sheet_origin)?;
        Self::ensure_not_empty(&loaded)?;
        Ok(loaded)
    }

    /// 載入多個表格並合併，每個表格以名稱作為來源標籤
    ///
    /// 單一表格全部無效不會中止；合併後仍為空才返回 `EmptyResult`。
    pub fn load_transactions_many(
        &self,
        frames: &[(String, DataFrame)],
    ) -> ValidationResult<LoadedTransactions> {
        let mut combined = LoadedTransactions::default();

        for (origin, df) in frames {
            match self.extract_transactions(df, Some(origin)) {
                Ok(loaded) => combined.merge(loaded),
                Err(ValidationError::EmptyResult { total, dropped }) => {
                    warn!("表格 {} 沒有可用的銷售日期（{} 列）", origin, total);
                    combined.total_rows += total;
                    combined.dropped_dates += dropped;
                }
                Err(err) => return Err(err),
            }
        }

        Self::ensure_not_empty(&combined)?;
        info!(
            "已合併 {} 個表格，共 {} 筆有效交易",
            frames.len(),
            combined.rows.len()
        );
        Ok(combined)
    }

    /// 載入庫存紀錄
    ///
    /// `with_total_sales` 為 false 時不要求總銷售欄位，總銷售以銷售數量代入。
    pub fn load_stock(&self, df: &DataFrame, with_total_sales: bool) -> ValidationResult<LoadedStock> {
        let required: &[&str] = if with_total_sales {
            &ColumnName::CLASSIFICATION_REQUIRED
        } else {
            &ColumnName::INVENTORY_REQUIRED
        };

        let resolved = self.schema.validate(
            df,
            required,
            &[ColumnName::CODE, ColumnName::ITEM_NAME],
            required,
        )?;

        let mut null_cells = 0;
        let mut numeric = |canonical: &str| -> ValidationResult<Vec<f64>> {
            let values = df.numeric_values(resolved.require(canonical)?)?;
            Ok(values
                .into_iter()
                .map(|value| {
                    value.unwrap_or_else(|| {
                        null_cells += 1;
                        0.0
                    })
                })
                .collect())
        };

        let on_hand = numeric(ColumnName::QUANTITY_ON_HAND)?;
        let sold = numeric(ColumnName::QUANTITY_SOLD)?;
        let days = numeric(ColumnName::DAYS_SOLD)?;
        let totals = if with_total_sales {
            numeric(ColumnName::TOTAL_SALES)?
        } else {
            sold.clone()
        };

        let codes = Self::optional_text(df, &resolved, ColumnName::CODE)?;
        let names = Self::optional_text(df, &resolved, ColumnName::ITEM_NAME)?;

        let records = (0..df.height())
            .map(|row| {
                let mut record = StockRecord::new(row, on_hand[row], sold[row], days[row], totals[row]);
                record.code = codes.as_ref().and_then(|c| c[row].clone());
                record.item_name = names.as_ref().and_then(|n| n[row].clone());
                record
            })
            .collect::<Vec<_>>();

        if null_cells > 0 {
            warn!("庫存表格有 {} 個空白數值儲存格，以 0 計算", null_cells);
        }
        debug!("已載入 {} 筆庫存紀錄", records.len());

        Ok(LoadedStock {
            records,
            null_cells,
        })
    }

    fn extract_transactions(
        &self,
        df: &DataFrame,
        sheet_origin: Option<&str>,
    ) -> ValidationResult<LoadedTransactions> {
        let resolved = self.schema.validate(
            df,
            &ColumnName::FORECAST_REQUIRED,
            &[ColumnName::SHEET_ORIGIN],
            &[ColumnName::QUANTITY_SOLD],
        )?;

        let raw_dates = df.text_values(resolved.require(ColumnName::SALES_DATE)?)?;
        let normalized = self.dates.normalize(&raw_dates)?;

        let codes = df.text_values(resolved.require(ColumnName::CODE)?)?;
        let names = df.text_values(resolved.require(ColumnName::ITEM_NAME)?)?;
        let quantities = df.numeric_values(resolved.require(ColumnName::QUANTITY_SOLD)?)?;
        let sheets = Self::optional_text(df, &resolved, ColumnName::SHEET_ORIGIN)?;

        let mut loaded = LoadedTransactions {
            total_rows: normalized.total,
            dropped_dates: normalized.dropped,
            rejected_samples: normalized
                .rejected_samples
                .iter()
                .map(|(row, raw)| (sheet_origin.map(str::to_string), *row, raw.clone()))
                .collect(),
            ..Default::default()
        };

        for (row, date) in normalized.dates.iter().enumerate() {
            let Some(sales_date) = *date else {
                continue;
            };

            let code = match codes[row].as_deref().map(str::trim) {
                Some(code) if !code.is_empty() => code.to_string(),
                _ => {
                    loaded.dropped_missing_code += 1;
                    continue;
                }
            };

            let quantity_sold = quantities[row].unwrap_or_else(|| {
                loaded.null_quantities += 1;
                0.0
            });

            let origin = sheets
                .as_ref()
                .and_then(|s| s[row].clone())
                .or_else(|| sheet_origin.map(str::to_string));

            loaded.rows.push(TransactionRow {
                code,
                item_name: names[row].clone().unwrap_or_default(),
                sales_date,
                quantity_sold,
                sheet_origin: origin,
            });
        }

        Ok(loaded)
    }

    fn optional_text(
        df: &DataFrame,
        resolved: &ResolvedColumns,
        canonical: &str,
    ) -> ValidationResult<Option<Vec<Option<String>>>> {
        match resolved.get(canonical) {
            Some(actual) => Ok(Some(df.text_values(actual)?)),
            None => Ok(None),
        }
    }

    fn ensure_not_empty(loaded: &LoadedTransactions) -> ValidationResult<()> {
        if loaded.rows.is_empty() {
            return Err(ValidationError::EmptyResult {
                total: loaded.total_rows,
                dropped: loaded.total_rows,
            });
        }
        Ok(())
    }
}
