//! 表格結構驗證器
//!
//! 依宣告順序檢查必要欄位是否存在，並確認數值欄位可轉換為浮點數。
//! 欄位比對不分大小寫、忽略前後空白，底線等同空格，另可透過別名對應。

use std::collections::HashMap;

use polars::prelude::DataFrame;
use tracing::debug;

use super::error::{ValidationError, ValidationResult};
use crate::domain_types::{normalize_column_name, ColumnName, SalesFrameExt};

/// 欄位別名表：標準名稱 → 可接受的其他表頭
#[derive(Debug, Clone, Default)]
pub struct ColumnAliases {
    aliases: HashMap<String, Vec<String>>,
}

impl ColumnAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// 內建別名，涵蓋兩種試算表的欄位拼寫
    pub fn builtin() -> Self {
        Self::new()
            .with_alias(ColumnName::SALES_DATE, "date")
            .with_alias(ColumnName::SALES_DATE, "sale date")
            .with_alias(ColumnName::ITEM_NAME, "name")
            .with_alias(ColumnName::ITEM_NAME, "item")
            .with_alias(ColumnName::QUANTITY_SOLD, "quy sales")
            .with_alias(ColumnName::QUANTITY_SOLD, "quantity sold")
            .with_alias(ColumnName::QUANTITY_SOLD, "sales quantity")
            .with_alias(ColumnName::QUANTITY_ON_HAND, "quantity on hand")
            .with_alias(ColumnName::DAYS_SOLD, "number of days sold")
    }

    /// 從設定檔的對應表建立
    pub fn from_map(map: &HashMap<String, Vec<String>>) -> Self {
        map.iter().fold(Self::builtin(), |acc, (canonical, aliases)| {
            aliases
                .iter()
                .fold(acc, |acc, alias| acc.with_alias(canonical, alias))
        })
    }

    pub fn with_alias(mut self, canonical: &str, alias: &str) -> Self {
        let entry = self
            .aliases
            .entry(normalize_column_name(canonical))
            .or_default();
        let alias = normalize_column_name(alias);
        if !entry.contains(&alias) {
            entry.push(alias);
        }
        self
    }

    /// 標準名稱本身加上所有別名（皆已正規化）
    fn candidates(&self, canonical: &str) -> Vec<String> {
        let canonical = normalize_column_name(canonical);
        let mut names = vec![canonical.clone()];
        if let Some(extra) = self.aliases.get(&canonical) {
            names.extend(extra.iter().cloned());
        }
        names
    }
}

/// 標準欄位名稱對應到實際表頭的結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    columns: HashMap<String, String>,
}

impl ResolvedColumns {
    /// 取得標準欄位對應的實際表頭
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.columns.get(canonical).map(String::as_str)
    }

    /// 取得必要欄位，未解析時返回 `MissingColumn`
    pub fn require(&self, canonical: &str) -> ValidationResult<&str> {
        self.get(canonical)
            .ok_or_else(|| ValidationError::missing_column(canonical))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// 表格結構驗證器
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    aliases: ColumnAliases,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(ColumnAliases::builtin())
    }
}

impl SchemaValidator {
    pub fn new(aliases: ColumnAliases) -> Self {
        Self { aliases }
    }

    /// 只依表頭解析欄位，遇到第一個缺少的必要欄位即失敗
    ///
    /// `optional` 中的欄位找得到就解析，找不到則略過。
    pub fn resolve_headers(
        &self,
        headers: &[(String, String)],
        required: &[&str],
        optional: &[&str],
    ) -> ValidationResult<ResolvedColumns> {
        let mut resolved = ResolvedColumns::default();

        for &canonical in required {
            let actual = self
                .find_header(headers, canonical)
                .ok_or_else(|| ValidationError::missing_column(canonical))?;
            resolved.columns.insert(canonical.to_string(), actual);
        }

        for &canonical in optional {
            if let Some(actual) = self.find_header(headers, canonical) {
                resolved.columns.insert(canonical.to_string(), actual);
            }
        }

        Ok(resolved)
    }

    /// 驗證表格：必要欄位存在，且 `numeric` 列出的欄位皆可轉換為數值
    pub fn validate(
        &self,
        df: &DataFrame,
        required: &[&str],
        optional: &[&str],
        numeric: &[&str],
    ) -> ValidationResult<ResolvedColumns> {
        let resolved = self.resolve_headers(&df.header_pairs(), required, optional)?;

        for &canonical in numeric {
            let Some(actual) = resolved.get(canonical) else {
                continue;
            };
            if let Some((row, value)) = df.first_uncoercible(actual)? {
                return Err(ValidationError::UncoercibleColumn {
                    column: canonical.to_string(),
                    row,
                    value,
                });
            }
        }

        debug!(
            "表格結構驗證通過: {} 列, {} 個欄位已解析",
            df.height(),
            resolved.len()
        );
        Ok(resolved)
    }

    fn find_header(&self, headers: &[(String, String)], canonical: &str) -> Option<String> {
        // 先比對標準名稱，再依序比對別名
        self.aliases.candidates(canonical).iter().find_map(|candidate| {
            headers
                .iter()
                .find(|(_, normalized)| normalized == candidate)
                .map(|(actual, _)| actual.clone())
        })
    }
}
