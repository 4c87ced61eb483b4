//! 將結果轉為輸出表格
//!
//! 指標欄位以舊版試算表的字串呈現（"5.0"、"o.s"、"12D"、"0.1D"）；
//! 需補貨數量不適用時為 null。

use polars::prelude::*;

use crate::domain_types::{ClassifiedRecord, ColumnName, InventoryMetrics, ItemSummary, StockRecord};

/// 預測表格：每個品項一列
pub fn forecast_frame(items: &[ItemSummary]) -> PolarsResult<DataFrame> {
    df![
        ColumnName::CODE => items.iter().map(|i| i.code.as_str()).collect::<Vec<_>>(),
        ColumnName::ITEM_NAME => items.iter().map(|i| i.item_name.as_str()).collect::<Vec<_>>(),
        ColumnName::DAYS_OF_SALES => items.iter().map(|i| i.days_of_sales as u64).collect::<Vec<_>>(),
        ColumnName::TOTAL_SALES => items.iter().map(|i| i.total_sales).collect::<Vec<_>>(),
        ColumnName::FORECAST => items.iter().map(|i| i.forecast).collect::<Vec<_>>(),
    ]
}

/// 依排名重排輸入表格，並附加指標與分級欄位
pub fn inventory_frame(source: &DataFrame, records: &[ClassifiedRecord]) -> PolarsResult<DataFrame> {
    let indices = IdxCa::from_vec(
        "idx".into(),
        records.iter().map(|r| r.stock.row_index as IdxSize).collect(),
    );
    let mut frame = source.take(&indices)?;

    append_metric_columns(&mut frame, records.iter().map(|r| &r.metrics))?;
    frame.with_column(Column::new(
        ColumnName::SALE_PERCENT.into(),
        records.iter().map(|r| r.sale_percent).collect::<Vec<_>>(),
    ))?;
    frame.with_column(Column::new(
        ColumnName::CUMULATIVE_PERCENT.into(),
        records.iter().map(|r| r.cumulative_percent).collect::<Vec<_>>(),
    ))?;
    frame.with_column(Column::new(
        ColumnName::TIER.into(),
        records.iter().map(|r| r.tier.as_str()).collect::<Vec<_>>(),
    ))?;
    Ok(frame)
}

/// 在輸入表格後附加指標欄位，列順序不變
pub fn metrics_frame(
    source: &DataFrame,
    records: &[(StockRecord, InventoryMetrics)],
) -> PolarsResult<DataFrame> {
    let mut frame = source.clone();
    append_metric_columns(&mut frame, records.iter().map(|(_, m)| m))?;
    Ok(frame)
}

fn append_metric_columns<'a>(
    frame: &mut DataFrame,
    metrics: impl Iterator<Item = &'a InventoryMetrics>,
) -> PolarsResult<()> {
    let metrics: Vec<&InventoryMetrics> = metrics.collect();

    let text = |f: fn(&InventoryMetrics) -> String| metrics.iter().map(|m| f(m)).collect::<Vec<_>>();

    frame.with_column(Column::new(
        ColumnName::TURNOVER.into(),
        text(|m| m.turnover.display_ratio()),
    ))?;
    frame.with_column(Column::new(
        ColumnName::DAILY_SALES.into(),
        text(|m| m.daily_sales.display_ratio()),
    ))?;
    frame.with_column(Column::new(
        ColumnName::DAYS_OF_INVENTORY.into(),
        text(|m| m.days_of_inventory.display_days()),
    ))?;
    frame.with_column(Column::new(
        ColumnName::REQUIRED_QUANTITY.into(),
        metrics.iter().map(|m| m.required_quantity).collect::<Vec<_>>(),
    ))?;
    Ok(())
}
