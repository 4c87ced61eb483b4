//! 依品項代碼彙總交易

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain_types::{ItemSeries, ItemSummary, TransactionRow};

/// 單一品項的彙總結果
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAggregate {
    /// 摘要；`forecast` 在此階段尚未填入
    pub summary: ItemSummary,
    pub series: ItemSeries,
}

/// 彙總結果，依品項代碼遞增排序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub items: Vec<ItemAggregate>,
    /// 每日序列為空、無法進行預測的品項代碼
    pub empty_series: Vec<String>,
}

impl Aggregation {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 可進行預測的序列
    pub fn forecastable(&self) -> impl Iterator<Item = &ItemSeries> {
        self.items
            .iter()
            .map(|item| &item.series)
            .filter(|series| !series.is_empty())
    }
}

#[derive(Debug)]
struct Group<'a> {
    item_name: &'a str,
    total_sales: f64,
    daily: BTreeMap<NaiveDate, f64>,
}

/// 品項彙總器
pub struct ItemAggregator;

impl ItemAggregator {
    /// 依代碼分組，計算銷售天數、總銷售量與每日銷售序列
    pub fn aggregate(rows: &[TransactionRow]) -> Aggregation {
        let mut groups: BTreeMap<&str, Group<'_>> = BTreeMap::new();

        for row in rows {
            let group = groups.entry(row.code.as_str()).or_insert_with(|| Group {
                item_name: row.item_name.as_str(),
                total_sales: 0.0,
                daily: BTreeMap::new(),
            });
            group.total_sales += row.quantity_sold;
            *group.daily.entry(row.sales_date).or_insert(0.0) += row.quantity_sold;
        }

        let mut aggregation = Aggregation::default();
        for (code, group) in groups {
            let series = ItemSeries::from_unsorted(code, group.daily.into_iter().collect());
            if series.is_empty() {
                warn!("品項 {} 沒有每日銷售資料，略過預測", code);
                aggregation.empty_series.push(code.to_string());
            }

            aggregation.items.push(ItemAggregate {
                summary: ItemSummary {
                    code: code.to_string(),
                    item_name: group.item_name.to_string(),
                    days_of_sales: series.len(),
                    total_sales: group.total_sales,
                    forecast: None,
                },
                series,
            });
        }

        debug!("{} 筆交易彙總為 {} 個品項", rows.len(), aggregation.len());
        aggregation
    }
}
