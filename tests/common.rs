#![allow(dead_code)]

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use sales_analytics::data_ingestion::CsvReader;

/// 兩個品項、三天的交易紀錄；A1 每天遞增 2，B2 持平
pub const SALES_CSV: &str = "\
sales date,code,item name,quy sale
2024-01-01,A1,Apple,2
2024-01-01,A1,Apple,1
2024-01-02,A1,Apple,5
2024-01-03,A1,Apple,7
2024-01-01,B2,Banana,4
2024-01-03,B2,Banana,4
";

/// 表頭使用別名與不同大小寫
pub const ALIASED_SALES_CSV: &str = "\
Sale_Date, CODE ,Name,Quantity Sold
2024-03-01,Z9,Zucchini,3
2024-03-02,Z9,Zucchini,3
";

/// 庫存表：四個品項，總銷售 500 / 300 / 150 / 50
pub const STOCK_CSV: &str = "\
code,item name,quy,quy sale,nds,total sales
D4,Durian,0,20,10,50
A1,Apple,10,50,10,500
C3,Cherry,30,15,5,150
B2,Banana,5,30,0,300
";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn read_csv(data: &str) -> DataFrame {
    CsvReader::default().read_string(data).unwrap()
}

pub fn text_column(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

pub fn float_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}
