use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 診斷類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// 銷售日期無法解析而捨棄的列
    DroppedDates,
    /// 缺少品項代碼而捨棄的列
    MissingCode,
    /// 數值為空、以 0 計算
    NullValues,
    /// 每日序列為空的品項
    EmptySeries,
    /// 趨勢擬合失敗的品項
    ForecastFitFailed,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::DroppedDates => "DroppedDates",
            DiagnosticKind::MissingCode => "MissingCode",
            DiagnosticKind::NullValues => "NullValues",
            DiagnosticKind::EmptySeries => "EmptySeries",
            DiagnosticKind::ForecastFitFailed => "ForecastFitFailed",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 單一診斷訊息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 相關的品項代碼（針對單一品項時）
    pub code: Option<String>,
    /// 受影響的列數或品項數
    pub count: usize,
    pub message: String,
}

/// 診斷清單，與結果一同返回，取代直接顯示的警告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記錄影響多列的警告；數量為 0 時忽略
    pub fn warn(&mut self, kind: DiagnosticKind, count: usize, message: impl Into<String>) {
        if count == 0 {
            return;
        }
        self.entries.push(Diagnostic {
            kind,
            code: None,
            count,
            message: message.into(),
        });
    }

    /// 記錄單一品項的警告
    pub fn item(&mut self, kind: DiagnosticKind, code: impl Into<String>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            kind,
            code: Some(code.into()),
            count: 1,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 某類型的受影響數量總和
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.count)
            .sum()
    }

    /// 各類型計數摘要
    pub fn summary(&self) -> DiagnosticsSummary {
        let mut summary = DiagnosticsSummary::default();
        for entry in &self.entries {
            *summary.counts.entry(entry.kind.to_string()).or_insert(0) += entry.count;
        }
        summary.update_top();
        summary
    }
}

/// 診斷摘要
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsSummary {
    /// 各類型受影響數量
    pub counts: BTreeMap<String, usize>,
    /// 數量最多的類型
    pub top: Vec<(String, usize)>,
}

impl DiagnosticsSummary {
    fn update_top(&mut self) {
        let mut counts: Vec<(String, usize)> =
            self.counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        self.top = counts.into_iter().take(5).collect();
    }
}

/// 執行報告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// 管線名稱
    pub pipeline_name: String,
    /// 開始時間
    pub start_time: DateTime<Utc>,
    /// 結束時間
    pub end_time: DateTime<Utc>,
    /// 輸入列數
    pub input_records: usize,
    /// 輸出列數
    pub output_records: usize,
    pub diagnostics: Diagnostics,
    /// 統計資訊
    pub statistics: BTreeMap<String, serde_json::Value>,
}

impl PipelineReport {
    /// 創建新的執行報告
    pub fn new(pipeline_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            pipeline_name: pipeline_name.into(),
            start_time: now,
            end_time: now,
            input_records: 0,
            output_records: 0,
            diagnostics: Diagnostics::new(),
            statistics: BTreeMap::new(),
        }
    }

    /// 完成報告
    pub fn finish(mut self) -> Self {
        self.end_time = Utc::now();
        self
    }

    /// 添加統計資訊
    pub fn add_statistic(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.statistics.insert(key.into(), json_value);
        }
    }

    /// 獲取處理時間（秒）
    pub fn processing_time(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// 報告格式化器
pub struct ReportFormatter;

impl ReportFormatter {
    /// 格式化為人類可讀的文字
    pub fn format_text(report: &PipelineReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== 執行報告: {} ===\n", report.pipeline_name));
        output.push_str(&format!("處理時間: {:.3} 秒\n", report.processing_time()));
        output.push_str(&format!("  輸入列數: {}\n", report.input_records));
        output.push_str(&format!("  輸出列數: {}\n", report.output_records));

        let summary = report.diagnostics.summary();
        if !summary.top.is_empty() {
            output.push_str("\n警告:\n");
            for (kind, count) in &summary.top {
                output.push_str(&format!("  {}: {}\n", kind, count));
            }
            for entry in report.diagnostics.entries() {
                match &entry.code {
                    Some(code) => output.push_str(&format!("  - [{}] {}\n", code, entry.message)),
                    None => output.push_str(&format!("  - {}\n", entry.message)),
                }
            }
        }

        if !report.statistics.is_empty() {
            output.push_str("\n其他統計:\n");
            for (key, value) in &report.statistics {
                output.push_str(&format!("  {}: {}\n", key, value));
            }
        }

        output
    }

    /// 格式化為JSON
    pub fn format_json(report: &PipelineReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_count_warnings_are_ignored() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(DiagnosticKind::DroppedDates, 0, "nothing");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(DiagnosticKind::DroppedDates, 3, "3 rows");
        diagnostics.item(DiagnosticKind::ForecastFitFailed, "A1", "fit");
        diagnostics.item(DiagnosticKind::ForecastFitFailed, "B2", "fit");

        assert_eq!(diagnostics.count_of(DiagnosticKind::DroppedDates), 3);
        assert_eq!(diagnostics.count_of(DiagnosticKind::ForecastFitFailed), 2);

        let summary = diagnostics.summary();
        assert_eq!(summary.top[0], ("DroppedDates".to_string(), 3));
        assert_eq!(summary.top[1], ("ForecastFitFailed".to_string(), 2));
    }

    #[test]
    fn test_format_text_and_json() {
        let mut report = PipelineReport::new("forecast");
        report.input_records = 10;
        report.output_records = 2;
        report.diagnostics.item(DiagnosticKind::EmptySeries, "Z9", "沒有每日銷售資料");
        report.add_statistic("target_date", "2024-01-10");
        let report = report.finish();

        let text = ReportFormatter::format_text(&report);
        assert!(text.contains("forecast"));
        assert!(text.contains("[Z9]"));
        assert!(text.contains("target_date"));

        let json = ReportFormatter::format_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["input_records"], 10);
    }

    #[test]
    fn test_statistics_serialize_in_key_order() {
        let mut report = PipelineReport::new("stock");
        for key in ["tier_c", "out_of_stock", "tier_a", "to_reorder", "tier_b"] {
            report.add_statistic(key, 1);
        }

        let json = ReportFormatter::format_json(&report).unwrap();
        let positions: Vec<usize> = ["out_of_stock", "tier_a", "tier_b", "tier_c", "to_reorder"]
            .iter()
            .map(|key| json.find(&format!("\"{}\"", key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(json, ReportFormatter::format_json(&report).unwrap());
    }
}
