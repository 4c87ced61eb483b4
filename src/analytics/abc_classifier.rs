//! ABC 分級
//!
//! 依總銷售量由大到小排序（同值保持輸入順序），累加銷售百分比後依門檻分為 A、B、C。

use tracing::debug;

use super::error::{AnalyticsError, AnalyticsResult};
use crate::domain_types::Tier;
use crate::utils::round_half_even;

/// A 級累計百分比上限（含）
pub const DEFAULT_TIER_A_MAX: f64 = 80.0;
/// B 級累計百分比上限（含）
pub const DEFAULT_TIER_B_MAX: f64 = 95.0;

/// 單一品項的分級結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierAssignment {
    /// 在輸入中的位置
    pub index: usize,
    pub total_sales: f64,
    /// 佔總銷售百分比，取到小數點後兩位
    pub sale_percent: f64,
    /// 依排序累加的百分比，取到小數點後兩位
    pub cumulative_percent: f64,
    pub tier: Tier,
}

/// ABC 分級器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbcClassifier {
    a_max: f64,
    b_max: f64,
}

impl Default for AbcClassifier {
    fn default() -> Self {
        Self {
            a_max: DEFAULT_TIER_A_MAX,
            b_max: DEFAULT_TIER_B_MAX,
        }
    }
}

impl AbcClassifier {
    /// 以自訂門檻建立分級器，須滿足 0 < A ≤ B ≤ 100
    pub fn with_thresholds(a_max: f64, b_max: f64) -> AnalyticsResult<Self> {
        if !(a_max > 0.0 && a_max <= b_max && b_max <= 100.0) {
            return Err(AnalyticsError::InvalidThresholds { a_max, b_max });
        }
        Ok(Self { a_max, b_max })
    }

    pub fn thresholds(&self) -> (f64, f64) {
        (self.a_max, self.b_max)
    }

    /// 對總銷售量分級，結果依排名順序返回
    pub fn classify(&self, totals: &[f64]) -> AnalyticsResult<Vec<TierAssignment>> {
        let grand_total: f64 = totals.iter().sum();
        if grand_total == 0.0 || !grand_total.is_finite() {
            return Err(AnalyticsError::DegenerateTotals { grand_total });
        }

        // 穩定排序，同值保留原始順序
        let mut order: Vec<usize> = (0..totals.len()).collect();
        order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));

        let mut running = 0.0;
        let assignments: Vec<TierAssignment> = order
            .into_iter()
            .map(|index| {
                let total_sales = totals[index];
                let sale_percent = round_half_even(total_sales / grand_total * 100.0, 2);
                running += sale_percent;
                let cumulative_percent = round_half_even(running, 2);

                TierAssignment {
                    index,
                    total_sales,
                    sale_percent,
                    cumulative_percent,
                    tier: Tier::from_cumulative_percent(cumulative_percent, self.a_max, self.b_max),
                }
            })
            .collect();

        debug!(
            "ABC 分級完成: A={}, B={}, C={}",
            assignments.iter().filter(|a| a.tier == Tier::A).count(),
            assignments.iter().filter(|a| a.tier == Tier::B).count(),
            assignments.iter().filter(|a| a.tier == Tier::C).count(),
        );

        Ok(assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pareto_example() {
        let assignments = AbcClassifier::default()
            .classify(&[500.0, 300.0, 150.0, 50.0])
            .unwrap();

        let cumulative: Vec<f64> = assignments.iter().map(|a| a.cumulative_percent).collect();
        assert_eq!(cumulative, vec![50.0, 80.0, 95.0, 100.0]);

        let tiers: Vec<Tier> = assignments.iter().map(|a| a.tier).collect();
        assert_eq!(tiers, vec![Tier::A, Tier::A, Tier::B, Tier::C]);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let assignments = AbcClassifier::default()
            .classify(&[10.0, 50.0, 10.0, 30.0])
            .unwrap();

        let order: Vec<usize> = assignments.iter().map(|a| a.index).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_zero_grand_total() {
        assert_matches!(
            AbcClassifier::default().classify(&[0.0, 0.0]),
            Err(AnalyticsError::DegenerateTotals { .. })
        );
        assert_matches!(
            AbcClassifier::default().classify(&[]),
            Err(AnalyticsError::DegenerateTotals { .. })
        );
    }

    #[test]
    fn test_percentages_are_rounded() {
        let assignments = AbcClassifier::default()
            .classify(&[1.0, 1.0, 1.0])
            .unwrap();

        assert!(assignments.iter().all(|a| (a.sale_percent - 33.33).abs() < 1e-9));
        assert!((assignments[2].cumulative_percent - 99.99).abs() < 1e-9);
        assert_eq!(assignments[2].tier, Tier::C);
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = AbcClassifier::with_thresholds(50.0, 90.0).unwrap();
        let tiers: Vec<Tier> = classifier
            .classify(&[500.0, 300.0, 150.0, 50.0])
            .unwrap()
            .iter()
            .map(|a| a.tier)
            .collect();
        assert_eq!(tiers, vec![Tier::A, Tier::B, Tier::C, Tier::C]);

        assert_matches!(
            AbcClassifier::with_thresholds(95.0, 80.0),
            Err(AnalyticsError::InvalidThresholds { .. })
        );
    }
}
