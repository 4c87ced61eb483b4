use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 表示「實質無限」天數時使用的排序值
pub const EFFECTIVELY_INFINITE_RANK: f64 = 9_999_999_999.1;

/// 庫存指標值
///
/// 取代在數值欄位中塞入哨兵字串的作法，保留可比較性。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Metric {
    Numeric(f64),
    /// 庫存為零，比值無定義
    OutOfStock,
    /// 比值無限大或無定義
    EffectivelyInfinite,
}

impl Metric {
    /// 取得數值，非數值變體返回 None
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, Metric::OutOfStock)
    }

    /// 排序用數值：缺貨視為 0，無限視為極大的有限值
    pub fn rank_value(&self) -> f64 {
        match self {
            Metric::Numeric(v) => *v,
            Metric::OutOfStock => 0.0,
            Metric::EffectivelyInfinite => EFFECTIVELY_INFINITE_RANK,
        }
    }

    /// 依排序值比較
    pub fn cmp_rank(&self, other: &Metric) -> Ordering {
        self.rank_value().total_cmp(&other.rank_value())
    }

    /// 以一位小數呈現比值，例如 `5.0`、`0.5`；非數值變體同 `Display`
    pub fn display_ratio(&self) -> String {
        match self {
            Metric::Numeric(v) => format!("{:.1}", v),
            other => other.to_string(),
        }
    }

    /// 以天數呈現，例如 `12D`、`0.1D`、`9999999999.1D`
    pub fn display_days(&self) -> String {
        match self {
            Metric::Numeric(v) if v.fract() == 0.0 => format!("{}D", *v as i64),
            Metric::Numeric(v) => format!("{}D", v),
            Metric::OutOfStock => "o.s".to_string(),
            Metric::EffectivelyInfinite => format!("{}D", EFFECTIVELY_INFINITE_RANK),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Numeric(v) => write!(f, "{}", v),
            Metric::OutOfStock => write!(f, "o.s"),
            Metric::EffectivelyInfinite => write!(f, "inf"),
        }
    }
}
