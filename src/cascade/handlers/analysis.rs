//! 数值分析：均值、中位数、样本标准差、极值与线性趋势

use async_trait::async_trait;
use serde::Serialize;

use super::format_number;
use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;
use crate::intent::classifier::extract_numbers;

/// 斜率绝对值不超过该值视为平稳
const STABLE_SLOPE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub slope: f64,
    pub r_squared: f64,
}

impl Trend {
    /// 按 R² 描述拟合强度
    pub fn strength(&self) -> &'static str {
        if self.r_squared > 0.7 {
            "strong"
        } else if self.r_squared > 0.4 {
            "moderate"
        } else {
            "weak"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// 少于 3 个点时为 None
    pub trend: Option<Trend>,
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// 样本标准差（n - 1）
fn std_dev(data: &[f64], mean: f64) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    (sum_sq / (data.len() - 1) as f64).sqrt()
}

/// 以下标为 x 做最小二乘回归
fn trend(data: &[f64]) -> Option<Trend> {
    if data.len() < 3 {
        return None;
    }
    let n = data.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(data);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (i, y) in data.iter().enumerate() {
        let dx = i as f64 - x_mean;
        let dy = y - y_mean;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let slope = sxy / sxx;
    let r_squared = if syy == 0.0 { 0.0 } else { (sxy * sxy) / (sxx * syy) };
    let direction = if slope > STABLE_SLOPE {
        TrendDirection::Upward
    } else if slope < -STABLE_SLOPE {
        TrendDirection::Downward
    } else {
        TrendDirection::Stable
    };
    Some(Trend {
        direction,
        slope,
        r_squared,
    })
}

/// 空输入返回 None
pub fn summarize(data: &[f64]) -> Option<Summary> {
    if data.is_empty() {
        return None;
    }
    let m = mean(data);
    Some(Summary {
        count: data.len(),
        mean: m,
        median: median(data),
        std_dev: std_dev(data, m),
        min: data.iter().copied().fold(f64::INFINITY, f64::min),
        max: data.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        trend: trend(data),
    })
}

fn render(summary: &Summary) -> String {
    let mut out = format!(
        "### 📊 Statistical Analysis\n\nI analyzed your **{} data points**.\n\n**Findings:**\n\
         - **Average (Mean):** {}\n\
         - **Midpoint (Median):** {}\n\
         - **Variation:** standard deviation of {}\n\
         - **Range:** {} to {}\n",
        summary.count,
        format_number(summary.mean),
        format_number(summary.median),
        format_number(summary.std_dev),
        format_number(summary.min),
        format_number(summary.max),
    );
    if let Some(ref t) = summary.trend {
        let direction = match t.direction {
            TrendDirection::Upward => "upward",
            TrendDirection::Downward => "downward",
            TrendDirection::Stable => "stable",
        };
        out.push_str(&format!(
            "- **Trend:** {} {} direction (slope {:.4})\n",
            t.strength(),
            direction,
            t.slope
        ));
    }
    out.trim_end().to_string()
}

pub struct AnalysisHandler;

#[async_trait]
impl Handler for AnalysisHandler {
    fn name(&self) -> &str {
        "data_analysis"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.data_analysis
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let numbers = extract_numbers(&ctx.query.raw);
        Ok(summarize(&numbers).map(|s| HandlerResult::technical(render(&s), 0.95)))
    }
}
