//! 行情查询
//!
//! 代码必须以大写出现在原文中（`stock AAPL`、`price of MSFT`），或写成 `$TSLA` 形式；
//! 小写单词不会被当作代码，避免把 "stock price of apple" 里的 "price" 识别成代码。

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;

use super::format_number;
use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;
use crate::sources::{FinanceQuote, FinanceSource};

const SUMMARY_MAX_CHARS: usize = 400;

fn ticker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?i:stock|price|ticker)\s+(?:(?i:of)\s+)?([A-Z]{1,5})\b")
            .expect("valid ticker regex")
    })
}

fn cashtag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$([A-Z]{1,5})\b").expect("valid cashtag regex"))
}

pub fn extract_ticker(raw: &str) -> Option<String> {
    ticker_re()
        .captures(raw)
        .or_else(|| cashtag_re().captures(raw))
        .map(|c| c[1].to_string())
}

/// 千分位格式（保留两位小数）
fn with_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

fn render_quote(q: &FinanceQuote) -> String {
    let mut out = format!(
        "### 📈 Stock Analysis: {} ({})\n\n**Current Price:** ${}\n",
        q.name,
        q.symbol,
        with_thousands(q.price)
    );
    if let Some(prev) = q.previous_close.filter(|p| *p != 0.0) {
        let change = q.price - prev;
        out.push_str(&format!(
            "**Change:** {:+.2} ({:+.2}%)\n",
            change,
            change / prev * 100.0
        ));
    }
    if let Some(cap) = q.market_cap {
        out.push_str(&format!("**Market Cap:** ${}\n", format_number(cap.round())));
    }
    if let Some((low, high)) = q.range {
        out.push_str(&format!(
            "**52 Week Range:** ${} - ${}\n",
            with_thousands(low),
            with_thousands(high)
        ));
    }
    if let Some(ref summary) = q.summary {
        let short: String = summary.chars().take(SUMMARY_MAX_CHARS).collect();
        out.push_str(&format!("\n**Business Summary:**\n{short}...\n"));
    }
    if let Some(ref rec) = q.recommendation {
        out.push_str(&format!("\n**Analyst Recommendation:** {}", rec.replace('_', " ")));
    }
    out.trim_end().to_string()
}

pub struct StockHandler {
    source: Arc<dyn FinanceSource>,
}

impl StockHandler {
    pub fn new(source: Arc<dyn FinanceSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Handler for StockHandler {
    fn name(&self) -> &str {
        "stock"
    }

    /// 需要行情意图或 $TICKER 写法，避免把句中任意大写词当作代码
    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.stock || cashtag_re().is_match(&ctx.query.raw)
    }

    /// 数据源出错时向上返回，由级联边界转为兜底回复
    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let Some(ticker) = extract_ticker(&ctx.query.raw) else {
            return Ok(None);
        };
        let quote = self.source.lookup(&ticker).await?;
        Ok(quote.map(|q| HandlerResult::technical(render_quote(&q), 0.95)))
    }
}
