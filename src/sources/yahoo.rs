//! Yahoo Finance 行情源（chart 端点的 meta 字段）
//!
//! chart 端点不提供市值、公司简介与分析师建议，这几项保持 None。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{FinanceQuote, FinanceSource};
use crate::config::SourcesSection;
use crate::core::SourceError;

pub struct YahooFinanceSource {
    client: Client,
    api: String,
}

impl YahooFinanceSource {
    pub fn new(cfg: &SourcesSection) -> Self {
        Self {
            client: super::http_client(cfg),
            api: cfg.finance_api.trim_end_matches('/').to_string(),
        }
    }
}

/// 解析 chart 响应；未知代码（chart.error 非空或无结果）返回 None
fn parse_chart(json: &Value, ticker: &str) -> Result<Option<FinanceQuote>, SourceError> {
    let chart = &json["chart"];
    if !chart["error"].is_null() {
        return Ok(None);
    }
    let Some(meta) = chart["result"]
        .as_array()
        .and_then(|r| r.first())
        .map(|r| &r["meta"])
    else {
        return Ok(None);
    };

    let price = meta["regularMarketPrice"]
        .as_f64()
        .ok_or_else(|| SourceError::Parse("missing regularMarketPrice".into()))?;
    let symbol = meta["symbol"].as_str().unwrap_or(ticker).to_uppercase();
    let name = meta["longName"]
        .as_str()
        .or_else(|| meta["shortName"].as_str())
        .unwrap_or(&symbol)
        .to_string();
    let previous_close = meta["chartPreviousClose"]
        .as_f64()
        .or_else(|| meta["previousClose"].as_f64());
    let range = match (
        meta["fiftyTwoWeekLow"].as_f64(),
        meta["fiftyTwoWeekHigh"].as_f64(),
    ) {
        (Some(low), Some(high)) => Some((low, high)),
        _ => None,
    };

    Ok(Some(FinanceQuote {
        symbol,
        name,
        price,
        previous_close,
        market_cap: None,
        range,
        summary: None,
        recommendation: None,
    }))
}

#[async_trait]
impl FinanceSource for YahooFinanceSource {
    async fn lookup(&self, ticker: &str) -> Result<Option<FinanceQuote>, SourceError> {
        let url = format!("{}/{}", self.api, ticker.to_uppercase());
        let resp = self
            .client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            debug!(ticker = %ticker, "unknown ticker");
            return Ok(None);
        }
        let json: Value = resp.error_for_status()?.json().await?;
        parse_chart(&json, ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_chart_meta() {
        let json = json!({"chart": {"result": [{"meta": {
            "symbol": "AAPL",
            "longName": "Apple Inc.",
            "regularMarketPrice": 190.5,
            "chartPreviousClose": 188.0,
            "fiftyTwoWeekLow": 150.0,
            "fiftyTwoWeekHigh": 200.0
        }}], "error": null}});
        let quote = parse_chart(&json, "aapl").unwrap().unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.name, "Apple Inc.");
        assert_eq!(quote.previous_close, Some(188.0));
        assert_eq!(quote.range, Some((150.0, 200.0)));
        assert!(quote.market_cap.is_none());
    }

    #[test]
    fn test_parse_chart_error_is_none() {
        let json = json!({"chart": {"result": null, "error": {"code": "Not Found"}}});
        assert!(parse_chart(&json, "ZZZZ").unwrap().is_none());
    }

    #[test]
    fn test_parse_chart_missing_price_is_parse_error() {
        let json = json!({"chart": {"result": [{"meta": {"symbol": "X"}}], "error": null}});
        assert!(matches!(parse_chart(&json, "X"), Err(SourceError::Parse(_))));
    }
}
