//! 外部协作方：接口与实现
//!
//! - **wikipedia**: 参考源（MediaWiki API）
//! - **duckduckgo**: 网页搜索源（HTML 端点）
//! - **open_meteo**: 天气
//! - **yahoo**: 行情
//! - **snippets** / **scaffolds**: 内置代码片段与网站骨架
//! - **mock**: 内存实现（测试与离线运行）

pub mod duckduckgo;
pub mod mock;
pub mod open_meteo;
pub mod scaffolds;
pub mod snippets;
pub mod wikipedia;
pub mod yahoo;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::SourcesSection;
use crate::core::SourceError;
use crate::intent::CodeLanguage;

pub use duckduckgo::DuckDuckGoSource;
pub use open_meteo::OpenMeteoSource;
pub use scaffolds::{Scaffold, ScaffoldCatalog, ScaffoldKind};
pub use snippets::SnippetCatalog;
pub use wikipedia::WikipediaSource;
pub use yahoo::YahooFinanceSource;

/// 当前天气
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// 如 "London, United Kingdom"
    pub place: String,
    pub condition: String,
    pub temp_c: f64,
    pub humidity: f64,
    pub wind_kph: f64,
}

/// 行情快照；部分字段取决于数据源是否提供
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub previous_close: Option<f64>,
    pub market_cap: Option<f64>,
    /// 52 周区间 (low, high)
    pub range: Option<(f64, f64)>,
    pub summary: Option<String>,
    pub recommendation: Option<String>,
}

/// 代码片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub title: String,
    pub language: CodeLanguage,
    pub code: String,
    pub explanation: String,
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// 城市不存在时返回 Ok(None)
    async fn lookup(&self, city: &str) -> Result<Option<WeatherReport>, SourceError>;
}

#[async_trait]
pub trait FinanceSource: Send + Sync {
    /// 代码不存在时返回 Ok(None)
    async fn lookup(&self, ticker: &str) -> Result<Option<FinanceQuote>, SourceError>;
}

#[async_trait]
pub trait CodeSearchSource: Send + Sync {
    /// 找不到匹配片段时返回 None，级联继续
    async fn search(&self, query: &str, language: CodeLanguage) -> Option<CodeSnippet>;
}

/// 各 HTTP 适配器共用的客户端：超时与 User-Agent 由配置决定
pub fn http_client(cfg: &SourcesSection) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .user_agent(cfg.user_agent.clone())
        .build()
        .unwrap_or_default()
}

/// 简易去除 HTML 标签并折叠空白（html2text 失败时的回退）
pub(crate) fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// HTML 片段转纯文本（单行）
///
/// 先去标签，避免 html2text 给 <b>/<em> 加装饰符；html2text 只负责实体解码。
pub(crate) fn html_to_text(html: &str) -> String {
    let stripped = strip_html_tags(html);
    match html2text::from_read(stripped.as_bytes(), 10_000) {
        Ok(text) if !text.trim().is_empty() => {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        }
        _ => stripped,
    }
}
