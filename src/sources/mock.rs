//! 内存协作方（测试 / 离线运行用）
//!
//! 每个 mock 都带调用计数，便于断言「某路径没有触发检索」。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{
    CodeSearchSource, CodeSnippet, FinanceQuote, FinanceSource, WeatherReport, WeatherSource,
};
use crate::core::SourceError;
use crate::intent::CodeLanguage;
use crate::knowledge::{ReferenceEntry, ReferenceSource, WebResult, WebSearchSource};

/// 预置条目的参考源
///
/// 未设置 search_results 时，search 返回所有条目标题中包含任一查询词的条目（按插入顺序）。
#[derive(Debug, Default)]
pub struct StaticReferenceSource {
    entries: Vec<ReferenceEntry>,
    disambiguations: HashMap<String, Vec<String>>,
    search_results: Option<Vec<String>>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl StaticReferenceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, title: impl Into<String>, summary: impl Into<String>) -> Self {
        let title = title.into();
        self.entries.push(ReferenceEntry {
            url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
            title,
            summary: summary.into(),
        });
        self
    }

    pub fn with_disambiguation(mut self, id: impl Into<String>, options: Vec<String>) -> Self {
        self.disambiguations.insert(id.into(), options);
        self
    }

    pub fn with_search_results(mut self, ids: Vec<String>) -> Self {
        self.search_results = Some(ids);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceSource for StaticReferenceSource {
    fn name(&self) -> &str {
        "static_reference"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref ids) = self.search_results {
            return Ok(ids.iter().take(limit).cloned().collect());
        }
        let words: Vec<String> = query
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .filter(|w| w.len() > 2)
            .collect();
        Ok(self
            .entries
            .iter()
            .filter(|e| {
                let title = e.title.to_lowercase();
                words.iter().any(|w| title.contains(w.as_str()))
            })
            .take(limit)
            .map(|e| e.title.clone())
            .collect())
    }

    async fn fetch(&self, id: &str) -> Result<ReferenceEntry, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(options) = self.disambiguations.get(id) {
            return Err(SourceError::Disambiguation(options.clone()));
        }
        self.entries
            .iter()
            .find(|e| e.title == id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

/// 搜索总是失败的参考源
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingReferenceSource;

#[async_trait]
impl ReferenceSource for FailingReferenceSource {
    fn name(&self) -> &str {
        "failing_reference"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Unavailable("reference source offline".into()))
    }

    async fn fetch(&self, id: &str) -> Result<ReferenceEntry, SourceError> {
        Err(SourceError::NotFound(id.to_string()))
    }
}

/// 固定结果的网页搜索源；failing() 构造的实例每次都返回错误
#[derive(Debug, Default)]
pub struct StaticWebSource {
    results: Option<Vec<WebResult>>,
    calls: AtomicUsize,
}

impl StaticWebSource {
    pub fn new(results: Vec<WebResult>) -> Self {
        Self {
            results: Some(results),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            results: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearchSource for StaticWebSource {
    fn name(&self) -> &str {
        "static_web"
    }

    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<WebResult>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.results {
            Some(ref results) => Ok(results.iter().take(max_results).cloned().collect()),
            None => Err(SourceError::Unavailable("web search offline".into())),
        }
    }
}

/// 按城市名（不区分大小写）查表的天气源
#[derive(Debug, Default)]
pub struct StaticWeatherSource {
    reports: HashMap<String, WeatherReport>,
    calls: AtomicUsize,
}

impl StaticWeatherSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, city: &str, report: WeatherReport) -> Self {
        self.reports.insert(city.to_lowercase(), report);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for StaticWeatherSource {
    async fn lookup(&self, city: &str) -> Result<Option<WeatherReport>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reports.get(&city.to_lowercase()).cloned())
    }
}

/// 按代码查表的行情源
#[derive(Debug, Default)]
pub struct StaticFinanceSource {
    quotes: HashMap<String, FinanceQuote>,
    calls: AtomicUsize,
}

impl StaticFinanceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, quote: FinanceQuote) -> Self {
        self.quotes.insert(quote.symbol.to_uppercase(), quote);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FinanceSource for StaticFinanceSource {
    async fn lookup(&self, ticker: &str) -> Result<Option<FinanceQuote>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.quotes.get(&ticker.to_uppercase()).cloned())
    }
}

/// 每次查询都失败的行情源
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingFinanceSource;

#[async_trait]
impl FinanceSource for FailingFinanceSource {
    async fn lookup(&self, _ticker: &str) -> Result<Option<FinanceQuote>, SourceError> {
        Err(SourceError::Unavailable("finance source offline".into()))
    }
}

/// 永远找不到片段的代码搜索
#[derive(Debug, Default)]
pub struct EmptyCodeSearch {
    calls: AtomicUsize,
}

impl EmptyCodeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeSearchSource for EmptyCodeSearch {
    async fn search(&self, _query: &str, _language: CodeLanguage) -> Option<CodeSnippet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }
}
