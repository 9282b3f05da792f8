//! DuckDuckGo 网页搜索（HTML 端点，无需 API key）
//!
//! 结果链接是 `//duckduckgo.com/l/?uddg=<编码后的真实 URL>` 形式的跳转，解析时还原为真实 URL。

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};
use tracing::debug;

use super::html_to_text;
use crate::config::SourcesSection;
use crate::core::SourceError;
use crate::knowledge::{WebResult, WebSearchSource};

fn result_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#)
            .expect("valid result link regex")
    })
}

fn snippet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#)
            .expect("valid snippet regex")
    })
}

pub struct DuckDuckGoSource {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSource {
    pub fn new(cfg: &SourcesSection) -> Self {
        Self {
            client: super::http_client(cfg),
            endpoint: cfg.duckduckgo_html.clone(),
        }
    }
}

/// 跳转链接还原为真实 URL；非跳转链接原样返回
fn resolve_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "uddg")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or(absolute)
}

/// 解析结果页：标题与摘要按出现顺序配对，摘要缺失的结果丢弃
pub(crate) fn parse_results(html: &str, max_results: usize) -> Vec<WebResult> {
    let snippets: Vec<String> = snippet_re()
        .captures_iter(html)
        .map(|c| html_to_text(&c[1]))
        .collect();

    result_link_re()
        .captures_iter(html)
        .zip(snippets)
        .filter_map(|(link, body)| {
            let title = html_to_text(&link[2]);
            if body.is_empty() || title.is_empty() {
                return None;
            }
            Some(WebResult {
                title,
                body,
                url: resolve_redirect(&link[1]),
            })
        })
        .take(max_results)
        .collect()
}

#[async_trait]
impl WebSearchSource for DuckDuckGoSource {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebResult>, SourceError> {
        let html = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let results = parse_results(&html, max_results);
        debug!(query = %query, hits = results.len(), "duckduckgo search");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<div class="result">
  <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc">The <b>Rust</b> Programming Language</a>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">A language empowering everyone to build <b>reliable</b> software.</a>
</div>
<div class="result">
  <a rel="nofollow" class="result__a" href="https://doc.rust-lang.org/book/">The Book</a>
  <a class="result__snippet" href="https://doc.rust-lang.org/book/">Learn Rust from the ground up.</a>
</div>
"#;

    #[test]
    fn test_parse_results_pairs_titles_and_snippets() {
        let results = parse_results(PAGE, 5);
        assert_eq!(results.len(), 2);
        assert!(results[0].title.contains("Rust"));
        assert!(results[0].body.contains("reliable"));
        assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
    }

    #[test]
    fn test_parse_results_respects_max() {
        assert_eq!(parse_results(PAGE, 1).len(), 1);
        assert!(parse_results("<html></html>", 3).is_empty());
    }

    #[test]
    fn test_resolve_redirect() {
        assert_eq!(
            resolve_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fa&rut=1"),
            "https://example.com/a"
        );
        assert_eq!(resolve_redirect("https://example.com/b"), "https://example.com/b");
    }
}
