//! Wikipedia 参考源（MediaWiki Action API）
//!
//! search: `list=search` 取条目标题；fetch: `prop=extracts|pageprops|info` 取纯文本摘要与规范 URL。
//! 消歧义页通过 pageprops.disambiguation 识别，再用 `prop=links` 取候选条目。

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::SourcesSection;
use crate::core::SourceError;
use crate::knowledge::{ReferenceEntry, ReferenceSource};

const MAX_DISAMBIGUATION_OPTIONS: usize = 20;

pub struct WikipediaSource {
    client: Client,
    api: String,
}

impl WikipediaSource {
    pub fn new(cfg: &SourcesSection) -> Self {
        Self {
            client: super::http_client(cfg),
            api: cfg.wikipedia_api.clone(),
        }
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value, SourceError> {
        let resp = self
            .client
            .get(&self.api)
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<Value>().await?)
    }

    async fn disambiguation_options(&self, title: &str) -> Result<Vec<String>, SourceError> {
        let limit = MAX_DISAMBIGUATION_OPTIONS.to_string();
        let json = self
            .get_json(&[
                ("action", "query"),
                ("prop", "links"),
                ("plnamespace", "0"),
                ("pllimit", limit.as_str()),
                ("titles", title),
            ])
            .await?;
        Ok(parse_links(&json))
    }
}

fn parse_search_titles(json: &Value) -> Result<Vec<String>, SourceError> {
    let hits = json["query"]["search"]
        .as_array()
        .ok_or_else(|| SourceError::Parse("missing query.search".into()))?;
    Ok(hits
        .iter()
        .filter_map(|h| h["title"].as_str().map(str::to_string))
        .collect())
}

/// 解析单页 extracts 响应；消歧义页返回 Ok(None)
fn parse_page(json: &Value, id: &str) -> Result<Option<ReferenceEntry>, SourceError> {
    let page = json["query"]["pages"]
        .as_array()
        .and_then(|pages| pages.first())
        .ok_or_else(|| SourceError::Parse("missing query.pages".into()))?;

    if page.get("missing").is_some() || page.get("invalid").is_some() {
        return Err(SourceError::NotFound(id.to_string()));
    }
    if page["pageprops"].get("disambiguation").is_some() {
        return Ok(None);
    }

    let title = page["title"].as_str().unwrap_or(id).to_string();
    let summary = page["extract"].as_str().unwrap_or_default().trim().to_string();
    let url = page["fullurl"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")));
    Ok(Some(ReferenceEntry { title, summary, url }))
}

fn parse_links(json: &Value) -> Vec<String> {
    json["query"]["pages"]
        .as_array()
        .and_then(|pages| pages.first())
        .and_then(|page| page["links"].as_array())
        .map(|links| {
            links
                .iter()
                .filter_map(|l| l["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl ReferenceSource for WikipediaSource {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        let limit = limit.to_string();
        let json = self
            .get_json(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .await?;
        let titles = parse_search_titles(&json)?;
        debug!(query = %query, hits = titles.len(), "wikipedia search");
        Ok(titles)
    }

    async fn fetch(&self, id: &str) -> Result<ReferenceEntry, SourceError> {
        let json = self
            .get_json(&[
                ("action", "query"),
                ("prop", "extracts|pageprops|info"),
                ("inprop", "url"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", id),
            ])
            .await?;
        match parse_page(&json, id)? {
            Some(entry) => Ok(entry),
            None => {
                let options = self.disambiguation_options(id).await?;
                Err(SourceError::Disambiguation(options))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_titles() {
        let json = json!({"query": {"search": [{"title": "Rust"}, {"title": "Rust Belt"}]}});
        assert_eq!(parse_search_titles(&json).unwrap(), vec!["Rust", "Rust Belt"]);
        assert!(matches!(parse_search_titles(&json!({})), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_page_variants() {
        let ok = json!({"query": {"pages": [{
            "title": "Photosynthesis",
            "extract": " Photosynthesis is a process. ",
            "fullurl": "https://en.wikipedia.org/wiki/Photosynthesis"
        }]}});
        let entry = parse_page(&ok, "photosynthesis").unwrap().unwrap();
        assert_eq!(entry.title, "Photosynthesis");
        assert_eq!(entry.summary, "Photosynthesis is a process.");

        let missing = json!({"query": {"pages": [{"title": "Zzz", "missing": true}]}});
        assert!(matches!(parse_page(&missing, "Zzz"), Err(SourceError::NotFound(_))));

        let disamb = json!({"query": {"pages": [{"title": "Mercury", "pageprops": {"disambiguation": ""}}]}});
        assert!(parse_page(&disamb, "Mercury").unwrap().is_none());
    }

    #[test]
    fn test_parse_links() {
        let json = json!({"query": {"pages": [{"links": [{"title": "Mercury (planet)"}, {"title": "Mercury (element)"}]}]}});
        assert_eq!(parse_links(&json).len(), 2);
    }
}
