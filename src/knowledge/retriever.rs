//! 知识检索：参考源 + 网页搜索源，顺序调用
//!
//! 每个源独立容错：搜索失败则该源贡献零候选；单个条目取摘要失败只跳过该条目；
//! 消歧义按 DisambiguationPolicy 选一个候选条目再取一次。两个源都没有候选时返回 Retrieval::NoData。

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    CandidateDocument, DisambiguationPolicy, ReferenceEntry, ReferenceSource, RelevanceRanker,
    SourceKind, WebSearchSource,
};
use crate::core::SourceError;

/// 各源的取数数量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    pub reference: usize,
    pub web: usize,
}

impl FanOut {
    pub fn new(reference: usize, web: usize) -> Self {
        Self { reference, web }
    }
}

/// 检索结果：候选列表，或明确的「无数据」信号
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    Candidates(Vec<CandidateDocument>),
    NoData,
}

pub struct KnowledgeRetriever {
    reference: Arc<dyn ReferenceSource>,
    web: Arc<dyn WebSearchSource>,
    policy: DisambiguationPolicy,
}

impl KnowledgeRetriever {
    pub fn new(reference: Arc<dyn ReferenceSource>, web: Arc<dyn WebSearchSource>) -> Self {
        Self {
            reference,
            web,
            policy: DisambiguationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DisambiguationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn retrieve(&self, query: &str, fan_out: FanOut) -> Retrieval {
        let mut candidates = self.from_reference(query, fan_out.reference).await;
        candidates.extend(self.from_web(query, fan_out.web).await);
        candidates.retain(|c| !c.body.trim().is_empty());

        info!(
            query = %query,
            candidates = candidates.len(),
            "knowledge retrieval finished"
        );
        if candidates.is_empty() {
            Retrieval::NoData
        } else {
            Retrieval::Candidates(candidates)
        }
    }

    async fn from_reference(&self, query: &str, limit: usize) -> Vec<CandidateDocument> {
        if limit == 0 {
            return Vec::new();
        }
        let ids = match self.reference.search(query, limit).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(source = self.reference.name(), error = %e, "reference search failed");
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        for id in ids.iter().take(limit) {
            match self.fetch_entry(query, id).await {
                Ok(entry) => out.push(CandidateDocument {
                    title: entry.title,
                    body: entry.summary,
                    url: entry.url,
                    source_kind: SourceKind::Reference,
                }),
                Err(e) => {
                    debug!(source = self.reference.name(), id = %id, error = %e, "reference entry skipped")
                }
            }
        }
        out
    }

    async fn fetch_entry(&self, query: &str, id: &str) -> Result<ReferenceEntry, SourceError> {
        match self.reference.fetch(id).await {
            Err(SourceError::Disambiguation(options)) => {
                let choice = self
                    .choose_option(query, &options)
                    .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
                debug!(id = %id, choice = %choice, "disambiguation resolved");
                self.reference.fetch(choice).await
            }
            other => other,
        }
    }

    fn choose_option<'a>(&self, query: &str, options: &'a [String]) -> Option<&'a String> {
        match self.policy {
            DisambiguationPolicy::FirstOption => options.first(),
            DisambiguationPolicy::BestScoring => {
                let ranker = RelevanceRanker::for_query(query);
                let mut best: Option<(&String, f32)> = None;
                for option in options {
                    let score = ranker.keyword_score(option);
                    if best.map(|(_, s)| score > s).unwrap_or(true) {
                        best = Some((option, score));
                    }
                }
                best.map(|(option, _)| option)
            }
        }
    }

    async fn from_web(&self, query: &str, max_results: usize) -> Vec<CandidateDocument> {
        if max_results == 0 {
            return Vec::new();
        }
        match self.web.search(query, max_results).await {
            Ok(results) => results
                .into_iter()
                .take(max_results)
                .map(|r| CandidateDocument {
                    title: r.title,
                    body: r.body,
                    url: r.url,
                    source_kind: SourceKind::Web,
                })
                .collect(),
            Err(e) => {
                warn!(source = self.web.name(), error = %e, "web search failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::WebResult;
    use crate::sources::mock::{FailingReferenceSource, StaticReferenceSource, StaticWebSource};

    fn web_results(n: usize) -> Vec<WebResult> {
        (0..n)
            .map(|i| WebResult {
                title: format!("Result {i}"),
                body: format!("Body of result {i}"),
                url: format!("https://example.com/{i}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_reference_failure_degrades_to_web_only() {
        let retriever = KnowledgeRetriever::new(
            Arc::new(FailingReferenceSource),
            Arc::new(StaticWebSource::new(web_results(3))),
        );
        match retriever.retrieve("anything", FanOut::new(5, 3)).await {
            Retrieval::Candidates(c) => {
                assert_eq!(c.len(), 3);
                assert!(c.iter().all(|d| d.source_kind == SourceKind::Web));
            }
            Retrieval::NoData => panic!("expected candidates"),
        }
    }

    #[tokio::test]
    async fn test_all_sources_empty_is_no_data() {
        let retriever = KnowledgeRetriever::new(
            Arc::new(FailingReferenceSource),
            Arc::new(StaticWebSource::failing()),
        );
        assert_eq!(retriever.retrieve("x", FanOut::new(1, 1)).await, Retrieval::NoData);
    }

    #[tokio::test]
    async fn test_disambiguation_first_option() {
        let reference = StaticReferenceSource::new()
            .with_entry("Mercury (planet)", "Mercury is the smallest planet.")
            .with_entry("Mercury (element)", "Mercury is a chemical element.")
            .with_disambiguation(
                "Mercury",
                vec!["Mercury (element)".into(), "Mercury (planet)".into()],
            )
            .with_search_results(vec!["Mercury".into()]);
        let retriever = KnowledgeRetriever::new(Arc::new(reference), Arc::new(StaticWebSource::new(vec![])));

        let Retrieval::Candidates(c) = retriever.retrieve("mercury planet", FanOut::new(1, 0)).await else {
            panic!("expected candidates");
        };
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].title, "Mercury (element)");
        assert_eq!(c[0].source_kind, SourceKind::Reference);
    }

    #[tokio::test]
    async fn test_disambiguation_best_scoring() {
        let reference = StaticReferenceSource::new()
            .with_entry("Mercury (planet)", "Mercury is the smallest planet.")
            .with_entry("Mercury (element)", "Mercury is a chemical element.")
            .with_disambiguation(
                "Mercury",
                vec!["Mercury (element)".into(), "Mercury (planet)".into()],
            )
            .with_search_results(vec!["Mercury".into()]);
        let retriever = KnowledgeRetriever::new(Arc::new(reference), Arc::new(StaticWebSource::new(vec![])))
            .with_policy(DisambiguationPolicy::BestScoring);

        let Retrieval::Candidates(c) = retriever.retrieve("mercury planet", FanOut::new(1, 0)).await else {
            panic!("expected candidates");
        };
        assert_eq!(c[0].title, "Mercury (planet)");
    }

    #[tokio::test]
    async fn test_missing_entry_and_empty_body_are_skipped() {
        let reference = StaticReferenceSource::new()
            .with_entry("Blank", "   ")
            .with_entry("Kept", "A real summary.")
            .with_search_results(vec!["Missing".into(), "Blank".into(), "Kept".into()]);
        let retriever = KnowledgeRetriever::new(Arc::new(reference), Arc::new(StaticWebSource::new(vec![])));

        let Retrieval::Candidates(c) = retriever.retrieve("kept", FanOut::new(5, 0)).await else {
            panic!("expected candidates");
        };
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].title, "Kept");
    }
}
