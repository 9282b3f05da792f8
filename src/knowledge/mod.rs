//! 知识检索与合成
//!
//! - **retriever**: 顺序调用参考源与网页搜索源，聚合候选文档（任一源失败只贡献零候选）
//! - **ranker**: 关键词重叠打分 + 身份守卫 + 低质量来源惩罚，按分数排序并按阈值选最佳
//! - **synthesizer**: 由最佳候选构建具名段落报告
//! - **formatter**: 按深度按名选取报告段落

pub mod formatter;
pub mod ranker;
pub mod retriever;
pub mod synthesizer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::SourceError;

pub use formatter::{DepthFormatter, FormattedReport, ReportSection, SectionName};
pub use ranker::{best_match, RelevanceRanker};
pub use retriever::{FanOut, KnowledgeRetriever, Retrieval};
pub use synthesizer::{SynthesisPath, SynthesizedReport, Synthesizer, FAST_PATH_CONFIDENCE};

/// 候选来源类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Reference,
    Web,
}

/// 单条检索结果（未打分），排序后即丢弃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub title: String,
    pub body: String,
    pub url: String,
    pub source_kind: SourceKind,
}

/// 带相关性分数（[0,1]）的候选
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub candidate: CandidateDocument,
    pub relevance: f32,
}

/// 参考源条目（百科摘要）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub title: String,
    pub summary: String,
    pub url: String,
}

/// 网页搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub body: String,
    pub url: String,
}

/// 参考源：先搜索得到条目标识，再按标识取摘要
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError>;

    /// 可能返回 NotFound 或 Disambiguation(options)
    async fn fetch(&self, id: &str) -> Result<ReferenceEntry, SourceError>;
}

/// 通用网页搜索源
#[async_trait]
pub trait WebSearchSource: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebResult>, SourceError>;
}

/// 参考源返回消歧义时如何选择条目
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisambiguationPolicy {
    /// 取第一个候选（临时策略）
    #[default]
    FirstOption,
    /// 用相关性打分器对候选标题重排，取最高分
    BestScoring,
}
