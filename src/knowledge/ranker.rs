//! 相关性校验与排序
//!
//! 分数 = 命中关键词数 / 关键词数（无关键词时 0.5）；随后依次应用：
//! 1. 低质量来源惩罚：正文提到论坛/社交平台且查询本身未指定该平台时 ×0.5
//! 2. 身份守卫：查询是「谁是 X」类且候选内容不含任何专有名词时强制为 0.1
//!
//! 纯关键词重叠，不做语义相似度。

use tracing::debug;

use super::{CandidateDocument, RankedCandidate};

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "could", "did", "do",
    "does", "for", "from", "had", "has", "have", "how", "i", "in", "into", "is", "it", "its",
    "me", "more", "my", "of", "on", "or", "our", "please", "show", "should", "tell", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "to",
    "was", "we", "were", "what", "when", "where", "which", "who", "whom", "why", "will",
    "with", "would", "you", "your", "about", "explain", "give", "know", "like", "some",
];

const IDENTITY_INDICATORS: &[&str] = &["who is", "who was", "identity", "person"];

/// 低质量来源指示词（论坛 / 社交平台）
const JUNK_INDICATORS: &[&str] = &[
    "reddit", "quora", "forum", "facebook", "twitter", "instagram", "tiktok", "pinterest",
];

/// 身份守卫命中时的强制分数
pub const IDENTITY_MISMATCH_SCORE: f32 = 0.1;
/// 无关键词时的默认分数
pub const NO_KEYWORD_SCORE: f32 = 0.5;
pub const JUNK_PENALTY: f32 = 0.5;

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// 查询关键词：按非字母数字切分、小写、去停用词与长度 ≤ 2 的词、去重
pub fn extract_keywords(query: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for token in query
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
    {
        if token.chars().count() <= 2 || is_stop_word(&token) {
            continue;
        }
        if !keywords.contains(&token) {
            keywords.push(token);
        }
    }
    keywords
}

/// 原始查询中首字母大写且非停用词的词，视为候选专有名词
fn extract_proper_names(raw: &str) -> Vec<String> {
    raw.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() >= 2)
        .filter(|w| w.chars().next().map(char::is_uppercase).unwrap_or(false))
        .filter(|w| !is_stop_word(&w.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// 针对单个查询构建的打分器
#[derive(Debug, Clone)]
pub struct RelevanceRanker {
    query_lower: String,
    keywords: Vec<String>,
    /// 仅当查询为身份类问题时非空
    proper_names: Vec<String>,
}

impl RelevanceRanker {
    pub fn for_query(raw_query: &str) -> Self {
        let query_lower = raw_query.to_lowercase();
        let identity = IDENTITY_INDICATORS.iter().any(|i| query_lower.contains(i));
        let proper_names = if identity {
            extract_proper_names(raw_query)
        } else {
            Vec::new()
        };
        Self {
            keywords: extract_keywords(raw_query),
            query_lower,
            proper_names,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn proper_names(&self) -> &[String] {
        &self.proper_names
    }

    /// 纯关键词重叠分数（不含守卫与惩罚），也用于消歧义候选标题重排
    pub fn keyword_score(&self, content: &str) -> f32 {
        if self.keywords.is_empty() {
            return NO_KEYWORD_SCORE;
        }
        let content = content.to_lowercase();
        let matches = self
            .keywords
            .iter()
            .filter(|k| content.contains(k.as_str()))
            .count();
        matches as f32 / self.keywords.len() as f32
    }

    pub fn score(&self, candidate: &CandidateDocument) -> f32 {
        let content = format!("{} {}", candidate.title, candidate.body);
        let mut score = self.keyword_score(&content);

        let body_lower = candidate.body.to_lowercase();
        let junk = JUNK_INDICATORS
            .iter()
            .any(|j| body_lower.contains(j) && !self.query_lower.contains(j));
        if junk {
            score *= JUNK_PENALTY;
        }

        if !self.proper_names.is_empty() {
            let content_lower = content.to_lowercase();
            let mentioned = self
                .proper_names
                .iter()
                .any(|n| content_lower.contains(&n.to_lowercase()));
            if !mentioned {
                score = IDENTITY_MISMATCH_SCORE;
            }
        }

        score.clamp(0.0, 1.0)
    }

    /// 打分并按分数降序排序（同分保持检索顺序）；空正文候选不参与排序
    pub fn rank(&self, candidates: Vec<CandidateDocument>) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|c| !c.body.trim().is_empty())
            .map(|candidate| {
                let relevance = self.score(&candidate);
                debug!(title = %candidate.title, relevance, "candidate scored");
                RankedCandidate {
                    candidate,
                    relevance,
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
        ranked
    }
}

/// 最高分 ≥ 阈值时返回最高分候选，否则 None
pub fn best_match(ranked: &[RankedCandidate], threshold: f32) -> Option<&RankedCandidate> {
    ranked.first().filter(|top| top.relevance >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::SourceKind;

    fn doc(title: &str, body: &str) -> CandidateDocument {
        CandidateDocument {
            title: title.to_string(),
            body: body.to_string(),
            url: format!("https://example.org/{}", title.replace(' ', "_")),
            source_kind: SourceKind::Reference,
        }
    }

    fn ranked(relevance: f32) -> RankedCandidate {
        RankedCandidate {
            candidate: doc("Topic", "Body text"),
            relevance,
        }
    }

    #[test]
    fn test_extract_keywords_drops_stop_words_and_short_tokens() {
        let kw = extract_keywords("What is the capital of France? Is it Paris, or is it Lyon?");
        assert_eq!(kw, vec!["capital", "france", "paris", "lyon"]);
        assert!(extract_keywords("who is it").is_empty());
    }

    #[test]
    fn test_keyword_overlap_score() {
        let ranker = RelevanceRanker::for_query("photosynthesis in desert plants");
        let c = doc("Photosynthesis", "Plants convert light into chemical energy.");
        // photosynthesis、plants 命中，desert 未命中
        let score = ranker.score(&c);
        assert!((score - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_keywords_defaults_to_half() {
        let ranker = RelevanceRanker::for_query("what is it");
        assert!((ranker.score(&doc("Anything", "Some body")) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_identity_guard_forces_low_score() {
        let ranker = RelevanceRanker::for_query("Who is Marie Curie");
        assert_eq!(ranker.proper_names(), &["Marie".to_string(), "Curie".to_string()]);

        let wrong = doc("Radioactivity", "Radioactivity is the emission of radiation by unstable nuclei.");
        assert_eq!(ranker.score(&wrong), IDENTITY_MISMATCH_SCORE);

        let right = doc("Marie Curie", "Marie Curie was a physicist and chemist.");
        assert!((ranker.score(&right) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_identity_guard_inactive_without_indicator() {
        let ranker = RelevanceRanker::for_query("Tell me about Marie Curie");
        assert!(ranker.proper_names().is_empty());
    }

    #[test]
    fn test_junk_penalty_unless_requested() {
        let body = "Users on reddit discuss sourdough starter hydration.";
        let penalized = RelevanceRanker::for_query("sourdough starter").score(&doc("Sourdough", body));
        assert!((penalized - 0.5).abs() < 1e-6);

        let requested = RelevanceRanker::for_query("sourdough starter reddit").score(&doc("Sourdough", body));
        assert!((requested - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scores_always_within_unit_interval() {
        let ranker = RelevanceRanker::for_query("Who was Alan Turing on twitter and reddit");
        let docs = vec![
            doc("Alan Turing", "Alan Turing was a mathematician. Not on twitter."),
            doc("Forum", "A forum thread on facebook"),
            doc("", "x"),
        ];
        for r in ranker.rank(docs) {
            assert!((0.0..=1.0).contains(&r.relevance));
        }
    }

    #[test]
    fn test_rank_sorts_descending_and_drops_empty_bodies() {
        let ranker = RelevanceRanker::for_query("rust ownership borrowing");
        let result = ranker.rank(vec![
            doc("Rust", "Rust is a language."),
            doc("Empty", "   "),
            doc("Ownership", "Rust ownership and borrowing rules."),
        ]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].candidate.title, "Ownership");
        assert!(result[0].relevance >= result[1].relevance);
    }

    #[test]
    fn test_best_match_threshold_boundary() {
        assert!(best_match(&[ranked(0.39)], 0.40).is_none());
        assert!(best_match(&[ranked(0.40)], 0.40).is_some());
        assert!(best_match(&[ranked(0.25), ranked(0.1)], 0.25).is_some());
        assert!(best_match(&[], 0.0).is_none());
    }
}
