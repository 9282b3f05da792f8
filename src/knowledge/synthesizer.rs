//! 报告合成：由单个最佳候选构建具名段落
//!
//! overview / insights / narrative / conclusion / references 各自独立生成，格式化阶段只做取舍、不再改写内容。

use serde::Serialize;

use super::RankedCandidate;

/// 快速查询路径的固定置信度
pub const FAST_PATH_CONFIDENCE: f32 = 0.92;

const MIN_PARAGRAPH_CHARS: usize = 100;
const OVERVIEW_MAX_CHARS: usize = 600;
const NARRATIVE_MAX_CHARS: usize = 1200;
const NARRATIVE_FALLBACK_END: usize = 2000;
const MIN_SENTENCE_CHARS: usize = 20;
const MAX_INSIGHTS: usize = 4;
const MAX_RUNNER_UP_TITLES: usize = 3;

/// 合成路径：快速查询（固定置信度、附带次优候选标题）或深度研究（置信度取排序分数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisPath {
    Fast,
    Deep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedReport {
    pub title: String,
    pub overview: String,
    pub insights: Vec<String>,
    pub narrative: String,
    pub conclusion: String,
    pub references: Vec<String>,
    pub confidence: f32,
}

/// 按字符（而非字节）截断，超长时追加 "..."
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head.trim_end())
    } else {
        text.to_string()
    }
}

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// 按空行切段，丢弃短于 100 字符的段；一段都不剩时整篇作为一段
pub fn split_paragraphs(body: &str) -> Vec<String> {
    let paragraphs: Vec<String> = body
        .split("\n\n")
        .map(str::trim)
        .filter(|p| p.chars().count() >= MIN_PARAGRAPH_CHARS)
        .map(str::to_string)
        .collect();
    if paragraphs.is_empty() {
        vec![body.trim().to_string()]
    } else {
        paragraphs
    }
}

fn split_sentences(body: &str) -> Vec<String> {
    // 段落边界也视为句子边界
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    flat.split(". ")
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .map(str::to_string)
        .collect()
}

pub struct Synthesizer;

impl Synthesizer {
    /// runners_up 仅在快速路径下用于参考列表
    pub fn synthesize(
        best: &RankedCandidate,
        runners_up: &[RankedCandidate],
        path: SynthesisPath,
    ) -> SynthesizedReport {
        let doc = &best.candidate;
        let paragraphs = split_paragraphs(&doc.body);

        let overview = truncate_chars(&paragraphs[0], OVERVIEW_MAX_CHARS);

        let insights: Vec<String> = split_sentences(&doc.body)
            .into_iter()
            .skip(2)
            .take(5)
            .take(MAX_INSIGHTS)
            .collect();

        let narrative = if paragraphs.len() > 1 {
            paragraphs[1..paragraphs.len().min(3)].join(" ")
        } else {
            char_slice(&doc.body, OVERVIEW_MAX_CHARS, NARRATIVE_FALLBACK_END)
                .trim()
                .to_string()
        };
        let narrative = truncate_chars(&narrative, NARRATIVE_MAX_CHARS);

        let conclusion = format!(
            "Taken together, the material on {} spans both its background and its practical significance. \
             A grasp of its core ideas is the foundation for exploring the subject further.",
            doc.title
        );

        let mut references = vec![doc.url.clone()];
        if path == SynthesisPath::Fast {
            references.extend(
                runners_up
                    .iter()
                    .filter(|r| r.candidate.title != doc.title)
                    .take(MAX_RUNNER_UP_TITLES)
                    .map(|r| r.candidate.title.clone()),
            );
        }

        let confidence = match path {
            SynthesisPath::Fast => FAST_PATH_CONFIDENCE,
            SynthesisPath::Deep => best.relevance,
        }
        .clamp(0.0, 1.0);

        SynthesizedReport {
            title: doc.title.clone(),
            overview,
            insights,
            narrative,
            conclusion,
            references,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{CandidateDocument, SourceKind};

    fn ranked(title: &str, body: &str, relevance: f32) -> RankedCandidate {
        RankedCandidate {
            candidate: CandidateDocument {
                title: title.to_string(),
                body: body.to_string(),
                url: format!("https://en.wikipedia.org/wiki/{title}"),
                source_kind: SourceKind::Reference,
            },
            relevance,
        }
    }

    fn long_paragraph(tag: &str, sentences: usize) -> String {
        (0..sentences)
            .map(|i| format!("{tag} sentence number {i} carries enough words to count"))
            .collect::<Vec<_>>()
            .join(". ")
            + "."
    }

    #[test]
    fn test_short_paragraphs_fall_back_to_whole_body() {
        let body = "Tiny.\n\nAlso tiny.";
        assert_eq!(split_paragraphs(body), vec![body.to_string()]);
    }

    #[test]
    fn test_overview_is_truncated_with_ellipsis() {
        let body = "x".repeat(900);
        let report = Synthesizer::synthesize(&ranked("Long", &body, 0.8), &[], SynthesisPath::Deep);
        assert_eq!(report.overview.chars().count(), 603);
        assert!(report.overview.ends_with("..."));
        // 只有一段时 narrative 取 body[600:2000]
        assert_eq!(report.narrative, "x".repeat(300));
    }

    #[test]
    fn test_sections_from_multi_paragraph_body() {
        let body = format!(
            "{}\n\n{}\n\n{}\n\n{}",
            long_paragraph("alpha", 3),
            long_paragraph("beta", 3),
            long_paragraph("gamma", 3),
            long_paragraph("delta", 3)
        );
        let report = Synthesizer::synthesize(&ranked("Greek", &body, 0.7), &[], SynthesisPath::Deep);

        assert!(report.overview.starts_with("alpha sentence number 0"));
        assert!(report.narrative.starts_with("beta"));
        assert!(report.narrative.contains("gamma"));
        assert!(!report.narrative.contains("delta"));
        assert_eq!(report.insights.len(), 4);
        assert!(report.insights[0].starts_with("alpha sentence number 2"));
        assert!(report.conclusion.contains("Greek"));
        assert_eq!(report.references, vec!["https://en.wikipedia.org/wiki/Greek".to_string()]);
        assert!((report.confidence - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fast_path_uses_constant_confidence_and_runner_up_titles() {
        let best = ranked("Rust", &long_paragraph("rust", 4), 0.3);
        let others = vec![
            ranked("Rust (fungus)", "a", 0.2),
            ranked("Rust Belt", "b", 0.2),
            ranked("Iron oxide", "c", 0.1),
            ranked("Corrosion", "d", 0.1),
        ];
        let report = Synthesizer::synthesize(&best, &others, SynthesisPath::Fast);
        assert!((report.confidence - FAST_PATH_CONFIDENCE).abs() < f32::EPSILON);
        assert_eq!(report.references.len(), 4);
        assert_eq!(report.references[1], "Rust (fungus)");

        let deep = Synthesizer::synthesize(&best, &others, SynthesisPath::Deep);
        assert_eq!(deep.references.len(), 1);
    }
}
