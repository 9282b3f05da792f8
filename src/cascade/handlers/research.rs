//! 知识类处理器
//!
//! - **QuickLookupHandler**：快速层级，小扇出、阈值 0.25，只回答概述（0.92）
//! - **ResearchHandler**：深度研究，大扇出、阈值 0.40，完整合成后按深度取段落，置信度取排序分数
//!
//! 两者都遵循同一套降级：没有任何候选 → 0.40 的「无数据」提示；有候选但无足够相关者 → 细化建议。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;
use crate::knowledge::{
    best_match, DepthFormatter, FanOut, KnowledgeRetriever, RelevanceRanker, Retrieval,
    SynthesisPath, Synthesizer,
};

/// 所有知识源都没有返回候选
pub const NO_DATA_CONFIDENCE: f32 = 0.40;
/// 有候选但都低于阈值（快速 / 深度）
pub const FAST_NO_MATCH_CONFIDENCE: f32 = 0.65;
pub const DEEP_NO_MATCH_CONFIDENCE: f32 = 0.60;

const NO_DATA_TEXT: &str = "I couldn't reach any knowledge source for that right now. \
     Please try again in a moment, or rephrase the question.";

const FAST_NO_MATCH_TEXT: &str = "I tried to look that up but couldn't find a confident answer. \
     Could you be more specific about what you'd like to know?";

fn deep_no_match_text(query: &str) -> String {
    format!(
        "**RESEARCH INQUIRY: '{query}'**\n{}\n\n\
         None of the sources I searched matched this inquiry closely enough.\n\n\
         **Ways to refine the question:**\n\
         • Use broader or alternative terms\n\
         • Name the specific aspect you're interested in\n\
         • Check the spelling of names and places\n\
         • Start from a more general topic",
        "=".repeat(50)
    )
}

/// references 首项为最佳条目的链接，其余为次优条目标题
pub(crate) fn with_related(overview: &str, references: &[String]) -> String {
    match references.get(1..) {
        Some(titles) if !titles.is_empty() => {
            format!("{overview}\n\nRelated: {}", titles.join(", "))
        }
        _ => overview.to_string(),
    }
}

/// 快速层级的事实查询
pub struct QuickLookupHandler {
    retriever: Arc<KnowledgeRetriever>,
    fan_out: FanOut,
    threshold: f32,
}

impl QuickLookupHandler {
    pub fn new(retriever: Arc<KnowledgeRetriever>, fan_out: FanOut, threshold: f32) -> Self {
        Self {
            retriever,
            fan_out,
            threshold,
        }
    }
}

#[async_trait]
impl Handler for QuickLookupHandler {
    fn name(&self) -> &str {
        "quick_lookup"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.knowledge || ctx.intent.research
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let query = ctx.query.raw.trim();
        let candidates = match self.retriever.retrieve(query, self.fan_out).await {
            Retrieval::Candidates(c) => c,
            Retrieval::NoData => {
                return Ok(Some(HandlerResult::conversational(NO_DATA_TEXT, NO_DATA_CONFIDENCE)))
            }
        };

        let ranked = RelevanceRanker::for_query(query).rank(candidates);
        let Some(best) = best_match(&ranked, self.threshold) else {
            debug!(top = ?ranked.first().map(|r| r.relevance), "quick lookup below threshold");
            return Ok(Some(HandlerResult::conversational(
                FAST_NO_MATCH_TEXT,
                FAST_NO_MATCH_CONFIDENCE,
            )));
        };

        let report = Synthesizer::synthesize(best, &ranked[1..], SynthesisPath::Fast);
        Ok(Some(
            HandlerResult::research(with_related(&report.overview, &report.references), report.confidence)
                .with_sources(report.references),
        ))
    }
}

/// 深度研究报告
pub struct ResearchHandler {
    retriever: Arc<KnowledgeRetriever>,
    fan_out: FanOut,
    threshold: f32,
}

impl ResearchHandler {
    pub fn new(retriever: Arc<KnowledgeRetriever>, fan_out: FanOut, threshold: f32) -> Self {
        Self {
            retriever,
            fan_out,
            threshold,
        }
    }
}

#[async_trait]
impl Handler for ResearchHandler {
    fn name(&self) -> &str {
        "research"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.research
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let query = ctx.query.raw.trim();
        let candidates = match self.retriever.retrieve(query, self.fan_out).await {
            Retrieval::Candidates(c) => c,
            Retrieval::NoData => {
                return Ok(Some(HandlerResult::research(NO_DATA_TEXT, NO_DATA_CONFIDENCE)))
            }
        };

        let ranked = RelevanceRanker::for_query(query).rank(candidates);
        let Some(best) = best_match(&ranked, self.threshold) else {
            return Ok(Some(HandlerResult::research(
                deep_no_match_text(query),
                DEEP_NO_MATCH_CONFIDENCE,
            )));
        };

        let report = Synthesizer::synthesize(best, &[], SynthesisPath::Deep);
        let formatted = DepthFormatter::format(&report, ctx.intent.depth);
        info!(
            title = %report.title,
            depth = ?ctx.intent.depth,
            relevance = best.relevance,
            sections = formatted.sections.len(),
            "research report built"
        );
        Ok(Some(
            HandlerResult::research(formatted.render(), report.confidence)
                .with_sources(report.references.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentClassifier, Query};
    use crate::knowledge::WebResult;
    use crate::sources::mock::{FailingReferenceSource, StaticReferenceSource, StaticWebSource};

    const PHOTOSYNTHESIS: &str = "Photosynthesis is the process used by plants and other organisms to convert light energy into chemical energy. \
         It takes place mainly in the leaves, inside the chloroplasts, and it releases oxygen as a by-product.";

    fn retriever(reference: StaticReferenceSource, web: StaticWebSource) -> Arc<KnowledgeRetriever> {
        Arc::new(KnowledgeRetriever::new(Arc::new(reference), Arc::new(web)))
    }

    async fn run(handler: &dyn Handler, text: &str) -> HandlerResult {
        let query = Query::new(text);
        let intent = IntentClassifier::classify(&query);
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &[],
            attachment: None,
        };
        assert!(handler.guard(&ctx));
        handler.handle(&ctx).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_quick_lookup_answers_with_overview() {
        let r = retriever(
            StaticReferenceSource::new().with_entry("Photosynthesis", PHOTOSYNTHESIS),
            StaticWebSource::new(vec![]),
        );
        let handler = QuickLookupHandler::new(r, FanOut::new(1, 1), 0.25);
        let result = run(&handler, "what is photosynthesis").await;
        assert!(result.text.starts_with("Photosynthesis is the process"));
        assert!((result.confidence - 0.92).abs() < 1e-6);
        assert_eq!(result.sources, vec!["https://en.wikipedia.org/wiki/Photosynthesis".to_string()]);
    }

    #[tokio::test]
    async fn test_quick_lookup_lists_runner_up_titles() {
        let web = |title: &str| WebResult {
            title: title.into(),
            body: format!("{title} is closely related to photosynthesis."),
            url: format!("https://example.org/{}", title.replace(' ', "_")),
        };
        let r = retriever(
            StaticReferenceSource::new().with_entry("Photosynthesis", PHOTOSYNTHESIS),
            StaticWebSource::new(vec![web("Chlorophyll"), web("Calvin cycle")]),
        );
        let handler = QuickLookupHandler::new(r, FanOut::new(1, 2), 0.25);
        let result = run(&handler, "what is photosynthesis").await;
        assert!(result.text.starts_with("Photosynthesis is the process"));
        assert!(result.text.ends_with("Related: Chlorophyll, Calvin cycle"));
        assert_eq!(
            result.sources,
            vec![
                "https://en.wikipedia.org/wiki/Photosynthesis".to_string(),
                "Chlorophyll".to_string(),
                "Calvin cycle".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_quick_lookup_no_match_and_no_data() {
        let unrelated = retriever(
            StaticReferenceSource::new(),
            StaticWebSource::new(vec![WebResult {
                title: "Cooking pasta".into(),
                body: "Boil water and add salt.".into(),
                url: "https://example.org/pasta".into(),
            }]),
        );
        let handler = QuickLookupHandler::new(unrelated, FanOut::new(1, 1), 0.25);
        let result = run(&handler, "what is photosynthesis").await;
        assert!((result.confidence - FAST_NO_MATCH_CONFIDENCE).abs() < 1e-6);

        let empty = Arc::new(KnowledgeRetriever::new(
            Arc::new(FailingReferenceSource),
            Arc::new(StaticWebSource::failing()),
        ));
        let handler = QuickLookupHandler::new(empty, FanOut::new(1, 1), 0.25);
        let result = run(&handler, "what is photosynthesis").await;
        assert!((result.confidence - NO_DATA_CONFIDENCE).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_research_report_follows_depth() {
        let r = retriever(
            StaticReferenceSource::new().with_entry("Photosynthesis", PHOTOSYNTHESIS),
            StaticWebSource::new(vec![]),
        );
        let handler = ResearchHandler::new(r, FanOut::new(5, 3), 0.40);

        // "what is" → surface：没有结论段
        let surface = run(&handler, "what is photosynthesis").await;
        assert!(surface.text.starts_with("**RESEARCH REPORT: PHOTOSYNTHESIS**"));
        assert!(!surface.text.contains("### Conclusion"));
        assert!((surface.confidence - 1.0).abs() < 1e-6);

        // "history of" → deep：保留结论段
        let deep = run(&handler, "history of photosynthesis").await;
        assert!(deep.text.contains("### Conclusion"));
        assert!(deep.text.len() > surface.text.len());
    }

    #[tokio::test]
    async fn test_research_without_match_suggests_refinement() {
        let r = retriever(
            StaticReferenceSource::new().with_entry("Volcano", "A volcano is a rupture in the crust of a planet."),
            StaticWebSource::new(vec![]),
        );
        let handler = ResearchHandler::new(r, FanOut::new(5, 3), 0.40);
        let result = run(&handler, "tell me about quantum chromodynamics volcano").await;
        assert!(result.text.starts_with("**RESEARCH INQUIRY:"));
        assert!((result.confidence - DEEP_NO_MATCH_CONFIDENCE).abs() < 1e-6);
    }
}
