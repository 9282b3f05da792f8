//! 兜底链：很短的输入先试一次参考源查询，否则给出通用引导语

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::research::with_related;
use super::Rotation;
use crate::cascade::{Handler, HandlerContext, HandlerResult, Tier, DEFAULT_CONFIDENCE};
use crate::core::CascadeError;
use crate::knowledge::{
    best_match, FanOut, KnowledgeRetriever, RelevanceRanker, Retrieval, SynthesisPath, Synthesizer,
};

const SHORT_LOOKUP_CONFIDENCE: f32 = 0.90;

const FAST_PROMPTS: &[&str] = &[
    "Interesting! Tell me more about what you're looking for. I'm here to help!",
    "I see! What's the main thing you need help with? I'm ready to assist!",
    "Got it! How can I make this easier for you? Let me know what you need!",
    "Understood! What specific information do you need? I'll get it for you fast!",
];

const DETAILED_PROMPTS: &[&str] = &[
    "That's a fascinating topic to explore! I'm genuinely interested in helping you dive deeper into this subject. \
     Based on what you've shared, this is something worth examining in detail. \
     Would you like me to research it and bring back comprehensive information? \
     Or would you prefer to talk through your thoughts and questions first? \
     I'm here to help in whatever way is most valuable to you!",
    "I appreciate you bringing this up! It's clear you have an inquisitive mind, and I'd love to help you explore this further. \
     This seems like a topic that could benefit from deeper investigation. \
     I can search for detailed information, lay out several perspectives, and help you understand the nuances. \
     What specific aspect interests you most? I'm ready to provide comprehensive insights!",
];

const ADVANCED_PROMPTS: &[&str] = &[
    "I'm ready to help with your project! I can build web structures, write code, analyze numbers or chart your data. \
     What's the next step for us?",
];

pub struct FallbackHandler {
    tier: Tier,
    retriever: Arc<KnowledgeRetriever>,
    fan_out: FanOut,
    threshold: f32,
    rotation: Rotation,
}

impl FallbackHandler {
    pub fn new(tier: Tier, retriever: Arc<KnowledgeRetriever>, fan_out: FanOut, threshold: f32) -> Self {
        Self {
            tier,
            retriever,
            fan_out,
            threshold,
            rotation: Rotation::default(),
        }
    }

    fn prompt(&self) -> HandlerResult {
        let prompts = match self.tier {
            Tier::Fast => FAST_PROMPTS,
            Tier::Detailed => DETAILED_PROMPTS,
            Tier::Advanced => ADVANCED_PROMPTS,
        };
        HandlerResult::conversational(self.rotation.pick(prompts), DEFAULT_CONFIDENCE)
    }

    /// 把输入当作词条名查一次；没有足够相关的结果时返回 None
    async fn short_lookup(&self, query: &str) -> Option<HandlerResult> {
        let Retrieval::Candidates(candidates) = self.retriever.retrieve(query, self.fan_out).await else {
            return None;
        };
        let ranked = RelevanceRanker::for_query(query).rank(candidates);
        let best = best_match(&ranked, self.threshold)?;
        let report = Synthesizer::synthesize(best, &ranked[1..], SynthesisPath::Fast);
        Some(
            HandlerResult::research(with_related(&report.overview, &report.references), SHORT_LOOKUP_CONFIDENCE)
                .with_sources(report.references),
        )
    }
}

#[async_trait]
impl Handler for FallbackHandler {
    fn name(&self) -> &str {
        "fallback"
    }

    fn guard(&self, _ctx: &HandlerContext<'_>) -> bool {
        true
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        if ctx.intent.simple_task {
            if let Some(result) = self.short_lookup(ctx.query.raw.trim()).await {
                return Ok(Some(result));
            }
            debug!("short lookup found nothing, using prompt");
        }
        Ok(Some(self.prompt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentClassifier, Query};
    use crate::sources::mock::{StaticReferenceSource, StaticWebSource};

    fn handler(reference: StaticReferenceSource) -> FallbackHandler {
        let retriever = Arc::new(KnowledgeRetriever::new(
            Arc::new(reference),
            Arc::new(StaticWebSource::new(vec![])),
        ));
        FallbackHandler::new(Tier::Fast, retriever, FanOut::new(1, 1), 0.25)
    }

    async fn run(handler: &FallbackHandler, text: &str) -> HandlerResult {
        let query = Query::new(text);
        let intent = IntentClassifier::classify(&query);
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &[],
            attachment: None,
        };
        handler.handle(&ctx).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_short_input_is_looked_up() {
        let h = handler(StaticReferenceSource::new().with_entry(
            "Jupiter",
            "Jupiter is the fifth planet from the Sun and the largest in the Solar System.",
        ));
        let result = run(&h, "Jupiter").await;
        assert!(result.text.starts_with("Jupiter is the fifth planet"));
        assert!((result.confidence - SHORT_LOOKUP_CONFIDENCE).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_long_or_unknown_input_gets_prompt() {
        let h = handler(StaticReferenceSource::new());
        let unknown = run(&h, "Zorblax").await;
        assert!((unknown.confidence - DEFAULT_CONFIDENCE).abs() < 1e-6);

        let long = run(&h, "I want something but I am not sure what it is yet").await;
        assert!((long.confidence - DEFAULT_CONFIDENCE).abs() < 1e-6);
        assert_eq!(long.content_kind, crate::cascade::ContentKind::Conversational);
    }
}
