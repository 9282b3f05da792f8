//! 助手门面：单一入口 respond
//!
//! 流程：口语开关指令 → Query 规范化 → 意图分类 → 按层级的级联 → Finalizer → 思考过程与追问建议。
//! 对话历史只读；写回历史、保存 StyleSettings 由调用方负责。

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cascade::{
    build_cascade, Attachment, Cascade, Collaborators, HandlerContext, HandlerResult, SideChannel,
    Tier,
};
use crate::config::AppConfig;
use crate::finalizer::{Finalizer, InterjectionStyler, StyleSettings, TextStyleEnhancer};
use crate::intent::{Complexity, IntentClassifier, IntentDescriptor, Query, TopicFlags};
use crate::memory::ConversationContext;

const ENABLE_COMMANDS: &[&str] = &[
    "enable slangs", "activate slangs", "turn on slangs", "enable slang", "activate slang",
];
const DISABLE_COMMANDS: &[&str] = &[
    "disable slangs", "stop slangs", "turn off slangs", "disable slang", "no slangs",
];

const THINKING_PREVIEW_CHARS: usize = 50;

/// 思考过程的步骤模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThinkingKind {
    Quick,
    Research,
    Conversation,
    Analysis,
}

impl ThinkingKind {
    fn steps(&self) -> &'static [&'static str] {
        match self {
            Self::Quick => &["Analyzing input...", "Formulating response...", "Optimizing output..."],
            Self::Research => &[
                "Identifying key topics...",
                "Searching knowledge sources...",
                "Synthesizing information...",
                "Structuring comprehensive response...",
            ],
            Self::Conversation => &[
                "Understanding context...",
                "Identifying intent...",
                "Crafting natural response...",
            ],
            Self::Analysis => &[
                "Examining content structure...",
                "Extracting key information...",
                "Identifying patterns...",
                "Generating insights...",
            ],
        }
    }
}

fn topic_names(topics: &TopicFlags) -> Vec<&'static str> {
    [
        (topics.science, "science"),
        (topics.history, "history"),
        (topics.technology, "technology"),
        (topics.geography, "geography"),
        (topics.personal, "personal"),
        (topics.philosophy, "philosophy"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect()
}

/// 复杂问题先拆分；识别到话题时列出
fn thinking_trace(text: &str, kind: ThinkingKind, intent: &IntentDescriptor) -> String {
    let preview: String = text.chars().take(THINKING_PREVIEW_CHARS).collect();
    let complexity = match intent.complexity {
        Complexity::Simple => "simple",
        Complexity::Moderate => "moderate",
        Complexity::Complex => "complex",
    };
    let mut out = format!("Analyzing: '{preview}'\nComplexity: {complexity}\n");
    let topics = topic_names(&intent.topics);
    if !topics.is_empty() {
        out.push_str(&format!("Topics: {}\n", topics.join(", ")));
    }
    out.push_str("\nProcessing:\n");

    let mut steps: Vec<&str> = Vec::new();
    if intent.complexity == Complexity::Complex {
        steps.push("Breaking the question into parts...");
    }
    steps.extend(kind.steps());
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, step));
    }
    out
}

fn suggestions(tier: Tier) -> Vec<String> {
    let pair: [&str; 2] = match tier {
        Tier::Fast => ["Want to explore this topic further?", "Should we discuss something else?"],
        Tier::Detailed => ["Would you like citations for any claims?", "Should we dive deeper into any aspect?"],
        Tier::Advanced => ["Want to see an optimized version?", "Should I explain this in more detail?"],
    };
    pair.iter().map(|s| s.to_string()).collect()
}

/// 口语开关指令：Some(true) 开启，Some(false) 关闭
pub fn style_toggle(text: &str) -> Option<bool> {
    let lower = text.trim().to_lowercase();
    let lower = lower.trim_matches(|c| c == '!' || c == '.');
    if ENABLE_COMMANDS.iter().any(|c| lower.contains(c)) {
        Some(true)
    } else if DISABLE_COMMANDS.iter().any(|c| lower.contains(c)) {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct AssistantRequest {
    pub text: String,
    pub tier: Tier,
    pub attachment: Option<Attachment>,
    pub style: StyleSettings,
    pub include_thinking: bool,
}

impl AssistantRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tier: Tier::default(),
            attachment: None,
            style: StyleSettings::default(),
            include_thinking: false,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_style(mut self, style: StyleSettings) -> Self {
        self.style = style;
        self
    }

    pub fn with_thinking(mut self, include: bool) -> Self {
        self.include_thinking = include;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub result: HandlerResult,
    /// 产出结果的处理器名
    pub handler: String,
    pub tier: Tier,
    pub thinking: Option<String>,
    pub suggestions: Vec<String>,
}

pub struct Assistant {
    config: AppConfig,
    fast: Cascade,
    detailed: Cascade,
    advanced: Cascade,
    finalizer: Finalizer,
}

impl Assistant {
    pub fn new(
        config: AppConfig,
        collaborators: Collaborators,
        styler: Arc<dyn TextStyleEnhancer>,
    ) -> Self {
        Self {
            fast: build_cascade(Tier::Fast, &collaborators, &config),
            detailed: build_cascade(Tier::Detailed, &collaborators, &config),
            advanced: build_cascade(Tier::Advanced, &collaborators, &config),
            finalizer: Finalizer::new(styler),
            config,
        }
    }

    /// HTTP 适配器 + 配置中的点缀词表
    pub fn from_config(config: AppConfig) -> Self {
        let collaborators = Collaborators::http(&config.sources);
        let styler = Arc::new(InterjectionStyler::from_config(&config.style));
        Self::new(config, collaborators, styler)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn cascade(&self, tier: Tier) -> &Cascade {
        match tier {
            Tier::Fast => &self.fast,
            Tier::Detailed => &self.detailed,
            Tier::Advanced => &self.advanced,
        }
    }

    pub async fn respond(
        &self,
        request: &AssistantRequest,
        history: &dyn ConversationContext,
    ) -> AssistantReply {
        let tier = request.tier;

        if let Some(enabled) = style_toggle(&request.text) {
            let text = if enabled {
                "Slangs have been enabled. I'm ready to chat with some local flavor!"
            } else {
                "Slangs have been disabled. I will keep the conversation formal and standard from now on."
            };
            info!(tier = %tier, enabled, "style toggled");
            return AssistantReply {
                result: HandlerResult::conversational(text, 1.0)
                    .with_side_channel(SideChannel::StyleToggle { enabled }),
                handler: "style_toggle".to_string(),
                tier,
                thinking: None,
                suggestions: suggestions(tier),
            };
        }

        let query = Query::new(request.text.as_str());
        let intent = IntentClassifier::classify(&query);
        let recent = history.recent(self.config.app.history_depth);
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &recent,
            attachment: request.attachment.as_ref(),
        };

        let outcome = self.cascade(tier).run(&ctx).await;
        let result = self
            .finalizer
            .finalize(outcome.result, tier, &request.text, request.style);

        info!(
            tier = %tier,
            handler = %outcome.handler,
            confidence = result.confidence,
            "request handled"
        );

        let thinking = request.include_thinking.then(|| {
            let kind = match tier {
                Tier::Fast => ThinkingKind::Quick,
                Tier::Detailed if intent.research => ThinkingKind::Research,
                Tier::Detailed => ThinkingKind::Conversation,
                Tier::Advanced => ThinkingKind::Analysis,
            };
            thinking_trace(&request.text, kind, &intent)
        });

        AssistantReply {
            result,
            handler: outcome.handler,
            tier,
            thinking,
            suggestions: suggestions(tier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finalizer::NoopStyler;
    use crate::memory::ConversationMemory;
    use crate::sources::mock::{
        EmptyCodeSearch, StaticFinanceSource, StaticReferenceSource, StaticWeatherSource,
        StaticWebSource,
    };

    fn assistant() -> Assistant {
        let collaborators = Collaborators {
            reference: Arc::new(StaticReferenceSource::new()),
            web: Arc::new(StaticWebSource::new(vec![])),
            weather: Arc::new(StaticWeatherSource::new()),
            finance: Arc::new(StaticFinanceSource::new()),
            code: Arc::new(EmptyCodeSearch::new()),
        };
        Assistant::new(AppConfig::default(), collaborators, Arc::new(NoopStyler))
    }

    #[test]
    fn test_style_toggle_commands() {
        assert_eq!(style_toggle("Enable slangs!"), Some(true));
        assert_eq!(style_toggle("please turn off slangs"), Some(false));
        assert_eq!(style_toggle("no slangs."), Some(false));
        assert_eq!(style_toggle("what is slang"), None);
    }

    #[test]
    fn test_thinking_trace_prefix_and_steps() {
        let text = "x".repeat(80);
        let trace = thinking_trace(&text, ThinkingKind::Research, &IntentDescriptor::default());
        assert!(trace.starts_with(&format!("Analyzing: '{}'\nComplexity: simple\n\n", "x".repeat(50))));
        assert!(!trace.contains("Topics:"));
        assert!(trace.contains("4. Structuring comprehensive response..."));
    }

    #[test]
    fn test_thinking_trace_reflects_complexity_and_topics() {
        let text = "Can you explain the history of the internet and how computer networks grew across every country in the world? What came first?";
        let intent = IntentClassifier::classify(&Query::new(text));
        assert_eq!(intent.complexity, Complexity::Complex);

        let trace = thinking_trace(text, ThinkingKind::Research, &intent);
        assert!(trace.contains("Complexity: complex"));
        assert!(trace.contains("Topics: history, technology, geography"));
        assert!(trace.contains("1. Breaking the question into parts..."));
        assert!(trace.contains("5. Structuring comprehensive response..."));
    }

    #[tokio::test]
    async fn test_toggle_short_circuits_with_side_channel() {
        let reply = assistant()
            .respond(&AssistantRequest::new("enable slang"), &ConversationMemory::new(5))
            .await;
        assert_eq!(reply.handler, "style_toggle");
        assert_eq!(reply.result.confidence, 1.0);
        assert_eq!(
            reply.result.side_channel,
            Some(SideChannel::StyleToggle { enabled: true })
        );
    }

    #[tokio::test]
    async fn test_reply_carries_thinking_and_suggestions() {
        let request = AssistantRequest::new("tell me a joke")
            .with_tier(Tier::Detailed)
            .with_thinking(true);
        let reply = assistant().respond(&request, &ConversationMemory::new(5)).await;
        assert_eq!(reply.handler, "entertainment");
        assert_eq!(reply.tier, Tier::Detailed);
        assert_eq!(reply.suggestions.len(), 2);
        let thinking = reply.thinking.unwrap();
        assert!(thinking.contains("Understanding context..."));
    }
}
