//! 处理器级联（路由）
//!
//! 每个层级是一张有序的 (guard, handler) 表：先用同一个 IntentDescriptor 一次性算出全部守卫，
//! 再按优先级依次调用守卫成立的处理器，第一个给出结果的处理器胜出，其余跳过。
//! 处理器返回 `Ok(None)` 表示「不适用」，不是错误；返回 `Err` 时在处理器边界转为 0.50 的文本兜底。

pub mod handlers;
pub mod tiers;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::CascadeError;
use crate::intent::{IntentDescriptor, Query};
use crate::memory::Message;

pub use tiers::{build_cascade, Collaborators, Tier};

/// 处理器出错时的兜底置信度
pub const ERROR_FALLBACK_CONFIDENCE: f32 = 0.50;
/// 通用默认回复的置信度
pub const DEFAULT_CONFIDENCE: f32 = 0.85;

const ERROR_FALLBACK_TEXT: &str =
    "Something went wrong while I was working on that. Could you try asking again in a different way?";
const DEFAULT_TEXT: &str =
    "Interesting! Tell me more about what you're looking for. I'm here to help!";

/// 结果内容类别：只有 conversational 会被口语化点缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Conversational,
    Technical,
    Research,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Pie,
    Bar,
    Line,
    Scatter,
    Histogram,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Histogram => "histogram",
        }
    }
}

/// 图表描述（渲染由外部完成）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub data: Vec<i64>,
    pub labels: Vec<String>,
    pub title: String,
}

/// 随文本一起返回给调用方的附加信号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SideChannel {
    Chart(ChartSpec),
    /// 调用方应把该开关写回自己的会话 StyleSettings
    StyleToggle { enabled: bool },
}

/// 调用方已提取好文本的附件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// 如 "pdf"、"csv"
    pub kind: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResult {
    pub text: String,
    pub confidence: f32,
    pub sources: Vec<String>,
    pub content_kind: ContentKind,
    pub side_channel: Option<SideChannel>,
}

impl HandlerResult {
    pub fn new(text: impl Into<String>, confidence: f32, content_kind: ContentKind) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            sources: Vec::new(),
            content_kind,
            side_channel: None,
        }
    }

    pub fn conversational(text: impl Into<String>, confidence: f32) -> Self {
        Self::new(text, confidence, ContentKind::Conversational)
    }

    pub fn technical(text: impl Into<String>, confidence: f32) -> Self {
        Self::new(text, confidence, ContentKind::Technical)
    }

    pub fn research(text: impl Into<String>, confidence: f32) -> Self {
        Self::new(text, confidence, ContentKind::Research)
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_side_channel(mut self, side_channel: SideChannel) -> Self {
        self.side_channel = Some(side_channel);
        self
    }
}

/// 单次请求中处理器可见的全部输入（只读）
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    pub query: &'a Query,
    pub intent: &'a IntentDescriptor,
    /// 最近的对话历史（时间正序）
    pub history: &'a [Message],
    pub attachment: Option<&'a Attachment>,
}

#[async_trait]
pub trait Handler: Send + Sync {
    /// 处理器名称（日志与 AssistantReply.handler）
    fn name(&self) -> &str;

    /// 是否适用；只读 IntentDescriptor 与上下文，不做 I/O
    fn guard(&self, ctx: &HandlerContext<'_>) -> bool;

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError>;
}

/// 级联产出：胜出的处理器名 + 结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeOutcome {
    pub handler: String,
    pub result: HandlerResult,
}

/// 有序处理器表 + 通用的「先到先得」驱动
#[derive(Default)]
pub struct Cascade {
    handlers: Vec<Arc<dyn Handler>>,
}

impl Cascade {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按优先级追加处理器（先注册者优先）
    pub fn register(&mut self, handler: impl Handler + 'static) {
        self.handlers.push(Arc::new(handler));
    }

    pub fn with(mut self, handler: impl Handler + 'static) -> Self {
        self.register(handler);
        self
    }

    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.name().to_string()).collect()
    }

    /// 总能给出结果：没有处理器产出时返回通用默认回复
    pub async fn run(&self, ctx: &HandlerContext<'_>) -> CascadeOutcome {
        let guards: Vec<bool> = self.handlers.iter().map(|h| h.guard(ctx)).collect();
        debug!(
            flags = ?ctx.intent.active_flags().collect::<Vec<_>>(),
            guards = ?self
                .handlers
                .iter()
                .zip(&guards)
                .filter(|(_, g)| **g)
                .map(|(h, _)| h.name())
                .collect::<Vec<_>>(),
            "cascade guards evaluated"
        );

        for (handler, fired) in self.handlers.iter().zip(guards) {
            if !fired {
                continue;
            }
            match handler.handle(ctx).await {
                Ok(Some(result)) => {
                    return CascadeOutcome {
                        handler: handler.name().to_string(),
                        result,
                    }
                }
                Ok(None) => debug!(handler = handler.name(), "handler declined"),
                Err(e) => {
                    warn!(handler = handler.name(), error = %e, "handler failed, using fallback");
                    return CascadeOutcome {
                        handler: handler.name().to_string(),
                        result: HandlerResult::conversational(
                            ERROR_FALLBACK_TEXT,
                            ERROR_FALLBACK_CONFIDENCE,
                        ),
                    };
                }
            }
        }

        CascadeOutcome {
            handler: "default".to_string(),
            result: HandlerResult::conversational(DEFAULT_TEXT, DEFAULT_CONFIDENCE),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::intent::IntentClassifier;

    /// 测试用处理器：守卫与产出均可配置，并记录调用次数
    struct Probe {
        name: &'static str,
        fires: bool,
        outcome: fn() -> Result<Option<HandlerResult>, CascadeError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn guard(&self, _ctx: &HandlerContext<'_>) -> bool {
            self.fires
        }

        async fn handle(&self, _ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn probe(
        name: &'static str,
        fires: bool,
        outcome: fn() -> Result<Option<HandlerResult>, CascadeError>,
    ) -> (Probe, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Probe {
                name,
                fires,
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }

    async fn run(cascade: &Cascade) -> CascadeOutcome {
        let query = Query::new("anything");
        let intent = IntentClassifier::classify(&query);
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &[],
            attachment: None,
        };
        cascade.run(&ctx).await
    }

    #[tokio::test]
    async fn test_first_producing_handler_wins() {
        let (declines, declines_calls) = probe("declines", true, || Ok(None));
        let (skipped, skipped_calls) = probe("skipped", false, || {
            Ok(Some(HandlerResult::conversational("never", 1.0)))
        });
        let (wins, _) = probe("wins", true, || Ok(Some(HandlerResult::technical("yes", 0.9))));
        let (later, later_calls) = probe("later", true, || {
            Ok(Some(HandlerResult::conversational("late", 0.9)))
        });
        let cascade = Cascade::new().with(declines).with(skipped).with(wins).with(later);

        let outcome = run(&cascade).await;
        assert_eq!(outcome.handler, "wins");
        assert_eq!(outcome.result.text, "yes");
        assert_eq!(declines_calls.load(Ordering::SeqCst), 1);
        assert_eq!(skipped_calls.load(Ordering::SeqCst), 0);
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_error_becomes_low_confidence_fallback() {
        let (broken, _) = probe("broken", true, || Err(CascadeError::handler("broken", "boom")));
        let (after, after_calls) = probe("after", true, || {
            Ok(Some(HandlerResult::conversational("ok", 0.9)))
        });
        let outcome = run(&Cascade::new().with(broken).with(after)).await;
        assert!((outcome.result.confidence - ERROR_FALLBACK_CONFIDENCE).abs() < f32::EPSILON);
        assert_eq!(outcome.result.content_kind, ContentKind::Conversational);
        assert_eq!(after_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_cascade_yields_default() {
        let outcome = run(&Cascade::new()).await;
        assert_eq!(outcome.handler, "default");
        assert!((outcome.result.confidence - DEFAULT_CONFIDENCE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_result_confidence_is_clamped() {
        assert_eq!(HandlerResult::research("x", 1.7).confidence, 1.0);
        assert_eq!(HandlerResult::research("x", -0.2).confidence, 0.0);
    }
}
