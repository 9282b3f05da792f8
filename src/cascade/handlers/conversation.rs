//! 长对话：个人感受与哲学话题（详细层级）

use async_trait::async_trait;

use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;

const PERSONAL_TEXT: &str = "Thank you so much for sharing your thoughts with me. \
     I genuinely value the trust you're placing in our conversation, and I'm here to listen. \
     Your perspective is unique and important, and I appreciate you expressing it. \
     Would you like to explore these thoughts further together, or should I look up some information related to what you're experiencing? \
     I'm here either way, whether you want to keep talking it through or want some resources that might help. \
     What would feel most helpful to you right now?";

const PHILOSOPHY_TEXT: &str = "That's a truly profound question that has fascinated thinkers for centuries! \
     Questions about meaning, purpose and existence touch the very core of human experience. \
     Philosophers, scientists and spiritual traditions have all offered their own answers. \
     I'd be happy to help you explore different perspectives, from ancient schools of thought to modern scientific understanding. \
     We could look at existentialist philosophy, religious perspectives, or scientific approaches to consciousness. \
     Would you like me to research a specific tradition or theory related to your question? \
     Or would you prefer to talk through your own thoughts first?";

/// 用户分享个人想法 / 感受
pub struct PersonalHandler;

#[async_trait]
impl Handler for PersonalHandler {
    fn name(&self) -> &str {
        "personal"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.topics.personal
    }

    async fn handle(&self, _ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        Ok(Some(HandlerResult::conversational(PERSONAL_TEXT, 0.93)))
    }
}

/// 意义、目的、存在等问题
pub struct PhilosophyHandler;

#[async_trait]
impl Handler for PhilosophyHandler {
    fn name(&self) -> &str {
        "philosophy"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.topics.philosophy
    }

    async fn handle(&self, _ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        Ok(Some(HandlerResult::conversational(PHILOSOPHY_TEXT, 0.92)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentClassifier, Query};

    #[tokio::test]
    async fn test_guards_follow_topic_flags() {
        let query = Query::new("what is the meaning of life");
        let intent = IntentClassifier::classify(&query);
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &[],
            attachment: None,
        };
        assert!(PhilosophyHandler.guard(&ctx));
        assert!(!PersonalHandler.guard(&ctx));
        let result = PhilosophyHandler.handle(&ctx).await.unwrap().unwrap();
        assert!((result.confidence - 0.92).abs() < 1e-6);
        // 详细层级的 5-10 句范围内
        let sentences = result.text.split(". ").count();
        assert!((5..=10).contains(&sentences));
    }
}
