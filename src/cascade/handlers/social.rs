//! 寒暄类处理器：问候、告别、致谢、问候近况、自我介绍
//!
//! 同一个 SocialHandler 按 (kind, tier) 选择措辞；问候会参考对话历史判断是否为追问。

use async_trait::async_trait;

use super::Rotation;
use crate::cascade::{Handler, HandlerContext, HandlerResult, Tier};
use crate::core::CascadeError;
use crate::memory::assistant_asked_question;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialKind {
    Greeting,
    Farewell,
    Gratitude,
    PersonalStatus,
    Identity,
}

impl SocialKind {
    fn handler_name(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Farewell => "farewell",
            Self::Gratitude => "gratitude",
            Self::PersonalStatus => "personal_status",
            Self::Identity => "identity",
        }
    }
}

const FAST_FAREWELLS: &[&str] = &[
    "Goodbye! Thanks for chatting with me. Take care and come back anytime you need quick help! 👋",
    "See you later! It was great helping you out today. Have an awesome day!",
    "Bye for now! Don't hesitate to return if you need fast answers to anything!",
];

const FAST_GRATITUDE: &[&str] = &[
    "You're very welcome! Happy I could help quickly. Let me know if you need anything else! 😊",
    "Anytime! That's what I'm here for. Feel free to ask more questions anytime!",
    "Glad I could assist! Don't hesitate to reach out if you need more quick answers!",
];

const FAST_STATUS: &[&str] = &[
    "I'm doing fantastic, thanks for asking! All systems are running smoothly and I'm ready to help. How about you?",
    "Excellent! I'm energized and ready to assist. Thanks for checking in! How are you feeling today?",
    "I'm great! Optimized and ready for quick responses. What's new with you?",
];

const DETAILED_STATUS: &[&str] = &[
    "I'm doing wonderfully, thank you so much for asking! I truly appreciate you checking in on me. \
     I'm fully energized and ready to tackle any research questions or conversation topics you might have today. \
     My knowledge sources are ready, which means I can give you comprehensive, detailed responses. \
     How about yourself? Is there a particular topic you're curious about or something you'd like to explore together?",
    "I'm excellent, and I really appreciate you asking! It means a lot that you'd check in. \
     I'm completely ready to dive deep into research or have a meaningful conversation with you. \
     All my knowledge sources are prepared to provide detailed analysis. \
     How are you feeling today? I'd genuinely like to know what's on your mind and how I can help!",
];

const DETAILED_GRATITUDE: &str = "You're absolutely welcome! I'm truly delighted that I could be helpful to you. \
     It brings me genuine satisfaction to know that the research or conversation was useful. \
     Please don't hesitate to reach out whenever you need assistance, whether it's deep research on complex topics or a friendly chat. \
     I'm always here and ready to provide detailed, thoughtful responses. \
     Is there anything else I can help you explore or understand better today?";

const DETAILED_FAREWELL: &str = "Goodbye for now! It's been an absolute pleasure chatting with you and helping with your questions. \
     I really enjoyed our conversation and any research we did together. \
     You're always welcome to return whenever you need deep research, detailed analysis or a friendly conversation. \
     I'll be here with comprehensive knowledge and a willingness to help. \
     Take good care of yourself, and I hope to see you again soon! 👋";

const ADVANCED_FAREWELL: &str =
    "Goodbye! Come back whenever you have code to write, data to analyze or a site to build. 👋";

const ADVANCED_GRATITUDE: &str =
    "You're welcome! Glad that was useful. What are we building next?";

const ADVANCED_STATUS: &str =
    "Running at full capacity and ready to build! How are you doing? Got a project in mind?";

/// 问候 / 寒暄处理器
pub struct SocialHandler {
    kind: SocialKind,
    tier: Tier,
    assistant_name: String,
    rotation: Rotation,
}

impl SocialHandler {
    pub fn new(kind: SocialKind, tier: Tier, assistant_name: impl Into<String>) -> Self {
        Self {
            kind,
            tier,
            assistant_name: assistant_name.into(),
            rotation: Rotation::default(),
        }
    }

    fn greeting(&self, ctx: &HandlerContext<'_>) -> (String, f32) {
        let name = &self.assistant_name;
        match self.tier {
            Tier::Fast => {
                if assistant_asked_question(ctx.history) {
                    ("I'm listening! Go on.".to_string(), 0.99)
                } else if ctx.history.is_empty() {
                    (
                        format!(
                            "Hey there! Welcome! I'm {name}, your quick assistant. \
                             I'm here to help with fast answers and friendly chat. What can I do for you today?"
                        ),
                        0.98,
                    )
                } else {
                    (
                        "Hey! Great to see you again! Ready when you are. What's on your mind today?".to_string(),
                        0.97,
                    )
                }
            }
            Tier::Detailed => {
                if !ctx.history.is_empty() {
                    (
                        "Hello again! It's wonderful to continue our conversation. \
                         I'm ready to dive deeper into any topic you'd like to explore. \
                         Whether you need comprehensive research on a specific subject or an engaging conversation, I'm here to provide detailed insights. \
                         What direction would you like to take our discussion today? \
                         I'm particularly excited to help with any research questions you might have in mind!"
                            .to_string(),
                        0.97,
                    )
                } else {
                    (
                        format!(
                            "Hello! I'm {name}, your dedicated research and conversation companion. \
                             I'm genuinely excited to help you explore whatever topics interest you today. \
                             Whether you're looking for in-depth research, detailed analysis of complex subjects, or an engaging conversation, I'm fully equipped to assist. \
                             I specialize in comprehensive information with context and several perspectives. \
                             What would you like to dive into?"
                        ),
                        0.96,
                    )
                }
            }
            Tier::Advanced => (
                format!(
                    "Hello! I'm {name}, your advanced assistant. I can help you build websites, write code, \
                     analyze data, and create visualizations. What are we building today?"
                ),
                0.96,
            ),
        }
    }

    fn identity(&self) -> (String, f32) {
        let name = &self.assistant_name;
        match self.tier {
            Tier::Fast => (
                format!(
                    "I'm {name}, your quick-thinking assistant! I specialize in fast, clear responses to help you get answers quickly. \
                     I can chat, answer questions, or help with simple tasks. What do you need?"
                ),
                0.96,
            ),
            Tier::Detailed => (
                format!(
                    "I'm {name}, your research companion and conversational partner! \
                     I'm designed to provide deep, comprehensive insights on any topic you're curious about. \
                     My main strength is thorough encyclopedia and web research combined with natural conversation. \
                     I can break down complex subjects, look at them from several angles, and keep track of our discussion. \
                     What would you like to explore together?"
                ),
                0.95,
            ),
            Tier::Advanced => (
                format!(
                    "I'm {name}, the most capable tier. I can:\n\n\
                     🚀 **Build Websites** - ask me to 'build a landing page' or 'create a portfolio'\n\
                     💻 **Programming** - snippets in Python, JavaScript, Rust and more\n\
                     📊 **Data Insights** - analyze numbers and describe charts\n\
                     📁 **File Intelligence** - overview of attached documents"
                ),
                0.96,
            ),
        }
    }

    fn respond(&self, ctx: &HandlerContext<'_>) -> (String, f32) {
        match (self.kind, self.tier) {
            (SocialKind::Greeting, _) => self.greeting(ctx),
            (SocialKind::Identity, _) => self.identity(),
            (SocialKind::Farewell, Tier::Fast) => (self.rotation.pick(FAST_FAREWELLS).to_string(), 0.98),
            (SocialKind::Farewell, Tier::Detailed) => (DETAILED_FAREWELL.to_string(), 0.97),
            (SocialKind::Farewell, Tier::Advanced) => (ADVANCED_FAREWELL.to_string(), 0.96),
            (SocialKind::Gratitude, Tier::Fast) => (self.rotation.pick(FAST_GRATITUDE).to_string(), 0.96),
            (SocialKind::Gratitude, Tier::Detailed) => (DETAILED_GRATITUDE.to_string(), 0.96),
            (SocialKind::Gratitude, Tier::Advanced) => (ADVANCED_GRATITUDE.to_string(), 0.96),
            (SocialKind::PersonalStatus, Tier::Fast) => (self.rotation.pick(FAST_STATUS).to_string(), 0.94),
            (SocialKind::PersonalStatus, Tier::Detailed) => {
                (self.rotation.pick(DETAILED_STATUS).to_string(), 0.94)
            }
            (SocialKind::PersonalStatus, Tier::Advanced) => (ADVANCED_STATUS.to_string(), 0.94),
        }
    }
}

#[async_trait]
impl Handler for SocialHandler {
    fn name(&self) -> &str {
        self.kind.handler_name()
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        let intent = ctx.intent;
        match self.kind {
            SocialKind::Greeting => intent.greeting,
            SocialKind::Farewell => intent.farewell,
            SocialKind::Gratitude => intent.gratitude,
            SocialKind::PersonalStatus => intent.personal_status,
            SocialKind::Identity => intent.identity,
        }
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let (text, confidence) = self.respond(ctx);
        Ok(Some(HandlerResult::conversational(text, confidence)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentClassifier, Query};
    use crate::memory::Message;

    async fn greet(tier: Tier, history: &[Message]) -> HandlerResult {
        let query = Query::new("hello");
        let intent = IntentClassifier::classify(&query);
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history,
            attachment: None,
        };
        let handler = SocialHandler::new(SocialKind::Greeting, tier, "Lumen");
        assert!(handler.guard(&ctx));
        handler.handle(&ctx).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_fast_greeting_depends_on_history() {
        let fresh = greet(Tier::Fast, &[]).await;
        assert!(fresh.text.contains("I'm Lumen"));
        assert!(fresh.text.contains('?'));
        assert!((fresh.confidence - 0.98).abs() < 1e-6);

        let asked = [Message::user("hi"), Message::assistant("What can I do for you?")];
        let listening = greet(Tier::Fast, &asked).await;
        assert_eq!(listening.text, "I'm listening! Go on.");
        assert!((listening.confidence - 0.99).abs() < 1e-6);

        let answered = [Message::user("thanks"), Message::assistant("Glad I could help.")];
        let again = greet(Tier::Fast, &answered).await;
        assert!(again.text.contains("Great to see you again"));
    }

    #[tokio::test]
    async fn test_detailed_greeting_follow_up() {
        let history = [Message::user("what is rust"), Message::assistant("Rust is a language.")];
        assert!(greet(Tier::Detailed, &history).await.text.starts_with("Hello again"));
        let intro = greet(Tier::Detailed, &[]).await;
        assert!(intro.text.contains("I'm Lumen"));
        assert!((intro.confidence - 0.96).abs() < 1e-6);
    }

    #[test]
    fn test_fast_farewell_rotates() {
        let handler = SocialHandler::new(SocialKind::Farewell, Tier::Fast, "Lumen");
        let query = Query::new("bye");
        let intent = IntentClassifier::classify(&query);
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &[],
            attachment: None,
        };
        let (first, c) = handler.respond(&ctx);
        let (second, _) = handler.respond(&ctx);
        assert_ne!(first, second);
        assert!((c - 0.98).abs() < 1e-6);
    }
}
