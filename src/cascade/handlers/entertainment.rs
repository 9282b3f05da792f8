//! 笑话

use async_trait::async_trait;

use super::Rotation;
use crate::cascade::{Handler, HandlerContext, HandlerResult, Tier};
use crate::core::CascadeError;

const SHORT_JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything!",
    "Why did the scarecrow win an award? He was outstanding in his field!",
    "What do you call a fake noodle? An impasta! 🍝",
    "Why don't eggs tell jokes? They'd crack each other up!",
    "Why did the tomato turn red? Because it saw the salad dressing!",
    "Parallel lines have so much in common, but they'll never meet.",
];

const RESEARCH_JOKES: &[&str] = &[
    "Why did the researcher break up with the encyclopedia? There were too many redirects, and they just couldn't commit to one article! \
     It was a classic case of information overload. But seriously, I'd be happy to help you find reliable sources on any topic! 📚",
    "What do you call a scientist who loves to dance? A step-researcher! They really know how to move through the data. \
     I'd love to help you find information that's equally engaging! 🎵",
    "Why don't scientists trust atoms? Because they make up everything, literally! And I've thoroughly researched this claim. \
     Speaking of research, is there a topic you'd like me to investigate for you? ⚛️",
];

pub struct JokeHandler {
    tier: Tier,
    rotation: Rotation,
}

impl JokeHandler {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            rotation: Rotation::default(),
        }
    }
}

#[async_trait]
impl Handler for JokeHandler {
    fn name(&self) -> &str {
        "entertainment"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.entertainment
    }

    async fn handle(&self, _ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let result = match self.tier {
            Tier::Detailed => HandlerResult::conversational(self.rotation.pick(RESEARCH_JOKES), 0.91),
            Tier::Fast | Tier::Advanced => HandlerResult::conversational(
                format!(
                    "{} 😄 Hope that brought a smile to your face!",
                    self.rotation.pick(SHORT_JOKES)
                ),
                0.92,
            ),
        };
        Ok(Some(result))
    }
}
