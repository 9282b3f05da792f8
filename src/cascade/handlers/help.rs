//! 能力介绍

use async_trait::async_trait;

use crate::cascade::{Handler, HandlerContext, HandlerResult, Tier};
use crate::core::CascadeError;

pub struct HelpHandler {
    tier: Tier,
    assistant_name: String,
}

impl HelpHandler {
    pub fn new(tier: Tier, assistant_name: impl Into<String>) -> Self {
        Self {
            tier,
            assistant_name: assistant_name.into(),
        }
    }

    fn text(&self) -> (String, f32) {
        let name = &self.assistant_name;
        match self.tier {
            Tier::Fast => (
                format!(
                    "I'm {name}, your quick assistant! I can answer questions, chat with you, look up quick facts, \
                     check the time or weather, and help with simple math. I'm all about speed and clarity. \
                     What would you like help with?"
                ),
                0.93,
            ),
            Tier::Detailed => (
                format!(
                    "I'm {name}, and I'm designed to be your comprehensive knowledge companion! \
                     First, I specialize in deep research, pulling from encyclopedia and web sources to give you thorough information on almost any topic. \
                     Second, I break complex subjects down into understandable parts while keeping the depth. \
                     Third, I can hold a natural, context-aware conversation and build on what we've already discussed. \
                     Whether you need historical research, scientific explanations or geographical facts, I'm here to help. \
                     What area would you like to explore together?"
                ),
                0.94,
            ),
            Tier::Advanced => (
                format!(
                    "Here's what {name} can do for you:\n\n\
                     🚀 **Websites** - portfolio, landing page and business scaffolds\n\
                     💻 **Code** - snippets for common algorithms in several languages\n\
                     📊 **Data** - statistics, trends and chart descriptions from your numbers\n\
                     📈 **Stocks** - quotes for tickers like `stock AAPL`\n\
                     📁 **Files** - overviews of attached documents\n\
                     🔍 **Research** - structured reports from reference and web sources\n\n\
                     What are we working on?"
                ),
                0.96,
            ),
        }
    }
}

#[async_trait]
impl Handler for HelpHandler {
    fn name(&self) -> &str {
        "help"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.help
    }

    async fn handle(&self, _ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let (text, confidence) = self.text();
        Ok(Some(HandlerResult::conversational(text, confidence)))
    }
}
