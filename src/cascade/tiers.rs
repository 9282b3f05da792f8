//! 响应层级与各层级的处理器顺序
//!
//! - **fast**：短回答、快速事实查询
//! - **detailed**：深度研究 + 长对话
//! - **advanced**：代码 / 网站 / 图表 / 行情 / 数据分析 / 附件，能力最全

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::handlers::{
    AnalysisHandler, CalculationHandler, ChartHandler, CodeHandler, DateHandler, FallbackHandler,
    FileHandler, HelpHandler, JokeHandler, PersonalHandler, PhilosophyHandler, QuickLookupHandler,
    ResearchHandler, SocialHandler, SocialKind, StockHandler, TimeHandler, WeatherHandler,
    WebsiteHandler,
};
use super::Cascade;
use crate::config::{AppConfig, SourcesSection};
use crate::core::CascadeError;
use crate::knowledge::{FanOut, KnowledgeRetriever, ReferenceSource, WebSearchSource};
use crate::sources::{
    CodeSearchSource, DuckDuckGoSource, FinanceSource, OpenMeteoSource, SnippetCatalog,
    WeatherSource, WikipediaSource, YahooFinanceSource,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Fast,
    Detailed,
    Advanced,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Detailed => "detailed",
            Self::Advanced => "advanced",
        }
    }

    /// 未知名称回落到 fast
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: CascadeError| {
            warn!(tier = %name, error = %e, "unknown tier, falling back to fast");
            Self::Fast
        })
    }
}

impl FromStr for Tier {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "detailed" => Ok(Self::Detailed),
            "advanced" => Ok(Self::Advanced),
            other => Err(CascadeError::Config(format!("unknown tier: {other}"))),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 级联依赖的外部协作方
#[derive(Clone)]
pub struct Collaborators {
    pub reference: Arc<dyn ReferenceSource>,
    pub web: Arc<dyn WebSearchSource>,
    pub weather: Arc<dyn WeatherSource>,
    pub finance: Arc<dyn FinanceSource>,
    pub code: Arc<dyn CodeSearchSource>,
}

impl Collaborators {
    /// 基于 HTTP 的默认适配器（代码片段用内置目录）
    pub fn http(cfg: &SourcesSection) -> Self {
        Self {
            reference: Arc::new(WikipediaSource::new(cfg)),
            web: Arc::new(DuckDuckGoSource::new(cfg)),
            weather: Arc::new(OpenMeteoSource::new(cfg)),
            finance: Arc::new(YahooFinanceSource::new(cfg)),
            code: Arc::new(SnippetCatalog::new()),
        }
    }
}

/// 按层级组装处理器表（先注册者优先）
pub fn build_cascade(tier: Tier, collaborators: &Collaborators, cfg: &AppConfig) -> Cascade {
    let retrieval = &cfg.retrieval;
    let retriever = Arc::new(
        KnowledgeRetriever::new(collaborators.reference.clone(), collaborators.web.clone())
            .with_policy(retrieval.disambiguation),
    );
    let fast_fan_out = FanOut::new(retrieval.fast_reference_results, retrieval.fast_web_results);
    let deep_fan_out = FanOut::new(retrieval.deep_reference_results, retrieval.deep_web_results);
    let name = cfg.app.name.as_str();
    let fallback = FallbackHandler::new(
        tier,
        retriever.clone(),
        fast_fan_out,
        retrieval.fast_threshold,
    );

    match tier {
        Tier::Fast => Cascade::new()
            .with(JokeHandler::new(tier))
            .with(TimeHandler)
            .with(DateHandler)
            .with(WeatherHandler::new(collaborators.weather.clone()))
            .with(SocialHandler::new(SocialKind::Identity, tier, name))
            .with(SocialHandler::new(SocialKind::PersonalStatus, tier, name))
            .with(QuickLookupHandler::new(
                retriever,
                fast_fan_out,
                retrieval.fast_threshold,
            ))
            .with(SocialHandler::new(SocialKind::Greeting, tier, name))
            .with(SocialHandler::new(SocialKind::Farewell, tier, name))
            .with(SocialHandler::new(SocialKind::Gratitude, tier, name))
            .with(HelpHandler::new(tier, name))
            .with(CalculationHandler)
            .with(fallback),
        Tier::Detailed => Cascade::new()
            .with(ResearchHandler::new(
                retriever,
                deep_fan_out,
                retrieval.deep_threshold,
            ))
            .with(SocialHandler::new(SocialKind::Greeting, tier, name))
            .with(SocialHandler::new(SocialKind::PersonalStatus, tier, name))
            .with(SocialHandler::new(SocialKind::Gratitude, tier, name))
            .with(SocialHandler::new(SocialKind::Farewell, tier, name))
            .with(SocialHandler::new(SocialKind::Identity, tier, name))
            .with(JokeHandler::new(tier))
            .with(PersonalHandler)
            .with(PhilosophyHandler)
            .with(HelpHandler::new(tier, name))
            .with(fallback),
        Tier::Advanced => Cascade::new()
            .with(TimeHandler)
            .with(DateHandler)
            .with(WeatherHandler::new(collaborators.weather.clone()))
            .with(CodeHandler::new(collaborators.code.clone()))
            .with(WebsiteHandler::default())
            .with(ChartHandler)
            .with(StockHandler::new(collaborators.finance.clone()))
            .with(AnalysisHandler)
            .with(FileHandler)
            .with(JokeHandler::new(tier))
            .with(ResearchHandler::new(
                retriever,
                deep_fan_out,
                retrieval.deep_threshold,
            ))
            .with(PhilosophyHandler)
            .with(PersonalHandler)
            .with(SocialHandler::new(SocialKind::Greeting, tier, name))
            .with(SocialHandler::new(SocialKind::Identity, tier, name))
            .with(SocialHandler::new(SocialKind::Farewell, tier, name))
            .with(SocialHandler::new(SocialKind::Gratitude, tier, name))
            .with(SocialHandler::new(SocialKind::PersonalStatus, tier, name))
            .with(CalculationHandler)
            .with(HelpHandler::new(tier, name))
            .with(fallback),
    }
}
