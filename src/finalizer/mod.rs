//! 响应收尾：按层级约束句数、可选口语化点缀、钳制置信度
//!
//! 置信度只会被钳制到 [0,1]，不会被调高。

pub mod style;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cascade::{ContentKind, HandlerResult, Tier};

pub use style::{detect_style_cues, InterjectionStyler, NoopStyler, TextStyleEnhancer};

const FAST_MAX_SENTENCES: usize = 3;
const DETAILED_MIN_SENTENCES: usize = 5;
const DETAILED_MAX_SENTENCES: usize = 10;

const ENGAGEMENT_TEXT: &str = " I'd love to hear more about what you're thinking. \
     What specific aspect interests you most? How can I help you explore this further?";

/// 单次请求的点缀开关（由调用方按会话保存）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSettings {
    pub enabled: bool,
}

impl StyleSettings {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }
}

fn sentence_count(text: &str) -> usize {
    text.split(". ").filter(|s| !s.trim().is_empty()).count()
}

/// 保留前 max 句（按 ". " 切分）
fn keep_sentences(text: &str, max: usize) -> String {
    let sentences: Vec<&str> = text
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() <= max {
        return text.to_string();
    }
    let mut out = sentences[..max].join(". ");
    if !out.ends_with(&['.', '!', '?'][..]) {
        out.push('.');
    }
    out
}

pub struct Finalizer {
    styler: Arc<dyn TextStyleEnhancer>,
}

impl Finalizer {
    pub fn new(styler: Arc<dyn TextStyleEnhancer>) -> Self {
        Self { styler }
    }

    /// raw 为用户原文，用于检测口语线索
    pub fn finalize(
        &self,
        mut result: HandlerResult,
        tier: Tier,
        raw: &str,
        style: StyleSettings,
    ) -> HandlerResult {
        match tier {
            Tier::Fast => {
                result.text = keep_sentences(&result.text, FAST_MAX_SENTENCES);
            }
            Tier::Detailed if result.content_kind == ContentKind::Conversational => {
                let count = sentence_count(&result.text);
                if count < DETAILED_MIN_SENTENCES {
                    result.text.push_str(ENGAGEMENT_TEXT);
                } else if count > DETAILED_MAX_SENTENCES {
                    result.text = keep_sentences(&result.text, DETAILED_MAX_SENTENCES);
                }
            }
            Tier::Detailed | Tier::Advanced => {}
        }

        if result.content_kind == ContentKind::Conversational {
            let cued = detect_style_cues(raw);
            if style.enabled || cued {
                result.text = self.styler.apply(&result.text, cued);
            }
        }

        result.confidence = result.confidence.clamp(0.0, 1.0);
        result
    }
}

impl Default for Finalizer {
    fn default() -> Self {
        Self::new(Arc::new(NoopStyler))
    }
}
