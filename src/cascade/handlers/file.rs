//! 附件概览（文本由调用方提取）

use async_trait::async_trait;

use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;

const PREVIEW_CHARS: usize = 500;

pub struct FileHandler;

#[async_trait]
impl Handler for FileHandler {
    fn name(&self) -> &str {
        "file_intelligence"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.attachment.is_some()
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let Some(file) = ctx.attachment else {
            return Ok(None);
        };
        let word_count = file.content.split_whitespace().count();
        let mut text = format!(
            "I've analyzed your file **{}**. Here's what I found:\n\n📄 **File Overview**\n\
             This {} document contains approximately {} words of content. \
             I can help you summarize key points, spot patterns, or extract specifics.",
            file.name, file.kind, word_count
        );
        let preview: String = file.content.trim().chars().take(PREVIEW_CHARS).collect();
        if !preview.is_empty() {
            let ellipsis = if file.content.trim().chars().count() > PREVIEW_CHARS { "..." } else { "" };
            text.push_str(&format!("\n\n**Preview:**\n> {preview}{ellipsis}"));
        }
        Ok(Some(HandlerResult::technical(text, 0.90)))
    }
}
