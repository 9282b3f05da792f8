//! 代码片段检索

use std::sync::Arc;

use async_trait::async_trait;

use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;
use crate::sources::CodeSearchSource;

pub struct CodeHandler {
    source: Arc<dyn CodeSearchSource>,
}

impl CodeHandler {
    pub fn new(source: Arc<dyn CodeSearchSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Handler for CodeHandler {
    fn name(&self) -> &str {
        "code_search"
    }

    /// 提到 chart / plot 的请求交给图表处理器
    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        let text = &ctx.query.normalized;
        ctx.intent.code && !text.contains("chart") && !text.contains("plot")
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let Some(snippet) = self
            .source
            .search(&ctx.query.raw, ctx.intent.code_language)
            .await
        else {
            return Ok(None);
        };

        let text = format!(
            "### 💻 {} ({})\n\n```{}\n{}\n```\n\n**How it works:** {}",
            snippet.title,
            snippet.language.fence(),
            snippet.language.fence(),
            snippet.code,
            snippet.explanation
        );
        Ok(Some(HandlerResult::technical(text, 0.93)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentClassifier, Query};
    use crate::sources::mock::EmptyCodeSearch;
    use crate::sources::SnippetCatalog;

    fn ctx_parts(text: &str) -> (Query, crate::intent::IntentDescriptor) {
        let query = Query::new(text);
        let intent = IntentClassifier::classify(&query);
        (query, intent)
    }

    #[tokio::test]
    async fn test_snippet_found() {
        let (query, intent) = ctx_parts("show me binary search in rust");
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &[],
            attachment: None,
        };
        let handler = CodeHandler::new(Arc::new(SnippetCatalog::new()));
        assert!(handler.guard(&ctx));
        let result = handler.handle(&ctx).await.unwrap().unwrap();
        assert!(result.text.contains("```rust"));
        assert!((result.confidence - 0.93).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_nothing_found_declines() {
        let (query, intent) = ctx_parts("binary search");
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &[],
            attachment: None,
        };
        let handler = CodeHandler::new(Arc::new(EmptyCodeSearch::new()));
        assert!(handler.handle(&ctx).await.unwrap().is_none());
    }

    #[test]
    fn test_chart_requests_are_not_code() {
        let (query, intent) = ctx_parts("write code to plot a chart");
        let ctx = HandlerContext {
            query: &query,
            intent: &intent,
            history: &[],
            attachment: None,
        };
        assert!(intent.code);
        assert!(!CodeHandler::new(Arc::new(EmptyCodeSearch::new())).guard(&ctx));
    }
}
