//! 网站骨架

use async_trait::async_trait;

use crate::cascade::{Handler, HandlerContext, HandlerResult};
use crate::core::CascadeError;
use crate::sources::{ScaffoldCatalog, ScaffoldKind};

#[derive(Default)]
pub struct WebsiteHandler {
    catalog: ScaffoldCatalog,
}

impl WebsiteHandler {
    pub fn new(catalog: ScaffoldCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Handler for WebsiteHandler {
    fn name(&self) -> &str {
        "website_scaffold"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.website
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let kind = ScaffoldKind::detect(&ctx.query.normalized);
        let scaffold = self.catalog.scaffold(kind);

        let text = format!(
            "### 🏗️ Website Builder\n\n\
             Here is a clean, responsive **{label}** starting point with sections for {sections}.\n\n\
             #### 📄 HTML + CSS\n```html\n{html}\n```\n\n\
             #### ⚡ JavaScript\n```javascript\n{script}\n```\n\n\
             **How to use this:**\n\
             1. Save the HTML as `index.html`.\n\
             2. Save the JavaScript as `script.js` next to it.\n\
             3. Replace the placeholder text in each section.\n\
             4. Open `index.html` in your browser.",
            label = kind.label(),
            sections = scaffold.sections.join(", "),
            html = scaffold.html,
            script = scaffold.script,
        );
        Ok(Some(HandlerResult::technical(text, 0.95)))
    }
}
