//! 网站骨架模板：按请求中的关键词选择类型，返回单文件 HTML 骨架

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaffoldKind {
    Portfolio,
    Landing,
    Business,
    General,
}

impl ScaffoldKind {
    /// portfolio → landing → business 依次检查，都未命中时为 General
    pub fn detect(text: &str) -> Self {
        let text = text.to_lowercase();
        if ["portfolio", "personal site", "resume"].iter().any(|k| text.contains(k)) {
            Self::Portfolio
        } else if ["landing", "product", "startup"].iter().any(|k| text.contains(k)) {
            Self::Landing
        } else if ["business", "company", "shop", "restaurant", "store"]
            .iter()
            .any(|k| text.contains(k))
        {
            Self::Business
        } else {
            Self::General
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Portfolio => "Portfolio",
            Self::Landing => "Landing Page",
            Self::Business => "Business Website",
            Self::General => "Website",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scaffold {
    pub kind: ScaffoldKind,
    pub html: String,
    pub script: String,
    /// 骨架包含的区块名
    pub sections: Vec<&'static str>,
}

/// 导航平滑滚动 + 区块渐显
const SCRIPT: &str = r##"document.querySelectorAll('a[href^="#"]').forEach((link) => {
  link.addEventListener("click", (event) => {
    event.preventDefault();
    document.querySelector(link.getAttribute("href"))?.scrollIntoView({ behavior: "smooth" });
  });
});

const observer = new IntersectionObserver((entries) => {
  entries.forEach((entry) => entry.target.classList.toggle("visible", entry.isIntersecting));
});
document.querySelectorAll("section").forEach((section) => observer.observe(section));"##;

#[derive(Debug, Default, Clone, Copy)]
pub struct ScaffoldCatalog;

impl ScaffoldCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn scaffold(&self, kind: ScaffoldKind) -> Scaffold {
        let sections: Vec<&'static str> = match kind {
            ScaffoldKind::Portfolio => vec!["hero", "projects", "skills", "contact"],
            ScaffoldKind::Landing => vec!["hero", "features", "pricing", "signup"],
            ScaffoldKind::Business => vec!["hero", "services", "about", "testimonials", "contact"],
            ScaffoldKind::General => vec!["header", "main", "footer"],
        };
        let body: String = sections
            .iter()
            .map(|s| {
                format!(
                    "    <section id=\"{s}\">\n      <h2>{}</h2>\n      <p>Replace this with your {s} content.</p>\n    </section>\n",
                    capitalize(s)
                )
            })
            .collect();
        let html = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
             <title>{title}</title>\n  <style>\n    body {{ font-family: system-ui, sans-serif; margin: 0; line-height: 1.6; }}\n    \
             section {{ padding: 4rem 10%; }}\n    section:nth-child(even) {{ background: #f5f5f7; }}\n  </style>\n\
             </head>\n<body>\n  <main>\n{body}  </main>\n  <script src=\"script.js\"></script>\n</body>\n</html>",
            title = kind.label(),
        );
        Scaffold {
            kind,
            html,
            script: SCRIPT.to_string(),
            sections,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
