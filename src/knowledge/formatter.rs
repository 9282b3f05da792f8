//! 深度格式化：按名称选取报告段落
//!
//! deep 保留全部段落；moderate 去掉结论；surface 只保留标题、概述与参考。

use serde::Serialize;

use super::SynthesizedReport;
use crate::intent::Depth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    Header,
    Overview,
    Insights,
    Narrative,
    Conclusion,
    References,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub name: SectionName,
    pub content: String,
}

impl ReportSection {
    fn new(name: SectionName, content: String) -> Self {
        Self { name, content }
    }
}

impl SynthesizedReport {
    /// 完整报告的段落（顺序固定；无内容的 insights / narrative 不出现）
    pub fn sections(&self) -> Vec<ReportSection> {
        let mut sections = vec![
            ReportSection::new(
                SectionName::Header,
                format!("**RESEARCH REPORT: {}**\n{}", self.title.to_uppercase(), "=".repeat(60)),
            ),
            ReportSection::new(SectionName::Overview, format!("### Overview\n{}", self.overview)),
        ];

        if !self.insights.is_empty() {
            let bullets: Vec<String> = self
                .insights
                .iter()
                .map(|s| {
                    if s.ends_with(&['.', '!', '?'][..]) {
                        format!("• {s}")
                    } else {
                        format!("• {s}.")
                    }
                })
                .collect();
            sections.push(ReportSection::new(
                SectionName::Insights,
                format!("### Key Insights\n{}", bullets.join("\n")),
            ));
        }

        if !self.narrative.is_empty() {
            sections.push(ReportSection::new(
                SectionName::Narrative,
                format!("### In Depth\n{}", self.narrative),
            ));
        }

        sections.push(ReportSection::new(
            SectionName::Conclusion,
            format!("### Conclusion\n{}", self.conclusion),
        ));

        let mut refs = String::from("**References**");
        for (i, r) in self.references.iter().enumerate() {
            if i == 0 {
                refs.push_str(&format!("\n📚 Primary source: {r}"));
            } else {
                refs.push_str(&format!("\n🔍 Related: {r}"));
            }
        }
        sections.push(ReportSection::new(SectionName::References, refs));
        sections
    }
}

/// 格式化后的报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedReport {
    pub depth: Depth,
    pub sections: Vec<ReportSection>,
}

impl FormattedReport {
    pub fn section(&self, name: SectionName) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

pub struct DepthFormatter;

impl DepthFormatter {
    /// 各深度允许的段落名
    pub fn allowed(depth: Depth) -> &'static [SectionName] {
        match depth {
            Depth::Surface => &[SectionName::Header, SectionName::Overview, SectionName::References],
            Depth::Moderate => &[
                SectionName::Header,
                SectionName::Overview,
                SectionName::Insights,
                SectionName::Narrative,
                SectionName::References,
            ],
            Depth::Deep => &[
                SectionName::Header,
                SectionName::Overview,
                SectionName::Insights,
                SectionName::Narrative,
                SectionName::Conclusion,
                SectionName::References,
            ],
        }
    }

    pub fn format(report: &SynthesizedReport, depth: Depth) -> FormattedReport {
        let allowed = Self::allowed(depth);
        FormattedReport {
            depth,
            sections: report
                .sections()
                .into_iter()
                .filter(|s| allowed.contains(&s.name))
                .collect(),
        }
    }
}
