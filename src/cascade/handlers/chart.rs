//! 图表请求：抽取图表类型、数据、标签与标题，作为 SideChannel::Chart 交给外部渲染

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::cascade::{ChartKind, ChartSpec, Handler, HandlerContext, HandlerResult, SideChannel};
use crate::core::CascadeError;

const MAX_POINTS: usize = 8;
const DEFAULT_DATA: [i64; 5] = [30, 25, 20, 15, 10];
const DEFAULT_TITLE: &str = "Data Visualization";

/// 不作为标签的请求用词
const LABEL_STOP_WORDS: &[&str] = &[
    "chart", "graph", "plot", "pie", "bar", "line", "scatter", "histogram", "visualization",
    "create", "make", "show", "display", "draw", "for", "with", "using", "data", "the", "and",
    "showing", "please", "values",
];

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid integer regex"))
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-zA-Z]+").expect("valid word regex"))
}

fn title_res() -> &'static [Regex; 2] {
    static RES: OnceLock<[Regex; 2]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r"(?:show|display|create|make).*?(?:for|of|showing)\s+(.+?)(?:\s+with|\s+using|\s+data|$)")
                .expect("valid title regex"),
            Regex::new(r"(?:chart|graph)\s+(?:for|of)\s+(.+?)(?:\s+with|\s+using|\s+data|$)")
                .expect("valid title regex"),
        ]
    })
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn chart_kind(text: &str) -> ChartKind {
    [
        ("bar", ChartKind::Bar),
        ("line", ChartKind::Line),
        ("scatter", ChartKind::Scatter),
        ("histogram", ChartKind::Histogram),
    ]
    .into_iter()
    .find(|(k, _)| text.contains(k))
    .map(|(_, kind)| kind)
    .unwrap_or_default()
}

impl ChartSpec {
    /// 从原始请求中抽取图表描述
    pub fn from_request(raw: &str) -> Self {
        let lower = raw.to_lowercase();

        let mut data: Vec<i64> = integer_re()
            .find_iter(raw)
            .filter_map(|m| m.as_str().parse().ok())
            .take(MAX_POINTS)
            .collect();
        if data.is_empty() {
            data = DEFAULT_DATA.to_vec();
        }

        let mut labels: Vec<String> = word_re()
            .find_iter(raw)
            .map(|m| m.as_str())
            .filter(|w| w.len() > 2 && !LABEL_STOP_WORDS.contains(&w.to_lowercase().as_str()))
            .map(capitalize)
            .collect();
        let pad_from = labels.len();
        labels.extend((pad_from..data.len()).map(|i| format!("Item {}", i + 1)));
        labels.truncate(data.len());

        let title = title_res()
            .iter()
            .find_map(|re| re.captures(&lower))
            .map(|c| c[1].trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|t| {
                let mut chars = t.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => t,
                }
            })
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Self {
            kind: chart_kind(&lower),
            data,
            labels,
            title,
        }
    }
}

/// 数据总和（溢出时饱和到 i64 边界）
fn data_total(data: &[i64]) -> i64 {
    data.iter().fold(0i64, |acc, v| acc.saturating_add(*v))
}

pub struct ChartHandler;

#[async_trait]
impl Handler for ChartHandler {
    fn name(&self) -> &str {
        "chart"
    }

    fn guard(&self, ctx: &HandlerContext<'_>) -> bool {
        ctx.intent.chart
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> Result<Option<HandlerResult>, CascadeError> {
        let spec = ChartSpec::from_request(&ctx.query.raw);
        let total = data_total(&spec.data);
        let text = format!(
            "I've prepared a {} chart for you! 📊\n\n**{}** breaks down {} data points with a total of {}.",
            spec.kind.as_str(),
            spec.title,
            spec.data.len(),
            total
        );
        Ok(Some(
            HandlerResult::technical(text, 0.95).with_side_channel(SideChannel::Chart(spec)),
        ))
    }
}
