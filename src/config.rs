//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `LUMEN__*` 覆盖（双下划线表示嵌套，如 `LUMEN__APP__DEFAULT_TIER=detailed`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::knowledge::DisambiguationPolicy;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub retrieval: RetrievalSection,
    #[serde(default)]
    pub sources: SourcesSection,
    #[serde(default)]
    pub style: StyleSection,
}

/// [app] 段：助手名、默认层级、读取的历史深度
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_name")]
    pub name: String,
    /// fast / detailed / advanced
    #[serde(default = "default_tier")]
    pub default_tier: String,
    /// 判断「是否追问」时读取的最近消息条数
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// 会话内保留的对话轮数
    #[serde(default = "default_max_context_turns")]
    pub max_context_turns: usize,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_tier: default_tier(),
            history_depth: default_history_depth(),
            max_context_turns: default_max_context_turns(),
        }
    }
}

fn default_name() -> String {
    "Lumen".to_string()
}

fn default_tier() -> String {
    "fast".to_string()
}

fn default_history_depth() -> usize {
    5
}

fn default_max_context_turns() -> usize {
    20
}

/// [retrieval] 段：扇出数量、最佳匹配阈值、消歧义策略
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSection {
    #[serde(default = "default_fast_reference_results")]
    pub fast_reference_results: usize,
    #[serde(default = "default_fast_web_results")]
    pub fast_web_results: usize,
    #[serde(default = "default_deep_reference_results")]
    pub deep_reference_results: usize,
    #[serde(default = "default_deep_web_results")]
    pub deep_web_results: usize,
    #[serde(default = "default_fast_threshold")]
    pub fast_threshold: f32,
    #[serde(default = "default_deep_threshold")]
    pub deep_threshold: f32,
    #[serde(default)]
    pub disambiguation: DisambiguationPolicy,
}

impl Default for RetrievalSection {
    fn default() -> Self {
        Self {
            fast_reference_results: default_fast_reference_results(),
            fast_web_results: default_fast_web_results(),
            deep_reference_results: default_deep_reference_results(),
            deep_web_results: default_deep_web_results(),
            fast_threshold: default_fast_threshold(),
            deep_threshold: default_deep_threshold(),
            disambiguation: DisambiguationPolicy::default(),
        }
    }
}

fn default_fast_reference_results() -> usize {
    1
}

fn default_fast_web_results() -> usize {
    1
}

fn default_deep_reference_results() -> usize {
    5
}

fn default_deep_web_results() -> usize {
    3
}

fn default_fast_threshold() -> f32 {
    0.25
}

fn default_deep_threshold() -> f32 {
    0.40
}

/// [sources] 段：HTTP 适配器的超时、UA 与各端点
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesSection {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_wikipedia_api")]
    pub wikipedia_api: String,
    #[serde(default = "default_duckduckgo_html")]
    pub duckduckgo_html: String,
    #[serde(default = "default_geocoding_api")]
    pub geocoding_api: String,
    #[serde(default = "default_forecast_api")]
    pub forecast_api: String,
    #[serde(default = "default_finance_api")]
    pub finance_api: String,
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            wikipedia_api: default_wikipedia_api(),
            duckduckgo_html: default_duckduckgo_html(),
            geocoding_api: default_geocoding_api(),
            forecast_api: default_forecast_api(),
            finance_api: default_finance_api(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    concat!("lumen/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_wikipedia_api() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_duckduckgo_html() -> String {
    "https://html.duckduckgo.com/html/".to_string()
}

fn default_geocoding_api() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_api() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_finance_api() -> String {
    "https://query1.finance.yahoo.com/v8/finance/chart".to_string()
}

/// [style] 段：会话默认是否启用口语化点缀、点缀词表
#[derive(Debug, Clone, Deserialize)]
pub struct StyleSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_interjections")]
    pub interjections: Vec<String>,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            enabled: false,
            interjections: default_interjections(),
        }
    }
}

fn default_interjections() -> Vec<String> {
    vec![
        "Maga".into(),
        "Machaa".into(),
        "Guru".into(),
        "Boss".into(),
        "Sakkath".into(),
    ]
}

/// 从 config 目录加载配置，环境变量 LUMEN__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 LUMEN__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("LUMEN")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
