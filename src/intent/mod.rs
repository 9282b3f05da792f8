//! 意图识别
//!
//! 对用户输入做一次规范化（Query），再由 IntentClassifier 基于固定触发词集合计算 IntentDescriptor。
//! 各标志相互独立、可同时成立，冲突由级联的优先级顺序解决，而不是由分类器解决。

pub mod classifier;

use serde::{Deserialize, Serialize};

pub use classifier::IntentClassifier;

/// 单次请求的规范化输入（不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw: String,
    /// 小写并去除首尾空白
    pub normalized: String,
    pub word_count: usize,
    /// 原始文本字符数
    pub char_len: usize,
}

impl Query {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = raw.trim().to_lowercase();
        Self {
            word_count: raw.split_whitespace().count(),
            char_len: raw.chars().count(),
            normalized,
            raw,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// 研究深度：决定报告保留哪些段落
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    #[default]
    Surface,
    Moderate,
    Deep,
}

/// 问题复杂度（按词数与问号数估计）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    #[default]
    Simple,
    Moderate,
    Complex,
}

/// 代码请求中提到的语言（未提到时默认 Python）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeLanguage {
    #[default]
    Python,
    JavaScript,
    Java,
    Cpp,
    Html,
    Css,
    Sql,
    Rust,
}

impl CodeLanguage {
    /// Markdown 代码块标记
    pub fn fence(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Html => "html",
            Self::Css => "css",
            Self::Sql => "sql",
            Self::Rust => "rust",
        }
    }
}

/// 话题标志
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicFlags {
    pub science: bool,
    pub history: bool,
    pub technology: bool,
    pub geography: bool,
    pub personal: bool,
    pub philosophy: bool,
}

impl TopicFlags {
    pub fn any(&self) -> bool {
        self.science
            || self.history
            || self.technology
            || self.geography
            || self.personal
            || self.philosophy
    }
}

/// 意图描述：每个类别一个独立布尔标志 + 深度 + 话题
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentDescriptor {
    pub greeting: bool,
    pub farewell: bool,
    pub gratitude: bool,
    pub personal_status: bool,
    pub identity: bool,
    pub entertainment: bool,
    pub time: bool,
    pub date: bool,
    pub help: bool,
    pub weather: bool,
    pub calculation: bool,
    pub knowledge: bool,
    pub research: bool,
    pub code: bool,
    pub chart: bool,
    pub website: bool,
    pub stock: bool,
    pub file_related: bool,
    pub data_analysis: bool,
    pub simple_task: bool,
    pub depth: Depth,
    pub topics: TopicFlags,
    pub code_language: CodeLanguage,
    pub complexity: Complexity,
}

impl IntentDescriptor {
    /// 是否有任一类别或话题标志成立
    pub fn any_flag(&self) -> bool {
        self.active_flags().next().is_some() || self.topics.any()
    }

    /// 成立的类别标志名（用于日志）
    pub fn active_flags(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("greeting", self.greeting),
            ("farewell", self.farewell),
            ("gratitude", self.gratitude),
            ("personal_status", self.personal_status),
            ("identity", self.identity),
            ("entertainment", self.entertainment),
            ("time", self.time),
            ("date", self.date),
            ("help", self.help),
            ("weather", self.weather),
            ("calculation", self.calculation),
            ("knowledge", self.knowledge),
            ("research", self.research),
            ("code", self.code),
            ("chart", self.chart),
            ("website", self.website),
            ("stock", self.stock),
            ("file_related", self.file_related),
            ("data_analysis", self.data_analysis),
            ("simple_task", self.simple_task),
        ]
        .into_iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| name)
    }
}
