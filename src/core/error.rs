//! 错误类型
//!
//! SourceError：外部知识源 / 天气 / 行情等协作方的失败（由检索层降级为「零候选」）；
//! CascadeError：Handler 边界上的错误，由级联驱动统一转为低置信度文本回退，调用方不会看到原始错误。

use thiserror::Error;

/// 外部协作方调用失败
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// 参考源返回消歧义页，附带候选条目
    #[error("Ambiguous topic, {} options", .0.len())]
    Disambiguation(Vec<String>),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// 级联内部错误（分类 / 检索 / 排序 / 合成 / Handler）
#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Handler {handler} failed: {message}")]
    Handler { handler: String, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl CascadeError {
    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            handler: handler.into(),
            message: message.into(),
        }
    }
}
