//! Lumen - 多层级对话助手
//!
//! 模块划分：
//! - **assistant**: 对外门面（口语开关、级联调度、思考过程与追问建议）
//! - **cascade**: 处理器级联、各层级处理器顺序与全部处理器
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型
//! - **finalizer**: 响应收尾（句数约束、口语化点缀、置信度钳制）
//! - **intent**: 输入规范化与意图分类
//! - **knowledge**: 知识检索、相关性排序、综合与按深度排版
//! - **memory**: 短期对话历史
//! - **observability**: tracing 初始化
//! - **sources**: 外部数据源适配器（Wikipedia / DuckDuckGo / Open-Meteo / Yahoo）与测试替身

pub mod assistant;
pub mod cascade;
pub mod config;
pub mod core;
pub mod finalizer;
pub mod intent;
pub mod knowledge;
pub mod memory;
pub mod observability;
pub mod sources;

pub use assistant::{Assistant, AssistantReply, AssistantRequest};
pub use cascade::{HandlerResult, Tier};
