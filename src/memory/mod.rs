//! 记忆层：短期对话历史（级联只读）

pub mod conversation;

pub use conversation::{
    assistant_asked_question, ConversationContext, ConversationMemory, Message, Role,
};
