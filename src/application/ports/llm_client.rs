//! LLM Client Port - 翻译模型抽象
//!
//! 定义单次同步对话补全的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// LLM 调用错误
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// LLM Client Port
///
/// 每次翻译只调用一次 `complete`，不做重试
#[async_trait]
pub trait LlmClientPort: Send + Sync {
    /// 发送系统提示词与用户提示词，返回模型输出的原始文本
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;

    /// 模型名称（用于日志）
    fn model(&self) -> &str;
}
