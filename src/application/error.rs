//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{LlmError, RepositoryError, SourceError};
use crate::domain::GlossaryError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 调用方输入无效（不重试）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 翻译模型调用失败或超时（调用方可重试）
    #[error("Translation error: {0}")]
    TranslationError(String),

    /// 术语表读写失败
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 小说站点抓取失败
    #[error("Source error: {0}")]
    SourceError(String),

    /// 页面可访问但没有所需内容
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

impl From<GlossaryError> for ApplicationError {
    fn from(err: GlossaryError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<LlmError> for ApplicationError {
    fn from(err: LlmError) -> Self {
        Self::TranslationError(err.to_string())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<SourceError> for ApplicationError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::InvalidUrl(msg) => Self::ValidationError(format!("Invalid URL: {}", msg)),
            SourceError::MissingElement(_) | SourceError::ContentTooShort { .. } => {
                Self::ContentUnavailable(err.to_string())
            }
            _ => Self::SourceError(err.to_string()),
        }
    }
}
