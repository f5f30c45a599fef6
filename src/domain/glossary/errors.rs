//! Glossary Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlossaryError {
    #[error("小说 ID 不能为空")]
    EmptyNovelId,

    #[error("小说 ID 长度不能超过 {max} 字符: {len}")]
    NovelIdTooLong { len: usize, max: usize },

    #[error("小说 ID 含有非法字符: {0}")]
    InvalidNovelId(String),

    #[error("无效的术语: {0}")]
    InvalidTerm(String),
}
