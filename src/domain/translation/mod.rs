//! Translation Context - 翻译限界上下文
//!
//! 职责:
//! - 构建携带术语表的翻译提示词
//! - 解析模型输出为标题 / 正文 / 新术语
//! - 单次翻译请求的阶段定义

mod entities;
mod prompt;
mod response_parser;

pub use entities::{TranslationResult, TranslationStage};
pub use prompt::{build_prompt, TranslationPrompt, SYSTEM_PROMPT};
pub use response_parser::{
    parse_term_lines, ResponseParser, SectionMarkers, BODY_MARKER, NEW_TERMS_MARKER,
    TERM_SEPARATORS, TITLE_MARKER,
};
