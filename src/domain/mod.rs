//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Glossary Context: 按小说划分的术语表
//! - Translation Context: 提示词构建与模型输出解析

pub mod glossary;
pub mod translation;

pub use glossary::{Glossary, GlossaryError, MergeOutcome, NovelId};
pub use translation::{ResponseParser, TranslationResult, TranslationStage};
