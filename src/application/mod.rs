//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（LlmClient、GlossaryRepository、NovelSource）
//! - glossary_store: 术语表读取与串行合并
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod glossary_store;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Translate commands
    TranslateChapter,
    TranslateChapterResponse,
    // Glossary commands
    MergeGlossaryResponse,
    MergeGlossaryTerms,
    // Handlers
    handlers::{MergeGlossaryHandler, TranslateChapterHandler},
};

pub use error::ApplicationError;

pub use glossary_store::{GlossarySnapshot, GlossaryStore, MergeReport};

pub use ports::{
    // Glossary repository
    GlossaryRecord,
    GlossaryRepositoryPort,
    RepositoryError,
    // LLM client
    LlmClientPort,
    LlmError,
    // Novel source
    ChapterLink,
    NovelDetails,
    NovelSourcePort,
    SourceError,
};

pub use queries::{
    // Glossary queries
    GetGlossary,
    GlossaryResponse,
    ListGlossaries,
    // Novel queries
    ChapterContentResponse,
    ExtractChapter,
    ScrapeNovel,
    // Handlers
    handlers::{ExtractChapterHandler, GetGlossaryHandler, ListGlossariesHandler, ScrapeNovelHandler},
};
