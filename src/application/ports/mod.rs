//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod glossary_repository;
mod llm_client;
mod novel_source;

pub use glossary_repository::{GlossaryRecord, GlossaryRepositoryPort, RepositoryError};
pub use llm_client::{LlmClientPort, LlmError};
pub use novel_source::{ChapterLink, NovelDetails, NovelSourcePort, SourceError};
