//! Glossary Repository Port - 术语表持久化抽象
//!
//! 具体实现在 infrastructure 层（JSON 文件、Sled、SQLite、内存）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Glossary, NovelId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Corrupted glossary record for {novel_id}: {reason}")]
    Corrupted { novel_id: String, reason: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 单本小说的术语表记录
#[derive(Debug, Clone, PartialEq)]
pub struct GlossaryRecord {
    pub novel_id: NovelId,
    pub glossary: Glossary,
    pub updated_at: DateTime<Utc>,
}

impl GlossaryRecord {
    pub fn new(novel_id: NovelId, glossary: Glossary) -> Self {
        Self {
            novel_id,
            glossary,
            updated_at: Utc::now(),
        }
    }
}

/// Glossary Repository Port
///
/// 只负责整条记录的读写；读-改-写的互斥由 `GlossaryStore` 负责
#[async_trait]
pub trait GlossaryRepositoryPort: Send + Sync {
    /// 读取术语表，不存在时返回 `None`
    async fn read(&self, novel_id: &NovelId) -> Result<Option<GlossaryRecord>, RepositoryError>;

    /// 整体覆盖写入术语表
    async fn write(&self, record: &GlossaryRecord) -> Result<(), RepositoryError>;

    /// 列出所有已有术语表的小说 ID
    async fn list_ids(&self) -> Result<Vec<NovelId>, RepositoryError>;
}
