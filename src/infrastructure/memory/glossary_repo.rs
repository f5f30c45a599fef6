//! In-Memory Glossary Repository Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{GlossaryRecord, GlossaryRepositoryPort, RepositoryError};
use crate::domain::NovelId;

/// 内存术语表仓储（进程退出即丢失）
pub struct InMemoryGlossaryRepository {
    records: DashMap<NovelId, GlossaryRecord>,
}

impl InMemoryGlossaryRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryGlossaryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GlossaryRepositoryPort for InMemoryGlossaryRepository {
    async fn read(&self, novel_id: &NovelId) -> Result<Option<GlossaryRecord>, RepositoryError> {
        Ok(self.records.get(novel_id).map(|r| r.clone()))
    }

    async fn write(&self, record: &GlossaryRecord) -> Result<(), RepositoryError> {
        self.records.insert(record.novel_id.clone(), record.clone());
        tracing::debug!(
            novel_id = %record.novel_id,
            terms = record.glossary.len(),
            "Glossary stored in memory"
        );
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<NovelId>, RepositoryError> {
        Ok(self.records.iter().map(|e| e.key().clone()).collect())
    }
}
