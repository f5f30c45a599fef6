//! Sled-based Glossary Repository Implementation

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{GlossaryRecord, GlossaryRepositoryPort, RepositoryError};
use crate::domain::{Glossary, NovelId};

const KEY_PREFIX: &str = "glossary:";

/// Sled 仓储配置
#[derive(Debug, Clone)]
pub struct SledGlossaryConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledGlossaryConfig {
    fn default() -> Self {
        Self {
            db_path: "data/glossary.sled".to_string(),
        }
    }
}

/// 内部存储条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredGlossary {
    terms: BTreeMap<String, String>,
    updated_at: i64,
}

/// Sled 术语表仓储
pub struct SledGlossaryRepository {
    db: Db,
}

impl SledGlossaryRepository {
    pub fn new(config: &SledGlossaryConfig) -> Result<Self, RepositoryError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            glossaries = db.scan_prefix(KEY_PREFIX).count(),
            "SledGlossaryRepository initialized"
        );

        Ok(Self { db })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        Self::new(&SledGlossaryConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn key_for(novel_id: &NovelId) -> String {
        format!("{}{}", KEY_PREFIX, novel_id)
    }
}

#[async_trait]
impl GlossaryRepositoryPort for SledGlossaryRepository {
    async fn read(&self, novel_id: &NovelId) -> Result<Option<GlossaryRecord>, RepositoryError> {
        let data = self
            .db
            .get(Self::key_for(novel_id))
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let Some(data) = data else {
            return Ok(None);
        };

        let stored: StoredGlossary =
            bincode::deserialize(&data).map_err(|e| RepositoryError::Corrupted {
                novel_id: novel_id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(GlossaryRecord {
            novel_id: novel_id.clone(),
            glossary: Glossary::from(stored.terms),
            updated_at: Utc
                .timestamp_opt(stored.updated_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }))
    }

    async fn write(&self, record: &GlossaryRecord) -> Result<(), RepositoryError> {
        let stored = StoredGlossary {
            terms: record.glossary.as_map().clone(),
            updated_at: record.updated_at.timestamp(),
        };
        let bytes = bincode::serialize(&stored)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        self.db
            .insert(Self::key_for(&record.novel_id), bytes)
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            novel_id = %record.novel_id,
            terms = record.glossary.len(),
            "Glossary stored in sled"
        );
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<NovelId>, RepositoryError> {
        let mut ids = Vec::new();
        for item in self.db.scan_prefix(KEY_PREFIX) {
            let (key, _) = item.map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
            let key = String::from_utf8(key.to_vec())
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
            if let Some(id) = key
                .strip_prefix(KEY_PREFIX)
                .and_then(|raw| NovelId::parse(raw).ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sled_glossary_roundtrip() {
        let dir = TempDir::new().unwrap();
        let repo = SledGlossaryRepository::open(dir.path().join("glossary.sled")).unwrap();
        let novel_id = NovelId::parse("novel-42").unwrap();

        assert!(repo.read(&novel_id).await.unwrap().is_none());

        let glossary: Glossary = [("龍", "Dragon")].into_iter().collect();
        let record = GlossaryRecord::new(novel_id.clone(), glossary.clone());
        repo.write(&record).await.unwrap();

        let loaded = repo.read(&novel_id).await.unwrap().unwrap();
        assert_eq!(loaded.glossary, glossary);
        assert_eq!(loaded.updated_at.timestamp(), record.updated_at.timestamp());
        assert_eq!(repo.list_ids().await.unwrap(), vec![novel_id]);
    }

    #[tokio::test]
    async fn test_sled_corrupted_entry() {
        let dir = TempDir::new().unwrap();
        let repo = SledGlossaryRepository::open(dir.path().join("glossary.sled")).unwrap();
        repo.db.insert("glossary:novel-1", &[0xffu8][..]).unwrap();

        let result = repo.read(&NovelId::parse("novel-1").unwrap()).await;
        assert!(matches!(result, Err(RepositoryError::Corrupted { .. })));
    }
}
