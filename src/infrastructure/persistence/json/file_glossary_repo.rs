//! JSON File Glossary Repository
//!
//! 文件布局: `<dir>/<novel_id>.json`，内容为 `{"源词": "译名", ...}`
//! 写入先落到临时文件再 rename，避免半写文件

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{GlossaryRecord, GlossaryRepositoryPort, RepositoryError};
use crate::domain::{Glossary, NovelId};

const EXTENSION: &str = "json";

/// JSON 文件术语表仓储
pub struct FileGlossaryRepository {
    dir: PathBuf,
}

impl FileGlossaryRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 创建仓储并确保目录存在
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let repo = Self::new(dir);
        tokio::fs::create_dir_all(&repo.dir)
            .await
            .map_err(|e| RepositoryError::IoError(format!("{}: {}", repo.dir.display(), e)))?;

        tracing::info!(dir = %repo.dir.display(), "FileGlossaryRepository initialized");
        Ok(repo)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn path_for(&self, novel_id: &NovelId) -> PathBuf {
        self.dir.join(format!("{}.{}", novel_id, EXTENSION))
    }
}

#[async_trait]
impl GlossaryRepositoryPort for FileGlossaryRepository {
    async fn read(&self, novel_id: &NovelId) -> Result<Option<GlossaryRecord>, RepositoryError> {
        let path = self.path_for(novel_id);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RepositoryError::IoError(format!("{}: {}", path.display(), e)));
            }
        };

        let glossary: Glossary =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Corrupted {
                novel_id: novel_id.to_string(),
                reason: e.to_string(),
            })?;

        let updated_at = tokio::fs::metadata(&path)
            .await
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(GlossaryRecord {
            novel_id: novel_id.clone(),
            glossary,
            updated_at,
        }))
    }

    async fn write(&self, record: &GlossaryRecord) -> Result<(), RepositoryError> {
        let path = self.path_for(&record.novel_id);
        let tmp_path = path.with_extension(format!("{}.tmp", EXTENSION));

        let json = serde_json::to_vec_pretty(&record.glossary)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| RepositoryError::IoError(format!("{}: {}", self.dir.display(), e)))?;
        tokio::fs::write(&tmp_path, &json)
            .await
            .map_err(|e| RepositoryError::IoError(format!("{}: {}", tmp_path.display(), e)))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| RepositoryError::IoError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(
            novel_id = %record.novel_id,
            path = %path.display(),
            terms = record.glossary.len(),
            "Glossary file written"
        );
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<NovelId>, RepositoryError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RepositoryError::IoError(format!("{}: {}", self.dir.display(), e)));
            }
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match NovelId::parse(stem) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping foreign file");
                }
            }
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(raw: &str) -> NovelId {
        NovelId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let repo = FileGlossaryRepository::open(dir.path()).await.unwrap();

        assert!(repo.read(&id("novel-1")).await.unwrap().is_none());
        assert!(repo.list_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let repo = FileGlossaryRepository::open(dir.path()).await.unwrap();
        let glossary: Glossary = [("龍", "Dragon"), ("韩立", "Han Li")].into_iter().collect();

        repo.write(&GlossaryRecord::new(id("novel-1"), glossary.clone()))
            .await
            .unwrap();

        let record = repo.read(&id("novel-1")).await.unwrap().unwrap();
        assert_eq!(record.glossary, glossary);

        // 文件为 UTF-8 明文，不转义中文
        let raw = std::fs::read_to_string(dir.path().join("novel-1.json")).unwrap();
        assert!(raw.contains("\"龍\": \"Dragon\""));
        assert!(!dir.path().join("novel-1.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupted_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("novel-1.json"), "{not json").unwrap();
        let repo = FileGlossaryRepository::new(dir.path());

        let result = repo.read(&id("novel-1")).await;
        assert!(matches!(result, Err(RepositoryError::Corrupted { .. })));
    }

    #[tokio::test]
    async fn test_list_ids_skips_foreign_files() {
        let dir = TempDir::new().unwrap();
        let repo = FileGlossaryRepository::open(dir.path()).await.unwrap();
        repo.write(&GlossaryRecord::new(id("a1"), Glossary::default()))
            .await
            .unwrap();
        repo.write(&GlossaryRecord::new(id("b2"), Glossary::default()))
            .await
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("bad name.json"), "{}").unwrap();

        let mut ids = repo.list_ids().await.unwrap();
        ids.sort();
        assert_eq!(ids, vec![id("a1"), id("b2")]);
    }
}
