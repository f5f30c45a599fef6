//! Glossary Store - 术语表存储服务
//!
//! 在 `GlossaryRepositoryPort` 之上提供：
//! - 宽松读取：未知小说或读取失败时返回空术语表
//! - 串行合并：同一小说的读-改-写在按小说 ID 分配的互斥锁内完成
//!
//! 不同小说之间的合并互不阻塞；翻译调用本身不持锁。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{GlossaryRecord, GlossaryRepositoryPort, RepositoryError};
use crate::domain::{Glossary, MergeOutcome, NovelId};

/// 术语表快照
#[derive(Debug, Clone)]
pub struct GlossarySnapshot {
    pub novel_id: NovelId,
    pub glossary: Glossary,
    /// 从未写入过时为 `None`
    pub updated_at: Option<DateTime<Utc>>,
}

/// 合并结果
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// 合并后的术语表
    pub glossary: Glossary,
    pub outcome: MergeOutcome,
    /// 是否实际写入了存储（无变化时跳过写入）
    pub written: bool,
}

/// 术语表存储服务
pub struct GlossaryStore {
    repo: Arc<dyn GlossaryRepositoryPort>,
    locks: DashMap<NovelId, Arc<Mutex<()>>>,
}

impl GlossaryStore {
    pub fn new(repo: Arc<dyn GlossaryRepositoryPort>) -> Self {
        Self {
            repo,
            locks: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 读取术语表，未知小说返回空表，读取失败记录警告后返回空表
    pub async fn get(&self, novel_id: &NovelId) -> Glossary {
        self.snapshot(novel_id).await.glossary
    }

    /// 读取术语表及其更新时间（宽松读取）
    pub async fn snapshot(&self, novel_id: &NovelId) -> GlossarySnapshot {
        match self.repo.read(novel_id).await {
            Ok(Some(record)) => GlossarySnapshot {
                novel_id: record.novel_id,
                glossary: record.glossary,
                updated_at: Some(record.updated_at),
            },
            Ok(None) => GlossarySnapshot {
                novel_id: novel_id.clone(),
                glossary: Glossary::new(),
                updated_at: None,
            },
            Err(e) => {
                tracing::warn!(
                    novel_id = %novel_id,
                    error = %e,
                    "Glossary read failed, falling back to empty glossary"
                );
                GlossarySnapshot {
                    novel_id: novel_id.clone(),
                    glossary: Glossary::new(),
                    updated_at: None,
                }
            }
        }
    }

    /// 合并新术语并持久化，返回合并后的术语表
    ///
    /// 锁内严格读取：读取失败直接返回错误，绝不在空默认值上写回，
    /// 否则会覆盖掉已有术语。
    pub async fn merge(
        &self,
        novel_id: &NovelId,
        new_terms: &BTreeMap<String, String>,
    ) -> Result<MergeReport, RepositoryError> {
        let lock = self.lock_for(novel_id);
        let result = {
            let _guard = lock.lock().await;
            self.merge_locked(novel_id, new_terms).await
        };
        drop(lock);
        self.release_lock(novel_id);
        result
    }

    /// 列出所有已有术语表的小说
    pub async fn list(&self) -> Result<Vec<NovelId>, RepositoryError> {
        let mut ids = self.repo.list_ids().await?;
        ids.sort();
        Ok(ids)
    }

    async fn merge_locked(
        &self,
        novel_id: &NovelId,
        new_terms: &BTreeMap<String, String>,
    ) -> Result<MergeReport, RepositoryError> {
        let mut glossary = self
            .repo
            .read(novel_id)
            .await?
            .map(|record| record.glossary)
            .unwrap_or_default();

        let outcome = glossary.merge(new_terms);
        if !outcome.is_changed() {
            tracing::debug!(novel_id = %novel_id, "Glossary unchanged, skipping write");
            return Ok(MergeReport {
                glossary,
                outcome,
                written: false,
            });
        }

        let record = GlossaryRecord::new(novel_id.clone(), glossary);
        self.repo.write(&record).await?;

        tracing::info!(
            novel_id = %novel_id,
            added = outcome.added_count(),
            overwritten = outcome.overwritten_count(),
            total = record.glossary.len(),
            "Glossary merged"
        );

        Ok(MergeReport {
            glossary: record.glossary,
            outcome,
            written: true,
        })
    }

    fn lock_for(&self, novel_id: &NovelId) -> Arc<Mutex<()>> {
        self.locks
            .entry(novel_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 没有其他等待者时移除锁条目，避免锁表无限增长
    fn release_lock(&self, novel_id: &NovelId) {
        self.locks
            .remove_if(novel_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    /// 读写之间会让出调度的仓储，用于暴露丢失更新
    #[derive(Default)]
    struct SlowRepository {
        records: DashMap<NovelId, GlossaryRecord>,
        fail_reads: AtomicBool,
    }

    #[async_trait]
    impl GlossaryRepositoryPort for SlowRepository {
        async fn read(
            &self,
            novel_id: &NovelId,
        ) -> Result<Option<GlossaryRecord>, RepositoryError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(RepositoryError::IoError("disk unplugged".to_string()));
            }
            let record = self.records.get(novel_id).map(|r| r.clone());
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(record)
        }

        async fn write(&self, record: &GlossaryRecord) -> Result<(), RepositoryError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.records.insert(record.novel_id.clone(), record.clone());
            Ok(())
        }

        async fn list_ids(&self) -> Result<Vec<NovelId>, RepositoryError> {
            Ok(self.records.iter().map(|e| e.key().clone()).collect())
        }
    }

    fn id(raw: &str) -> NovelId {
        NovelId::parse(raw).unwrap()
    }

    fn terms(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_get_unknown_novel_is_empty() {
        let store = GlossaryStore::new(Arc::new(SlowRepository::default()));
        let snapshot = store.snapshot(&id("unknown")).await;
        assert!(snapshot.glossary.is_empty());
        assert!(snapshot.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_get_falls_back_to_empty_on_read_failure() {
        let repo = Arc::new(SlowRepository::default());
        repo.fail_reads.store(true, Ordering::SeqCst);
        let store = GlossaryStore::new(repo);
        assert!(store.get(&id("novel-1")).await.is_empty());
    }

    #[tokio::test]
    async fn test_merge_refuses_to_write_after_failed_read() {
        let repo = Arc::new(SlowRepository::default());
        let store = GlossaryStore::new(repo.clone());
        let novel = id("novel-1");
        store.merge(&novel, &terms(&[("師父", "Master")])).await.unwrap();

        repo.fail_reads.store(true, Ordering::SeqCst);
        let result = store.merge(&novel, &terms(&[("龍", "Dragon")])).await;
        assert!(result.is_err());

        repo.fail_reads.store(false, Ordering::SeqCst);
        let glossary = store.get(&novel).await;
        assert_eq!(glossary.get("師父"), Some("Master"));
        assert!(!glossary.contains("龍"));
    }

    #[tokio::test]
    async fn test_concurrent_disjoint_merges_keep_both() {
        let store = Arc::new(GlossaryStore::new(Arc::new(SlowRepository::default())));
        let novel = id("novel-42");

        let a = {
            let store = store.clone();
            let novel = novel.clone();
            tokio::spawn(async move { store.merge(&novel, &terms(&[("甲", "A")])).await })
        };
        let b = {
            let store = store.clone();
            let novel = novel.clone();
            tokio::spawn(async move { store.merge(&novel, &terms(&[("乙", "B")])).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let glossary = store.get(&novel).await;
        assert_eq!(glossary.len(), 2);
        assert_eq!(glossary.get("甲"), Some("A"));
        assert_eq!(glossary.get("乙"), Some("B"));
    }

    #[tokio::test]
    async fn test_many_concurrent_merges_lose_nothing() {
        let store = Arc::new(GlossaryStore::new(Arc::new(SlowRepository::default())));
        let novel = id("novel-7");

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                let novel = novel.clone();
                tokio::spawn(async move {
                    let key = format!("术语{}", i);
                    let value = format!("Term {}", i);
                    store
                        .merge(&novel, &terms(&[(key.as_str(), value.as_str())]))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.get(&novel).await.len(), 8);
        assert_eq!(store.lock_count(), 0);
    }

    #[tokio::test]
    async fn test_merge_twice_is_idempotent() {
        let store = GlossaryStore::new(Arc::new(SlowRepository::default()));
        let novel = id("novel-1");

        let first = store.merge(&novel, &terms(&[("龍", "Dragon")])).await.unwrap();
        let second = store.merge(&novel, &terms(&[("龍", "Dragon")])).await.unwrap();

        assert_eq!(first.glossary, second.glossary);
        assert_eq!(first.outcome.added_count(), 1);
        assert_eq!(second.outcome.added_count(), 0);
        assert!(first.written);
        assert!(!second.written);
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let store = GlossaryStore::new(Arc::new(SlowRepository::default()));
        store.merge(&id("b-novel"), &terms(&[("龍", "Dragon")])).await.unwrap();
        store.merge(&id("a-novel"), &terms(&[("龍", "Dragon")])).await.unwrap();

        let ids = store.list().await.unwrap();
        assert_eq!(ids, vec![id("a-novel"), id("b-novel")]);
    }
}
