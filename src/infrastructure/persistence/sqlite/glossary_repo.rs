//! SQLite Glossary Repository
//!
//! 每个术语一行，`(novel_id, source_term)` 为主键

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeMap;

use super::DbPool;
use crate::application::ports::{GlossaryRecord, GlossaryRepositoryPort, RepositoryError};
use crate::domain::{Glossary, NovelId};

/// SQLite Glossary Repository
pub struct SqliteGlossaryRepository {
    pool: DbPool,
}

impl SqliteGlossaryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TermRow {
    source_term: String,
    target_term: String,
    updated_at: String,
}

fn parse_timestamp(novel_id: &NovelId, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Corrupted {
            novel_id: novel_id.to_string(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl GlossaryRepositoryPort for SqliteGlossaryRepository {
    async fn read(&self, novel_id: &NovelId) -> Result<Option<GlossaryRecord>, RepositoryError> {
        let rows: Vec<TermRow> = sqlx::query_as(
            "SELECT source_term, target_term, updated_at FROM glossary_terms WHERE novel_id = ?",
        )
        .bind(novel_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut updated_at: Option<DateTime<Utc>> = None;
        let mut terms = BTreeMap::new();
        for row in rows {
            let ts = parse_timestamp(novel_id, &row.updated_at)?;
            updated_at = Some(updated_at.map_or(ts, |current| current.max(ts)));
            terms.insert(row.source_term, row.target_term);
        }

        Ok(Some(GlossaryRecord {
            novel_id: novel_id.clone(),
            glossary: Glossary::from(terms),
            updated_at: updated_at.unwrap_or_else(Utc::now),
        }))
    }

    async fn write(&self, record: &GlossaryRecord) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM glossary_terms WHERE novel_id = ?")
            .bind(record.novel_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let updated_at = record.updated_at.to_rfc3339();
        for (source, target) in record.glossary.iter() {
            sqlx::query(
                r#"
                INSERT INTO glossary_terms (novel_id, source_term, target_term, updated_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(record.novel_id.as_str())
            .bind(source)
            .bind(target)
            .bind(&updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            novel_id = %record.novel_id,
            terms = record.glossary.len(),
            "Glossary stored in sqlite"
        );
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<NovelId>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT novel_id FROM glossary_terms ORDER BY novel_id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|(raw,)| {
                NovelId::parse(&raw).map_err(|e| RepositoryError::Corrupted {
                    novel_id: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteGlossaryRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteGlossaryRepository::new(pool)
    }

    #[tokio::test]
    async fn test_write_replaces_rows() {
        let repo = repo().await;
        let novel_id = NovelId::parse("novel-1").unwrap();

        let first: Glossary = [("龍", "Dragon"), ("剑", "Sword")].into_iter().collect();
        repo.write(&GlossaryRecord::new(novel_id.clone(), first))
            .await
            .unwrap();

        let second: Glossary = [("龍", "Loong")].into_iter().collect();
        repo.write(&GlossaryRecord::new(novel_id.clone(), second.clone()))
            .await
            .unwrap();

        let record = repo.read(&novel_id).await.unwrap().unwrap();
        assert_eq!(record.glossary, second);
    }

    #[tokio::test]
    async fn test_unknown_and_list() {
        let repo = repo().await;
        assert!(repo
            .read(&NovelId::parse("missing").unwrap())
            .await
            .unwrap()
            .is_none());

        for raw in ["b", "a"] {
            let glossary: Glossary = [("龍", "Dragon")].into_iter().collect();
            repo.write(&GlossaryRecord::new(NovelId::parse(raw).unwrap(), glossary))
                .await
                .unwrap();
        }

        let ids: Vec<String> = repo
            .list_ids()
            .await
            .unwrap()
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
