//! Glossary Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::glossary_store::GlossaryStore;
use crate::application::queries::{GetGlossary, GlossaryResponse, ListGlossaries};
use crate::domain::NovelId;

/// GetGlossary Handler
///
/// 未知小说返回空术语表，不报错
pub struct GetGlossaryHandler {
    store: Arc<GlossaryStore>,
}

impl GetGlossaryHandler {
    pub fn new(store: Arc<GlossaryStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetGlossary) -> Result<GlossaryResponse, ApplicationError> {
        let novel_id = NovelId::parse(&query.novel_id)?;
        let snapshot = self.store.snapshot(&novel_id).await;

        Ok(GlossaryResponse {
            novel_id: snapshot.novel_id,
            glossary: snapshot.glossary,
            updated_at: snapshot.updated_at,
        })
    }
}

/// ListGlossaries Handler
pub struct ListGlossariesHandler {
    store: Arc<GlossaryStore>,
}

impl ListGlossariesHandler {
    pub fn new(store: Arc<GlossaryStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, _query: ListGlossaries) -> Result<Vec<NovelId>, ApplicationError> {
        Ok(self.store.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::infrastructure::memory::InMemoryGlossaryRepository;

    #[tokio::test]
    async fn test_get_unknown_glossary_is_empty() {
        let store = Arc::new(GlossaryStore::new(Arc::new(InMemoryGlossaryRepository::new())));
        let handler = GetGlossaryHandler::new(store);

        let response = handler
            .handle(GetGlossary {
                novel_id: "never-seen".to_string(),
            })
            .await
            .unwrap();

        assert!(response.glossary.is_empty());
        assert!(response.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_get_rejects_invalid_id() {
        let store = Arc::new(GlossaryStore::new(Arc::new(InMemoryGlossaryRepository::new())));
        let handler = GetGlossaryHandler::new(store);

        let result = handler
            .handle(GetGlossary {
                novel_id: "../../secret".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_list_after_merge() {
        let store = Arc::new(GlossaryStore::new(Arc::new(InMemoryGlossaryRepository::new())));
        let novel_id = NovelId::parse("novel-9").unwrap();
        store
            .merge(
                &novel_id,
                &BTreeMap::from([("龍".to_string(), "Dragon".to_string())]),
            )
            .await
            .unwrap();

        let ids = ListGlossariesHandler::new(store)
            .handle(ListGlossaries)
            .await
            .unwrap();
        assert_eq!(ids, vec![novel_id]);
    }
}
