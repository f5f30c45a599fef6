//! Glossary Command Handlers

use std::sync::Arc;

use crate::application::commands::{MergeGlossaryResponse, MergeGlossaryTerms};
use crate::application::error::ApplicationError;
use crate::application::glossary_store::GlossaryStore;
use crate::domain::{Glossary, NovelId};

/// MergeGlossaryTerms Handler - 手动维护术语
pub struct MergeGlossaryHandler {
    store: Arc<GlossaryStore>,
}

impl MergeGlossaryHandler {
    pub fn new(store: Arc<GlossaryStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        command: MergeGlossaryTerms,
    ) -> Result<MergeGlossaryResponse, ApplicationError> {
        let novel_id = NovelId::parse(&command.novel_id)?;
        let terms = Glossary::sanitize_terms(&command.terms)?;
        if terms.is_empty() {
            return Err(ApplicationError::validation("Terms cannot be empty"));
        }

        let report = self.store.merge(&novel_id, &terms).await?;

        tracing::info!(
            novel_id = %novel_id,
            terms_added = report.outcome.added_count(),
            terms_overwritten = report.outcome.overwritten_count(),
            "Glossary terms merged manually"
        );

        Ok(MergeGlossaryResponse {
            novel_id,
            glossary: report.glossary,
            terms_added: report.outcome.added_count(),
            terms_overwritten: report.outcome.overwritten_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::infrastructure::memory::InMemoryGlossaryRepository;

    fn handler() -> MergeGlossaryHandler {
        MergeGlossaryHandler::new(Arc::new(GlossaryStore::new(Arc::new(
            InMemoryGlossaryRepository::new(),
        ))))
    }

    #[tokio::test]
    async fn test_merge_trims_and_counts() {
        let handler = handler();
        let response = handler
            .handle(MergeGlossaryTerms {
                novel_id: "novel-1".to_string(),
                terms: BTreeMap::from([(" 龍 ".to_string(), " Dragon ".to_string())]),
            })
            .await
            .unwrap();

        assert_eq!(response.terms_added, 1);
        assert_eq!(response.glossary.get("龍"), Some("Dragon"));
    }

    #[tokio::test]
    async fn test_merge_rejects_empty_terms() {
        let result = handler()
            .handle(MergeGlossaryTerms {
                novel_id: "novel-1".to_string(),
                terms: BTreeMap::new(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_merge_rejects_blank_target() {
        let result = handler()
            .handle(MergeGlossaryTerms {
                novel_id: "novel-1".to_string(),
                terms: BTreeMap::from([("龍".to_string(), "".to_string())]),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }
}
