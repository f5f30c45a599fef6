//! Translate Command Handler
//!
//! 单次翻译请求的编排：
//! 读取术语表 → 调用翻译模型 → 解析输出 → 合并新术语
//!
//! 模型调用失败时不修改术语表；术语表写入失败时仍返回译文，
//! 并通过 `glossary_persisted = false` 显式告知调用方。

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{TranslateChapter, TranslateChapterResponse};
use crate::application::error::ApplicationError;
use crate::application::glossary_store::GlossaryStore;
use crate::application::ports::LlmClientPort;
use crate::domain::translation::build_prompt;
use crate::domain::{NovelId, ResponseParser, TranslationStage};

/// TranslateChapter Handler
pub struct TranslateChapterHandler {
    llm: Arc<dyn LlmClientPort>,
    store: Arc<GlossaryStore>,
    parser: ResponseParser,
}

impl TranslateChapterHandler {
    pub fn new(llm: Arc<dyn LlmClientPort>, store: Arc<GlossaryStore>) -> Self {
        Self {
            llm,
            store,
            parser: ResponseParser::default(),
        }
    }

    pub fn with_parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    pub async fn handle(
        &self,
        command: TranslateChapter,
    ) -> Result<TranslateChapterResponse, ApplicationError> {
        let text = command.text.trim();
        let chapter_name = command.chapter_name.trim();
        if text.is_empty() {
            return Err(ApplicationError::validation("Text cannot be empty"));
        }
        if chapter_name.is_empty() {
            return Err(ApplicationError::validation("Chapter name cannot be empty"));
        }
        if command.novel_id.trim().is_empty() {
            return Err(ApplicationError::validation("Novel ID cannot be empty"));
        }
        let novel_id = NovelId::parse(&command.novel_id)?;

        let request_id = Uuid::new_v4();
        let mut stage = TranslationStage::Idle;

        tracing::info!(
            request_id = %request_id,
            novel_id = %novel_id,
            chapter = %chapter_name,
            text_chars = text.chars().count(),
            "Translation started"
        );

        // 1. 读取术语表
        let glossary = self.store.get(&novel_id).await;
        stage = advance(stage, request_id);

        // 2. 调用翻译模型
        let prompt = build_prompt(&glossary, chapter_name, text);
        let raw = self
            .llm
            .complete(&prompt.system, &prompt.user)
            .await
            .map_err(|e| {
                tracing::error!(
                    request_id = %request_id,
                    novel_id = %novel_id,
                    stage = %stage,
                    model = %self.llm.model(),
                    error = %e,
                    "Translation model call failed"
                );
                ApplicationError::from(e)
            })?;
        stage = advance(stage, request_id);

        // 3. 解析输出
        let parsed = self.parser.parse(&raw, chapter_name);
        let (chapter_title, translation, new_terms) = parsed.into_parts();

        // 4. 合并新术语
        let mut response = TranslateChapterResponse {
            chapter_title,
            translation,
            new_terms,
            glossary,
            terms_added: 0,
            terms_overwritten: 0,
            glossary_persisted: true,
            storage_error: None,
        };

        if !response.new_terms.is_empty() {
            match self.store.merge(&novel_id, &response.new_terms).await {
                Ok(report) => {
                    response.terms_added = report.outcome.added_count();
                    response.terms_overwritten = report.outcome.overwritten_count();
                    response.glossary = report.glossary;
                }
                Err(e) => {
                    tracing::error!(
                        request_id = %request_id,
                        novel_id = %novel_id,
                        stage = %stage,
                        new_terms = response.new_terms.len(),
                        error = %e,
                        "Glossary update did not persist"
                    );
                    response.glossary_persisted = false;
                    response.storage_error = Some(ApplicationError::from(e).to_string());
                }
            }
        }
        stage = advance(stage, request_id);

        tracing::info!(
            request_id = %request_id,
            novel_id = %novel_id,
            chapter = %chapter_name,
            stage = %stage,
            terms_added = response.terms_added,
            terms_overwritten = response.terms_overwritten,
            glossary_persisted = response.glossary_persisted,
            "Translation completed"
        );

        Ok(response)
    }
}

fn advance(stage: TranslationStage, request_id: Uuid) -> TranslationStage {
    let next = stage.next().unwrap_or(stage);
    tracing::debug!(request_id = %request_id, from = %stage, to = %next, "Translation stage");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    use crate::application::ports::{GlossaryRecord, GlossaryRepositoryPort, RepositoryError};
    use crate::domain::Glossary;
    use crate::infrastructure::adapters::FakeLlmClient;
    use crate::infrastructure::memory::InMemoryGlossaryRepository;

    /// 可读不可写的仓储
    struct ReadOnlyRepository {
        inner: InMemoryGlossaryRepository,
    }

    #[async_trait]
    impl GlossaryRepositoryPort for ReadOnlyRepository {
        async fn read(
            &self,
            novel_id: &NovelId,
        ) -> Result<Option<GlossaryRecord>, RepositoryError> {
            self.inner.read(novel_id).await
        }

        async fn write(&self, _record: &GlossaryRecord) -> Result<(), RepositoryError> {
            Err(RepositoryError::IoError("read-only filesystem".to_string()))
        }

        async fn list_ids(&self) -> Result<Vec<NovelId>, RepositoryError> {
            self.inner.list_ids().await
        }
    }

    async fn seeded_repo(novel: &str, pairs: &[(&str, &str)]) -> InMemoryGlossaryRepository {
        let repo = InMemoryGlossaryRepository::new();
        let glossary: Glossary = pairs.iter().copied().collect();
        repo.write(&GlossaryRecord::new(NovelId::parse(novel).unwrap(), glossary))
            .await
            .unwrap();
        repo
    }

    fn command(novel_id: &str) -> TranslateChapter {
        TranslateChapter {
            text: "他走进了阁中，拜见阁主。".to_string(),
            chapter_name: "Chapter 3".to_string(),
            novel_id: novel_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_translate_merges_new_terms() {
        let repo = Arc::new(seeded_repo("novel-42", &[("師父", "Master")]).await);
        let store = Arc::new(GlossaryStore::new(repo));
        let llm = Arc::new(FakeLlmClient::with_response(
            "CHAPTER_TITLE: The Hall\nTRANSLATION: He entered the hall to greet the Hall Master.\nNEW_TERMS:\n阁主:Hall Master",
        ));
        let handler = TranslateChapterHandler::new(llm.clone(), store.clone());

        let response = handler.handle(command("novel-42")).await.unwrap();

        assert_eq!(response.chapter_title, "The Hall");
        assert_eq!(response.translation, "He entered the hall to greet the Hall Master.");
        assert_eq!(response.terms_added, 1);
        assert_eq!(response.terms_overwritten, 0);
        assert!(response.glossary_persisted);
        assert_eq!(response.glossary.len(), 2);
        assert_eq!(response.glossary.get("師父"), Some("Master"));
        assert_eq!(response.glossary.get("阁主"), Some("Hall Master"));

        let stored = store.get(&NovelId::parse("novel-42").unwrap()).await;
        assert_eq!(stored, response.glossary);
    }

    #[tokio::test]
    async fn test_translate_embeds_existing_glossary_in_prompt() {
        let repo = Arc::new(seeded_repo("novel-42", &[("師父", "Master")]).await);
        let store = Arc::new(GlossaryStore::new(repo));
        let llm = Arc::new(FakeLlmClient::with_response("TRANSLATION: ok"));
        let handler = TranslateChapterHandler::new(llm.clone(), store);

        handler.handle(command("novel-42")).await.unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        let (_, user) = &prompts[0];
        assert!(user.contains("師父 -> Master"));
        assert!(user.contains("Chapter Title: Chapter 3"));
        assert!(user.contains("他走进了阁中"));
    }

    #[tokio::test]
    async fn test_translate_counts_overwrites_separately() {
        let repo = Arc::new(seeded_repo("novel-1", &[("師父", "Master")]).await);
        let store = Arc::new(GlossaryStore::new(repo));
        let llm = Arc::new(FakeLlmClient::with_response(
            "TRANSLATION: body\nNEW_TERMS:\n師父:Teacher\n龍:Dragon",
        ));
        let handler = TranslateChapterHandler::new(llm, store);

        let response = handler.handle(command("novel-1")).await.unwrap();

        assert_eq!(response.terms_added, 1);
        assert_eq!(response.terms_overwritten, 1);
        assert_eq!(response.glossary.get("師父"), Some("Teacher"));
        assert_eq!(response.chapter_title, "Chapter 3");
    }

    #[tokio::test]
    async fn test_translate_without_new_terms_keeps_glossary() {
        let repo = Arc::new(seeded_repo("novel-1", &[("龍", "Dragon")]).await);
        let store = Arc::new(GlossaryStore::new(repo));
        let llm = Arc::new(FakeLlmClient::with_response("TRANSLATION: plain"));
        let handler = TranslateChapterHandler::new(llm, store);

        let response = handler.handle(command("novel-1")).await.unwrap();

        assert!(response.new_terms.is_empty());
        assert_eq!(response.terms_added, 0);
        assert!(response.glossary_persisted);
        assert_eq!(response.glossary.get("龍"), Some("Dragon"));
    }

    #[tokio::test]
    async fn test_translate_validation_errors() {
        let store = Arc::new(GlossaryStore::new(Arc::new(InMemoryGlossaryRepository::new())));
        let llm = Arc::new(FakeLlmClient::with_defaults());
        let handler = TranslateChapterHandler::new(llm.clone(), store);

        let mut cmd = command("novel-1");
        cmd.text = "   ".to_string();
        assert!(matches!(
            handler.handle(cmd).await,
            Err(ApplicationError::ValidationError(_))
        ));

        let mut cmd = command("novel-1");
        cmd.chapter_name = "\n".to_string();
        assert!(matches!(
            handler.handle(cmd).await,
            Err(ApplicationError::ValidationError(_))
        ));

        assert!(matches!(
            handler.handle(command(" ")).await,
            Err(ApplicationError::ValidationError(_))
        ));
        assert!(matches!(
            handler.handle(command("bad/id")).await,
            Err(ApplicationError::ValidationError(_))
        ));

        // 校验失败时不调用模型
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_translate_model_failure_leaves_glossary_untouched() {
        let repo = Arc::new(seeded_repo("novel-1", &[("龍", "Dragon")]).await);
        let store = Arc::new(GlossaryStore::new(repo));
        let llm = Arc::new(FakeLlmClient::failing("upstream 503"));
        let handler = TranslateChapterHandler::new(llm, store.clone());

        let result = handler.handle(command("novel-1")).await;

        assert!(matches!(result, Err(ApplicationError::TranslationError(_))));
        let glossary = store.get(&NovelId::parse("novel-1").unwrap()).await;
        assert_eq!(glossary.len(), 1);
    }

    #[tokio::test]
    async fn test_translate_storage_failure_still_returns_translation() {
        let repo = Arc::new(ReadOnlyRepository {
            inner: seeded_repo("novel-1", &[("龍", "Dragon")]).await,
        });
        let store = Arc::new(GlossaryStore::new(repo));
        let llm = Arc::new(FakeLlmClient::with_response(
            "CHAPTER_TITLE: T\nTRANSLATION: The sword sang.\nNEW_TERMS:\n劍:Sword",
        ));
        let handler = TranslateChapterHandler::new(llm, store);

        let response = handler.handle(command("novel-1")).await.unwrap();

        assert_eq!(response.translation, "The sword sang.");
        assert!(!response.glossary_persisted);
        assert!(response.storage_error.is_some());
        assert_eq!(response.terms_added, 0);
        assert_eq!(
            response.new_terms,
            BTreeMap::from([("劍".to_string(), "Sword".to_string())])
        );
        // 返回写入前的术语表
        assert_eq!(response.glossary.len(), 1);
        assert!(!response.glossary.contains("劍"));
    }
}
