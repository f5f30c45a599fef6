//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    MergeGlossaryHandler, TranslateChapterHandler,
    // Query handlers
    ExtractChapterHandler, GetGlossaryHandler, ListGlossariesHandler, ScrapeNovelHandler,
    // Services & ports
    GlossaryRepositoryPort, GlossaryStore, LlmClientPort, NovelSourcePort,
};
use crate::domain::translation::{ResponseParser, SectionMarkers};

/// 应用状态
///
/// 启动时构建一次，所有请求共享同一个 `GlossaryStore`（按小说 ID 串行合并）
pub struct AppState {
    // ========== Command Handlers ==========
    pub translate_handler: TranslateChapterHandler,
    pub merge_glossary_handler: MergeGlossaryHandler,

    // ========== Query Handlers ==========
    pub get_glossary_handler: GetGlossaryHandler,
    pub list_glossaries_handler: ListGlossariesHandler,
    pub scrape_novel_handler: ScrapeNovelHandler,
    pub extract_chapter_handler: ExtractChapterHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        llm: Arc<dyn LlmClientPort>,
        glossary_repo: Arc<dyn GlossaryRepositoryPort>,
        novel_source: Arc<dyn NovelSourcePort>,
        markers: SectionMarkers,
    ) -> Self {
        let glossary_store = GlossaryStore::new(glossary_repo).arc();

        Self {
            // Command handlers
            translate_handler: TranslateChapterHandler::new(llm, glossary_store.clone())
                .with_parser(ResponseParser::new(markers)),
            merge_glossary_handler: MergeGlossaryHandler::new(glossary_store.clone()),

            // Query handlers
            get_glossary_handler: GetGlossaryHandler::new(glossary_store.clone()),
            list_glossaries_handler: ListGlossariesHandler::new(glossary_store),
            scrape_novel_handler: ScrapeNovelHandler::new(novel_source.clone()),
            extract_chapter_handler: ExtractChapterHandler::new(novel_source),
        }
    }
}
