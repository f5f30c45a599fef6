//! Novel Query Handlers - 小说站点抓取

use reqwest::Url;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{NovelDetails, NovelSourcePort};
use crate::application::queries::{ChapterContentResponse, ExtractChapter, ScrapeNovel};

/// 校验抓取地址：必须是绝对 http(s) URL
fn validate_url(raw: &str) -> Result<Url, ApplicationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApplicationError::validation("URL cannot be empty"));
    }
    let url = Url::parse(raw)
        .map_err(|e| ApplicationError::validation(format!("Invalid URL {}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApplicationError::validation(format!(
            "Unsupported URL scheme: {}",
            url.scheme()
        )));
    }
    Ok(url)
}

/// ScrapeNovel Handler
pub struct ScrapeNovelHandler {
    source: Arc<dyn NovelSourcePort>,
}

impl ScrapeNovelHandler {
    pub fn new(source: Arc<dyn NovelSourcePort>) -> Self {
        Self { source }
    }

    pub async fn handle(&self, query: ScrapeNovel) -> Result<NovelDetails, ApplicationError> {
        let url = validate_url(&query.url)?;

        tracing::info!(url = %url, "Scraping novel");
        let details = self.source.fetch_novel(url.as_str()).await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Novel scrape failed");
            ApplicationError::from(e)
        })?;

        tracing::info!(
            url = %url,
            title = ?details.title,
            chapters = details.chapters.len(),
            truncated = details.chapters_truncated,
            "Novel scraped"
        );
        Ok(details)
    }
}

/// ExtractChapter Handler
pub struct ExtractChapterHandler {
    source: Arc<dyn NovelSourcePort>,
}

impl ExtractChapterHandler {
    pub fn new(source: Arc<dyn NovelSourcePort>) -> Self {
        Self { source }
    }

    pub async fn handle(
        &self,
        query: ExtractChapter,
    ) -> Result<ChapterContentResponse, ApplicationError> {
        let url = validate_url(&query.url)?;

        tracing::info!(url = %url, "Extracting chapter");
        let content = self.source.fetch_chapter(url.as_str()).await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Chapter extraction failed");
            ApplicationError::from(e)
        })?;

        tracing::info!(url = %url, chars = content.chars().count(), "Chapter extracted");
        Ok(ChapterContentResponse {
            url: url.to_string(),
            content,
        })
    }
}
