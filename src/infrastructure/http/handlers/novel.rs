//! Novel HTTP Handlers - 站点抓取

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{ExtractChapter, NovelDetails, ScrapeNovel};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub url: String,
    pub content: String,
}

/// 抓取书页与目录
pub async fn scrape_novel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UrlRequest>,
) -> Result<Json<ApiResponse<NovelDetails>>, ApiError> {
    let details = state
        .scrape_novel_handler
        .handle(ScrapeNovel { url: req.url })
        .await?;

    Ok(Json(ApiResponse::success(details)))
}

/// 抓取单章正文
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UrlRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let result = state
        .extract_chapter_handler
        .handle(ExtractChapter { url: req.url })
        .await?;

    Ok(Json(ApiResponse::success(ChapterResponse {
        url: result.url,
        content: result.content,
    })))
}
