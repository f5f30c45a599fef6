//! Translate HTTP Handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::TranslateChapter;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub chapter_name: String,
    #[serde(default)]
    pub novel_id: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub chapter_title: String,
    pub translation: String,
    pub new_terms: BTreeMap<String, String>,
    pub glossary: BTreeMap<String, String>,
    pub terms_added: usize,
    pub terms_overwritten: usize,
    pub glossary_persisted: bool,
    pub storage_error: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 翻译章节并合并新术语
pub async fn translate_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<ApiResponse<TranslateResponse>>, ApiError> {
    let command = TranslateChapter {
        text: req.text,
        chapter_name: req.chapter_name,
        novel_id: req.novel_id,
    };

    let result = state.translate_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(TranslateResponse {
        chapter_title: result.chapter_title,
        translation: result.translation,
        new_terms: result.new_terms,
        glossary: result.glossary.into(),
        terms_added: result.terms_added,
        terms_overwritten: result.terms_overwritten,
        glossary_persisted: result.glossary_persisted,
        storage_error: result.storage_error,
    })))
}
