//! Glossary HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::{GetGlossary, ListGlossaries, MergeGlossaryTerms};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GetGlossaryRequest {
    #[serde(default)]
    pub novel_id: String,
}

#[derive(Debug, Serialize)]
pub struct GlossaryResponse {
    pub novel_id: String,
    pub glossary: BTreeMap<String, String>,
    pub term_count: usize,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MergeGlossaryRequest {
    #[serde(default)]
    pub novel_id: String,
    #[serde(default)]
    pub terms: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct MergeGlossaryResponse {
    pub novel_id: String,
    pub glossary: BTreeMap<String, String>,
    pub terms_added: usize,
    pub terms_overwritten: usize,
}

#[derive(Debug, Serialize)]
pub struct GlossaryListResponse {
    pub novel_ids: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 获取术语表
pub async fn get_glossary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetGlossaryRequest>,
) -> Result<Json<ApiResponse<GlossaryResponse>>, ApiError> {
    let result = state
        .get_glossary_handler
        .handle(GetGlossary {
            novel_id: req.novel_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(GlossaryResponse {
        novel_id: result.novel_id.to_string(),
        term_count: result.glossary.len(),
        glossary: result.glossary.into(),
        updated_at: result.updated_at.map(|t| t.to_rfc3339()),
    })))
}

/// 手动合并术语
pub async fn merge_glossary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MergeGlossaryRequest>,
) -> Result<Json<ApiResponse<MergeGlossaryResponse>>, ApiError> {
    let result = state
        .merge_glossary_handler
        .handle(MergeGlossaryTerms {
            novel_id: req.novel_id,
            terms: req.terms,
        })
        .await?;

    Ok(Json(ApiResponse::success(MergeGlossaryResponse {
        novel_id: result.novel_id.to_string(),
        glossary: result.glossary.into(),
        terms_added: result.terms_added,
        terms_overwritten: result.terms_overwritten,
    })))
}

/// 列出所有术语表
pub async fn list_glossaries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<GlossaryListResponse>>, ApiError> {
    let ids = state.list_glossaries_handler.handle(ListGlossaries).await?;

    Ok(Json(ApiResponse::success(GlossaryListResponse {
        novel_ids: ids.into_iter().map(|id| id.to_string()).collect(),
    })))
}
