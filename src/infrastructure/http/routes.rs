//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/translate         POST  翻译章节并合并新术语
//! - /api/glossary/get      POST  获取术语表
//! - /api/glossary/merge    POST  手动合并术语
//! - /api/glossary/list     GET   列出所有术语表
//! - /api/novel/scrape      POST  抓取书页与目录
//! - /api/novel/chapter     POST  抓取单章正文

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/translate", post(handlers::translate_chapter))
        .nest("/glossary", glossary_routes())
        .nest("/novel", novel_routes())
}

/// Glossary 路由
fn glossary_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_glossary))
        .route("/merge", post(handlers::merge_glossary))
        .route("/list", get(handlers::list_glossaries))
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/scrape", post(handlers::scrape_novel))
        .route("/chapter", post(handlers::get_chapter))
}
