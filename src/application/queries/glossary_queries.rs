//! Glossary Queries

use chrono::{DateTime, Utc};

use crate::domain::{Glossary, NovelId};

/// 获取术语表查询
#[derive(Debug, Clone)]
pub struct GetGlossary {
    pub novel_id: String,
}

/// 术语表响应
#[derive(Debug, Clone)]
pub struct GlossaryResponse {
    pub novel_id: NovelId,
    pub glossary: Glossary,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 列出所有术语表查询
#[derive(Debug, Clone)]
pub struct ListGlossaries;
