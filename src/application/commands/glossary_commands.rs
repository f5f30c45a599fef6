//! Glossary Commands

use std::collections::BTreeMap;

use crate::domain::{Glossary, NovelId};

/// 手动合并术语命令（管理用途）
#[derive(Debug, Clone)]
pub struct MergeGlossaryTerms {
    pub novel_id: String,
    pub terms: BTreeMap<String, String>,
}

/// 合并术语响应
#[derive(Debug, Clone)]
pub struct MergeGlossaryResponse {
    pub novel_id: NovelId,
    pub glossary: Glossary,
    pub terms_added: usize,
    pub terms_overwritten: usize,
}
