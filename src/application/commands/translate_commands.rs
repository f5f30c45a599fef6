//! Translate Commands

use std::collections::BTreeMap;

use crate::domain::Glossary;

/// 翻译章节命令
#[derive(Debug, Clone)]
pub struct TranslateChapter {
    /// 原文正文
    pub text: String,
    /// 原文章节名（解析不到译名时作为回退标题）
    pub chapter_name: String,
    pub novel_id: String,
}

/// 翻译章节响应
#[derive(Debug, Clone)]
pub struct TranslateChapterResponse {
    pub chapter_title: String,
    pub translation: String,
    /// 模型本次返回的全部新术语
    pub new_terms: BTreeMap<String, String>,
    /// 合并后的术语表快照；写入失败时为合并前的术语表
    pub glossary: Glossary,
    /// 真正新增的键数
    pub terms_added: usize,
    /// 被改写译名的已有键数
    pub terms_overwritten: usize,
    /// 术语表更新是否已持久化
    pub glossary_persisted: bool,
    /// 写入失败原因
    pub storage_error: Option<String>,
}
