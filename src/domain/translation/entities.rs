//! Translation Context - Entities

use std::collections::BTreeMap;

/// 单次解析结果，构造后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    chapter_title: String,
    body: String,
    new_terms: BTreeMap<String, String>,
}

impl TranslationResult {
    pub fn new(
        chapter_title: impl Into<String>,
        body: impl Into<String>,
        new_terms: BTreeMap<String, String>,
    ) -> Self {
        Self {
            chapter_title: chapter_title.into(),
            body: body.into(),
            new_terms,
        }
    }

    pub fn chapter_title(&self) -> &str {
        &self.chapter_title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn new_terms(&self) -> &BTreeMap<String, String> {
        &self.new_terms
    }

    pub fn into_parts(self) -> (String, String, BTreeMap<String, String>) {
        (self.chapter_title, self.body, self.new_terms)
    }
}

/// 单次翻译请求的阶段
///
/// `Idle → GlossaryLoaded → ModelResponded → Merged`，任何阶段都不自动重试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationStage {
    Idle,
    GlossaryLoaded,
    ModelResponded,
    Merged,
}

impl TranslationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationStage::Idle => "idle",
            TranslationStage::GlossaryLoaded => "glossary_loaded",
            TranslationStage::ModelResponded => "model_responded",
            TranslationStage::Merged => "merged",
        }
    }

    /// 下一阶段；`Merged` 为终态
    pub fn next(self) -> Option<Self> {
        match self {
            TranslationStage::Idle => Some(TranslationStage::GlossaryLoaded),
            TranslationStage::GlossaryLoaded => Some(TranslationStage::ModelResponded),
            TranslationStage::ModelResponded => Some(TranslationStage::Merged),
            TranslationStage::Merged => None,
        }
    }
}

impl std::fmt::Display for TranslationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
