//! 译文响应解析器
//!
//! 将翻译模型返回的原始文本拆分为章节标题、正文和新术语三段。
//!
//! 解析策略：
//! 1. 从左到右扫描所有已识别的段落标记（标题、正文、新术语）
//! 2. 每个段落取该类标记的第一次出现，内容截止到下一个标记或文本结尾
//! 3. 新术语段按行拆分，每行在第一个分隔符处切成 `原文:译名`
//!
//! 解析永不失败：缺失标题时回退到调用方给出的标题，缺失正文标记时
//! 整段文本即为正文，缺失新术语标记时新术语为空。

use std::collections::BTreeMap;

use super::TranslationResult;

/// 默认标题标记
pub const TITLE_MARKER: &str = "CHAPTER_TITLE:";
/// 默认正文标记
pub const BODY_MARKER: &str = "TRANSLATION:";
/// 默认新术语标记
pub const NEW_TERMS_MARKER: &str = "NEW_TERMS:";

/// 新术语行的分隔符（半角、全角冒号）
pub const TERM_SEPARATORS: &[char] = &[':', '：'];

/// 段落类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Title,
    Body,
    NewTerms,
}

/// 一次标记命中
#[derive(Debug, Clone, Copy)]
struct MarkerHit {
    section: Section,
    /// 标记起始字节位置
    start: usize,
    /// 标记之后内容的起始字节位置
    content_start: usize,
}

/// 段落标记配置
///
/// 每类段落可以有多个别名（如 `NEW_TERMS:` 与 `NEW TERMS:`）
#[derive(Debug, Clone)]
pub struct SectionMarkers {
    pub title: Vec<String>,
    pub body: Vec<String>,
    pub new_terms: Vec<String>,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            title: vec![TITLE_MARKER.to_string()],
            body: vec![BODY_MARKER.to_string()],
            new_terms: vec![NEW_TERMS_MARKER.to_string(), "NEW TERMS:".to_string()],
        }
    }
}

impl SectionMarkers {
    fn all(&self) -> impl Iterator<Item = (Section, &str)> {
        self.title
            .iter()
            .map(|m| (Section::Title, m.as_str()))
            .chain(self.body.iter().map(|m| (Section::Body, m.as_str())))
            .chain(self.new_terms.iter().map(|m| (Section::NewTerms, m.as_str())))
            .filter(|(_, m)| !m.is_empty())
    }

    /// 在 `pos` 处匹配最长的标记
    fn match_at(&self, text: &str, pos: usize) -> Option<(Section, usize)> {
        let rest = &text[pos..];
        self.all()
            .filter(|(_, marker)| rest.starts_with(*marker))
            .max_by_key(|(_, marker)| marker.len())
            .map(|(section, marker)| (section, marker.len()))
    }
}

/// 译文响应解析器
#[derive(Debug, Clone, Default)]
pub struct ResponseParser {
    markers: SectionMarkers,
}

impl ResponseParser {
    pub fn new(markers: SectionMarkers) -> Self {
        Self { markers }
    }

    /// 解析模型原始输出
    pub fn parse(&self, raw_text: &str, fallback_title: &str) -> TranslationResult {
        let hits = self.scan(raw_text);

        let title = self
            .section_content(raw_text, &hits, Section::Title)
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback_title)
            .to_string();

        let body = self
            .section_content(raw_text, &hits, Section::Body)
            .unwrap_or_else(|| raw_text.trim())
            .to_string();

        let new_terms = self
            .section_content(raw_text, &hits, Section::NewTerms)
            .map(parse_term_lines)
            .unwrap_or_default();

        TranslationResult::new(title, body, new_terms)
    }

    /// 顺序扫描全文，记录所有标记出现位置（互不重叠）
    fn scan(&self, text: &str) -> Vec<MarkerHit> {
        let mut hits = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            if let Some((section, len)) = self.markers.match_at(text, pos) {
                hits.push(MarkerHit {
                    section,
                    start: pos,
                    content_start: pos + len,
                });
                pos += len;
                continue;
            }
            // 按字符前进，保证切片落在 UTF-8 边界上
            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }

        hits
    }

    /// 取某类段落第一次出现的内容，截止到下一个标记
    fn section_content<'a>(
        &self,
        text: &'a str,
        hits: &[MarkerHit],
        section: Section,
    ) -> Option<&'a str> {
        let index = hits.iter().position(|hit| hit.section == section)?;
        let hit = hits[index];
        let end = hits.get(index + 1).map_or(text.len(), |next| next.start);
        Some(text[hit.content_start..end].trim())
    }
}

/// 解析新术语段：每行 `原文:译名`，在第一个分隔符处切分
///
/// 无分隔符、任一侧为空的行直接忽略。
pub fn parse_term_lines(section: &str) -> BTreeMap<String, String> {
    let mut terms = BTreeMap::new();

    for line in section.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(index) = line.find(TERM_SEPARATORS) else {
            continue;
        };
        let separator_len = line[index..].chars().next().map_or(1, char::len_utf8);
        let source = line[..index].trim();
        let target = line[index + separator_len..].trim();
        if source.is_empty() || target.is_empty() {
            continue;
        }
        terms.insert(source.to_string(), target.to_string());
    }

    terms
}
