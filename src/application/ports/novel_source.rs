//! Novel Source Port - 小说站点抓取抽象
//!
//! 只抓取静态 HTML，不渲染页面

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 抓取错误
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTML parse error: {0}")]
    ParseError(String),

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Chapter content too short: {len} chars (must exceed {min})")]
    ContentTooShort { len: usize, min: usize },
}

/// 目录中的单个章节
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterLink {
    pub chapter_number: Option<String>,
    pub chapter_name: String,
    pub url: String,
}

/// 小说详情（书页 + 目录）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NovelDetails {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover_img: Option<String>,
    pub chapters: Vec<ChapterLink>,
    /// 目录页只静态渲染了部分章节
    pub chapters_truncated: bool,
}

/// Novel Source Port
#[async_trait]
pub trait NovelSourcePort: Send + Sync {
    /// 抓取小说详情与章节目录
    async fn fetch_novel(&self, url: &str) -> Result<NovelDetails, SourceError>;

    /// 抓取单章正文（已清洗为纯文本，按行分隔）
    async fn fetch_chapter(&self, url: &str) -> Result<String, SourceError>;
}
