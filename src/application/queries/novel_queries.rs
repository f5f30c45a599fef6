//! Novel Queries - 小说站点抓取

/// 抓取小说详情与目录
#[derive(Debug, Clone)]
pub struct ScrapeNovel {
    pub url: String,
}

/// 抓取单章正文
#[derive(Debug, Clone)]
pub struct ExtractChapter {
    pub url: String,
}

/// 单章正文响应
#[derive(Debug, Clone)]
pub struct ChapterContentResponse {
    pub url: String,
    pub content: String,
}
