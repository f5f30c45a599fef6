//! Twkan Source - twkan 站点模板的静态 HTML 抓取
//!
//! 实现 NovelSourcePort trait
//!
//! 页面结构:
//! - 书页: `div.bookbox` 内含封面 `div.bookimg2 img`、书名 `div.booknav2 h1 a`、作者段落 `作者：`
//! - 目录: `{书页地址去掉 .html}/index.html`，标题为 `目錄` 的 `div.catalog` 内
//!   `div#allchapter li[data-num] a`；存在 `a#loadmore` 时静态 HTML 只含部分章节
//! - 正文: `div#txtcontent`，`<br>` 分行

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;

use crate::application::ports::{ChapterLink, NovelDetails, NovelSourcePort, SourceError};

/// 作者段落前缀
const AUTHOR_LABEL: &str = "作者：";

/// 目录区块标题
const CATALOG_HEADING: &str = "目錄";

/// 正文容器选择器，按优先级排列
const CONTENT_SELECTORS: &[&str] = &[
    "div#txtcontent",
    "#txtcontent",
    ".content",
    ".chapter-content",
    ".txt-content",
    "[class*=\"content\"]",
    "[id*=\"content\"]",
];

/// 抓取客户端配置
#[derive(Debug, Clone)]
pub struct TwkanSourceConfig {
    pub user_agent: String,
    pub accept_language: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 正文字符数必须超过该值，否则视为抓取失败
    pub min_content_chars: usize,
}

impl Default for TwkanSourceConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            accept_language: "zh-TW,zh;q=0.9,en;q=0.8".to_string(),
            timeout_secs: 45,
            min_content_chars: 50,
        }
    }
}

/// twkan 站点抓取器
pub struct TwkanSource {
    client: Client,
    config: TwkanSourceConfig,
}

impl TwkanSource {
    pub fn new(config: TwkanSourceConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| SourceError::NetworkError(format!("Invalid Accept-Language: {}", e)))?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, SourceError> {
        tracing::debug!(url = %url, "Fetching page");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(url.to_string())
            } else {
                SourceError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::NetworkError(format!("Failed to read body: {}", e)))
    }
}

#[async_trait]
impl NovelSourcePort for TwkanSource {
    async fn fetch_novel(&self, url: &str) -> Result<NovelDetails, SourceError> {
        let book_url = parse_url(url.trim_end_matches('/'))?;
        let book_html = self.fetch_html(&book_url).await?;
        let mut details = parse_book_page(&book_html, &book_url)?;

        let index_url = index_url_for(&book_url)?;
        let index_html = self.fetch_html(&index_url).await?;
        let index = parse_chapter_index(&index_html, &index_url)?;

        if index.chapters.is_empty() {
            return Err(SourceError::MissingElement("chapter list".to_string()));
        }
        if index.truncated {
            tracing::warn!(
                url = %index_url,
                chapters = index.chapters.len(),
                "Chapter index has a load-more button, list is incomplete"
            );
        }

        details.chapters = index.chapters;
        details.chapters_truncated = index.truncated;
        Ok(details)
    }

    async fn fetch_chapter(&self, url: &str) -> Result<String, SourceError> {
        let chapter_url = parse_url(url)?;
        let html = self.fetch_html(&chapter_url).await?;
        let content = parse_chapter_content(&html)?
            .ok_or_else(|| SourceError::MissingElement("chapter content".to_string()))?;

        ensure_content_length(&content, self.config.min_content_chars)?;
        Ok(content)
    }
}

/// 正文字符数必须严格大于 `min`
pub fn ensure_content_length(content: &str, min: usize) -> Result<(), SourceError> {
    let len = content.chars().count();
    if len <= min {
        return Err(SourceError::ContentTooShort { len, min });
    }
    Ok(())
}

fn parse_url(raw: &str) -> Result<Url, SourceError> {
    Url::parse(raw).map_err(|e| SourceError::InvalidUrl(format!("{}: {}", raw, e)))
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::ParseError(format!("{}: {}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// 相对地址按页面地址解析为绝对地址
fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// 目录页地址：去掉末尾 `.html` 后追加 `/index.html`
pub fn index_url_for(book_url: &Url) -> Result<Url, SourceError> {
    let raw = book_url.as_str().trim_end_matches('/');
    let base = raw.strip_suffix(".html").unwrap_or(raw);
    parse_url(&format!("{}/index.html", base))
}

/// 解析书页（目录留空，由调用方填充）
pub fn parse_book_page(html: &str, base: &Url) -> Result<NovelDetails, SourceError> {
    let document = Html::parse_document(html);

    let bookbox = document
        .select(&selector("div.bookbox")?)
        .next()
        .ok_or_else(|| SourceError::MissingElement("div.bookbox".to_string()))?;

    let cover_img = bookbox
        .select(&selector("div.bookimg2 img")?)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| resolve(base, src));

    let title = bookbox
        .select(&selector("div.booknav2 h1 a")?)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    let author_selector = selector("a")?;
    let author = bookbox
        .select(&selector("div.booknav2 p")?)
        .find(|p| element_text(*p).contains(AUTHOR_LABEL))
        .and_then(|p| {
            p.select(&author_selector)
                .next()
                .map(element_text)
                .filter(|a| !a.is_empty())
                .or_else(|| {
                    let text = element_text(p).replace(AUTHOR_LABEL, "");
                    Some(text.trim().to_string()).filter(|a| !a.is_empty())
                })
        });

    Ok(NovelDetails {
        title,
        author,
        cover_img,
        chapters: Vec::new(),
        chapters_truncated: false,
    })
}

/// 目录页解析结果
#[derive(Debug, Clone, Default)]
pub struct ChapterIndex {
    pub chapters: Vec<ChapterLink>,
    /// 页面带有 “載入更多” 按钮，其余章节需脚本加载
    pub truncated: bool,
}

/// 解析目录页
///
/// 优先取标题为 `目錄` 的 `div.catalog` 内的 `div#allchapter`，
/// 找不到该区块时退回整页第一个 `div#allchapter`
pub fn parse_chapter_index(html: &str, base: &Url) -> Result<ChapterIndex, SourceError> {
    let document = Html::parse_document(html);
    let anchor = selector("a")?;
    let heading = selector("h3")?;
    let allchapter = selector("div#allchapter")?;

    let catalog = document.select(&selector("div.catalog")?).find(|catalog| {
        catalog
            .select(&heading)
            .any(|h| element_text(h).contains(CATALOG_HEADING))
    });

    let container = match catalog {
        Some(catalog) => catalog.select(&allchapter).next(),
        None => document.select(&allchapter).next(),
    };
    let Some(container) = container else {
        return Ok(ChapterIndex::default());
    };

    let truncated = container
        .select(&selector("a#loadmore")?)
        .next()
        .is_some();

    let chapters = container
        .select(&selector("li[data-num]")?)
        .filter_map(|item| {
            let link = item.select(&anchor).next()?;
            let href = link.value().attr("href")?;
            Some(ChapterLink {
                chapter_number: item.value().attr("data-num").map(str::to_string),
                chapter_name: element_text(link),
                url: resolve(base, href),
            })
        })
        .collect();

    Ok(ChapterIndex {
        chapters,
        truncated,
    })
}

/// 解析正文：`<br>`/`<p>` 分行，去除标签与空行
///
/// 找不到正文容器时返回 `Ok(None)`
pub fn parse_chapter_content(html: &str) -> Result<Option<String>, SourceError> {
    let document = Html::parse_document(html);

    for css in CONTENT_SELECTORS {
        if let Some(element) = document.select(&selector(css)?).next() {
            return Ok(Some(clean_text(element)));
        }
    }

    Ok(None)
}

fn clean_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();

    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => {
                let in_script = node
                    .parent()
                    .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                    .map_or(false, |name| matches!(name, "script" | "style"));
                if !in_script {
                    raw.push_str(text);
                }
            }
            Node::Element(e) if matches!(e.name(), "br" | "p") => raw.push('\n'),
            _ => {}
        }
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK_PAGE: &str = r#"
        <html><body>
        <div class="bookbox">
          <div class="bookimg2"><img src="/files/cover/79291.jpg"></div>
          <div class="booknav2">
            <h1><a href="/book/79291.html">凡人修仙传</a></h1>
            <p>分類：仙俠</p>
            <p>作者：<a href="/author/忘语">忘语</a></p>
          </div>
        </div>
        </body></html>
    "#;

    const INDEX_PAGE: &str = r#"
        <div class="catalog"><h3>目錄</h3>
          <div id="allchapter"><ul>
            <li data-num="1"><a href="/txt/79291/1.html">第一章 山边小村</a></li>
            <li data-num="2"><a href="https://twkan.com/txt/79291/2.html">第二章 青牛镇</a></li>
            <li><a href="/ad">广告</a></li>
            <li data-num="3"></li>
          </ul></div>
        </div>
    "#;

    fn base() -> Url {
        Url::parse("https://twkan.com/book/79291.html").unwrap()
    }

    #[test]
    fn test_index_url_for() {
        assert_eq!(
            index_url_for(&base()).unwrap().as_str(),
            "https://twkan.com/book/79291/index.html"
        );
        let plain = Url::parse("https://twkan.com/book/79291").unwrap();
        assert_eq!(
            index_url_for(&plain).unwrap().as_str(),
            "https://twkan.com/book/79291/index.html"
        );
    }

    #[test]
    fn test_parse_book_page() {
        let details = parse_book_page(BOOK_PAGE, &base()).unwrap();

        assert_eq!(details.title.as_deref(), Some("凡人修仙传"));
        assert_eq!(details.author.as_deref(), Some("忘语"));
        assert_eq!(
            details.cover_img.as_deref(),
            Some("https://twkan.com/files/cover/79291.jpg")
        );
        assert!(details.chapters.is_empty());
    }

    #[test]
    fn test_parse_book_page_author_without_link() {
        let html = r#"<div class="bookbox"><div class="booknav2"><p>作者：耳根</p></div></div>"#;
        let details = parse_book_page(html, &base()).unwrap();
        assert_eq!(details.author.as_deref(), Some("耳根"));
        assert!(details.title.is_none());
    }

    #[test]
    fn test_parse_book_page_missing_bookbox() {
        let result = parse_book_page("<html><body>404</body></html>", &base());
        assert!(matches!(result, Err(SourceError::MissingElement(_))));
    }

    fn index_base() -> Url {
        Url::parse("https://twkan.com/book/79291/index.html").unwrap()
    }

    #[test]
    fn test_parse_chapter_index() {
        let index = parse_chapter_index(INDEX_PAGE, &index_base()).unwrap();
        assert!(!index.truncated);
        let chapters = index.chapters;

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].chapter_number.as_deref(), Some("1"));
        assert_eq!(chapters[0].chapter_name, "第一章 山边小村");
        assert_eq!(chapters[0].url, "https://twkan.com/txt/79291/1.html");
        assert_eq!(chapters[1].url, "https://twkan.com/txt/79291/2.html");
    }

    #[test]
    fn test_parse_chapter_index_flags_load_more() {
        let html = r#"
            <div class="catalog"><h3>目錄</h3>
              <div id="allchapter"><ul>
                <li data-num="1"><a href="/txt/79291/1.html">第一章</a></li>
                <li data-num="2"><a href="/txt/79291/2.html">第二章</a></li>
              </ul>
              <a id="loadmore" class="btn more-btn" href="javascript:;">載入更多章節</a>
              </div>
            </div>
        "#;
        let index = parse_chapter_index(html, &index_base()).unwrap();

        assert!(index.truncated);
        assert_eq!(index.chapters.len(), 2);
    }

    #[test]
    fn test_parse_chapter_index_prefers_catalog_block() {
        let html = r#"
            <div class="catalog"><h3>最新章節</h3>
              <div id="allchapter"><ul>
                <li data-num="900"><a href="/txt/79291/900.html">第九百章</a></li>
              </ul></div>
            </div>
            <div class="catalog"><h3>目錄</h3>
              <div id="allchapter"><ul>
                <li data-num="1"><a href="/txt/79291/1.html">第一章</a></li>
              </ul></div>
            </div>
        "#;
        let index = parse_chapter_index(html, &index_base()).unwrap();

        assert_eq!(index.chapters.len(), 1);
        assert_eq!(index.chapters[0].chapter_number.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_chapter_index_without_catalog_heading() {
        let html = r#"<div id="allchapter"><li data-num="7"><a href="/txt/1/7.html">七</a></li></div>"#;
        let index = parse_chapter_index(html, &index_base()).unwrap();
        assert_eq!(index.chapters.len(), 1);

        let empty = parse_chapter_index("<div>nothing</div>", &index_base()).unwrap();
        assert!(empty.chapters.is_empty());
        assert!(!empty.truncated);
    }

    #[test]
    fn test_content_must_exceed_minimum() {
        let exact = "字".repeat(50);
        assert!(matches!(
            ensure_content_length(&exact, 50),
            Err(SourceError::ContentTooShort { len: 50, min: 50 })
        ));

        let longer = "字".repeat(51);
        assert!(ensure_content_length(&longer, 50).is_ok());
    }

    #[test]
    fn test_parse_chapter_content() {
        let html = r#"
            <div id="txtcontent">
              <script>var ad = 1;</script>
              　　韩立被叫做“二愣子”。<br>
              <br/>
              　　他的父母都是老实本分的农民。<br />
              <b>第三行</b>
            </div>
        "#;
        let content = parse_chapter_content(html).unwrap().unwrap();
        assert_eq!(
            content,
            "韩立被叫做“二愣子”。\n他的父母都是老实本分的农民。\n第三行"
        );
    }

    #[test]
    fn test_parse_chapter_content_fallback_selector() {
        let html = r#"<div class="chapter-content"><p>第一段</p><p>第二段</p></div>"#;
        let content = parse_chapter_content(html).unwrap().unwrap();
        assert_eq!(content, "第一段\n第二段");
    }

    #[test]
    fn test_parse_chapter_content_missing() {
        assert!(parse_chapter_content("<div id='main'>nothing</div>")
            .unwrap()
            .is_none());
    }
}
