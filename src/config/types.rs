//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::translation::SectionMarkers;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 翻译模型配置
    #[serde(default)]
    pub llm: LlmConfig,

    /// 术语表存储配置
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// 站点抓取配置
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// 模型输出段落标记
    #[serde(default)]
    pub parser: ParserConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节）
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 翻译模型提供方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI 兼容的 HTTP 接口
    #[default]
    #[serde(alias = "open_ai")]
    OpenAi,
    /// 固定输出，用于本地联调
    Fake,
}

/// 翻译模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,

    /// 服务基础 URL
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// API Key，`openai` 提供方必填
    #[serde(default)]
    pub api_key: String,

    /// 模型名称
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_tokens: Option<u32>,
}

fn default_llm_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_llm_model() -> String {
    "deepseek/deepseek-chat-v3.1:free".to_string()
}

fn default_llm_timeout() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            base_url: default_llm_base_url(),
            api_key: String::new(),
            model: default_llm_model(),
            timeout_secs: default_llm_timeout(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// 术语表存储后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlossaryBackend {
    /// 每本小说一个 JSON 文件
    #[default]
    Json,
    Sled,
    Sqlite,
    /// 进程内存，重启即丢失
    Memory,
}

/// 术语表存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct GlossaryConfig {
    #[serde(default)]
    pub backend: GlossaryBackend,

    /// JSON 文件目录
    #[serde(default = "default_glossary_dir")]
    pub dir: PathBuf,

    /// Sled 数据库路径
    #[serde(default = "default_sled_path")]
    pub sled_path: PathBuf,

    /// SQLite 数据库文件路径
    #[serde(default = "default_db_path")]
    pub database_path: String,

    /// SQLite 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_glossary_dir() -> PathBuf {
    PathBuf::from("translations")
}

fn default_sled_path() -> PathBuf {
    PathBuf::from("data/glossary.sled")
}

fn default_db_path() -> String {
    "data/fanyi.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            backend: GlossaryBackend::default(),
            dir: default_glossary_dir(),
            sled_path: default_sled_path(),
            database_path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 站点抓取配置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_scraper_timeout")]
    pub timeout_secs: u64,

    /// 正文最少字符数
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "zh-TW,zh;q=0.9,en;q=0.8".to_string()
}

fn default_scraper_timeout() -> u64 {
    45
}

fn default_min_content_chars() -> usize {
    50
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_scraper_timeout(),
            min_content_chars: default_min_content_chars(),
        }
    }
}

/// 模型输出段落标记配置
///
/// 每类段落可配置多个别名，换用提示词格式不同的模型时覆盖
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_title_markers")]
    pub title_markers: Vec<String>,

    #[serde(default = "default_body_markers")]
    pub body_markers: Vec<String>,

    #[serde(default = "default_new_terms_markers")]
    pub new_terms_markers: Vec<String>,
}

fn default_title_markers() -> Vec<String> {
    SectionMarkers::default().title
}

fn default_body_markers() -> Vec<String> {
    SectionMarkers::default().body
}

fn default_new_terms_markers() -> Vec<String> {
    SectionMarkers::default().new_terms
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            title_markers: default_title_markers(),
            body_markers: default_body_markers(),
            new_terms_markers: default_new_terms_markers(),
        }
    }
}

impl ParserConfig {
    /// 转换为解析器使用的段落标记，空白别名被丢弃
    pub fn section_markers(&self) -> SectionMarkers {
        let clean = |markers: &[String]| -> Vec<String> {
            markers
                .iter()
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect()
        };
        SectionMarkers {
            title: clean(&self.title_markers),
            body: clean(&self.body_markers),
            new_terms: clean(&self.new_terms_markers),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别（`RUST_LOG` 优先）
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
