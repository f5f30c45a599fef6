//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, GlossaryBackend, LlmProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `FANYI_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `FANYI_SERVER__PORT=8080`
/// - `FANYI_LLM__API_KEY=sk-...`
/// - `FANYI_LLM__MODEL=deepseek/deepseek-chat`
/// - `FANYI_GLOSSARY__BACKEND=sqlite`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.max_body_bytes", 10 * 1024 * 1024)?
        .set_default("llm.provider", "openai")?
        .set_default("llm.base_url", "https://openrouter.ai/api/v1")?
        .set_default("llm.api_key", "")?
        .set_default("llm.model", "deepseek/deepseek-chat-v3.1:free")?
        .set_default("llm.timeout_secs", 300)?
        .set_default("glossary.backend", "json")?
        .set_default("glossary.dir", "translations")?
        .set_default("glossary.sled_path", "data/glossary.sled")?
        .set_default("glossary.database_path", "data/fanyi.db")?
        .set_default("glossary.max_connections", 5)?
        .set_default("scraper.timeout_secs", 45)?
        .set_default("scraper.min_content_chars", 50)?
        .set_default("scraper.accept_language", "zh-TW,zh;q=0.9,en;q=0.8")?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: FANYI_LLM__API_KEY=sk-xxx
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("FANYI")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.server.max_body_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Server max_body_bytes cannot be 0".to_string(),
        ));
    }

    if config.llm.provider == LlmProvider::OpenAi {
        if config.llm.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "LLM base URL cannot be empty".to_string(),
            ));
        }
        if config.llm.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "LLM API key is required (set FANYI_LLM__API_KEY)".to_string(),
            ));
        }
    }

    if config.llm.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM model cannot be empty".to_string(),
        ));
    }

    if config.llm.timeout_secs == 0 || config.scraper.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Timeouts must be greater than 0".to_string(),
        ));
    }

    let markers = config.parser.section_markers();
    if markers.title.is_empty() || markers.body.is_empty() || markers.new_terms.is_empty() {
        return Err(ConfigError::ValidationError(
            "Each parser marker list needs at least one non-blank marker".to_string(),
        ));
    }

    match config.glossary.backend {
        GlossaryBackend::Json if config.glossary.dir.as_os_str().is_empty() => {
            return Err(ConfigError::ValidationError(
                "Glossary directory cannot be empty".to_string(),
            ));
        }
        GlossaryBackend::Sqlite if config.glossary.database_path.is_empty() => {
            return Err(ConfigError::ValidationError(
                "Database path cannot be empty".to_string(),
            ));
        }
        _ => {}
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志，不输出 API Key）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Body Size: {} bytes", config.server.max_body_bytes);
    tracing::info!("LLM Provider: {:?}", config.llm.provider);
    tracing::info!("LLM Base URL: {}", config.llm.base_url);
    tracing::info!("LLM Model: {}", config.llm.model);
    tracing::info!("LLM Timeout: {}s", config.llm.timeout_secs);
    tracing::info!("LLM API Key Set: {}", !config.llm.api_key.is_empty());
    tracing::info!("Glossary Backend: {:?}", config.glossary.backend);
    match config.glossary.backend {
        GlossaryBackend::Json => tracing::info!("Glossary Directory: {:?}", config.glossary.dir),
        GlossaryBackend::Sled => tracing::info!("Glossary Sled Path: {:?}", config.glossary.sled_path),
        GlossaryBackend::Sqlite => {
            tracing::info!("Glossary Database: {}", config.glossary.database_path)
        }
        GlossaryBackend::Memory => {}
    }
    tracing::info!("Scraper Timeout: {}s", config.scraper.timeout_secs);
    tracing::info!(
        "Parser Markers: title={:?} body={:?} new_terms={:?}",
        config.parser.title_markers,
        config.parser.body_markers,
        config.parser.new_terms_markers
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
