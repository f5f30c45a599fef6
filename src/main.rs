//! Fanyi - 带术语表的中文网文翻译服务
//!
//! 启动时按配置装配一次：翻译模型客户端、术语表存储后端、站点抓取器、HTTP 服务器

use std::sync::Arc;

use fanyi::application::{GlossaryRepositoryPort, LlmClientPort};
use fanyi::config::{load_config, print_config, AppConfig, GlossaryBackend, LlmProvider};
use fanyi::infrastructure::adapters::{
    FakeLlmClient, OpenAiClient, OpenAiClientConfig, TwkanSource, TwkanSourceConfig,
};
use fanyi::infrastructure::http::{AppState, HttpServer, ServerConfig};
use fanyi::infrastructure::memory::InMemoryGlossaryRepository;
use fanyi::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
use fanyi::infrastructure::persistence::{
    FileGlossaryRepository, SledGlossaryRepository, SqliteGlossaryRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},fanyi={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Fanyi - 带术语表的网文翻译服务");
    print_config(&config);

    let llm = build_llm_client(&config)?;
    let glossary_repo = build_glossary_repository(&config).await?;

    let novel_source = Arc::new(TwkanSource::new(TwkanSourceConfig {
        user_agent: config.scraper.user_agent.clone(),
        accept_language: config.scraper.accept_language.clone(),
        timeout_secs: config.scraper.timeout_secs,
        min_content_chars: config.scraper.min_content_chars,
    })?);

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.server.max_body_bytes);
    let state = AppState::new(
        llm,
        glossary_repo,
        novel_source,
        config.parser.section_markers(),
    );
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server.run_with_shutdown(shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 翻译模型客户端
fn build_llm_client(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmClientPort>> {
    match config.llm.provider {
        LlmProvider::OpenAi => {
            let client = OpenAiClient::new(OpenAiClientConfig {
                base_url: config.llm.base_url.clone(),
                api_key: config.llm.api_key.clone(),
                model: config.llm.model.clone(),
                timeout_secs: config.llm.timeout_secs,
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            })?;
            Ok(Arc::new(client))
        }
        LlmProvider::Fake => {
            tracing::warn!("Using FakeLlmClient, translations are canned responses");
            Ok(Arc::new(FakeLlmClient::with_defaults()))
        }
    }
}

/// 术语表存储后端
async fn build_glossary_repository(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn GlossaryRepositoryPort>> {
    let glossary = &config.glossary;

    let repo: Arc<dyn GlossaryRepositoryPort> = match glossary.backend {
        GlossaryBackend::Json => FileGlossaryRepository::open(&glossary.dir).await?.arc(),
        GlossaryBackend::Sled => {
            if let Some(parent) = glossary.sled_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            SledGlossaryRepository::open(&glossary.sled_path)?.arc()
        }
        GlossaryBackend::Sqlite => {
            if let Some(parent) = std::path::Path::new(&glossary.database_path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let db_config = DatabaseConfig::new(&glossary.database_path)
                .with_max_connections(glossary.max_connections);
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;
            Arc::new(SqliteGlossaryRepository::new(pool))
        }
        GlossaryBackend::Memory => {
            tracing::warn!("Glossaries are kept in memory and lost on restart");
            InMemoryGlossaryRepository::new().arc()
        }
    };

    Ok(repo)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for ctrl-c"),
    }
}
