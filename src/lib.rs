//! Fanyi - 带术语表的中文网文翻译服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Glossary Context: 小说 ID、术语表与合并规则
//! - Translation Context: 提示词构建、模型输出解析
//!
//! 应用层 (application/):
//! - Ports: 端口定义（LlmClient, GlossaryRepository, NovelSource）
//! - GlossaryStore: 按小说 ID 串行的读-合并-写
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: OpenAI 兼容客户端、twkan 站点抓取
//! - Persistence: JSON 文件 / Sled / SQLite 术语表存储
//! - Memory: 内存术语表存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
