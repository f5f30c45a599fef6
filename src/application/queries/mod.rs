//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：术语表查看、小说站点抓取

mod glossary_queries;
mod novel_queries;

pub mod handlers;

pub use glossary_queries::*;
pub use novel_queries::*;
