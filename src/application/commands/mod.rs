//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：翻译章节、合并术语

mod glossary_commands;
mod translate_commands;

pub mod handlers;

pub use glossary_commands::*;
pub use translate_commands::*;
