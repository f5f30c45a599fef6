//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod glossary_repo;

pub use database::*;
pub use glossary_repo::*;
