//! Persistence Layer - 数据持久化
//!
//! JSON 文件、Sled 和 SQLite 术语表存储实现

pub mod json;
pub mod sled;
pub mod sqlite;

pub use self::json::FileGlossaryRepository;
pub use self::sled::SledGlossaryRepository;
pub use self::sqlite::SqliteGlossaryRepository;
