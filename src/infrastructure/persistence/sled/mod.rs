//! Sled Persistence - 嵌入式 KV 存储实现

mod glossary_repo;

pub use glossary_repo::*;
