//! Memory Layer - In-Memory State
//!
//! 内存术语表仓储，用于测试和无持久化运行

mod glossary_repo;

pub use glossary_repo::InMemoryGlossaryRepository;
