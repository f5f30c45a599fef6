//! JSON File Persistence - 每本小说一个 JSON 文件

mod file_glossary_repo;

pub use file_glossary_repo::*;
