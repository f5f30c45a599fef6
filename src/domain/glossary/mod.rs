//! Glossary Context - 术语表限界上下文
//!
//! 职责:
//! - 小说标识校验
//! - 术语表聚合与合并规则（后写覆盖、只增不删）

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{Glossary, MergeOutcome};
pub use errors::GlossaryError;
pub use value_objects::{NovelId, MAX_NOVEL_ID_LEN};
