//! Query Handlers 实现

mod glossary_handlers;
mod novel_handlers;

pub use glossary_handlers::*;
pub use novel_handlers::*;
