//! HTTP Handlers

mod glossary;
mod novel;
mod ping;
mod translate;

pub use glossary::*;
pub use novel::*;
pub use ping::*;
pub use translate::*;
