//! Novel Source Adapter - 小说站点抓取

mod twkan_source;

pub use twkan_source::*;
