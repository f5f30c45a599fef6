//! HTTP Layer - RESTful API
//!
//! 统一响应信封 `{errno, error, data}`，HTTP 状态码恒为 200

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
