//! Web API 层。
//!
//! 提供 Axum 路由，将 HTTP 请求委托给会话网关。调用者身份只来自 JWT。

mod auth;
mod error;
mod routes;
mod state;

pub use auth::{AuthUser, Claims, JwtService};
pub use config::JwtConfig;
pub use error::{ApiError, ErrorBody};
pub use routes::router;
pub use state::AppState;
