use std::sync::Arc;

use application::MessagingService;

use crate::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub messaging_service: Arc<MessagingService>,
    pub jwt_service: Arc<JwtService>,
    /// 允许的跨域来源，`*` 表示任意
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(messaging_service: Arc<MessagingService>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            messaging_service,
            jwt_service,
            cors_origins: Vec::new(),
        }
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}
