use crate::auth::TokenService;
use crate::config::AppConfig;
use std::sync::Arc;
use study_ai::{GenerationGateway, ModelBackend};
use study_storage::Storage;

/// 所有 handler 共享的只读状态，clone 只复制 Arc
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GenerationGateway>,
    pub storage: Storage,
    pub tokens: Arc<TokenService>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(
        gateway: GenerationGateway,
        storage: Storage,
        tokens: TokenService,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            gateway: Arc::new(gateway),
            storage,
            tokens: Arc::new(tokens),
            bcrypt_cost,
        }
    }

    /// 用启动配置和已经构造好的依赖组装
    pub fn from_config(
        config: &AppConfig,
        backend: Arc<dyn ModelBackend>,
        storage: Storage,
    ) -> Self {
        Self::new(
            GenerationGateway::new(backend, config.llm.timeout()),
            storage,
            TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_hours),
            config.auth.bcrypt_cost,
        )
    }
}
