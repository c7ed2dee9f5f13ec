use crate::auth::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use study_ai::LlmSettings;
use study_core::{ensure_not_blank, ensure_that};
use study_storage::db::PoolSettings;

/// 服务配置
///
/// 加载顺序 (后者覆盖前者):
/// 1. 内置默认值
/// 2. 配置文件 `STUDY_CONFIG_FILE` (默认 `config/study.toml`，不存在则跳过)
/// 3. `STUDY__SECTION__KEY` 形式的环境变量
/// 4. 兼容老部署的裸变量: `PORT`, `DATABASE_URL`, `JWT_SECRET`, `GEMINI_API_KEY` / `OPENAI_API_KEY`
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_address")]
    pub address: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_address() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 为空时使用内存存储
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "DatabaseConfig::default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "DatabaseConfig::default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        20
    }

    fn default_min_connections() -> u32 {
        5
    }

    fn default_acquire_timeout_secs() -> u64 {
        3
    }

    fn default_run_migrations() -> bool {
        true
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            run_migrations: self.run_migrations,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: Self::default_max_connections(),
            min_connections: Self::default_min_connections(),
            acquire_timeout_secs: Self::default_acquire_timeout_secs(),
            run_migrations: Self::default_run_migrations(),
        }
    }
}

// 连接串里可能带密码
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "AuthConfig::default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "AuthConfig::default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    fn default_token_ttl_hours() -> i64 {
        9
    }

    fn default_bcrypt_cost() -> u32 {
        10
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: Self::default_token_ttl_hours(),
            bcrypt_cost: Self::default_bcrypt_cost(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_file =
            env::var("STUDY_CONFIG_FILE").unwrap_or_else(|_| "config/study.toml".to_string());

        let builder = Config::builder()
            .set_default("server.address", ServerConfig::default_address())?
            .set_default("server.port", i64::from(ServerConfig::default_port()))?
            .set_default("llm.provider", "gemini")?
            .add_source(File::from(Path::new(&config_file)).required(false))
            .add_source(
                Environment::with_prefix("STUDY")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?;

        let mut config: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        // provider 要等反序列化之后才知道，所以密钥变量在这里覆盖
        config.override_api_key(|name| env::var(name).ok());

        Ok(config)
    }

    /// `GEMINI_API_KEY` / `OPENAI_API_KEY` 存在时覆盖 `llm.api_key`，和 `JWT_SECRET` 的优先级一致
    fn override_api_key(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(self.llm.provider.api_key_env()) {
            self.llm.api_key = key;
        }
    }

    /// 启动期校验，任何一项不满足都直接终止启动
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank!(
            self.auth.jwt_secret,
            "Configuration error: JWT_SECRET is not defined. Set it in the environment or the auth.jwt_secret config entry."
        );
        ensure_that!(
            self.auth.token_ttl_hours > 0,
            "Configuration error: auth.token_ttl_hours must be positive, got {}",
            self.auth.token_ttl_hours
        );
        ensure_that!(
            (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost),
            "Configuration error: auth.bcrypt_cost must be within {}..={}",
            MIN_BCRYPT_COST,
            MAX_BCRYPT_COST
        );
        self.llm.validate()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}
