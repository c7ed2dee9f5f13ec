use crate::error::ApiError;
use crate::state::AppState;
use anyhow::Context;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use study_core::User;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";

/// bcrypt 允许的 cost 范围 (crate 里的同名常量不对外公开)
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// JWT 载荷
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID
    pub id: i64,
    pub iat: i64,
    pub exp: i64,
}

/// 令牌签发 / 校验 (HS256)
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// 只在注册和登录时签发
    pub fn issue(&self, user_id: i64) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).context("failed to sign token")
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::default()).map(|data| data.claims)
    }
}

/// 中间件解析出的调用方身份，放在 request extensions 里
/// 只保留 ID，handler 需要最新资料时自己去查
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self { id: user.id }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// 鉴权中间件: 校验 Bearer 令牌并加载用户
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or_else(|| ApiError::unauthorized(NO_TOKEN))?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        ApiError::unauthorized(TOKEN_FAILED)
    })?;

    let user = state
        .storage
        .users
        .find_by_id(claims.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(TOKEN_FAILED))?;

    req.extensions_mut().insert(AuthUser::from(user));
    Ok(next.run(req).await)
}

/// bcrypt 是 CPU 密集操作，放到阻塞线程池里
pub async fn hash_password(password: String, cost: u32) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

pub async fn verify_password(password: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .context("failed to verify password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn issued_token_round_trips() {
        let tokens = TokenService::new("secret", 9);
        let token = tokens.issue(42).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.exp - claims.iat, 9 * 3600);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenService::new("one", 9).issue(1).unwrap();
        assert!(TokenService::new("two", 9).verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // 过期时间远超默认 60 秒的 leeway
        let token = TokenService::new("secret", -1).issue(1).unwrap();
        assert!(TokenService::new("secret", 9).verify(&token).is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hash = hash_password("hunter2".to_string(), MIN_BCRYPT_COST)
            .await
            .unwrap();
        assert!(verify_password("hunter2".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }
}
