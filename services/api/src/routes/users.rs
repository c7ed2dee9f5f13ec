use crate::auth::{self, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use study_core::{normalize_email, DuplicateEmail, NewUser, User};
use tracing::info;

const USER_EXISTS: &str = "User already exists";

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// 注册 / 登录的响应，附带新签发的令牌
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// 资料更新的响应，不回传令牌
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub plan: String,
}

/// 去掉首尾空白，空串视为没填
fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 并发注册时预检查可能都通过，最终以存储层的唯一约束为准
fn user_write_error(err: anyhow::Error) -> ApiError {
    if err.downcast_ref::<DuplicateEmail>().is_some() {
        ApiError::bad_request(USER_EXISTS)
    } else {
        ApiError::internal(err)
    }
}

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(body) = payload?;
    // 密码不做 trim，只要求非空
    let (Some(name), Some(email), Some(password)) = (
        filled(body.name),
        filled(body.email).map(|e| normalize_email(&e)),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Invalid user data"));
    };

    if state.storage.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request(USER_EXISTS));
    }

    let password_hash = auth::hash_password(password, state.bcrypt_cost).await?;
    let user = state
        .storage
        .users
        .create(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(user_write_error)?;

    let token = state.tokens.issue(user.id)?;
    info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(body) = payload?;
    let invalid = || ApiError::unauthorized("Invalid credentials");

    let email = filled(body.email)
        .map(|e| normalize_email(&e))
        .ok_or_else(invalid)?;
    let password = body.password.ok_or_else(invalid)?;

    let user = state
        .storage
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = state.tokens.issue(user.id)?;
    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

/// GET /api/users/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .storage
        .users
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

/// PUT /api/users/profile
/// 只允许修改 name / email，空值保持原样
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileBody>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(body) = payload?;
    let users = &state.storage.users;

    let current = users
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let name = filled(body.name).unwrap_or(current.name);
    let email = filled(body.email)
        .map(|e| normalize_email(&e))
        .unwrap_or(current.email);

    if let Some(owner) = users.find_by_email(&email).await? {
        if owner.id != current.id {
            return Err(ApiError::bad_request(USER_EXISTS));
        }
    }

    let updated = users
        .update_profile(current.id, &name, &email)
        .await
        .map_err(user_write_error)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ProfileResponse {
        id: updated.id,
        name: updated.name,
        email: updated.email,
        plan: updated.plan,
    }))
}
