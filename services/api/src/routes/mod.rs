use crate::auth::require_auth;
use crate::state::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod ai;
pub mod subjects;
pub mod users;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 组装全部路由
///
/// - `/api/users`    注册、登录公开，资料接口需要鉴权
/// - `/api/ai`       内容生成，需要鉴权
/// - `/api/subjects` 学科增删查，需要鉴权
pub fn router(state: AppState) -> Router {
    let protect = from_fn_with_state(state.clone(), require_auth);

    let users = Router::new()
        .route("/profile", get(users::profile).put(users::update_profile))
        .route_layer(protect.clone())
        .route("/register", post(users::register))
        .route("/login", post(users::login));

    let ai = Router::new()
        .route("/generate", post(ai::generate))
        .route_layer(protect.clone());

    let subjects = Router::new()
        .route("/", get(subjects::list).post(subjects::create))
        .route("/:id", delete(subjects::remove))
        .route_layer(protect);

    Router::new()
        .route("/health", get(health))
        .nest("/api/users", users)
        .nest("/api/ai", ai)
        .nest("/api/subjects", subjects)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
