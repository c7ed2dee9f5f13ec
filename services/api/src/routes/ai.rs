use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use study_core::{GenerationResult, RawGenerationRequest};

/// POST /api/ai/generate
/// Body: { prompt: string, type: 'notes' | 'quiz' | 'flashcards' }
/// Header: Authorization: Bearer <JWT token>
///
/// 返回 { result: string }
pub async fn generate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<RawGenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    let Json(raw) = payload?;
    tracing::debug!(user_id = user.id, "Generation requested");

    let result = state.gateway.generate(raw).await?;
    Ok(Json(result))
}
