use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use study_core::{NewSubject, Subject};

#[derive(Debug, Deserialize)]
pub struct CreateSubjectBody {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// GET /api/subjects
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<Subject>>, ApiError> {
    let subjects = state.storage.subjects.list_by_owner(caller.id).await?;
    Ok(Json(subjects))
}

/// POST /api/subjects
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<CreateSubjectBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Subject>), ApiError> {
    let Json(body) = payload?;
    let title = body
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("The \"title\" field is required."))?;

    let subject = state
        .storage
        .subjects
        .create(NewSubject {
            user_id: caller.id,
            title,
            description: body.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// DELETE /api/subjects/:id
/// 只能删除自己的学科，别人的学科同样返回 404
pub async fn remove(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let not_found = || ApiError::not_found("Subject not found");
    let id: i64 = id.parse().map_err(|_| not_found())?;

    state
        .storage
        .subjects
        .delete_owned(id, caller.id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(json!({ "message": "Subject deleted" })))
}
