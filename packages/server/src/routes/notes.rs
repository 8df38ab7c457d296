//! Note CRUD routes. All require an authenticated session; listing is scoped
//! to the session user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use store::{NewNote, Note, NoteUpdate};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub async fn list(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Json<Vec<Note>> {
    Json(state.store.notes_by_user(user.id).await)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub schedule: Option<serde_json::Value>,
}

pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if body.content.trim().is_empty() {
        return Err(ApiError::Validation("Content is required".into()));
    }

    let note = state
        .store
        .create_note(NewNote {
            user_id: user.id,
            title: body.title,
            content: body.content,
            schedule: body.schedule,
        })
        .await;
    Ok(Json(note))
}

pub async fn update(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NoteUpdate>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.store.update_note(id, body).await?))
}

pub async fn remove(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_note(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
