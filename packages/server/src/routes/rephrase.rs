use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RephraseRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Rewrite note text into a short social post via the external model.
pub async fn rephrase(
    _user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<RephraseRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(text) = body.text.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::Validation("Text is required".into()));
    };

    let content = state.rephraser.rephrase(&text).await?;
    Ok(Json(json!({ "content": content })))
}
