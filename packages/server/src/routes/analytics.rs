use axum::{
    extract::{Path, State},
    Json,
};

use store::Analytics;

use crate::extract::CurrentUser;
use crate::state::AppState;

/// Impression/engagement entries for a note, newest first.
pub async fn by_note(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
) -> Json<Vec<Analytics>> {
    Json(state.store.analytics_by_note(note_id).await)
}
