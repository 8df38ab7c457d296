use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use api::auth::SESSION_USER_ID_KEY;
use store::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user for the current request, resolved from the session.
///
/// A missing session, a session without a user id, or an id that no longer
/// resolves to a user all reject with 401; session read errors are treated as
/// an anonymous request rather than a server failure.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::unauthorized())?;

        let user_id: Option<i64> = session.get(SESSION_USER_ID_KEY).await.unwrap_or(None);
        let user_id = user_id.ok_or_else(ApiError::unauthorized)?;

        let user = state
            .store
            .get_user(user_id)
            .await
            .ok_or_else(ApiError::unauthorized)?;

        Ok(CurrentUser(user))
    }
}
