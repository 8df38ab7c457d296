//! Session data types.

/// Key under which the logged-in user's id is stored in the session.
pub const SESSION_USER_ID_KEY: &str = "user_id";
