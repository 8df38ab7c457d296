//! Account routes: register, verify-email, login, logout, guest access, the
//! current-user lookup, and external token storage.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

use api::auth::{self, SESSION_USER_ID_KEY};
use store::{NewUser, UserInfo, UserUpdate};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// How many random guest identities to try before giving up.
const GUEST_ATTEMPTS: usize = 100;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let RegisterRequest {
        email,
        password,
        name,
    } = body;

    if email.trim().is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".into()));
    }
    if password.is_empty() {
        return Err(ApiError::Validation("Password is required".into()));
    }
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }

    if state.store.get_user_by_email(&email).await.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hashed = auth::hash_password(&password)?;
    let verification_token = auth::generate_verification_token();

    state
        .store
        .create_user(NewUser {
            email,
            password: Some(hashed),
            name,
            is_email_verified: false,
            email_verification_token: Some(verification_token.clone()),
        })
        .await;

    // TODO: dispatch the verification email; until a mailer exists the token
    // is handed back to the caller.
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful. Please verify your email.",
            "verificationToken": verification_token,
        })),
    ))
}

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub token: String,
}

pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state.store.get_user_by_email(&body.email).await;
    let token_matches = user
        .as_ref()
        .and_then(|u| u.email_verification_token.as_deref())
        == Some(body.token.as_str());

    let Some(user) = user.filter(|_| token_matches) else {
        return Err(ApiError::Validation("Invalid verification token".into()));
    };

    state
        .store
        .update_user(
            user.id,
            UserUpdate {
                is_email_verified: Some(true),
                email_verification_token: Some(None),
            },
        )
        .await?;

    Ok(Json(json!({ "message": "Email verified successfully" })))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserInfo>, ApiError> {
    let Some(user) = state.store.get_user_by_email(&body.email).await else {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    };

    // Guest accounts carry no password and cannot log in with one.
    let Some(stored) = user.password.as_deref() else {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    };

    if !auth::verify_password(&body.password, stored)? {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    }

    if !user.is_email_verified {
        return Err(ApiError::Unauthorized("Please verify your email first"));
    }

    session.insert(SESSION_USER_ID_KEY, user.id).await?;
    Ok(Json(user.to_info()))
}

pub async fn logout(session: Session) -> Result<Json<Value>, ApiError> {
    session.flush().await?;
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserInfo> {
    Json(user.to_info())
}

pub async fn guest(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, ApiError> {
    let mut identity = None;
    for _ in 0..GUEST_ATTEMPTS {
        let (email, name) = auth::guest_identity();
        if state.store.get_user_by_email(&email).await.is_none() {
            identity = Some((email, name));
            break;
        }
    }
    let Some((email, name)) = identity else {
        return Err(ApiError::Internal(anyhow::anyhow!(
            "guest identity space exhausted"
        )));
    };

    let user = state
        .store
        .create_user(NewUser {
            email,
            password: None,
            name,
            is_email_verified: true,
            email_verification_token: None,
        })
        .await;

    session.insert(SESSION_USER_ID_KEY, user.id).await?;
    Ok(Redirect::to("/dashboard"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialTokensRequest {
    pub twitter_token: Option<String>,
    pub google_token: Option<String>,
}

pub async fn social_tokens(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<SocialTokensRequest>,
) -> Result<Json<UserInfo>, ApiError> {
    let updated = state
        .store
        .update_user_tokens(user.id, body.twitter_token, body.google_token)
        .await?;
    Ok(Json(updated.to_info()))
}
