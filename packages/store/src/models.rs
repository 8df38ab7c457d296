//! # Domain models for users, notes, and analytics
//!
//! Defines the records held by [`crate::MemStorage`] and the input structs for
//! each write operation. All record types are `Serialize + Deserialize` with
//! camelCase wire names so they can be returned directly from the HTTP API.
//!
//! ## Records
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | An account. `password` is `None` for guest accounts, otherwise a salted hash. Carries the single-use email verification token and the external credential placeholders. |
//! | [`Note`] | A note owned by a user (weak reference by id). `schedule` is an opaque JSON value; `last_posted` is never set by any current code path. |
//! | [`Analytics`] | An append-only impression/engagement sample for a note, stamped at insertion. |
//!
//! ## Input structs
//!
//! Each write operation takes its own struct ([`NewUser`], [`NewNote`],
//! [`NoteUpdate`], [`UserUpdate`], [`NewAnalytics`]) rather than a partial
//! record, so required and optional fields are explicit at the call site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Full user record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Salted password hash; `None` for guest accounts.
    pub password: Option<String>,
    pub name: String,
    pub is_email_verified: bool,
    /// Single-use token, cleared when the email is verified.
    pub email_verification_token: Option<String>,
    pub twitter_token: Option<String>,
    pub google_token: Option<String>,
}

impl User {
    /// Convert to [`UserInfo`] for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            is_email_verified: self.is_email_verified,
            twitter_connected: self.twitter_token.is_some(),
            google_connected: self.google_token.is_some(),
        }
    }
}

/// User information safe to send to the client. Never carries the password
/// hash or the raw external tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_email_verified: bool,
    pub twitter_connected: bool,
    pub google_connected: bool,
}

/// Input for [`crate::MemStorage::create_user`]. The store initializes the
/// external tokens to `None`; email uniqueness is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: Option<String>,
    pub name: String,
    pub is_email_verified: bool,
    pub email_verification_token: Option<String>,
}

/// Partial user update; only provided fields are merged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub is_email_verified: Option<bool>,
    /// Outer `Some` means "write this value", including `Some(None)` to clear
    /// the token.
    pub email_verification_token: Option<Option<String>>,
}

/// A note record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Opaque posting schedule, shaped by the client.
    pub schedule: Option<serde_json::Value>,
    pub last_posted: Option<DateTime<Utc>>,
}

/// Input for [`crate::MemStorage::create_note`].
#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub schedule: Option<serde_json::Value>,
}

/// Partial note update; only provided fields are merged. `created_at` and
/// `user_id` are never touched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Distinguishes an absent field (leave untouched) from an explicit
    /// `null` (clear the schedule).
    #[serde(default, deserialize_with = "double_option")]
    pub schedule: Option<Option<serde_json::Value>>,
}

fn double_option<'de, D>(
    deserializer: D,
) -> Result<Option<Option<serde_json::Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

/// An impression/engagement sample for a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub id: i64,
    pub note_id: i64,
    pub impressions: i64,
    pub engagements: i64,
    pub timestamp: DateTime<Utc>,
}

/// Input for [`crate::MemStorage::add_analytics`].
#[derive(Debug, Clone)]
pub struct NewAnalytics {
    pub note_id: i64,
    pub impressions: i64,
    pub engagements: i64,
}
