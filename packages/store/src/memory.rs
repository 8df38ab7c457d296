use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::error::StoreError;
use crate::models::{
    Analytics, NewAnalytics, NewNote, NewUser, Note, NoteUpdate, User, UserUpdate,
};

/// In-memory repository for users, notes, and analytics.
///
/// Records are keyed by auto-incrementing ids starting at 1. A single mutex
/// guards all tables, so every operation is serialized; callers composing a
/// read with a later write (register's uniqueness pre-check) can still
/// interleave with other requests between the two calls.
///
/// Cloning is cheap and shares the underlying tables.
#[derive(Clone, Debug, Default)]
pub struct MemStorage {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<i64, User>,
    notes: HashMap<i64, Note>,
    analytics: HashMap<i64, Analytics>,
    user_seq: i64,
    note_seq: i64,
    analytics_seq: i64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next user id and stores the record. Does not check email
    /// uniqueness; the caller pre-checks with [`Self::get_user_by_email`].
    pub async fn create_user(&self, data: NewUser) -> User {
        let mut tables = self.inner.lock().unwrap();
        tables.user_seq += 1;
        let user = User {
            id: tables.user_seq,
            email: data.email,
            password: data.password,
            name: data.name,
            is_email_verified: data.is_email_verified,
            email_verification_token: data.email_verification_token,
            twitter_token: None,
            google_token: None,
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub async fn get_user(&self, id: i64) -> Option<User> {
        self.inner.lock().unwrap().users.get(&id).cloned()
    }

    /// Linear scan over the user table.
    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Merges only the provided fields, leaving the rest untouched.
    pub async fn update_user(&self, id: i64, update: UserUpdate) -> Result<User, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let user = tables
            .users
            .get_mut(&id)
            .ok_or(StoreError::UserNotFound(id))?;
        if let Some(verified) = update.is_email_verified {
            user.is_email_verified = verified;
        }
        if let Some(token) = update.email_verification_token {
            user.email_verification_token = token;
        }
        Ok(user.clone())
    }

    /// Merges only the tokens that are `Some`; an absent token keeps the
    /// stored value.
    pub async fn update_user_tokens(
        &self,
        id: i64,
        twitter_token: Option<String>,
        google_token: Option<String>,
    ) -> Result<User, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let user = tables
            .users
            .get_mut(&id)
            .ok_or(StoreError::UserNotFound(id))?;
        if let Some(token) = twitter_token {
            user.twitter_token = Some(token);
        }
        if let Some(token) = google_token {
            user.google_token = Some(token);
        }
        Ok(user.clone())
    }

    /// Assigns the next note id, stamps `created_at`, and stores the record.
    /// `last_posted` starts as `None`.
    pub async fn create_note(&self, data: NewNote) -> Note {
        let mut tables = self.inner.lock().unwrap();
        tables.note_seq += 1;
        let note = Note {
            id: tables.note_seq,
            user_id: data.user_id,
            title: data.title,
            content: data.content,
            created_at: Utc::now(),
            schedule: data.schedule,
            last_posted: None,
        };
        tables.notes.insert(note.id, note.clone());
        note
    }

    pub async fn notes_by_user(&self, user_id: i64) -> Vec<Note> {
        let tables = self.inner.lock().unwrap();
        let mut notes: Vec<Note> = tables
            .notes
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by_key(|n| n.id);
        notes
    }

    /// Shallow-merges the provided fields. `created_at` and `user_id` are
    /// never changed.
    pub async fn update_note(&self, id: i64, update: NoteUpdate) -> Result<Note, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let note = tables
            .notes
            .get_mut(&id)
            .ok_or(StoreError::NoteNotFound(id))?;
        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(schedule) = update.schedule {
            note.schedule = schedule;
        }
        Ok(note.clone())
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.inner.lock().unwrap();
        tables
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NoteNotFound(id))
    }

    /// Assigns the next analytics id and stamps `timestamp` at insertion.
    pub async fn add_analytics(&self, data: NewAnalytics) -> Analytics {
        let mut tables = self.inner.lock().unwrap();
        tables.analytics_seq += 1;
        let entry = Analytics {
            id: tables.analytics_seq,
            note_id: data.note_id,
            impressions: data.impressions,
            engagements: data.engagements,
            timestamp: Utc::now(),
        };
        tables.analytics.insert(entry.id, entry.clone());
        entry
    }

    /// Entries for a note, newest first. The sort is stable, so entries with
    /// equal timestamps keep insertion order.
    pub async fn analytics_by_note(&self, note_id: i64) -> Vec<Analytics> {
        let tables = self.inner.lock().unwrap();
        let mut entries: Vec<Analytics> = tables
            .analytics
            .values()
            .filter(|a| a.note_id == note_id)
            .cloned()
            .collect();
        entries.sort_by_key(|a| a.id);
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: Some("hash.salt".to_string()),
            name: "Tester".to_string(),
            is_email_verified: false,
            email_verification_token: Some("token".to_string()),
        }
    }

    fn new_note(user_id: i64, title: &str) -> NewNote {
        NewNote {
            user_id,
            title: title.to_string(),
            content: "body".to_string(),
            schedule: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let store = MemStorage::new();

        let created = store.create_user(new_user("a@x.com")).await;
        assert_eq!(created.id, 1);
        assert!(created.twitter_token.is_none());
        assert!(created.google_token.is_none());

        let by_id = store.get_user(1).await.unwrap();
        assert_eq!(by_id, created);

        let by_email = store.get_user_by_email("a@x.com").await.unwrap();
        assert_eq!(by_email.id, 1);

        assert!(store.get_user(2).await.is_none());
        assert!(store.get_user_by_email("b@x.com").await.is_none());
    }

    #[tokio::test]
    async fn test_user_ids_increment() {
        let store = MemStorage::new();

        let first = store.create_user(new_user("a@x.com")).await;
        let second = store.create_user(new_user("b@x.com")).await;
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_update_user_merges_only_provided_fields() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("a@x.com")).await;

        let updated = store
            .update_user(
                user.id,
                UserUpdate {
                    is_email_verified: Some(true),
                    email_verification_token: Some(None),
                },
            )
            .await
            .unwrap();
        assert!(updated.is_email_verified);
        assert!(updated.email_verification_token.is_none());
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.password, user.password);

        // An empty update changes nothing.
        let unchanged = store
            .update_user(user.id, UserUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged, updated);

        assert_eq!(
            store.update_user(99, UserUpdate::default()).await,
            Err(StoreError::UserNotFound(99))
        );
    }

    #[tokio::test]
    async fn test_update_user_tokens_keeps_absent_tokens() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("a@x.com")).await;

        let updated = store
            .update_user_tokens(user.id, Some("tw".to_string()), None)
            .await
            .unwrap();
        assert_eq!(updated.twitter_token.as_deref(), Some("tw"));
        assert!(updated.google_token.is_none());

        let updated = store
            .update_user_tokens(user.id, None, Some("gg".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.twitter_token.as_deref(), Some("tw"));
        assert_eq!(updated.google_token.as_deref(), Some("gg"));

        assert_eq!(
            store.update_user_tokens(42, None, None).await,
            Err(StoreError::UserNotFound(42))
        );
    }

    #[tokio::test]
    async fn test_create_note_defaults() {
        let store = MemStorage::new();

        let note = store.create_note(new_note(7, "First")).await;
        assert_eq!(note.id, 1);
        assert_eq!(note.user_id, 7);
        assert!(note.schedule.is_none());
        assert!(note.last_posted.is_none());

        let provided = store
            .create_note(NewNote {
                schedule: Some(serde_json::json!({"frequency": "daily"})),
                ..new_note(7, "Second")
            })
            .await;
        assert_eq!(
            provided.schedule,
            Some(serde_json::json!({"frequency": "daily"}))
        );
    }

    #[tokio::test]
    async fn test_notes_by_user_filters_by_owner() {
        let store = MemStorage::new();

        store.create_note(new_note(1, "Mine")).await;
        store.create_note(new_note(2, "Theirs")).await;
        store.create_note(new_note(1, "Also mine")).await;

        let notes = store.notes_by_user(1).await;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "Mine");
        assert_eq!(notes[1].title, "Also mine");

        assert!(store.notes_by_user(3).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_note_preserves_untouched_fields() {
        let store = MemStorage::new();
        let note = store.create_note(new_note(1, "Original")).await;

        let updated = store
            .update_note(
                note.id,
                NoteUpdate {
                    title: Some("X".to_string()),
                    ..NoteUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "X");
        assert_eq!(updated.content, note.content);
        assert_eq!(updated.user_id, note.user_id);
        assert_eq!(updated.created_at, note.created_at);

        // Explicit null clears the schedule.
        let cleared = store
            .update_note(
                note.id,
                NoteUpdate {
                    schedule: Some(None),
                    ..NoteUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.schedule.is_none());

        assert_eq!(
            store.update_note(99, NoteUpdate::default()).await,
            Err(StoreError::NoteNotFound(99))
        );
    }

    #[tokio::test]
    async fn test_delete_note() {
        let store = MemStorage::new();
        let note = store.create_note(new_note(1, "Doomed")).await;

        store.delete_note(note.id).await.unwrap();
        assert!(store.notes_by_user(1).await.is_empty());

        assert_eq!(
            store.delete_note(note.id).await,
            Err(StoreError::NoteNotFound(note.id))
        );
    }

    #[tokio::test]
    async fn test_analytics_sorted_newest_first() {
        let store = MemStorage::new();

        for (impressions, engagements) in [(120, 5), (230, 9), (450, 14)] {
            store
                .add_analytics(NewAnalytics {
                    note_id: 1,
                    impressions,
                    engagements,
                })
                .await;
        }
        store
            .add_analytics(NewAnalytics {
                note_id: 2,
                impressions: 999,
                engagements: 0,
            })
            .await;

        // Spread the timestamps out, out of order, to exercise the sort.
        {
            let mut tables = store.inner.lock().unwrap();
            let base = Utc::now();
            tables.analytics.get_mut(&1).unwrap().timestamp = base - Duration::hours(1);
            tables.analytics.get_mut(&2).unwrap().timestamp = base + Duration::hours(1);
            tables.analytics.get_mut(&3).unwrap().timestamp = base;
        }

        let entries = store.analytics_by_note(1).await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].impressions, 230);
        assert_eq!(entries[1].impressions, 450);
        assert_eq!(entries[2].impressions, 120);
        assert!(entries.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }
}
