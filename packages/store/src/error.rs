use thiserror::Error;

/// Failures reported by [`crate::MemStorage`]. Lookups that merely find
/// nothing return `None`; only updates and deletes of absent records are
/// errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error("note {0} not found")]
    NoteNotFound(i64),
}
