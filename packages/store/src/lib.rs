pub mod models;

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemStorage;
pub use models::{
    Analytics, NewAnalytics, NewNote, NewUser, Note, NoteUpdate, User, UserInfo, UserUpdate,
};
