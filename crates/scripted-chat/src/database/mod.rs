pub mod conversations;

use thiserror::Error;

pub use conversations::{
    ConversationRecord,
    ConversationStore,
};

use crate::util::directories::DirectoryError;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("conversation index {index} is out of bounds (list has {len} records)")]
    IndexOutOfBounds { index: usize, len: usize },
}
