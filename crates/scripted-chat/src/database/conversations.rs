use std::path::PathBuf;

use fd_lock::RwLock;
use serde::{
    Deserialize,
    Serialize,
};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use super::DatabaseError;

/// One question/answer exchange, plus the user's verdict on it.
///
/// Records carry no stable identifier; a record is addressed by its position
/// in the conversation list, which is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub question: String,
    pub response: String,
    /// 1-5 stars, 0 while unrated.
    #[serde(default)]
    pub rating: u8,
    /// Free-text feedback, empty while none was given.
    #[serde(default)]
    pub feedback: String,
}

impl ConversationRecord {
    pub fn new(question: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
            rating: 0,
            feedback: String::new(),
        }
    }
}

/// File-backed store for the conversation history.
///
/// The whole history is one JSON array in a single file; every write rewrites
/// the complete blob. The store holds no in-memory state, so the mutating
/// operations hand the updated list back to the caller.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    path: PathBuf,
}

impl ConversationStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Returns the persisted conversation list. A missing, unreadable, or
    /// unparsable blob yields an empty list; this never fails.
    pub async fn all(&self) -> Vec<ConversationRecord> {
        match self.read().await {
            Ok(list) => list,
            Err(err) => {
                warn!("treating conversation blob at {} as empty: {err}", self.path.display());
                Vec::new()
            },
        }
    }

    /// Appends a record and rewrites the blob, returning the updated list.
    pub async fn add(&self, record: ConversationRecord) -> Result<Vec<ConversationRecord>, DatabaseError> {
        let mut list = self.all().await;
        list.push(record);
        self.save(&list).await?;
        Ok(list)
    }

    /// Replaces the record at `index` and rewrites the blob, returning the
    /// updated list. An out-of-range index is an explicit error and leaves
    /// the blob untouched.
    pub async fn update(
        &self,
        index: usize,
        record: ConversationRecord,
    ) -> Result<Vec<ConversationRecord>, DatabaseError> {
        let mut list = self.all().await;
        if index >= list.len() {
            return Err(DatabaseError::IndexOutOfBounds {
                index,
                len: list.len(),
            });
        }
        list[index] = record;
        self.save(&list).await?;
        Ok(list)
    }

    async fn read(&self) -> Result<Vec<ConversationRecord>, DatabaseError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let buf = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&buf)?)
    }

    async fn save(&self, list: &[ConversationRecord]) -> Result<(), DatabaseError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file_opts = File::options();
        file_opts.create(true).write(true).truncate(true);

        let mut file = RwLock::new(file_opts.open(&self.path).await?);
        let mut lock = file.write()?;

        let json = serde_json::to_string_pretty(list)?;
        lock.write_all(json.as_bytes()).await?;
        lock.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> ConversationStore {
        ConversationStore::new(dir.path().join("conversations.json"))
    }

    #[tokio::test]
    async fn test_missing_blob_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        tokio::fs::write(store.path(), b"not json at all").await.unwrap();
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_appends_one_record() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let before = store.all().await;
        let record = ConversationRecord::new("hello", "hi there");
        let list = store.add(record.clone()).await.unwrap();

        assert_eq!(list.len(), before.len() + 1);
        assert_eq!(list.last(), Some(&record));
        assert_eq!(store.all().await, list);
    }

    #[tokio::test]
    async fn test_new_record_starts_unrated() {
        let record = ConversationRecord::new("q", "a");
        assert_eq!(record.rating, 0);
        assert_eq!(record.feedback, "");
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add(ConversationRecord::new("first", "one")).await.unwrap();
        let before = store.add(ConversationRecord::new("second", "two")).await.unwrap();

        let mut rated = before[0].clone();
        rated.rating = 4;
        let after = store.update(0, rated.clone()).await.unwrap();

        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], rated);
        assert_eq!(after[1], before[1]);
        assert_eq!(store.all().await, after);
    }

    #[tokio::test]
    async fn test_update_out_of_bounds_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(ConversationRecord::new("only", "one")).await.unwrap();

        let err = store
            .update(1, ConversationRecord::new("nope", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::IndexOutOfBounds { index: 1, len: 1 }));

        // The blob must be untouched.
        let list = store.all().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].question, "only");
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let list = {
            let store = store_in(&dir);
            store.add(ConversationRecord::new("persist", "me")).await.unwrap()
        };

        let reopened = store_in(&dir);
        assert_eq!(reopened.all().await, list);
    }
}
