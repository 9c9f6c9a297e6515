use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Response shown when no script entry matches the user's question.
pub const NO_RESPONSE: &str = "No response found";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub question: String,
    pub response: String,
}

/// The fixed, ordered question/response table the chat answers from.
///
/// The table is read once at startup and never changes while the app runs.
#[derive(Debug, Clone, Default)]
pub struct Script {
    entries: Vec<ScriptEntry>,
}

impl Script {
    pub fn new(entries: Vec<ScriptEntry>) -> Self {
        Self { entries }
    }

    /// The table compiled into the binary.
    pub fn builtin() -> Self {
        let entries = serde_json::from_str(include_str!("../assets/script.json"))
            .expect("builtin script asset is valid JSON");
        Self { entries }
    }

    /// Loads a replacement table from a JSON file at startup.
    pub async fn load(path: &Path) -> Result<Self, ScriptError> {
        let buf = tokio::fs::read(path).await?;
        Ok(Self {
            entries: serde_json::from_slice(&buf)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the first entry whose question contains `input`
    /// case-insensitively, in table order.
    ///
    /// Note the direction: the table's question text must contain what the
    /// user typed, not the other way around. An empty input therefore matches
    /// the first entry with a non-empty question; that quirk is part of the
    /// contract and covered by tests.
    pub fn lookup(&self, input: &str) -> Option<&ScriptEntry> {
        let needle = input.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.question.to_lowercase().contains(&needle))
    }

    /// The response for `input`, falling back to [NO_RESPONSE].
    pub fn respond(&self, input: &str) -> String {
        self.lookup(input)
            .map(|entry| entry.response.clone())
            .unwrap_or_else(|| NO_RESPONSE.to_string())
    }
}
