use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("home directory not found")]
    NoHomeDirectory,
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T, E = DirectoryError> = std::result::Result<T, E>;

/// The application data directory, e.g. `~/.local/share/scripted-chat` on
/// Linux. All persisted state lives under here.
pub fn data_dir() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .ok_or(DirectoryError::NoHomeDirectory)?
        .join("scripted-chat"))
}

/// Path of the conversation blob inside a data directory.
pub fn conversations_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("conversations.json")
}

/// Directory for log files inside a data directory.
pub fn logs_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversations_path() {
        let dir = PathBuf::from("/tmp/scripted-chat-test");
        assert_eq!(
            conversations_path(&dir),
            PathBuf::from("/tmp/scripted-chat-test/conversations.json")
        );
    }

    #[test]
    fn test_logs_dir() {
        let dir = PathBuf::from("/tmp/scripted-chat-test");
        assert_eq!(logs_dir(&dir), PathBuf::from("/tmp/scripted-chat-test/logs"));
    }
}
