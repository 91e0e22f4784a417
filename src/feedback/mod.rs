use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Durable, append-only record of critique outcomes.
///
/// One timestamped entry per line, created if absent, never mutated or
/// deleted by this process. Writes are serialized through a mutex so
/// concurrent task submissions cannot interleave or reorder entries.
/// Rotation and truncation are external concerns.
pub struct FeedbackLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, prefixed with the current wall-clock time.
    /// Embedded newlines are flattened so every entry stays a single line.
    pub async fn append(&self, entry: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("opening feedback log at {}", self.path.display()))?;

        let line = format!(
            "{}: {}\n",
            Utc::now().to_rfc3339(),
            entry.replace('\n', " ")
        );
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
