//! Per-day chat log. Best-effort JSON files, read back for reporting.
//!
//! Each day is one `chat_YYYYMMDD.json` file holding a JSON array. Appends are
//! read-modify-write, serialized within the process by a mutex.

pub mod analytics;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::chat::ChatLogEntry;

const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Error)]
pub enum ChatLogError {
    #[error("chat log I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("chat log at {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ChatLog {
    dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl ChatLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("chat_{}.json", date.format(DATE_FORMAT)))
    }

    /// Appends `entry` to the file for the entry's local date.
    pub async fn append(&self, entry: ChatLogEntry) -> Result<(), ChatLogError> {
        let _guard = self.write_lock.lock().await;
        let path = self.file_for(entry.timestamp.date_naive());

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ChatLogError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let mut entries = read_entries(&path).await?.unwrap_or_default();
        entries.push(entry);

        let json = serde_json::to_string_pretty(&entries).map_err(|source| ChatLogError::Json {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| ChatLogError::Io {
                path: path.clone(),
                source,
            })?;

        debug!("Chat log {} now has {} entries", path.display(), entries.len());
        Ok(())
    }

    /// Entries logged on `date`; `None` when nothing was logged that day.
    pub async fn read(&self, date: NaiveDate) -> Result<Option<Vec<ChatLogEntry>>, ChatLogError> {
        read_entries(&self.file_for(date)).await
    }

    pub async fn read_today(&self) -> Result<Option<Vec<ChatLogEntry>>, ChatLogError> {
        self.read(Local::now().date_naive()).await
    }
}

/// Parses a `YYYYMMDD` path segment.
pub fn parse_log_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

async fn read_entries(path: &Path) -> Result<Option<Vec<ChatLogEntry>>, ChatLogError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ChatLogError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| ChatLogError::Json {
            path: path.to_path_buf(),
            source,
        })
}
