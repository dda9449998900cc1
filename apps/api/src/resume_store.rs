//! Résumé store: the one collaborator whose failure is allowed to abort a turn.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::resume::ResumeProfile;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("résumé data unreadable at {path}: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("résumé data malformed at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the résumé JSON from disk. No caching: every call re-reads the file.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    path: PathBuf,
}

impl ResumeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the profile. Shape mismatches fail here, not during templating.
    pub async fn load(&self) -> Result<ResumeProfile, ResumeError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ResumeError::Missing {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&raw).map_err(|source| ResumeError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}
