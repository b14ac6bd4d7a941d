use crate::api::error::AppError;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// A single flat directory of immutable staged files, keyed by identity.
///
/// Identities are opaque single-component filenames minted by the store.
/// Files are never mutated or reused after creation, so concurrent requests
/// need no locking: every creation targets a fresh name, and `create` only
/// renames fully written content into place.
pub struct StagingStore {
    root: PathBuf,
}

impl StagingStore {
    /// Opens the store rooted at `root`, creating the directory if absent.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed to create staging directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mints a fresh identity: millisecond timestamp plus a random token,
    /// so two mints within the same millisecond still differ and no staged
    /// file is ever overwritten.
    pub fn mint_identity(&self, extension: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        let token = Uuid::new_v4().simple().to_string();
        format!("{}-{}.{}", millis, &token[..8], extension)
    }

    /// Resolves an identity to an absolute path inside the store root.
    ///
    /// This is the single choke point for path construction: it rejects
    /// empty identities, separators, parent-dir segments, and anything else
    /// that is not exactly one normal path component. All other store
    /// operations go through here.
    pub fn resolve(&self, identity: &str) -> Result<PathBuf, AppError> {
        if identity.is_empty() || identity.contains('\0') {
            return Err(AppError::InvalidIdentity(
                "File identity must be a plain filename".to_string(),
            ));
        }
        if identity.contains('/') || identity.contains('\\') {
            return Err(AppError::InvalidIdentity(
                "File identity must not contain path separators".to_string(),
            ));
        }

        let mut components = Path::new(identity).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(AppError::InvalidIdentity(
                    "File identity must be a single path component".to_string(),
                ));
            }
        }

        Ok(self.root.join(identity))
    }

    pub async fn exists(&self, identity: &str) -> bool {
        match self.resolve(identity) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Persists `bytes` under `identity`. Content is written to a temporary
    /// name inside the root and renamed into place, so a concurrent reader
    /// never observes a partial file under the final identity.
    pub async fn create(&self, identity: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.resolve(identity)?;
        let tmp = self
            .root
            .join(format!(".tmp-{}", Uuid::new_v4().simple()));

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write staged file: {}", e)))?;

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Internal(format!(
                "failed to finalize staged file: {}",
                e
            )));
        }

        tracing::debug!("Staged {} ({} bytes)", identity, bytes.len());
        Ok(())
    }

    /// Opens a staged file for streaming reads.
    pub async fn open_for_read(&self, identity: &str) -> Result<tokio::fs::File, AppError> {
        let path = self.resolve(identity)?;
        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found.".to_string()))
            }
            Err(e) => Err(AppError::Internal(format!(
                "failed to open staged file: {}",
                e
            ))),
        }
    }

    /// Reads a staged file fully into memory.
    pub async fn read(&self, identity: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(identity)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found.".to_string()))
            }
            Err(e) => Err(AppError::Internal(format!(
                "failed to read staged file: {}",
                e
            ))),
        }
    }
}
