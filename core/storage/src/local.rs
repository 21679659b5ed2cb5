//! Local filesystem token storage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::backend::TokenStorage;
use crate::token::Token;
use oauthkit_common::{Error, Result};

/// On-disk document layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    tokens: BTreeMap<String, Token>,
    #[serde(default)]
    states: BTreeMap<String, String>,
}

/// Token storage backed by a single JSON file.
///
/// The file and its parent directories are created on the first write.
/// Every operation re-reads the file, so several processes may share it
/// as long as they do not write concurrently.
pub struct LocalStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStorage {
    /// Create a storage backed by the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::Storage(format!("Corrupt token file {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(document)?;
        fs::write(&self.path, bytes).await?;
        debug!(path = %self.path.display(), "Token file written");
        Ok(())
    }

    async fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Document) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        f(&mut document);
        self.save(&document).await
    }
}

#[async_trait]
impl TokenStorage for LocalStorage {
    async fn retrieve_access_token(&self, service: &str) -> Result<Token> {
        let _guard = self.lock.lock().await;
        self.load()
            .await?
            .tokens
            .remove(service)
            .ok_or_else(|| Error::TokenNotFound(format!("No token stored for {}", service)))
    }

    async fn store_access_token(&self, service: &str, token: Token) -> Result<()> {
        self.update(|doc| {
            doc.tokens.insert(service.to_string(), token);
        })
        .await
    }

    async fn has_access_token(&self, service: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.tokens.contains_key(service))
    }

    async fn clear_token(&self, service: &str) -> Result<()> {
        self.update(|doc| {
            doc.tokens.remove(service);
        })
        .await
    }

    async fn clear_all_tokens(&self) -> Result<()> {
        self.update(|doc| doc.tokens.clear()).await
    }

    async fn store_authorization_state(&self, service: &str, state: &str) -> Result<()> {
        self.update(|doc| {
            doc.states.insert(service.to_string(), state.to_string());
        })
        .await
    }

    async fn retrieve_authorization_state(&self, service: &str) -> Result<String> {
        let _guard = self.lock.lock().await;
        self.load().await?.states.remove(service).ok_or_else(|| {
            Error::AuthorizationStateNotFound(format!("No state stored for {}", service))
        })
    }

    async fn has_authorization_state(&self, service: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.states.contains_key(service))
    }

    async fn clear_authorization_state(&self, service: &str) -> Result<()> {
        self.update(|doc| {
            doc.states.remove(service);
        })
        .await
    }

    async fn clear_all_authorization_states(&self) -> Result<()> {
        self.update(|doc| doc.states.clear()).await
    }
}
