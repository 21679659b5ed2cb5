//! In-memory token storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::backend::TokenStorage;
use crate::token::Token;
use oauthkit_common::{Error, Result};

/// In-memory token storage.
///
/// Useful for tests and short-lived processes. All tokens are lost on drop.
#[derive(Default)]
pub struct MemoryStorage {
    tokens: RwLock<HashMap<String, Token>>,
    states: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for MemoryStorage {
    async fn retrieve_access_token(&self, service: &str) -> Result<Token> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(service)
            .cloned()
            .ok_or_else(|| Error::TokenNotFound(format!("No token stored for {}", service)))
    }

    async fn store_access_token(&self, service: &str, token: Token) -> Result<()> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(service.to_string(), token);
        Ok(())
    }

    async fn has_access_token(&self, service: &str) -> Result<bool> {
        Ok(self
            .tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(service))
    }

    async fn clear_token(&self, service: &str) -> Result<()> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(service);
        Ok(())
    }

    async fn clear_all_tokens(&self) -> Result<()> {
        self.tokens.write().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }

    async fn store_authorization_state(&self, service: &str, state: &str) -> Result<()> {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(service.to_string(), state.to_string());
        Ok(())
    }

    async fn retrieve_authorization_state(&self, service: &str) -> Result<String> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(service)
            .cloned()
            .ok_or_else(|| {
                Error::AuthorizationStateNotFound(format!("No state stored for {}", service))
            })
    }

    async fn has_authorization_state(&self, service: &str) -> Result<bool> {
        Ok(self
            .states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(service))
    }

    async fn clear_authorization_state(&self, service: &str) -> Result<()> {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(service);
        Ok(())
    }

    async fn clear_all_authorization_states(&self) -> Result<()> {
        self.states.write().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }
}
