//! Token storage trait definition.

use async_trait::async_trait;

use crate::token::Token;
use oauthkit_common::Result;

/// Storage for tokens and authorization states, keyed by service name.
///
/// Implementations must be shareable between services, which hold them
/// behind an `Arc`.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Retrieve the access token stored for `service`.
    ///
    /// # Errors
    /// - `TokenNotFound` if nothing is stored for `service`
    async fn retrieve_access_token(&self, service: &str) -> Result<Token>;

    /// Store (or replace) the access token for `service`.
    async fn store_access_token(&self, service: &str, token: Token) -> Result<()>;

    /// Check whether a token is stored for `service`.
    async fn has_access_token(&self, service: &str) -> Result<bool>;

    /// Remove the token stored for `service`. Missing entries are ignored.
    async fn clear_token(&self, service: &str) -> Result<()>;

    /// Remove every stored token.
    async fn clear_all_tokens(&self) -> Result<()>;

    /// Store (or replace) the authorization state for `service`.
    async fn store_authorization_state(&self, service: &str, state: &str) -> Result<()>;

    /// Retrieve the authorization state stored for `service`.
    ///
    /// # Errors
    /// - `AuthorizationStateNotFound` if nothing is stored for `service`
    async fn retrieve_authorization_state(&self, service: &str) -> Result<String>;

    /// Check whether an authorization state is stored for `service`.
    async fn has_authorization_state(&self, service: &str) -> Result<bool>;

    /// Remove the authorization state for `service`. Missing entries are ignored.
    async fn clear_authorization_state(&self, service: &str) -> Result<()>;

    /// Remove every stored authorization state.
    async fn clear_all_authorization_states(&self) -> Result<()>;
}
