//! OAuth1 capability set and the generic three-legged service.

pub mod builtin;
pub mod provider;
pub mod response;
pub mod service;

use async_trait::async_trait;
use url::Url;

use crate::service::Service;
use oauthkit_common::Result;
use oauthkit_crypto::Signature;
use oauthkit_storage::Token;

pub use provider::OAuth1Provider;
pub use response::{parse_access_token_response, parse_request_token_response};
pub use service::GenericOAuth1Service;

/// OAuth1 service capabilities.
///
/// OAuth1 has no notion of scopes; the resolver rejects scope requests
/// for services of this kind.
#[async_trait]
pub trait OAuth1Service: Service {
    /// Signature helper used for every request.
    fn signature(&self) -> &Signature;

    /// Endpoint temporary credentials are requested from.
    fn request_token_endpoint(&self) -> &Url;

    /// Obtain and store a request token.
    async fn request_request_token(&self) -> Result<Token>;

    /// Build the URL the user must visit; pass `oauth_token` in `extra_params`.
    fn authorization_uri(&self, extra_params: &[(&str, &str)]) -> Result<Url>;

    /// Exchange an authorized request token for an access token and store it.
    ///
    /// When `token_secret` is `None`, the stored request token secret is used.
    async fn request_access_token(
        &self,
        token: &str,
        verifier: &str,
        token_secret: Option<&str>,
    ) -> Result<Token>;
}
