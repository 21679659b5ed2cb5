//! OAuth2 capability set and the generic authorization-code service.

pub mod builtin;
pub mod provider;
pub mod response;
pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::service::Service;
use oauthkit_common::Result;
use oauthkit_storage::Token;

pub use provider::OAuth2Provider;
pub use response::parse_token_response;
pub use service::GenericOAuth2Service;

/// OAuth2 service capabilities.
#[async_trait]
pub trait OAuth2Service: Service {
    /// Scopes the service was constructed with, already resolved.
    fn scopes(&self) -> &[String];

    /// Check whether `scope` is one of the provider's declared scope values.
    fn is_valid_scope(&self, scope: &str) -> bool;

    /// Build the URL the user must visit to grant access.
    async fn authorization_uri(&self, extra_params: &[(&str, &str)]) -> Result<Url>;

    /// Exchange an authorization code for an access token and store it.
    async fn request_access_token(&self, code: &str, state: Option<&str>) -> Result<Token>;

    /// Obtain a fresh access token from `token`'s refresh token and store it.
    async fn refresh_access_token(&self, token: &Token) -> Result<Token>;
}

/// How an access token is presented on API requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthorizationMethod {
    /// `Authorization: Bearer <token>`
    #[default]
    HeaderBearer,
    /// `Authorization: token <token>`
    HeaderToken,
    /// `Authorization: OAuth <token>`
    HeaderOAuth,
    /// `?<param>=<token>`
    QueryString { param: String },
}

impl AuthorizationMethod {
    /// Apply the token to a request, returning the header to add, if any.
    pub fn apply(&self, uri: &mut Url, access_token: &str) -> Option<(String, String)> {
        let scheme = match self {
            AuthorizationMethod::HeaderBearer => "Bearer",
            AuthorizationMethod::HeaderToken => "token",
            AuthorizationMethod::HeaderOAuth => "OAuth",
            AuthorizationMethod::QueryString { param } => {
                uri.query_pairs_mut().append_pair(param, access_token);
                return None;
            }
        };
        Some((
            "Authorization".to_string(),
            format!("{} {}", scheme, access_token),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_methods() {
        let mut uri = Url::parse("https://api.github.com/user").unwrap();

        assert_eq!(
            AuthorizationMethod::HeaderToken.apply(&mut uri, "abc"),
            Some(("Authorization".to_string(), "token abc".to_string()))
        );
        assert_eq!(
            AuthorizationMethod::HeaderBearer.apply(&mut uri, "abc").unwrap().1,
            "Bearer abc"
        );
        assert_eq!(uri.query(), None);
    }

    #[test]
    fn test_query_string_method() {
        let mut uri = Url::parse("https://graph.facebook.com/me?fields=id").unwrap();
        let method = AuthorizationMethod::QueryString {
            param: "access_token".to_string(),
        };

        assert!(method.apply(&mut uri, "abc").is_none());
        assert_eq!(uri.query(), Some("fields=id&access_token=abc"));
    }

    #[test]
    fn test_method_deserialization() {
        let method: AuthorizationMethod =
            serde_json::from_str(r#"{"type": "query_string", "param": "oauth2_access_token"}"#).unwrap();
        assert_eq!(
            method,
            AuthorizationMethod::QueryString {
                param: "oauth2_access_token".to_string()
            }
        );
    }
}
