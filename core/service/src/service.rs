//! Capabilities shared by every OAuth service, and the polymorphic handle
//! returned by the resolver.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::oauth1::OAuth1Service;
use crate::oauth2::OAuth2Service;
use oauthkit_common::{Error, ProtocolVersion, Result};
use oauthkit_http::{Method, RequestBody};
use oauthkit_storage::TokenStorage;

/// Operations every constructed service supports.
#[async_trait]
pub trait Service: Send + Sync {
    /// Name the service stores its tokens under.
    fn service_name(&self) -> &str;

    /// Protocol version the service speaks.
    fn version(&self) -> ProtocolVersion;

    /// Endpoint the user is sent to for authorization.
    fn authorization_endpoint(&self) -> &Url;

    /// Endpoint access tokens are requested from.
    fn access_token_endpoint(&self) -> &Url;

    /// Base URI relative request paths are resolved against.
    fn base_api_uri(&self) -> Option<&Url>;

    /// Token storage shared with the caller.
    fn storage(&self) -> &Arc<dyn TokenStorage>;

    /// Send an authorized API request and return the response body.
    ///
    /// `path` is resolved against [`Service::base_api_uri`] unless it is
    /// already an absolute URL.
    ///
    /// # Errors
    /// - No token stored for the service
    /// - Stored token expired
    /// - Transport errors
    async fn request(
        &self,
        path: &str,
        method: Method,
        body: RequestBody,
        extra_headers: Vec<(String, String)>,
    ) -> Result<String>;
}

/// Resolve a request path against an optional base URI.
pub(crate) fn resolve_uri(base: Option<&Url>, path: &str) -> Result<Url> {
    if let Ok(absolute) = Url::parse(path) {
        return Ok(absolute);
    }

    let base = base.ok_or_else(|| {
        Error::InvalidInput(format!("Relative path {} given but no base API URI", path))
    })?;
    base.join(path.trim_start_matches('/'))
        .map_err(|e| Error::InvalidInput(format!("Invalid request path {}: {}", path, e)))
}

/// A constructed service of either protocol version.
pub enum ServiceHandle {
    OAuth1(Box<dyn OAuth1Service>),
    OAuth2(Box<dyn OAuth2Service>),
}

impl ServiceHandle {
    /// Protocol version of the wrapped service.
    pub fn version(&self) -> ProtocolVersion {
        match self {
            ServiceHandle::OAuth1(_) => ProtocolVersion::OAuth1,
            ServiceHandle::OAuth2(_) => ProtocolVersion::OAuth2,
        }
    }

    /// Name of the wrapped service.
    pub fn service_name(&self) -> &str {
        match self {
            ServiceHandle::OAuth1(service) => service.service_name(),
            ServiceHandle::OAuth2(service) => service.service_name(),
        }
    }

    /// Token storage of the wrapped service.
    pub fn storage(&self) -> &Arc<dyn TokenStorage> {
        match self {
            ServiceHandle::OAuth1(service) => service.storage(),
            ServiceHandle::OAuth2(service) => service.storage(),
        }
    }

    /// Send an authorized API request through the wrapped service.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: RequestBody,
        extra_headers: Vec<(String, String)>,
    ) -> Result<String> {
        match self {
            ServiceHandle::OAuth1(service) => service.request(path, method, body, extra_headers).await,
            ServiceHandle::OAuth2(service) => service.request(path, method, body, extra_headers).await,
        }
    }

    pub fn as_oauth1(&self) -> Option<&dyn OAuth1Service> {
        match self {
            ServiceHandle::OAuth1(service) => Some(service.as_ref()),
            ServiceHandle::OAuth2(_) => None,
        }
    }

    pub fn as_oauth2(&self) -> Option<&dyn OAuth2Service> {
        match self {
            ServiceHandle::OAuth2(service) => Some(service.as_ref()),
            ServiceHandle::OAuth1(_) => None,
        }
    }

    pub fn into_oauth1(self) -> Option<Box<dyn OAuth1Service>> {
        match self {
            ServiceHandle::OAuth1(service) => Some(service),
            ServiceHandle::OAuth2(_) => None,
        }
    }

    pub fn into_oauth2(self) -> Option<Box<dyn OAuth2Service>> {
        match self {
            ServiceHandle::OAuth2(service) => Some(service),
            ServiceHandle::OAuth1(_) => None,
        }
    }
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceHandle({}, {})", self.version(), self.service_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let base = Url::parse("https://api.github.com/").unwrap();
        let uri = resolve_uri(Some(&base), "user/emails").unwrap();
        assert_eq!(uri.as_str(), "https://api.github.com/user/emails");
    }

    #[test]
    fn test_resolve_leading_slash_keeps_base_path() {
        let base = Url::parse("https://api.twitter.com/1.1/").unwrap();
        let uri = resolve_uri(Some(&base), "/statuses/home_timeline.json").unwrap();
        assert_eq!(uri.as_str(), "https://api.twitter.com/1.1/statuses/home_timeline.json");
    }

    #[test]
    fn test_absolute_path_passes_through() {
        let base = Url::parse("https://api.github.com/").unwrap();
        let uri = resolve_uri(Some(&base), "https://uploads.github.com/x").unwrap();
        assert_eq!(uri.as_str(), "https://uploads.github.com/x");
    }

    #[test]
    fn test_relative_path_without_base_fails() {
        assert!(matches!(resolve_uri(None, "user"), Err(Error::InvalidInput(_))));
    }
}
