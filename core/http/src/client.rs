//! HTTP client trait and request types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;
use url::Url;

use oauthkit_common::Result;

/// HTTP request method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` parameters.
    Form(Vec<(String, String)>),
    /// Pre-encoded payload with its content type.
    Raw { content_type: String, data: String },
}

impl RequestBody {
    /// Build a form body from borrowed pairs.
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Form parameters, which take part in OAuth1 signatures.
    pub fn form_params(&self) -> &[(String, String)] {
        match self {
            RequestBody::Form(pairs) => pairs,
            _ => &[],
        }
    }

    /// Content type and encoded payload, if any.
    pub fn encode(&self) -> Option<(String, String)> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Form(pairs) => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter())
                    .finish();
                Some(("application/x-www-form-urlencoded".to_string(), encoded))
            }
            RequestBody::Raw { content_type, data } => Some((content_type.clone(), data.clone())),
        }
    }
}

/// A request handed to an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Create a request without headers or body.
    pub fn new(method: Method, uri: Url) -> Self {
        Self {
            method,
            uri,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add several headers.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Look up a header value, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP transport used by constructed services.
///
/// Implementations perform the request and return the response body.
/// Non-success statuses must be reported as `Error::Http`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform the request and return the response body.
    async fn retrieve_response(&self, request: HttpRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_body_encoding() {
        let body = RequestBody::form([("code", "a b"), ("redirect_uri", "http://x/cb?y=1")]);
        let (content_type, data) = body.encode().unwrap();

        assert_eq!(content_type, "application/x-www-form-urlencoded");
        assert_eq!(data, "code=a+b&redirect_uri=http%3A%2F%2Fx%2Fcb%3Fy%3D1");
    }

    #[test]
    fn test_empty_body_has_no_payload() {
        assert!(RequestBody::Empty.encode().is_none());
        assert!(RequestBody::Empty.form_params().is_empty());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest::new(Method::Get, Url::parse("https://example.com").unwrap())
            .with_header("Accept", "application/json");

        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn test_method_serialization() {
        assert_eq!(serde_json::to_string(&Method::Post).unwrap(), "\"POST\"");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
