//! Default HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::client::{HttpClient, HttpRequest, Method};
use oauthkit_common::{Error, Result};

/// Default user agent sent with every request.
const DEFAULT_USER_AGENT: &str = "OAuthKit/0.1";

/// Transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent header value.
    pub user_agent: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 15,
            max_redirects: 5,
        }
    }
}

/// `reqwest`-based [`HttpClient`].
pub struct ReqwestClient {
    http: Client,
    config: HttpConfig,
}

impl ReqwestClient {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a client with the given configuration.
    ///
    /// # Errors
    /// - The underlying TLS backend could not be initialized
    pub fn with_config(config: HttpConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn retrieve_response(&self, request: HttpRequest) -> Result<String> {
        debug!(method = %request.method, uri = %request.uri, "Sending HTTP request");

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), request.uri.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some((content_type, data)) = request.body.encode() {
            builder = builder.header(header::CONTENT_TYPE, content_type).body(data);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request to {} failed: {}", request.uri, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Http(format!("{} returned {}: {}", request.uri, status, body)));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RequestBody;
    use url::Url;
    use wiremock::matchers::{body_string, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: HttpConfig = serde_json::from_str(r#"{"timeout_secs": 3}"#).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.max_redirects, 5);
    }

    #[tokio::test]
    async fn test_post_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(header_eq("content-type", "application/x-www-form-urlencoded"))
            .and(header_eq("accept", "application/json"))
            .and(body_string("code=abc&grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"access_token\":\"t\"}"))
            .mount(&server)
            .await;

        let client = ReqwestClient::new().unwrap();
        let uri = Url::parse(&format!("{}/token", server.uri())).unwrap();
        let request = HttpRequest::new(Method::Post, uri)
            .with_header("Accept", "application/json")
            .with_body(RequestBody::form([("code", "abc"), ("grant_type", "authorization_code")]));

        let body = client.retrieve_response(request).await.unwrap();
        assert_eq!(body, "{\"access_token\":\"t\"}");
    }

    #[tokio::test]
    async fn test_user_agent_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_eq("user-agent", "custom-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let config = HttpConfig {
            user_agent: "custom-agent".to_string(),
            ..HttpConfig::default()
        };
        let client = ReqwestClient::with_config(config).unwrap();
        let uri = Url::parse(&server.uri()).unwrap();

        let body = client
            .retrieve_response(HttpRequest::new(Method::Get, uri))
            .await
            .unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_error_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad_verification_code"))
            .mount(&server)
            .await;

        let client = ReqwestClient::new().unwrap();
        let uri = Url::parse(&server.uri()).unwrap();
        let result = client.retrieve_response(HttpRequest::new(Method::Get, uri)).await;

        match result {
            Err(Error::Http(message)) => assert!(message.contains("bad_verification_code")),
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }
}
