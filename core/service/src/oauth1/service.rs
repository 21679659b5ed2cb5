//! Generic OAuth1 three-legged service.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::{parse_access_token_response, parse_request_token_response, OAuth1Provider, OAuth1Service};
use crate::descriptor::OAuth1Context;
use crate::service::{resolve_uri, Service};
use oauthkit_common::{Credentials, Error, ProtocolVersion, Result};
use oauthkit_crypto::{encode, generate_nonce, Signature};
use oauthkit_http::{HttpClient, HttpRequest, Method, RequestBody};
use oauthkit_storage::{Token, TokenStorage};

/// OAuth1 service driven by an [`OAuth1Provider`] declaration.
pub struct GenericOAuth1Service {
    provider: OAuth1Provider,
    credentials: Arc<Credentials>,
    http_client: Arc<dyn HttpClient>,
    storage: Arc<dyn TokenStorage>,
    signature: Signature,
}

impl GenericOAuth1Service {
    /// Create a service from a provider declaration and its collaborators.
    pub fn new(provider: OAuth1Provider, context: OAuth1Context) -> Self {
        Self {
            provider,
            credentials: context.credentials,
            http_client: context.http_client,
            storage: context.storage,
            signature: context.signature,
        }
    }

    /// Provider declaration this service was built from.
    pub fn provider(&self) -> &OAuth1Provider {
        &self.provider
    }

    /// Build the `Authorization: OAuth ...` header value.
    ///
    /// `oauth_params` are added to the protocol parameters every request
    /// carries; `body_params` only take part in the signature.
    pub fn authorization_header(
        &self,
        method: Method,
        uri: &Url,
        oauth_params: Vec<(String, String)>,
        body_params: &[(String, String)],
        token_secret: Option<&str>,
    ) -> Result<String> {
        let mut params = oauth_params;
        params.extend([
            ("oauth_consumer_key".to_string(), self.credentials.consumer_id().to_string()),
            ("oauth_nonce".to_string(), generate_nonce()),
            ("oauth_signature_method".to_string(), self.signature.method().to_string()),
            ("oauth_timestamp".to_string(), Utc::now().timestamp().to_string()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]);

        let mut signed = params.clone();
        signed.extend_from_slice(body_params);
        let signature = self
            .signature
            .sign(method.as_str(), uri, &signed, token_secret)?;
        params.push(("oauth_signature".to_string(), signature));
        params.sort();

        let header = params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", header))
    }

    async fn signed_post(
        &self,
        uri: &Url,
        oauth_params: Vec<(String, String)>,
        body: RequestBody,
        token_secret: Option<&str>,
    ) -> Result<String> {
        let header = self.authorization_header(
            Method::Post,
            uri,
            oauth_params,
            body.form_params(),
            token_secret,
        )?;
        let request = HttpRequest::new(Method::Post, uri.clone())
            .with_header("Authorization", header)
            .with_body(body);
        self.http_client.retrieve_response(request).await
    }
}

#[async_trait]
impl Service for GenericOAuth1Service {
    fn service_name(&self) -> &str {
        &self.provider.name
    }

    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::OAuth1
    }

    fn authorization_endpoint(&self) -> &Url {
        &self.provider.authorization_endpoint
    }

    fn access_token_endpoint(&self) -> &Url {
        &self.provider.access_token_endpoint
    }

    fn base_api_uri(&self) -> Option<&Url> {
        self.provider.base_api_uri.as_ref()
    }

    fn storage(&self) -> &Arc<dyn TokenStorage> {
        &self.storage
    }

    async fn request(
        &self,
        path: &str,
        method: Method,
        body: RequestBody,
        extra_headers: Vec<(String, String)>,
    ) -> Result<String> {
        let token = self.storage.retrieve_access_token(&self.provider.name).await?;
        if token.is_expired() {
            return Err(Error::ExpiredToken(format!(
                "Token for {} expired",
                self.provider.name
            )));
        }

        let uri = resolve_uri(self.base_api_uri(), path)?;
        let header = self.authorization_header(
            method,
            &uri,
            vec![("oauth_token".to_string(), token.access_token.clone())],
            body.form_params(),
            token.access_token_secret.as_deref(),
        )?;

        debug!(service = %self.provider.name, %method, %uri, "Sending signed request");

        let request = HttpRequest::new(method, uri)
            .with_headers(extra_headers)
            .with_header("Authorization", header)
            .with_body(body);
        self.http_client.retrieve_response(request).await
    }
}

#[async_trait]
impl OAuth1Service for GenericOAuth1Service {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn request_token_endpoint(&self) -> &Url {
        &self.provider.request_token_endpoint
    }

    async fn request_request_token(&self) -> Result<Token> {
        let response = self
            .signed_post(
                &self.provider.request_token_endpoint,
                vec![(
                    "oauth_callback".to_string(),
                    self.credentials.callback_url().to_string(),
                )],
                RequestBody::Empty,
                None,
            )
            .await?;

        let token = parse_request_token_response(&response).map_err(|e| {
            warn!(service = %self.provider.name, "Request token rejected: {}", e);
            e
        })?;
        self.storage
            .store_access_token(&self.provider.name, token.clone())
            .await?;

        info!(service = %self.provider.name, "Request token obtained");
        Ok(token)
    }

    fn authorization_uri(&self, extra_params: &[(&str, &str)]) -> Result<Url> {
        let mut uri = self.provider.authorization_endpoint.clone();
        if !extra_params.is_empty() {
            uri.query_pairs_mut().extend_pairs(extra_params.iter());
        }
        Ok(uri)
    }

    async fn request_access_token(
        &self,
        token: &str,
        verifier: &str,
        token_secret: Option<&str>,
    ) -> Result<Token> {
        let token_secret = match token_secret {
            Some(secret) => secret.to_string(),
            None => self
                .storage
                .retrieve_access_token(&self.provider.name)
                .await?
                .request_token_secret
                .ok_or_else(|| {
                    Error::TokenNotFound(format!(
                        "No request token secret stored for {}",
                        self.provider.name
                    ))
                })?,
        };

        let response = self
            .signed_post(
                &self.provider.access_token_endpoint,
                vec![
                    ("oauth_token".to_string(), token.to_string()),
                    ("oauth_verifier".to_string(), verifier.to_string()),
                ],
                RequestBody::form([("oauth_verifier", verifier)]),
                Some(&token_secret),
            )
            .await?;

        let access = parse_access_token_response(&response)?;
        self.storage
            .store_access_token(&self.provider.name, access.clone())
            .await?;

        info!(service = %self.provider.name, "Access token obtained");
        Ok(access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauthkit_crypto::SignatureMethod;
    use oauthkit_storage::MemoryStorage;
    use std::sync::Mutex;

    struct FakeClient {
        response: String,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl FakeClient {
        fn new(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: response.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> HttpRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HttpClient for FakeClient {
        async fn retrieve_response(&self, request: HttpRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    fn provider() -> OAuth1Provider {
        OAuth1Provider::new(
            "Example",
            Url::parse("https://example.com/oauth/request_token").unwrap(),
            Url::parse("https://example.com/oauth/authenticate").unwrap(),
            Url::parse("https://example.com/oauth/access_token").unwrap(),
        )
        .with_base_api_uri(Url::parse("https://api.example.com/1.1/").unwrap())
    }

    fn service(client: Arc<FakeClient>, storage: Arc<MemoryStorage>, method: SignatureMethod) -> GenericOAuth1Service {
        let credentials = Arc::new(Credentials::new("consumer-key", "consumer-secret", "http://localhost/cb"));
        let context = OAuth1Context {
            signature: Signature::new(&credentials).with_method(method),
            credentials,
            http_client: client,
            storage,
        };
        GenericOAuth1Service::new(provider(), context)
    }

    /// Header parameters, decoded.
    fn header_params(header: &str) -> Vec<(String, String)> {
        header
            .trim_start_matches("OAuth ")
            .split(", ")
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap();
                let v = v.trim_matches('"');
                let decoded: String = url::form_urlencoded::parse(format!("v={}", v).as_bytes())
                    .next()
                    .map(|(_, v)| v.into_owned())
                    .unwrap();
                (k.to_string(), decoded)
            })
            .collect()
    }

    #[test]
    fn test_authorization_header_shape() {
        let svc = service(FakeClient::new(""), Arc::new(MemoryStorage::new()), SignatureMethod::HmacSha1);
        let uri = Url::parse("https://example.com/oauth/request_token").unwrap();
        let header = svc
            .authorization_header(Method::Post, &uri, vec![("oauth_callback".to_string(), "http://localhost/cb".to_string())], &[], None)
            .unwrap();

        assert!(header.starts_with("OAuth "));
        let params = header_params(&header);
        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "oauth_callback",
                "oauth_consumer_key",
                "oauth_nonce",
                "oauth_signature",
                "oauth_signature_method",
                "oauth_timestamp",
                "oauth_version",
            ]
        );
        assert!(header.contains("oauth_callback=\"http%3A%2F%2Flocalhost%2Fcb\""));
    }

    #[test]
    fn test_header_signature_verifies() {
        let svc = service(FakeClient::new(""), Arc::new(MemoryStorage::new()), SignatureMethod::HmacSha1);
        let uri = Url::parse("https://api.example.com/1.1/statuses/update.json").unwrap();
        let body = vec![("status".to_string(), "hello world".to_string())];
        let header = svc
            .authorization_header(Method::Post, &uri, vec![], &body, Some("token-secret"))
            .unwrap();

        let mut params = header_params(&header);
        let position = params.iter().position(|(k, _)| k == "oauth_signature").unwrap();
        let (_, received) = params.remove(position);
        params.extend(body);

        assert!(svc
            .signature()
            .verify("POST", &uri, &params, Some("token-secret"), &received)
            .unwrap());
    }

    #[tokio::test]
    async fn test_request_token_flow() {
        let client = FakeClient::new("oauth_token=rt&oauth_token_secret=rts&oauth_callback_confirmed=true");
        let storage = Arc::new(MemoryStorage::new());
        let svc = service(client.clone(), storage.clone(), SignatureMethod::HmacSha1);

        let token = svc.request_request_token().await.unwrap();
        assert_eq!(token.request_token.as_deref(), Some("rt"));
        assert_eq!(
            storage.retrieve_access_token("Example").await.unwrap().request_token_secret.as_deref(),
            Some("rts")
        );

        let request = client.last();
        assert_eq!(request.uri.as_str(), "https://example.com/oauth/request_token");
        assert!(request.header("Authorization").unwrap().contains("oauth_callback="));

        let uri = svc.authorization_uri(&[("oauth_token", "rt")]).unwrap();
        assert_eq!(uri.as_str(), "https://example.com/oauth/authenticate?oauth_token=rt");
    }

    #[tokio::test]
    async fn test_access_token_uses_stored_request_secret() {
        let client = FakeClient::new("oauth_token=at&oauth_token_secret=ats");
        let storage = Arc::new(MemoryStorage::new());
        let mut request_token = Token::new("rt");
        request_token.request_token_secret = Some("rts".to_string());
        storage.store_access_token("Example", request_token).await.unwrap();

        let svc = service(client.clone(), storage.clone(), SignatureMethod::Plaintext);
        let token = svc.request_access_token("rt", "verifier", None).await.unwrap();

        assert_eq!(token.access_token, "at");
        assert_eq!(storage.retrieve_access_token("Example").await.unwrap().access_token_secret.as_deref(), Some("ats"));

        let header = client.last().header("Authorization").unwrap().to_string();
        assert!(header.contains("oauth_signature=\"consumer-secret%26rts\""));
        assert!(header.contains("oauth_verifier=\"verifier\""));
    }

    #[tokio::test]
    async fn test_access_token_without_stored_secret_fails() {
        let svc = service(FakeClient::new(""), Arc::new(MemoryStorage::new()), SignatureMethod::HmacSha1);
        let result = svc.request_access_token("rt", "verifier", None).await;
        assert!(matches!(result, Err(Error::TokenNotFound(_))));
    }

    #[tokio::test]
    async fn test_request_signs_with_access_secret() {
        let client = FakeClient::new("[]");
        let storage = Arc::new(MemoryStorage::new());
        let mut token = Token::new("at");
        token.access_token_secret = Some("ats".to_string());
        storage.store_access_token("Example", token).await.unwrap();

        let svc = service(client.clone(), storage, SignatureMethod::Plaintext);
        let body = svc
            .request("statuses/home_timeline.json", Method::Get, RequestBody::Empty, vec![])
            .await
            .unwrap();
        assert_eq!(body, "[]");

        let request = client.last();
        assert_eq!(request.uri.as_str(), "https://api.example.com/1.1/statuses/home_timeline.json");
        let header = request.header("Authorization").unwrap();
        assert!(header.contains("oauth_token=\"at\""));
        assert!(header.contains("oauth_signature=\"consumer-secret%26ats\""));
    }
}
