//! Generic OAuth2 authorization-code service.

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::{parse_token_response, OAuth2Provider, OAuth2Service};
use crate::descriptor::OAuth2Context;
use crate::service::{resolve_uri, Service};
use oauthkit_common::{Credentials, Error, ProtocolVersion, Result};
use oauthkit_http::{HttpClient, HttpRequest, Method, RequestBody};
use oauthkit_storage::{Token, TokenStorage};

/// OAuth2 service driven by an [`OAuth2Provider`] declaration.
pub struct GenericOAuth2Service {
    provider: OAuth2Provider,
    credentials: Arc<Credentials>,
    http_client: Arc<dyn HttpClient>,
    storage: Arc<dyn TokenStorage>,
    scopes: Vec<String>,
}

impl GenericOAuth2Service {
    /// Create a service from a provider declaration and its collaborators.
    pub fn new(provider: OAuth2Provider, context: OAuth2Context) -> Self {
        Self {
            provider,
            credentials: context.credentials,
            http_client: context.http_client,
            storage: context.storage,
            scopes: context.scopes,
        }
    }

    /// Provider declaration this service was built from.
    pub fn provider(&self) -> &OAuth2Provider {
        &self.provider
    }

    /// POST to the token endpoint, parse the answer and store the token.
    async fn request_token(&self, params: Vec<(&str, &str)>) -> Result<Token> {
        let request = HttpRequest::new(Method::Post, self.provider.access_token_endpoint.clone())
            .with_headers(self.provider.token_request_headers.clone())
            .with_body(RequestBody::form(params));

        let response = self.http_client.retrieve_response(request).await?;
        let token = parse_token_response(&response).map_err(|e| {
            warn!(service = %self.provider.name, "Token endpoint rejected request: {}", e);
            e
        })?;

        self.storage
            .store_access_token(&self.provider.name, token.clone())
            .await?;
        Ok(token)
    }
}

#[async_trait]
impl Service for GenericOAuth2Service {
    fn service_name(&self) -> &str {
        &self.provider.name
    }

    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::OAuth2
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
                "Token for {} expired; refresh it first",
                self.provider.name
            )));
        }

        let mut uri = resolve_uri(self.base_api_uri(), path)?;
        let auth_header = self
            .provider
            .authorization_method
            .apply(&mut uri, &token.access_token);

        debug!(service = %self.provider.name, %method, %uri, "Sending authorized request");

        let request = HttpRequest::new(method, uri)
            .with_headers(extra_headers)
            .with_headers(auth_header)
            .with_body(body);

        self.http_client.retrieve_response(request).await
    }
}

#[async_trait]
impl OAuth2Service for GenericOAuth2Service {
    fn scopes(&self) -> &[String] {
        &self.scopes
    }

    fn is_valid_scope(&self, scope: &str) -> bool {
        self.provider.scopes.contains_value(scope)
    }

    async fn authorization_uri(&self, extra_params: &[(&str, &str)]) -> Result<Url> {
        let redirect = RedirectUrl::new(self.credentials.callback_url().to_string())
            .map_err(|e| Error::InvalidInput(format!("Invalid callback URL: {}", e)))?;

        let state = if self.provider.state_required {
            let state = Uuid::new_v4().to_string();
            self.storage
                .store_authorization_state(&self.provider.name, &state)
                .await?;
            CsrfToken::new(state)
        } else {
            CsrfToken::new_random()
        };

        let client = BasicClient::new(ClientId::new(self.credentials.consumer_id().to_string()))
            .set_auth_uri(AuthUrl::from_url(self.provider.authorization_endpoint.clone()))
            .set_redirect_uri(redirect);

        let mut request = client
            .authorize_url(move || state)
            .add_scopes(
                self.scopes
                    .iter()
                    .filter(|scope| !scope.is_empty())
                    .map(|scope| Scope::new(scope.clone())),
            );
        for (name, value) in extra_params {
            request = request.add_extra_param(name.to_string(), value.to_string());
        }

        let (url, _) = request.url();
        Ok(url)
    }

    async fn request_access_token(&self, code: &str, state: Option<&str>) -> Result<Token> {
        let name = &self.provider.name;

        if self.provider.state_required {
            let expected = self.storage.retrieve_authorization_state(name).await?;
            if state != Some(expected.as_str()) {
                warn!(service = %name, "Authorization state mismatch");
                return Err(Error::InvalidAuthorizationState(format!(
                    "State returned to {} does not match the stored state",
                    name
                )));
            }
            self.storage.clear_authorization_state(name).await?;
        }

        let token = self
            .request_token(vec![
                ("code", code),
                ("client_id", self.credentials.consumer_id()),
                ("client_secret", self.credentials.consumer_secret().expose()),
                ("redirect_uri", self.credentials.callback_url()),
                ("grant_type", "authorization_code"),
            ])
            .await?;

        info!(service = %name, "Access token obtained");
        Ok(token)
    }

    async fn refresh_access_token(&self, token: &Token) -> Result<Token> {
        let name = &self.provider.name;
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::MissingRefreshToken(format!("Token for {} has none", name)))?;

        let mut refreshed = self
            .request_token(vec![
                ("grant_type", "refresh_token"),
                ("type", "web_server"),
                ("client_id", self.credentials.consumer_id()),
                ("client_secret", self.credentials.consumer_secret().expose()),
                ("refresh_token", refresh_token),
            ])
            .await?;

        // Refresh tokens may or may not be returned in refresh response
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token.to_string());
            self.storage.store_access_token(name, refreshed.clone()).await?;
        }

        info!(service = %name, "Access token refreshed");
        Ok(refreshed)
    }
}
