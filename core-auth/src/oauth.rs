//! OAuth 2.0 Authorization Code Flow
//!
//! Implements the subset of RFC 6749 the streaming catalog's accounts
//! service supports: the authorization code grant with HTTP Basic client
//! authentication at the token endpoint.
//!
//! # Overview
//!
//! The flow handles:
//! - Building the consent URL the host opens for the user
//! - Exchanging an authorization code for an access token
//!
//! There is no PKCE and no `state` parameter: the accounts service does
//! not accept them for this client type, and the host delivers the
//! callback directly to the app rather than through a browser redirect
//! an attacker could inject into.
//!
//! # Security
//!
//! Authorization codes and tokens are never logged.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bridge_traits::time::Clock;
use serde::Deserialize;
use tracing::{instrument, warn};
use url::Url;

use crate::error::{AuthError, Result};
use crate::types::Credential;

/// Default authorization endpoint of the accounts service.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Default token endpoint of the accounts service.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Scopes requested by default. These cover the profile, library, and
/// playlist reads the catalog client performs.
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-read-email",
    "user-library-read",
    "user-read-recently-played",
    "user-top-read",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-public",
];

/// OAuth 2.0 client configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret, used for HTTP Basic authentication at the
    /// token endpoint
    pub client_secret: String,
    /// Redirect URI registered for this client
    pub redirect_uri: String,
    /// List of OAuth scopes to request
    pub scopes: Vec<String>,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
}

impl AuthConfig {
    /// Create a configuration with the default endpoints and scopes.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

/// OAuth 2.0 authorization code flow.
///
/// Stateless between calls: `authorize_url()` builds the consent URL and
/// `exchange_code()` turns the resulting code into a [`Credential`].
pub struct AuthCodeFlow {
    config: AuthConfig,
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
}

impl AuthCodeFlow {
    pub fn new(
        config: AuthConfig,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            http_client,
            clock,
        }
    }

    /// Build the consent URL the user should visit to authorize the
    /// application.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEndpoint`] if the configured
    /// authorization URL cannot be parsed.
    pub fn authorize_url(&self) -> Result<String> {
        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| AuthError::InvalidEndpoint(format!("{}: {}", self.config.auth_url, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("response_type", "code");
            query.append_pair("redirect_uri", &self.config.redirect_uri);
            query.append_pair("scope", &self.config.scopes.join(" "));
        }

        tracing::debug!("Built consent URL");

        Ok(url.to_string())
    }

    /// Exchange an authorization code for a credential.
    ///
    /// Sends a form-encoded POST to the token endpoint with HTTP Basic
    /// client authentication. The returned credential's expiration is
    /// anchored at this flow's clock.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be sent
    /// - The token endpoint returns a non-2xx status
    /// - The response body is missing the token or lifetime
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<Credential> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        let encoded_body = serde_urlencoded::to_string(params)
            .map_err(|e| AuthError::MalformedTokenResponse(format!("request encoding: {}", e)))?;

        let basic = BASE64_STANDARD.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        ));

        tracing::debug!("Exchanging authorization code for token");

        let request = HttpRequest::new(HttpMethod::Post, self.config.token_url.clone())
            .header("Authorization", format!("Basic {}", basic))
            .form_body(encoded_body);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(
                status = status,
                error = %error_body,
                "Token exchange failed"
            );

            return Err(AuthError::ExchangeFailed {
                status,
                message: error_body,
            });
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::MalformedTokenResponse(e.to_string()))?;

        tracing::info!(
            expires_in = token_response.expires_in,
            "Exchanged authorization code for token"
        );

        Ok(Credential::with_lifetime(
            token_response.access_token,
            self.clock.now(),
            token_response.expires_in,
        ))
    }
}

/// Token response from the accounts service.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    scope: Option<String>,
}
