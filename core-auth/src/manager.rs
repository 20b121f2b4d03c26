//! # Authentication Manager
//!
//! Orchestrates the interactive authorization flow and credential
//! lifecycle, emitting auth events to the application's event bus.
//!
//! ## Overview
//!
//! The `AuthManager` owns the pieces of the credential lifecycle:
//! the OAuth code flow, the persisted credential store, the host's
//! consent surface, and a clock for expiry decisions. Expired or torn
//! credentials are invalidated lazily, on the read that discovers them.
//!
//! ## Usage
//!
//! ```ignore
//! use core_auth::{AuthConfig, AuthManager};
//!
//! let manager = AuthManager::new(config, http_client, store, prompt, clock, event_bus);
//!
//! match manager.authorize().await? {
//!     Some(credential) => println!("signed in until {}", credential.expires_at),
//!     None => println!("user cancelled"),
//! }
//! ```

use std::sync::Arc;

use bridge_traits::auth::{AuthorizationOutcome, AuthorizationPrompt};
use bridge_traits::http::HttpClient;
use bridge_traits::storage::KeyValueStore;
use bridge_traits::time::Clock;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{AuthError, Result};
use crate::oauth::{AuthCodeFlow, AuthConfig};
use crate::store::CredentialStore;
use crate::types::Credential;

/// In-memory view of the persisted credential.
///
/// `loaded` distinguishes "not yet read from the store" from "read and
/// found empty", so the store is only hit once per process unless the
/// credential changes.
#[derive(Debug, Default)]
struct SessionState {
    loaded: bool,
    credential: Option<Credential>,
}

/// Credential lifecycle orchestrator.
///
/// Credential state lives behind a session lock that is only held for
/// short, non-interactive critical sections. Interactive authorization
/// is serialized by a separate flow lock, so a user parked on the
/// consent page never blocks credential reads.
pub struct AuthManager {
    flow: AuthCodeFlow,
    store: CredentialStore,
    prompt: Arc<dyn AuthorizationPrompt>,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
    /// Held for the duration of one interactive authorization.
    authorizing: Mutex<()>,
    session: Mutex<SessionState>,
}

impl AuthManager {
    pub fn new(
        config: AuthConfig,
        http_client: Arc<dyn HttpClient>,
        store: Arc<dyn KeyValueStore>,
        prompt: Arc<dyn AuthorizationPrompt>,
        clock: Arc<dyn Clock>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            flow: AuthCodeFlow::new(config, http_client, clock.clone()),
            store: CredentialStore::new(store),
            prompt,
            clock,
            event_bus,
            authorizing: Mutex::new(()),
            session: Mutex::new(SessionState::default()),
        }
    }

    /// Run the full interactive authorization flow.
    ///
    /// Emits `SigningIn`, presents the host's consent surface, exchanges
    /// the resulting code, and persists the credential. Returns `None`
    /// when the user dismisses the consent surface without deciding;
    /// cancellation is an ordinary outcome, not an error.
    ///
    /// At most one authorization runs at a time. A second caller blocks
    /// until the first finishes and then sees its result in the session.
    /// Credential reads stay responsive for the whole consent wait; only
    /// the state update at the end touches the session lock.
    ///
    /// # Errors
    ///
    /// - [`AuthError::PromptFailed`] - the consent surface could not be shown
    /// - [`AuthError::AuthorizationDenied`] - the service refused the request
    /// - [`AuthError::ExchangeFailed`] - the token endpoint rejected the code
    /// - [`AuthError::SecureStorageUnavailable`] - the credential could not be persisted
    #[instrument(skip(self))]
    pub async fn authorize(&self) -> Result<Option<Credential>> {
        let _flow = self.authorizing.lock().await;

        info!("Starting interactive authorization");
        let _ = self
            .event_bus
            .emit(CoreEvent::Auth(AuthEvent::SigningIn));

        let consent_url = self.flow.authorize_url()?;

        let outcome = self
            .prompt
            .request_authorization(&consent_url)
            .await
            .map_err(|e| {
                error!(error = %e, "Consent surface failed");
                let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::AuthError {
                    message: format!("Consent surface failed: {}", e),
                    recoverable: true,
                }));
                AuthError::PromptFailed(e.to_string())
            })?;

        let code = match outcome {
            AuthorizationOutcome::Granted { code } => code,
            AuthorizationOutcome::Cancelled => {
                info!("Authorization cancelled by user");
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Auth(AuthEvent::SignInCancelled));
                return Ok(None);
            }
            AuthorizationOutcome::Denied { reason } => {
                warn!(reason = %reason, "Authorization denied");
                let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::AuthError {
                    message: format!("Authorization denied: {}", reason),
                    recoverable: false,
                }));
                return Err(AuthError::AuthorizationDenied(reason));
            }
        };

        let credential = self.complete_exchange(&code).await?;
        Ok(Some(credential))
    }

    /// Build the consent URL for hosts that drive the browser handoff
    /// themselves. Pair with [`exchange_code_for_token`] once the
    /// callback delivers a code.
    ///
    /// [`exchange_code_for_token`]: AuthManager::exchange_code_for_token
    pub fn begin_authorization(&self) -> Result<String> {
        let url = self.flow.authorize_url()?;
        let _ = self
            .event_bus
            .emit(CoreEvent::Auth(AuthEvent::SigningIn));
        Ok(url)
    }

    /// Exchange an authorization code obtained out of band and persist
    /// the resulting credential.
    #[instrument(skip(self, code))]
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<Credential> {
        let _flow = self.authorizing.lock().await;
        self.complete_exchange(code).await
    }

    async fn complete_exchange(&self, code: &str) -> Result<Credential> {
        let credential = match self.flow.exchange_code(code).await {
            Ok(credential) => credential,
            Err(e) => {
                error!(error = %e, "Token exchange failed");
                let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::AuthError {
                    message: format!("Token exchange failed: {}", e),
                    recoverable: true,
                }));
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&credential).await {
            error!(error = %e, "Failed to persist credential");
            let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::AuthError {
                message: format!("Failed to persist credential: {}", e),
                recoverable: false,
            }));
            return Err(e);
        }

        {
            let mut session = self.session.lock().await;
            session.loaded = true;
            session.credential = Some(credential.clone());
        }

        let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::SignedIn {
            expires_at_ms: credential.expires_at_millis(),
        }));

        info!("Authorization completed");
        Ok(credential)
    }

    /// Whether a non-expired credential is available.
    pub async fn has_valid_credential(&self) -> Result<bool> {
        Ok(self.current_credential().await?.is_some())
    }

    /// The current access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] if there is no credential
    /// or the stored one has expired.
    pub async fn current_token(&self) -> Result<String> {
        self.current_credential()
            .await?
            .map(|c| c.access_token)
            .ok_or(AuthError::NotAuthenticated)
    }

    /// The current credential, if a valid one exists.
    ///
    /// Loads from the store on first access. An expired credential is
    /// removed here, on the read that discovers it, and
    /// `CredentialExpired` is emitted.
    pub async fn current_credential(&self) -> Result<Option<Credential>> {
        let mut session = self.session.lock().await;

        if !session.loaded {
            session.credential = self.store.load().await?;
            session.loaded = true;
        }

        let expired = match &session.credential {
            Some(credential) => credential.is_expired_at(self.clock.now()),
            None => return Ok(None),
        };

        if expired {
            info!("Stored credential expired, invalidating");
            session.credential = None;
            self.store.clear().await?;
            let _ = self
                .event_bus
                .emit(CoreEvent::Auth(AuthEvent::CredentialExpired));
            return Ok(None);
        }

        debug!("Valid credential available");
        Ok(session.credential.clone())
    }

    /// Remove the stored credential and end the session.
    ///
    /// Signing out while not signed in is not an error.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<()> {
        let mut session = self.session.lock().await;

        self.store.clear().await?;
        session.loaded = true;
        session.credential = None;

        let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::SignedOut));

        info!("Signed out");
        Ok(())
    }
}
