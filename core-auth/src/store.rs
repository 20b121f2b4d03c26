//! Credential Persistence
//!
//! Persists the access token and its expiration timestamp in a
//! host-provided key-value store, under two separate keys. Because the
//! store offers no transactions, writes are ordered and rolled back so
//! that a reader never trusts a token without its expiration:
//!
//! - `save` writes the token first, then the expiration; if the second
//!   write fails the token is removed again.
//! - `load` treats a missing or unparsable half as a torn record and
//!   clears both keys before reporting no credential.
//!
//! ## Security
//!
//! Token values are never logged. Failed operations are reported without
//! exposing sensitive data.

use std::sync::Arc;

use bridge_traits::storage::KeyValueStore;
use tracing::{debug, info, warn};

use crate::error::{AuthError, Result};
use crate::types::Credential;

/// Storage key for the access token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the expiration timestamp, stored as milliseconds
/// since the Unix epoch in decimal string form.
pub const EXPIRATION_KEY: &str = "expirationDate";

/// Persists credentials in a host key-value store.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a credential.
    ///
    /// Writes the token, then the expiration. If the expiration write
    /// fails, the token is removed so the store never holds a token
    /// without its expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SecureStorageUnavailable`] if either write
    /// fails.
    pub async fn save(&self, credential: &Credential) -> Result<()> {
        self.store
            .set(TOKEN_KEY, &credential.access_token)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;

        let expiration = credential.expires_at_millis().to_string();
        if let Err(e) = self.store.set(EXPIRATION_KEY, &expiration).await {
            warn!(error = %e, "Expiration write failed, rolling back token");
            if let Err(rollback) = self.store.remove(TOKEN_KEY).await {
                warn!(error = %rollback, "Rollback of token write failed");
            }
            return Err(AuthError::SecureStorageUnavailable(e.to_string()));
        }

        info!(
            expires_at_ms = credential.expires_at_millis(),
            "Credential stored"
        );
        Ok(())
    }

    /// Load the persisted credential, if a complete one exists.
    ///
    /// A record with only one of the two keys, or with an expiration
    /// that does not parse, is torn: both keys are cleared and `None`
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SecureStorageUnavailable`] if the store
    /// cannot be read.
    pub async fn load(&self) -> Result<Option<Credential>> {
        let token = self
            .store
            .get(TOKEN_KEY)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;
        let expiration = self
            .store
            .get(EXPIRATION_KEY)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;

        let (token, expiration) = match (token, expiration) {
            (Some(token), Some(expiration)) => (token, expiration),
            (None, None) => return Ok(None),
            _ => {
                warn!("Torn credential record found, clearing");
                self.clear().await?;
                return Ok(None);
            }
        };

        let expires_at = expiration
            .parse::<i64>()
            .ok()
            .and_then(Credential::expiry_from_millis);

        match expires_at {
            Some(expires_at) => {
                debug!("Credential loaded");
                Ok(Some(Credential {
                    access_token: token,
                    expires_at,
                }))
            }
            None => {
                warn!("Unparsable expiration timestamp, clearing credential");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    /// Remove any persisted credential. Removing keys that are not
    /// present is not an error.
    pub async fn clear(&self) -> Result<()> {
        self.store
            .remove(TOKEN_KEY)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;
        self.store
            .remove(EXPIRATION_KEY)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;
        info!("Credential cleared");
        Ok(())
    }
}
