//! Durable Key-Value Storage Abstraction
//!
//! Provides a platform-agnostic trait for the small string-keyed store the
//! core uses to persist credentials and lightweight preferences.

use async_trait::async_trait;

use crate::error::Result;

/// Durable string-keyed storage trait
///
/// Abstracts platform storage mechanisms:
/// - macOS/iOS: Keychain
/// - Android: Keystore / EncryptedSharedPreferences
/// - Windows: DPAPI
/// - Linux: Secret Service / libsecret
///
/// # Security Requirements
///
/// Credential values pass through this store. Implementations MUST:
/// - Encrypt data at rest where the platform supports it
/// - Never log or expose stored values
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// async fn store_token(store: &dyn KeyValueStore, token: &str) -> Result<()> {
///     store.set("token", token).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store a value under a key, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove a key
    ///
    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key exists without retrieving its value
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// List all stored keys (without values)
    ///
    /// Useful for debugging or migration scenarios.
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Remove every stored key
    ///
    /// Use with caution! This will delete all stored values.
    async fn clear_all(&self) -> Result<()>;
}
