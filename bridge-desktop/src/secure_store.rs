//! Credential Storage using the OS Keychain

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::KeyValueStore,
};
use keyring::Entry;
use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::debug;

/// Keyring-based key-value store
///
/// Uses platform-specific secure storage:
/// - macOS: Keychain
/// - Windows: Credential Manager (DPAPI)
/// - Linux: Secret Service (libsecret)
///
/// The keyring cannot enumerate its entries, so `list_keys` and
/// `clear_all` operate over an index of the keys written through this
/// instance. Entries written by earlier runs stay readable via `get`.
pub struct KeyringStore {
    service_name: String,
    known_keys: Mutex<BTreeSet<String>>,
}

impl KeyringStore {
    /// Create a new store with the default service name
    pub fn new() -> Self {
        Self::with_service_name("preview-player-core")
    }

    /// Create a new store with a custom service name
    pub fn with_service_name(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            known_keys: Mutex::new(BTreeSet::new()),
        }
    }

    fn entry(&self, key: &str) -> std::result::Result<Entry, keyring::Error> {
        Entry::new(&self.service_name, key)
    }

    fn map_keyring_error(e: keyring::Error) -> BridgeError {
        BridgeError::OperationFailed(format!("Keyring error: {}", e))
    }

    fn remember(&self, key: &str) {
        if let Ok(mut keys) = self.known_keys.lock() {
            keys.insert(key.to_string());
        }
    }

    fn forget(&self, key: &str) {
        if let Ok(mut keys) = self.known_keys.lock() {
            keys.remove(key);
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for KeyringStore {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = self.entry(key).map_err(Self::map_keyring_error)?;
        entry.set_password(value).map_err(Self::map_keyring_error)?;

        self.remember(key);
        debug!(key = key, "Stored value in keyring");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = self.entry(key).map_err(Self::map_keyring_error)?;

        match entry.get_password() {
            Ok(value) => {
                self.remember(key);
                debug!(key = key, "Retrieved value from keyring");
                Ok(Some(value))
            }
            Err(keyring::Error::NoEntry) => {
                debug!(key = key, "Key not found in keyring");
                Ok(None)
            }
            Err(e) => Err(Self::map_keyring_error(e)),
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let entry = self.entry(key).map_err(Self::map_keyring_error)?;

        match entry.delete_credential() {
            Ok(_) => {
                self.forget(key);
                debug!(key = key, "Deleted key from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                self.forget(key);
                debug!(key = key, "Key not found (already deleted)");
                Ok(())
            }
            Err(e) => Err(Self::map_keyring_error(e)),
        }
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let keys = self
            .known_keys
            .lock()
            .map_err(|_| BridgeError::OperationFailed("key index lock poisoned".to_string()))?;
        Ok(keys.iter().cloned().collect())
    }

    async fn clear_all(&self) -> Result<()> {
        let keys = self.list_keys().await?;
        for key in keys {
            self.remove(&key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_creation() {
        let store = KeyringStore::new();
        assert_eq!(store.service_name, "preview-player-core");
    }

    #[tokio::test]
    async fn test_custom_service_name() {
        let store = KeyringStore::with_service_name("test-service");
        assert_eq!(store.service_name, "test-service");
    }

    #[tokio::test]
    async fn test_round_trip_when_keyring_available() {
        // Keyring may be absent on headless systems and CI. The test
        // exercises the store only when the platform backend works.
        let store = KeyringStore::with_service_name("preview-player-core-test");
        let key = "round-trip-key";

        let _ = store.remove(key).await;

        match store.set(key, "value-1").await {
            Ok(_) => {
                assert_eq!(store.get(key).await.unwrap().as_deref(), Some("value-1"));
                assert!(store.list_keys().await.unwrap().contains(&key.to_string()));

                store.remove(key).await.unwrap();
                assert!(store.get(key).await.unwrap().is_none());
                // Removing again is fine
                store.remove(key).await.unwrap();
            }
            Err(e) => {
                println!("Keyring not available ({}), skipping test", e);
            }
        }
    }
}
