//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, key-value
//! storage, audio engine, consent prompt, clock) into the three core modules:
//! credential management, catalog access, and preview playback. Desktop shells
//! typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`); mobile hosts inject their platform bridges directly.
//!
//! The host owns the audio status loop: it drains whatever status source its
//! audio engine exposes and forwards each [`AudioStatus`] into
//! [`CoreService::playback`]'s `on_status`.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{
    audio::AudioEngine,
    auth::AuthorizationPrompt,
    http::HttpClient,
    storage::KeyValueStore,
    time::{Clock, SystemClock},
};
use core_auth::{AuthConfig, AuthManager};
use core_catalog::CatalogClient;
use core_playback::PlaybackController;
use core_runtime::events::{CoreEvent, EventBus, Receiver, DEFAULT_EVENT_BUFFER_SIZE};

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub key_value_store: Arc<dyn KeyValueStore>,
    pub audio_engine: Arc<dyn AudioEngine>,
    pub authorization_prompt: Arc<dyn AuthorizationPrompt>,
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CoreDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreDependencies").finish_non_exhaustive()
    }
}

impl CoreDependencies {
    /// Start building a dependency bundle.
    pub fn builder() -> CoreDependenciesBuilder {
        CoreDependenciesBuilder::default()
    }

    /// Desktop bundle: reqwest HTTP client, OS keyring storage, and the
    /// timer-driven simulated audio engine. Returns the engine's status
    /// receiver alongside the bundle; the host forwards those statuses
    /// into the playback controller.
    #[cfg(feature = "desktop-shims")]
    pub fn desktop(
        authorization_prompt: Arc<dyn AuthorizationPrompt>,
    ) -> (
        Self,
        tokio::sync::mpsc::UnboundedReceiver<bridge_traits::audio::AudioStatus>,
    ) {
        use bridge_desktop::{KeyringStore, ReqwestHttpClient, SimulatedAudioEngine};

        let (audio, status_rx) = SimulatedAudioEngine::with_defaults();
        let deps = Self {
            http_client: Arc::new(ReqwestHttpClient::new()),
            key_value_store: Arc::new(KeyringStore::new()),
            audio_engine: Arc::new(audio),
            authorization_prompt,
            clock: Arc::new(SystemClock),
        };
        (deps, status_rx)
    }
}

/// Builder that checks every required bridge up front.
///
/// `build` fails fast with [`CoreError::CapabilityMissing`] naming the
/// first absent bridge, so a mis-wired host crashes at startup rather
/// than at first use.
#[derive(Default)]
pub struct CoreDependenciesBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    audio_engine: Option<Arc<dyn AudioEngine>>,
    authorization_prompt: Option<Arc<dyn AuthorizationPrompt>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CoreDependenciesBuilder {
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    pub fn with_audio_engine(mut self, audio_engine: Arc<dyn AudioEngine>) -> Self {
        self.audio_engine = Some(audio_engine);
        self
    }

    pub fn with_authorization_prompt(mut self, prompt: Arc<dyn AuthorizationPrompt>) -> Self {
        self.authorization_prompt = Some(prompt);
        self
    }

    /// Override the time source. Defaults to [`SystemClock`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<CoreDependencies> {
        let http_client = self.http_client.ok_or_else(|| missing(
            "HttpClient",
            "HTTP access is required for authentication and catalog requests. \
             Inject a platform HTTP client (URLSession/OkHttp) or enable 'desktop-shims'.",
        ))?;
        let key_value_store = self.key_value_store.ok_or_else(|| missing(
            "KeyValueStore",
            "Durable storage is required for credential persistence. \
             Inject platform secure storage (Keychain/Keystore) or enable 'desktop-shims'.",
        ))?;
        let audio_engine = self.audio_engine.ok_or_else(|| missing(
            "AudioEngine",
            "An audio engine is required for preview playback. \
             Inject the platform player (AVPlayer/ExoPlayer) or enable 'desktop-shims'.",
        ))?;
        let authorization_prompt = self.authorization_prompt.ok_or_else(|| missing(
            "AuthorizationPrompt",
            "A consent surface is required for interactive sign-in. \
             Inject an in-app or system browser prompt.",
        ))?;

        Ok(CoreDependencies {
            http_client,
            key_value_store,
            audio_engine,
            authorization_prompt,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

fn missing(capability: &str, message: &str) -> CoreError {
    CoreError::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    event_bus: EventBus,
    auth: Arc<AuthManager>,
    catalog: Arc<CatalogClient>,
    playback: Arc<PlaybackController>,
}

impl CoreService {
    /// Create a new service from an auth configuration and a validated
    /// dependency bundle.
    pub fn new(auth_config: AuthConfig, deps: CoreDependencies) -> Self {
        let event_bus = EventBus::new(DEFAULT_EVENT_BUFFER_SIZE);

        let auth = Arc::new(AuthManager::new(
            auth_config,
            deps.http_client.clone(),
            deps.key_value_store.clone(),
            deps.authorization_prompt.clone(),
            deps.clock.clone(),
            event_bus.clone(),
        ));

        let catalog = Arc::new(CatalogClient::new(deps.http_client.clone(), auth.clone()));

        let playback = Arc::new(PlaybackController::new(
            deps.audio_engine.clone(),
            event_bus.clone(),
        ));

        Self {
            event_bus,
            auth,
            catalog,
            playback,
        }
    }

    /// Credential manager.
    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// Catalog client for profile, library, and browse requests.
    pub fn catalog(&self) -> &Arc<CatalogClient> {
        &self.catalog
    }

    /// Preview playback controller.
    pub fn playback(&self) -> &Arc<PlaybackController> {
        &self.playback
    }

    /// The shared event bus.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribe to core events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::audio::ResourceId;
    use bridge_traits::auth::AuthorizationOutcome;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpRequest, HttpResponse};
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StubHttp;

    #[async_trait]
    impl HttpClient for StubHttp {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from_static(b"{}"),
            })
        }
    }

    struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn set(&self, key: &str, value: &str) -> BridgeResult<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get(&self, key: &str) -> BridgeResult<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn remove(&self, key: &str) -> BridgeResult<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(self.entries.lock().unwrap().keys().cloned().collect())
        }

        async fn clear_all(&self) -> BridgeResult<()> {
            self.entries.lock().unwrap().clear();
            Ok(())
        }
    }

    struct StubAudio;

    #[async_trait]
    impl AudioEngine for StubAudio {
        async fn load(&self, _url: &str) -> BridgeResult<ResourceId> {
            Ok(ResourceId::new())
        }

        async fn pause(&self, _resource: ResourceId) -> BridgeResult<()> {
            Ok(())
        }

        async fn resume(&self, _resource: ResourceId) -> BridgeResult<()> {
            Ok(())
        }

        async fn release(&self, _resource: ResourceId) -> BridgeResult<()> {
            Ok(())
        }
    }

    struct CancellingPrompt;

    #[async_trait]
    impl AuthorizationPrompt for CancellingPrompt {
        async fn request_authorization(
            &self,
            _consent_url: &str,
        ) -> BridgeResult<AuthorizationOutcome> {
            Ok(AuthorizationOutcome::Cancelled)
        }
    }

    fn full_builder() -> CoreDependenciesBuilder {
        CoreDependencies::builder()
            .with_http_client(Arc::new(StubHttp))
            .with_key_value_store(Arc::new(MemoryStore::new()))
            .with_audio_engine(Arc::new(StubAudio))
            .with_authorization_prompt(Arc::new(CancellingPrompt))
    }

    #[test]
    fn build_succeeds_with_all_bridges() {
        let deps = full_builder().build().unwrap();
        // Clock defaults to the system clock
        let _ = deps.clock.now();
    }

    #[test]
    fn build_fails_fast_naming_the_missing_bridge() {
        let err = CoreDependencies::builder()
            .with_http_client(Arc::new(StubHttp))
            .build()
            .unwrap_err();

        match err {
            CoreError::CapabilityMissing { capability, .. } => {
                assert_eq!(capability, "KeyValueStore");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn build_requires_audio_engine() {
        let err = CoreDependencies::builder()
            .with_http_client(Arc::new(StubHttp))
            .with_key_value_store(Arc::new(MemoryStore::new()))
            .with_authorization_prompt(Arc::new(CancellingPrompt))
            .build()
            .unwrap_err();

        match err {
            CoreError::CapabilityMissing { capability, .. } => {
                assert_eq!(capability, "AudioEngine");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn service_wires_modules_onto_one_event_bus() {
        let deps = full_builder().build().unwrap();
        let service = CoreService::new(
            AuthConfig::new("client-id", "client-secret", "myapp://callback"),
            deps,
        );

        let mut rx = service.subscribe();

        // A cancelled sign-in is not an error and reports through the bus.
        let outcome = service.auth().authorize().await.unwrap();
        assert!(outcome.is_none());

        let mut saw_cancelled = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(
                event,
                CoreEvent::Auth(core_runtime::events::AuthEvent::SignInCancelled)
            ) {
                saw_cancelled = true;
            }
        }
        assert!(saw_cancelled);

        // Playback shares the same bus.
        let mut rx = service.subscribe();
        service
            .playback()
            .load_queue_and_play(vec![], 0)
            .await
            .unwrap();
        assert!(rx.try_recv().is_err());
    }
}
