//! Catalog REST API client
//!
//! Issues authenticated requests against the catalog API using the
//! host's `HttpClient` and the credential manager's bearer token.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_auth::AuthManager;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{CatalogError, Result};
use crate::models::{
    AlbumTrack, Artist, Paging, PlayHistoryItem, Playlist, SavedTrack, UserProfile,
};

/// Catalog API base URL
const API_BASE: &str = "https://api.spotify.com/v1";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Envelope for endpoints that return `{ "items": [...] }` without
/// offset paging fields.
#[derive(Debug, Deserialize)]
struct ItemsEnvelope<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Typed catalog API client.
///
/// Every call fetches the current bearer token from the credential
/// manager, so lazy invalidation of an expired credential happens on
/// the first catalog call that needs it.
///
/// # Example
///
/// ```ignore
/// use core_catalog::CatalogClient;
///
/// let client = CatalogClient::new(http_client, auth);
/// let profile = client.me().await?;
/// let liked = client.saved_tracks(0, 50).await?;
/// ```
pub struct CatalogClient {
    http_client: Arc<dyn HttpClient>,
    auth: Arc<AuthManager>,
    base_url: String,
}

impl CatalogClient {
    pub fn new(http_client: Arc<dyn HttpClient>, auth: Arc<AuthManager>) -> Self {
        Self {
            http_client,
            auth,
            base_url: API_BASE.to_string(),
        }
    }

    /// Override the API base URL. Intended for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the signed-in user's profile.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile> {
        self.get_json("/me".to_string()).await
    }

    /// Fetch a page of the user's saved tracks.
    #[instrument(skip(self))]
    pub async fn saved_tracks(&self, offset: u32, limit: u32) -> Result<Paging<SavedTrack>> {
        let page: Paging<SavedTrack> = self
            .get_json(format!("/me/tracks?offset={}&limit={}", offset, limit))
            .await?;
        info!(count = page.items.len(), "Fetched saved tracks");
        Ok(page)
    }

    /// Fetch the user's top artists.
    #[instrument(skip(self))]
    pub async fn top_artists(&self) -> Result<Vec<Artist>> {
        let envelope: ItemsEnvelope<Artist> = self.get_json("/me/top/artists".to_string()).await?;
        Ok(envelope.items)
    }

    /// Fetch the most recently played tracks.
    #[instrument(skip(self))]
    pub async fn recently_played(&self, limit: u32) -> Result<Vec<PlayHistoryItem>> {
        let envelope: ItemsEnvelope<PlayHistoryItem> = self
            .get_json(format!("/me/player/recently-played?limit={}", limit))
            .await?;
        Ok(envelope.items)
    }

    /// Fetch the tracks of an album.
    #[instrument(skip(self), fields(album_id = %album_id))]
    pub async fn album_tracks(&self, album_id: &str) -> Result<Vec<AlbumTrack>> {
        let envelope: ItemsEnvelope<AlbumTrack> = self
            .get_json(format!("/albums/{}/tracks", urlencoding::encode(album_id)))
            .await?;
        Ok(envelope.items)
    }

    /// Fetch the user's playlists.
    #[instrument(skip(self))]
    pub async fn playlists(&self) -> Result<Vec<Playlist>> {
        let envelope: ItemsEnvelope<Playlist> = self.get_json("/me/playlists".to_string()).await?;
        Ok(envelope.items)
    }

    /// Issue an authenticated GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path_and_query: String) -> Result<T> {
        let token = self.auth.current_token().await?;
        let url = format!("{}{}", self.base_url, path_and_query);

        let request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(token)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let message = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!(status = status, path = %path_and_query, "Catalog request failed");
            return Err(CatalogError::RequestFailed { status, message });
        }

        debug!(path = %path_and_query, "Catalog request succeeded");
        response
            .json()
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::auth::{AuthorizationOutcome, AuthorizationPrompt};
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::HttpResponse;
    use bridge_traits::storage::KeyValueStore;
    use bridge_traits::time::SystemClock;
    use bytes::Bytes;
    use core_auth::AuthConfig;
    use core_runtime::events::EventBus;
    use mockall::mock;
    use std::collections::HashMap;
    use std::sync::Mutex;

    mock! {
        Http {}

        #[async_trait::async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        data: Mutex<HashMap<String, String>>,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for MemoryStore {
        async fn set(&self, key: &str, value: &str) -> BridgeResult<()> {
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get(&self, key: &str) -> BridgeResult<Option<String>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        async fn remove(&self, key: &str) -> BridgeResult<()> {
            self.data.lock().unwrap().remove(key);
            Ok(())
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(self.data.lock().unwrap().keys().cloned().collect())
        }

        async fn clear_all(&self) -> BridgeResult<()> {
            self.data.lock().unwrap().clear();
            Ok(())
        }
    }

    struct UnusedPrompt;

    #[async_trait::async_trait]
    impl AuthorizationPrompt for UnusedPrompt {
        async fn request_authorization(
            &self,
            _consent_url: &str,
        ) -> BridgeResult<AuthorizationOutcome> {
            Ok(AuthorizationOutcome::Cancelled)
        }
    }

    /// Auth manager over a store preloaded with a far-future credential.
    async fn signed_in_auth() -> Arc<AuthManager> {
        let store = Arc::new(MemoryStore::default());
        let far_future = chrono::Utc::now() + chrono::Duration::days(365);
        store.set("token", "bearer-token").await.unwrap();
        store
            .set("expirationDate", &far_future.timestamp_millis().to_string())
            .await
            .unwrap();

        Arc::new(AuthManager::new(
            AuthConfig::new("id", "secret", "myapp://callback"),
            Arc::new(MockHttp::new()),
            store,
            Arc::new(UnusedPrompt),
            Arc::new(SystemClock),
            EventBus::new(16),
        ))
    }

    fn signed_out_auth() -> Arc<AuthManager> {
        Arc::new(AuthManager::new(
            AuthConfig::new("id", "secret", "myapp://callback"),
            Arc::new(MockHttp::new()),
            Arc::new(MemoryStore::default()),
            Arc::new(UnusedPrompt),
            Arc::new(SystemClock),
            EventBus::new(16),
        ))
    }

    fn json_response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn test_me_sends_bearer_token() {
        let mut http = MockHttp::new();
        http.expect_execute().times(1).returning(|request| {
            assert!(request.url.ends_with("/me"));
            assert_eq!(
                request.headers.get("Authorization"),
                Some(&"Bearer bearer-token".to_string())
            );
            Ok(json_response(
                200,
                r#"{"id":"user1","display_name":"Jess","email":"jess@example.com"}"#,
            ))
        });

        let client = CatalogClient::new(Arc::new(http), signed_in_auth().await);
        let profile = client.me().await.unwrap();

        assert_eq!(profile.id, "user1");
        assert_eq!(profile.display_name.as_deref(), Some("Jess"));
    }

    #[tokio::test]
    async fn test_saved_tracks_paging() {
        let mut http = MockHttp::new();
        http.expect_execute().times(1).returning(|request| {
            assert!(request.url.contains("/me/tracks?offset=0&limit=50"));
            Ok(json_response(
                200,
                r#"{
                    "items": [
                        {"track": {"id": "t1", "name": "One", "album": {"id": "al1"},
                                   "preview_url": "https://p/1.mp3"}},
                        {"track": {"id": "t2", "name": "Two", "album": {"id": "al2"}}}
                    ],
                    "total": 2, "limit": 50, "offset": 0
                }"#,
            ))
        });

        let client = CatalogClient::new(Arc::new(http), signed_in_auth().await);
        let page = client.saved_tracks(0, 50).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].track.preview_url.is_some());
        assert!(page.items[1].track.preview_url.is_none());
    }

    #[tokio::test]
    async fn test_recently_played_limit_in_query() {
        let mut http = MockHttp::new();
        http.expect_execute().times(1).returning(|request| {
            assert!(request.url.contains("/me/player/recently-played?limit=4"));
            Ok(json_response(
                200,
                r#"{"items": [{"track": {"id": "t1", "name": "Last", "album": {"id": "al"}}}]}"#,
            ))
        });

        let client = CatalogClient::new(Arc::new(http), signed_in_auth().await);
        let items = client.recently_played(4).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].track.name, "Last");
    }

    #[tokio::test]
    async fn test_top_artists() {
        let mut http = MockHttp::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                200,
                r#"{"items": [{"id": "a1", "name": "Artist", "images": []}]}"#,
            ))
        });

        let client = CatalogClient::new(Arc::new(http), signed_in_auth().await);
        let artists = client.top_artists().await.unwrap();
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].name, "Artist");
    }

    #[tokio::test]
    async fn test_album_tracks_encodes_id() {
        let mut http = MockHttp::new();
        http.expect_execute().times(1).returning(|request| {
            assert!(request.url.ends_with("/albums/al%201/tracks"));
            Ok(json_response(200, r#"{"items": []}"#))
        });

        let client = CatalogClient::new(Arc::new(http), signed_in_auth().await);
        let tracks = client.album_tracks("al 1").await.unwrap();
        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_playlists_with_followers() {
        let mut http = MockHttp::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                200,
                r#"{"items": [{"id": "pl", "name": "Mix", "followers": {"total": 7}}]}"#,
            ))
        });

        let client = CatalogClient::new(Arc::new(http), signed_in_auth().await);
        let playlists = client.playlists().await.unwrap();
        assert_eq!(playlists[0].followers.map(|f| f.total), Some(7));
    }

    #[tokio::test]
    async fn test_not_authenticated() {
        let http = MockHttp::new();
        let client = CatalogClient::new(Arc::new(http), signed_out_auth());

        let err = client.me().await.unwrap_err();
        assert!(matches!(err, CatalogError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_request_failed_status() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(429, "rate limited")));

        let client = CatalogClient::new(Arc::new(http), signed_in_auth().await);
        let err = client.me().await.unwrap_err();
        match err {
            CatalogError::RequestFailed { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "rate limited");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_decode_failure() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(200, "not json")));

        let client = CatalogClient::new(Arc::new(http), signed_in_auth().await);
        let err = client.me().await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
