//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and platform-specific
//! implementations. Each trait represents a capability that the core requires but
//! that must be implemented differently per platform (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry and TLS
//!
//! ### Storage
//! - [`KeyValueStore`](storage::KeyValueStore) - Durable string-keyed storage
//!   (Keychain/Keystore/AsyncStorage equivalents)
//!
//! ### Audio
//! - [`AudioEngine`](audio::AudioEngine) - Load, pause, resume, and release
//!   remote audio resources; reports progress via [`AudioStatus`](audio::AudioStatus)
//!
//! ### Authorization
//! - [`AuthorizationPrompt`](auth::AuthorizationPrompt) - Interactive OAuth
//!   consent surface (in-app browser, system browser, test harness)
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Platform implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Never expose sensitive data (tokens, secrets) through error text
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent usage
//! across async tasks. Implementations must ensure thread safety.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod audio;
pub mod auth;
pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use audio::{AudioEngine, AudioStatus, ResourceId};
pub use auth::{AuthorizationOutcome, AuthorizationPrompt};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::KeyValueStore;
pub use time::{Clock, SystemClock};
