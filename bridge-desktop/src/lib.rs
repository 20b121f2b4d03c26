//! # Desktop Bridge Implementations
//!
//! Reference implementations of the bridge traits for desktop platforms
//! (macOS, Windows, Linux), used by integration tests and headless demos.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with retry and backoff
//! - `KeyValueStore` using the `keyring` crate (OS keychain)
//! - `AudioEngine` as a timer-driven simulation that reports
//!   [`AudioStatus`](bridge_traits::audio::AudioStatus) through a channel
//!
//! ## Feature Flags
//!
//! - `secure-store`: Enable OS keychain integration (default)
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SimulatedAudioEngine};
//!
//! let http_client = ReqwestHttpClient::new();
//! let (audio, mut status_rx) = SimulatedAudioEngine::with_defaults();
//! ```

mod audio;
mod http;

#[cfg(feature = "secure-store")]
mod secure_store;

pub use audio::SimulatedAudioEngine;
pub use http::ReqwestHttpClient;

#[cfg(feature = "secure-store")]
pub use secure_store::KeyringStore;
