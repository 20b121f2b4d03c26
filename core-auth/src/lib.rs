//! # Authentication Module
//!
//! Credential manager for the streaming catalog's OAuth 2.0 authorization
//! code flow.
//!
//! ## Overview
//!
//! This module obtains an access token through an interactive consent flow,
//! persists it alongside its expiration timestamp in a host-provided
//! [`KeyValueStore`](bridge_traits::storage::KeyValueStore), and lazily
//! invalidates it once expired. There is no token refresh: the upstream flow
//! issues no refresh token, so expiry always means a full interactive
//! re-authorization.
//!
//! ## Features
//!
//! - OAuth 2.0 authorization code flow with HTTP Basic client authentication
//! - Atomic credential persistence (token and expiration stored together)
//! - Lazy invalidation of expired credentials on read
//! - Auth state event emission

pub mod error;
pub mod manager;
pub mod oauth;
pub mod store;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::AuthManager;
pub use oauth::{AuthCodeFlow, AuthConfig};
pub use store::CredentialStore;
pub use types::Credential;
