//! # Catalog Client
//!
//! Typed client for the streaming catalog's REST API: user profile,
//! saved tracks, top artists, recently played, album tracks, and
//! playlists. Requests carry the bearer token obtained from
//! [`core_auth::AuthManager`]; callers degrade gracefully to empty data
//! when a call fails.

pub mod client;
pub mod error;
pub mod models;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use models::{
    Album, AlbumTrack, Artist, Followers, Image, Paging, PlayHistoryItem, Playlist, SavedTrack,
    SimplifiedArtist, Track, UserProfile,
};
