//! Catalog API response types
//!
//! Data structures for deserializing catalog REST API responses. Only
//! the fields the client actually consumes are modeled; unknown fields
//! are ignored.

use serde::{Deserialize, Serialize};

/// An artwork image at one resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A full artist object, as returned by the top-artists endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// The reduced artist object embedded in tracks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimplifiedArtist {
    pub id: String,
    pub name: String,
}

/// The album object embedded in tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A playable track.
///
/// `preview_url` is absent for tracks without a preview clip; absence
/// is legal and meaningful, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    pub album: Album,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Joined artist names for display, e.g. "Artist A, Artist B".
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// URL of the primary artwork image, if any.
    pub fn artwork_url(&self) -> Option<&str> {
        self.album.images.first().map(|i| i.url.as_str())
    }
}

/// One entry of the user's saved-tracks library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub track: Track,
}

/// One entry of the listening history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistoryItem {
    pub track: Track,
}

/// A track as listed inside an album; carries no album object of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// Follower count wrapper.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

/// A playlist owned by or followed by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub followers: Option<Followers>,
}

/// Offset-based page of results.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub next: Option<String>,
}
