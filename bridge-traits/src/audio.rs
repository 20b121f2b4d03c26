//! Audio Engine Abstraction
//!
//! These abstractions let the core playback module drive a platform-specific
//! audio engine (AVPlayer, ExoPlayer, a desktop backend) without owning any
//! decoding or output concerns itself. The engine streams a remote preview
//! clip and reports progress back to the core as [`AudioStatus`] notifications
//! tagged with the [`ResourceId`] of the clip they describe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Unique identifier for one loaded audio resource.
///
/// Every successful [`AudioEngine::load`] mints a fresh identifier. Status
/// notifications carry the identifier of the resource they belong to, so the
/// core can discard notifications that outlive their resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Generate a new resource identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Progress notification emitted by an audio engine.
///
/// Mirrors the status-update callback model of mobile audio frameworks: the
/// engine pushes these periodically while a resource is loaded, and once more
/// with `did_just_finish` set when the clip plays to its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioStatus {
    /// Resource this notification describes.
    pub resource: ResourceId,
    /// Current playhead position in milliseconds.
    pub position_ms: u64,
    /// Total clip duration in milliseconds. May be 0 before the engine has
    /// probed the stream.
    pub duration_ms: u64,
    /// Whether audio is currently advancing.
    pub is_playing: bool,
    /// Set on the final notification when the clip reached its natural end.
    pub did_just_finish: bool,
}

impl AudioStatus {
    /// A progress tick for a playing resource.
    pub fn progress(resource: ResourceId, position_ms: u64, duration_ms: u64) -> Self {
        Self {
            resource,
            position_ms,
            duration_ms,
            is_playing: true,
            did_just_finish: false,
        }
    }

    /// The terminal notification for a clip that played to its end.
    pub fn finished(resource: ResourceId, duration_ms: u64) -> Self {
        Self {
            resource,
            position_ms: duration_ms,
            duration_ms,
            is_playing: false,
            did_just_finish: true,
        }
    }
}

/// Trait for platform audio engines that stream remote preview clips.
///
/// The engine owns at most the resources handed out by [`load`](Self::load);
/// the core guarantees it releases a resource before loading the next one.
/// [`load`](Self::load) resolves once the stream is ready and playback has
/// begun.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Open the remote clip at `url`, start playback, and return the
    /// identifier of the new resource.
    async fn load(&self, url: &str) -> Result<ResourceId>;

    /// Pause a loaded resource, keeping its position.
    async fn pause(&self, resource: ResourceId) -> Result<()>;

    /// Resume a paused resource.
    async fn resume(&self, resource: ResourceId) -> Result<()>;

    /// Release a resource and free everything the engine holds for it.
    ///
    /// Releasing an already-released resource is not an error.
    async fn release(&self, resource: ResourceId) -> Result<()>;
}
