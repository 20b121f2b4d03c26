//! # Playback Controller
//!
//! Drives the preview playback lifecycle over a host-provided
//! [`AudioEngine`]. The whole mutable session lives behind one
//! `tokio::sync::Mutex`; presentation code reads immutable
//! [`PlaybackSnapshot`]s and the event bus, never the session itself.
//!
//! ## Resource discipline
//!
//! At most one audio resource is open at any time. Every path that
//! acquires a new resource releases the previous one first; a release
//! failure is logged and swallowed because the engine has already
//! abandoned the resource.
//!
//! ## Status notifications
//!
//! The host forwards engine status callbacks into [`PlaybackController::on_status`].
//! Notifications carrying a [`ResourceId`] other than the session's
//! current one are stale (a later load superseded them) and are
//! discarded.

use std::sync::Arc;

use bridge_traits::audio::{AudioEngine, AudioStatus, ResourceId};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::{PlaybackError, Result};
use crate::queue::{format_elapsed, Direction, QueueEntry, TrackQueue};

/// Playback lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerState {
    /// Nothing loaded, or playback has settled after completion.
    #[default]
    Idle,
    /// A preview stream is being opened.
    Loading,
    Playing,
    Paused,
    /// The preview finished; transient until auto-advance settles.
    Completed,
}

/// Read-only view of the session for presentation code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: PlayerState,
    /// Queue position, `None` for an empty queue.
    pub cursor: Option<usize>,
    /// Metadata of the entry playback last settled on. Retained through
    /// completion and skips so the display never goes blank mid-session.
    pub entry: Option<QueueEntry>,
    pub position_ms: u64,
    pub duration_ms: u64,
    /// Fraction played in `[0.0, 1.0]`; `0.0` while duration is unknown.
    pub progress: f64,
    /// Position formatted as `M:SS`.
    pub elapsed: String,
}

#[derive(Debug, Default)]
struct Session {
    queue: TrackQueue,
    state: PlayerState,
    resource: Option<ResourceId>,
    /// Entry whose metadata the session currently presents.
    current: Option<QueueEntry>,
    position_ms: u64,
    duration_ms: u64,
}

/// Owns the playback session and the audio engine handle.
///
/// # Example
///
/// ```ignore
/// use core_playback::{Direction, PlaybackController};
///
/// let controller = PlaybackController::new(audio_engine, event_bus);
/// controller.load_queue_and_play(entries, 0).await?;
/// controller.advance(Direction::Next).await?;
/// let snapshot = controller.snapshot().await;
/// ```
pub struct PlaybackController {
    audio: Arc<dyn AudioEngine>,
    event_bus: EventBus,
    session: Mutex<Session>,
}

impl PlaybackController {
    pub fn new(audio: Arc<dyn AudioEngine>, event_bus: EventBus) -> Self {
        Self {
            audio,
            event_bus,
            session: Mutex::new(Session::default()),
        }
    }

    /// Replace the queue and start playing at `start_index`.
    ///
    /// The previous audio resource is always released first. If the
    /// selected entry has no preview the session stays `Idle` (with its
    /// previous metadata) and no resource is opened.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn load_queue_and_play(
        &self,
        entries: Vec<QueueEntry>,
        start_index: usize,
    ) -> Result<()> {
        let mut session = self.session.lock().await;

        self.release_current(&mut session).await;
        session.queue = TrackQueue::new(entries, start_index);
        session.state = PlayerState::Idle;
        session.position_ms = 0;
        session.duration_ms = 0;

        if session.queue.is_empty() {
            debug!("Loaded empty queue");
            return Ok(());
        }

        self.play_at_cursor(&mut session).await
    }

    /// Pause playback. A no-op unless currently `Playing`.
    #[instrument(skip(self))]
    pub async fn pause(&self) -> Result<()> {
        let mut session = self.session.lock().await;

        let resource = match (session.state, session.resource) {
            (PlayerState::Playing, Some(resource)) => resource,
            _ => {
                debug!(state = ?session.state, "Pause ignored");
                return Ok(());
            }
        };

        self.audio
            .pause(resource)
            .await
            .map_err(|e| PlaybackError::EngineError(e.to_string()))?;

        session.state = PlayerState::Paused;
        if let Some(entry) = &session.current {
            let _ = self
                .event_bus
                .emit(CoreEvent::Playback(PlaybackEvent::Paused {
                    track_id: entry.track_id.clone(),
                    position_ms: session.position_ms,
                }));
        }
        info!("Playback paused");
        Ok(())
    }

    /// Resume playback. A no-op unless currently `Paused`.
    #[instrument(skip(self))]
    pub async fn resume(&self) -> Result<()> {
        let mut session = self.session.lock().await;

        let resource = match (session.state, session.resource) {
            (PlayerState::Paused, Some(resource)) => resource,
            _ => {
                debug!(state = ?session.state, "Resume ignored");
                return Ok(());
            }
        };

        self.audio
            .resume(resource)
            .await
            .map_err(|e| PlaybackError::EngineError(e.to_string()))?;

        session.state = PlayerState::Playing;
        if let Some(entry) = &session.current {
            let _ = self
                .event_bus
                .emit(CoreEvent::Playback(PlaybackEvent::Resumed {
                    track_id: entry.track_id.clone(),
                    position_ms: session.position_ms,
                }));
        }
        info!("Playback resumed");
        Ok(())
    }

    /// Move the cursor and play the entry it lands on.
    ///
    /// An out-of-bounds move is a no-op that preserves the whole
    /// session, including any active playback.
    #[instrument(skip(self))]
    pub async fn advance(&self, direction: Direction) -> Result<()> {
        let mut session = self.session.lock().await;

        if session.queue.advance(direction).is_none() {
            debug!(?direction, "Advance out of bounds, ignoring");
            return Ok(());
        }

        self.play_at_cursor(&mut session).await
    }

    /// Handle a status notification from the audio engine.
    ///
    /// Stale notifications (for a resource the session no longer owns)
    /// are discarded. `did_just_finish` triggers auto-advance; when the
    /// next entry is unplayable or the queue is exhausted the session
    /// settles `Idle` with its metadata retained.
    pub async fn on_status(&self, status: AudioStatus) -> Result<()> {
        let mut session = self.session.lock().await;

        if session.resource != Some(status.resource) {
            debug!(resource = %status.resource, "Discarding stale status notification");
            return Ok(());
        }

        session.position_ms = status.position_ms;
        session.duration_ms = status.duration_ms;

        if status.did_just_finish {
            session.state = PlayerState::Completed;
            if let Some(entry) = &session.current {
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Playback(PlaybackEvent::Completed {
                        track_id: entry.track_id.clone(),
                    }));
            }

            if session.queue.advance(Direction::Next).is_none() {
                info!("Queue exhausted, settling idle");
                self.release_current(&mut session).await;
                session.state = PlayerState::Idle;
                return Ok(());
            }
            return self.play_at_cursor(&mut session).await;
        }

        if let Some(entry) = &session.current {
            let _ = self
                .event_bus
                .emit(CoreEvent::Playback(PlaybackEvent::PositionChanged {
                    track_id: entry.track_id.clone(),
                    position_ms: status.position_ms,
                    duration_ms: status.duration_ms,
                }));
        }
        Ok(())
    }

    /// Release the audio resource and return to `Idle`.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<()> {
        let mut session = self.session.lock().await;

        self.release_current(&mut session).await;
        session.state = PlayerState::Idle;
        session.position_ms = 0;
        session.duration_ms = 0;

        if let Some(entry) = &session.current {
            let _ = self
                .event_bus
                .emit(CoreEvent::Playback(PlaybackEvent::Stopped {
                    track_id: entry.track_id.clone(),
                }));
        }
        info!("Playback stopped");
        Ok(())
    }

    /// A read-only snapshot of the session.
    pub async fn snapshot(&self) -> PlaybackSnapshot {
        let session = self.session.lock().await;

        let progress = if session.duration_ms == 0 {
            0.0
        } else {
            (session.position_ms as f64 / session.duration_ms as f64).clamp(0.0, 1.0)
        };

        PlaybackSnapshot {
            state: session.state,
            cursor: session.queue.cursor(),
            entry: session.current.clone(),
            position_ms: session.position_ms,
            duration_ms: session.duration_ms,
            progress,
            elapsed: format_elapsed(session.position_ms),
        }
    }

    /// Play the entry under the cursor, releasing whatever was loaded.
    ///
    /// An unplayable entry settles the session `Idle` without opening a
    /// resource; the previously presented metadata stays in place.
    async fn play_at_cursor(&self, session: &mut Session) -> Result<()> {
        self.release_current(session).await;

        let entry = match session.queue.current() {
            Some(entry) => entry.clone(),
            None => {
                session.state = PlayerState::Idle;
                return Ok(());
            }
        };

        let preview_url = match &entry.preview_url {
            Some(url) => url.clone(),
            None => {
                warn!(track_id = %entry.track_id, title = %entry.title, "No preview available, not playing");
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Playback(PlaybackEvent::SkippedUnplayable {
                        track_id: entry.track_id.clone(),
                        title: entry.title.clone(),
                    }));
                session.state = PlayerState::Idle;
                return Ok(());
            }
        };

        session.state = PlayerState::Loading;
        session.position_ms = 0;
        session.duration_ms = 0;

        let resource = match self.audio.load(&preview_url).await {
            Ok(resource) => resource,
            Err(e) => {
                warn!(track_id = %entry.track_id, error = %e, "Failed to load preview");
                session.state = PlayerState::Idle;
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Playback(PlaybackEvent::Error {
                        track_id: Some(entry.track_id.clone()),
                        message: format!("Failed to load preview: {}", e),
                        recoverable: true,
                    }));
                return Err(PlaybackError::LoadFailed(e.to_string()));
            }
        };

        session.resource = Some(resource);
        session.state = PlayerState::Playing;
        session.current = Some(entry.clone());

        let _ = self
            .event_bus
            .emit(CoreEvent::Playback(PlaybackEvent::Started {
                track_id: entry.track_id,
                title: entry.title,
            }));
        Ok(())
    }

    /// Release the session's audio resource, if any. Failures are
    /// logged and swallowed.
    async fn release_current(&self, session: &mut Session) {
        if let Some(resource) = session.resource.take() {
            if let Err(e) = self.audio.release(resource).await {
                warn!(resource = %resource, error = %e, "Failed to release audio resource");
            }
        }
    }
}
