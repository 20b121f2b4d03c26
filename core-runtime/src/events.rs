//! # Event Bus System
//!
//! Provides an event-driven architecture for the preview player core using
//! `tokio::sync::broadcast`. This module enables decoupled communication
//! between core modules through typed events.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for different domains
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//! - **Subscription Management**: Multiple subscribers can listen independently
//!
//! ## Usage
//!
//! ### Publishing Events
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, AuthEvent};
//!
//! let event_bus = EventBus::new(100);
//! let event = CoreEvent::Auth(AuthEvent::SigningIn);
//!
//! event_bus.emit(event).ok();
//! ```
//!
//! ### Subscribing to Events
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent};
//! use tokio::sync::broadcast::error::RecvError;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! tokio::spawn(async move {
//!     loop {
//!         match stream.recv().await {
//!             Ok(event) => println!("Received: {:?}", event),
//!             Err(RecvError::Lagged(n)) => {
//!                 eprintln!("Missed {} events", n);
//!             }
//!             Err(RecvError::Closed) => break,
//!         }
//!     }
//! });
//! # }
//! ```
//!
//! ## Error Handling
//!
//! The event bus uses `tokio::sync::broadcast`, which can produce two types of errors:
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   This is non-fatal; the subscriber can continue receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.
//!
//! Subscribers should handle `Lagged` gracefully and treat `Closed` as a signal to exit.
//!
//! ## Thread Safety
//!
//! The event bus is fully thread-safe (`Send + Sync`). It can be safely shared across
//! async tasks using `Arc`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// This value balances memory usage with the ability to handle bursts of events.
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
///
/// This is the main event type published and received through the event bus.
/// It wraps domain-specific event types for different modules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Authentication-related events
    Auth(AuthEvent),
    /// Playback-related events
    Playback(PlaybackEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Playback(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Auth(AuthEvent::AuthError { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::SkippedUnplayable { .. }) => EventSeverity::Warning,
            CoreEvent::Auth(AuthEvent::SignedIn { .. }) => EventSeverity::Info,
            CoreEvent::Auth(AuthEvent::CredentialExpired) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Authentication Events
// ============================================================================

/// Events related to the credential lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// Interactive authorization flow in progress.
    SigningIn,
    /// A credential was obtained and stored.
    SignedIn {
        /// Timestamp when the token expires (Unix epoch milliseconds).
        expires_at_ms: i64,
    },
    /// The user dismissed the consent surface without deciding.
    SignInCancelled,
    /// Stored credential was removed at the user's request.
    SignedOut,
    /// Stored credential was found expired and removed.
    CredentialExpired,
    /// Authorization or token exchange failed.
    AuthError {
        /// Human-readable error message.
        message: String,
        /// Whether the flow can simply be retried.
        recoverable: bool,
    },
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::SigningIn => "Authorization in progress",
            AuthEvent::SignedIn { .. } => "Signed in successfully",
            AuthEvent::SignInCancelled => "Authorization cancelled",
            AuthEvent::SignedOut => "Signed out",
            AuthEvent::CredentialExpired => "Stored credential expired",
            AuthEvent::AuthError { .. } => "Authentication error",
        }
    }
}

// ============================================================================
// Playback Events
// ============================================================================

/// Events related to preview playback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// Playback started.
    Started {
        /// The track ID being played.
        track_id: String,
        /// Track title.
        title: String,
    },
    /// Playback paused.
    Paused {
        /// The track ID.
        track_id: String,
        /// Position when paused (milliseconds).
        position_ms: u64,
    },
    /// Playback resumed after pause.
    Resumed {
        /// The track ID.
        track_id: String,
        /// Position when resumed (milliseconds).
        position_ms: u64,
    },
    /// Playback stopped.
    Stopped {
        /// The track ID.
        track_id: String,
    },
    /// Track preview finished playing naturally.
    Completed {
        /// The track ID that completed.
        track_id: String,
    },
    /// Playback position changed (natural progression).
    PositionChanged {
        /// The track ID.
        track_id: String,
        /// New position (milliseconds).
        position_ms: u64,
        /// Preview duration (milliseconds).
        duration_ms: u64,
    },
    /// A queue entry without a preview clip was skipped over.
    SkippedUnplayable {
        /// The track ID lacking a preview.
        track_id: String,
        /// Track title.
        title: String,
    },
    /// Playback error occurred.
    Error {
        /// The track ID if available.
        track_id: Option<String>,
        /// Human-readable error message.
        message: String,
        /// Whether playback can be retried.
        recoverable: bool,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Resumed { .. } => "Playback resumed",
            PlaybackEvent::Stopped { .. } => "Playback stopped",
            PlaybackEvent::Completed { .. } => "Track completed",
            PlaybackEvent::PositionChanged { .. } => "Playback position changed",
            PlaybackEvent::SkippedUnplayable { .. } => "Unplayable track skipped",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, CoreEvent, AuthEvent};
///
/// # #[tokio::main]
/// # async fn main() {
/// let event_bus = EventBus::new(100);
///
/// let mut subscriber = event_bus.subscribe();
///
/// let event = CoreEvent::Auth(AuthEvent::SignedOut);
/// event_bus.emit(event).ok();
/// # }
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all future events.
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering capabilities.
///
/// This provides a more ergonomic API for consuming events with optional filtering
/// by event type or severity.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, CoreEvent};
///
/// let event_bus = EventBus::new(100);
/// let stream = EventStream::new(event_bus.subscribe());
///
/// // Filter for auth events only
/// let mut auth_stream = stream.filter(|event| {
///     matches!(event, CoreEvent::Auth(_))
/// });
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// This will skip events that don't match the filter and return the next matching event.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }

            // Event didn't match filter, continue to next event
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }

                    // Event didn't match filter, continue
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        let event = CoreEvent::Auth(AuthEvent::SignedOut);

        // Should error when no subscribers
        assert!(bus.emit(event).is_err());
    }

    #[tokio::test]
    async fn test_event_emission_with_subscribers() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe();

        let event = CoreEvent::Auth(AuthEvent::SignedIn {
            expires_at_ms: 1_700_000_000_000,
        });

        let result = bus.emit(event.clone());
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 1);

        let received = sub.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Playback(PlaybackEvent::Started {
            track_id: "track-1".to_string(),
            title: "Test Track".to_string(),
        });

        bus.emit(event.clone()).ok();

        let received1 = sub1.recv().await.unwrap();
        let received2 = sub2.recv().await.unwrap();

        assert_eq!(received1, event);
        assert_eq!(received2, event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream =
            EventStream::new(bus.subscribe()).filter(|event| matches!(event, CoreEvent::Auth(_)));

        // Emit non-auth event (should be filtered out)
        let playback_event = CoreEvent::Playback(PlaybackEvent::Completed {
            track_id: "track-1".to_string(),
        });
        bus.emit(playback_event).ok();

        // Emit auth event (should pass through)
        let auth_event = CoreEvent::Auth(AuthEvent::SigningIn);
        bus.emit(auth_event.clone()).ok();

        let received = stream.recv().await.unwrap();
        assert_eq!(received, auth_event);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2); // Very small buffer
        let mut sub = bus.subscribe();

        // Emit more events than buffer size
        for i in 0..5 {
            let event = CoreEvent::Playback(PlaybackEvent::PositionChanged {
                track_id: format!("track-{}", i),
                position_ms: i * 1000,
                duration_ms: 30_000,
            });
            bus.emit(event).ok();
        }

        // First recv should indicate lagging
        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[tokio::test]
    async fn test_event_severity() {
        let error_event = CoreEvent::Auth(AuthEvent::AuthError {
            message: "Failed".to_string(),
            recoverable: false,
        });
        assert_eq!(error_event.severity(), EventSeverity::Error);

        let warn_event = CoreEvent::Playback(PlaybackEvent::SkippedUnplayable {
            track_id: "track-1".to_string(),
            title: "No Preview".to_string(),
        });
        assert_eq!(warn_event.severity(), EventSeverity::Warning);

        let debug_event = CoreEvent::Playback(PlaybackEvent::PositionChanged {
            track_id: "track-1".to_string(),
            position_ms: 5000,
            duration_ms: 30000,
        });
        assert_eq!(debug_event.severity(), EventSeverity::Debug);
    }

    #[tokio::test]
    async fn test_event_description() {
        let event = CoreEvent::Auth(AuthEvent::SignedIn {
            expires_at_ms: 1_700_000_000_000,
        });
        assert_eq!(event.description(), "Signed in successfully");
    }

    #[tokio::test]
    async fn test_concurrent_publishers() {
        let bus = EventBus::new(100);
        let mut sub = bus.subscribe();

        let bus1 = bus.clone();
        let bus2 = bus.clone();

        let handle1 = tokio::spawn(async move {
            for _ in 0..10 {
                bus1.emit(CoreEvent::Auth(AuthEvent::SigningIn)).ok();
            }
        });

        let handle2 = tokio::spawn(async move {
            for i in 0..10 {
                let event = CoreEvent::Playback(PlaybackEvent::PositionChanged {
                    track_id: "track-1".to_string(),
                    position_ms: i * 500,
                    duration_ms: 30_000,
                });
                bus2.emit(event).ok();
            }
        });

        handle1.await.ok();
        handle2.await.ok();

        let mut count = 0;
        while sub.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 20);
    }

    #[tokio::test]
    async fn test_event_serialization() {
        let event = CoreEvent::Playback(PlaybackEvent::PositionChanged {
            track_id: "track-123".to_string(),
            position_ms: 5000,
            duration_ms: 30_000,
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("track-123"));

        let deserialized: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());

        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_try_recv_with_event() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());

        let event = CoreEvent::Playback(PlaybackEvent::Started {
            track_id: "track-1".to_string(),
            title: "Test Song".to_string(),
        });

        bus.emit(event.clone()).ok();

        let result = stream.try_recv();
        assert!(result.is_some());
        let received = result.unwrap().unwrap();
        assert_eq!(received, event);
    }
}
