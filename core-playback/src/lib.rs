//! # Playback Module
//!
//! Preview playback engine: a linear track queue driven through a
//! host-provided [`AudioEngine`](bridge_traits::audio::AudioEngine).
//!
//! ## Overview
//!
//! This module handles:
//! - Queue management with a linear next/previous cursor
//! - The play/pause/resume/advance lifecycle over one audio resource
//! - Status notifications from the engine (progress, completion)
//! - Read-only playback snapshots for presentation code

pub mod controller;
pub mod error;
pub mod queue;

pub use controller::{PlaybackController, PlaybackSnapshot, PlayerState};
pub use error::{PlaybackError, Result};
pub use queue::{format_elapsed, Direction, QueueEntry, TrackQueue};
