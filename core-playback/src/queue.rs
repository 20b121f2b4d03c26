//! # Track Queue
//!
//! Linear play queue with a next/previous cursor. The cursor saturates
//! at both ends: an out-of-range move is a no-op, never a panic.

use core_catalog::models::Track;
use serde::{Deserialize, Serialize};

/// Direction of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Next,
    Previous,
}

/// One playable entry of the queue.
///
/// `preview_url` is absent for tracks without a preview clip; such
/// entries stay in the queue (their metadata is shown) but cannot be
/// played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub track_id: String,
    pub title: String,
    /// Display string, e.g. "Artist A, Artist B"
    pub artists: String,
    pub artwork_url: Option<String>,
    pub preview_url: Option<String>,
}

impl QueueEntry {
    pub fn is_playable(&self) -> bool {
        self.preview_url.is_some()
    }
}

impl From<Track> for QueueEntry {
    fn from(track: Track) -> Self {
        let artists = track.artist_names();
        let artwork_url = track.artwork_url().map(|u| u.to_string());
        Self {
            track_id: track.id,
            title: track.name,
            artists,
            artwork_url,
            preview_url: track.preview_url,
        }
    }
}

/// Ordered queue of entries plus the playback cursor.
///
/// `cursor` is `None` only for an empty queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackQueue {
    entries: Vec<QueueEntry>,
    cursor: Option<usize>,
}

impl TrackQueue {
    /// Create a queue positioned at `start_index`.
    ///
    /// An out-of-range start index clamps to the last entry; an empty
    /// entry list yields an empty queue with no cursor.
    pub fn new(entries: Vec<QueueEntry>, start_index: usize) -> Self {
        let cursor = if entries.is_empty() {
            None
        } else {
            Some(start_index.min(entries.len() - 1))
        };
        Self { entries, cursor }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&QueueEntry> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    /// Move the cursor one step in `direction`.
    ///
    /// Returns the new cursor position, or `None` when the move would
    /// leave the queue bounds; in that case nothing changes.
    pub fn advance(&mut self, direction: Direction) -> Option<usize> {
        let cursor = self.cursor?;
        let next = match direction {
            Direction::Next => {
                if cursor + 1 < self.entries.len() {
                    cursor + 1
                } else {
                    return None;
                }
            }
            Direction::Previous => cursor.checked_sub(1)?,
        };
        self.cursor = Some(next);
        Some(next)
    }
}

/// Format a millisecond position as `M:SS` with floor semantics.
///
/// Minutes are unpadded, seconds zero-padded: `65_000` formats as
/// `"1:05"`, `59_999` as `"0:59"`.
pub fn format_elapsed(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    format!("{}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, preview: Option<&str>) -> QueueEntry {
        QueueEntry {
            track_id: id.to_string(),
            title: format!("Title {}", id),
            artists: "Artist".to_string(),
            artwork_url: None,
            preview_url: preview.map(|p| p.to_string()),
        }
    }

    #[test]
    fn test_empty_queue_has_no_cursor() {
        let queue = TrackQueue::new(vec![], 0);
        assert!(queue.is_empty());
        assert!(queue.cursor().is_none());
        assert!(queue.current().is_none());
    }

    #[test]
    fn test_start_index_clamps_to_last_entry() {
        let queue = TrackQueue::new(vec![entry("a", None), entry("b", None)], 10);
        assert_eq!(queue.cursor(), Some(1));
    }

    #[test]
    fn test_advance_next_and_previous() {
        let mut queue = TrackQueue::new(
            vec![entry("a", None), entry("b", None), entry("c", None)],
            0,
        );

        assert_eq!(queue.advance(Direction::Next), Some(1));
        assert_eq!(queue.advance(Direction::Next), Some(2));
        assert_eq!(queue.current().map(|e| e.track_id.as_str()), Some("c"));

        assert_eq!(queue.advance(Direction::Previous), Some(1));
        assert_eq!(queue.advance(Direction::Previous), Some(0));
    }

    #[test]
    fn test_advance_saturates_at_bounds() {
        let mut queue = TrackQueue::new(vec![entry("a", None), entry("b", None)], 0);

        assert_eq!(queue.advance(Direction::Previous), None);
        assert_eq!(queue.cursor(), Some(0));

        queue.advance(Direction::Next);
        assert_eq!(queue.advance(Direction::Next), None);
        assert_eq!(queue.cursor(), Some(1));
    }

    #[test]
    fn test_advance_on_empty_queue() {
        let mut queue = TrackQueue::default();
        assert_eq!(queue.advance(Direction::Next), None);
        assert_eq!(queue.advance(Direction::Previous), None);
    }

    #[test]
    fn test_is_playable() {
        assert!(entry("a", Some("https://p/1.mp3")).is_playable());
        assert!(!entry("b", None).is_playable());
    }

    #[test]
    fn test_queue_entry_from_track() {
        let json = r#"{
            "id": "t1",
            "name": "Song",
            "artists": [{"id": "a1", "name": "One"}, {"id": "a2", "name": "Two"}],
            "album": {"id": "al", "images": [{"url": "https://img/art.jpg"}]},
            "preview_url": "https://p/t1.mp3"
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();

        let entry = QueueEntry::from(track);
        assert_eq!(entry.track_id, "t1");
        assert_eq!(entry.artists, "One, Two");
        assert_eq!(entry.artwork_url.as_deref(), Some("https://img/art.jpg"));
        assert!(entry.is_playable());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(999), "0:00");
        assert_eq!(format_elapsed(1_000), "0:01");
        assert_eq!(format_elapsed(59_999), "0:59");
        assert_eq!(format_elapsed(60_000), "1:00");
        assert_eq!(format_elapsed(65_000), "1:05");
        assert_eq!(format_elapsed(600_000), "10:00");
        assert_eq!(format_elapsed(3_599_000), "59:59");
        assert_eq!(format_elapsed(3_600_000), "60:00");
    }
}
