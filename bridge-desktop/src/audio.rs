//! Timer-Driven Simulated Audio Engine
//!
//! Stands in for a real platform player in integration tests and
//! headless demos. Every loaded resource is "played" by a background
//! task that advances a playhead on a fixed tick and pushes
//! [`AudioStatus`] notifications into a channel; the host forwards
//! those into the playback controller exactly as it would forward a
//! real engine's callbacks.

use async_trait::async_trait;
use bridge_traits::{
    audio::{AudioEngine, AudioStatus, ResourceId},
    error::{BridgeError, Result},
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

struct PlaybackTask {
    paused: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Simulated audio engine that plays fixed-length clips on a timer.
///
/// `new` returns the engine together with the receiving end of its
/// status channel; the host drains the receiver and feeds each status
/// to the playback controller.
pub struct SimulatedAudioEngine {
    clip_duration: Duration,
    tick: Duration,
    status_tx: mpsc::UnboundedSender<AudioStatus>,
    tasks: Mutex<HashMap<ResourceId, PlaybackTask>>,
}

impl SimulatedAudioEngine {
    /// Create an engine whose clips all run for `clip_duration`,
    /// reporting progress every `tick`.
    pub fn new(
        clip_duration: Duration,
        tick: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<AudioStatus>) {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let engine = Self {
            clip_duration,
            tick,
            status_tx,
            tasks: Mutex::new(HashMap::new()),
        };
        (engine, status_rx)
    }

    /// An engine with 30-second clips and a 500ms progress tick,
    /// matching typical preview-clip behaviour.
    pub fn with_defaults() -> (Self, mpsc::UnboundedReceiver<AudioStatus>) {
        Self::new(Duration::from_secs(30), Duration::from_millis(500))
    }

    fn task_entry(&self, resource: ResourceId) -> Result<Arc<AtomicBool>> {
        let tasks = self
            .tasks
            .lock()
            .map_err(|_| BridgeError::OperationFailed("task table lock poisoned".to_string()))?;
        tasks
            .get(&resource)
            .map(|t| t.paused.clone())
            .ok_or_else(|| {
                BridgeError::OperationFailed(format!("unknown audio resource: {}", resource))
            })
    }
}

#[async_trait]
impl AudioEngine for SimulatedAudioEngine {
    async fn load(&self, url: &str) -> Result<ResourceId> {
        let resource = ResourceId::new();
        let paused = Arc::new(AtomicBool::new(false));
        let duration_ms = self.clip_duration.as_millis() as u64;
        let tick = self.tick;
        let tick_ms = tick.as_millis() as u64;
        let tx = self.status_tx.clone();
        let task_paused = paused.clone();

        debug!(url = url, resource = %resource, "Loading simulated clip");

        let handle = tokio::spawn(async move {
            let mut position_ms = 0u64;
            loop {
                sleep(tick).await;
                if task_paused.load(Ordering::Relaxed) {
                    continue;
                }
                position_ms = (position_ms + tick_ms).min(duration_ms);
                if position_ms >= duration_ms {
                    let _ = tx.send(AudioStatus::finished(resource, duration_ms));
                    break;
                }
                let _ = tx.send(AudioStatus::progress(resource, position_ms, duration_ms));
            }
        });

        let mut tasks = self
            .tasks
            .lock()
            .map_err(|_| BridgeError::OperationFailed("task table lock poisoned".to_string()))?;
        tasks.insert(resource, PlaybackTask { paused, handle });
        Ok(resource)
    }

    async fn pause(&self, resource: ResourceId) -> Result<()> {
        self.task_entry(resource)?.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn resume(&self, resource: ResourceId) -> Result<()> {
        self.task_entry(resource)?.store(false, Ordering::Relaxed);
        Ok(())
    }

    async fn release(&self, resource: ResourceId) -> Result<()> {
        let task = {
            let mut tasks = self.tasks.lock().map_err(|_| {
                BridgeError::OperationFailed("task table lock poisoned".to_string())
            })?;
            tasks.remove(&resource)
        };

        // Releasing an unknown or already-released resource is fine.
        if let Some(task) = task {
            task.handle.abort();
            debug!(resource = %resource, "Released simulated clip");
        }
        Ok(())
    }
}

impl Drop for SimulatedAudioEngine {
    fn drop(&mut self) {
        if let Ok(tasks) = self.tasks.lock() {
            for task in tasks.values() {
                task.handle.abort();
            }
        }
    }
}
