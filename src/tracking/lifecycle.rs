// src/tracking/lifecycle.rs
//
// Track creation and expiry. Unmatched detections become new records with a
// freshly allocated id; the expiry sweep runs once per frame after all
// matches are applied and removes (not archives) every record unseen for
// longer than the expiry window.

use super::store::TrackStore;
use super::track::TrackedObject;
use crate::events::SceneEvent;
use crate::types::Detection;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct Lifecycle {
    expiry: Duration,
}

impl Lifecycle {
    pub fn new(expiry: Duration) -> Self {
        Self { expiry }
    }

    /// Create a record for an unmatched detection. A first appearance that is
    /// already a pedestrian light announces its color immediately; there is
    /// no previous color to debounce against.
    pub fn spawn(
        &self,
        store: &mut TrackStore,
        det: &Detection,
        now: Instant,
    ) -> (u64, Option<SceneEvent>) {
        let id = store.allocate_id();
        let record = TrackedObject::new(id, det, now);
        info!(
            "new track {} ({}) at ({:.0},{:.0})",
            id, record.label, record.centroid.x, record.centroid.y
        );

        let event = record
            .class
            .signal_color()
            .map(|color| SceneEvent::SignalAlert { color });

        store.upsert(record);
        (id, event)
    }

    /// Remove every track whose last match is older than the expiry window.
    /// Returns how many were dropped.
    pub fn sweep(&self, store: &mut TrackStore, now: Instant) -> usize {
        let stale: Vec<u64> = store
            .snapshot()
            .into_iter()
            .filter(|t| now.duration_since(t.last_seen) > self.expiry)
            .map(|t| t.id)
            .collect();

        for id in &stale {
            store.remove(*id);
            debug!("track {} expired", id);
        }
        stale.len()
    }
}
