// src/tracking/track.rs

use crate::geometry::{Point, Rect};
use crate::types::{Detection, ObjectClass};
use std::time::Instant;

/// A single tracked object. Owned exclusively by the `TrackStore`; every
/// mutation happens inside one apply-frame transaction in the engine, so the
/// alert and motion logic always read a consistent "previous" state.
#[derive(Debug, Clone)]
pub struct TrackedObject {
    /// Unique, monotonically assigned, never reused.
    pub id: u64,
    pub bbox: Rect,
    pub centroid: Point,
    /// Centroid as of the previous committed update.
    pub prev_centroid: Point,
    pub area: f32,
    pub class: ObjectClass,
    /// Most recent matched detector label, verbatim.
    pub label: String,
    /// Last successful match or creation. Non-decreasing while the record exists.
    pub last_seen: Instant,
    /// Last approach-alert firing; initialized to creation time.
    pub last_alert: Instant,
    /// Consecutive qualifying frames toward an approach alert.
    pub consecutive_alert_frames: u32,
    /// Consecutive frames holding the same signal color.
    pub signal_frames: u32,
    /// Frames since the last displacement sample.
    pub arrow_frames: u32,
    /// Anchor for displacement sampling; unset until the first matched frame.
    pub arrow_anchor: Option<Point>,
    /// Displacement arrow awaiting the renderer; cleared on consumption.
    pub pending_vector: Option<(Point, Point)>,
}

impl TrackedObject {
    pub fn new(id: u64, det: &Detection, now: Instant) -> Self {
        let centroid = det.bbox.centroid();
        Self {
            id,
            bbox: det.bbox,
            centroid,
            prev_centroid: centroid, // no motion yet
            area: det.bbox.area(),
            class: ObjectClass::from_label(&det.label),
            label: det.label.clone(),
            last_seen: now,
            last_alert: now,
            consecutive_alert_frames: 0,
            signal_frames: 0,
            arrow_frames: 0,
            arrow_anchor: None,
            pending_vector: None,
        }
    }

    /// Displacement magnitude of the last committed update.
    pub fn displacement(&self) -> f32 {
        self.prev_centroid.distance_to(self.centroid)
    }

    /// Start of the apply-frame transaction: a successor record with the box
    /// fields advanced to the matched detection and the debounce state
    /// carried over. The alert engine and motion builder then mutate the
    /// successor before it is committed back to the store in one `upsert`.
    pub fn advanced(&self, det: &Detection, now: Instant) -> TrackedObject {
        let mut next = self.clone();
        next.prev_centroid = self.centroid;
        next.bbox = det.bbox;
        next.centroid = det.bbox.centroid();
        next.area = det.bbox.area();
        next.class = ObjectClass::from_label(&det.label);
        next.label = det.label.clone();
        next.last_seen = now;
        next
    }
}
