// src/metrics.rs
//
// Engine observability. Per-subsystem counters bumped on the frame path;
// export via logs or the serialized summary.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    pub frames: Arc<AtomicU64>,
    pub detections_in: Arc<AtomicU64>,
    pub detections_skipped: Arc<AtomicU64>,
    pub tracks_created: Arc<AtomicU64>,
    pub tracks_expired: Arc<AtomicU64>,
    pub approach_alerts: Arc<AtomicU64>,
    pub signal_alerts: Arc<AtomicU64>,
    pub motion_vectors: Arc<AtomicU64>,
    pub summaries_emitted: Arc<AtomicU64>,
    pub summaries_suppressed: Arc<AtomicU64>,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            frames: self.frames.load(Ordering::Relaxed),
            detections_in: self.detections_in.load(Ordering::Relaxed),
            detections_skipped: self.detections_skipped.load(Ordering::Relaxed),
            tracks_created: self.tracks_created.load(Ordering::Relaxed),
            tracks_expired: self.tracks_expired.load(Ordering::Relaxed),
            approach_alerts: self.approach_alerts.load(Ordering::Relaxed),
            signal_alerts: self.signal_alerts.load(Ordering::Relaxed),
            motion_vectors: self.motion_vectors.load(Ordering::Relaxed),
            summaries_emitted: self.summaries_emitted.load(Ordering::Relaxed),
            summaries_suppressed: self.summaries_suppressed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub frames: u64,
    pub detections_in: u64,
    pub detections_skipped: u64,
    pub tracks_created: u64,
    pub tracks_expired: u64,
    pub approach_alerts: u64,
    pub signal_alerts: u64,
    pub motion_vectors: u64,
    pub summaries_emitted: u64,
    pub summaries_suppressed: u64,
}
