// src/engine.rs
//
// Per-frame orchestration. Each update is one atomic unit against the track
// store: filter malformed input, associate detections to the snapshot,
// apply one transaction per matched track (fields, alerts, motion), spawn
// tracks for the rest, then run the expiry sweep. The summary query runs
// out-of-band over the same store; serialization against the frame path
// lives in `service`.
//
// No failure in here is fatal. Bad detections are skipped, disqualified
// alerts simply do not fire, and a rate-limited summary returns nothing.

use crate::alerts::AlertEngine;
use crate::config::Config;
use crate::error::Error;
use crate::events::{EventBus, SceneEvent};
use crate::metrics::EngineMetrics;
use crate::motion::MotionVectorBuilder;
use crate::summary::SummaryAggregator;
use crate::tracking::{associate, Lifecycle, TrackStore, TrackedObject};
use crate::types::Detection;
use std::time::Instant;
use tracing::debug;

const MAX_PENDING_EVENTS: usize = 64;

pub struct SceneEngine {
    config: Config,
    store: TrackStore,
    lifecycle: Lifecycle,
    alerts: AlertEngine,
    motion: MotionVectorBuilder,
    summary: SummaryAggregator,
    bus: EventBus,
    metrics: EngineMetrics,
}

impl SceneEngine {
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            lifecycle: Lifecycle::new(config.tracking.expiry()),
            alerts: AlertEngine::new(&config.alerts, &config.viewport),
            motion: MotionVectorBuilder::new(&config.motion),
            summary: SummaryAggregator::new(&config.summary, &config.viewport),
            store: TrackStore::new(),
            bus: EventBus::new(MAX_PENDING_EVENTS),
            metrics: EngineMetrics::new(),
            config,
        })
    }

    /// Ingest one frame of detections. `now` is the frame timestamp, sampled
    /// once by the caller for the whole cycle. Returns the alert and motion
    /// events this frame produced.
    pub fn update(&mut self, detections: &[Detection], now: Instant) -> Vec<SceneEvent> {
        self.metrics.inc(&self.metrics.frames);
        self.metrics
            .add(&self.metrics.detections_in, detections.len() as u64);

        let valid: Vec<&Detection> = detections
            .iter()
            .filter(|d| d.is_well_formed() && d.confidence >= self.config.tracking.min_confidence)
            .collect();
        let skipped = detections.len() - valid.len();
        if skipped > 0 {
            debug!("skipped {} malformed or low-confidence detections", skipped);
            self.metrics
                .add(&self.metrics.detections_skipped, skipped as u64);
        }

        let snapshot = self.store.snapshot();
        let association = associate(&valid, &snapshot, self.config.tracking.match_iou);

        for m in &association.matched {
            // The snapshot and the store agree within a frame, but read the
            // committed record to keep the transaction self-contained.
            let Some(prev) = self.store.get(m.track_id).cloned() else {
                continue;
            };
            let det = valid[m.detection];
            let mut next = prev.advanced(det, now);

            if let Some(event) = self.alerts.evaluate_approach(&prev, &mut next, now) {
                self.metrics.inc(&self.metrics.approach_alerts);
                self.bus.publish(event);
            }
            if let Some(event) = self.alerts.evaluate_signal(&prev, &mut next) {
                self.metrics.inc(&self.metrics.signal_alerts);
                self.bus.publish(event);
            }
            if let Some(event) = self.motion.advance(&prev, &mut next) {
                self.metrics.inc(&self.metrics.motion_vectors);
                self.bus.publish(event);
            }

            self.store.upsert(next);
        }

        for &di in &association.unmatched {
            let (_, event) = self.lifecycle.spawn(&mut self.store, valid[di], now);
            self.metrics.inc(&self.metrics.tracks_created);
            if let Some(event) = event {
                self.metrics.inc(&self.metrics.signal_alerts);
                self.bus.publish(event);
            }
        }

        let expired = self.lifecycle.sweep(&mut self.store, now);
        self.metrics.add(&self.metrics.tracks_expired, expired as u64);

        self.bus.drain()
    }

    /// Answer a voice request for the traffic situation, or None when the
    /// request falls inside the summary rate-limit window.
    pub fn query_summary(&mut self, now: Instant) -> Option<String> {
        let snapshot = self.store.snapshot();
        let text = self.summary.query(&snapshot, now);
        match text {
            Some(_) => self.metrics.inc(&self.metrics.summaries_emitted),
            None => self.metrics.inc(&self.metrics.summaries_suppressed),
        }
        text
    }

    /// Renderer acknowledgement that a motion vector was drawn.
    pub fn vector_consumed(&mut self, track_id: u64) {
        if let Some(record) = self.store.get(track_id) {
            let mut record = record.clone();
            record.pending_vector = None;
            self.store.upsert(record);
        }
    }

    pub fn tracks(&self) -> Vec<TrackedObject> {
        self.store.snapshot()
    }

    pub fn track_count(&self) -> usize {
        self.store.len()
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Drop every track. Ids keep counting; they are never reused.
    pub fn reset(&mut self) {
        self.store.clear();
    }
}
