// src/service.rs
//
// Concurrency wrapper around the engine. Two call sites drive the core: the
// per-frame detection feed and the asynchronous voice-command handler. Both
// go through one async mutex, so a frame update is atomic relative to other
// frames and to summary snapshots. Alert and summary speech plus motion
// vectors fan out over an unbounded channel: sending never blocks the
// update path, and consumers run on their own tasks.

use crate::config::Config;
use crate::engine::SceneEngine;
use crate::error::Error;
use crate::events::SceneEvent;
use crate::metrics::MetricsSummary;
use crate::tracking::TrackedObject;
use crate::types::Detection;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub struct SceneService {
    engine: Arc<Mutex<SceneEngine>>,
    events: mpsc::UnboundedSender<SceneEvent>,
}

impl SceneService {
    /// Build the service and the event stream its collaborators consume.
    pub fn new(
        config: Config,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SceneEvent>), Error> {
        let engine = SceneEngine::new(config)?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok((
            Self {
                engine: Arc::new(Mutex::new(engine)),
                events: tx,
            },
            rx,
        ))
    }

    /// Per-frame entry point for the vision collaborator. The frame clock is
    /// sampled once here and used for the whole cycle.
    pub async fn process_frame(&self, detections: Vec<Detection>) {
        let now = Instant::now();
        let events = {
            let mut engine = self.engine.lock().await;
            engine.update(&detections, now)
        };
        self.dispatch(events);
    }

    /// Voice-command entry point. The recognizer decides whether a
    /// transcript asks for the traffic situation; this core never parses
    /// free text. Rate-limited requests dispatch nothing.
    pub async fn request_summary(&self) {
        let now = Instant::now();
        let text = {
            let mut engine = self.engine.lock().await;
            engine.query_summary(now)
        };
        if let Some(text) = text {
            self.dispatch(vec![SceneEvent::TrafficSummary { text }]);
        }
    }

    /// Renderer acknowledgement for a drawn motion vector.
    pub async fn vector_consumed(&self, track_id: u64) {
        self.engine.lock().await.vector_consumed(track_id);
    }

    pub async fn tracks(&self) -> Vec<TrackedObject> {
        self.engine.lock().await.tracks()
    }

    pub async fn metrics_summary(&self) -> MetricsSummary {
        self.engine.lock().await.metrics().summary()
    }

    fn dispatch(&self, events: Vec<SceneEvent>) {
        for event in events {
            if self.events.send(event).is_err() {
                warn!("event consumer dropped; discarding scene events");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn det(x: f32, y: f32, w: f32, h: f32, label: &str) -> Detection {
        Detection::new(Rect::new(x, y, w, h), label, 0.8)
    }

    #[tokio::test]
    async fn signal_alert_reaches_the_event_stream() {
        let (service, mut events) = SceneService::new(Config::default()).unwrap();

        service
            .process_frame(vec![det(100.0, 100.0, 40.0, 40.0, "red light")])
            .await;

        let event = events.recv().await.unwrap();
        assert!(matches!(event, SceneEvent::SignalAlert { .. }));
    }

    #[tokio::test]
    async fn summary_request_dispatches_composed_text() {
        let (service, mut events) = SceneService::new(Config::default()).unwrap();

        service.request_summary().await;
        let event = events.recv().await.unwrap();
        match event {
            SceneEvent::TrafficSummary { text } => {
                assert_eq!(text, crate::summary::NO_OBJECTS_MESSAGE);
            }
            other => panic!("expected summary, got {other:?}"),
        }

        // Second request inside the window dispatches nothing.
        service.request_summary().await;
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn concurrent_feeds_and_queries_serialize() {
        let (service, mut events) = SceneService::new(Config::default()).unwrap();

        let feeder = {
            let service = service.clone();
            tokio::spawn(async move {
                for i in 0..50u32 {
                    let x = 100.0 + i as f32;
                    service
                        .process_frame(vec![det(x, 100.0, 100.0, 100.0, "car")])
                        .await;
                }
            })
        };
        let asker = {
            let service = service.clone();
            tokio::spawn(async move {
                for _ in 0..10 {
                    service.request_summary().await;
                }
            })
        };

        feeder.await.unwrap();
        asker.await.unwrap();

        // The drifting box stays one coherent track throughout.
        let tracks = service.tracks().await;
        assert_eq!(tracks.len(), 1);

        let metrics = service.metrics_summary().await;
        assert_eq!(metrics.frames, 50);
        assert_eq!(metrics.summaries_emitted + metrics.summaries_suppressed, 10);

        drop(service);
        let mut summaries = 0;
        while let Some(event) = events.recv().await {
            if matches!(event, SceneEvent::TrafficSummary { .. }) {
                summaries += 1;
            }
        }
        assert_eq!(summaries, 1);
    }
}
