// src/events.rs
//
// Event surface consumed by the speech and rendering collaborators.
// Components publish here during a frame update instead of calling each
// other; the engine drains the bus into its return value.

use crate::geometry::Point;
use crate::types::SignalColor;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SceneEvent {
    /// An object has been closing in on the viewer for several consecutive
    /// frames. The speech collaborator speaks a caution phrase.
    ApproachAlert { track_id: u64, label: String },
    /// A pedestrian light was first seen, changed color, or has been held
    /// long enough to re-announce.
    SignalAlert { color: SignalColor },
    /// Composed answer to a "traffic situation" voice request.
    TrafficSummary { text: String },
    /// Displacement arrow for the renderer. The renderer must acknowledge
    /// consumption so the pending vector is cleared.
    MotionVector {
        track_id: u64,
        start: Point,
        end: Point,
    },
}

pub struct EventBus {
    events: VecDeque<SceneEvent>,
    max_pending: usize,
}

impl EventBus {
    pub fn new(max_pending: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn publish(&mut self, event: SceneEvent) {
        if self.events.len() >= self.max_pending {
            warn!(
                "event bus full ({} events), dropping oldest",
                self.max_pending
            );
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<SceneEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.events.len()
    }
}
