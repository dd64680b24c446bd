// src/alerts.rs
//
// Two independent debouncing state machines, evaluated per matched track
// inside the frame transaction, both reading the pre-update record as
// "previous".
//
// Approach: an object counts as approaching when its box grows and its
// centroid moves along the reference direction (viewport center toward
// bottom-center, where the viewer stands). Three consecutive qualifying
// frames fire one alert; a per-track cooldown then suppresses repeats.
// Any non-qualifying frame resets the streak.
//
// Signal: a pedestrian light announces immediately on any color change or
// on the transition from non-light to light, then re-announces after a
// fixed number of consecutive same-color frames so a standing light is not
// forgotten and not repeated every frame either.

use crate::config::{AlertConfig, ViewportConfig};
use crate::events::SceneEvent;
use crate::geometry::{cosine_similarity, Point, Vec2};
use crate::tracking::TrackedObject;
use std::time::{Duration, Instant};
use tracing::debug;

pub struct AlertEngine {
    min_cosine: f32,
    confirm_frames: u32,
    cooldown: Duration,
    signal_repeat_frames: u32,
    /// Viewport center toward bottom-center: the viewer's position on screen.
    reference: Vec2,
}

impl AlertEngine {
    pub fn new(config: &AlertConfig, viewport: &ViewportConfig) -> Self {
        let center = Point::new(viewport.width * 0.5, viewport.height * 0.5);
        let bottom_center = Point::new(viewport.width * 0.5, viewport.height);
        Self {
            min_cosine: config.approach_min_cosine,
            confirm_frames: config.approach_confirm_frames,
            cooldown: config.approach_cooldown(),
            signal_repeat_frames: config.signal_repeat_frames,
            reference: center.vector_to(bottom_center),
        }
    }

    /// Advance the approach machine for one matched frame. `prev` is the
    /// record before this frame, `next` the in-progress successor.
    pub fn evaluate_approach(
        &self,
        prev: &TrackedObject,
        next: &mut TrackedObject,
        now: Instant,
    ) -> Option<SceneEvent> {
        let movement = prev.centroid.vector_to(next.centroid);
        let heading = cosine_similarity(movement, self.reference);

        let qualifies = !next.class.is_signal()
            && next.area > prev.area
            && heading > self.min_cosine
            && now.duration_since(prev.last_alert) > self.cooldown;

        if !qualifies {
            next.consecutive_alert_frames = 0;
            return None;
        }

        next.consecutive_alert_frames = prev.consecutive_alert_frames + 1;
        if next.consecutive_alert_frames < self.confirm_frames {
            return None;
        }

        debug!(
            "track {} approach confirmed after {} frames (cos {:.2})",
            next.id, next.consecutive_alert_frames, heading
        );
        next.consecutive_alert_frames = 0;
        next.last_alert = now;
        Some(SceneEvent::ApproachAlert {
            track_id: next.id,
            label: next.label.clone(),
        })
    }

    /// Advance the signal machine for one matched frame.
    pub fn evaluate_signal(
        &self,
        prev: &TrackedObject,
        next: &mut TrackedObject,
    ) -> Option<SceneEvent> {
        let Some(color) = next.class.signal_color() else {
            next.signal_frames = 0;
            return None;
        };

        if prev.class.signal_color() == Some(color) {
            // Same color held; count toward the periodic re-announcement.
            next.signal_frames = prev.signal_frames + 1;
            if next.signal_frames >= self.signal_repeat_frames {
                debug!(
                    "track {} re-announcing held {} light",
                    next.id,
                    color.as_str()
                );
                next.signal_frames = 0;
                return Some(SceneEvent::SignalAlert { color });
            }
            None
        } else {
            // Color changed, or the track just became a light.
            next.signal_frames = 0;
            Some(SceneEvent::SignalAlert { color })
        }
    }
}
